#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,                   // /help
    Quit,                   // /quit or /exit
    Taco(Option<String>),   // /taco <permit>
    Nearby(Option<String>), // /nearby [zip]
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    match verb {
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        "/taco" => Command::Taco(rest),
        "/nearby" => Command::Nearby(rest),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_and_arguments() {
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("  /exit "), Command::Quit);
        assert_eq!(
            parse_command("/taco 21MFF-00106"),
            Command::Taco(Some("21MFF-00106".into()))
        );
        assert_eq!(parse_command("/taco   "), Command::Taco(None));
        assert_eq!(parse_command("/nearby"), Command::Nearby(None));
        assert_eq!(
            parse_command("/nearby\t94110"),
            Command::Nearby(Some("94110".into()))
        );
    }

    #[test]
    fn unknown_verbs_keep_the_input() {
        assert_eq!(
            parse_command("/burrito now"),
            Command::Unknown("/burrito now".into())
        );
        assert_eq!(parse_command("94103"), Command::Unknown("94103".into()));
    }
}
