//! Key handling and view-state transitions, kept apart from the terminal so
//! they can be driven directly.
use crate::command::{Command, parse_command};
use crate::input::InputLine;
use crate::view::{Focus, UiSnap, ViewSnap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use foodtrucks_actors::{LoadOutcome, NearbyOutcome};
use foodtrucks_core::{FoodTruckRecord, NearbyPolicy, ViewState};

const HELP: &str = "/taco <permit>  /nearby [zip]  /quit  (Tab switches focus)";

/// Work the controller asks its owner to start.
#[derive(Debug, PartialEq)]
pub enum Effect {
    Load,
    FindNearby {
        zip_code: String,
        candidates: Vec<FoodTruckRecord>,
        radius_km: f64,
    },
    Quit,
}

pub struct Controller {
    state: ViewState,
    policy: NearbyPolicy,
    limit: usize,
    input: InputLine,
    focus: Focus,
    highlighted: Option<usize>,
    notice: Option<String>,
    nearby_scroll: usize,
}

impl Controller {
    pub fn new(policy: NearbyPolicy, limit: usize) -> Self {
        Self {
            state: ViewState::new(),
            policy,
            limit,
            input: InputLine::default(),
            focus: Focus::ZipInput,
            highlighted: None,
            notice: None,
            nearby_scroll: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn start_load(&mut self) -> Effect {
        self.state.begin_load();
        Effect::Load
    }

    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        self.state.finish_load(outcome, self.limit);
        self.highlighted = (!self.state.taco_trucks().is_empty()).then_some(0);
    }

    pub fn finish_nearby(&mut self, outcome: NearbyOutcome) {
        self.state.finish_nearby(outcome);
        self.nearby_scroll = 0;
    }

    pub fn snapshot(&self, spinner: &'static str) -> ViewSnap {
        ViewSnap::capture(
            &self.state,
            &UiSnap {
                input: self.input.text(),
                input_cursor: self.input.cursor(),
                focus: self.focus,
                spinner,
                notice: self.notice.as_deref(),
                highlighted: self.highlighted,
                nearby_scroll: self.nearby_scroll,
            },
        )
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(Effect::Quit),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => self.focus = self.focus.toggle(),
            (KeyCode::PageUp, _) => self.nearby_scroll = self.nearby_scroll.saturating_sub(5),
            (KeyCode::PageDown, _) => {
                let last = self.state.nearby().len().saturating_sub(1);
                self.nearby_scroll = (self.nearby_scroll + 5).min(last);
            }
            _ => {
                return match self.focus {
                    Focus::ZipInput => self.input_key(key),
                    Focus::Selector => self.selector_key(key),
                };
            }
        }
        None
    }

    fn input_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Esc => self.input.clear(),
            KeyCode::Char(ch) => self.input.insert(ch),
            _ => {}
        }
        None
    }

    fn selector_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let count = self.state.taco_trucks().len();
        match key.code {
            KeyCode::Up => {
                self.highlighted = self.highlighted.map(|i| i.saturating_sub(1));
            }
            KeyCode::Down if count > 0 => {
                self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1).min(count - 1)));
            }
            KeyCode::Enter => {
                let permit = self
                    .highlighted
                    .and_then(|i| self.state.taco_trucks().get(i))
                    .map(|t| t.permit.clone());
                if let Some(permit) = permit {
                    self.select_taco(&permit);
                }
            }
            KeyCode::Esc => self.focus = Focus::ZipInput,
            _ => {}
        }
        None
    }

    /// Plain text is a ZIP code for the nearby lookup, sent exactly as typed;
    /// `/` starts a command.
    pub fn submit(&mut self) -> Option<Effect> {
        self.notice = None;
        let raw = self.input.text().to_string();
        let line = raw.trim_start();
        if !line.starts_with('/') {
            self.state.set_zip_code(raw);
            return Some(self.find_nearby());
        }
        let line = line.to_string();

        self.input.clear();
        match parse_command(&line) {
            Command::Help => self.notice = Some(HELP.into()),
            Command::Quit => return Some(Effect::Quit),
            Command::Taco(Some(permit)) => self.select_taco(&permit),
            Command::Taco(None) => self.notice = Some("Usage: /taco <permit>".into()),
            Command::Nearby(zip) => {
                if let Some(zip) = zip {
                    self.input.set(zip.clone());
                    self.state.set_zip_code(zip);
                }
                return Some(self.find_nearby());
            }
            Command::Unknown(s) => self.notice = Some(format!("Unknown command: {s}. Try /help.")),
        }
        None
    }

    fn select_taco(&mut self, permit: &str) {
        self.state.select_taco_truck(permit);
        if let Some(i) = self
            .state
            .taco_trucks()
            .iter()
            .position(|t| t.permit == permit)
        {
            self.highlighted = Some(i);
        }
    }

    fn find_nearby(&mut self) -> Effect {
        self.state.begin_nearby();
        Effect::FindNearby {
            zip_code: self.state.zip_code().to_string(),
            candidates: self.state.nearby_candidates(self.policy.scope).to_vec(),
            radius_km: self.policy.radius_km,
        }
    }
}
