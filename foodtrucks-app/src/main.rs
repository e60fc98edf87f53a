use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodtrucks_common::observability::{LogConfig, LogFormat, init_logging};
use foodtrucks_config::{FoodTrucksConfig, FoodTrucksConfigLoader, default_config_path};
use report::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use wiring::{Clients, build_clients, nearby_policy, run_tui};

mod report;
mod wiring;

#[derive(Debug, Parser)]
#[command(name = "foodtrucks", version, about = "San Francisco food trucks, tacos first")]
struct Cli {
    /// YAML config file. Defaults to ./foodtrucks.yaml, then the user config dir.
    #[arg(long, global = true, env = "FOODTRUCKS_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for headless commands.
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write logs to stderr (ignored by the terminal view).
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Interactive terminal view (default).
    Tui,
    /// Print the available trucks (the first records of the dataset).
    List,
    /// Print every taco truck in the dataset.
    Tacos,
    /// Show the details of one taco truck by permit.
    Show { permit: String },
    /// Find trucks near a ZIP code.
    Nearby { zip: String },
}

fn load_config(path: Option<PathBuf>) -> Result<FoodTrucksConfig> {
    let loader = FoodTrucksConfigLoader::new();
    let loader = match path {
        Some(path) => loader.with_file(path),
        None => match default_config_path() {
            Some(found) => loader.with_optional_file(found),
            None => loader,
        },
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = load_config(cli.config)?;

    // 2) Logging to file; stderr only when no terminal view owns the screen
    let interactive = matches!(cli.command, None | Some(Cmd::Tui));
    let log_path = init_logging(LogConfig {
        app_name: "foodtrucks",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cli.log_stderr && !interactive,
        format: LogFormat::from_name(&cfg.logging.format),
        default_filter: cfg.logging.filter.clone(),
    })?;
    tracing::info!(log = %log_path.display(), version = ?cfg.version, "foodtrucks.start");

    let clients = build_clients(&cfg)?;

    let Some(command) = cli.command.filter(|c| !matches!(c, Cmd::Tui)) else {
        run_tui(&cfg, clients).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let outcome = run_headless(command, &cfg, &clients).await;
    match outcome {
        Ok(report) => {
            println!("{}", report::render(&report, cli.format)?.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            tracing::warn!(error = %message, "headless.failed");
            let rendered = report::render_error(&message, cli.format);
            match cli.format {
                OutputFormat::Json => println!("{rendered}"),
                OutputFormat::Text => eprintln!("{rendered}"),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_headless(command: Cmd, cfg: &FoodTrucksConfig, clients: &Clients) -> report::Outcome {
    let source = clients.source.as_ref();
    let limit = cfg.dataset.available_limit;
    match command {
        Cmd::List | Cmd::Tui => report::available(source, limit).await,
        Cmd::Tacos => report::tacos(source, limit).await,
        Cmd::Show { permit } => report::show(source, limit, &permit).await,
        Cmd::Nearby { zip } => {
            let policy = nearby_policy(cfg);
            report::nearby(source, clients.geocoder.as_ref(), limit, policy, &zip).await
        }
    }
}
