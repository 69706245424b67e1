//! FlowAI CLI - command-line front-end for the tool-orchestration engine

mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use flowai_core::config::{EnvSettingsProvider, FileSettingsProvider, SettingsProvider};
use flowai_core::logging::{ConsoleLogger, FanoutLogger, FileLogger, LogLevel, Logger, SharedLogger};
use flowai_core::{Error, ErrorKind, Settings};

use cli::{Cli, Commands};

const LOG_LEVEL_VAR: &str = "FLOWAI_LOG_LEVEL";
const LOG_FILE_VAR: &str = "FLOWAI_LOG_FILE";

fn build_logger() -> SharedLogger {
    let level = std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|v| v.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::Warn);

    let console: SharedLogger = Arc::new(ConsoleLogger::new().with_min_level(level));
    let Ok(path) = std::env::var(LOG_FILE_VAR) else {
        return console;
    };

    match FileLogger::open(&path, "flowai") {
        Ok(file) => {
            let file: SharedLogger = Arc::new(file.with_min_level(level));
            Arc::new(FanoutLogger::new(vec![console, file]))
        }
        Err(e) => {
            console.warn(&format!("Cannot open log file {}: {}", path, e));
            console
        }
    }
}

async fn load_settings(cli: &Cli) -> flowai_core::Result<Settings> {
    let settings = match &cli.config {
        Some(path) => FileSettingsProvider::new(path).settings().await?,
        None => {
            let user = FileSettingsProvider::user();
            if user.exists() {
                user.settings().await?
            } else {
                EnvSettingsProvider::new().settings().await?
            }
        }
    };
    settings.validate()?;
    Ok(settings)
}

async fn run(cli: Cli, logger: SharedLogger) -> flowai_core::Result<()> {
    let settings = load_settings(&cli).await?;

    match cli.command {
        Commands::Chat { message, system, model, no_tools, json } => {
            commands::chat(&settings, logger, commands::ChatArgs { message, system, model, no_tools, json }).await
        }
        Commands::Models => commands::models(&settings, logger).await,
        Commands::Tools => commands::tools(&settings, logger).await,
        Commands::Tool { name, args } => commands::tool(&settings, logger, &name, &args).await,
        Commands::Health { wait } => commands::health(&settings, logger, wait).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = build_logger();

    match run(cli, logger.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&e.to_string());
            match e.kind() {
                ErrorKind::Transport => {
                    eprintln!("Could not reach the LLM endpoint or tool server. Check your connection settings.");
                }
                _ => eprintln!("Error: {}", e),
            }
            if matches!(e, Error::ToolFailure { .. }) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
