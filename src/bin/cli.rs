//! seatwatch CLI
//!
//! Runs the seat monitor and its housekeeping commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use seatwatch::{
    background,
    error::Result,
    models::{Config, LoggingConfig},
    notify::{NotificationDispatcher, build_notifier},
    pipeline::Monitor,
    services::{CourseSearchClient, SectionParser},
    storage::{JsonStateStore, StateStore},
    utils::log::Logger,
};

/// seatwatch - Course Seat Monitor
#[derive(Parser, Debug)]
#[command(
    name = "seatwatch",
    version,
    about = "Alerts when seats open in watched course sections"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "seatwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll forever, with the health endpoint and keep-alive ping
    Run,

    /// Run a single polling cycle and exit
    Check,

    /// Validate the configuration file
    Validate,

    /// Show the saved section state
    State,

    /// Parse a saved search results page and print its sections
    Parse {
        /// HTML file to parse
        file: PathBuf,
    },
}

/// Initialize bootstrap logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the monitor logger from configuration.
fn build_logger(config: &LoggingConfig, verbose: bool) -> Result<Logger> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    match config.file.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(path) => Logger::with_file(level, path),
        None => Ok(Logger::console(level)),
    }
}

/// Wire the monitor's collaborators from configuration.
fn build_monitor(config: &Config, logger: &Logger) -> Result<Monitor> {
    let source = CourseSearchClient::new(&config.search)?;
    let store = JsonStateStore::new(&config.monitor.state_file, logger.clone());
    let notifier = NotificationDispatcher::new(build_notifier(&config.notify)?, logger.clone());

    Ok(Monitor::new(
        config.courses.clone(),
        Duration::from_secs(config.monitor.check_interval_secs),
        Box::new(source),
        SectionParser::new()?,
        Box::new(store),
        notifier,
        logger.clone(),
    ))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env_overrides();
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run => {
            config.validate()?;
            let logger = build_logger(&config.logging, cli.verbose)?;
            let monitor = build_monitor(&config, &logger)?;

            let _tasks = background::spawn_all(&config.health, &logger);

            tokio::select! {
                _ = monitor.run() => {}
                _ = tokio::signal::ctrl_c() => {
                    logger.info("  Shutting down.");
                }
            }
        }

        Command::Check => {
            config.validate()?;
            let logger = build_logger(&config.logging, cli.verbose)?;
            let mut monitor = build_monitor(&config, &logger)?;

            monitor.load_state().await;
            let report = monitor.run_cycle().await;

            log::info!(
                "Checked {} course(s), skipped {}, {} alert(s), {} fill(s)",
                report.courses_checked,
                report.courses_skipped,
                report.alerts.len(),
                report.filled.len()
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} course(s), notifications via {:?})",
                config.courses.len(),
                config.notify.method
            );
        }

        Command::State => {
            let store = JsonStateStore::new(&config.monitor.state_file, Logger::console("warn"));
            let state = store.load().await;

            if state.is_empty() {
                log::info!("No state saved at {} yet.", store.path().display());
            }
            for (key, record) in &state {
                log::info!("{key}: {}", record.status(false));
            }
        }

        Command::Parse { file } => {
            let html = std::fs::read_to_string(&file)?;
            let sections = SectionParser::new()?.parse(&html);

            log::info!("{} section(s) in {}", sections.len(), file.display());
            for section in &sections {
                log::info!(
                    "{} [{}] {} {}",
                    section,
                    seatwatch::utils::extract_section_number(&section.code),
                    section.title,
                    section.status(false)
                );
            }
        }
    }

    Ok(())
}
