//! Command-line entry point: argument parsing, configuration merge,
//! logger initialization and subcommand dispatch.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use anyhow::Context;
use clap::Parser;

use crate::config::Settings;
use crate::logger::{LogLevelHandle, init_logger};
use crate::server::LevelReload;

/// Parses `std::env::args`, loads configuration and runs the subcommand.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let merger = ConfigurationMerger::load(&cli).context("failed to load configuration")?;
    let settings = merger
        .merge_cli_args(&cli)
        .context("invalid configuration")?;

    let handle = init_logger_from_settings(&settings)?;
    tracing::debug!(environment = %merger.environment(), "Configuration merged");

    let level_reload = LevelReload {
        loader: merger.loader().clone(),
        handle,
    };
    execute_command(&cli, settings, merger.environment(), Some(level_reload)).await
}

/// Installs the global subscriber described by `settings.logger`.
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LogLevelHandle> {
    let config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("invalid logger configuration")?;

    init_logger(config).context("failed to initialize logger")
}
