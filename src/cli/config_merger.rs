//! Merges command-line overrides over file configuration.
//!
//! Precedence, highest first: `serve --log-level`/`--host`/`--port`,
//! then `--verbose`/`--quiet`, then the loaded configuration.

use super::parser::{Cli, Commands};
use crate::config::{ConfigError, ConfigLoader, Environment, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
    loader: ConfigLoader,
}

impl ConfigurationMerger {
    /// `loader` is the source `base_config` came from.
    pub fn new(base_config: Settings, loader: ConfigLoader) -> Self {
        Self {
            base_config,
            loader,
        }
    }

    /// Loads the base configuration the CLI points at: `--config` selects a
    /// single file, otherwise `CATALOG_CONFIG_*` decide; `--env` replaces
    /// `CATALOG_APP_ENV`.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load()?, loader))
    }

    pub fn environment(&self) -> Environment {
        self.loader.environment()
    }

    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    /// Returns the base configuration with CLI overrides applied and re-validated.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }
}
