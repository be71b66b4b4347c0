//! `serve` command

use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::server::{LevelReload, Server};

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
    level_reload: Option<LevelReload>,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
            level_reload: None,
        }
    }

    pub fn with_level_reload(mut self, level_reload: Option<LevelReload>) -> Self {
        self.level_reload = level_reload;
        self
    }

    /// Starts the server, or with `dry_run` only validates and reports the configuration.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }
        Server::new(self.config, self.environment)
            .with_level_reload(self.level_reload)
            .run()
            .await
    }

    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid ({} environment)", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}..{} connections, auto_migrate = {}",
            self.config.database.min_connections,
            self.config.database.max_connections,
            self.config.database.auto_migrate
        );
        println!("✓ Log level: {}", self.config.logger.level);
        println!(
            "✓ Search page size: default {}, max {}",
            self.config.search.default_page_size, self.config.search.max_page_size
        );
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/catalog".to_string();
        config
    }

    #[tokio::test]
    async fn test_dry_run_with_valid_config() {
        let handler = ServeCommandHandler::new(valid_config(), Environment::Test);
        assert_eq!(handler.config(), &valid_config());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_with_invalid_config() {
        let mut config = valid_config();
        config.search.default_page_size = 500;

        let handler = ServeCommandHandler::new(config, Environment::Test);
        assert!(handler.execute(true).await.is_err());
    }
}
