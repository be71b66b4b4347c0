//! Subcommand dispatch

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::server::LevelReload;

/// Runs the parsed subcommand with merged settings; no subcommand means `serve`.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
    level_reload: Option<LevelReload>,
) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings, environment)
                .with_level_reload(level_reload)
                .execute(*dry_run)
                .await
        }
        None => {
            ServeCommandHandler::new(settings, environment)
                .with_level_reload(level_reload)
                .execute(false)
                .await
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/catalog".to_string();
        config
    }

    #[tokio::test]
    async fn test_serve_dry_run_returns_without_binding() {
        let cli = Cli::try_parse_from(["catalog-rs", "serve", "--dry-run"]).unwrap();
        let result = execute_command(&cli, valid_config(), Environment::Test, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_migrate_with_invalid_database_fails() {
        let cli = Cli::try_parse_from(["catalog-rs", "migrate", "--dry-run"]).unwrap();
        let result = execute_command(&cli, Settings::default(), Environment::Test, None).await;
        assert!(result.is_err());
    }
}
