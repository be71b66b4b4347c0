//! HTTP server lifecycle: pool setup, optional migrations, bind, serve, graceful shutdown.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{ConfigLoader, Environment, Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::logger::LogLevelHandle;
use crate::state::AppState;

/// Re-reads `logger.level` from `loader` on SIGHUP and applies it through `handle`.
pub struct LevelReload {
    pub loader: ConfigLoader,
    pub handle: LogLevelHandle,
}

pub struct Server {
    settings: Settings,
    environment: Environment,
    level_reload: Option<LevelReload>,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
            level_reload: None,
        }
    }

    pub fn with_level_reload(mut self, level_reload: Option<LevelReload>) -> Self {
        self.level_reload = level_reload;
        self
    }

    /// Runs until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Pool initialization, migration, bind and serve failures.
    pub async fn run(self) -> anyhow::Result<()> {
        let Settings {
            application,
            server,
            database,
            logger,
            search,
        } = self.settings;

        tracing::info!(
            app_name = %application.name,
            app_version = %application.version,
            environment = %self.environment,
            "Application starting"
        );
        tracing::info!(
            address = %server.address(),
            request_timeout = server.request_timeout,
            keep_alive_timeout = server.keep_alive_timeout,
            "Server configuration loaded"
        );
        // The URL carries credentials; only pool sizing is logged.
        tracing::info!(
            max_connections = database.max_connections,
            min_connections = database.min_connections,
            connection_timeout = database.connection_timeout,
            auto_migrate = database.auto_migrate,
            "Database configuration loaded"
        );
        tracing::info!(
            level = %logger.level,
            console_enabled = logger.console.enabled,
            file_enabled = logger.file.enabled,
            "Logger configuration loaded"
        );
        tracing::info!(
            default_page_size = search.default_page_size,
            max_page_size = search.max_page_size,
            "Search configuration loaded"
        );

        if let Some(level_reload) = self.level_reload {
            spawn_level_reload(level_reload);
        }

        if database.auto_migrate {
            let applied = run_pending_migrations(&database.url).await?;
            tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
        }

        let pool = establish_async_connection_pool(&database).await?;
        tracing::info!("Database connection pool initialized");

        let state = AppState::new(pool, search);
        let router = create_router(state, Duration::from_secs(server.request_timeout));

        let address = server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("failed to bind to {address}: {e}")
        })?;
        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

#[cfg(unix)]
fn spawn_level_reload(LevelReload { loader, handle }: LevelReload) {
    let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGHUP handler, log level is fixed");
            return;
        }
    };

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            match loader.load() {
                Ok(settings) => {
                    if let Err(e) = handle.set_level(&settings.logger.level) {
                        tracing::warn!(error = %e, "Rejected reloaded log level");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Configuration reload failed, keeping log level");
                }
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_level_reload(_: LevelReload) {}

/// Resolves on Ctrl+C or SIGTERM. A signal that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
