//! Service configuration
//!
//! Settings are read from TOML files under `config/` and overridden by
//! `CATALOG_*` environment variables; see [`ConfigLoader`] for precedence.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, DatabaseConfig, LoggerSettings, SearchConfig, ServerConfig, Settings,
};

/// Serializes tests that read or write `CATALOG_*` environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
