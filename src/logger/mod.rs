//! Logger setup on top of `tracing-subscriber`.
//!
//! - Console output with optional ANSI colors
//! - File output in full, compact or JSON format with size-based rollover
//! - Level changes at runtime through [`LogLevelHandle`]

pub mod config;
pub mod error;
pub(crate) mod writer;


pub use config::{ConsoleConfig, FileConfig, LOG_LEVELS, LogFormat, LoggerConfig, validate_level};
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt,
    layer::{Layered, SubscriberExt},
    reload,
    util::SubscriberInitExt,
};
use writer::RollingFileWriter;

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Changes the active log filter after the logger is installed.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replaces the active filter; accepts the same values as `logger.level`.
    pub fn set_level(&self, level: &str) -> Result<(), LoggerError> {
        validate_level(level)?;
        let filter = EnvFilter::try_new(level).map_err(|e| LoggerError::config(e.to_string()))?;
        self.inner
            .reload(filter)
            .map_err(|e| LoggerError::Reload {
                message: e.to_string(),
            })?;
        tracing::info!(filter = level, "Log level changed");
        Ok(())
    }
}

/// Installs the global subscriber.
///
/// # Errors
/// Invalid configuration, an unwritable log file, or a subscriber that is
/// already installed.
pub fn init_logger(config: LoggerConfig) -> Result<LogLevelHandle, LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).map_err(|e| LoggerError::config(e.to_string()))?;
    let (filter, handle) = reload::Layer::new(filter);

    // The file layer goes first so console ANSI settings do not leak into it.
    let file_layer = if config.file.enabled {
        Some(file_layer(&config.file)?)
    } else {
        None
    };
    let console_layer = config.console.enabled.then(|| {
        fmt::layer()
            .with_ansi(config.console.colored && std::io::stdout().is_terminal())
            .with_target(true)
            .with_level(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggerError::Init {
            message: e.to_string(),
        })?;

    Ok(LogLevelHandle { inner: handle })
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = RollingFileWriter::new(config)?;
    let layer = fmt::layer().with_ansi(false).with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.with_target(true).boxed(),
        LogFormat::Compact => layer.with_target(true).compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}
