//! Layered configuration loading
//!
//! Sources, lowest priority first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml`
//! 3. `local.toml`
//! 4. `CATALOG_*` environment variables, `__` separating nested keys
//!    (`CATALOG_DATABASE__URL` sets `database.url`)
//!
//! When a single file is selected, it replaces the three file layers.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "CATALOG_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "CATALOG_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "CATALOG";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Layered(PathBuf),
    SingleFile(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    source: Source,
    environment: Environment,
}

impl ConfigLoader {
    /// Builds a loader from `CATALOG_CONFIG_DIR`, `CATALOG_CONFIG_FILE` and
    /// `CATALOG_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both `CATALOG_CONFIG_DIR` and `CATALOG_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var(CONFIG_DIR_ENV).ok().filter(|v| !v.is_empty());
        let file = std::env::var(CONFIG_FILE_ENV).ok().filter(|v| !v.is_empty());

        let source = match (dir, file) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::mutual_exclusivity(format!(
                    "{CONFIG_DIR_ENV} and {CONFIG_FILE_ENV} cannot both be set; use \
                     {CONFIG_DIR_ENV} for layered loading or {CONFIG_FILE_ENV} for a single file"
                )));
            }
            (None, Some(file)) => Source::SingleFile(PathBuf::from(file)),
            (Some(dir), None) => Source::Layered(PathBuf::from(dir)),
            (None, None) => Source::Layered(PathBuf::from(DEFAULT_CONFIG_DIR)),
        };

        Ok(Self {
            source,
            environment: Environment::from_env(),
        })
    }

    /// Loads exactly one file (plus environment overrides).
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::SingleFile(path.into()),
            environment: Environment::from_env(),
        }
    }

    /// Layered loading rooted at `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Layered(dir.into()),
            environment: Environment::from_env(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Reads every source, deserializes and validates the result.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("failed to deserialize configuration: {e}"))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = match &self.source {
            Source::SingleFile(path) => add_file(Config::builder(), path, true)?,
            Source::Layered(dir) => {
                let builder = add_file(Config::builder(), &dir.join("default.toml"), true)?;
                let env_file = dir.join(format!("{}.toml", self.environment));
                let builder = add_file(builder, &env_file, false)?;
                add_file(builder, &dir.join("local.toml"), false)?
            }
        };

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::from)
    }
}

fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::file_not_found(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK as TEST_MUTEX;
    use std::fs;
    use tempfile::TempDir;

    const DEFAULT_TOML: &str = r#"
[application]
name = "catalog-test"

[server]
host = "0.0.0.0"
port = 3000

[database]
url = "postgres://localhost/catalog_test"

[search]
default_page_size = 10
max_page_size = 50
"#;

    fn config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let mut guard = Self { saved: Vec::new() };
            for key in [CONFIG_DIR_ENV, CONFIG_FILE_ENV, Environment::ENV_VAR] {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.iter().rev() {
                unsafe {
                    match value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_new_defaults_to_config_dir() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.source, Source::Layered(PathBuf::from("config")));
        assert_eq!(loader.environment(), Environment::Development);
    }

    #[test]
    fn test_new_reads_file_and_environment() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_FILE_ENV, "/etc/catalog.toml");
        env.set(Environment::ENV_VAR, "prod");

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.source, Source::SingleFile(PathBuf::from("/etc/catalog.toml")));
        assert_eq!(loader.environment(), Environment::Production);
    }

    #[test]
    fn test_new_rejects_dir_and_file_together() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/etc/catalog");
        env.set(CONFIG_FILE_ENV, "/etc/catalog.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_requires_default_toml() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = config_dir(&[]);

        let err = ConfigLoader::from_dir(dir.path()).load().unwrap_err();
        match err {
            ConfigError::FileNotFound(path) => assert!(path.contains("default.toml")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_default_only() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = config_dir(&[("default.toml", DEFAULT_TOML)]);

        let settings = ConfigLoader::from_dir(dir.path()).load().unwrap();
        assert_eq!(settings.application.name, "catalog-test");
        assert_eq!(settings.server.address(), "0.0.0.0:3000");
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.search.default_page_size, 10);
        assert_eq!(settings.search.max_page_size, 50);
    }

    #[test]
    fn test_load_layers_environment_then_local() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", "[server]\nport = 80\n[logger]\nlevel = \"warn\"\n"),
            ("local.toml", "[server]\nport = 8081\n"),
        ]);

        let settings = ConfigLoader::from_dir(dir.path())
            .with_environment(Environment::Production)
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.logger.level, "warn");
    }

    #[test]
    fn test_load_ignores_other_environment_files() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("staging.toml", "[server]\nport = 9999\n"),
        ]);

        let settings = ConfigLoader::from_dir(dir.path())
            .with_environment(Environment::Test)
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_env_vars_override_files() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set("CATALOG_SERVER__PORT", "7070");
        env.set("CATALOG_SEARCH__MAX_PAGE_SIZE", "40");
        let dir = config_dir(&[("default.toml", DEFAULT_TOML)]);

        let settings = ConfigLoader::from_dir(dir.path()).load().unwrap();
        assert_eq!(settings.server.port, 7070);
        assert_eq!(settings.search.max_page_size, 40);
    }

    #[test]
    fn test_single_file_skips_layers() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = config_dir(&[
            ("custom.toml", DEFAULT_TOML),
            ("local.toml", "[server]\nport = 8081\n"),
        ]);

        let settings = ConfigLoader::from_file(dir.path().join("custom.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_load_validates_result() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = config_dir(&[(
            "default.toml",
            "[database]\nurl = \"postgres://localhost/c\"\n[search]\ndefault_page_size = 0\n",
        )]);

        match ConfigLoader::from_dir(dir.path()).load() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "search.default_page_size")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }
}
