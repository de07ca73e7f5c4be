//! Layered CLI configuration.
//!
//! Sources, lowest precedence first: built-in defaults, optional `todo.toml`
//! in the working directory, `TODO_*` environment variables (`__` separates
//! sections, e.g. `TODO_DATABASE__PATH`). Command-line flags override the
//! result in `main`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use todo_core::default_log_level;

const DEFAULT_DB_PATH: &str = "todo.sqlite3";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    pub level: String,
    /// File logging is enabled only when set.
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Request {
    pub timeout_ms: u64,
}

impl Request {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub logging: Logging,
    pub request: Request,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(
                File::with_name("todo.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("TODO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.path", DEFAULT_DB_PATH)?
            .set_default("logging.level", default_log_level().as_str())?
            .set_default("request.timeout_ms", DEFAULT_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, DEFAULT_DB_PATH, DEFAULT_TIMEOUT_MS};
    use std::time::Duration;

    #[test]
    fn defaults_fill_every_required_key() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.path.to_str(), Some(DEFAULT_DB_PATH));
        assert!(settings.logging.dir.is_none());
        assert_eq!(
            settings.request.timeout(),
            Duration::from_millis(DEFAULT_TIMEOUT_MS)
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .set_override("database.path", "/tmp/other.sqlite3")
            .unwrap()
            .set_override("logging.dir", "/tmp/todo-logs")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.path.to_str(), Some("/tmp/other.sqlite3"));
        assert_eq!(settings.logging.dir.as_deref(), Some("/tmp/todo-logs"));
    }
}
