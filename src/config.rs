//! Layered configuration: defaults, YAML file, environment, command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::code::generator::DEFAULT_MAX_ATTEMPTS;
use crate::error::ConfigError;

/// Config file read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "schoolcode.yaml";

/// Overrides [`StoreConfig::path`].
pub const ENV_DB: &str = "SCHOOLCODE_DB";

/// Overrides [`GeneratorConfig::max_attempts`].
pub const ENV_MAX_ATTEMPTS: &str = "SCHOOLCODE_MAX_ATTEMPTS";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Retry policy.
    pub generator: GeneratorConfig,
    /// Registry location.
    pub store: StoreConfig,
}

/// Retry policy for code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Store checks per generation before giving up.
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

/// SQLite registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file.
    pub path: PathBuf,
    /// How long a writer waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(".schoolcode/codes.sqlite3"), busy_timeout_ms: 5000 }
    }
}

impl StoreConfig {
    /// Busy timeout as a [`Duration`].
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Config {
    /// Loads defaults, then the config file, then process environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `schoolcode.yaml` in the
    /// working directory is used when present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, an
    /// override is malformed, or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Parses YAML text. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if an override cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB).filter(|v| !v.is_empty()) {
            self.store.path = PathBuf::from(db);
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.generator.max_attempts = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Env { name: ENV_MAX_ATTEMPTS, value: raw })?;
        }
        Ok(())
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.max_attempts == 0 {
            return Err(ConfigError::Invalid("generator.max_attempts must be at least 1".into()));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.path must not be empty".into()));
        }
        Ok(())
    }
}
