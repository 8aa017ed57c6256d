//! TOML-backed tracker settings.
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration.

use crate::store::{DEFAULT_CALORIE_LIMIT, MAX_STORED_CALORIES};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tracker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Limit used when none has been persisted yet.
    #[serde(default = "default_calorie_limit")]
    pub default_calorie_limit: i64,
    /// Database file; callers pick a platform location when unset.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Absolute log directory; file logging is off when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_calorie_limit() -> i64 {
    DEFAULT_CALORIE_LIMIT
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_calorie_limit: default_calorie_limit(),
            db_path: None,
            log_level: None,
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Loads settings from `path`; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_STORED_CALORIES).contains(&self.default_calorie_limit) {
            return Err(ConfigError::Invalid(format!(
                "default_calorie_limit must be within 0..={MAX_STORED_CALORIES}, got {}",
                self.default_calorie_limit
            )));
        }
        Ok(())
    }
}
