//! Configuration - Storage keys, notifier and rating settings.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! data_dir = "/var/lib/beacon"
//!
//! [storage_keys]
//! incidents = "incidentes"
//!
//! [notifier]
//! poll_interval_ms = 1000
//! enabled = true
//! alert_kinds = ["robo", "sospechoso"]
//!
//! [rating]
//! min_score = 1
//! max_score = 5
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::IncidentKind;
use crate::rating::ScoreRange;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidScoreRange { min: u8, max: u8 },
    MissingDataDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid config: {}", err),
            ConfigError::InvalidScoreRange { min, max } => {
                write!(f, "rating min_score {} is above max_score {}", min, max)
            }
            ConfigError::MissingDataDir => write!(f, "data_dir is not configured"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub incidents: String,
    pub tips: String,
    pub recommendations: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            incidents: "incidentes".to_string(),
            tips: "consejos-storage".to_string(),
            recommendations: "recomendaciones-storage".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub poll_interval_ms: u64,
    /// The user's notification preference. When off, new records are marked
    /// but nothing is emitted.
    pub enabled: bool,
    /// Only notify about these kinds. Empty means every kind.
    pub alert_kinds: Vec<IncidentKind>,
    pub default_icon: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            enabled: true,
            alert_kinds: Vec::new(),
            default_icon: "/default-icon.png".to_string(),
        }
    }
}

impl NotifierConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wants(&self, kind: IncidentKind) -> bool {
        self.alert_kinds.is_empty() || self.alert_kinds.contains(&kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub min_score: u8,
    pub max_score: u8,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            min_score: 1,
            max_score: 5,
        }
    }
}

impl RatingConfig {
    pub fn score_range(&self) -> Result<ScoreRange<u8>, ConfigError> {
        ScoreRange::new(self.min_score, self.max_score).ok_or(ConfigError::InvalidScoreRange {
            min: self.min_score,
            max: self.max_score,
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    pub storage_keys: StorageKeys,
    pub notifier: NotifierConfig,
    pub rating: RatingConfig,
    /// Directory for the file-backed medium.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl BeaconConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BeaconConfig = toml::from_str(content)?;
        config.rating.score_range()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}
