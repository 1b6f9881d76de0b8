//! Runtime configuration
//!
//! Scheduler tunables and the deck timestamp pattern. Loaded from TOML:
//! ```toml
//! time_format = "%Y-%m-%d %H:%M"
//! reply_delay_ms = 250
//!
//! [scheduler]
//! max_leeches = 4
//! growth_rate = 1.5
//! ```
//! Any key left out falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::storage::{format_timestamp, read_timestamp, DELIM};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// 2001-02-03 04:05:06 UTC, every field distinct
const SAMPLE_INSTANT: i64 = 981_173_106;

/// Which timestamp a reschedule is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// New due time is `created_at + new interval`
    #[default]
    Created,
    /// New due time is the old due time pushed forward by the new interval
    Due,
}

/// Tunables for the scheduler. Times are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of times a mature card can be failed before it is excluded
    pub max_leeches: u8,
    /// Minimum interval for a failure to count as a leech
    pub leech_age: i64,
    /// Interval floor, and the step used for cards that are still young
    pub minimum_increase: i64,
    /// Interval multiplier on pass, should be > 1
    pub growth_rate: f64,
    /// Interval multiplier on fail, should be < 1
    pub shrink_rate: f64,
    /// Deck timestamps only keep minutes, so an interval this close to
    /// `minimum_increase` still counts as having reached it
    pub rounding_slack: i64,
    pub anchor: Anchor,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_leeches: 4,
            leech_age: 5 * 24 * 3600,
            minimum_increase: 24 * 3600,
            growth_rate: 1.5,
            shrink_rate: 0.66,
            rounding_slack: 60,
            anchor: Anchor::Created,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    /// strftime pattern used to both parse and render deck timestamps
    pub time_format: String,
    /// Pause before reopening the answer pipe so the writer can close it
    pub reply_delay_ms: u64,
    /// Appended to deck paths when writing in debug mode
    pub debug_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            time_format: "%Y年%m月%d日%H時%M分".to_string(),
            reply_delay_ms: 500,
            debug_suffix: ".debug".to_string(),
        }
    }
}

impl Config {
    /// Default location: `$CONFIG_DIR/oboeru/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("oboeru").join("config.toml"))
    }

    /// Load an explicit config file, or the default one if it exists,
    /// or fall back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.scheduler;
        if !(s.growth_rate > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "growth_rate must be > 1, got {}",
                s.growth_rate
            )));
        }
        if !(s.shrink_rate > 0.0 && s.shrink_rate < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "shrink_rate must be between 0 and 1, got {}",
                s.shrink_rate
            )));
        }
        if s.minimum_increase <= 0 {
            return Err(ConfigError::Invalid(format!(
                "minimum_increase must be positive, got {}",
                s.minimum_increase
            )));
        }
        if s.rounding_slack < 0 {
            return Err(ConfigError::Invalid(format!(
                "rounding_slack must not be negative, got {}",
                s.rounding_slack
            )));
        }

        if self.time_format.is_empty() {
            return Err(ConfigError::Invalid("time_format is empty".to_string()));
        }
        if self.time_format.contains(DELIM) {
            return Err(ConfigError::Invalid(
                "time_format must not contain a tab".to_string(),
            ));
        }
        // chrono panics when rendering with a broken pattern, so reject it up front
        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid(format!(
                "time_format is not a valid strftime pattern: {}",
                self.time_format
            )));
        }
        // Decks are rewritten with the pattern they were read with
        let rendered = format_timestamp(SAMPLE_INSTANT, &self.time_format);
        let reread = read_timestamp(&rendered, &self.time_format)
            .map(|seconds| format_timestamp(seconds, &self.time_format));
        if reread.as_deref() != Ok(rendered.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "time_format does not read back what it writes: {}",
                self.time_format
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduler.max_leeches, 4);
        assert_eq!(config.scheduler.leech_age, 432000);
        assert_eq!(config.scheduler.minimum_increase, 86400);
        assert_eq!(config.reply_delay_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reply_delay_ms = 10").unwrap();
        writeln!(file, "[scheduler]").unwrap();
        writeln!(file, "growth_rate = 2.0").unwrap();
        writeln!(file, "anchor = \"due\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.reply_delay_ms, 10);
        assert_eq!(config.scheduler.growth_rate, 2.0);
        assert_eq!(config.scheduler.anchor, Anchor::Due);
        assert_eq!(config.scheduler.shrink_rate, 0.66);
        assert_eq!(config.time_format, "%Y年%m月%d日%H時%M分");
    }

    #[test]
    fn test_rejects_bad_rates() {
        let mut config = Config::default();
        config.scheduler.growth_rate = 0.9;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scheduler.shrink_rate = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_time_format() {
        let mut config = Config::default();
        config.time_format = "%Y\t%m".to_string();
        assert!(config.validate().is_err());

        config.time_format = "%Q".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_time_format_must_read_back() {
        let mut config = Config::default();
        config.time_format = "%Y-%m-%d".to_string();
        assert!(config.validate().is_ok());

        config.time_format = "%Y-%m-%d %H:%M".to_string();
        assert!(config.validate().is_ok());

        // drops the date entirely
        config.time_format = "%H:%M".to_string();
        assert!(config.validate().is_err());

        // hour without minutes reads back as midnight
        config.time_format = "%Y-%m-%d %H".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
