//! Configuration file support for the toaster.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/toaster/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub inputs: InputConfig,
}

/// Countdown and polling cadence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Length of one countdown tick in milliseconds (one "second" of toasting)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// How often the consumer drains the event channel
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            poll_ms: default_poll_ms(),
        }
    }
}

impl TimingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

/// Control input handling
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct InputConfig {
    /// Reject finite inputs outside [0, 10] instead of letting them fall to zero membership
    #[serde(default)]
    pub strict_range: bool,
}

// Default value functions
fn default_tick_ms() -> u64 {
    1000
}

fn default_poll_ms() -> u64 {
    100
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or_else(|| Error::Config("Unable to locate a config directory".into()))?;
        Ok(base.join("toaster").join("config.toml"))
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.timing.poll_ms == 0 {
            return Err(Error::Config("timing.poll_ms must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timing.tick_ms, 1000);
        assert_eq!(config.timing.poll_ms, 100);
        assert!(!config.inputs.strict_range);
        assert_eq!(config.timing.tick(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.timing.tick_ms = 5;
        config.inputs.strict_range = true;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[inputs]\nstrict_range = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.inputs.strict_range);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[timing]
tick_ms = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timing.tick_ms, 10);
        assert_eq!(config.timing.poll_ms, 100); // default
        assert!(!config.inputs.strict_range);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[timing]\npoll_ms = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_config_is_toml_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[timing\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
