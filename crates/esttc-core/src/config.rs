//! Transmitter configuration
//!
//! Where to send frames and which defaults a front end should offer, stored as
//! JSON:
//!
//! ```text
//! ~/.config/esttc-uplink/config.json
//! {
//!   "destination": { "host": "127.0.0.1", "port": 52001 },
//!   "baud_rate": 9600,
//!   "interval_multiple": 1,
//!   "duration_secs": 10
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::timing::{BaudRate, TimingError, TimingPolicy, MAX_INTERVAL_MULTIPLE};
use crate::transmit::DURATION_RANGE_SECS;

/// Default UDP port of the modulator flowgraph
pub const DEFAULT_PORT: u16 = 52001;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot resolve destination '{0}'")]
    InvalidDestination(String),

    #[error("Could not find a configuration directory")]
    NoConfigDir,

    #[error("Invalid default: {0}")]
    InvalidDefault(String),
}

/// Where the modulator listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSettings {
    /// Host name or IP address
    pub host: String,

    /// UDP port
    pub port: u16,
}

impl Default for DestinationSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Transmitter configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterConfig {
    /// Modulator address
    pub destination: DestinationSettings,

    /// Default link speed
    pub baud_rate: BaudRate,

    /// Default interval as a multiple of the minimum (1-10)
    pub interval_multiple: u8,

    /// Default run length in seconds
    pub duration_secs: u32,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            destination: DestinationSettings::default(),
            baud_rate: BaudRate::B9600,
            interval_multiple: 1,
            duration_secs: 10,
        }
    }
}

impl TransmitterConfig {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("esttc-uplink").join("config.json"))
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: TransmitterConfig = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded transmitter config");
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration as pretty-printed JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check the defaults are ones a plan would accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DURATION_RANGE_SECS.contains(&self.duration_secs) {
            return Err(ConfigError::InvalidDefault(format!(
                "duration_secs {} out of range (0-300)",
                self.duration_secs
            )));
        }
        if !(1..=MAX_INTERVAL_MULTIPLE).contains(&self.interval_multiple) {
            return Err(ConfigError::InvalidDefault(format!(
                "interval_multiple {} out of range (1-10)",
                self.interval_multiple
            )));
        }
        Ok(())
    }

    /// Timing policy for the configured baud rate
    pub fn timing_policy(&self) -> TimingPolicy {
        TimingPolicy::for_baud(self.baud_rate)
    }

    /// Interval implied by the configured baud rate and multiple
    pub fn default_interval_ms(&self) -> Result<u64, TimingError> {
        self.timing_policy()
            .interval_for_multiple(self.interval_multiple)
    }

    /// Resolve the destination to a socket address
    pub fn destination_addr(&self) -> Result<SocketAddr, ConfigError> {
        let target = format!("{}:{}", self.destination.host, self.destination.port);
        target
            .to_socket_addrs()
            .map_err(|_| ConfigError::InvalidDestination(target.clone()))?
            .next()
            .ok_or(ConfigError::InvalidDestination(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransmitterConfig::default();
        assert_eq!(config.destination.port, 52001);
        assert_eq!(
            config.destination_addr().unwrap(),
            "127.0.0.1:52001".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.default_interval_ms(), Ok(286));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TransmitterConfig = serde_json::from_str(r#"{"baud_rate": 1200}"#).unwrap();
        assert_eq!(config.baud_rate, BaudRate::B1200);
        assert_eq!(config.destination, DestinationSettings::default());
        assert_eq!(config.duration_secs, 10);
    }

    #[test]
    fn test_unsupported_baud_in_json() {
        let result: Result<TransmitterConfig, _> = serde_json::from_str(r#"{"baud_rate": 300}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_defaults() {
        let config = TransmitterConfig {
            duration_secs: 301,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDefault(_))
        ));

        let config = TransmitterConfig {
            interval_multiple: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
