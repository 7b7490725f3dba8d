//! STP module configuration.
//!
//! Loaded from TOML, e.g. `/etc/sonic/sai_stp.toml`:
//!
//! ```toml
//! instance_id_min = 1
//! instance_id_max = 64
//! default_vlan = 1
//! log_level = "notice"
//! ```
//!
//! Every field is optional and falls back to its default.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use sonic_types::VlanId;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest MSTP instance id the SDK accepts.
pub const SDK_INSTANCE_ID_CEILING: u16 = 4094;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// STP module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StpConfig {
    /// Lowest valid MSTP instance id.
    #[serde(default = "default_instance_id_min")]
    pub instance_id_min: u16,

    /// Highest valid MSTP instance id.
    #[serde(default = "default_instance_id_max")]
    pub instance_id_max: u16,

    /// VLAN bound to the default instance at initialization.
    #[serde(default = "default_vlan")]
    pub default_vlan: VlanId,

    /// Initial module verbosity.
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_instance_id_min() -> u16 {
    1
}

fn default_instance_id_max() -> u16 {
    64
}

fn default_vlan() -> VlanId {
    VlanId::DEFAULT
}

impl Default for StpConfig {
    fn default() -> Self {
        Self {
            instance_id_min: default_instance_id_min(),
            instance_id_max: default_instance_id_max(),
            default_vlan: default_vlan(),
            log_level: LogLevel::default(),
        }
    }
}

impl StpConfig {
    /// Default configuration with the instance id range `[min, max]`.
    pub fn with_instance_range(min: u16, max: u16) -> Self {
        Self {
            instance_id_min: min,
            instance_id_max: max,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Number of instance ids in the configured range.
    pub fn capacity(&self) -> usize {
        usize::from(self.instance_id_max.saturating_sub(self.instance_id_min)) + 1
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_id_min == 0 {
            return Err(ConfigError::Invalid(
                "instance_id_min must be > 0".to_string(),
            ));
        }

        if self.instance_id_min > self.instance_id_max {
            return Err(ConfigError::Invalid(format!(
                "instance_id_min {} exceeds instance_id_max {}",
                self.instance_id_min, self.instance_id_max
            )));
        }

        if self.instance_id_max > SDK_INSTANCE_ID_CEILING {
            return Err(ConfigError::Invalid(format!(
                "instance_id_max must be <= {}",
                SDK_INSTANCE_ID_CEILING
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = StpConfig::default();
        assert_eq!(config.instance_id_min, 1);
        assert_eq!(config.instance_id_max, 64);
        assert_eq!(config.default_vlan, VlanId::DEFAULT);
        assert_eq!(config.log_level, LogLevel::Warning);
        assert_eq!(config.capacity(), 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = StpConfig::from_toml_str("instance_id_max = 4\nlog_level = \"debug\"").unwrap();
        assert_eq!(config.instance_id_min, 1);
        assert_eq!(config.instance_id_max, 4);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.capacity(), 4);
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            StpConfig::with_instance_range(0, 4).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StpConfig::with_instance_range(5, 4).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StpConfig::with_instance_range(1, 4095).validate(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            StpConfig::from_toml_str("default_vlan = 4095"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            StpConfig::from_toml_str("unknown_field = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "instance_id_min = 2").unwrap();
        writeln!(file, "instance_id_max = 8").unwrap();
        writeln!(file, "default_vlan = 100").unwrap();

        let config = StpConfig::from_file(file.path()).unwrap();
        assert_eq!(config.instance_id_min, 2);
        assert_eq!(config.instance_id_max, 8);
        assert_eq!(config.default_vlan.as_u16(), 100);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StpConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
