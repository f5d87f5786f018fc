//! Driver configuration loading.
//!
//! TOML configuration for a single driver instance: the port name,
//! the controller backend to attach, the startup log level and the
//! periodic lock-check interval used by the binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, DriverResult};
use crate::logging::LogLevel;

/// Configuration for one driver instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Unique port/unit identifier.
    pub port: String,

    /// Controller backend name (e.g. "simulation").
    #[serde(default = "default_controller")]
    pub controller: String,

    /// Startup log level in raw form (0: Debug, 1: Warning, 2: Error,
    /// 3: None).
    #[serde(default)]
    pub log_level: u8,

    /// Interval between periodic CHECK triggers in milliseconds.
    /// 0 disables the periodic check.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
}

fn default_controller() -> String {
    "simulation".to_string()
}

fn default_check_interval_ms() -> u64 {
    1000
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            controller: default_controller(),
            log_level: 0,
            check_interval_ms: default_check_interval_ms(),
        }
    }
}

impl DriverConfig {
    /// Parse and validate a configuration from TOML content.
    pub fn from_toml(content: &str) -> DriverResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DriverError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> DriverResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DriverError::Config(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content)
    }

    /// Validate field constraints.
    ///
    /// # Errors
    /// Returns `DriverError::Config` naming the offending field.
    pub fn validate(&self) -> DriverResult<()> {
        if self.port.is_empty() {
            return Err(DriverError::Config("port must not be empty".to_string()));
        }
        if self.controller.is_empty() {
            return Err(DriverError::Config(
                "controller must not be empty".to_string(),
            ));
        }
        if LogLevel::from_raw(self.log_level as i64).is_none() {
            return Err(DriverError::Config(format!(
                "log_level {} out of range (expected 0-3)",
                self.log_level
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
    fn parse_minimal_config_applies_defaults() {
        let config = DriverConfig::from_toml("port = \"llrf0\"").expect("should parse");
        assert_eq!(config.port, "llrf0");
        assert_eq!(config.controller, "simulation");
        assert_eq!(config.log_level, 0);
        assert_eq!(config.check_interval_ms, 1000);
    }

    #[test]
    fn parse_full_config() {
        let content = r#"
            port = "llrf1"
            controller = "simulation"
            log_level = 2
            check_interval_ms = 250
        "#;
        let config = DriverConfig::from_toml(content).expect("should parse");
        assert_eq!(config.port, "llrf1");
        assert_eq!(config.log_level, 2);
        assert_eq!(config.check_interval_ms, 250);
    }

    #[test]
    fn empty_port_is_rejected() {
        let result = DriverConfig::from_toml("port = \"\"");
        assert!(matches!(result, Err(DriverError::Config(_))));
    }

    #[test]
    fn out_of_range_log_level_is_rejected() {
        let result = DriverConfig::from_toml("port = \"llrf0\"\nlog_level = 7");
        assert!(matches!(result, Err(DriverError::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = \"llrf0\"\ncheck_interval_ms = 500").expect("write");

        let config = DriverConfig::load(file.path()).expect("should load");
        assert_eq!(config.port, "llrf0");
        assert_eq!(config.check_interval_ms, 500);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let result = DriverConfig::load(Path::new("/nonexistent/llrf.toml"));
        assert!(matches!(result, Err(DriverError::Config(_))));
    }
}
