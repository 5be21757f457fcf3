// Runtime configuration loaded from TOML

use crate::runtime::equality::NumericComparison;
use crate::runtime::inspect::InspectOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {variable}: {value}")]
    InvalidEnv { variable: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Integer versus float ordering mode
    pub numeric_comparison: NumericComparison,

    /// `tracing` filter used by the CLI when `RUST_LOG` is unset
    pub log_filter: String,

    pub inspect: InspectOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            numeric_comparison: NumericComparison::Approximate,
            log_filter: "warn".to_string(),
            inspect: InspectOptions::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Applies `BOXTERM_NUMERIC_COMPARISON` and `BOXTERM_LOG` on top of this config.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(mode) = std::env::var("BOXTERM_NUMERIC_COMPARISON") {
            self.numeric_comparison = match mode.as_str() {
                "approximate" => NumericComparison::Approximate,
                "exact" => NumericComparison::Exact,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        variable: "BOXTERM_NUMERIC_COMPARISON".to_string(),
                        value: mode,
                    })
                }
            };
        }
        if let Ok(filter) = std::env::var("BOXTERM_LOG") {
            self.log_filter = filter;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.inspect.max_depth, 32);
    }

    #[test]
    fn parses_all_keys() {
        let config = RuntimeConfig::from_toml_str(
            r#"
numeric_comparison = "exact"
log_filter = "boxterm=debug"

[inspect]
max_depth = 4
"#,
        )
        .unwrap();
        assert_eq!(config.numeric_comparison, NumericComparison::Exact);
        assert_eq!(config.log_filter, "boxterm=debug");
        assert_eq!(config.inspect.max_depth, 4);
    }

    #[test]
    fn rejects_unknown_comparison_mode() {
        let result = RuntimeConfig::from_toml_str("numeric_comparison = \"fuzzy\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "numeric_comparison = \"exact\"").unwrap();
        let config = RuntimeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.numeric_comparison, NumericComparison::Exact);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = RuntimeConfig::from_file("/nonexistent/boxterm.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
