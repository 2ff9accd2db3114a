//! Inference configuration
//!
//! Settings can be loaded from YAML:
//!
//! ```yaml
//! text_threshold: 80
//! detect_dates: false
//! ```

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strings at least this many characters long are classified as text
pub const DEFAULT_TEXT_THRESHOLD: usize = 50;

/// Tolerance when deciding whether a float holds an integer
pub const FLOATING_POINT_ERROR: f64 = 1e-9;

/// Classifier settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Character count from which a string becomes free text
    #[serde(default = "default_text_threshold")]
    pub text_threshold: usize,

    /// Try the date layouts before classifying strings by length
    #[serde(default = "default_true")]
    pub detect_dates: bool,
}

fn default_text_threshold() -> usize {
    DEFAULT_TEXT_THRESHOLD
}

fn default_true() -> bool {
    true
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            text_threshold: DEFAULT_TEXT_THRESHOLD,
            detect_dates: true,
        }
    }
}

impl InferenceConfig {
    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.text_threshold == 0 {
            return Err(Error::invalid_value(
                "text_threshold",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_mapping() {
        let config = InferenceConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, InferenceConfig::default());
        assert_eq!(config.text_threshold, 50);
        assert!(config.detect_dates);
    }

    #[test]
    fn test_parse_yaml() {
        let config = InferenceConfig::from_yaml_str("text_threshold: 80\ndetect_dates: false\n")
            .unwrap();
        assert_eq!(config.text_threshold, 80);
        assert!(!config.detect_dates);
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let err = InferenceConfig::from_yaml_str("text_threshold: 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(InferenceConfig::from_yaml_str("threshold: 10").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "text_threshold: 20").unwrap();

        let config = InferenceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.text_threshold, 20);

        let missing = InferenceConfig::from_file("/nonexistent/inference.yaml");
        assert!(matches!(missing, Err(Error::FileNotFound { .. })));
    }
}
