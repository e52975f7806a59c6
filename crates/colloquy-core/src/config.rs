//! TOML pipeline configuration.
//!
//! ```toml
//! [transform]
//! null_as_unset = true
//! implicit_conversion = true
//!
//! [validate]
//! stop_at_first_error = false
//! id_format = "uuid"          # or "object-id"
//! title = "Session validation failed"
//! ```
//!
//! Every key is optional; missing keys take the stage defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use colloquy_contracts::{
    error::ConfigError,
    options::{TransformOptions, ValidatorOptions},
};

/// Options for both pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub transform: TransformOptions,
    pub validate: ValidatorOptions,
}

impl PipelineConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `ConfigError` if the TOML is malformed or a key has the wrong
    /// type or an unknown enum value.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(s).map_err(|e| ConfigError {
            reason: format!("failed to parse pipeline TOML: {}", e),
        })?;
        debug!(?config, "pipeline configuration loaded");
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use colloquy_contracts::options::IdFormat;

    use super::PipelineConfig;

    /// An empty document yields the defaults for both stages.
    #[test]
    fn test_empty_document_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(config.transform.null_as_unset);
        assert!(config.transform.implicit_conversion);
        assert!(!config.validate.stop_at_first_error);
        assert_eq!(config.validate.id_format, IdFormat::Uuid);
    }

    /// Partial tables override only the keys they name.
    #[test]
    fn test_partial_override() {
        let toml = r#"
            [transform]
            implicit_conversion = false

            [validate]
            stop_at_first_error = true
            id_format = "object-id"
        "#;

        let config = PipelineConfig::from_toml_str(toml).unwrap();
        assert!(config.transform.null_as_unset);
        assert!(!config.transform.implicit_conversion);
        assert!(config.validate.stop_at_first_error);
        assert_eq!(config.validate.id_format, IdFormat::ObjectId);
        assert_eq!(config.validate.title, "Session validation failed");
    }

    #[test]
    fn test_unknown_id_format_rejected() {
        let err = PipelineConfig::from_toml_str("[validate]\nid_format = \"ulid\"\n").unwrap_err();
        assert!(err.to_string().contains("configuration error"));
        assert!(err.reason.contains("failed to parse pipeline TOML"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = PipelineConfig::from_file(Path::new("/nonexistent/colloquy.toml")).unwrap_err();
        assert!(err.reason.contains("/nonexistent/colloquy.toml"));
    }
}
