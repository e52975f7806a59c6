//! Options recognized by the transform and validate stages.
//!
//! Both structs deserialize with every key defaulted, so a partial TOML
//! table (or none at all) yields the standard behaviour.

use serde::{Deserialize, Serialize};

/// How the transformer coerces raw values.
///
/// Undeclared keys are always dropped; that is not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Treat an explicit JSON `null` as if the key were absent. When false,
    /// `null` on a declared field is a coercion failure.
    pub null_as_unset: bool,
    /// Parse numeric strings (e.g. `"12.5"`) into number fields.
    pub implicit_conversion: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            null_as_unset: true,
            implicit_conversion: true,
        }
    }
}

/// Accepted identifier shape for `idFormat` fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdFormat {
    /// Any RFC 4122 UUID in hyphenated form.
    #[default]
    Uuid,
    /// 24 hexadecimal characters.
    ObjectId,
}

/// How the validator walks the graph and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Stop at the first violation instead of collecting all of them.
    pub stop_at_first_error: bool,
    pub id_format: IdFormat,
    /// Title carried by the aggregated `ValidationError`.
    pub title: String,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            stop_at_first_error: false,
            id_format: IdFormat::default(),
            title: "Session validation failed".to_string(),
        }
    }
}
