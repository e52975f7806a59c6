//! Error types for the Colloquy parse pipeline.
//!
//! The two stage errors are disjoint: a [`TransformError`] means the raw tree
//! could not be coerced into the declared shape at all, a [`ValidationError`]
//! means the typed graph was built but breaks one or more constraints.
//! [`SessionError`] lets callers match on which stage failed.

use thiserror::Error;

/// The raw tree could not be coerced into the target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to transform raw data into {target} at '{path}': {message}")]
pub struct TransformError {
    /// Root type the caller asked for (e.g. `"Session"`).
    pub target: &'static str,
    /// Dotted/bracket path of the failing field; empty for the root itself.
    pub path: String,
    /// The underlying coercion failure.
    pub message: String,
}

/// One failed constraint on one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted/bracket path, e.g. `chatLogs[1].data.text`.
    pub property: String,
    /// Constraint name, e.g. `notEmpty`.
    pub constraint: &'static str,
    pub message: String,
}

/// Every constraint violation found in a typed graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{title}: {}", join_properties(.violations))]
pub struct ValidationError {
    pub title: String,
    /// Violations in discovery order (depth-first, declaration order).
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Separator used by [`ValidationError::property_list`] and `Display`.
    pub const SEPARATOR: &'static str = ", ";

    /// Offending property paths, in order, each listed once.
    pub fn properties(&self) -> Vec<&str> {
        distinct_properties(&self.violations)
    }

    /// The property paths joined with [`ValidationError::SEPARATOR`].
    pub fn property_list(&self) -> String {
        self.properties().join(Self::SEPARATOR)
    }

    /// True if any violation is reported at exactly `property`.
    pub fn has_property(&self, property: &str) -> bool {
        self.violations.iter().any(|v| v.property == property)
    }
}

fn distinct_properties(violations: &[Violation]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(violations.len());
    for v in violations {
        if !seen.contains(&v.property.as_str()) {
            seen.push(&v.property);
        }
    }
    seen
}

fn join_properties(violations: &[Violation]) -> String {
    distinct_properties(violations).join(ValidationError::SEPARATOR)
}

/// Failure of a full transform-then-validate run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience alias used by the pipeline and its callers.
pub type SessionResult<T> = Result<T, SessionError>;

/// Pipeline configuration could not be loaded.
#[derive(Debug, Error)]
#[error("configuration error: {reason}")]
pub struct ConfigError {
    pub reason: String,
}
