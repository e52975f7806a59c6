//! Stage traits for the Colloquy parse pipeline.
//!
//! - `Transformer`: raw JSON tree in, typed `Session` out (or a coercion failure)
//! - `Validator`: typed graph in, success or every constraint violation
//!
//! The pipeline runs them strictly in that order. Both are also usable on
//! their own by callers that already hold a raw tree or a typed graph.

use serde_json::Value;

use colloquy_contracts::{
    entity::Session,
    error::{TransformError, ValidationError},
    schema::Schema,
};

/// Builds a typed session graph from an untyped tree.
///
/// Implementations must not mutate the input and must drop every key the
/// schema does not declare. Constraint checks are deferred to the
/// `Validator`; only coercion failures are reported here.
pub trait Transformer: Send + Sync {
    fn transform(&self, raw: &Value) -> Result<Session, TransformError>;
}

/// Checks every declared constraint on a typed graph.
///
/// Implementations descend into nested nodes and report child violations
/// under the parent's property path. Validation never alters the graph.
pub trait Validator: Send + Sync {
    fn validate(&self, root: &dyn Schema) -> Result<(), ValidationError>;
}
