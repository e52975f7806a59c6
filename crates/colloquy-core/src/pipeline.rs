//! The session pipeline: transform, then validate.
//!
//!   raw tree → Transformer → typed Session → Validator → Session
//!
//! The stages never interleave. A transform failure returns immediately and
//! the validator is not called; a validation failure carries every violation
//! found in the graph.

use serde_json::Value;
use tracing::{debug, info, warn};

use colloquy_contracts::{
    entity::Session,
    error::{SessionError, SessionResult},
};

use crate::traits::{Transformer, Validator};

/// Owns one transformer and one validator and runs them in order.
///
/// Holds no per-call state, so one pipeline can serve any number of
/// concurrent `run` calls on independent inputs.
pub struct SessionPipeline {
    transformer: Box<dyn Transformer>,
    validator: Box<dyn Validator>,
}

impl SessionPipeline {
    pub fn new(transformer: Box<dyn Transformer>, validator: Box<dyn Validator>) -> Self {
        Self { transformer, validator }
    }

    /// Transform `raw` into a `Session` and validate it.
    ///
    /// # Errors
    ///
    /// `SessionError::Transform` if the tree cannot be coerced (validation is
    /// then skipped), `SessionError::Validation` if the typed graph breaks any
    /// constraint.
    pub fn run(&self, raw: &Value) -> SessionResult<Session> {
        debug!("session pipeline starting");

        // ── Stage 1: Transform ───────────────────────────────────────────────
        let session = match self.transformer.transform(raw) {
            Ok(session) => session,
            Err(err) => {
                warn!(
                    target_type = err.target,
                    path = %err.path,
                    error = %err.message,
                    "transform failed, validation skipped"
                );
                return Err(SessionError::Transform(err));
            }
        };

        let records = session.records().len();
        debug!(records, "transform complete, validating");

        // ── Stage 2: Validate ────────────────────────────────────────────────
        if let Err(err) = self.validator.validate(&session) {
            warn!(
                violations = err.violations.len(),
                properties = %err.property_list(),
                "session failed validation"
            );
            return Err(SessionError::Validation(err));
        }

        info!(records, "session validated");
        Ok(session)
    }

    /// Async form of [`SessionPipeline::run`].
    ///
    /// The work is CPU-bound and performs no I/O; the `async` signature is an
    /// interface convention for callers living in an async runtime.
    pub async fn parse(&self, raw: &Value) -> SessionResult<Session> {
        self.run(raw)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use serde_json::{json, Value};

    use colloquy_contracts::{
        entity::Session,
        error::{SessionError, TransformError, ValidationError, Violation},
        schema::Schema,
    };

    use crate::traits::{Transformer, Validator};

    use super::SessionPipeline;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A transformer that returns a pre-configured outcome.
    struct MockTransformer {
        fail: bool,
    }

    impl Transformer for MockTransformer {
        fn transform(&self, _raw: &Value) -> Result<Session, TransformError> {
            if self.fail {
                Err(TransformError {
                    target: "Session",
                    path: "chatLogs[0].timestamp".to_string(),
                    message: "invalid timestamp".to_string(),
                })
            } else {
                Ok(Session::default())
            }
        }
    }

    /// A validator that counts calls and optionally reports one violation.
    struct CountingValidator {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Validator for CountingValidator {
        fn validate(&self, root: &dyn Schema) -> Result<(), ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(root.type_name(), "Session");
            if self.fail {
                Err(ValidationError {
                    title: "Session validation failed".to_string(),
                    violations: vec![Violation {
                        property: "chatLogs".to_string(),
                        constraint: "nested",
                        message: "bad".to_string(),
                    }],
                })
            } else {
                Ok(())
            }
        }
    }

    fn pipeline(transform_fails: bool, validate_fails: bool) -> (SessionPipeline, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = SessionPipeline::new(
            Box::new(MockTransformer { fail: transform_fails }),
            Box::new(CountingValidator {
                calls: Arc::clone(&calls),
                fail: validate_fails,
            }),
        );
        (pipeline, calls)
    }

    // ── Ordering ─────────────────────────────────────────────────────────────

    /// A successful transform is always followed by exactly one validation.
    #[test]
    fn test_success_runs_both_stages() {
        let (pipeline, calls) = pipeline(false, false);
        let session = pipeline.run(&json!({})).unwrap();
        assert_eq!(session, Session::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// The validator must never see input whose transform failed.
    #[test]
    fn test_transform_failure_skips_validation() {
        let (pipeline, calls) = pipeline(true, false);
        let err = pipeline.run(&json!({})).unwrap_err();
        assert!(matches!(err, SessionError::Transform(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Validation failures surface as their own error class.
    #[test]
    fn test_validation_failure_is_distinguishable() {
        let (pipeline, calls) = pipeline(false, true);
        match pipeline.run(&json!({})).unwrap_err() {
            SessionError::Validation(err) => assert_eq!(err.properties(), vec!["chatLogs"]),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parse_matches_run() {
        let (pipeline, _) = pipeline(false, false);
        let session = pipeline.parse(&json!({})).await.unwrap();
        assert!(session.records().is_empty());
    }
}
