//! # colloquy
//!
//! Parse untrusted chat session JSON into a validated, typed session graph.
//!
//! ```rust,ignore
//! let session = colloquy::parse_session(&raw).await?;
//! for record in session.records() {
//!     println!("{:?}", record.data.as_ref().map(|d| d.kind()));
//! }
//! ```
//!
//! [`parse_session`] always transforms, then validates. The two stages stay
//! available on their own through [`transform_only`] and [`validate_only`]
//! for callers that already hold a raw subtree or a typed value.

use serde_json::Value;
use tracing::debug;

pub mod samples;

pub use colloquy_contracts::{entity, error, options, schema, vocab};
pub use colloquy_core::{PipelineConfig, SessionPipeline};
pub use colloquy_transform::{JsonTransformer, Transform};
pub use colloquy_validate::ConstraintValidator;

use colloquy_contracts::{
    entity::Session,
    error::{SessionResult, TransformError, ValidationError},
    options::{TransformOptions, ValidatorOptions},
    schema::Schema,
};
use colloquy_core::traits::Validator;

/// A pipeline wired with the standard transformer and validator.
pub fn default_pipeline(config: &PipelineConfig) -> SessionPipeline {
    SessionPipeline::new(
        Box::new(JsonTransformer::new(config.transform.clone())),
        Box::new(ConstraintValidator::new(config.validate.clone())),
    )
}

/// Transform and validate `raw` with default options.
pub async fn parse_session(raw: &Value) -> SessionResult<Session> {
    parse_session_with(raw, &PipelineConfig::default()).await
}

/// Transform and validate `raw` with the given stage options.
pub async fn parse_session_with(raw: &Value, config: &PipelineConfig) -> SessionResult<Session> {
    default_pipeline(config).parse(raw).await
}

/// Run only the transform stage, into any root type.
pub fn transform_only<T: Transform>(raw: &Value, options: &TransformOptions) -> Result<T, TransformError> {
    colloquy_transform::transform(raw, options)
}

/// Run only the validate stage. Hands `value` back unchanged on success.
pub fn validate_only<T: Schema>(value: T, options: &ValidatorOptions) -> Result<T, ValidationError> {
    debug!(root = value.type_name(), "validating typed value");
    ConstraintValidator::new(options.clone()).validate(&value)?;
    Ok(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::samples::{sample_exchange, with_sender, ANSWER_ID, RELOCATE_ID};
    use colloquy_contracts::{
        entity::{AnswerOption, Payload, PayloadKind, Prompt, QuestionKind},
        error::SessionError,
        options::IdFormat,
        vocab::{ButtonType, QuestionType, Sender, Term, TriggerAction},
    };

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn payload(session: &Session, index: usize) -> &Payload {
        session.records()[index].data.as_ref().unwrap()
    }

    fn expect_validation(result: SessionResult<Session>) -> ValidationError {
        match result {
            Err(SessionError::Validation(err)) => err,
            other => panic!("expected a validation failure, got {other:?}"),
        }
    }

    // ── Sample exchange ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_sample_exchange_parses() {
        let session = parse_session(&sample_exchange()).await.unwrap();
        assert_eq!(session.records().len(), 3);

        assert_eq!(payload(&session, 0).kind(), PayloadKind::HintPrompt);

        let answer = payload(&session, 1).candidate_answer().unwrap();
        assert_eq!(answer.id.as_deref(), Some(ANSWER_ID));
        let question = answer.question.as_ref().unwrap();
        assert_eq!(question.kind(), QuestionKind::ChoiceGroupPrompt);
        assert_eq!(question.prompt().id.as_deref(), Some(RELOCATE_ID));

        let mcq = payload(&session, 2);
        assert_eq!(mcq.kind(), PayloadKind::Prompt);
        let options = mcq.prompt().unwrap().options();
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| matches!(o, AnswerOption::Plain(_))));
    }

    #[tokio::test]
    async fn test_unknown_sender_fails_validation_not_transform() {
        let raw = with_sender(&sample_exchange(), 0, "UNKNOWN");
        let err = expect_validation(parse_session(&raw).await);
        assert!(err.has_property("chatLogs[0].sender"));
        assert_eq!(err.violations[0].constraint, "vocabulary");
    }

    #[test]
    fn test_with_sender_leaves_missing_index_alone() {
        let raw = sample_exchange();
        assert_eq!(with_sender(&raw, 9, "AGENT"), raw);
    }

    // ── Discrimination ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_candidate_sender_yields_candidate_answer() {
        let mut raw = sample_exchange();
        // Tag the answer's payload as a hint; the sender still decides.
        raw["chatLogs"][1]["data"]["types"] = json!(["HINT", "BUTTON_GROUP_QUESTION"]);
        let session = parse_session(&raw).await.unwrap();
        assert_eq!(payload(&session, 1).kind(), PayloadKind::CandidateAnswer);
    }

    #[tokio::test]
    async fn test_hint_wins_over_other_tags() {
        let mut raw = sample_exchange();
        raw["chatLogs"][2]["data"]["types"] = json!(["MCQ", "HINT"]);
        let session = parse_session(&raw).await.unwrap();
        assert_eq!(payload(&session, 2).kind(), PayloadKind::HintPrompt);
    }

    #[tokio::test]
    async fn test_button_group_payload_builds_choice_group_options() {
        let mut raw = sample_exchange();
        raw["chatLogs"][0]["data"] = raw["chatLogs"][1]["data"]["question"].clone();
        let session = parse_session(&raw).await.unwrap();

        let prompt = payload(&session, 0);
        assert_eq!(prompt.kind(), PayloadKind::ChoiceGroupPrompt);
        let options = prompt.prompt().unwrap().options();
        assert_eq!(options.len(), 2);
        let yes = options[0].as_choice_group().unwrap();
        assert_eq!(yes.triggers, Some(vec![Term::Known(TriggerAction::NextQuestion)]));
        assert_eq!(
            yes.style.as_ref().unwrap().button_type,
            Some(Term::Known(ButtonType::Primary))
        );
    }

    // ── Stage properties ─────────────────────────────────────────────────────

    /// Re-transforming the projection of a typed session gives the same session.
    #[tokio::test]
    async fn test_projection_round_trip_is_stable() {
        let first = parse_session(&sample_exchange()).await.unwrap();
        let projected = serde_json::to_value(&first).unwrap();
        let second = parse_session(&projected).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_extra_keys_tolerated_and_dropped() {
        let mut raw = sample_exchange();
        raw["tenant"] = json!("acme");
        raw["chatLogs"][0]["score"] = json!(0.93);
        raw["chatLogs"][1]["data"]["question"]["options"][0]["analytics"] = json!({ "clicks": 3 });

        let session = parse_session(&raw).await.unwrap();
        let projected = serde_json::to_value(&session).unwrap();
        assert!(projected.get("tenant").is_none());
        assert!(projected["chatLogs"][0].get("score").is_none());
        assert!(projected["chatLogs"][1]["data"]["question"]["options"][0]
            .get("analytics")
            .is_none());
    }

    #[tokio::test]
    async fn test_independent_violations_aggregated() {
        let mut raw = with_sender(&sample_exchange(), 0, "UNKNOWN");
        raw["chatLogs"][1]["data"]["text"] = json!("");
        let err = expect_validation(parse_session(&raw).await);
        assert_eq!(err.properties(), vec!["chatLogs[0].sender", "chatLogs[1].data.text"]);
    }

    #[tokio::test]
    async fn test_transform_failure_is_distinct() {
        let mut raw = sample_exchange();
        raw["chatLogs"][2]["timestamp"] = json!("five past nine");
        match parse_session(&raw).await {
            Err(SessionError::Transform(err)) => {
                assert_eq!(err.target, "Session");
                assert_eq!(err.path, "chatLogs[2].timestamp");
            }
            other => panic!("expected a transform failure, got {other:?}"),
        }
    }

    /// A NaN rule value would project to `null` and break re-parsing, so the
    /// session is refused before validation.
    #[tokio::test]
    async fn test_nan_rule_value_is_transform_failure() {
        let mut raw = sample_exchange();
        raw["chatLogs"][2]["data"]["rules"][0]["value"] = json!("NaN");
        match parse_session(&raw).await {
            Err(SessionError::Transform(err)) => {
                assert_eq!(err.path, "chatLogs[2].data.rules[0].value");
            }
            other => panic!("expected a transform failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parse_session_with_config() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [validate]
            id_format = "object-id"
            title = "Rejected session"
            "#,
        )
        .unwrap();
        let err = expect_validation(parse_session_with(&sample_exchange(), &config).await);
        assert!(err.to_string().starts_with("Rejected session: chatLogs[0].data.id"));
    }

    #[test]
    fn test_empty_session_is_valid() {
        let session: Session = transform_only(&json!({}), &TransformOptions::default()).unwrap();
        assert!(validate_only(session, &ValidatorOptions::default()).is_ok());
    }

    // ── Stage primitives ─────────────────────────────────────────────────────

    #[test]
    fn test_stage_primitives_compose_on_a_subtree() {
        let raw: Value = sample_exchange()["chatLogs"][2]["data"].clone();
        let prompt: Prompt = transform_only(&raw, &TransformOptions::default()).unwrap();
        assert!(prompt.has_type(QuestionType::Mcq));

        let validated = validate_only(prompt.clone(), &ValidatorOptions::default()).unwrap();
        assert_eq!(validated, prompt);

        let strict = ValidatorOptions {
            id_format: IdFormat::ObjectId,
            ..ValidatorOptions::default()
        };
        let err = validate_only(prompt, &strict).unwrap_err();
        assert_eq!(err.properties()[0], "id");
    }

    #[test]
    fn test_pipeline_shared_across_threads() {
        let pipeline = Arc::new(default_pipeline(&PipelineConfig::default()));
        let handles: Vec<_> = ["AGENT", "UNKNOWN", "CANDIDATE"]
            .into_iter()
            .map(|sender| {
                let pipeline = Arc::clone(&pipeline);
                std::thread::spawn(move || {
                    let raw = with_sender(&sample_exchange(), 2, sender);
                    pipeline.run(&raw).map(|s| s.records()[2].sender.clone())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0].as_ref().unwrap(), &Some(Term::Known(Sender::Agent)));
        assert!(matches!(results[1], Err(SessionError::Validation(_))));
        // Record 2 re-resolves as a candidate answer, which lacks the answer fields.
        assert!(matches!(results[2], Err(SessionError::Validation(_))));
    }
}
