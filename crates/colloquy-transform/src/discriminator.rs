//! Variant selection for the polymorphic slots of the session graph.
//!
//! Resolution reads the still-raw parent node, before any field of the slot
//! is copied. Each resolver is an ordered list of arms where the first match
//! wins and the last arm always matches, so every input shape (missing keys,
//! wrong JSON kinds) selects exactly one variant.

use serde_json::Value;
use tracing::trace;

use colloquy_contracts::{
    entity::{PayloadKind, QuestionKind},
    vocab::{QuestionType, Sender, Vocabulary},
};

/// Select the concrete type of an exchange record's `data`.
///
/// `record` is the raw exchange record (the parent of `data`).
///
/// 1. `sender` is `CANDIDATE` → `CandidateAnswer`
/// 2. `data.types` contains `HINT` → `HintPrompt`
/// 3. `data.types` contains `BUTTON_GROUP_QUESTION` → `ChoiceGroupPrompt`
/// 4. otherwise → `Prompt`
pub fn resolve_payload(record: &Value) -> PayloadKind {
    let data = record.get("data");
    let kind = if record.get("sender").and_then(Value::as_str) == Some(Sender::Candidate.as_wire()) {
        PayloadKind::CandidateAnswer
    } else if declares_type(data, QuestionType::Hint) {
        PayloadKind::HintPrompt
    } else if declares_type(data, QuestionType::ButtonGroup) {
        PayloadKind::ChoiceGroupPrompt
    } else {
        PayloadKind::Prompt
    };
    trace!(%kind, "resolved payload variant");
    kind
}

/// Select the concrete type of a candidate answer's `question`.
///
/// `answer` is the raw candidate answer (the parent of `question`). There is
/// no `HINT` arm here: a hint-tagged question resolves as a plain `Prompt`
/// unless it also carries `BUTTON_GROUP_QUESTION`.
pub fn resolve_answered_question(answer: &Value) -> QuestionKind {
    let kind = if declares_type(answer.get("question"), QuestionType::ButtonGroup) {
        QuestionKind::ChoiceGroupPrompt
    } else {
        QuestionKind::Prompt
    };
    trace!(%kind, "resolved answered question variant");
    kind
}

/// True if `node.types` is an array holding the exact wire string of `tag`.
fn declares_type(node: Option<&Value>, tag: QuestionType) -> bool {
    node.and_then(|n| n.get("types"))
        .and_then(Value::as_array)
        .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(tag.as_wire())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use colloquy_contracts::entity::{PayloadKind, QuestionKind};

    use super::{resolve_answered_question, resolve_payload};

    // ── Exchange record payload ──────────────────────────────────────────────

    #[test]
    fn candidate_sender_wins_regardless_of_types() {
        let record = json!({
            "sender": "CANDIDATE",
            "data": { "types": ["HINT", "BUTTON_GROUP_QUESTION"] }
        });
        assert_eq!(resolve_payload(&record), PayloadKind::CandidateAnswer);
    }

    #[test]
    fn hint_checked_before_button_group() {
        let record = json!({
            "sender": "AGENT",
            "data": { "types": ["BUTTON_GROUP_QUESTION", "HINT"] }
        });
        assert_eq!(resolve_payload(&record), PayloadKind::HintPrompt);
    }

    #[test]
    fn button_group_without_hint() {
        let record = json!({
            "sender": "AGENT",
            "data": { "types": ["MCQ", "BUTTON_GROUP_QUESTION"] }
        });
        assert_eq!(resolve_payload(&record), PayloadKind::ChoiceGroupPrompt);
    }

    #[test]
    fn plain_prompt_is_the_fallback() {
        let record = json!({ "sender": "AGENT", "data": { "types": ["MCQ"] } });
        assert_eq!(resolve_payload(&record), PayloadKind::Prompt);
    }

    /// An unrecognized sender is not CANDIDATE, so resolution falls through
    /// to the type tags; rejecting the sender is the validator's job.
    #[test]
    fn unknown_sender_falls_through_to_types() {
        let record = json!({ "sender": "UNKNOWN", "data": { "types": ["HINT"] } });
        assert_eq!(resolve_payload(&record), PayloadKind::HintPrompt);
    }

    /// Tag matching is exact: case and spelling must match the wire contract.
    #[test]
    fn tag_match_is_case_sensitive() {
        let record = json!({ "sender": "candidate", "data": { "types": ["hint"] } });
        assert_eq!(resolve_payload(&record), PayloadKind::Prompt);
    }

    #[test]
    fn resolution_is_total_over_odd_shapes() {
        let shapes = [
            json!(null),
            json!("AGENT"),
            json!([]),
            json!({}),
            json!({ "sender": 7 }),
            json!({ "data": "not an object" }),
            json!({ "data": { "types": "HINT" } }),
            json!({ "data": { "types": [1, null, {"HINT": true}] } }),
        ];
        for shape in &shapes {
            assert_eq!(resolve_payload(shape), PayloadKind::Prompt, "shape: {shape}");
        }
    }

    // ── Candidate answer question ────────────────────────────────────────────

    #[test]
    fn answered_question_button_group() {
        let answer = json!({ "question": { "types": ["BUTTON_GROUP_QUESTION"] } });
        assert_eq!(resolve_answered_question(&answer), QuestionKind::ChoiceGroupPrompt);
    }

    #[test]
    fn answered_question_defaults_to_prompt() {
        assert_eq!(resolve_answered_question(&json!({})), QuestionKind::Prompt);
        assert_eq!(
            resolve_answered_question(&json!({ "question": { "types": ["MCQ"] } })),
            QuestionKind::Prompt
        );
    }

    /// The answered-question resolver has no HINT arm, unlike the payload
    /// resolver. A question tagged with both resolves to a choice group here
    /// while the same tags on a payload resolve to a hint.
    #[test]
    fn hint_precedence_is_asymmetric_between_slots() {
        let tags = json!(["HINT", "BUTTON_GROUP_QUESTION"]);

        let answer = json!({ "question": { "types": tags } });
        assert_eq!(resolve_answered_question(&answer), QuestionKind::ChoiceGroupPrompt);

        let record = json!({ "sender": "AGENT", "data": { "types": tags } });
        assert_eq!(resolve_payload(&record), PayloadKind::HintPrompt);

        let hint_only = json!({ "question": { "types": ["HINT"] } });
        assert_eq!(resolve_answered_question(&hint_only), QuestionKind::Prompt);
    }
}
