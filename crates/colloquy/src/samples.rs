//! Built-in session fixtures.
//!
//! All data here is hardcoded and fictional. The three-message exchange is a
//! short screening conversation:
//!
//! 1. AGENT sends a `HINT` prompt explaining how to answer.
//! 2. CANDIDATE answers a `BUTTON_GROUP_QUESTION` (yes / no buttons).
//! 3. AGENT asks an `MCQ` with two options.

use serde_json::{json, Value};

// ── Identifiers ───────────────────────────────────────────────────────────────

pub const HINT_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
pub const RELOCATE_ID: &str = "9b2f4c8d-1e3a-4f5b-8c6d-7e8f9a0b1c2d";
pub const ANSWER_ID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
pub const SHIFT_ID: &str = "2c5ea4c0-4067-11e9-8bad-9b1deb4d3b7d";

const YES_ID: &str = "a3bb189e-8bf9-4888-9912-ace4e6543002";
const NO_ID: &str = "c4d2e8f1-3a5b-4c7d-9e1f-2a3b4c5d6e7f";
const MORNING_ID: &str = "16fd2706-8baf-433b-82eb-8c7fada847da";
const EVENING_ID: &str = "886313e1-3b8a-5372-9b90-0c9aee199e5d";

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// The question the candidate answers in record 1, as the agent asked it.
fn relocation_question() -> Value {
    json!({
        "id": RELOCATE_ID,
        "types": ["BUTTON_GROUP_QUESTION"],
        "contents": [
            { "text": "Are you open to relocating?", "types": ["TEXT"] }
        ],
        "options": [
            {
                "id": YES_ID,
                "value": "yes",
                "text": "Yes",
                "triggers": ["NEXT_QUESTION"],
                "style": { "buttonType": "PRIMARY" }
            },
            {
                "id": NO_ID,
                "value": "no",
                "text": "No",
                "triggers": ["END_CHAT"],
                "style": { "buttonType": "OUTLINE" }
            }
        ],
        "language": "en"
    })
}

/// The three-message sample exchange as raw wire JSON.
///
/// Transforms and validates cleanly with default options.
pub fn sample_exchange() -> Value {
    json!({
        "chatLogs": [
            {
                "id": "e0b6d2a4-9c1f-4d3e-8a7b-5f6c4d3e2a10",
                "sender": "AGENT",
                "label": "intro-hint",
                "userAgent": "colloquy-agent/1.4",
                "elapsedTime": 0,
                "timestamp": "2024-03-01T09:30:00Z",
                "data": {
                    "id": HINT_ID,
                    "types": ["HINT"],
                    "contents": [
                        { "text": "Tap a button to answer each question.", "types": ["TEXT"] }
                    ],
                    "language": "en"
                }
            },
            {
                "id": "b1c2d3e4-f5a6-4b7c-8d9e-0f1a2b3c4d5e",
                "sender": "CANDIDATE",
                "userAgent": "Mozilla/5.0 (iPhone; CPU iPhone OS 17_3 like Mac OS X)",
                "elapsedTime": 4210,
                "timestamp": "2024-03-01T09:30:04Z",
                "data": {
                    "id": ANSWER_ID,
                    "question": relocation_question(),
                    "value": "yes",
                    "text": "Yes"
                }
            },
            {
                "id": "d4e5f6a7-b8c9-4d0e-9f1a-2b3c4d5e6f70",
                "sender": "AGENT",
                "elapsedTime": 4890,
                "timestamp": "2024-03-01T09:30:05Z",
                "data": {
                    "id": SHIFT_ID,
                    "types": ["MCQ"],
                    "contents": [
                        { "text": "Which shift do you prefer?", "types": ["TEXT"] }
                    ],
                    "rules": [
                        { "name": "MIN_SELECTIONS", "type": "selection", "value": 1 }
                    ],
                    "options": [
                        { "id": MORNING_ID, "value": "morning", "text": "Morning" },
                        { "id": EVENING_ID, "value": "evening", "text": "Evening" }
                    ],
                    "version": 2,
                    "language": "en"
                }
            }
        ]
    })
}

/// Copy of `raw` with the sender of record `index` replaced.
///
/// Leaves `raw` unchanged when it has no such record.
pub fn with_sender(raw: &Value, index: usize, sender: &str) -> Value {
    let mut out = raw.clone();
    if let Some(record) = out
        .get_mut("chatLogs")
        .and_then(|logs| logs.get_mut(index))
        .and_then(Value::as_object_mut)
    {
        record.insert("sender".to_string(), Value::String(sender.to_string()));
    }
    out
}
