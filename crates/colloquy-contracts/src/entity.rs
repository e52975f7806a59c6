//! The typed session graph.
//!
//! A [`Session`] owns an ordered list of [`ExchangeRecord`]s; each record
//! holds one polymorphic [`Payload`]. Prompt variants share the [`Prompt`]
//! field struct and differ only in which variant tag wraps it (and, for
//! choice groups, in the option shape).
//!
//! Every declared field is an `Option`: the graph mirrors what was present in
//! the raw tree. Which fields are required is recorded in the schema
//! descriptors (see [`crate::schema`]) and enforced by the validator.
//!
//! `Serialize` produces the plain wire projection (camelCase, unset fields
//! omitted), which transforms back into an equal graph.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::vocab::{ButtonType, ContentType, QuestionType, RuleName, Sender, Term, TriggerAction};

/// Root of the graph: one recorded chat exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_logs: Option<Vec<ExchangeRecord>>,
}

impl Session {
    /// Records in order; empty when `chatLogs` was absent.
    pub fn records(&self) -> &[ExchangeRecord] {
        self.chat_logs.as_deref().unwrap_or_default()
    }
}

/// One turn of the exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Term<Sender>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Milliseconds the turn took.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

/// Which concrete shape an exchange record's `data` was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    CandidateAnswer,
    Prompt,
    HintPrompt,
    ChoiceGroupPrompt,
}

impl PayloadKind {
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::CandidateAnswer => "CandidateAnswer",
            Self::Prompt => "Prompt",
            Self::HintPrompt => "HintPrompt",
            Self::ChoiceGroupPrompt => "ChoiceGroupPrompt",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// The polymorphic payload of an exchange record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    CandidateAnswer(CandidateAnswer),
    Prompt(Prompt),
    HintPrompt(Prompt),
    ChoiceGroupPrompt(Prompt),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::CandidateAnswer(_) => PayloadKind::CandidateAnswer,
            Payload::Prompt(_) => PayloadKind::Prompt,
            Payload::HintPrompt(_) => PayloadKind::HintPrompt,
            Payload::ChoiceGroupPrompt(_) => PayloadKind::ChoiceGroupPrompt,
        }
    }

    /// The shared prompt fields, for any of the three prompt variants.
    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            Payload::CandidateAnswer(_) => None,
            Payload::Prompt(p) | Payload::HintPrompt(p) | Payload::ChoiceGroupPrompt(p) => Some(p),
        }
    }

    pub fn candidate_answer(&self) -> Option<&CandidateAnswer> {
        match self {
            Payload::CandidateAnswer(a) => Some(a),
            _ => None,
        }
    }
}

/// Which concrete shape a candidate answer's `question` was resolved to.
///
/// There is no hint arm: an answered question is either a choice group or a
/// plain prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    Prompt,
    ChoiceGroupPrompt,
}

impl QuestionKind {
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Prompt => "Prompt",
            Self::ChoiceGroupPrompt => "ChoiceGroupPrompt",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// The question a candidate answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnsweredQuestion {
    Prompt(Prompt),
    ChoiceGroupPrompt(Prompt),
}

impl AnsweredQuestion {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnsweredQuestion::Prompt(_) => QuestionKind::Prompt,
            AnsweredQuestion::ChoiceGroupPrompt(_) => QuestionKind::ChoiceGroupPrompt,
        }
    }

    pub fn prompt(&self) -> &Prompt {
        match self {
            AnsweredQuestion::Prompt(p) | AnsweredQuestion::ChoiceGroupPrompt(p) => p,
        }
    }
}

/// Fields shared by every prompt variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<Term<QuestionType>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<Content>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<Trait>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Prompt {
    /// True if `types` carries the given recognized tag.
    pub fn has_type(&self, tag: QuestionType) -> bool {
        self.types
            .as_deref()
            .is_some_and(|types| types.iter().any(|t| t.is(tag)))
    }

    pub fn options(&self) -> &[AnswerOption] {
        self.options.as_deref().unwrap_or_default()
    }
}

/// A block of displayable content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<Term<ContentType>>>,
}

/// A trait a prompt measures. `parent_id` may reference another trait.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trait {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named answer constraint attached to a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Term<RuleName>>,
    /// Free-form type discriminator (wire name `type`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A selectable option on a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerOption {
    Plain(OptionEntry),
    ChoiceGroup(ChoiceGroupOption),
}

impl AnswerOption {
    pub fn entry(&self) -> &OptionEntry {
        match self {
            AnswerOption::Plain(entry) => entry,
            AnswerOption::ChoiceGroup(option) => &option.entry,
        }
    }

    pub fn as_choice_group(&self) -> Option<&ChoiceGroupOption> {
        match self {
            AnswerOption::ChoiceGroup(option) => Some(option),
            AnswerOption::Plain(_) => None,
        }
    }
}

/// Fields every option carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// An option rendered as a button inside a choice group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceGroupOption {
    #[serde(flatten)]
    pub entry: OptionEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<Term<TriggerAction>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_type: Option<Term<ButtonType>>,
}

/// A candidate's reply, embedding the question being answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnswer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<AnsweredQuestion>,
    /// Raw answer value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Display text of the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
