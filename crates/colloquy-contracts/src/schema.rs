//! Per-type schema descriptors.
//!
//! Each entity declares a static table of [`FieldSpec`]s: the wire name of
//! every field it exposes, whether the field is required, and the constraints
//! its value must satisfy. The transformer reads the table to know which raw
//! keys to keep; the validator walks it through the [`Schema`] trait to check
//! every field without knowing the concrete type.

use chrono::{DateTime, Utc};

use crate::entity::{
    AnswerOption, AnsweredQuestion, CandidateAnswer, ChoiceGroupOption, Content, ExchangeRecord,
    OptionEntry, Payload, Prompt, Rule, Session, Style, Trait,
};
use crate::vocab::{Term, Vocabulary};

/// A check applied to a field once it is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Strings must be non-empty; lists must hold at least one element.
    NotEmpty,
    /// String must have the configured identifier shape.
    IdFormat,
    /// Upper bound on string length, in characters.
    MaxLength(usize),
    /// Every term must be a member of its vocabulary.
    InVocabulary,
    /// No term may appear twice in a list.
    Distinct,
    /// Number must be finite and zero or greater.
    NonNegative,
    /// String must be a language tag such as `en` or `pt-BR`.
    LanguageTag,
    /// Descend into the nested node or nodes.
    Nested,
}

impl Constraint {
    /// Name reported in violations.
    pub const fn name(self) -> &'static str {
        match self {
            Constraint::NotEmpty => "notEmpty",
            Constraint::IdFormat => "idFormat",
            Constraint::MaxLength(_) => "maxLength",
            Constraint::InVocabulary => "vocabulary",
            Constraint::Distinct => "distinct",
            Constraint::NonNegative => "nonNegative",
            Constraint::LanguageTag => "languageTag",
            Constraint::Nested => "nested",
        }
    }
}

/// Declaration of one exposed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name (camelCase).
    pub name: &'static str,
    pub required: bool,
    pub constraints: &'static [Constraint],
}

impl FieldSpec {
    pub const fn required(name: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { name, required: true, constraints }
    }

    pub const fn optional(name: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { name, required: false, constraints }
    }
}

/// Find the descriptor for `name` in a table.
pub fn find_field(fields: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    fields.iter().find(|f| f.name == name)
}

/// A vocabulary value as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermRef<'a> {
    pub vocabulary: &'static str,
    pub wire: &'a str,
    pub known: bool,
}

impl<'a, T: Vocabulary> From<&'a Term<T>> for TermRef<'a> {
    fn from(term: &'a Term<T>) -> Self {
        TermRef {
            vocabulary: T::NAME,
            wire: term.as_wire(),
            known: term.known().is_some(),
        }
    }
}

/// A borrowed, type-erased view of one field's value.
pub enum FieldValue<'a> {
    Unset,
    Text(&'a str),
    Number(f64),
    Instant(&'a DateTime<Utc>),
    Term(TermRef<'a>),
    Terms(Vec<TermRef<'a>>),
    Node(&'a dyn Schema),
    Nodes(Vec<&'a dyn Schema>),
}

impl<'a> FieldValue<'a> {
    pub fn text(v: &'a Option<String>) -> Self {
        v.as_deref().map_or(FieldValue::Unset, FieldValue::Text)
    }

    pub fn number(v: Option<f64>) -> Self {
        v.map_or(FieldValue::Unset, FieldValue::Number)
    }

    pub fn instant(v: &'a Option<DateTime<Utc>>) -> Self {
        v.as_ref().map_or(FieldValue::Unset, FieldValue::Instant)
    }

    pub fn term<T: Vocabulary>(v: &'a Option<Term<T>>) -> Self {
        v.as_ref()
            .map_or(FieldValue::Unset, |t| FieldValue::Term(t.into()))
    }

    pub fn terms<T: Vocabulary>(v: &'a Option<Vec<Term<T>>>) -> Self {
        v.as_deref().map_or(FieldValue::Unset, |ts| {
            FieldValue::Terms(ts.iter().map(TermRef::from).collect())
        })
    }

    pub fn node<S: Schema>(v: &'a Option<S>) -> Self {
        v.as_ref()
            .map_or(FieldValue::Unset, |n| FieldValue::Node(n as &dyn Schema))
    }

    pub fn nodes<S: Schema>(v: &'a Option<Vec<S>>) -> Self {
        v.as_deref().map_or(FieldValue::Unset, |ns| {
            FieldValue::Nodes(ns.iter().map(|n| n as &dyn Schema).collect())
        })
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }
}

/// Uniform, reflection-free access to a typed node.
pub trait Schema {
    /// Concrete type name, e.g. `"HintPrompt"`.
    fn type_name(&self) -> &'static str;

    /// The descriptor table for this node.
    fn fields(&self) -> &'static [FieldSpec];

    /// The value of the field with wire name `field`; `Unset` for unknown names.
    fn value(&self, field: &str) -> FieldValue<'_>;
}

use Constraint::*;

impl Session {
    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::optional("chatLogs", &[Nested])];
}

impl ExchangeRecord {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id", &[NotEmpty]),
        FieldSpec::required("sender", &[InVocabulary]),
        FieldSpec::optional("label", &[MaxLength(255)]),
        FieldSpec::optional("userAgent", &[MaxLength(512)]),
        FieldSpec::optional("elapsedTime", &[NonNegative]),
        FieldSpec::optional("timestamp", &[]),
        FieldSpec::required("data", &[Nested]),
    ];
}

impl Prompt {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id", &[IdFormat]),
        FieldSpec::required("types", &[NotEmpty, InVocabulary, Distinct]),
        FieldSpec::required("contents", &[Nested]),
        FieldSpec::optional("masterId", &[IdFormat]),
        FieldSpec::optional("parentId", &[IdFormat]),
        FieldSpec::optional("traits", &[Nested]),
        FieldSpec::optional("rules", &[Nested]),
        FieldSpec::optional("options", &[Nested]),
        FieldSpec::optional("version", &[NonNegative]),
        FieldSpec::optional("language", &[LanguageTag]),
    ];
}

impl Content {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("text", &[NotEmpty]),
        FieldSpec::required("types", &[NotEmpty, InVocabulary, Distinct]),
    ];
}

impl Trait {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id", &[IdFormat]),
        FieldSpec::optional("parentId", &[IdFormat]),
        FieldSpec::required("name", &[NotEmpty]),
        FieldSpec::optional("description", &[MaxLength(1024)]),
    ];
}

impl Rule {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", &[InVocabulary]),
        FieldSpec::required("type", &[NotEmpty]),
        FieldSpec::required("value", &[]),
    ];
}

impl OptionEntry {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id", &[IdFormat]),
        FieldSpec::required("value", &[NotEmpty]),
        FieldSpec::required("text", &[NotEmpty]),
    ];
}

impl ChoiceGroupOption {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id", &[IdFormat]),
        FieldSpec::required("value", &[NotEmpty]),
        FieldSpec::required("text", &[NotEmpty]),
        FieldSpec::required("triggers", &[InVocabulary]),
        FieldSpec::required("style", &[Nested]),
    ];
}

impl Style {
    pub const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("buttonType", &[InVocabulary])];
}

impl CandidateAnswer {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("id", &[IdFormat]),
        FieldSpec::required("question", &[Nested]),
        FieldSpec::required("value", &[NotEmpty]),
        FieldSpec::required("text", &[NotEmpty]),
    ];
}

// ── Schema impls ────────────────────────────────────────────────────

impl Schema for Session {
    fn type_name(&self) -> &'static str {
        "Session"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "chatLogs" => FieldValue::nodes(&self.chat_logs),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for ExchangeRecord {
    fn type_name(&self) -> &'static str {
        "ExchangeRecord"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(&self.id),
            "sender" => FieldValue::term(&self.sender),
            "label" => FieldValue::text(&self.label),
            "userAgent" => FieldValue::text(&self.user_agent),
            "elapsedTime" => FieldValue::number(self.elapsed_time),
            "timestamp" => FieldValue::instant(&self.timestamp),
            "data" => FieldValue::node(&self.data),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for Payload {
    fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Payload::CandidateAnswer(a) => a.fields(),
            Payload::Prompt(p) | Payload::HintPrompt(p) | Payload::ChoiceGroupPrompt(p) => p.fields(),
        }
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match self {
            Payload::CandidateAnswer(a) => a.value(field),
            Payload::Prompt(p) | Payload::HintPrompt(p) | Payload::ChoiceGroupPrompt(p) => p.value(field),
        }
    }
}

impl Schema for AnsweredQuestion {
    fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    fn fields(&self) -> &'static [FieldSpec] {
        self.prompt().fields()
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        self.prompt().value(field)
    }
}

impl Schema for Prompt {
    fn type_name(&self) -> &'static str {
        "Prompt"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(&self.id),
            "types" => FieldValue::terms(&self.types),
            "contents" => FieldValue::nodes(&self.contents),
            "masterId" => FieldValue::text(&self.master_id),
            "parentId" => FieldValue::text(&self.parent_id),
            "traits" => FieldValue::nodes(&self.traits),
            "rules" => FieldValue::nodes(&self.rules),
            "options" => FieldValue::nodes(&self.options),
            "version" => FieldValue::number(self.version),
            "language" => FieldValue::text(&self.language),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for Content {
    fn type_name(&self) -> &'static str {
        "Content"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "text" => FieldValue::text(&self.text),
            "types" => FieldValue::terms(&self.types),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for Trait {
    fn type_name(&self) -> &'static str {
        "Trait"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(&self.id),
            "parentId" => FieldValue::text(&self.parent_id),
            "name" => FieldValue::text(&self.name),
            "description" => FieldValue::text(&self.description),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for Rule {
    fn type_name(&self) -> &'static str {
        "Rule"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "name" => FieldValue::term(&self.name),
            "type" => FieldValue::text(&self.kind),
            "value" => FieldValue::number(self.value),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for AnswerOption {
    fn type_name(&self) -> &'static str {
        match self {
            AnswerOption::Plain(o) => o.type_name(),
            AnswerOption::ChoiceGroup(o) => o.type_name(),
        }
    }

    fn fields(&self) -> &'static [FieldSpec] {
        match self {
            AnswerOption::Plain(o) => o.fields(),
            AnswerOption::ChoiceGroup(o) => o.fields(),
        }
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match self {
            AnswerOption::Plain(o) => o.value(field),
            AnswerOption::ChoiceGroup(o) => o.value(field),
        }
    }
}

impl Schema for OptionEntry {
    fn type_name(&self) -> &'static str {
        "Option"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(&self.id),
            "value" => FieldValue::text(&self.value),
            "text" => FieldValue::text(&self.text),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for ChoiceGroupOption {
    fn type_name(&self) -> &'static str {
        "ChoiceGroupOption"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "triggers" => FieldValue::terms(&self.triggers),
            "style" => FieldValue::node(&self.style),
            _ => self.entry.value(field),
        }
    }
}

impl Schema for Style {
    fn type_name(&self) -> &'static str {
        "Style"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "buttonType" => FieldValue::term(&self.button_type),
            _ => FieldValue::Unset,
        }
    }
}

impl Schema for CandidateAnswer {
    fn type_name(&self) -> &'static str {
        "CandidateAnswer"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "id" => FieldValue::text(&self.id),
            "question" => FieldValue::node(&self.question),
            "value" => FieldValue::text(&self.value),
            "text" => FieldValue::text(&self.text),
            _ => FieldValue::Unset,
        }
    }
}
