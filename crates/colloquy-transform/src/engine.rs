//! Raw tree → typed graph.
//!
//! Each entity implements [`Transform`]: it names its descriptor table and
//! copies exactly the declared fields from its [`RawNode`]. Undeclared keys
//! are logged and dropped. Polymorphic slots (`ExchangeRecord.data`,
//! `CandidateAnswer.question`) ask the discriminator for a variant using the
//! parent's raw node, then build that variant; prompt options follow the
//! prompt variant (choice groups get `ChoiceGroupOption`s).
//!
//! Only coercion failures are errors here. Missing required fields, unknown
//! vocabulary strings, and empty strings pass through for the validator.

use serde_json::Value;
use tracing::debug;

use colloquy_contracts::{
    entity::{
        AnswerOption, AnsweredQuestion, CandidateAnswer, ChoiceGroupOption, Content,
        ExchangeRecord, OptionEntry, Payload, PayloadKind, Prompt, QuestionKind, Rule, Session,
        Style, Trait,
    },
    error::TransformError,
    options::TransformOptions,
    schema::FieldSpec,
};
use colloquy_core::traits::Transformer;

use crate::discriminator::{resolve_answered_question, resolve_payload};
use crate::node::{Context, RawNode};

/// A typed node that can be built from a raw JSON object.
pub trait Transform: Sized {
    const TYPE_NAME: &'static str;

    /// Fields copied from the raw object; every other key is dropped.
    fn declared() -> &'static [FieldSpec];

    /// Copy and coerce the declared fields of `node`.
    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError>;
}

/// Transform `raw` into a `T`.
///
/// The input is only read. Fails with `TransformError` (naming `T`) when a
/// value cannot be coerced into its declared shape.
pub fn transform<T: Transform>(raw: &Value, options: &TransformOptions) -> Result<T, TransformError> {
    debug!(target_type = T::TYPE_NAME, "transforming raw tree");
    let cx = Context {
        target: T::TYPE_NAME,
        options: options.clone(),
    };
    let root = RawNode::root(raw, &cx)?;
    build::<T>(&root)
}

fn build<T: Transform>(node: &RawNode<'_>) -> Result<T, TransformError> {
    node.note_undeclared(T::TYPE_NAME, T::declared());
    T::from_node(node)
}

/// Option shape selected by the enclosing prompt variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionShape {
    Plain,
    ChoiceGroup,
}

fn build_prompt(
    node: &RawNode<'_>,
    type_name: &'static str,
    shape: OptionShape,
) -> Result<Prompt, TransformError> {
    node.note_undeclared(type_name, Prompt::FIELDS);
    prompt_fields(node, shape)
}

fn prompt_fields(node: &RawNode<'_>, shape: OptionShape) -> Result<Prompt, TransformError> {
    Ok(Prompt {
        id: node.text("id")?,
        types: node.terms("types")?,
        contents: node.nested_list("contents", build::<Content>)?,
        master_id: node.text("masterId")?,
        parent_id: node.text("parentId")?,
        traits: node.nested_list("traits", build::<Trait>)?,
        rules: node.nested_list("rules", build::<Rule>)?,
        options: node.nested_list("options", |option| match shape {
            OptionShape::Plain => build::<OptionEntry>(option).map(AnswerOption::Plain),
            OptionShape::ChoiceGroup => {
                build::<ChoiceGroupOption>(option).map(AnswerOption::ChoiceGroup)
            }
        })?,
        version: node.number("version")?,
        language: node.text("language")?,
    })
}

fn build_payload(kind: PayloadKind, node: &RawNode<'_>) -> Result<Payload, TransformError> {
    let name = kind.type_name();
    match kind {
        PayloadKind::CandidateAnswer => build::<CandidateAnswer>(node).map(Payload::CandidateAnswer),
        PayloadKind::Prompt => build_prompt(node, name, OptionShape::Plain).map(Payload::Prompt),
        PayloadKind::HintPrompt => {
            build_prompt(node, name, OptionShape::Plain).map(Payload::HintPrompt)
        }
        PayloadKind::ChoiceGroupPrompt => {
            build_prompt(node, name, OptionShape::ChoiceGroup).map(Payload::ChoiceGroupPrompt)
        }
    }
}

fn build_answered_question(
    kind: QuestionKind,
    node: &RawNode<'_>,
) -> Result<AnsweredQuestion, TransformError> {
    let name = kind.type_name();
    match kind {
        QuestionKind::Prompt => {
            build_prompt(node, name, OptionShape::Plain).map(AnsweredQuestion::Prompt)
        }
        QuestionKind::ChoiceGroupPrompt => build_prompt(node, name, OptionShape::ChoiceGroup)
            .map(AnsweredQuestion::ChoiceGroupPrompt),
    }
}

// ── Entity transforms ───────────────────────────────────────────────

impl Transform for Session {
    const TYPE_NAME: &'static str = "Session";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(Session {
            chat_logs: node.nested_list("chatLogs", build::<ExchangeRecord>)?,
        })
    }
}

impl Transform for ExchangeRecord {
    const TYPE_NAME: &'static str = "ExchangeRecord";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        let kind = resolve_payload(node.raw());
        Ok(ExchangeRecord {
            id: node.text("id")?,
            sender: node.term("sender")?,
            label: node.text("label")?,
            user_agent: node.text("userAgent")?,
            elapsed_time: node.number("elapsedTime")?,
            timestamp: node.timestamp("timestamp")?,
            data: node.nested("data", |data| build_payload(kind, data))?,
        })
    }
}

impl Transform for Prompt {
    const TYPE_NAME: &'static str = "Prompt";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        prompt_fields(node, OptionShape::Plain)
    }
}

impl Transform for Content {
    const TYPE_NAME: &'static str = "Content";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(Content {
            text: node.text("text")?,
            types: node.terms("types")?,
        })
    }
}

impl Transform for Trait {
    const TYPE_NAME: &'static str = "Trait";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(Trait {
            id: node.text("id")?,
            parent_id: node.text("parentId")?,
            name: node.text("name")?,
            description: node.text("description")?,
        })
    }
}

impl Transform for Rule {
    const TYPE_NAME: &'static str = "Rule";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(Rule {
            name: node.term("name")?,
            kind: node.text("type")?,
            value: node.number("value")?,
        })
    }
}

impl Transform for OptionEntry {
    const TYPE_NAME: &'static str = "Option";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(OptionEntry {
            id: node.text("id")?,
            value: node.text("value")?,
            text: node.text("text")?,
        })
    }
}

impl Transform for ChoiceGroupOption {
    const TYPE_NAME: &'static str = "ChoiceGroupOption";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(ChoiceGroupOption {
            entry: OptionEntry::from_node(node)?,
            triggers: node.terms("triggers")?,
            style: node.nested("style", build::<Style>)?,
        })
    }
}

impl Transform for Style {
    const TYPE_NAME: &'static str = "Style";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        Ok(Style {
            button_type: node.term("buttonType")?,
        })
    }
}

impl Transform for CandidateAnswer {
    const TYPE_NAME: &'static str = "CandidateAnswer";

    fn declared() -> &'static [FieldSpec] {
        Self::FIELDS
    }

    fn from_node(node: &RawNode<'_>) -> Result<Self, TransformError> {
        let kind = resolve_answered_question(node.raw());
        Ok(CandidateAnswer {
            id: node.text("id")?,
            question: node.nested("question", |question| build_answered_question(kind, question))?,
            value: node.text("value")?,
            text: node.text("text")?,
        })
    }
}

// ── Stage implementation ────────────────────────────────────────────

/// The `Transformer` stage backed by [`transform`].
#[derive(Debug, Clone, Default)]
pub struct JsonTransformer {
    options: TransformOptions,
}

impl JsonTransformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }
}

impl Transformer for JsonTransformer {
    fn transform(&self, raw: &Value) -> Result<Session, TransformError> {
        transform::<Session>(raw, &self.options)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
