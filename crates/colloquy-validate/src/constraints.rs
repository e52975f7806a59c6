//! Leaf checks for the constraint library.
//!
//! A check receives a field value that is already known to be present and
//! returns `Some(message)` when the value breaks the constraint, `None` when it
//! passes. A constraint that does not apply to the value's shape passes.
//! `Nested` is handled by the engine, which owns recursion and paths.

use colloquy_contracts::{
    options::IdFormat,
    schema::{Constraint, FieldValue, TermRef},
};

/// Evaluate one leaf constraint against a present value.
pub fn check(constraint: Constraint, value: &FieldValue<'_>, id_format: IdFormat) -> Option<String> {
    match constraint {
        Constraint::NotEmpty => not_empty(value),
        Constraint::IdFormat => text_of(value).and_then(|s| id_shape(s, id_format)),
        Constraint::MaxLength(max) => text_of(value).and_then(|s| {
            let len = s.chars().count();
            (len > max).then(|| format!("length {len} exceeds the maximum of {max}"))
        }),
        Constraint::InVocabulary => in_vocabulary(value),
        Constraint::Distinct => distinct(value),
        Constraint::NonNegative => match value {
            FieldValue::Number(n) if !n.is_finite() => Some(format!("{n} is not a finite number")),
            FieldValue::Number(n) if *n < 0.0 => Some(format!("{n} is negative")),
            _ => None,
        },
        Constraint::LanguageTag => text_of(value)
            .filter(|s| !is_language_tag(s))
            .map(|s| format!("'{s}' is not a language tag")),
        Constraint::Nested => None,
    }
}

fn text_of<'v>(value: &'v FieldValue<'_>) -> Option<&'v str> {
    match value {
        FieldValue::Text(s) => Some(s),
        _ => None,
    }
}

fn not_empty(value: &FieldValue<'_>) -> Option<String> {
    let empty = match value {
        FieldValue::Text(s) => s.trim().is_empty(),
        FieldValue::Terms(terms) => terms.is_empty(),
        FieldValue::Nodes(nodes) => nodes.is_empty(),
        _ => false,
    };
    empty.then(|| "must not be empty".to_string())
}

fn id_shape(id: &str, format: IdFormat) -> Option<String> {
    let ok = match format {
        IdFormat::Uuid => id.len() == 36 && uuid::Uuid::parse_str(id).is_ok(),
        IdFormat::ObjectId => id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit()),
    };
    if ok {
        None
    } else {
        let expected = match format {
            IdFormat::Uuid => "a hyphenated UUID",
            IdFormat::ObjectId => "24 hexadecimal characters",
        };
        Some(format!("'{id}' is not {expected}"))
    }
}

fn unknown_term(term: &TermRef<'_>) -> Option<String> {
    (!term.known).then(|| format!("'{}' is not a valid {}", term.wire, term.vocabulary))
}

fn in_vocabulary(value: &FieldValue<'_>) -> Option<String> {
    match value {
        FieldValue::Term(term) => unknown_term(term),
        FieldValue::Terms(terms) => {
            let unknown: Vec<String> = terms.iter().filter_map(unknown_term).collect();
            (!unknown.is_empty()).then(|| unknown.join("; "))
        }
        _ => None,
    }
}

fn distinct(value: &FieldValue<'_>) -> Option<String> {
    let FieldValue::Terms(terms) = value else {
        return None;
    };
    terms
        .iter()
        .enumerate()
        .find(|(i, term)| terms[..*i].iter().any(|earlier| earlier.wire == term.wire))
        .map(|(_, term)| format!("'{}' is listed more than once", term.wire))
}

/// A primary language subtag of 2 to 8 letters followed by optional
/// `-`-separated subtags of 1 to 8 alphanumerics (`en`, `pt-BR`, `zh-Hant-TW`).
fn is_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags
        .next()
        .is_some_and(|p| (2..=8).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_alphabetic()));
    primary_ok
        && subtags.all(|s| (1..=8).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric()))
}
