//! Read-only view over one raw JSON object during transformation.
//!
//! `RawNode` hands out declared fields already coerced to their Rust types.
//! It tracks the dotted/bracket path of the node so coercion failures name
//! the exact field, and applies the `TransformOptions` null and numeric
//! string policies uniformly.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::trace;

use colloquy_contracts::{
    error::TransformError,
    options::TransformOptions,
    schema::{find_field, FieldSpec},
    vocab::{Term, Vocabulary},
};

/// Per-call state shared by every node of one transformation.
#[derive(Debug)]
pub(crate) struct Context {
    pub target: &'static str,
    pub options: TransformOptions,
}

impl Context {
    fn error(&self, path: String, message: impl Into<String>) -> TransformError {
        TransformError {
            target: self.target,
            path,
            message: message.into(),
        }
    }
}

/// A raw JSON object being transformed into one typed node.
pub struct RawNode<'a> {
    raw: &'a Value,
    map: &'a Map<String, Value>,
    path: String,
    cx: &'a Context,
}

impl<'a> RawNode<'a> {
    pub(crate) fn root(raw: &'a Value, cx: &'a Context) -> Result<Self, TransformError> {
        Self::object(raw, String::new(), cx)
    }

    fn object(raw: &'a Value, path: String, cx: &'a Context) -> Result<Self, TransformError> {
        match raw {
            Value::Object(map) => Ok(Self { raw, map, path, cx }),
            other => Err(cx.error(path, format!("expected an object, found {}", kind_of(other)))),
        }
    }

    /// The untouched raw object, for discriminators that inspect siblings.
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn field_path(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.path, field)
        }
    }

    fn error(&self, field: &str, message: impl Into<String>) -> TransformError {
        self.cx.error(self.field_path(field), message)
    }

    /// The value of `field`, or `None` if absent (or null, when nulls count as unset).
    fn get(&self, field: &str) -> Result<Option<&'a Value>, TransformError> {
        match self.map.get(field) {
            None => Ok(None),
            Some(Value::Null) if self.cx.options.null_as_unset => Ok(None),
            Some(Value::Null) => Err(self.error(field, "null is not accepted for a declared field")),
            Some(value) => Ok(Some(value)),
        }
    }

    pub fn text(&self, field: &str) -> Result<Option<String>, TransformError> {
        self.get(field)?
            .map(|value| match value {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.error(field, format!("expected a string, found {}", kind_of(other)))),
            })
            .transpose()
    }

    pub fn number(&self, field: &str) -> Result<Option<f64>, TransformError> {
        self.get(field)?
            .map(|value| match value {
                Value::Number(n) => n
                    .as_f64()
                    .ok_or_else(|| self.error(field, format!("number {n} is not representable"))),
                Value::String(s) if self.cx.options.implicit_conversion => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| self.error(field, format!("'{s}' is not a finite number"))),
                other => Err(self.error(field, format!("expected a number, found {}", kind_of(other)))),
            })
            .transpose()
    }

    /// A vocabulary string. Unknown strings are kept as `Term::Unrecognized`.
    pub fn term<T: Vocabulary>(&self, field: &str) -> Result<Option<Term<T>>, TransformError> {
        self.get(field)?
            .map(|value| match value {
                Value::String(s) => Ok(Term::parse(s)),
                other => Err(self.error(field, format!("expected a string, found {}", kind_of(other)))),
            })
            .transpose()
    }

    /// An array of vocabulary strings.
    pub fn terms<T: Vocabulary>(&self, field: &str) -> Result<Option<Vec<Term<T>>>, TransformError> {
        let Some(value) = self.get(field)? else {
            return Ok(None);
        };
        let items = value.as_array().ok_or_else(|| {
            self.error(field, format!("expected an array, found {}", kind_of(value)))
        })?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(Term::parse(s)),
                other => Err(self.cx.error(
                    format!("{}[{}]", self.field_path(field), i),
                    format!("expected a string, found {}", kind_of(other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// An RFC 3339 string or whole epoch milliseconds (`1709285400000.0` counts).
    pub fn timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, TransformError> {
        self.get(field)?
            .map(|value| match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| self.error(field, format!("invalid timestamp '{s}': {e}"))),
                Value::Number(n) => {
                    let millis = n.as_i64().or_else(|| whole_millis(n.as_f64()?)).ok_or_else(|| {
                        self.error(field, format!("timestamp {n} is not whole epoch milliseconds"))
                    })?;
                    DateTime::<Utc>::from_timestamp_millis(millis)
                        .ok_or_else(|| self.error(field, format!("timestamp {n} is out of range")))
                }
                other => Err(self.error(field, format!("expected a timestamp, found {}", kind_of(other)))),
            })
            .transpose()
    }

    /// A nested typed object, built by `build` from its own node.
    pub fn nested<T>(
        &self,
        field: &str,
        build: impl FnOnce(&RawNode<'a>) -> Result<T, TransformError>,
    ) -> Result<Option<T>, TransformError> {
        let Some(value) = self.get(field)? else {
            return Ok(None);
        };
        let child = RawNode::object(value, self.field_path(field), self.cx)?;
        build(&child).map(Some)
    }

    /// An array of nested typed objects, each built by `build`.
    pub fn nested_list<T>(
        &self,
        field: &str,
        build: impl Fn(&RawNode<'a>) -> Result<T, TransformError>,
    ) -> Result<Option<Vec<T>>, TransformError> {
        let Some(value) = self.get(field)? else {
            return Ok(None);
        };
        let items = value.as_array().ok_or_else(|| {
            self.error(field, format!("expected an array, found {}", kind_of(value)))
        })?;
        let base = self.field_path(field);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let child = RawNode::object(item, format!("{base}[{i}]"), self.cx)?;
            out.push(build(&child)?);
        }
        Ok(Some(out))
    }

    /// Log the raw keys `declared` does not name. They are never copied.
    pub(crate) fn note_undeclared(&self, type_name: &str, declared: &'static [FieldSpec]) {
        let dropped: Vec<&str> = self
            .map
            .keys()
            .map(String::as_str)
            .filter(|key| find_field(declared, key).is_none())
            .collect();
        if !dropped.is_empty() {
            trace!(type_name, path = %self.path, ?dropped, "dropping undeclared keys");
        }
    }
}

/// `n` as an `i64` when it is a whole number inside the `i64` range.
fn whole_millis(n: f64) -> Option<i64> {
    let in_range = n >= i64::MIN as f64 && n < i64::MAX as f64;
    (n.fract() == 0.0 && in_range).then_some(n as i64)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
