//! Recursive constraint validator for typed session graphs.
//!
//! `ConstraintValidator` implements the `Validator` trait from
//! `colloquy-core`. It walks any [`Schema`] node depth-first in declaration
//! order: for each declared field it checks presence, applies the leaf
//! constraints, then descends into nested nodes. Every violation is collected
//! before returning, unless `stop_at_first_error` is set.

use tracing::{debug, warn};

use colloquy_contracts::{
    error::{ValidationError, Violation},
    options::ValidatorOptions,
    schema::{Constraint, FieldSpec, FieldValue, Schema},
};
use colloquy_core::traits::Validator;

use crate::constraints::check;

/// The session graph validator.
#[derive(Debug, Clone, Default)]
pub struct ConstraintValidator {
    options: ValidatorOptions,
}

impl ConstraintValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Every violation under `root`, in discovery order.
    pub fn violations(&self, root: &dyn Schema) -> Vec<Violation> {
        let mut walk = Walk {
            options: &self.options,
            found: Vec::new(),
        };
        walk.node(root, "");
        walk.found
    }
}

impl Validator for ConstraintValidator {
    fn validate(&self, root: &dyn Schema) -> Result<(), ValidationError> {
        let violations = self.violations(root);
        debug!(
            root = root.type_name(),
            violation_count = violations.len(),
            "validation complete"
        );
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                title: self.options.title.clone(),
                violations,
            })
        }
    }
}

// ── Graph walk ────────────────────────────────────────────────────────────────

struct Walk<'o> {
    options: &'o ValidatorOptions,
    found: Vec<Violation>,
}

impl Walk<'_> {
    fn done(&self) -> bool {
        self.options.stop_at_first_error && !self.found.is_empty()
    }

    fn report(&mut self, node: &dyn Schema, property: String, constraint: &'static str, message: String) {
        warn!(
            node = node.type_name(),
            %property,
            constraint,
            %message,
            "constraint violated"
        );
        self.found.push(Violation {
            property,
            constraint,
            message,
        });
    }

    fn node(&mut self, node: &dyn Schema, path: &str) {
        for spec in node.fields() {
            if self.done() {
                return;
            }
            self.field(node, spec, &join(path, spec.name));
        }
    }

    fn field(&mut self, node: &dyn Schema, spec: &FieldSpec, property: &str) {
        let value = node.value(spec.name);
        if value.is_unset() {
            if spec.required {
                self.report(node, property.to_string(), "required", "must be present".to_string());
            }
            return;
        }

        for &constraint in spec.constraints {
            if self.done() {
                return;
            }
            if let Some(message) = check(constraint, &value, self.options.id_format) {
                self.report(node, property.to_string(), constraint.name(), message);
            }
        }

        if spec.constraints.contains(&Constraint::Nested) {
            match &value {
                FieldValue::Node(child) => self.node(*child, property),
                FieldValue::Nodes(children) => {
                    for (i, child) in children.iter().enumerate() {
                        if self.done() {
                            return;
                        }
                        self.node(*child, &format!("{property}[{i}]"));
                    }
                }
                _ => {}
            }
        }
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
