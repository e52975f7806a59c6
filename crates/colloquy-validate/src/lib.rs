//! # colloquy-validate
//!
//! Checks a typed session graph against the constraints declared in each
//! node's schema descriptor and reports every offending property path.

pub mod constraints;
pub mod engine;

pub use engine::ConstraintValidator;
