//! # colloquy-transform
//!
//! Turns an untrusted JSON tree into the typed session graph.
//!
//! - `discriminator`: picks the concrete variant of each polymorphic slot
//! - `node`: coercing, path-tracking reads over one raw object
//! - `engine`: per-type transforms and the `JsonTransformer` stage

pub mod discriminator;
pub mod engine;
pub mod node;

pub use discriminator::{resolve_answered_question, resolve_payload};
pub use engine::{transform, JsonTransformer, Transform};
pub use node::RawNode;
