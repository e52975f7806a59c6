//! # colloquy-contracts
//!
//! Shared types, schemas, and contracts for Colloquy.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only the session graph, its vocabularies and schema
//! descriptors, the stage options, and the error types.

pub mod entity;
pub mod error;
pub mod options;
pub mod schema;
pub mod vocab;
