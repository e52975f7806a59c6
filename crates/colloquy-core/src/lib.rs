//! # colloquy-core
//!
//! The transform-then-validate runtime for Colloquy.
//!
//! This crate provides:
//! - The two stage traits (`Transformer`, `Validator`)
//! - The `SessionPipeline` that runs them in order
//! - `PipelineConfig`, the TOML-loadable options for both stages
//!
//! ## Usage
//!
//! ```rust,ignore
//! use colloquy_core::{SessionPipeline, traits::{Transformer, Validator}};
//! ```

pub mod config;
pub mod pipeline;
pub mod traits;

pub use config::PipelineConfig;
pub use pipeline::SessionPipeline;
