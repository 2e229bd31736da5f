//! # Session Core
//!
//! Compiles the authored MindTrails Movement sheets into the JSON page trees
//! the delivery app reads. Page shapes come from `page_model`; this crate owns
//! reading, building and assembling them.
//!
//! ## Core Components
//!
//! - **sources**: CSV readers and the media asset store
//! - **records**: typed rows, one per sheet layout
//! - **builders**: pages and page groups from records
//! - **assembler**: per-domain batching, long-scenario interleave and resources
//! - **reminders**: reminder placement on doses and surveys
//! - **output**: the output tree, flow documents and JSON writing
//! - **pipeline**: the sessions, surveys and library stages per population
//!
//! ## Determinism
//!
//! Every random choice draws from a named channel of [`rng::ShuffleRegistry`],
//! each seeded from the configured seed. Identical inputs and seed give
//! byte-identical output.

pub mod assembler;
pub mod builders;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod reminders;
pub mod rng;
pub mod sources;

pub use assembler::*;
pub use config::*;
pub use error::*;
pub use output::*;
pub use pipeline::*;
