//! # Page Model
//!
//! The document crate - pages, elements and the conditions that gate them.
//! This crate is the single source of truth for the shape of what the delivery
//! app reads and does not contain any assembly logic.

pub mod conditions;
pub mod document;
pub mod elements;
pub mod error;
pub mod text;

pub use conditions::*;
pub use document::*;
pub use elements::*;
pub use error::*;
