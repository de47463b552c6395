//! Error handling
//!
//! Defines the toolkit's error types and how callers report them.

pub mod handlers;
pub mod types;

pub use types::*;
