//! My Starter - small application toolkit
//!
//! A lazily loaded, properties-backed configuration store plus the file
//! utilities it and its callers depend on.

pub mod config;
pub mod error;
pub mod storage;
pub mod utils;

pub use crate::config::{ConfigStore, LogLevelSink, ToolkitSettings};
pub use crate::error::{ConfigError, Severity, StorageError, ToolkitError};
