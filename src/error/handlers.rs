//! Error handlers
//!
//! Reports toolkit errors according to their severity.

use log::{error, warn};

use crate::error::types::{Severity, ToolkitError};

/// Log a toolkit error at a level matching its severity
pub fn handle_error(err: &ToolkitError) {
    match err.severity() {
        Severity::Minor => warn!("Minor error: {}", err),
        Severity::Major => error!("Major error: {}", err),
    }
}

/// Convert error to a process exit code
pub fn exit_code(err: &ToolkitError) -> i32 {
    match err.severity() {
        Severity::Minor => 1,
        Severity::Major => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::types::{ConfigError, StorageError};
    use std::path::PathBuf;

    #[test]
    fn exit_code_follows_severity() {
        let minor = ToolkitError::from(ConfigError::Unavailable);
        let major = ToolkitError::from(StorageError::ArchiveCollision {
            path: PathBuf::from("x.zip"),
        });
        assert_eq!(exit_code(&minor), 1);
        assert_eq!(exit_code(&major), 2);
    }
}
