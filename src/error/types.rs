//! Error types
//!
//! Defines domain-specific error types for the file utilities and the
//! configuration store, each tagged with a [`Severity`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// How much damage an error does to the calling workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Recoverable by the caller: retry, log, or abort just this operation.
    Minor,
    /// Fatal to the calling workflow (a required artifact could not be produced).
    Major,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Minor => write!(f, "minor"),
            Severity::Major => write!(f, "major"),
        }
    }
}

/// File utility errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Error when reading file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error when writing in file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error when listing directory {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Error when creating directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Malformed {encoding} input in file {}", .path.display())]
    Malformed {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("Characters not representable in {encoding} for file {}", .path.display())]
    Unmappable {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("Cannot write {encoding} to file {}", .path.display())]
    UnsupportedOutput {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("Error when converting value to json for {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Exception thrown when zipping file {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive for {} would overwrite its own source", .path.display())]
    ArchiveCollision { path: PathBuf },
}

impl StorageError {
    pub fn severity(&self) -> Severity {
        match self {
            StorageError::Archive { .. } | StorageError::ArchiveCollision { .. } => Severity::Major,
            _ => Severity::Minor,
        }
    }
}

/// Configuration store errors. All of them are [`Severity::Minor`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to load properties")]
    Unavailable,

    #[error("Can't find property file {}", .path.display())]
    ResourceMissing { path: PathBuf },

    #[error("Error when importing properties from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error when parsing properties in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: java_properties::PropertiesError,
    },

    #[error("Error when saving properties to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: PersistSource,
    },

    #[error("Invalid toolkit settings: {0}")]
    Settings(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn severity(&self) -> Severity {
        Severity::Minor
    }
}

/// Underlying cause of a failed save.
#[derive(Debug, Error)]
pub enum PersistSource {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Serialize(#[from] java_properties::PropertiesError),
}

/// General toolkit error that encompasses all error types
#[derive(Debug, Error)]
pub enum ToolkitError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ToolkitError {
    pub fn severity(&self) -> Severity {
        match self {
            ToolkitError::Storage(e) => e.severity(),
            ToolkitError::Config(e) => e.severity(),
        }
    }
}
