//! File system operations
//!
//! Directory listing, directory creation and file metadata lookups.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, error};
use walkdir::WalkDir;

use crate::error::StorageError;

/// Lists the files under `root` whose name ends with one of `extensions`.
///
/// Matching is case-insensitive and extensions may be given with or without
/// their leading dot; an empty extension matches every file. Sub-directories
/// are descended into only when `recursive` is set; directories themselves
/// are never returned.
///
/// When `root` is not a directory it is returned as the only element, without
/// checking its extension. No ordering is guaranteed.
pub fn list_files<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
    recursive: bool,
) -> Result<Vec<PathBuf>, StorageError> {
    if !directory_exists(root) {
        return Ok(vec![root.to_path_buf()]);
    }

    let suffixes: Vec<String> = extensions
        .iter()
        .map(|ext| ext.as_ref().to_lowercase())
        .collect();

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|source| StorageError::List {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if directory_exists(entry.path()) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if suffixes.iter().any(|ext| name.ends_with(ext.as_str())) {
            files.push(entry.into_path());
        }
    }

    debug!(
        "Listed {} file(s) under {} (recursive: {})",
        files.len(),
        root.display(),
        recursive
    );
    Ok(files)
}

/// Create a directory and its parents if it does not exist yet
pub fn create_dir_if_missing(path: &Path) -> Result<(), StorageError> {
    if directory_exists(path) {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Creation time recorded by the file system.
///
/// Falls back to the current time when the platform or file system does not
/// record it, or when the file cannot be inspected. Treat the value as
/// best-effort.
pub fn creation_time(path: &Path) -> DateTime<Local> {
    match fs::metadata(path).and_then(|metadata| metadata.created()) {
        Ok(created) => DateTime::<Local>::from(created),
        Err(e) => {
            error!(
                "Unable to get the creation date of {}: {}",
                path.display(),
                e
            );
            Local::now()
        }
    }
}

/// Check if file exists
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}
