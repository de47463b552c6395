//! Single-file zip archiving
//!
//! Failures here are [`Severity::Major`](crate::error::Severity::Major): the
//! archive is a required output of whatever workflow asked for it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::StorageError;

/// Path of the archive produced for `path`: same directory, same base name
/// with its last extension replaced by `.zip`.
pub fn archive_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}.zip"))
}

/// Zips `path` into a sibling `.zip` file holding exactly one entry, named
/// after the source file. An existing archive is overwritten.
pub fn zip_single_file(path: &Path) -> Result<PathBuf, StorageError> {
    debug!("Start zip_single_file");
    let archive_path = archive_path_for(path);
    if archive_path == path {
        return Err(StorageError::ArchiveCollision {
            path: path.to_path_buf(),
        });
    }

    let entry_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| major_io(path, io::Error::other("path has no file name")))?;

    let mut source = File::open(path).map_err(|e| major_io(path, e))?;
    let target = File::create(&archive_path).map_err(|e| major_io(path, e))?;

    if let Err(e) = write_entry(path, &mut source, target, entry_name) {
        if let Err(cleanup) = fs::remove_file(&archive_path) {
            warn!(
                "Unable to remove partial archive {}: {}",
                archive_path.display(),
                cleanup
            );
        }
        return Err(e);
    }

    info!(
        "Zipped {} into {}",
        path.display(),
        archive_path.display()
    );
    debug!("End zip_single_file");
    Ok(archive_path)
}

fn write_entry(
    path: &Path,
    source: &mut File,
    target: File,
    entry_name: String,
) -> Result<(), StorageError> {
    let archive_error = |source: zip::result::ZipError| StorageError::Archive {
        path: path.to_path_buf(),
        source,
    };

    let mut zip = ZipWriter::new(target);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name, options).map_err(archive_error)?;
    io::copy(source, &mut zip).map_err(|e| major_io(path, e))?;
    zip.finish().map_err(archive_error)?;
    Ok(())
}

fn major_io(path: &Path, error: io::Error) -> StorageError {
    StorageError::Archive {
        path: path.to_path_buf(),
        source: zip::result::ZipError::Io(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;

    #[test]
    fn archive_name_replaces_last_extension() {
        assert_eq!(
            archive_path_for(Path::new("/data/report.final.csv")),
            PathBuf::from("/data/report.final.zip")
        );
        assert_eq!(
            archive_path_for(Path::new("/data/README")),
            PathBuf::from("/data/README.zip")
        );
        assert_eq!(
            archive_path_for(Path::new("/home/me/.bashrc")),
            PathBuf::from("/home/me/.bashrc.zip")
        );
    }

    #[test]
    fn zipping_a_zip_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        std::fs::write(&path, "payload").unwrap();

        let err = zip_single_file(&path).unwrap_err();
        assert_eq!(err.severity(), Severity::Major);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "payload");
    }

    #[test]
    fn failed_copy_leaves_no_archive_behind() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("folder.d");
        std::fs::create_dir(&source).unwrap();

        let err = zip_single_file(&source).unwrap_err();
        assert_eq!(err.severity(), Severity::Major);
        assert!(!dir.path().join("folder.zip").exists());
    }

    #[test]
    fn missing_source_is_major() {
        let dir = tempfile::tempdir().unwrap();
        let err = zip_single_file(&dir.path().join("ghost.txt")).unwrap_err();
        assert_eq!(err.severity(), Severity::Major);
        assert!(err.to_string().contains("ghost.txt"));
    }
}
