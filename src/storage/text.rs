//! Text file operations
//!
//! Line-based reads and writes with an explicit character encoding. The
//! default encoding is windows-1252, not UTF-8: every byte decodes to some
//! character, so non-ASCII UTF-8 input comes back as mojibake rather than
//! as an error.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1252};
use log::debug;
use serde::Serialize;

use crate::error::StorageError;

/// Encoding used when the caller does not name one.
pub fn default_encoding() -> &'static Encoding {
    WINDOWS_1252
}

/// Separator appended after every written line
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Resolve an encoding label such as `"UTF-8"`, `"latin1"` or `"Cp1252"`.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, StorageError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| StorageError::UnknownEncoding(label.to_string()))
}

/// Reads the whole file and splits it into lines without their terminators.
pub fn read_lines(path: &Path, encoding: &'static Encoding) -> Result<Vec<String>, StorageError> {
    let bytes = fs::read(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
    if had_errors {
        return Err(StorageError::Malformed {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }

    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    debug!(
        "Read {} line(s) from {} as {}",
        lines.len(),
        path.display(),
        encoding.name()
    );
    Ok(lines)
}

/// Reads the whole file with the default encoding
pub fn read_lines_ansi(path: &Path) -> Result<Vec<String>, StorageError> {
    read_lines(path, default_encoding())
}

/// First line of the file, or an empty string when the file is empty.
pub fn read_first_line(path: &Path) -> Result<String, StorageError> {
    Ok(read_lines_ansi(path)?.into_iter().next().unwrap_or_default())
}

/// Overwrites `path` with `lines`, each followed by [`LINE_SEPARATOR`].
///
/// The file is created when absent. The parent directory must exist.
pub fn write_lines<S: AsRef<str>>(
    path: &Path,
    lines: &[S],
    encoding: &'static Encoding,
) -> Result<(), StorageError> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push_str(LINE_SEPARATOR);
    }

    let bytes = encode_text(path, &text, encoding)?;
    fs::write(path, &bytes).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} line(s) to {}", lines.len(), path.display());
    Ok(())
}

// encoding_rs only encodes to an encoding's output encoding, which is UTF-8
// for UTF-16 and the replacement encoding.
fn encode_text(
    path: &Path,
    text: &str,
    encoding: &'static Encoding,
) -> Result<Vec<u8>, StorageError> {
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }
    if encoding.output_encoding() != encoding {
        return Err(StorageError::UnsupportedOutput {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }

    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(StorageError::Unmappable {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}

/// Overwrites `path` with `lines` in the default encoding
pub fn write_lines_ansi<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), StorageError> {
    write_lines(path, lines, default_encoding())
}

/// Serialize `value` to JSON and write it to `path` as a single line.
pub fn export_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), StorageError> {
    debug!("Start export_json");
    let json = serde_json::to_string(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_lines_ansi(path, &[json])?;
    debug!("End export_json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    #[test]
    fn cp1252_label_resolves_to_windows_1252() {
        assert_eq!(encoding_for_label("Cp1252").unwrap(), WINDOWS_1252);
        assert_eq!(encoding_for_label("utf-8").unwrap(), UTF_8);
        assert!(matches!(
            encoding_for_label("klingon"),
            Err(StorageError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn default_encoding_decodes_bytes_as_single_byte_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        fs::write(&path, [b'c', b'a', b'f', 0xE9, b'\n']).unwrap();

        assert_eq!(read_lines_ansi(&path).unwrap(), vec!["café".to_string()]);
    }

    #[test]
    fn utf8_text_read_with_default_encoding_is_not_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utf8.txt");
        fs::write(&path, "é").unwrap();

        assert_eq!(read_lines_ansi(&path).unwrap(), vec!["Ã©".to_string()]);
    }

    #[test]
    fn malformed_utf8_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0xFF, 0xFE, 0xFD]).unwrap();

        let err = read_lines(&path, UTF_8).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();

        assert_eq!(read_lines(&path, UTF_8).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn unmappable_characters_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let err = write_lines_ansi(&path, &["日本"]).unwrap_err();
        assert!(matches!(err, StorageError::Unmappable { .. }));
    }

    #[test]
    fn write_lines_terminates_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_lines(&path, &["a", "b"], UTF_8).unwrap();
        let expected = format!("a{LINE_SEPARATOR}b{LINE_SEPARATOR}");
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn utf16_is_written_as_utf16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");

        write_lines(&path, &["ab", "é"], UTF_16LE).unwrap();
        assert_eq!(&fs::read(&path).unwrap()[..4], &[b'a', 0, b'b', 0]);
        assert_eq!(read_lines(&path, UTF_16LE).unwrap(), vec!["ab", "é"]);

        write_lines(&path, &["ab"], UTF_16BE).unwrap();
        assert_eq!(&fs::read(&path).unwrap()[..4], &[0, b'a', 0, b'b']);
        assert_eq!(read_lines(&path, UTF_16BE).unwrap(), vec!["ab"]);
    }

    #[test]
    fn decode_only_encodings_refuse_to_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let replacement = encoding_for_label("iso-2022-kr").unwrap();

        let err = write_lines(&path, &["x"], replacement).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedOutput { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn first_line_of_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        assert_eq!(read_first_line(&path).unwrap(), "");
    }

    #[test]
    fn export_json_writes_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        export_json(&serde_json::json!({"name": "starter"}), &path).unwrap();
        assert_eq!(
            read_lines_ansi(&path).unwrap(),
            vec![r#"{"name":"starter"}"#.to_string()]
        );
    }
}
