//! File storage utilities
//!
//! Handles directory listing, encoded text I/O and single-file archiving.

pub mod archive;
pub mod filesystem;
pub mod text;

// Re-export commonly used operations
pub use archive::zip_single_file;
pub use filesystem::{creation_time, list_files};
pub use text::{read_lines, read_lines_ansi, write_lines, write_lines_ansi};
