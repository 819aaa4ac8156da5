//! Filesystem substrate for AgentSync
//!
//! Provides normalized path handling, atomic I/O, and checksum utilities
//! shared by the synchronization core.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{compute_content_checksum, compute_file_checksum};
pub use error::{Error, Result};
pub use io::{copy_recursive, read_bytes, read_text, write_atomic, write_text};
pub use path::NormalizedPath;

use std::path::PathBuf;

/// Get the current user's home directory.
///
/// # Errors
///
/// Returns [`Error::HomeDirNotFound`] when no home directory can be
/// determined (e.g. stripped-down CI containers).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(Error::HomeDirNotFound)
}
