//! Per-file failures in local-file mode.
//!
//! Citation analysis never fails; only discovering and reading wikitext
//! files can.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// Open or read failed.
    Unreadable,
    /// Larger than `FsSourceConfig::max_file_size`.
    TooLarge,
    NotUtf8,
    /// A symlink resolved outside the directory being scanned.
    EscapesRoot,
    /// Directory traversal failed (permissions, symlink loop).
    Walk,
    BadExcludePattern,
}

/// A wikitext file that was skipped, with the reason.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    pub file: PathBuf,
    pub kind: ScanErrorKind,
    pub message: String,
}

impl ScanError {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, kind: ScanErrorKind, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: skipped, {}", self.file.display(), self.message)
    }
}
