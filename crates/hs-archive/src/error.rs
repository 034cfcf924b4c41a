//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or extracting a release package.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Package file does not exist
    #[error("package not found: {0}")]
    NotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Entry path escapes the extraction root (e.g. `../` components)
    #[error("unsafe entry path in package: {0}")]
    UnsafeEntryPath(String),
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
