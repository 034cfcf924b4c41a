//! Fatal error taxonomy for update/rollback runs.
//!
//! Recycle and cleanup failures are deliberately not errors: they do
//! not abort a run, so they are carried in the per-step reports
//! ([`crate::recycle::RecycleReport`], [`crate::cleanup::CleanupReport`])
//! and surfaced as warnings in the run summary.

use hs_archive::ArchiveError;
use hs_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an update or rollback run.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Configuration missing or invalid; nothing was touched.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Release package missing or unparsable.
    #[error("cannot read package '{path}': {source}")]
    PackageUnreadable {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },

    /// Could not move an existing file to its backup path. The run
    /// aborts before any destination is overwritten.
    #[error("failed to stage '{path}': {source}")]
    StagingFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Package extraction did not complete.
    #[error("extraction failed: {0}")]
    ExtractionFailed(#[source] ArchiveError),

    /// Rollback could not move a backup back into place.
    #[error("failed to restore '{path}': {source}")]
    RestoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for update operations.
pub type Result<T> = std::result::Result<T, UpdateError>;
