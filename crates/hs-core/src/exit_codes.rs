//! Exit codes for the hotswap CLI.
//!
//! Exit code ranges:
//! - 0-1: run outcomes (parse outcome from code, not output)
//! - 10-19: user/environment errors (recoverable by the operator)
//! - 20-29: internal errors

use crate::error::UpdateError;

/// Exit codes for updater runs. Stable contract for the scripts that
/// invoke the updater unattended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Full success (also the default for runs whose only problems were
    /// non-fatal recycle/cleanup warnings).
    Clean = 0,

    /// Swap succeeded but recycling or cleanup reported failures.
    /// Emitted only under `--strict`.
    CompletedWithWarnings = 1,

    /// Configuration missing or invalid.
    ConfigError = 10,

    /// Release package missing or unparsable.
    PackageError = 11,

    /// Could not stage an existing file out of the way.
    StagingError = 12,

    /// Extraction did not complete.
    ExtractionError = 13,

    /// Rollback could not restore a backup.
    RestoreError = 14,

    /// Unexpected internal error.
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&UpdateError> for ExitCode {
    fn from(err: &UpdateError) -> Self {
        match err {
            UpdateError::Config(_) => ExitCode::ConfigError,
            UpdateError::PackageUnreadable { .. } => ExitCode::PackageError,
            UpdateError::StagingFailed { .. } => ExitCode::StagingError,
            UpdateError::ExtractionFailed(_) => ExitCode::ExtractionError,
            UpdateError::RestoreFailed { .. } => ExitCode::RestoreError,
        }
    }
}
