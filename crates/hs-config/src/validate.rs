//! Semantic validation of parsed settings.

use crate::settings::UpdaterConfig;
use thiserror::Error;

/// Semantic problems in otherwise-parsable settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Service identifier with embedded whitespace
    #[error("service identifier contains whitespace: '{0}'")]
    ServiceWhitespace(String),

    /// Recycle command lacks the `{service}` placeholder
    #[error("recycleCommand must contain the {{service}} placeholder: '{0}'")]
    MissingServicePlaceholder(String),

    /// Recycle command is empty or whitespace-only
    #[error("recycleCommand is empty")]
    EmptyRecycleCommand,

    /// Cleanup attempt ceiling of zero would skip cleanup entirely
    #[error("cleanupMaxAttempts must be at least 1")]
    ZeroCleanupAttempts,
}

/// Validate a parsed config before any core logic runs.
pub fn validate_config(config: &UpdaterConfig) -> Result<(), ValidationError> {
    for service in &config.services {
        if service.chars().any(char::is_whitespace) {
            return Err(ValidationError::ServiceWhitespace(service.clone()));
        }
    }

    if config.recycle_command.trim().is_empty() {
        return Err(ValidationError::EmptyRecycleCommand);
    }
    if !config.recycle_command.contains("{service}") {
        return Err(ValidationError::MissingServicePlaceholder(
            config.recycle_command.clone(),
        ));
    }

    if config.cleanup_max_attempts == 0 {
        return Err(ValidationError::ZeroCleanupAttempts);
    }

    Ok(())
}
