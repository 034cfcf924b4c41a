//! Typed settings parsed from the `updater.conf` key/value file.

use crate::validate::{validate_config, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default recycle command template; `{service}` is substituted per
/// identifier.
pub const DEFAULT_RECYCLE_COMMAND: &str = "systemctl restart {service}";

/// Default seconds between cleanup sweep attempts.
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3;

/// Default cleanup attempt ceiling (with the default interval this is
/// roughly one minute of retrying before giving up).
pub const DEFAULT_CLEANUP_MAX_ATTEMPTS: u32 = 20;

/// Default seconds between the end of the run and process exit.
pub const DEFAULT_EXIT_DELAY_SECS: u64 = 5;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// I/O error reading the config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line without a `key=value` shape
    #[error("malformed config line {line_no}: '{line}'")]
    Syntax { line_no: usize, line: String },

    /// Required key absent
    #[error("missing required config key: {0}")]
    MissingKey(&'static str),

    /// Value failed to parse for its key
    #[error("invalid value for '{key}': '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Settings parsed but failed semantic validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Resolved updater settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Release package path, relative to the target root.
    pub archive_path: PathBuf,

    /// Service identifiers to recycle after the swap, in config order.
    pub services: Vec<String>,

    /// Recycle command template; `{service}` is replaced per identifier.
    pub recycle_command: String,

    /// Seconds to wait between cleanup sweep attempts.
    pub cleanup_interval_secs: u64,

    /// Cleanup sweep attempt ceiling before giving up.
    pub cleanup_max_attempts: u32,

    /// Seconds between run completion and process exit.
    pub exit_delay_secs: u64,
}

impl UpdaterConfig {
    /// Load and validate settings from a config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse settings from config file content.
    ///
    /// Duplicate keys are last-writer-wins; unknown keys warn and are
    /// ignored so old configs keep working across versions.
    pub fn parse(content: &str) -> Result<Self> {
        let mut archive_path: Option<PathBuf> = None;
        let mut services: Option<Vec<String>> = None;
        let mut recycle_command = DEFAULT_RECYCLE_COMMAND.to_string();
        let mut cleanup_interval_secs = DEFAULT_CLEANUP_INTERVAL_SECS;
        let mut cleanup_max_attempts = DEFAULT_CLEANUP_MAX_ATTEMPTS;
        let mut exit_delay_secs = DEFAULT_EXIT_DELAY_SECS;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Syntax {
                line_no: idx + 1,
                line: line.to_string(),
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "archivePath" => archive_path = Some(PathBuf::from(value)),
                "serviceIdentifiers" => {
                    services = Some(
                        value
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect(),
                    );
                }
                "recycleCommand" => recycle_command = value.to_string(),
                "cleanupIntervalSecs" => {
                    cleanup_interval_secs = parse_number("cleanupIntervalSecs", value)?;
                }
                "cleanupMaxAttempts" => {
                    cleanup_max_attempts = parse_number("cleanupMaxAttempts", value)?;
                }
                "exitDelaySecs" => {
                    exit_delay_secs = parse_number("exitDelaySecs", value)?;
                }
                other => {
                    warn!(key = other, line = idx + 1, "Ignoring unknown config key");
                }
            }
        }

        let archive_path = archive_path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingKey("archivePath"))?;
        let services = services
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingKey("serviceIdentifiers"))?;

        Ok(Self {
            archive_path,
            services,
            recycle_command,
            cleanup_interval_secs,
            cleanup_max_attempts,
            exit_delay_secs,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
