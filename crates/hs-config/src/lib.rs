//! hotswap configuration loading and validation.
//!
//! This crate provides:
//! - A typed struct for the `updater.conf` key/value file
//! - Config path resolution (CLI → env → target-root default)
//! - Semantic validation of the loaded settings
//!
//! The config file format is deliberately plain: one `key=value` per
//! line, `#` comments, blank lines ignored. The updater runs unattended
//! next to the application it updates, so the file normally sits in the
//! target root itself.

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config_path, ConfigSource};
pub use settings::{ConfigError, UpdaterConfig};
pub use validate::ValidationError;

/// Standard config file name, looked up in the target root by default.
pub const CONFIG_FILENAME: &str = "updater.conf";
