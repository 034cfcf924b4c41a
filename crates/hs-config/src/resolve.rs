//! Config path resolution.
//!
//! Resolution order: CLI argument → environment variable → default file
//! in the target root.

use crate::CONFIG_FILENAME;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file path.
pub const ENV_CONFIG_PATH: &str = "HOTSWAP_CONFIG";

/// Where the config file path came from (for diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via the HOTSWAP_CONFIG environment variable.
    Environment,

    /// Default `updater.conf` in the target root.
    #[default]
    TargetRoot,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::TargetRoot => write!(f, "target root default"),
        }
    }
}

/// Resolve the config file path for a run.
///
/// The returned path is not checked for existence; loading reports a
/// missing file with the source attached so the operator can see where
/// the path came from.
pub fn resolve_config_path(cli_path: Option<&Path>, target_root: &Path) -> (PathBuf, ConfigSource) {
    if let Some(path) = cli_path {
        return (path.to_path_buf(), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.is_empty() {
            return (PathBuf::from(env_path), ConfigSource::Environment);
        }
    }

    (target_root.join(CONFIG_FILENAME), ConfigSource::TargetRoot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let (path, source) =
            resolve_config_path(Some(Path::new("/etc/custom.conf")), Path::new("/srv/app"));
        assert_eq!(path, PathBuf::from("/etc/custom.conf"));
        assert_eq!(source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_target_root_default() {
        // Env-var resolution is covered by the CLI e2e tests; mutating
        // process env here would race with parallel tests.
        if std::env::var(ENV_CONFIG_PATH).is_ok() {
            return;
        }
        let (path, source) = resolve_config_path(None, Path::new("/srv/app"));
        assert_eq!(path, PathBuf::from("/srv/app/updater.conf"));
        assert_eq!(source, ConfigSource::TargetRoot);
    }
}
