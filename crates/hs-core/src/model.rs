//! Run modes and staged-file records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Suffix for Update-mode backups. These double as the rollback
/// manifest and are preserved by the cleanup sweep.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Suffix for Rollback-mode staging temps. These are the cleanup
/// sweep's target.
pub const TEMP_SUFFIX: &str = ".temp";

/// Marker prefix on every staging artifact's file name.
pub const STAGING_PREFIX: &str = "_";

/// Which of the two top-level flows this run executes. Selected once at
/// start, immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Update,
    Rollback,
}

impl RunMode {
    /// Suffix of the staging artifacts this mode produces.
    pub fn staging_suffix(&self) -> &'static str {
        match self {
            RunMode::Update => BACKUP_SUFFIX,
            RunMode::Rollback => TEMP_SUFFIX,
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Update => write!(f, "update"),
            RunMode::Rollback => write!(f, "rollback"),
        }
    }
}

/// One file moved aside by the stager. Lives only in process memory for
/// the duration of a run; the on-disk backup is the durable trace.
#[derive(Debug, Clone, Serialize)]
pub struct StagedFile {
    /// Path as recorded in the archive, relative to the target root.
    pub original: PathBuf,

    /// Absolute path the file was renamed to.
    pub backup: PathBuf,

    /// When the rename happened.
    pub created_at: DateTime<Utc>,
}

/// Derive the staging path for an entry, deterministically.
///
/// `dir/name` maps to `dir/_name.bak` (Update) or `dir/_name.temp`
/// (Rollback), keeping the artifact next to the file it shadows. The
/// same derivation is replayed during rollback to rediscover backups
/// from the archive's entry list, so there is no persisted manifest.
pub fn staging_path(target_root: &Path, entry: &str, mode: RunMode) -> PathBuf {
    let entry_path = Path::new(entry);
    let name = entry_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.to_string());
    let staged_name = format!("{STAGING_PREFIX}{name}{}", mode.staging_suffix());

    match entry_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            target_root.join(parent).join(staged_name)
        }
        _ => target_root.join(staged_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_path_top_level() {
        let root = Path::new("/srv/app");
        assert_eq!(
            staging_path(root, "app.dll", RunMode::Update),
            PathBuf::from("/srv/app/_app.dll.bak")
        );
        assert_eq!(
            staging_path(root, "app.dll", RunMode::Rollback),
            PathBuf::from("/srv/app/_app.dll.temp")
        );
    }

    #[test]
    fn test_staging_path_nested() {
        let root = Path::new("/srv/app");
        assert_eq!(
            staging_path(root, "static/css/site.css", RunMode::Update),
            PathBuf::from("/srv/app/static/css/_site.css.bak")
        );
    }

    #[test]
    fn test_staging_path_is_deterministic() {
        let root = Path::new("/srv/app");
        let a = staging_path(root, "bin/app.dll", RunMode::Update);
        let b = staging_path(root, "bin/app.dll", RunMode::Update);
        assert_eq!(a, b);
    }

    #[test]
    fn test_backup_and_temp_never_collide() {
        let root = Path::new("/srv/app");
        assert_ne!(
            staging_path(root, "app.dll", RunMode::Update),
            staging_path(root, "app.dll", RunMode::Rollback)
        );
    }
}
