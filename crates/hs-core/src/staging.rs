//! Backup staging: move existing files aside before extraction.

use crate::error::{Result, UpdateError};
use crate::model::{staging_path, RunMode, StagedFile};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Stage every entry that already exists under the target root.
///
/// For each entry path P where `target_root/P` is a regular file, the
/// file is renamed to its deterministic staging path (`.bak` in Update
/// mode, `.temp` in Rollback mode). Entries with no existing target are
/// skipped silently - the first-install case. A pre-existing artifact
/// at the staging path is replaced (last-writer-wins), which is what
/// makes a repeated update safe.
///
/// Rename, never delete-then-copy: the original bytes stay on disk at
/// all times. The first rename failure (typically a file still locked
/// by a running service) aborts the run; files staged before the
/// failure remain recoverable at their staging paths and no destination
/// has been overwritten yet.
pub fn stage_existing(
    target_root: &Path,
    mode: RunMode,
    entries: &[String],
) -> Result<Vec<StagedFile>> {
    let mut staged = Vec::new();

    for entry in entries {
        let current = target_root.join(entry);
        if !current.is_file() {
            debug!(path = %current.display(), "No existing file, skipping staging");
            continue;
        }

        let backup = staging_path(target_root, entry, mode);

        // Last-writer-wins: drop any stale artifact so the rename
        // succeeds on platforms where rename won't overwrite.
        if backup.exists() {
            debug!(path = %backup.display(), "Replacing stale staging artifact");
            fs::remove_file(&backup).map_err(|source| UpdateError::StagingFailed {
                path: entry.into(),
                source,
            })?;
        }

        fs::rename(&current, &backup).map_err(|source| UpdateError::StagingFailed {
            path: entry.into(),
            source,
        })?;

        debug!(
            from = %current.display(),
            to = %backup.display(),
            "Staged existing file"
        );

        staged.push(StagedFile {
            original: entry.into(),
            backup,
            created_at: Utc::now(),
        });
    }

    info!(mode = %mode, staged = staged.len(), total = entries.len(), "Staging complete");

    Ok(staged)
}
