//! Rollback restoration: move preserved backups back into place.

use crate::error::{Result, UpdateError};
use crate::model::{staging_path, RunMode};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of a restore pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RestoreReport {
    /// Backups moved back over their originals.
    pub restored: usize,

    /// Entries with no backup on disk (new in the update, or never
    /// staged).
    pub skipped: usize,
}

/// Restore Update-mode backups for the given entry list.
///
/// Backup paths are recomputed from the entries with the same
/// derivation the Update-mode stager used; the on-disk `.bak` files are
/// the only manifest. For each entry whose backup exists, the backup is
/// renamed back to the original path, overwriting whatever the update
/// placed there. Fail-fast: the first rename error aborts, leaving the
/// remaining backups untouched for a retry.
pub fn restore_backups(target_root: &Path, entries: &[String]) -> Result<RestoreReport> {
    let mut report = RestoreReport::default();

    for entry in entries {
        let backup = staging_path(target_root, entry, RunMode::Update);
        if !backup.is_file() {
            debug!(entry = %entry, "No backup to restore");
            report.skipped += 1;
            continue;
        }

        let original = target_root.join(entry);

        // On unix the rename below replaces the update's file
        // atomically, so the destination is never missing. Windows
        // rename refuses to overwrite, so the occupant has to go first.
        #[cfg(windows)]
        if original.exists() {
            fs::remove_file(&original).map_err(|source| UpdateError::RestoreFailed {
                path: entry.into(),
                source,
            })?;
        }

        fs::rename(&backup, &original).map_err(|source| UpdateError::RestoreFailed {
            path: entry.into(),
            source,
        })?;

        debug!(
            from = %backup.display(),
            to = %original.display(),
            "Restored backup"
        );
        report.restored += 1;
    }

    info!(
        restored = report.restored,
        skipped = report.skipped,
        "Restore complete"
    );

    Ok(report)
}
