//! Cleanup sweep: bounded retrying deletion of staging artifacts.
//!
//! The just-recycled services may hold handles on staged files for a
//! short grace period, and their release timing is not observable from
//! here, so the sweep polls: list matching artifacts, try to delete
//! them all, and on any error wait and re-list from scratch.

use crate::model::STAGING_PREFIX;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retry bounds for the sweep. The defaults (3 s x 20 attempts) give
/// services about a minute to let go of their handles.
#[derive(Debug, Clone, Copy)]
pub struct CleanupPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(hs_config::settings::DEFAULT_CLEANUP_INTERVAL_SECS),
            max_attempts: hs_config::settings::DEFAULT_CLEANUP_MAX_ATTEMPTS,
        }
    }
}

/// Outcome of a sweep. `complete == false` means the retry budget ran
/// out and `remaining` needs manual cleanup.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub attempts: u32,
    pub deleted: usize,
    pub complete: bool,
    pub remaining: Vec<PathBuf>,
}

/// Delete every staging artifact under `target_root` whose file name
/// carries the staging prefix and the given suffix.
///
/// Each attempt re-lists from scratch: a service may release one file
/// and still hold another, and a previous attempt's partial progress
/// must not be double-counted. Never touches artifacts with a different
/// suffix - in Update mode the sweep runs against `.temp` leftovers and
/// leaves the `.bak` rollback backups alone.
pub fn sweep(target_root: &Path, suffix: &str, policy: &CleanupPolicy) -> CleanupReport {
    let mut deleted_total = 0usize;
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        // A listing failure counts as a failed attempt like any held
        // file; the next attempt re-lists from scratch anyway.
        let mut listed = true;
        let matching = match list_artifacts(target_root, suffix) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(error = %e, attempt = attempts, "Failed to list staging artifacts");
                listed = false;
                Vec::new()
            }
        };

        let mut failed = Vec::new();
        for path in matching {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Deleted staging artifact");
                    deleted_total += 1;
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Artifact still held");
                    failed.push(path);
                }
            }
        }

        if listed && failed.is_empty() {
            info!(attempts, deleted = deleted_total, "Cleanup complete");
            return CleanupReport {
                attempts,
                deleted: deleted_total,
                complete: true,
                remaining: Vec::new(),
            };
        }

        if attempts >= policy.max_attempts {
            warn!(
                attempts,
                remaining = failed.len(),
                "Cleanup gave up; manual cleanup may be required"
            );
            return CleanupReport {
                attempts,
                deleted: deleted_total,
                complete: false,
                remaining: failed,
            };
        }

        debug!(
            attempt = attempts,
            remaining = failed.len(),
            wait_ms = policy.interval.as_millis() as u64,
            "Artifacts still held, retrying"
        );
        std::thread::sleep(policy.interval);
    }
}

/// Recursively collect staging artifacts with the given suffix.
fn list_artifacts(dir: &Path, suffix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect_into(dir, suffix, &mut found)?;
    Ok(found)
}

fn collect_into(dir: &Path, suffix: &str, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_into(&path, suffix, found)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with(STAGING_PREFIX) && name.ends_with(suffix) {
                found.push(path);
            }
        }
    }
    Ok(())
}
