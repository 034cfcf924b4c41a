//! Lifecycle controller: sequences the update and rollback flows.
//!
//! Update: `Init → Staging → Extracting → Recycling → Cleanup →
//! ExitScheduled → Terminated`. Rollback swaps `Extracting` for
//! `Restoring` and stages to the rollback temp namespace instead.
//! Failures in Init/Staging/Extracting/Restoring are fatal; Recycling
//! and Cleanup failures are recorded as warnings and the run proceeds.

use crate::cleanup::{sweep, CleanupPolicy, CleanupReport};
use crate::error::{Result, UpdateError};
use crate::model::{RunMode, TEMP_SUFFIX};
use crate::recycle::{recycle_all, RecycleReport, ServiceController};
use crate::restore::{restore_backups, RestoreReport};
use crate::staging::stage_existing;
use hs_archive::ReleaseArchive;
use hs_config::UpdaterConfig;
use serde::Serialize;
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{info, warn};

/// Protocol stage, logged as a structured field on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Staging,
    Extracting,
    Restoring,
    Recycling,
    Cleanup,
    ExitScheduled,
    Terminated,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Staging => "staging",
            Stage::Extracting => "extracting",
            Stage::Restoring => "restoring",
            Stage::Recycling => "recycling",
            Stage::Cleanup => "cleanup",
            Stage::ExitScheduled => "exit_scheduled",
            Stage::Terminated => "terminated",
        };
        write!(f, "{s}")
    }
}

/// Everything one run needs, resolved up front and threaded explicitly.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Sole mutation surface: the directory mirroring the archive's
    /// relative paths.
    pub target_root: PathBuf,

    /// Settings loaded from the config file.
    pub config: UpdaterConfig,

    /// Update or Rollback, fixed for the process lifetime.
    pub mode: RunMode,
}

impl RunContext {
    /// Absolute path of the release package for this run.
    pub fn package_path(&self) -> PathBuf {
        self.target_root.join(&self.config.archive_path)
    }

    /// Cleanup retry bounds from the config.
    pub fn cleanup_policy(&self) -> CleanupPolicy {
        CleanupPolicy {
            interval: Duration::from_secs(self.config.cleanup_interval_secs),
            max_attempts: self.config.cleanup_max_attempts,
        }
    }
}

/// Serializable outcome of one run, printed to stdout at the end.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    /// File entries enumerated from the package.
    pub entries: usize,
    /// Existing files moved aside before the swap.
    pub staged: usize,
    /// Files written by extraction (Update flow only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<usize>,
    /// Restore counts (Rollback flow only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore: Option<RestoreReport>,
    pub recycle: RecycleReport,
    pub cleanup: CleanupReport,
}

impl RunSummary {
    /// Non-fatal problems: failed recycles plus an incomplete cleanup.
    pub fn warnings(&self) -> usize {
        let cleanup_warnings = usize::from(!self.cleanup.complete);
        self.recycle.failures.len() + cleanup_warnings
    }
}

/// Execute one full run, strictly sequentially.
pub fn run<C: ServiceController + ?Sized>(
    ctx: &RunContext,
    controller: &C,
) -> Result<RunSummary> {
    let package = ctx.package_path();
    info!(
        stage = %Stage::Init,
        mode = %ctx.mode,
        package = %package.display(),
        target = %ctx.target_root.display(),
        "Starting run"
    );

    let mut archive =
        ReleaseArchive::open(&package).map_err(|source| UpdateError::PackageUnreadable {
            path: package.clone(),
            source,
        })?;
    let entries = archive
        .entry_paths()
        .map_err(|source| UpdateError::PackageUnreadable {
            path: package.clone(),
            source,
        })?;

    info!(stage = %Stage::Staging, entries = entries.len(), "Staging existing files");
    let staged = stage_existing(&ctx.target_root, ctx.mode, &entries)?;

    let (extracted, restore) = match ctx.mode {
        RunMode::Update => {
            info!(stage = %Stage::Extracting, "Extracting package");
            let written = hs_archive::extract_to(&package, &ctx.target_root)
                .map_err(UpdateError::ExtractionFailed)?;
            (Some(written), None)
        }
        RunMode::Rollback => {
            info!(stage = %Stage::Restoring, "Restoring backups");
            let report = restore_backups(&ctx.target_root, &entries)?;
            (None, Some(report))
        }
    };

    info!(stage = %Stage::Recycling, services = ctx.config.services.len(), "Recycling services");
    let recycle = recycle_all(controller, &ctx.config.services);

    // Update-mode `.bak` backups are the rollback manifest and are
    // never swept; only `.temp` leftovers (rollback staging, or debris
    // from an earlier interrupted run) are eligible.
    info!(stage = %Stage::Cleanup, "Sweeping staging artifacts");
    let cleanup = sweep(&ctx.target_root, TEMP_SUFFIX, &ctx.cleanup_policy());

    let summary = RunSummary {
        mode: ctx.mode,
        entries: entries.len(),
        staged: staged.len(),
        extracted,
        restore,
        recycle,
        cleanup,
    };

    if summary.warnings() > 0 {
        warn!(warnings = summary.warnings(), "Run completed with warnings");
    } else {
        info!(mode = %ctx.mode, "Run completed");
    }

    Ok(summary)
}

/// Arm the delayed-exit timer: a fire-and-forget thread that sleeps for
/// `delay` so final log output flushes before the process terminates.
/// By the time it fires all work is done, so no cancellation hook is
/// needed; the caller joins the handle and then exits.
pub fn schedule_exit(delay: Duration) -> JoinHandle<()> {
    info!(
        stage = %Stage::ExitScheduled,
        delay_secs = delay.as_secs(),
        "Exit scheduled"
    );
    std::thread::spawn(move || std::thread::sleep(delay))
}
