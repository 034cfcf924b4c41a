//! End-to-end protocol tests over a temporary target root.
//!
//! These drive `lifecycle::run` directly with a scripted service
//! controller, covering the reversibility, idempotence, and
//! partial-failure properties of the swap protocol.

use hs_config::UpdaterConfig;
use hs_core::lifecycle::{run, RunContext};
use hs_core::recycle::{RecycleError, ServiceController};
use hs_core::RunMode;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Records every recycle request; fails for the listed services.
struct ScriptedController {
    failing: HashSet<String>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedController {
    fn new() -> Self {
        Self::failing_for(&[])
    }

    fn failing_for(services: &[&str]) -> Self {
        Self {
            failing: services.iter().map(|s| s.to_string()).collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl ServiceController for ScriptedController {
    fn recycle(&self, service: &str) -> Result<(), RecycleError> {
        self.seen.lock().unwrap().push(service.to_string());
        if self.failing.contains(service) {
            return Err(RecycleError::CommandFailed {
                status: "exit status: 1".to_string(),
                stderr: "pool not found".to_string(),
            });
        }
        Ok(())
    }
}

fn write_package(root: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(root.join("release.zip")).unwrap();
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

fn context(root: &Path, mode: RunMode) -> RunContext {
    let config = UpdaterConfig::parse(
        "archivePath=release.zip\nserviceIdentifiers=pool1,pool2\ncleanupIntervalSecs=0\ncleanupMaxAttempts=2\n",
    )
    .unwrap();
    RunContext {
        target_root: root.to_path_buf(),
        config,
        mode,
    }
}

#[test]
fn update_then_rollback_restores_original_content() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("app.dll"), b"v1 bytes").unwrap();
    write_package(
        root,
        &[
            ("app.dll", b"v2 bytes".as_slice()),
            ("app.config", b"<settings/>".as_slice()),
        ],
    );

    // Update: back up app.dll, extract both entries, recycle both pools.
    let controller = ScriptedController::new();
    let summary = run(&context(root, RunMode::Update), &controller).unwrap();

    assert_eq!(summary.entries, 2);
    assert_eq!(summary.staged, 1);
    assert_eq!(summary.extracted, Some(2));
    assert_eq!(summary.warnings(), 0);
    assert_eq!(controller.seen(), vec!["pool1", "pool2"]);
    assert_eq!(fs::read(root.join("app.dll")).unwrap(), b"v2 bytes");
    assert_eq!(fs::read(root.join("app.config")).unwrap(), b"<settings/>");
    // The backup is preserved as the rollback manifest.
    assert_eq!(fs::read(root.join("_app.dll.bak")).unwrap(), b"v1 bytes");

    // Rollback with the same package restores the pre-update state.
    let controller = ScriptedController::new();
    let summary = run(&context(root, RunMode::Rollback), &controller).unwrap();

    let restore = summary.restore.expect("rollback produces a restore report");
    assert_eq!(restore.restored, 1);
    assert_eq!(restore.skipped, 1);
    assert!(summary.cleanup.complete);
    assert_eq!(fs::read(root.join("app.dll")).unwrap(), b"v1 bytes");
    // app.config was new in the update; rollback removes it again.
    assert!(!root.join("app.config").exists());
    // No staging artifacts survive a completed rollback.
    assert!(!root.join("_app.dll.bak").exists());
    assert!(!root.join("_app.dll.temp").exists());
    assert!(!root.join("_app.config.temp").exists());
}

#[test]
fn update_twice_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("app.dll"), b"v1").unwrap();
    write_package(root, &[("app.dll", b"v2".as_slice())]);

    let controller = ScriptedController::new();
    run(&context(root, RunMode::Update), &controller).unwrap();
    // Second run stages the already-updated file over the old backup
    // (last-writer-wins) and must not error.
    let summary = run(&context(root, RunMode::Update), &controller).unwrap();

    assert_eq!(summary.staged, 1);
    assert_eq!(fs::read(root.join("app.dll")).unwrap(), b"v2");
    assert_eq!(fs::read(root.join("_app.dll.bak")).unwrap(), b"v2");
}

#[test]
fn first_install_stages_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_package(
        root,
        &[
            ("app.dll", b"v1".as_slice()),
            ("static/site.css", b"body{}".as_slice()),
        ],
    );

    let controller = ScriptedController::new();
    let summary = run(&context(root, RunMode::Update), &controller).unwrap();

    assert_eq!(summary.staged, 0);
    assert_eq!(summary.extracted, Some(2));
    assert_eq!(fs::read(root.join("static/site.css")).unwrap(), b"body{}");
}

#[test]
fn one_failed_recycle_does_not_fail_the_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_package(root, &[("app.dll", b"v1".as_slice())]);

    let controller = ScriptedController::failing_for(&["pool1"]);
    let summary = run(&context(root, RunMode::Update), &controller).unwrap();

    // pool2 still got its restart attempt and the run stayed non-fatal.
    assert_eq!(controller.seen(), vec!["pool1", "pool2"]);
    assert_eq!(summary.recycle.succeeded, 1);
    assert_eq!(summary.recycle.failures.len(), 1);
    assert_eq!(summary.warnings(), 1);
}

#[test]
fn missing_package_is_fatal() {
    let temp = TempDir::new().unwrap();
    let controller = ScriptedController::new();

    let result = run(&context(temp.path(), RunMode::Update), &controller);

    assert!(matches!(
        result,
        Err(hs_core::UpdateError::PackageUnreadable { .. })
    ));
    // Nothing was recycled: the run aborted before its services step.
    assert!(controller.seen().is_empty());
}

#[cfg(unix)]
#[test]
fn incomplete_cleanup_is_a_warning_not_an_error() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_package(root, &[("app.dll", b"v1".as_slice())]);

    // A leftover temp artifact from an earlier interrupted rollback,
    // held in a directory the sweep cannot delete from.
    let held = root.join("held");
    fs::create_dir(&held).unwrap();
    fs::write(held.join("_old.dll.temp"), b"leftover").unwrap();
    fs::set_permissions(&held, fs::Permissions::from_mode(0o555)).unwrap();

    let controller = ScriptedController::new();
    let summary = run(&context(root, RunMode::Update), &controller).unwrap();

    fs::set_permissions(&held, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(!summary.cleanup.complete);
    assert_eq!(summary.cleanup.remaining.len(), 1);
    assert_eq!(summary.warnings(), 1);
    // The update itself still landed.
    assert_eq!(fs::read(root.join("app.dll")).unwrap(), b"v1");
}
