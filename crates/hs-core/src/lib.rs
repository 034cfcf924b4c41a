//! hotswap core - staged file-swap and rollback protocol.
//!
//! The updater runs unattended next to the application it updates. An
//! Update run enumerates the release package, renames every file it is
//! about to overwrite to a deterministic backup path, extracts the
//! package over the target root, recycles the configured services, and
//! sweeps leftover staging artifacts. A Rollback run with the same
//! package reverses the swap from the preserved backups.
//!
//! Module map:
//! - [`model`] - run modes, staged-file records, backup path derivation
//! - [`staging`] - move existing files aside before extraction
//! - [`restore`] - move preserved backups back into place
//! - [`recycle`] - restart the configured services, best effort
//! - [`cleanup`] - bounded retrying deletion of staging artifacts
//! - [`lifecycle`] - sequences the above into the two top-level flows

pub mod cleanup;
pub mod error;
pub mod exit_codes;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod output;
pub mod recycle;
pub mod restore;
pub mod staging;

pub use error::{Result, UpdateError};
pub use exit_codes::ExitCode;
pub use lifecycle::{run, RunContext, RunSummary};
pub use model::{RunMode, StagedFile};
