//! Release archive enumeration and extraction for hotswap.
//!
//! A release package is a plain ZIP archive whose entry paths are
//! relative to the deployment target root. This crate provides the two
//! archive-facing operations of the updater:
//!
//! - [`ReleaseArchive`]: open a package read-only and enumerate its
//!   file entries in archive order (used to decide what to stage).
//! - [`extract_to`]: extract every entry into the target root,
//!   overwriting whatever is at each destination.
//!
//! # Example
//!
//! ```no_run
//! use hs_archive::ReleaseArchive;
//! use std::path::Path;
//!
//! let mut archive = ReleaseArchive::open(Path::new("release.zip")).unwrap();
//! for entry in archive.entry_paths().unwrap() {
//!     println!("{entry}");
//! }
//! hs_archive::extract_to(Path::new("release.zip"), Path::new("/srv/app")).unwrap();
//! ```

pub mod error;
pub mod extract;
pub mod reader;

pub use error::{ArchiveError, Result};
pub use extract::extract_to;
pub use reader::ReleaseArchive;
