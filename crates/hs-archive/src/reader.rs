//! Read-only access to a release package.

use crate::{ArchiveError, Result};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

/// A release package opened read-only.
///
/// Wraps a ZIP archive and exposes its file entries in archive order.
/// Opening performs no filesystem mutation beyond the read-only open of
/// the package itself.
pub struct ReleaseArchive {
    archive: ZipArchive<File>,
}

impl ReleaseArchive {
    /// Open a release package from a file path.
    ///
    /// Fails with [`ArchiveError::NotFound`] if the path does not exist
    /// and [`ArchiveError::Zip`] if the file is not a parsable archive.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ArchiveError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;

        info!(
            package = %path.display(),
            entries = archive.len(),
            "Release package opened"
        );

        Ok(Self { archive })
    }

    /// Total number of entries, directories included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the package has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Enumerate the relative paths of all file entries, in archive order.
    ///
    /// Directory entries are skipped; the result holds one full
    /// enumeration, so call again to re-enumerate. Entry paths that
    /// would escape the extraction root are rejected.
    pub fn entry_paths(&mut self) -> Result<Vec<String>> {
        let mut paths = Vec::new();

        for i in 0..self.archive.len() {
            let entry = self.archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            if entry.enclosed_name().is_none() {
                return Err(ArchiveError::UnsafeEntryPath(entry.name().to_string()));
            }
            paths.push(entry.name().to_string());
        }

        debug!(files = paths.len(), "Enumerated package entries");

        Ok(paths)
    }
}
