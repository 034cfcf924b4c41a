//! Package extraction into the target root.

use crate::{ArchiveError, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

/// Extract every entry of the package at `package` into `target_root`.
///
/// Destinations are overwritten; the staging step is expected to have
/// relocated any old occupant beforehand. Parent directories are
/// created as needed and unix permission bits are restored where the
/// archive records them. Each written file is fsynced, so this call
/// returns only once the filesystem reports all content durable.
///
/// Returns the number of files written.
pub fn extract_to(package: &Path, target_root: &Path) -> Result<usize> {
    if !package.exists() {
        return Err(ArchiveError::NotFound(package.to_path_buf()));
    }

    let file = File::open(package)?;
    let mut archive = ZipArchive::new(file)?;

    let mut written = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ArchiveError::UnsafeEntryPath(entry.name().to_string()))?;
        let dest = target_root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&dest)?;
        io::copy(&mut entry, &mut out)?;
        out.sync_all()?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dest, fs::Permissions::from_mode(mode))?;
        }

        debug!(path = %dest.display(), bytes = entry.size(), "Extracted entry");
        written += 1;
    }

    info!(
        package = %package.display(),
        target = %target_root.display(),
        files = written,
        "Extraction complete"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn write_test_package(dir: &Path, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
        let path = dir.join("release.zip");
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_extract_creates_nested_paths() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("site");
        fs::create_dir_all(&root).unwrap();
        let package = write_test_package(
            temp.path(),
            &[
                ("app.dll", b"v2".as_slice()),
                ("static/css/site.css", b"body{}".as_slice()),
            ],
        );

        let written = extract_to(&package, &root).unwrap();
        assert_eq!(written, 2);
        assert_eq!(fs::read(root.join("app.dll")).unwrap(), b"v2");
        assert_eq!(fs::read(root.join("static/css/site.css")).unwrap(), b"body{}");
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("site");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("app.dll"), b"v1").unwrap();
        let package = write_test_package(temp.path(), &[("app.dll", b"v2".as_slice())]);

        extract_to(&package, &root).unwrap();
        assert_eq!(fs::read(root.join("app.dll")).unwrap(), b"v2");
    }

    #[test]
    fn test_extract_missing_package() {
        let temp = TempDir::new().unwrap();
        let result = extract_to(&temp.path().join("nope.zip"), temp.path());
        assert!(matches!(result, Err(ArchiveError::NotFound(_))));
    }
}
