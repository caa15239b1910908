//! Selective wheel extraction.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{Result, WheelhouseError};

/// Reserved suffix marking a wheel's metadata directory.
const DIST_INFO_SUFFIX: &str = ".dist-info";

/// Extract a wheel into `target_dir`, returning the set of files written.
///
/// When `keep_metadata` is false every entry under a `*.dist-info/` directory
/// is skipped, the `RECORD` manifest included, so no packaging metadata
/// survives in the target directory. Entry paths resolve against
/// `target_dir` only, never against the archive's own location.
pub fn extract_wheel(
    archive: &Path,
    target_dir: &Path,
    keep_metadata: bool,
) -> Result<HashSet<PathBuf>> {
    let file = File::open(archive)
        .map_err(|e| extraction_error(archive, format!("failed to open wheel: {}", e)))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| extraction_error(archive, format!("failed to open zip: {}", e)))?;

    std::fs::create_dir_all(target_dir)
        .map_err(|e| extraction_error(archive, format!("failed to create target: {}", e)))?;

    let mut written = HashSet::new();

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| extraction_error(archive, format!("failed to read zip entry: {}", e)))?;

        let name = entry.name().to_string();
        if name.is_empty() {
            continue;
        }

        if !keep_metadata && is_metadata_path(&name) {
            log::trace!("Skipping metadata entry {}", name);
            continue;
        }

        // Entry names are untrusted. Absolute paths and `..` components are
        // rejected here, before anything is created on disk, so a hostile
        // archive leaves no trace outside the target directory.
        let relative = match entry.enclosed_name() {
            Some(relative) => relative,
            None => {
                return Err(extraction_error(
                    archive,
                    format!("unsafe entry path in archive: {}", name),
                ));
            }
        };
        let outpath = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| {
                extraction_error(archive, format!("failed to create {}: {}", name, e))
            })?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                extraction_error(archive, format!("failed to create {}: {}", name, e))
            })?;
        }

        let mut outfile = File::create(&outpath)
            .map_err(|e| extraction_error(archive, format!("failed to write {}: {}", name, e)))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| extraction_error(archive, format!("failed to write {}: {}", name, e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| {
                        extraction_error(archive, format!("failed to write {}: {}", name, e))
                    })?;
            }
        }

        written.insert(outpath);
    }

    Ok(written)
}

/// True for entries belonging to the wheel's metadata subtree.
///
/// The `RECORD` manifest is matched separately so it never survives on its
/// own when the rest of the metadata directory is excluded.
fn is_metadata_path(name: &str) -> bool {
    name.split('/')
        .any(|segment| segment.ends_with(DIST_INFO_SUFFIX))
        || name.ends_with(".dist-info/RECORD")
}

fn extraction_error(archive: &Path, reason: String) -> WheelhouseError {
    WheelhouseError::Extraction {
        archive: archive.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_wheel(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    const ENTRIES: &[(&str, &str)] = &[
        ("a.py", "print('hi')\n"),
        ("pkg.dist-info/METADATA", "Name: pkg\n"),
        ("pkg.dist-info/RECORD", "a.py,,\n"),
    ];

    #[test]
    fn test_extract_skips_dist_info() {
        let dir = TempDir::new().unwrap();
        let wheel = dir.path().join("pkg-1.0-py3-none-any.whl");
        write_wheel(&wheel, ENTRIES);

        let target = dir.path().join("out");
        let written = extract_wheel(&wheel, &target, false).unwrap();

        assert_eq!(written, HashSet::from([target.join("a.py")]));
        assert!(target.join("a.py").exists());
        assert!(!target.join("pkg.dist-info").exists());
    }

    #[test]
    fn test_extract_keeps_dist_info() {
        let dir = TempDir::new().unwrap();
        let wheel = dir.path().join("pkg-1.0-py3-none-any.whl");
        write_wheel(&wheel, ENTRIES);

        let target = dir.path().join("out");
        let written = extract_wheel(&wheel, &target, true).unwrap();

        assert_eq!(written.len(), 3);
        assert!(target.join("a.py").exists());
        assert!(target.join("pkg.dist-info/METADATA").exists());
        assert!(target.join("pkg.dist-info/RECORD").exists());
    }

    #[test]
    fn test_extract_into_different_directory() {
        let archive_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        let wheel = archive_dir.path().join("pkg-1.0-py3-none-any.whl");
        write_wheel(&wheel, &[("pkg/deep/mod.py", "x = 1\n")]);

        let written = extract_wheel(&wheel, target_dir.path(), false).unwrap();

        let expected = target_dir.path().join("pkg/deep/mod.py");
        assert_eq!(written, HashSet::from([expected.clone()]));
        assert!(expected.exists());
        // Nothing lands next to the archive
        assert!(!archive_dir.path().join("pkg").exists());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let wheel = dir.path().join("evil-1.0-py3-none-any.whl");
        write_wheel(&wheel, &[("../evil.py", "boom\n")]);

        let target = dir.path().join("out");
        let result = extract_wheel(&wheel, &target, false);
        assert!(matches!(result, Err(WheelhouseError::Extraction { .. })));
        assert!(!dir.path().join("evil.py").exists());
    }

    #[test]
    fn test_traversal_rejected_before_creating_directories() {
        let dir = TempDir::new().unwrap();
        let wheel = dir.path().join("evil-1.0-py3-none-any.whl");
        write_wheel(&wheel, &[("../stray/evil.py", "boom\n")]);

        let target = dir.path().join("out");
        let result = extract_wheel(&wheel, &target, false);

        // Rejection happens before parent creation, so not even the
        // intermediate directory appears outside the target.
        assert!(matches!(result, Err(WheelhouseError::Extraction { .. })));
        assert!(!dir.path().join("stray").exists());
    }

    #[test]
    fn test_absolute_entry_rejected() {
        let dir = TempDir::new().unwrap();
        let wheel = dir.path().join("evil-1.0-py3-none-any.whl");
        write_wheel(&wheel, &[("/evil.py", "boom\n")]);

        let target = dir.path().join("out");
        let result = extract_wheel(&wheel, &target, false);
        assert!(matches!(result, Err(WheelhouseError::Extraction { .. })));
        assert!(!Path::new("/evil.py").exists());
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = TempDir::new().unwrap();
        let wheel = dir.path().join("broken-1.0-py3-none-any.whl");
        std::fs::write(&wheel, b"not a zip").unwrap();

        let result = extract_wheel(&wheel, dir.path(), false);
        assert!(matches!(result, Err(WheelhouseError::Extraction { .. })));
    }

    #[test]
    fn test_is_metadata_path() {
        assert!(is_metadata_path("pkg.dist-info/METADATA"));
        assert!(is_metadata_path("pkg.dist-info/RECORD"));
        assert!(is_metadata_path("pkg.dist-info/licenses/LICENSE"));
        assert!(!is_metadata_path("pkg/data.py"));
        assert!(!is_metadata_path("a.py"));
    }
}
