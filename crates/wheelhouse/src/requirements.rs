//! Aggregation of per-wheel requirements into one file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::metadata::WheelMetadata;
use crate::Result;

/// Append-only text sink for requirement specifiers, one per line.
///
/// Opened (and truncated) once per run, shared by every wheel processed in
/// that run, closed after the last one.
pub struct RequirementsSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RequirementsSink {
    /// Create or truncate the requirements file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, specifier: &str) -> Result<()> {
        writeln!(self.writer, "{}", specifier)?;
        Ok(())
    }

    /// Flush buffered requirements to disk.
    pub fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Append a wheel's unconditional requirements to the sink, one line each,
/// verbatim and without deduplication. No-op when no sink was requested.
///
/// Precondition inherited from the METADATA format: extras-conditional
/// requirements are listed after all unconditional ones, so processing of a
/// package stops at the first requirement carrying an extra marker.
pub fn append_requirements(
    metadata: &WheelMetadata,
    sink: Option<&mut RequirementsSink>,
) -> Result<()> {
    let sink = match sink {
        Some(sink) => sink,
        None => return Ok(()),
    };

    log::debug!(
        "Adding {} package requirements to {}",
        metadata.name,
        sink.path().display()
    );
    for requirement in &metadata.requires_dist {
        if requirement.has_extra_marker() {
            break;
        }
        sink.write_line(requirement.as_str())?;
        log::trace!("{}", requirement.as_str());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Requirement;
    use tempfile::TempDir;

    fn metadata(name: &str, requirements: &[&str]) -> WheelMetadata {
        WheelMetadata {
            name: name.to_string(),
            requires_dist: requirements
                .iter()
                .map(|r| Requirement(r.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_stops_at_first_extra() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        let mut sink = RequirementsSink::create(&path).unwrap();

        let metadata = metadata("demo", &["foo>=1.0", "bar; extra == 'test'", "baz"]);
        append_requirements(&metadata, Some(&mut sink)).unwrap();
        sink.close().unwrap();

        // baz is never reached: everything after the first extra is skipped
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "foo>=1.0\n");
    }

    #[test]
    fn test_no_sink_is_noop() {
        let metadata = metadata("demo", &["foo>=1.0"]);
        append_requirements(&metadata, None).unwrap();
    }

    #[test]
    fn test_appends_across_packages_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        let mut sink = RequirementsSink::create(&path).unwrap();

        append_requirements(&metadata("first", &["foo>=1.0", "bar"]), Some(&mut sink)).unwrap();
        append_requirements(&metadata("second", &["foo>=1.0", "qux<2"]), Some(&mut sink)).unwrap();
        sink.close().unwrap();

        // Verbatim, ordered, no deduplication
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "foo>=1.0\nbar\nfoo>=1.0\nqux<2\n"
        );
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "stale content\n").unwrap();

        let sink = RequirementsSink::create(&path).unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
