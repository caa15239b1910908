//! Wheel metadata reader.
//!
//! Wheels carry their package metadata in a `{name}-{version}.dist-info/METADATA`
//! entry, an RFC 822 style header block followed by a blank line and the long
//! description. This module reads that entry straight out of the zip archive,
//! without extracting anything to disk.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{Result, WheelhouseError};

/// One `Requires-Dist` specifier, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement(pub String);

impl Requirement {
    /// True when the specifier only applies under an optional extra,
    /// e.g. `pytest ; extra == 'test'`.
    pub fn has_extra_marker(&self) -> bool {
        self.0.contains("; extra")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Metadata parsed from a wheel's `.dist-info/METADATA` entry.
#[derive(Debug, Clone)]
pub struct WheelMetadata {
    /// Package name (the `Name:` header).
    pub name: String,
    /// Declared runtime requirements, in declaration order.
    pub requires_dist: Vec<Requirement>,
}

impl WheelMetadata {
    /// Read metadata out of a wheel archive.
    pub fn from_wheel(archive: &Path) -> Result<WheelMetadata> {
        let file = File::open(archive)
            .map_err(|e| metadata_error(archive, format!("failed to open wheel: {}", e)))?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| metadata_error(archive, format!("failed to open zip: {}", e)))?;

        let entry_name = zip
            .file_names()
            .find(|name| is_metadata_entry(name))
            .map(str::to_string)
            .ok_or_else(|| metadata_error(archive, "no .dist-info/METADATA entry".to_string()))?;

        let mut content = String::new();
        zip.by_name(&entry_name)
            .map_err(|e| metadata_error(archive, format!("failed to read {}: {}", entry_name, e)))?
            .read_to_string(&mut content)
            .map_err(|e| metadata_error(archive, format!("failed to read {}: {}", entry_name, e)))?;

        Self::parse(&content)
            .ok_or_else(|| metadata_error(archive, "METADATA has no Name header".to_string()))
    }

    /// Parse the header block. Headers end at the first blank line;
    /// everything after it is the package description and is ignored.
    fn parse(content: &str) -> Option<WheelMetadata> {
        let mut name = None;
        let mut requires_dist = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("Name:") {
                name = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("Requires-Dist:") {
                requires_dist.push(Requirement(value.trim().to_string()));
            }
        }

        Some(WheelMetadata {
            name: name?,
            requires_dist,
        })
    }
}

/// The METADATA record lives directly under the top-level `*.dist-info/`
/// directory; a deeper entry with the same name is payload, not metadata.
fn is_metadata_entry(name: &str) -> bool {
    match name.strip_suffix("/METADATA") {
        Some(directory) => directory.ends_with(".dist-info") && !directory.contains('/'),
        None => false,
    }
}

fn metadata_error(archive: &Path, reason: String) -> WheelhouseError {
    WheelhouseError::MetadataParse {
        archive: archive.to_path_buf(),
        reason,
    }
}
