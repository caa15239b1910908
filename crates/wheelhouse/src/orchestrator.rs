//! Drives metadata reading, extraction, aggregation and cleanup per wheel.

use std::path::{Path, PathBuf};

use crate::extract::extract_wheel;
use crate::level::LogLevel;
use crate::metadata::WheelMetadata;
use crate::pip;
use crate::requirements::{append_requirements, RequirementsSink};
use crate::{Result, WheelhouseError};

/// Policies applied to every wheel processed in one run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Keep the `.whl` archives after extraction.
    pub keep_wheel: bool,
    /// Keep the `.dist-info` metadata directories.
    pub keep_dist_info: bool,
    /// Aggregate `Requires-Dist` entries into this file.
    pub requirements_path: Option<PathBuf>,
}

/// One unit of extraction work.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub archive: PathBuf,
    pub target: PathBuf,
    pub keep_wheel: bool,
    pub keep_dist_info: bool,
    pub append_requirements: bool,
}

impl ExtractionRequest {
    fn new(archive: PathBuf, target: &Path, options: &ExtractOptions) -> Self {
        Self {
            archive,
            target: target.to_path_buf(),
            keep_wheel: options.keep_wheel,
            keep_dist_info: options.keep_dist_info,
            append_requirements: options.requirements_path.is_some(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug)]
pub struct ExtractionSummary {
    /// Packages the caller asked for.
    pub packages: Vec<String>,
    /// Wheels that were processed cleanly.
    pub extracted: Vec<PathBuf>,
    /// Wheels that failed, with the error that stopped each one.
    pub failures: Vec<(PathBuf, WheelhouseError)>,
}

impl ExtractionSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Download the packages with pip, then unpack every wheel in `directory`.
pub fn run(
    packages: &[String],
    directory: Option<&Path>,
    options: &ExtractOptions,
    level: LogLevel,
) -> Result<ExtractionSummary> {
    pip::download(packages, directory, level)?;
    extract_wheels(packages, directory, options)
}

/// Unpack every `*.whl` found in `directory` according to `options`.
///
/// Failures are isolated per wheel: a corrupt archive is logged, recorded in
/// the summary and the remaining wheels are still processed. The
/// requirements sink, when requested, is opened before the first wheel and
/// closed after the last one regardless of per-wheel failures.
pub fn extract_wheels(
    packages: &[String],
    directory: Option<&Path>,
    options: &ExtractOptions,
) -> Result<ExtractionSummary> {
    let target = match directory {
        Some(directory) => directory.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let mut sink = match options.requirements_path.as_deref() {
        Some(path) => Some(RequirementsSink::create(path)?),
        None => None,
    };

    let mut summary = ExtractionSummary {
        packages: packages.to_vec(),
        extracted: Vec::new(),
        failures: Vec::new(),
    };

    for archive in find_wheels(&target)? {
        let request = ExtractionRequest::new(archive, &target, options);
        match process_wheel(&request, sink.as_mut()) {
            Ok(()) => summary.extracted.push(request.archive),
            Err(e) => {
                log::error!("Failed to process {}: {}", request.archive.display(), e);
                summary.failures.push((request.archive, e));
            }
        }
    }

    if let Some(sink) = sink {
        sink.close()?;
    }

    log::info!("Successfully extracted {}", summary.packages.join(" "));
    Ok(summary)
}

/// Metadata read, selective extraction, requirements append, cleanup.
fn process_wheel(request: &ExtractionRequest, sink: Option<&mut RequirementsSink>) -> Result<()> {
    log::info!("Extracting {}", request.archive.display());

    let metadata = WheelMetadata::from_wheel(&request.archive)?;
    extract_wheel(&request.archive, &request.target, request.keep_dist_info)?;
    log::info!(
        "Extracted {} to {}",
        request.archive.display(),
        request.target.display()
    );

    append_requirements(&metadata, sink)?;

    if !request.keep_wheel {
        remove_wheel(&request.archive)?;
    }

    Ok(())
}

/// Delete a processed wheel. A wheel that disappeared between enumeration
/// and cleanup is a warning, not a failure.
fn remove_wheel(archive: &Path) -> Result<()> {
    if archive.exists() {
        std::fs::remove_file(archive)?;
        log::info!("Removed {}", archive.display());
    } else {
        log::warn!("Could not find {}", archive.display());
    }
    Ok(())
}

/// Enumerate `*.whl` files in `directory`, in stable name order.
///
/// Only the `*.whl` part may glob: the directory portion is escaped, so
/// target paths containing `[`, `]`, `*` or `?` still enumerate correctly.
fn find_wheels(directory: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&directory.to_string_lossy());
    let pattern = format!("{}{}*.whl", escaped, std::path::MAIN_SEPARATOR);
    let paths = glob::glob(&pattern)
        .map_err(|e| WheelhouseError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

    let mut wheels = Vec::new();
    for path in paths {
        match path {
            Ok(path) => wheels.push(path),
            Err(e) => log::warn!("Skipping unreadable directory entry: {}", e),
        }
    }

    wheels.sort();
    Ok(wheels)
}
