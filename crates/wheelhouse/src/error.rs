use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WheelhouseError {
    // Argument errors
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String),

    // Metadata errors
    #[error("Failed to read wheel metadata from {}: {reason}", archive.display())]
    MetadataParse { archive: PathBuf, reason: String },

    // Extraction errors
    #[error("Failed to extract {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    // Download errors
    #[error("pip download failed: {reason}")]
    DownloadFailed { reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WheelhouseError>;
