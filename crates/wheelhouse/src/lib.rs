//! Download Python wheels without their dependencies and unpack them.
//!
//! The heavy lifting (resolution, networking) is delegated to an external
//! `pip download --no-deps` subprocess. This crate reads the metadata
//! embedded in each downloaded wheel, selectively extracts the archive into
//! a target directory (optionally dropping the `.dist-info` subtree),
//! aggregates the declared runtime requirements into a single file, and
//! cleans up the archives afterwards.

pub mod error;
pub mod extract;
pub mod level;
pub mod metadata;
pub mod orchestrator;
pub mod pip;
pub mod requirements;

pub use error::{Result, WheelhouseError};
pub use extract::extract_wheel;
pub use level::{pip_quiet_flags, LogLevel};
pub use metadata::{Requirement, WheelMetadata};
pub use orchestrator::{
    extract_wheels, run, ExtractOptions, ExtractionRequest, ExtractionSummary,
};
pub use requirements::{append_requirements, RequirementsSink};
