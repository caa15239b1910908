//! wheelhouse - download Python packages without their dependencies and
//! unpack the wheels.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use wheelhouse::{ExtractOptions, ExtractionSummary, LogLevel, WheelhouseError};

#[derive(Parser, Debug)]
#[command(name = "wheelhouse")]
#[command(version)]
#[command(about = "Download Python packages without their dependencies and unpack the wheels")]
struct Args {
    /// Packages to download
    #[arg(value_name = "PACKAGE", required = true)]
    packages: Vec<String>,

    /// Directory for downloading and unpacking
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,

    /// Logging level: a name (silent, critical, error, warning, info,
    /// verbose, debug, silly) or a digit 0-7
    #[arg(
        short = 'l',
        long = "logging-level",
        visible_alias = "log-level",
        alias = "loglevel",
        alias = "log",
        alias = "verbosity",
        default_value = "info",
        value_parser = parse_logging_level
    )]
    logging_level: LogLevel,

    /// Keep the .whl files after extraction
    #[arg(short = 's', long, visible_short_alias = 'w')]
    save_wheel: bool,

    /// Keep the .dist-info directories
    #[arg(short = 'i', long)]
    save_dist_info: bool,

    /// Aggregate package requirements into this file
    #[arg(
        short = 'r',
        long = "requirements-file",
        visible_alias = "requirements",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "requirements.txt"
    )]
    requirements_file: Option<PathBuf>,
}

fn parse_logging_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).map_err(|e| e.to_string())
}

fn run(args: &Args) -> wheelhouse::Result<ExtractionSummary> {
    let options = ExtractOptions {
        keep_wheel: args.save_wheel,
        keep_dist_info: args.save_dist_info,
        requirements_path: args.requirements_file.clone(),
    };

    wheelhouse::run(
        &args.packages,
        args.directory.as_deref(),
        &options,
        args.logging_level,
    )
}

/// The short name printed for a failure at level 1.
fn error_kind(error: &WheelhouseError) -> &'static str {
    match error {
        WheelhouseError::InvalidLoggingLevel(_) => "InvalidLoggingLevel",
        WheelhouseError::MetadataParse { .. } => "MetadataParseError",
        WheelhouseError::Extraction { .. } => "ExtractionError",
        WheelhouseError::DownloadFailed { .. } => "DownloadError",
        WheelhouseError::Io(_) => "IoError",
    }
}

/// Print a failure according to the configured level: level 0 prints
/// nothing, level 1 a single kind-and-message line, level 2 and up the full
/// error including its cause chain. The exit code is 1 either way.
fn report_error(error: &WheelhouseError, level: LogLevel) {
    match level {
        LogLevel::Silent => {}
        LogLevel::Critical => eprintln!("{}: {}", error_kind(error), error),
        _ => {
            eprintln!("{} {}", style("Error:").red().bold(), error);
            let mut source = std::error::Error::source(error);
            while let Some(cause) = source {
                eprintln!("  Caused by: {}", cause);
                source = cause.source();
            }
        }
    }
}

fn report_failures(summary: &ExtractionSummary, level: LogLevel) {
    match level {
        LogLevel::Silent => {}
        LogLevel::Critical => {
            for (_, error) in &summary.failures {
                eprintln!("{}: {}", error_kind(error), error);
            }
        }
        _ => {
            eprintln!(
                "{} {} of {} wheels failed",
                style("Error:").red().bold(),
                summary.failures.len(),
                summary.failures.len() + summary.extracted.len()
            );
            for (_, error) in &summary.failures {
                eprintln!("  {} {}", style("-").dim(), error);
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = args.logging_level;

    env_logger::Builder::new()
        .filter_level(level.to_filter())
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Parsed arguments: {:?}", args);

    match run(&args) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            report_failures(&summary, level);
            ExitCode::FAILURE
        }
        Err(error) => {
            report_error(&error, level);
            ExitCode::FAILURE
        }
    }
}
