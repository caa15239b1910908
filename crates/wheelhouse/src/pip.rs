//! Invocation of the external `pip download` subprocess.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::level::{pip_quiet_flags, LogLevel};
use crate::{Result, WheelhouseError};

/// Build the argument list for `pip download`.
///
/// Arguments are passed as a list and never through a shell, so package
/// names and paths containing shell metacharacters reach pip verbatim.
pub fn download_args(
    packages: &[String],
    directory: Option<&Path>,
    level: LogLevel,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![OsString::from("download")];
    args.extend(packages.iter().map(OsString::from));
    args.push(OsString::from("--no-deps"));

    if let Some(directory) = directory {
        args.push(OsString::from("-d"));
        args.push(directory.as_os_str().to_os_string());
    }

    args.extend(pip_quiet_flags(level).iter().map(OsString::from));
    args
}

/// Run `pip download` for the requested packages and wait for it to exit.
///
/// At level 0 pip's stdout and stderr are redirected into an unlinked
/// temporary file, so nothing reaches the terminal. A non-zero exit status
/// fails the run with `DownloadFailed`.
pub fn download(packages: &[String], directory: Option<&Path>, level: LogLevel) -> Result<()> {
    let args = download_args(packages, directory, level);
    log::debug!("Running pip with arguments {:?}", args);

    let mut command = Command::new("pip");
    command.args(&args);

    if level == LogLevel::Silent {
        let discard = tempfile::tempfile()?;
        command.stdout(Stdio::from(discard.try_clone()?));
        command.stderr(Stdio::from(discard));
    }

    let status = command
        .status()
        .map_err(|e| WheelhouseError::DownloadFailed {
            reason: format!("failed to spawn pip: {}", e),
        })?;

    if !status.success() {
        return Err(WheelhouseError::DownloadFailed {
            reason: format!("pip exited with {}", status),
        });
    }

    Ok(())
}
