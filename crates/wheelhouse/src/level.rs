//! The eight-step logging scale shared by the CLI and the pip invocation.

use std::fmt;

use crate::{Result, WheelhouseError};

/// Logging levels, least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent = 0,
    Critical = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Verbose = 5,
    Debug = 6,
    Silly = 7,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    /// Every level, ordered by numeric value.
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Silent,
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Silly,
    ];

    /// Parse a level from its name or its numeric value as a string.
    ///
    /// Accepts exactly the eight level names and the digits `0` through `7`;
    /// anything else is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        for level in Self::ALL {
            if level.name() == value {
                return Ok(level);
            }
        }

        if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = value.parse::<u8>() {
                if let Some(level) = Self::from_index(index) {
                    return Ok(level);
                }
            }
        }

        Err(WheelhouseError::InvalidLoggingLevel(value.to_string()))
    }

    /// Look up a level by its numeric value.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(LogLevel::Silent),
            1 => Some(LogLevel::Critical),
            2 => Some(LogLevel::Error),
            3 => Some(LogLevel::Warning),
            4 => Some(LogLevel::Info),
            5 => Some(LogLevel::Verbose),
            6 => Some(LogLevel::Debug),
            7 => Some(LogLevel::Silly),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Silly => "silly",
        }
    }

    /// Map the scale onto the `log` crate's filter for logger initialization.
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Silent => log::LevelFilter::Off,
            LogLevel::Critical | LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Verbose | LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Silly => log::LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verbosity flags passed to `pip download` for each level.
///
/// Level 0 gets the same triple-quiet flags as level 1; the remaining pip
/// output at level 0 is discarded by the invoker itself.
pub fn pip_quiet_flags(level: LogLevel) -> &'static [&'static str] {
    match level {
        LogLevel::Silent | LogLevel::Critical => &["-qqq"],
        LogLevel::Error => &["-qq"],
        LogLevel::Warning => &["-q"],
        LogLevel::Info => &[],
        LogLevel::Verbose => &["-v"],
        LogLevel::Debug => &["-vv"],
        LogLevel::Silly => &["-vvv"],
    }
}
