//! CLI error handling and exit codes.

use std::fmt;
use std::process;

pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Configuration / init issues.
    Config(String),
    /// Build failure.
    Build(gnidump_build::Error),
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "error: {msg}"),
            CliError::Build(e) => write!(f, "error: {e}"),
            CliError::Usage(msg) => write!(f, "error: {msg}"),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<gnidump_build::Error> for CliError {
    fn from(e: gnidump_build::Error) -> Self {
        CliError::Build(e)
    }
}

impl From<gnidump_core::Error> for CliError {
    fn from(e: gnidump_core::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
