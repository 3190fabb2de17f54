//! Error types for ptree.
//!
//! A single unified error enum with stable, grouped variants:
//! - option validation errors (mutually exclusive flags, bad keys)
//! - resolution errors (unknown user, unknown PID)
//! - snapshot errors (duplicate PID)
//! - I/O errors on standard output
//!
//! Option validation errors surface before any output is produced.
//! Resolution errors are reported to standard error and map to exit
//! code 1; mutually exclusive flags map to exit code 2.

use crate::exit_codes::ExitCode;
use thiserror::Error;

/// Result type alias for ptree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for ptree.
#[derive(Error, Debug)]
pub enum Error {
    /// Mutually exclusive flags, unknown sort key, unknown color attribute.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A `--user` name was not found on the system.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// `--pid` named a process absent from the snapshot.
    #[error("unknown pid: {0}")]
    UnknownPid(u32),

    /// The snapshot violated a structural invariant (duplicate PID).
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Process collection failed outright (not per-process faults).
    #[error("process collection failed: {0}")]
    Collection(String),

    /// Write failure on standard output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map this error onto the process exit code contract.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::InvalidOptions(_) => ExitCode::UsageError,
            Error::UnknownUser(_)
            | Error::UnknownPid(_)
            | Error::InvalidSnapshot(_)
            | Error::Collection(_)
            | Error::Io(_) => ExitCode::ResolutionError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::UnknownUser("nobody2".into()).to_string(),
            "unknown user: nobody2"
        );
        assert_eq!(Error::UnknownPid(42).to_string(), "unknown pid: 42");
        assert_eq!(
            Error::InvalidSnapshot("duplicate pid 7".into()).to_string(),
            "invalid snapshot: duplicate pid 7"
        );
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            Error::InvalidOptions("x".into()).exit_code(),
            ExitCode::UsageError
        );
        assert_eq!(
            Error::UnknownPid(1).exit_code(),
            ExitCode::ResolutionError
        );
        assert_eq!(
            Error::UnknownUser("x".into()).exit_code(),
            ExitCode::ResolutionError
        );
    }

    #[test]
    fn test_io_error_from() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
        assert_eq!(err.exit_code(), ExitCode::ResolutionError);
    }
}
