//! Exit codes for the ptree CLI.
//!
//! Exit codes communicate the run outcome without requiring output
//! parsing. They are a stable contract for scripts:
//! - 0: success (including an empty snapshot)
//! - 1: a filter resolved to nothing, or an invalid PID/user was given
//! - 2: mutually exclusive flags or other usage errors

/// Exit codes for ptree runs.
///
/// These codes are stable; changes require a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: the tree (possibly empty) was rendered.
    Success = 0,

    /// A filter matched nothing, or an unknown PID/user was specified.
    ResolutionError = 1,

    /// Mutually exclusive flags or invalid option values.
    UsageError = 2,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::ResolutionError.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 2);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::ResolutionError.is_success());
        assert!(!ExitCode::UsageError.is_success());
    }
}
