//! Shared foundation for ptree.
//!
//! This crate holds the pieces every other ptree crate needs:
//! - Unified error taxonomy ([`Error`], [`Result`])
//! - Stable process exit codes ([`ExitCode`])
//! - Human-facing value formatting (binary byte units, `DD:HH:MM:SS` ages)

pub mod error;
pub mod exit_codes;
pub mod format;

pub use error::{Error, Result};
pub use exit_codes::ExitCode;
pub use format::{format_age, format_bytes};
