//! Process snapshot acquisition.
//!
//! The tree engine consumes an already-materialized snapshot through
//! the [`Snapshot`] trait. Two providers ship:
//! - [`procfs::ProcfsSnapshot`] reads `/proc` directly (Linux).
//! - [`ps::PsSnapshot`] shells out to `ps(1)` (portable fallback).
//!
//! Providers may parallelize or time out internally; per-process
//! faults (a process exiting mid-scan, permission gaps) are never
//! fatal and yield default field values or a skipped record.

pub mod procfs;
pub mod ps;
pub mod types;
pub mod users;

pub use types::{basename, ProcessRecord, ThreadRecord, UID_UNKNOWN};

use thiserror::Error;

/// Errors that can occur during snapshot acquisition.
///
/// These cover whole-snapshot failures only. Individual processes
/// that cannot be read are skipped or defaulted, never surfaced here.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to execute ps command: {0}")]
    CommandFailed(String),

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// A source of process records.
///
/// Implementations must return one record per live process, each
/// carrying the fields of [`ProcessRecord`]; unknown values default.
pub trait Snapshot {
    /// Enumerate the host's processes.
    fn list_processes(&self) -> Result<Vec<ProcessRecord>, CollectError>;

    /// PID of the running tool, used to suppress self-matches of the
    /// command-substring filter.
    fn current_process_id(&self) -> u32;
}

/// Construct the default provider for this platform.
pub fn default_snapshot() -> Box<dyn Snapshot> {
    #[cfg(target_os = "linux")]
    {
        Box::new(procfs::ProcfsSnapshot::new())
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(ps::PsSnapshot::new())
    }
}
