//! Common types for process snapshot acquisition.
//!
//! These types are the immutable input to the tree engine. Providers
//! (procfs, ps) materialize a full [`ProcessRecord`] per process; the
//! engine never goes back to the OS after acquisition.

use serde::{Deserialize, Serialize};

/// A single thread belonging to a process.
///
/// Threads do not participate in the tree structure; they hang off
/// their owning process at render time only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    /// Thread ID.
    pub tid: u32,
    /// Process group ID of the owning process.
    pub pgid: u32,
    /// Thread command name.
    pub command: String,
}

/// An immutable per-process record from a snapshot.
///
/// Optional attributes that a provider cannot determine (permissions,
/// platform gaps, a process vanishing mid-scan) default to empty
/// strings or zero numerics; they are never fatal to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Process ID (always >= 1).
    pub pid: u32,

    /// Parent process ID. May name a process absent from the snapshot,
    /// in which case this record becomes an additional root.
    pub ppid: u32,

    /// Process group ID.
    pub pgid: u32,

    /// Real user ID. [`UID_UNKNOWN`] when unavailable.
    pub uid: u32,

    /// Username resolved from the UID (numeric fallback).
    pub username: String,

    /// Command path or name.
    pub command: String,

    /// Arguments, excluding the command itself.
    pub args: Vec<String>,

    /// CPU usage percentage.
    pub cpu_percent: f64,

    /// Resident set size in bytes.
    pub rss_bytes: u64,

    /// Number of threads.
    pub num_threads: u32,

    /// Process start time (Unix timestamp).
    pub create_time_unix: i64,

    /// Seconds elapsed since process start.
    pub age_seconds: i64,

    /// Per-thread records, when the platform exposes them.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub threads: Vec<ThreadRecord>,
}

/// Sentinel UID for "could not be determined".
pub const UID_UNKNOWN: u32 = u32::MAX;

impl ProcessRecord {
    /// Whether this process is its own process-group leader.
    pub fn is_group_leader(&self) -> bool {
        self.pid == self.pgid
    }

    /// Whether any thread records were captured.
    pub fn has_threads(&self) -> bool {
        !self.threads.is_empty()
    }

    /// Basename of the command, with leading path components stripped.
    pub fn command_basename(&self) -> &str {
        basename(&self.command)
    }
}

/// Strip leading path components from a command string.
pub fn basename(command: &str) -> &str {
    command.rsplit('/').next().unwrap_or(command)
}

impl Default for ProcessRecord {
    fn default() -> Self {
        ProcessRecord {
            pid: 0,
            ppid: 0,
            pgid: 0,
            uid: UID_UNKNOWN,
            username: String::new(),
            command: String::new(),
            args: Vec::new(),
            cpu_percent: 0.0,
            rss_bytes: 0,
            num_threads: 0,
            create_time_unix: 0,
            age_seconds: 0,
            threads: Vec::new(),
        }
    }
}
