//! Mock snapshot generation for testing.
//!
//! Builder-pattern factories for `ProcessRecord`s and an in-memory
//! [`Snapshot`] implementation, so the whole pipeline can be exercised
//! without touching the host OS.
//!
//! # Example
//!
//! ```
//! use ptree_core::mock_snapshot::{MockProcess, MockSnapshot};
//!
//! let snapshot = MockSnapshot::new()
//!     .with(MockProcess::new(1, 0, "init"))
//!     .with(MockProcess::new(10, 1, "shell").uid(1000, "alice"));
//! ```

use crate::collect::{CollectError, ProcessRecord, Snapshot, ThreadRecord};

/// Builder for one mock process record.
#[derive(Debug, Clone)]
pub struct MockProcess {
    record: ProcessRecord,
}

impl MockProcess {
    /// New builder. The process defaults to being its own group
    /// leader, owned by root, idle and freshly started.
    pub fn new(pid: u32, ppid: u32, command: &str) -> Self {
        MockProcess {
            record: ProcessRecord {
                pid,
                ppid,
                pgid: pid,
                uid: 0,
                username: "root".to_string(),
                command: command.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn pgid(mut self, pgid: u32) -> Self {
        self.record.pgid = pgid;
        self
    }

    pub fn uid(mut self, uid: u32, username: &str) -> Self {
        self.record.uid = uid;
        self.record.username = username.to_string();
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.record.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn cpu(mut self, percent: f64) -> Self {
        self.record.cpu_percent = percent;
        self
    }

    pub fn rss(mut self, bytes: u64) -> Self {
        self.record.rss_bytes = bytes;
        self
    }

    pub fn age(mut self, seconds: i64) -> Self {
        self.record.age_seconds = seconds;
        self
    }

    pub fn num_threads(mut self, count: u32) -> Self {
        self.record.num_threads = count;
        self
    }

    /// Attach a thread record (pgid follows the process).
    pub fn thread(mut self, tid: u32, command: &str) -> Self {
        self.record.threads.push(ThreadRecord {
            tid,
            pgid: self.record.pgid,
            command: command.to_string(),
        });
        self.record.num_threads = self.record.threads.len() as u32 + 1;
        self
    }

    pub fn build(self) -> ProcessRecord {
        self.record
    }
}

/// In-memory snapshot provider.
#[derive(Debug, Default)]
pub struct MockSnapshot {
    records: Vec<ProcessRecord>,
    self_pid: u32,
}

impl MockSnapshot {
    pub fn new() -> Self {
        MockSnapshot::default()
    }

    pub fn with(mut self, process: MockProcess) -> Self {
        self.records.push(process.build());
        self
    }

    pub fn with_record(mut self, record: ProcessRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Set the PID reported as the running tool's own.
    pub fn self_pid(mut self, pid: u32) -> Self {
        self.self_pid = pid;
        self
    }
}

impl Snapshot for MockSnapshot {
    fn list_processes(&self) -> Result<Vec<ProcessRecord>, CollectError> {
        Ok(self.records.clone())
    }

    fn current_process_id(&self) -> u32 {
        self.self_pid
    }
}
