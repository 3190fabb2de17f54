//! Snapshot provider backed by the `/proc` filesystem (Linux).
//!
//! # Files read per process
//! - `/proc/[pid]/stat` - ppid, pgid, CPU ticks, thread count, start time, RSS
//! - `/proc/[pid]/status` - real UID
//! - `/proc/[pid]/cmdline` - command and arguments (NUL-separated)
//! - `/proc/[pid]/task/` - thread IDs and names
//!
//! A process that disappears between the directory listing and the
//! per-file reads is silently skipped. Fields that cannot be read
//! default to empty strings or zero numerics.

use super::types::{ProcessRecord, ThreadRecord, UID_UNKNOWN};
use super::users::UserTable;
use super::{CollectError, Snapshot};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, span, Level};

/// `/proc`-backed snapshot provider.
pub struct ProcfsSnapshot {
    root: String,
}

impl ProcfsSnapshot {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Use an alternate proc root (tests point this at a fixture dir).
    pub fn with_root(root: &str) -> Self {
        ProcfsSnapshot {
            root: root.to_string(),
        }
    }
}

impl Default for ProcfsSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot for ProcfsSnapshot {
    fn list_processes(&self) -> Result<Vec<ProcessRecord>, CollectError> {
        let _span = span!(Level::DEBUG, "procfs_scan").entered();

        let entries = fs::read_dir(&self.root).map_err(|e| CollectError::ReadFailed {
            path: self.root.clone(),
            source: e,
        })?;

        let users = UserTable::load();
        let ctx = ScanContext::detect(&self.root);
        let mut records = Vec::new();

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(pid) = name.to_str().and_then(|s| s.parse::<u32>().ok()) else {
                continue;
            };
            match read_record(&self.root, pid, &users, &ctx) {
                Some(record) => records.push(record),
                // Process exited mid-scan or is unreadable; not fatal.
                None => debug!(pid, "skipping unreadable process"),
            }
        }

        debug!(count = records.len(), "procfs scan complete");
        Ok(records)
    }

    fn current_process_id(&self) -> u32 {
        std::process::id()
    }
}

/// Host constants sampled once per scan.
struct ScanContext {
    /// Clock ticks per second (USER_HZ).
    ticks_per_second: f64,
    /// Page size in bytes.
    page_size: u64,
    /// Seconds since boot.
    uptime: f64,
    /// Wall clock at scan start (Unix seconds).
    now_unix: i64,
}

impl ScanContext {
    fn detect(root: &str) -> Self {
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        ScanContext {
            ticks_per_second: if ticks > 0 { ticks as f64 } else { 100.0 },
            page_size: if page > 0 { page as u64 } else { 4096 },
            uptime: read_uptime(root),
            now_unix: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
        }
    }
}

/// Parse the first field of `/proc/uptime` (seconds since boot).
fn read_uptime(root: &str) -> f64 {
    fs::read_to_string(format!("{root}/uptime"))
        .ok()
        .and_then(|s| {
            s.split_whitespace()
                .next()
                .and_then(|v| v.parse::<f64>().ok())
        })
        .unwrap_or(0.0)
}

/// Materialize one process record, or None if the process vanished.
fn read_record(root: &str, pid: u32, users: &UserTable, ctx: &ScanContext) -> Option<ProcessRecord> {
    let stat_content = fs::read_to_string(format!("{root}/{pid}/stat")).ok()?;
    let stat = parse_stat(&stat_content)?;

    let uid = fs::read_to_string(format!("{root}/{pid}/status"))
        .ok()
        .and_then(|c| parse_uid_from_status(&c))
        .unwrap_or(UID_UNKNOWN);
    let username = if uid == UID_UNKNOWN {
        String::new()
    } else {
        users.username(uid)
    };

    let (command, args) = read_cmdline(root, pid, &stat.comm);

    let age_seconds = (ctx.uptime - stat.starttime as f64 / ctx.ticks_per_second).max(0.0) as i64;
    let cpu_seconds = (stat.utime + stat.stime) as f64 / ctx.ticks_per_second;
    let cpu_percent = if age_seconds > 0 {
        cpu_seconds / age_seconds as f64 * 100.0
    } else {
        0.0
    };

    Some(ProcessRecord {
        pid,
        ppid: stat.ppid,
        pgid: stat.pgrp,
        uid,
        username,
        command,
        args,
        cpu_percent,
        rss_bytes: stat.rss_pages * ctx.page_size,
        num_threads: stat.num_threads,
        create_time_unix: ctx.now_unix - age_seconds,
        age_seconds,
        threads: read_threads(root, pid, stat.pgrp),
    })
}

/// Parsed subset of `/proc/[pid]/stat`.
struct StatInfo {
    comm: String,
    ppid: u32,
    pgrp: u32,
    utime: u64,
    stime: u64,
    num_threads: u32,
    starttime: u64,
    rss_pages: u64,
}

/// Parse `/proc/[pid]/stat`.
///
/// Format: `pid (comm) state ppid pgrp session tty_nr tpgid flags
/// minflt cminflt majflt cmajflt utime stime cutime cstime priority
/// nice num_threads itrealvalue starttime vsize rss ...`
///
/// The comm field may itself contain spaces and parentheses, so it is
/// delimited by the first `(` and the *last* `)`.
fn parse_stat(content: &str) -> Option<StatInfo> {
    let comm_start = content.find('(')?;
    let comm_end = content.rfind(')')?;
    let comm = content.get(comm_start + 1..comm_end)?.to_string();

    let after_comm = content.get(comm_end + 2..)?;
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    if fields.len() < 22 {
        return None;
    }

    // Field indices are relative to the state field (index 0).
    Some(StatInfo {
        comm,
        ppid: fields[1].parse().unwrap_or(0),
        pgrp: fields[2].parse().unwrap_or(0),
        utime: fields[11].parse().unwrap_or(0),
        stime: fields[12].parse().unwrap_or(0),
        num_threads: fields[17].parse().unwrap_or(0),
        starttime: fields[19].parse().unwrap_or(0),
        rss_pages: fields[21].parse().unwrap_or(0),
    })
}

/// Parse the real UID from `/proc/[pid]/status`.
///
/// Format: `Uid:\t1000\t1000\t1000\t1000` (real, effective, saved, fs).
fn parse_uid_from_status(content: &str) -> Option<u32> {
    content
        .lines()
        .find(|line| line.starts_with("Uid:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|v| v.parse().ok())
}

/// Split `/proc/[pid]/cmdline` into command and arguments.
///
/// Kernel threads have an empty cmdline; they render as `[comm]`.
fn read_cmdline(root: &str, pid: u32, comm: &str) -> (String, Vec<String>) {
    let raw = fs::read_to_string(format!("{root}/{pid}/cmdline")).unwrap_or_default();
    let mut parts = raw
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    match parts.next() {
        Some(command) => (command, parts.collect()),
        None => (format!("[{comm}]"), Vec::new()),
    }
}

/// Enumerate secondary threads from `/proc/[pid]/task/`.
///
/// The main thread (tid == pid) is the process itself and is excluded.
fn read_threads(root: &str, pid: u32, pgid: u32) -> Vec<ThreadRecord> {
    let Ok(entries) = fs::read_dir(format!("{root}/{pid}/task")) else {
        return Vec::new();
    };

    let mut threads = Vec::new();
    for entry in entries.flatten() {
        let Some(tid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        if tid == pid {
            continue;
        }
        let command = fs::read_to_string(format!("{root}/{pid}/task/{tid}/comm"))
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default();
        threads.push(ThreadRecord { tid, pgid, command });
    }
    threads.sort_by_key(|t| t.tid);
    threads
}

/// Total installed RAM in bytes, from `/proc/meminfo`.
///
/// Returns 0 when unavailable; the memory color thresholds then
/// degrade to the lowest band.
pub fn installed_memory_bytes() -> u64 {
    meminfo_total(&fs::read_to_string("/proc/meminfo").unwrap_or_default())
}

fn meminfo_total(content: &str) -> u64 {
    content
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|v| v.parse::<u64>().ok())
        .map(|kb| kb * 1024)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "1234 (some (weird) name) S 1 1234 1234 0 -1 4194304 \
        100 0 0 0 250 150 0 0 20 0 4 0 5000 10000000 2048 18446744073709551615 \
        0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0";

    #[test]
    fn test_parse_stat_comm_with_parens() {
        let info = parse_stat(STAT).unwrap();
        assert_eq!(info.comm, "some (weird) name");
        assert_eq!(info.ppid, 1);
        assert_eq!(info.pgrp, 1234);
        assert_eq!(info.utime, 250);
        assert_eq!(info.stime, 150);
        assert_eq!(info.num_threads, 4);
        assert_eq!(info.starttime, 5000);
        assert_eq!(info.rss_pages, 2048);
    }

    #[test]
    fn test_parse_stat_truncated() {
        assert!(parse_stat("99 (short) S 1 2").is_none());
        assert!(parse_stat("no parens here").is_none());
        assert!(parse_stat("").is_none());
    }

    #[test]
    fn test_parse_uid_from_status() {
        let status = "Name:\tbash\nState:\tS (sleeping)\nUid:\t1000\t1000\t1000\t1000\nGid:\t1000\n";
        assert_eq!(parse_uid_from_status(status), Some(1000));
        assert_eq!(parse_uid_from_status("Name:\tbash\n"), None);
    }

    #[test]
    fn test_meminfo_total() {
        let content = "MemTotal:       16384000 kB\nMemFree:         1024000 kB\n";
        assert_eq!(meminfo_total(content), 16_384_000 * 1024);
        assert_eq!(meminfo_total(""), 0);
    }

    #[test]
    fn test_read_uptime_missing() {
        assert_eq!(read_uptime("/nonexistent-proc-root"), 0.0);
    }

    #[test]
    fn test_scan_fixture_proc_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("uptime"), "500.00 400.00\n").unwrap();

        let proc_dir = root.join("42");
        fs::create_dir_all(proc_dir.join("task/42")).unwrap();
        fs::create_dir_all(proc_dir.join("task/43")).unwrap();
        fs::write(
            proc_dir.join("stat"),
            "42 (svc) S 1 42 42 0 -1 4194304 0 0 0 0 100 50 0 0 20 0 2 0 1000 4096 256 0",
        )
        .unwrap();
        fs::write(proc_dir.join("status"), "Name:\tsvc\nUid:\t1000\t1000\t1000\t1000\n").unwrap();
        fs::write(proc_dir.join("cmdline"), "/usr/bin/svc\0--fast\0").unwrap();
        fs::write(proc_dir.join("task/43/comm"), "svc-io\n").unwrap();

        // Non-PID entries and vanished processes are skipped.
        fs::create_dir_all(root.join("self")).unwrap();
        fs::create_dir_all(root.join("99")).unwrap();

        let snap = ProcfsSnapshot::with_root(root.to_str().unwrap());
        let records = snap.list_processes().unwrap();
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.pid, 42);
        assert_eq!(rec.ppid, 1);
        assert_eq!(rec.pgid, 42);
        assert_eq!(rec.uid, 1000);
        assert_eq!(rec.command, "/usr/bin/svc");
        assert_eq!(rec.args, vec!["--fast"]);
        assert_eq!(rec.num_threads, 2);
        assert_eq!(rec.threads.len(), 1);
        assert_eq!(rec.threads[0].tid, 43);
        assert_eq!(rec.threads[0].command, "svc-io");

        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) } as f64;
        let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as u64;
        assert_eq!(rec.age_seconds, (500.0 - 1000.0 / ticks) as i64);
        assert_eq!(rec.rss_bytes, 256 * page);
    }

    #[test]
    fn test_read_cmdline_kernel_thread() {
        let dir = tempfile::tempdir().unwrap();
        let proc_dir = dir.path().join("7");
        fs::create_dir_all(&proc_dir).unwrap();
        fs::write(proc_dir.join("cmdline"), "").unwrap();
        let (command, args) = read_cmdline(dir.path().to_str().unwrap(), 7, "kthreadd");
        assert_eq!(command, "[kthreadd]");
        assert!(args.is_empty());
    }
}
