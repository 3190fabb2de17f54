//! Snapshot provider backed by `ps(1)` (portable fallback).
//!
//! Used where `/proc` is unavailable (macOS, BSDs). A single ps
//! invocation with a custom format string collects every process;
//! lines that fail to parse are skipped with a debug log, never fatal.
//!
//! Thread enumeration is not portable through ps, so records from this
//! provider carry no [`ThreadRecord`]s and the thread count is 0.

use super::types::ProcessRecord;
use super::{CollectError, Snapshot};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, span, Level};

/// `ps`-backed snapshot provider.
pub struct PsSnapshot;

impl PsSnapshot {
    pub fn new() -> Self {
        PsSnapshot
    }
}

impl Default for PsSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// ps output columns, in order. `args` must come last: it is the only
/// field that may contain whitespace.
const PS_FORMAT: &str = "pid,ppid,pgid,uid,user,%cpu,rss,etime,args";

/// Number of fixed-width fields before the command line.
const FIXED_FIELDS: usize = 8;

impl Snapshot for PsSnapshot {
    fn list_processes(&self) -> Result<Vec<ProcessRecord>, CollectError> {
        let _span = span!(Level::DEBUG, "ps_scan").entered();

        let output = Command::new("ps")
            .args(["-axwwo", PS_FORMAT])
            .output()
            .map_err(|e| CollectError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(CollectError::CommandFailed(format!(
                "ps exited with {}",
                output.status
            )));
        }

        let now_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let text = String::from_utf8_lossy(&output.stdout);
        let mut records = Vec::new();
        // First line is the header.
        for (line_num, line) in text.lines().enumerate().skip(1) {
            match parse_ps_line(line, now_unix) {
                Some(record) => records.push(record),
                None => debug!(line_num, "skipping unparseable ps line"),
            }
        }

        debug!(count = records.len(), "ps scan complete");
        Ok(records)
    }

    fn current_process_id(&self) -> u32 {
        std::process::id()
    }
}

/// Parse one ps output line into a record.
fn parse_ps_line(line: &str, now_unix: i64) -> Option<ProcessRecord> {
    let mut parts = line.split_whitespace();
    let pid: u32 = parts.next()?.parse().ok()?;
    let ppid: u32 = parts.next()?.parse().ok()?;
    let pgid: u32 = parts.next()?.parse().ok()?;
    let uid: u32 = parts.next()?.parse().ok()?;
    let username = parts.next()?.to_string();
    let cpu_percent: f64 = parts.next()?.parse().unwrap_or(0.0);
    let rss_kb: u64 = parts.next()?.parse().unwrap_or(0);
    let age_seconds = parse_etime(parts.next()?)?;

    // Everything after the fixed fields is the command line.
    let rest: Vec<&str> = line.split_whitespace().skip(FIXED_FIELDS).collect();
    let command = rest.first()?.to_string();
    let args = rest[1..].iter().map(|s| s.to_string()).collect();

    Some(ProcessRecord {
        pid,
        ppid,
        pgid,
        uid,
        username,
        command,
        args,
        cpu_percent,
        rss_bytes: rss_kb * 1024,
        num_threads: 0,
        create_time_unix: now_unix - age_seconds,
        age_seconds,
        threads: Vec::new(),
    })
}

/// Parse a ps etime value: `[[dd-]hh:]mm:ss`.
fn parse_etime(etime: &str) -> Option<i64> {
    let (days, clock) = match etime.split_once('-') {
        Some((d, rest)) => (d.parse::<i64>().ok()?, rest),
        None => (0, etime),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse().ok()?, m.parse().ok()?, s.parse::<i64>().ok()?),
        [m, s] => (0, m.parse().ok()?, s.parse::<i64>().ok()?),
        [s] => (0, 0, s.parse::<i64>().ok()?),
        _ => return None,
    };

    Some(days * 86_400 + hours * 3_600 + minutes * 60 + seconds)
}
