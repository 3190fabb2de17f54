//! UID/username resolution via `/etc/passwd`.
//!
//! One pass over the passwd database builds a bidirectional table,
//! so per-process lookups during a scan are map hits rather than
//! repeated file reads.

use std::collections::HashMap;
use std::fs;

/// Cached UID <-> username table.
#[derive(Debug, Default)]
pub struct UserTable {
    by_uid: HashMap<u32, String>,
    by_name: HashMap<String, u32>,
}

impl UserTable {
    /// Load the table from `/etc/passwd`.
    ///
    /// An unreadable database yields an empty table; lookups then fall
    /// back to numeric UIDs.
    pub fn load() -> Self {
        Self::from_passwd(&fs::read_to_string("/etc/passwd").unwrap_or_default())
    }

    /// Build the table from passwd-format content.
    pub fn from_passwd(content: &str) -> Self {
        let mut table = UserTable::default();
        for line in content.lines() {
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() >= 3 {
                if let Ok(uid) = fields[2].parse::<u32>() {
                    table.by_uid.entry(uid).or_insert_with(|| fields[0].to_string());
                    table.by_name.insert(fields[0].to_string(), uid);
                }
            }
        }
        table
    }

    /// Resolve a UID to a username, falling back to the numeric form.
    pub fn username(&self, uid: u32) -> String {
        self.by_uid
            .get(&uid)
            .cloned()
            .unwrap_or_else(|| uid.to_string())
    }

    /// Look up a username's UID, if the user exists on this system.
    pub fn uid_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }
}
