//! Compact mode: collapse identical sibling subtrees.
//!
//! Sibling processes that a user cannot tell apart (same command line
//! and same owner under one parent) are represented once with a
//! repetition count. Grouping is decided here, once, before rendering;
//! the renderer only reads node flags and the recorded groups.

use super::Tree;
use std::collections::HashMap;
use tracing::debug;

/// A group of indistinguishable siblings.
#[derive(Debug, Clone)]
pub struct CompactGroup {
    /// Number of members.
    pub count: usize,
    /// Arena index of the member kept visible.
    pub first_index: usize,
    /// Arena indices of every member, in sibling order.
    pub indices: Vec<usize>,
    /// PIDs of every member, in sibling order.
    pub pids: Vec<u32>,
    /// Owner username shared by the group.
    pub owner: String,
    /// Full command path shared by the group.
    pub full_path: String,
}

/// Recorded compact groups, looked up by the kept member's index.
#[derive(Debug, Default)]
pub struct CompactGroups {
    by_first: HashMap<usize, CompactGroup>,
}

impl CompactGroups {
    /// The group whose kept member is `index`, if any.
    pub fn group_for(&self, index: usize) -> Option<&CompactGroup> {
        self.by_first.get(&index)
    }

    pub fn len(&self) -> usize {
        self.by_first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_first.is_empty()
    }
}

/// Group identical visible siblings and mark all but the first of each
/// group as skipped.
///
/// A group is left uncompacted when any member has threads to display
/// (threads present and not hidden): collapsing would hide them.
pub fn compact(tree: &mut Tree, hide_threads: bool) -> CompactGroups {
    let mut groups = CompactGroups::default();

    for index in 0..tree.len() {
        tree.node_mut(index).skip_in_compact = false;
    }

    for parent in 0..tree.len() {
        if !tree.node(parent).print {
            continue;
        }

        // Sibling order determines which member is kept, so the map
        // only accumulates membership; order comes from the chain.
        let mut by_key: HashMap<(String, String), Vec<usize>> = HashMap::new();
        let mut key_order: Vec<(String, String)> = Vec::new();

        for child in tree.children(parent).collect::<Vec<_>>() {
            let record = &tree.node(child).record;
            let key = (composite_key(&record.command, &record.args), record.username.clone());
            let members = by_key.entry(key.clone()).or_insert_with(|| {
                key_order.push(key);
                Vec::new()
            });
            members.push(child);
        }

        let parent_pid = tree.pid_of(parent);
        for key in key_order {
            let members = &by_key[&key];
            if members.len() < 2 {
                continue;
            }
            let displays_threads = !hide_threads
                && members.iter().any(|&m| tree.node(m).record.has_threads());
            if displays_threads {
                continue;
            }

            for &skipped in &members[1..] {
                tree.node_mut(skipped).skip_in_compact = true;
            }

            let first_index = members[0];
            debug!(
                parent_pid,
                command = %key.0,
                count = members.len(),
                "compacted sibling group"
            );
            groups.by_first.insert(
                first_index,
                CompactGroup {
                    count: members.len(),
                    first_index,
                    indices: members.clone(),
                    pids: members.iter().map(|&m| tree.pid_of(m)).collect(),
                    owner: key.1,
                    full_path: tree.node(first_index).record.command.clone(),
                },
            );
        }
    }

    groups
}

/// Grouping key over the command line: `command + " " + args`.
fn composite_key(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}
