//! Per-node attribute and visibility marking.
//!
//! Attribute marking derives UID-transition flags and parent owner
//! info for every non-root node, plus the optional current-or-ancestor
//! highlight path.
//!
//! Visibility marking applies the filter predicates: for every node
//! that satisfies the active filters, all its ancestors and all its
//! descendants are marked visible. With no filters active, everything
//! is visible.

use super::Tree;
use crate::collect::UID_UNKNOWN;
use tracing::debug;

/// Compute `has_uid_transition`, `parent_uid` and `parent_username`
/// for every non-root node. Roots never carry a transition.
pub fn mark_attributes(tree: &mut Tree) {
    for index in 0..tree.len() {
        let Some(parent) = tree.node(index).parent else {
            continue;
        };
        let parent_uid = tree.node(parent).record.uid;
        let parent_username = tree.node(parent).record.username.clone();

        let node = tree.node_mut(index);
        // Compare UIDs when both sides have one; otherwise fall back
        // to username equality.
        node.has_uid_transition =
            if node.record.uid != UID_UNKNOWN && parent_uid != UID_UNKNOWN {
                node.record.uid != parent_uid
            } else {
                node.record.username != parent_username
            };
        node.parent_uid = parent_uid;
        node.parent_username = parent_username;
    }
}

/// Mark the node with `current_pid` and every ancestor up to its root.
///
/// A PID absent from the tree is ignored.
pub fn mark_current(tree: &mut Tree, current_pid: u32) {
    if current_pid == 0 {
        return;
    }
    let Some(mut index) = tree.index_of_pid(current_pid) else {
        return;
    };
    loop {
        tree.node_mut(index).is_current_or_ancestor = true;
        match tree.node(index).parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
}

/// Filter predicates for visibility marking.
///
/// Every filter is optional; active filters compose conjunctively at
/// the match level. `usernames` and `exclude_root` are never both set
/// (the CLI rejects that combination before the core runs).
#[derive(Debug, Clone, Default)]
pub struct VisibilityFilter {
    /// Owner usernames to match.
    pub usernames: Vec<String>,
    /// Root the tree at this PID (0 = unset).
    pub root_pid: u32,
    /// Command-substring match.
    pub contains: Option<String>,
    /// Exclude processes owned by `root`.
    pub exclude_root: bool,
    /// PID of the running tool; suppresses self-matches of `contains`.
    pub self_pid: u32,
}

impl VisibilityFilter {
    /// Whether any predicate is active.
    pub fn is_active(&self) -> bool {
        !self.usernames.is_empty()
            || self.root_pid > 0
            || self.contains.is_some()
            || self.exclude_root
    }

    /// Whether this node triggers a match.
    fn matches(&self, tree: &Tree, index: usize) -> bool {
        let record = &tree.node(index).record;
        if !self.usernames.is_empty() && !self.usernames.iter().any(|u| *u == record.username) {
            return false;
        }
        if self.root_pid > 0 && record.pid != self.root_pid {
            return false;
        }
        if let Some(pattern) = &self.contains {
            if record.pid == self.self_pid || !record.command.contains(pattern.as_str()) {
                return false;
            }
        }
        if self.exclude_root && record.username == "root" {
            return false;
        }
        true
    }
}

/// Mark visibility under the active filters.
///
/// Returns the number of visible nodes; zero with active filters means
/// the renderer will produce no output.
pub fn mark_visibility(tree: &mut Tree, filter: &VisibilityFilter) -> usize {
    if !filter.is_active() {
        for index in 0..tree.len() {
            tree.node_mut(index).print = true;
        }
        return tree.len();
    }

    for index in 0..tree.len() {
        if !filter.matches(tree, index) {
            continue;
        }
        mark_ancestors(tree, index);
        mark_descendants(tree, index);
    }

    let visible = tree.visible_count();
    debug!(visible, total = tree.len(), "visibility marking complete");
    visible
}

/// Walk parent links from `index`, marking each node visible.
fn mark_ancestors(tree: &mut Tree, index: usize) {
    let mut cursor = tree.node(index).parent;
    while let Some(current) = cursor {
        tree.node_mut(current).print = true;
        cursor = tree.node(current).parent;
    }
}

/// DFS over first-child/next-sibling links, marking the subtree
/// rooted at `index` (inclusive) visible.
fn mark_descendants(tree: &mut Tree, index: usize) {
    let mut stack = vec![index];
    while let Some(current) = stack.pop() {
        tree.node_mut(current).print = true;
        let mut child = tree.node(current).first_child;
        while let Some(c) = child {
            stack.push(c);
            child = tree.node(c).next_sibling;
        }
    }
}
