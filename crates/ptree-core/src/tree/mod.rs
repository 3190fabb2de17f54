//! The process tree arena.
//!
//! The forest is an arena of nodes plus parent/first-child/next-sibling
//! indices, with `Option<usize>` as the "none" sentinel. The arena owns
//! every node; indices stay stable for the tree's lifetime and nodes
//! are never moved or deleted after construction. Pruning and
//! compaction rewrite links and flags only.

pub mod builder;
pub mod compact;
pub mod marker;
pub mod prune;
pub mod sort;

pub use builder::build_tree;
pub use compact::{compact, CompactGroup, CompactGroups};
pub use marker::{mark_attributes, mark_current, mark_visibility, VisibilityFilter};
pub use prune::prune;
pub use sort::sort_siblings;

use crate::collect::ProcessRecord;
use std::collections::HashMap;

/// One arena entry.
#[derive(Debug, Clone)]
pub struct Node {
    /// The immutable snapshot record.
    pub record: ProcessRecord,

    /// Index of the parent node, if its PID was present in the snapshot.
    pub parent: Option<usize>,
    /// Index of the first child.
    pub first_child: Option<usize>,
    /// Index of the next sibling in the parent's child chain.
    pub next_sibling: Option<usize>,

    /// Visibility under the active filters.
    pub print: bool,
    /// Collapsed into an earlier identical sibling in compact mode.
    pub skip_in_compact: bool,

    /// The effective UID differs from the parent's.
    pub has_uid_transition: bool,
    /// Parent's UID, for transition display.
    pub parent_uid: u32,
    /// Parent's username, for transition display.
    pub parent_username: String,

    /// On the path from a root to the highlighted process.
    pub is_current_or_ancestor: bool,
}

impl Node {
    fn new(record: ProcessRecord) -> Self {
        Node {
            record,
            parent: None,
            first_child: None,
            next_sibling: None,
            print: false,
            skip_in_compact: false,
            has_uid_transition: false,
            parent_uid: crate::collect::UID_UNKNOWN,
            parent_username: String::new(),
            is_current_or_ancestor: false,
        }
    }
}

/// Arena-owned process forest.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    pid_to_index: HashMap<u32, usize>,
}

impl Tree {
    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    /// Arena index for a PID, if the snapshot contained it.
    pub fn index_of_pid(&self, pid: u32) -> Option<usize> {
        self.pid_to_index.get(&pid).copied()
    }

    /// PID for an arena index (inverse map, used in log messages).
    pub fn pid_of(&self, index: usize) -> u32 {
        self.nodes[index].record.pid
    }

    /// Root indices (nodes without a parent), in arena order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Child chain of a node, in sibling order.
    pub fn children(&self, index: usize) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            next: self.nodes[index].first_child,
        }
    }

    /// Count of nodes currently marked visible.
    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.print).count()
    }
}

/// Iterator over a sibling chain.
pub struct ChildIter<'a> {
    tree: &'a Tree,
    next: Option<usize>,
}

impl Iterator for ChildIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.tree.nodes[current].next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_snapshot::MockProcess;

    fn three_node_tree() -> Tree {
        build_tree(vec![
            MockProcess::new(1, 0, "init").build(),
            MockProcess::new(10, 1, "shell").build(),
            MockProcess::new(11, 10, "editor").build(),
        ])
        .unwrap()
    }

    #[test]
    fn test_roots_and_children() {
        let tree = three_node_tree();
        let roots: Vec<usize> = tree.roots().collect();
        assert_eq!(roots, vec![0]);
        let kids: Vec<u32> = tree.children(0).map(|i| tree.pid_of(i)).collect();
        assert_eq!(kids, vec![10]);
    }

    #[test]
    fn test_pid_index_round_trip() {
        let tree = three_node_tree();
        for pid in [1u32, 10, 11] {
            let idx = tree.index_of_pid(pid).unwrap();
            assert_eq!(tree.pid_of(idx), pid);
        }
        assert!(tree.index_of_pid(999).is_none());
    }
}
