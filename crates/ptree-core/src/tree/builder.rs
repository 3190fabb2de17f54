//! Forest construction from snapshot records.
//!
//! Records arrive in provider order; sibling chains preserve that
//! order, so the output is deterministic for a given snapshot.
//! Callers that need a different sibling order run the sorter
//! afterwards.

use super::{Node, Tree};
use crate::collect::ProcessRecord;
use ptree_common::Error;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Build the arena forest from a snapshot.
///
/// A record whose `ppid` is absent from the snapshot, equal to its own
/// PID, or part of a parent cycle becomes a root.
///
/// # Errors
/// `InvalidSnapshot` on duplicate PIDs.
pub fn build_tree(records: Vec<ProcessRecord>) -> Result<Tree, Error> {
    let mut nodes = Vec::with_capacity(records.len());
    let mut pid_to_index = HashMap::with_capacity(records.len());

    for record in records {
        let index = nodes.len();
        if let Some(prev) = pid_to_index.insert(record.pid, index) {
            return Err(Error::InvalidSnapshot(format!(
                "duplicate pid {} at records {} and {}",
                record.pid, prev, index
            )));
        }
        nodes.push(Node::new(record));
    }

    let mut tree = Tree { nodes, pid_to_index };

    for index in 0..tree.len() {
        let pid = tree.nodes[index].record.pid;
        let ppid = tree.nodes[index].record.ppid;

        if ppid == pid {
            trace!(pid, "self-parented record treated as root");
            continue;
        }
        let Some(parent_index) = tree.index_of_pid(ppid) else {
            continue; // orphan: becomes an additional root
        };
        if parent_index == index {
            continue;
        }
        if ppid_chain_loops(&tree, pid, ppid) {
            debug!(pid, ppid, "parent cycle detected; treating as root");
            continue;
        }

        tree.nodes[index].parent = Some(parent_index);
        append_child(&mut tree, parent_index, index);
    }

    debug!(
        nodes = tree.len(),
        roots = tree.roots().count(),
        "forest built"
    );
    Ok(tree)
}

/// Walk the ppid chain starting at `ppid` and report whether it leads
/// back to `pid` (or never terminates within the arena bound).
///
/// The walk follows the snapshot's ppid values rather than arena links,
/// so it is independent of link-construction order. Every member of a
/// mutual-parent cycle is therefore rooted, and the forest stays
/// acyclic.
fn ppid_chain_loops(tree: &Tree, pid: u32, ppid: u32) -> bool {
    let mut current = ppid;
    for _ in 0..tree.len() {
        if current == pid {
            return true;
        }
        let Some(index) = tree.index_of_pid(current) else {
            return false;
        };
        let next = tree.nodes[index].record.ppid;
        if next == current {
            return false;
        }
        current = next;
    }
    // Chain exceeded the node count: a cycle not reaching `pid`.
    true
}

/// Append `child` at the end of `parent`'s sibling chain.
fn append_child(tree: &mut Tree, parent: usize, child: usize) {
    match tree.nodes[parent].first_child {
        None => tree.nodes[parent].first_child = Some(child),
        Some(first) => {
            let mut cursor = first;
            while let Some(next) = tree.nodes[cursor].next_sibling {
                cursor = next;
            }
            tree.nodes[cursor].next_sibling = Some(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_snapshot::MockProcess;

    #[test]
    fn test_sibling_order_is_input_order() {
        let tree = build_tree(vec![
            MockProcess::new(1, 0, "init").build(),
            MockProcess::new(30, 1, "c").build(),
            MockProcess::new(10, 1, "a").build(),
            MockProcess::new(20, 1, "b").build(),
        ])
        .unwrap();
        let kids: Vec<u32> = tree.children(0).map(|i| tree.pid_of(i)).collect();
        assert_eq!(kids, vec![30, 10, 20]);
    }

    #[test]
    fn test_duplicate_pid_rejected() {
        let err = build_tree(vec![
            MockProcess::new(5, 1, "one").build(),
            MockProcess::new(5, 1, "two").build(),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_orphan_becomes_root() {
        let tree = build_tree(vec![
            MockProcess::new(1, 0, "init").build(),
            MockProcess::new(77, 9999, "stray").build(),
        ])
        .unwrap();
        let roots: Vec<u32> = tree.roots().map(|i| tree.pid_of(i)).collect();
        assert_eq!(roots, vec![1, 77]);
    }

    #[test]
    fn test_self_parented_becomes_root() {
        let tree = build_tree(vec![MockProcess::new(4, 4, "selfie").build()]).unwrap();
        assert_eq!(tree.roots().count(), 1);
        assert!(tree.node(0).parent.is_none());
    }

    #[test]
    fn test_mutual_cycle_yields_two_roots() {
        let tree = build_tree(vec![
            MockProcess::new(2, 3, "left").build(),
            MockProcess::new(3, 2, "right").build(),
        ])
        .unwrap();
        let roots: Vec<u32> = tree.roots().map(|i| tree.pid_of(i)).collect();
        assert_eq!(roots, vec![2, 3]);
        assert!(tree.node(0).first_child.is_none());
        assert!(tree.node(1).first_child.is_none());
    }

    #[test]
    fn test_parent_pid_invariant() {
        let tree = build_tree(vec![
            MockProcess::new(1, 0, "init").build(),
            MockProcess::new(10, 1, "shell").build(),
            MockProcess::new(11, 10, "editor").build(),
            MockProcess::new(12, 10, "pager").build(),
        ])
        .unwrap();
        for i in 0..tree.len() {
            if let Some(p) = tree.node(i).parent {
                assert_eq!(tree.pid_of(p), tree.node(i).record.ppid);
                assert_ne!(p, i);
            }
        }
    }

    #[test]
    fn test_sibling_chains_terminate() {
        let tree = build_tree(
            (0..50)
                .map(|i| MockProcess::new(100 + i, 1, "w").build())
                .chain(std::iter::once(MockProcess::new(1, 0, "init").build()))
                .collect(),
        )
        .unwrap();
        let mut steps = 0;
        let root = tree.index_of_pid(1).unwrap();
        let mut cursor = tree.node(root).first_child;
        while let Some(c) = cursor {
            steps += 1;
            assert!(steps <= tree.len());
            cursor = tree.node(c).next_sibling;
        }
        assert_eq!(steps, 50);
    }
}
