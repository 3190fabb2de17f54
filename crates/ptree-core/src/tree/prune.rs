//! Link rewriting after visibility marking.
//!
//! Pruning makes traversal skip invisible nodes without reclaiming
//! their arena entries: each visible node's `first_child` is rewritten
//! to its first visible child, and only visible siblings remain
//! chained through `next_sibling`.

use super::Tree;

/// Rewrite child/sibling links so that traversal from any visible node
/// reaches exactly its visible descendants.
///
/// Invisible nodes keep their old links but become unreachable from
/// visible roots.
pub fn prune(tree: &mut Tree) {
    for index in 0..tree.len() {
        if !tree.node(index).print {
            continue;
        }

        let kept: Vec<usize> = tree.children(index).filter(|&c| tree.node(c).print).collect();

        tree.node_mut(index).first_child = kept.first().copied();
        for pair in kept.windows(2) {
            tree.node_mut(pair[0]).next_sibling = Some(pair[1]);
        }
        if let Some(&last) = kept.last() {
            tree.node_mut(last).next_sibling = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_snapshot::MockProcess;
    use crate::tree::{build_tree, mark_visibility, VisibilityFilter};

    fn marked_tree(filter: &VisibilityFilter) -> Tree {
        let mut tree = build_tree(vec![
            MockProcess::new(1, 0, "init").uid(0, "root").build(),
            MockProcess::new(10, 1, "a").uid(0, "root").build(),
            MockProcess::new(20, 1, "b").uid(1000, "alice").build(),
            MockProcess::new(21, 20, "b-child").uid(1000, "alice").build(),
            MockProcess::new(30, 1, "c").uid(0, "root").build(),
        ])
        .unwrap();
        mark_visibility(&mut tree, filter);
        prune(&mut tree);
        tree
    }

    #[test]
    fn test_prune_no_filter_is_identity() {
        let tree = marked_tree(&VisibilityFilter::default());
        let kids: Vec<u32> = tree.children(0).map(|i| tree.pid_of(i)).collect();
        assert_eq!(kids, vec![10, 20, 30]);
    }

    #[test]
    fn test_prune_skips_invisible_siblings() {
        let filter = VisibilityFilter {
            usernames: vec!["alice".into()],
            ..Default::default()
        };
        let tree = marked_tree(&filter);
        let root = tree.index_of_pid(1).unwrap();
        let kids: Vec<u32> = tree.children(root).map(|i| tree.pid_of(i)).collect();
        assert_eq!(kids, vec![20]);
        let b = tree.index_of_pid(20).unwrap();
        let grandkids: Vec<u32> = tree.children(b).map(|i| tree.pid_of(i)).collect();
        assert_eq!(grandkids, vec![21]);
    }

    #[test]
    fn test_traversal_visits_exactly_marked_set() {
        let filter = VisibilityFilter {
            usernames: vec!["alice".into()],
            ..Default::default()
        };
        let tree = marked_tree(&filter);

        let mut reached = Vec::new();
        let mut stack: Vec<usize> = tree.roots().filter(|&r| tree.node(r).print).collect();
        while let Some(current) = stack.pop() {
            reached.push(tree.pid_of(current));
            stack.extend(tree.children(current));
        }
        reached.sort_unstable();

        let mut marked: Vec<u32> = (0..tree.len())
            .filter(|&i| tree.node(i).print)
            .map(|i| tree.pid_of(i))
            .collect();
        marked.sort_unstable();
        assert_eq!(reached, marked);
    }
}
