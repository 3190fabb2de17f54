//! Sibling reordering.
//!
//! Applied recursively after pruning, so only visible siblings are
//! rechained. The sort is stable: ties keep the forest builder's
//! input order.

use super::Tree;
use crate::options::SortKey;
use std::cmp::Ordering;

/// Reorder every sibling chain (and the root set's chains beneath each
/// root) by the given key.
pub fn sort_siblings(tree: &mut Tree, key: SortKey) {
    for root in tree.roots().collect::<Vec<_>>() {
        sort_recursive(tree, root, key);
    }
}

fn sort_recursive(tree: &mut Tree, index: usize, key: SortKey) {
    let mut chain: Vec<usize> = tree.children(index).collect();
    // Vec::sort_by is stable; equal keys preserve chain order.
    chain.sort_by(|&a, &b| compare(tree, a, b, key));

    tree.node_mut(index).first_child = chain.first().copied();
    for pair in chain.windows(2) {
        tree.node_mut(pair[0]).next_sibling = Some(pair[1]);
    }
    if let Some(&last) = chain.last() {
        tree.node_mut(last).next_sibling = None;
    }

    for child in chain {
        sort_recursive(tree, child, key);
    }
}

/// Comparison per key. PID, age and user sort ascending; resource
/// keys (cpu, mem, threads) sort descending so the heaviest siblings
/// surface first.
fn compare(tree: &Tree, a: usize, b: usize, key: SortKey) -> Ordering {
    let ra = &tree.node(a).record;
    let rb = &tree.node(b).record;
    match key {
        SortKey::Pid => ra.pid.cmp(&rb.pid),
        SortKey::Age => ra.age_seconds.cmp(&rb.age_seconds),
        SortKey::User => ra.username.cmp(&rb.username),
        SortKey::Cpu => rb
            .cpu_percent
            .partial_cmp(&ra.cpu_percent)
            .unwrap_or(Ordering::Equal),
        SortKey::Mem => rb.rss_bytes.cmp(&ra.rss_bytes),
        SortKey::Threads => rb.num_threads.cmp(&ra.num_threads),
    }
}
