use std::collections::BTreeSet;

use crate::annotations::merger::of_kind;
use crate::models::DocumentTree;
use crate::text;

/// Validates structured output invariants.
///
/// Asserts that:
/// - Every node is reachable from the root exactly once
/// - Node ids spell the path from the root (`0.2.1` is the second child of
///   the third child of the root) and parent links match children lists
/// - All annotations lie within their node's text
/// - Mergeable annotations of one kind with different values never overlap
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tree: &DocumentTree) {
    let root = tree.root();
    assert_eq!(tree[root].node_id(), "0", "root id must be \"0\"");
    assert!(tree.parent(root).is_none(), "root must not have a parent");
    assert_eq!(
        tree.iter().count(),
        tree.node_count(),
        "every node must be reachable from the root"
    );

    for id in tree.iter() {
        let node = &tree[id];

        for (index, &child) in tree.children(id).iter().enumerate() {
            assert_eq!(tree.parent(child), Some(id), "parent link of {}", tree[child].node_id());
            assert_eq!(
                tree[child].node_id(),
                format!("{}.{index}", node.node_id()),
                "node id does not match its path"
            );
        }

        let len = text::char_len(node.text());
        for a in node.annotations() {
            assert!(
                a.start() <= a.end() && a.end() <= len,
                "annotation {a} out of bounds in node {} (text len: {len})",
                node.node_id()
            );
        }

        let kinds: BTreeSet<_> = node.annotations().iter().map(|a| a.kind()).collect();
        for kind in kinds {
            let mut same_kind = of_kind(node.annotations(), kind);
            if same_kind.iter().any(|a| !a.is_mergeable()) {
                continue;
            }
            same_kind.sort_by_key(|a| a.start());
            for pair in same_kind.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!(
                    a.value() == b.value() || a.end() <= b.start(),
                    "contradicting annotations {a} and {b} in node {}",
                    node.node_id()
                );
            }
        }
    }
}
