//! Deletion and condensation (§4.6).
//!
//! Locating the item to remove is a full descent comparing every leaf
//! entry — the convenience [`crate::Tree::remove`] only has the payload to
//! go on, not the original rectangle, so there is nothing to prune the
//! descent on. Once removed, any node left under `min_entries` children is
//! detached from its parent and its direct children are buffered for
//! reinsertion at their original height, exactly as in Guttman's original
//! condense-tree step.

use crate::item::Item;
use crate::node::{Node, NodeChildren};

/// A subtree or item displaced by condensation, still carrying enough
/// information to be reinserted at the right height.
pub enum Orphan<T> {
    Item(Item<T>),
    Subtree(Node<T>),
}

/// Removes the first item under `node` for which `pred` returns `true`,
/// returning its payload together with any orphans produced by condensing
/// nodes that underflowed along the way. `None` if no item matched.
pub fn remove_recursive<T>(
    node: &mut Node<T>,
    pred: &mut impl FnMut(&T) -> bool,
    min_entries: usize,
) -> Option<(T, Vec<Orphan<T>>)> {
    if node.is_leaf() {
        let pos = match &node.children {
            NodeChildren::Leaf(items) => items.iter().position(|it| pred(&it.data)),
            NodeChildren::Interior(_) => unreachable!(),
        }?;
        let removed = if let NodeChildren::Leaf(items) = &mut node.children {
            items.remove(pos)
        } else {
            unreachable!()
        };
        node.recompute_rect();
        return Some((removed.data, Vec::new()));
    }

    let mut outcome = None;
    if let NodeChildren::Interior(children) = &mut node.children {
        for i in 0..children.len() {
            if let Some((data, mut orphans)) = remove_recursive(&mut children[i], pred, min_entries)
            {
                if children[i].len() < min_entries {
                    let underflowed = children.remove(i);
                    tracing::trace!(
                        detached_len = underflowed.len(),
                        height = underflowed.height,
                        "detaching underflowed node during condensation"
                    );
                    collect_orphans(underflowed, &mut orphans);
                }
                outcome = Some((data, orphans));
                break;
            }
        }
    }

    let (data, orphans) = outcome?;
    node.recompute_rect();
    Some((data, orphans))
}

/// Flattens a detached node's direct children into `out` as orphans — items
/// for a detached leaf, whole subtrees (preserving their structure) for a
/// detached interior node.
fn collect_orphans<T>(node: Node<T>, out: &mut Vec<Orphan<T>>) {
    match node.children {
        NodeChildren::Leaf(items) => out.extend(items.into_iter().map(Orphan::Item)),
        NodeChildren::Interior(children) => out.extend(children.into_iter().map(Orphan::Subtree)),
    }
}

/// Collapses the root while it is an interior node with a single child,
/// shrinking the tree's height to match (§4.6 step 5).
pub fn shrink_root<T>(root: &mut Node<T>) {
    loop {
        let single_child = matches!(&root.children, NodeChildren::Interior(children) if children.len() == 1);
        if !single_child {
            break;
        }
        let old = std::mem::replace(root, Node::empty_leaf());
        if let NodeChildren::Interior(mut children) = old.children {
            *root = children.pop().expect("checked len() == 1 above");
        }
    }
}
