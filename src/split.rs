//! Wires the generic split heuristic (§4.4) to the concrete [`Node`] shape.

use crate::heuristics::{apply_split, plan_split};
use crate::node::{Node, NodeChildren};
use smallvec::SmallVec;

/// Splits an overflowing node (one with more than `max_entries` children)
/// into two siblings at the same height, each satisfying the minimum fill.
/// Consumes `node`; the node itself is not reused.
pub fn split_node<T>(node: Node<T>, min_entries: usize) -> (Node<T>, Node<T>) {
    let height = node.height;
    match node.children {
        NodeChildren::Leaf(items) => {
            let items: Vec<_> = items.into_vec();
            let (order, split_at) = plan_split(&items, min_entries);
            let (g1, g2) = apply_split(items, &order, split_at);
            (
                Node::new_leaf(SmallVec::from_vec(g1)),
                Node::new_leaf(SmallVec::from_vec(g2)),
            )
        }
        NodeChildren::Interior(children) => {
            let children: Vec<_> = children.into_vec();
            let (order, split_at) = plan_split(&children, min_entries);
            let (g1, g2) = apply_split(children, &order, split_at);
            let mut a = Node::new_interior(SmallVec::from_vec(g1));
            let mut b = Node::new_interior(SmallVec::from_vec(g2));
            a.height = height;
            b.height = height;
            (a, b)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::item::Item;

    #[test]
    fn split_leaf_preserves_all_items() {
        let items: SmallVec<[Item<i32>; crate::node::INLINE_CHILDREN]> = SmallVec::from_vec(
            (0..10)
                .map(|i| Item::new(i as f64, 0.0, i as f64 + 1.0, 1.0, i))
                .collect(),
        );
        let node = Node::new_leaf(items);
        let total_before = node.count_items();
        let (a, b) = split_node(node, 2);
        assert_eq!(a.count_items() + b.count_items(), total_before);
        assert!(a.len() >= 2 && b.len() >= 2);
        assert!(a.is_leaf() && b.is_leaf());
    }

    #[test]
    fn split_interior_preserves_height() {
        let leaves: SmallVec<[Node<i32>; crate::node::INLINE_CHILDREN]> = SmallVec::from_vec(
            (0..8)
                .map(|i| {
                    Node::new_leaf(SmallVec::from_vec(vec![Item::new(
                        i as f64,
                        0.0,
                        i as f64 + 1.0,
                        1.0,
                        i,
                    )]))
                })
                .collect(),
        );
        let node = Node::new_interior(leaves);
        let height = node.height;
        let (a, b) = split_node(node, 2);
        assert_eq!(a.height, height);
        assert_eq!(b.height, height);
    }
}
