//! Single-item insertion with choose-subtree descent and cascading splits
//! (§4.3, §4.4), plus height-aware reinsertion of whole subtrees used by
//! condensation (§4.6 step 4).

use smallvec::SmallVec;

use crate::heuristics::choose_subtree;
use crate::item::Item;
use crate::node::{Node, NodeChildren};
use crate::rect::Rectangle;
use crate::split::split_node;

/// Replaces an overflowing node with its first split half in place,
/// returning the second half as a new sibling for the caller to insert into
/// its own parent (or to become half of a new root).
fn split_in_place<T>(node: &mut Node<T>, min_entries: usize) -> Node<T> {
    let taken = std::mem::replace(node, Node::empty_leaf());
    let (a, b) = split_node(taken, min_entries);
    tracing::trace!(a_len = a.len(), b_len = b.len(), "split overflowing node");
    *node = a;
    b
}

/// Wraps `root` and `sibling` (both the same height) in a freshly created
/// root one level taller.
pub fn grow_root<T>(root: &mut Node<T>, sibling: Node<T>) {
    let old_root = std::mem::replace(root, Node::empty_leaf());
    *root = Node::new_interior(SmallVec::from_vec(vec![old_root, sibling]));
}

/// Inserts `item` into the subtree rooted at `node`. Returns `Some(sibling)`
/// if `node` overflowed and had to split.
pub fn insert_recursive<T>(
    node: &mut Node<T>,
    item: Item<T>,
    max_entries: usize,
    min_entries: usize,
) -> Option<Node<T>> {
    let item_rect = item.rect();
    node.rect.extend(&item_rect);

    if node.is_leaf() {
        if let NodeChildren::Leaf(items) = &mut node.children {
            items.push(item);
        }
    } else {
        let idx = choose_child(node, &item_rect);
        let overflow = if let NodeChildren::Interior(children) = &mut node.children {
            insert_recursive(&mut children[idx], item, max_entries, min_entries)
        } else {
            unreachable!("interior node has leaf children")
        };
        if let Some(sibling) = overflow {
            if let NodeChildren::Interior(children) = &mut node.children {
                children.push(sibling);
            }
        }
    }

    if node.len() > max_entries {
        Some(split_in_place(node, min_entries))
    } else {
        None
    }
}

/// Reinserts a whole `subtree` (produced by condensation) as a descendant of
/// `node`, stopping one level above the subtree's own height so the
/// subtree's internal structure is preserved rather than flattened to
/// items. Returns `Some(sibling)` on cascading overflow, as with
/// [`insert_recursive`].
pub fn insert_subtree_recursive<T>(
    node: &mut Node<T>,
    subtree: Node<T>,
    max_entries: usize,
    min_entries: usize,
) -> Option<Node<T>> {
    let subtree_rect = subtree.rect;
    node.rect.extend(&subtree_rect);

    if node.height == subtree.height + 1 {
        if let NodeChildren::Interior(children) = &mut node.children {
            children.push(subtree);
        }
    } else {
        let idx = choose_child(node, &subtree_rect);
        let overflow = if let NodeChildren::Interior(children) = &mut node.children {
            insert_subtree_recursive(&mut children[idx], subtree, max_entries, min_entries)
        } else {
            unreachable!("a node taller than subtree.height + 1 cannot be a leaf")
        };
        if let Some(sibling) = overflow {
            if let NodeChildren::Interior(children) = &mut node.children {
                children.push(sibling);
            }
        }
    }

    if node.len() > max_entries {
        Some(split_in_place(node, min_entries))
    } else {
        None
    }
}

fn choose_child<T>(node: &Node<T>, target: &Rectangle) -> usize {
    match &node.children {
        NodeChildren::Interior(children) => {
            let rects: Vec<Rectangle> = children.iter().map(|c| c.rect).collect();
            choose_subtree(&rects, target)
        }
        NodeChildren::Leaf(_) => unreachable!("choose_child called on a leaf"),
    }
}
