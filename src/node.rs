use smallvec::SmallVec;

use crate::item::Item;
use crate::rect::{HasRect, Rectangle};

/// Inline capacity for a node's child list. Sized to the default
/// `max_entries` (9) so the common case never spills to the heap; larger
/// configured branching factors simply grow past this inline capacity like
/// any other `SmallVec`.
pub const INLINE_CHILDREN: usize = 9;

pub type ItemVec<T> = SmallVec<[Item<T>; INLINE_CHILDREN]>;
pub type NodeVec<T> = SmallVec<[Node<T>; INLINE_CHILDREN]>;

/// Heterogeneous child storage: a leaf holds items directly, an interior
/// node holds child nodes. The traversals (search, insertion, removal) all
/// match on this explicitly rather than hiding the distinction behind a
/// trait object, since every hop through the tree needs to know which case
/// it's in.
#[derive(Debug)]
pub enum NodeChildren<T> {
    Leaf(ItemVec<T>),
    Interior(NodeVec<T>),
}

/// One node of the tree: a cached bounding rectangle, a height (1 for
/// leaves), and its children.
#[derive(Debug)]
pub struct Node<T> {
    pub rect: Rectangle,
    pub height: usize,
    pub children: NodeChildren<T>,
}

impl<T> Node<T> {
    /// An empty leaf — the shape of a freshly constructed or just-cleared
    /// tree's root.
    pub fn empty_leaf() -> Self {
        Node {
            rect: Rectangle::empty(),
            height: 1,
            children: NodeChildren::Leaf(SmallVec::new()),
        }
    }

    pub fn new_leaf(items: ItemVec<T>) -> Self {
        let rect = items
            .iter()
            .fold(Rectangle::empty(), |acc, item| acc.union(&item.rect()));
        Node {
            rect,
            height: 1,
            children: NodeChildren::Leaf(items),
        }
    }

    pub fn new_interior(children: NodeVec<T>) -> Self {
        let height = children.first().map(|c| c.height + 1).unwrap_or(2);
        let rect = children
            .iter()
            .fold(Rectangle::empty(), |acc, child| acc.union(&child.rect));
        Node {
            rect,
            height,
            children: NodeChildren::Interior(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.height == 1
    }

    pub fn len(&self) -> usize {
        match &self.children {
            NodeChildren::Leaf(items) => items.len(),
            NodeChildren::Interior(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recomputes `self.rect` as the exact union of the children's
    /// rectangles. Called after any mutation of `children` to restore
    /// invariant 4 (tight bounding rectangles, no slack).
    pub fn recompute_rect(&mut self) {
        self.rect = match &self.children {
            NodeChildren::Leaf(items) => items
                .iter()
                .fold(Rectangle::empty(), |acc, item| acc.union(&item.rect())),
            NodeChildren::Interior(nodes) => nodes
                .iter()
                .fold(Rectangle::empty(), |acc, n| acc.union(&n.rect)),
        };
    }

    /// Recursively counts stored items under this node.
    pub fn count_items(&self) -> usize {
        match &self.children {
            NodeChildren::Leaf(items) => items.len(),
            NodeChildren::Interior(nodes) => nodes.iter().map(Node::count_items).sum(),
        }
    }
}

impl<T> HasRect for Node<T> {
    fn rect(&self) -> Rectangle {
        self.rect
    }
}
