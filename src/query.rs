//! Rectangle-range search and collision testing (§4.7).
//!
//! [`search`] is eager and collects every matching payload; [`search_iter`]
//! is its lazy counterpart, expanding the tree only as far as the caller
//! actually consumes. [`collides`] is not built on either — it short-circuits
//! on the first match, which an iterator's `any()` would do too, but writing
//! it directly avoids constructing the iterator's stack at all.

use crate::item::Item;
use crate::node::{Node, NodeChildren};
use crate::rect::Rectangle;

/// Collects every payload whose rectangle intersects `query`.
pub fn search<'a, T>(node: &'a Node<T>, query: &Rectangle) -> Vec<&'a T> {
    let mut out = Vec::new();
    search_into(node, query, &mut out);
    out
}

fn search_into<'a, T>(node: &'a Node<T>, query: &Rectangle, out: &mut Vec<&'a T>) {
    if !node.rect.intersects(query) {
        return;
    }
    match &node.children {
        NodeChildren::Leaf(items) => {
            for item in items {
                if item.rect().intersects(query) {
                    out.push(&item.data);
                }
            }
        }
        NodeChildren::Interior(children) => {
            for child in children {
                search_into(child, query, out);
            }
        }
    }
}

/// `true` if any stored rectangle intersects `query`, stopping at the first
/// hit rather than enumerating every match.
pub fn collides<T>(node: &Node<T>, query: &Rectangle) -> bool {
    if !node.rect.intersects(query) {
        return false;
    }
    match &node.children {
        NodeChildren::Leaf(items) => items.iter().any(|item| item.rect().intersects(query)),
        NodeChildren::Interior(children) => children.iter().any(|child| collides(child, query)),
    }
}

/// Lazy rectangle-range search, expanding the tree depth-first and pruning
/// any subtree whose bounding rectangle misses `query`.
pub struct SearchIter<'a, T> {
    query: Rectangle,
    nodes: Vec<&'a Node<T>>,
    current_leaf: Option<std::slice::Iter<'a, Item<T>>>,
}

pub fn search_iter<'a, T>(node: &'a Node<T>, query: &Rectangle) -> SearchIter<'a, T> {
    SearchIter {
        query: *query,
        nodes: vec![node],
        current_leaf: None,
    }
}

impl<'a, T> Iterator for SearchIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let mut exhausted = false;
            if let Some(iter) = &mut self.current_leaf {
                for item in iter {
                    if item.rect().intersects(&self.query) {
                        return Some(&item.data);
                    }
                }
                exhausted = true;
            }
            if exhausted {
                self.current_leaf = None;
            }
            if self.current_leaf.is_none() {
                let node = self.nodes.pop()?;
                if !node.rect.intersects(&self.query) {
                    continue;
                }
                match &node.children {
                    NodeChildren::Leaf(items) => self.current_leaf = Some(items.iter()),
                    NodeChildren::Interior(children) => self.nodes.extend(children.iter()),
                }
            }
        }
    }
}
