//! The public [`Tree`] facade wiring insertion, bulk loading, removal and
//! search together (§4.1).

use crate::bulk_load::{bulk_load, bulk_load_hybrid};
use crate::config::TreeConfig;
use crate::insertion::{grow_root, insert_recursive, insert_subtree_recursive};
use crate::item::Item;
use crate::node::{Node, NodeChildren};
use crate::query::{self, SearchIter};
use crate::rect::Rectangle;
use crate::removal::{remove_recursive, shrink_root, Orphan};

#[cfg(feature = "serde")]
use crate::error::Error;
#[cfg(feature = "serde")]
use crate::json;

/// A dynamic, bulk-loadable 2D R-tree spatial index over axis-aligned
/// rectangles, holding an opaque payload `T` per entry.
#[derive(Debug)]
pub struct Tree<T> {
    root: Node<T>,
    config: TreeConfig,
    size: usize,
}

impl<T> Default for Tree<T> {
    /// An empty tree with the default branching factor (9).
    fn default() -> Self {
        tracing::debug!("constructing empty tree with default configuration");
        Tree {
            root: Node::empty_leaf(),
            config: TreeConfig::default(),
            size: 0,
        }
    }
}

impl<T> Tree<T> {
    /// Creates an empty tree with the given branching factor (clamped to a
    /// minimum of 4 — see [`TreeConfig::new`]).
    pub fn new(max_entries: usize) -> Self {
        Tree::with_config(TreeConfig::new(max_entries))
    }

    /// Creates an empty tree tuned with `config`.
    pub fn with_config(config: TreeConfig) -> Self {
        tracing::debug!(
            max_entries = config.max_entries(),
            min_entries = config.min_entries(),
            "constructing empty tree with explicit configuration"
        );
        Tree {
            root: Node::empty_leaf(),
            config,
            size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Empties the tree, dropping every stored item.
    pub fn clear(&mut self) -> &mut Self {
        tracing::debug!(previous_len = self.size, "clearing tree");
        self.root = Node::empty_leaf();
        self.size = 0;
        self
    }

    /// Inserts a single item, descending via choose-subtree and splitting
    /// any node that overflows along the way (§4.3, §4.4).
    pub fn insert(&mut self, item: Item<T>) -> &mut Self {
        let max_entries = self.config.max_entries();
        let min_entries = self.config.min_entries();
        if let Some(sibling) = insert_recursive(&mut self.root, item, max_entries, min_entries) {
            grow_root(&mut self.root, sibling);
        }
        self.size += 1;
        self
    }

    /// Bulk loads `items`, either rebuilding the whole tree with a fresh STR
    /// pass (when `items` is at least as large as the tree's current size)
    /// or inserting them one at a time into the existing tree, whichever is
    /// cheaper (§4.5).
    pub fn load(&mut self, items: Vec<Item<T>>) -> &mut Self {
        if items.is_empty() {
            return self;
        }
        if items.len() >= self.size {
            let mut all = self.take_all_items();
            all.extend(items);
            self.size = all.len();
            tracing::debug!(count = self.size, "rebuilding tree via bulk load");
            self.root = bulk_load(all, self.config.max_entries());
        } else {
            for item in items {
                self.insert(item);
            }
        }
        self
    }

    /// Bulk loads items described by a flat `[min_x, min_y, max_x, max_y, ...]`
    /// coordinate buffer parallel to `payloads`, following the same
    /// rebuild-vs-insert threshold as [`Tree::load`] (§4.5).
    pub fn load_hybrid(&mut self, flat: &[f64], payloads: Vec<T>) -> &mut Self {
        let n = payloads.len();
        assert_eq!(
            flat.len(),
            4 * n,
            "flat coordinate buffer must have exactly 4 entries per item"
        );
        if n == 0 {
            return self;
        }
        if n >= self.size {
            tracing::debug!(count = n, "rebuilding tree via hybrid bulk load");
            self.root = bulk_load_hybrid(flat, payloads, self.config.max_entries());
            self.size = n;
        } else {
            for (i, data) in payloads.into_iter().enumerate() {
                let item = Item::new(flat[4 * i], flat[4 * i + 1], flat[4 * i + 2], flat[4 * i + 3], data);
                self.insert(item);
            }
        }
        self
    }

    /// Removes the first stored item equal to `target`, returning its
    /// payload. Requires `T: PartialEq`; use [`Tree::remove_by`] for a
    /// custom identity predicate.
    pub fn remove(&mut self, target: &T) -> Option<T>
    where
        T: PartialEq,
    {
        self.remove_by(|data| data == target)
    }

    /// Removes the first stored item for which `pred` returns `true`,
    /// condensing the tree and reinserting any subtree left underfull
    /// (§4.6).
    pub fn remove_by<F: FnMut(&T) -> bool>(&mut self, mut pred: F) -> Option<T> {
        let min_entries = self.config.min_entries();
        let max_entries = self.config.max_entries();
        let (data, orphans) = remove_recursive(&mut self.root, &mut pred, min_entries)?;

        if !orphans.is_empty() {
            tracing::trace!(count = orphans.len(), "reinserting condensation orphans");
        }
        for orphan in orphans {
            match orphan {
                Orphan::Item(item) => self.reinsert_item(item, max_entries, min_entries),
                Orphan::Subtree(subtree) => self.reinsert_subtree(subtree, max_entries, min_entries),
            };
        }
        shrink_root(&mut self.root);
        self.size -= 1;
        Some(data)
    }

    /// Reinserts a condensation-orphaned item. Unlike [`Tree::insert`], this
    /// does not touch `size` — the item was already counted and is only
    /// changing position in the tree, not being added.
    fn reinsert_item(&mut self, item: Item<T>, max_entries: usize, min_entries: usize) -> &mut Self {
        if let Some(sibling) = insert_recursive(&mut self.root, item, max_entries, min_entries) {
            grow_root(&mut self.root, sibling);
        }
        self
    }

    fn reinsert_subtree(&mut self, subtree: Node<T>, max_entries: usize, min_entries: usize) -> &mut Self {
        if self.root.height <= subtree.height {
            grow_root(&mut self.root, subtree);
        } else if let Some(sibling) =
            insert_subtree_recursive(&mut self.root, subtree, max_entries, min_entries)
        {
            grow_root(&mut self.root, sibling);
        }
        self
    }

    /// Every stored payload whose rectangle intersects `query`.
    pub fn search(&self, query: &Rectangle) -> Vec<&T> {
        query::search(&self.root, query)
    }

    /// Lazy counterpart of [`Tree::search`], expanding the tree only as far
    /// as the caller consumes the iterator.
    pub fn search_iter(&self, query: &Rectangle) -> SearchIter<'_, T> {
        query::search_iter(&self.root, query)
    }

    /// `true` if any stored rectangle intersects `query`.
    pub fn collides(&self, query: &Rectangle) -> bool {
        query::collides(&self.root, query)
    }

    /// Every stored payload, in tree order.
    pub fn all(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.size);
        collect_all(&self.root, &mut out);
        out
    }

    fn take_all_items(&mut self) -> Vec<Item<T>> {
        let old_root = std::mem::replace(&mut self.root, Node::empty_leaf());
        let mut out = Vec::with_capacity(self.size);
        flatten_items(old_root, &mut out);
        out
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> String
    where
        T: serde::Serialize,
    {
        json::to_json(&self.root)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(data: &str) -> Result<Self, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let root: Node<T> = json::from_json(data)?;
        let size = root.count_items();
        Ok(Tree {
            root,
            config: TreeConfig::default(),
            size,
        })
    }
}

fn collect_all<'a, T>(node: &'a Node<T>, out: &mut Vec<&'a T>) {
    match &node.children {
        NodeChildren::Leaf(items) => out.extend(items.iter().map(|item| &item.data)),
        NodeChildren::Interior(children) => {
            for child in children {
                collect_all(child, out);
            }
        }
    }
}

fn flatten_items<T>(node: Node<T>, out: &mut Vec<Item<T>>) {
    match node.children {
        NodeChildren::Leaf(items) => out.extend(items),
        NodeChildren::Interior(children) => {
            for child in children {
                flatten_items(child, out);
            }
        }
    }
}
