//! Sort-Tile-Recursive (STR) bulk loading (§4.5).
//!
//! Both [`bulk_load`] (plain items) and [`bulk_load_hybrid`] (a flat
//! coordinate buffer parallel to a payload buffer) funnel through the same
//! slicing logic; the hybrid path only differs in where it reads coordinates
//! from, so that sorting never has to look through the host's item type.

use smallvec::SmallVec;

use crate::item::Item;
use crate::node::Node;

/// Splits `remaining` into `number_of_clusters` roughly equal slabs, each
/// internally still in sorted order, by repeatedly partitioning on `key`
/// with a quickselect (`pdqselect`) rather than a full sort.
struct SlabIterator<T, F> {
    remaining: Vec<T>,
    slab_size: usize,
    key: F,
}

impl<T, F: Fn(&T) -> f64> SlabIterator<T, F> {
    fn new(remaining: Vec<T>, number_of_clusters: usize, key: F) -> Self {
        let slab_size = div_up(remaining.len(), number_of_clusters.max(1));
        SlabIterator {
            remaining,
            slab_size,
            key,
        }
    }
}

impl<T, F: Fn(&T) -> f64> Iterator for SlabIterator<T, F> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        let len = self.remaining.len();
        if len == 0 {
            return None;
        }
        if len <= self.slab_size {
            return Some(std::mem::take(&mut self.remaining));
        }
        let key = &self.key;
        pdqselect::select_by(&mut self.remaining, self.slab_size, |a, b| {
            key(a).partial_cmp(&key(b)).unwrap()
        });
        let tail = self.remaining.split_off(self.slab_size);
        Some(std::mem::replace(&mut self.remaining, tail))
    }
}

fn div_up(dividend: usize, divisor: usize) -> usize {
    (dividend + divisor - 1) / divisor
}

/// The tree height an STR build targets for `n` items under branching
/// factor `m`: `ceil(log_m(n))`, at least 1.
fn target_height(n: usize, m: usize) -> usize {
    if n <= m || m < 2 {
        1
    } else {
        ((n as f64).ln() / (m as f64).ln()).ceil() as usize
    }
}

/// Number of vertical slices `S` and per-slice-group capacity `Nsub` for a
/// range of `n` items at a node that should have `height` levels below it
/// (inclusive), under branching factor `m`.
fn slices_and_group_size(n: usize, height: usize, m: usize) -> (usize, usize) {
    let n_sub = (m as f64).powi(height as i32 - 1).max(1.0);
    let remaining_clusters = (n as f64 / n_sub).ceil();
    let s = remaining_clusters.sqrt().ceil().max(1.0) as usize;
    (s, n_sub as usize)
}

/// Builds a packed tree from `items` in one STR pass.
pub fn bulk_load<T>(items: Vec<Item<T>>, max_entries: usize) -> Node<T> {
    if items.is_empty() {
        return Node::empty_leaf();
    }
    let height = target_height(items.len(), max_entries);
    build(items, height, max_entries, |it| it.min_x, |it| it.min_y)
}

fn build<T, FX, FY>(items: Vec<Item<T>>, height: usize, m: usize, key_x: FX, key_y: FY) -> Node<T>
where
    FX: Fn(&Item<T>) -> f64 + Copy,
    FY: Fn(&Item<T>) -> f64 + Copy,
{
    if items.len() <= m {
        return Node::new_leaf(SmallVec::from_vec(items));
    }
    let (s, n_sub) = slices_and_group_size(items.len(), height, m);
    let mut children = Vec::new();
    for slab in SlabIterator::new(items, s, key_x) {
        let groups = div_up(slab.len(), n_sub);
        for group in SlabIterator::new(slab, groups, key_y) {
            children.push(build(group, height - 1, m, key_x, key_y));
        }
    }
    Node::new_interior(SmallVec::from_vec(children))
}

/// Builds a packed tree reading coordinates directly from a flat buffer laid
/// out `[min_x0, min_y0, max_x0, max_y0, min_x1, ...]`, parallel to a
/// payload buffer of the same length. Never looks up coordinates through
/// `T`; sorting only ever touches `flat` and a permutation of indices, so
/// `T` pays no coordinate-accessor trait bound.
pub fn bulk_load_hybrid<T>(flat: &[f64], payloads: Vec<T>, max_entries: usize) -> Node<T> {
    let n = payloads.len();
    assert_eq!(
        flat.len(),
        4 * n,
        "flat coordinate buffer must have exactly 4 entries per item"
    );
    if n == 0 {
        return Node::empty_leaf();
    }
    let mut slots: Vec<Option<T>> = payloads.into_iter().map(Some).collect();
    let indices: Vec<usize> = (0..n).collect();
    let height = target_height(n, max_entries);
    build_hybrid(indices, flat, &mut slots, height, max_entries)
}

fn build_hybrid<T>(
    indices: Vec<usize>,
    flat: &[f64],
    slots: &mut [Option<T>],
    height: usize,
    m: usize,
) -> Node<T> {
    if indices.len() <= m {
        let items: Vec<Item<T>> = indices
            .into_iter()
            .map(|i| {
                let data = slots[i].take().expect("each index consumed exactly once");
                Item::new(flat[4 * i], flat[4 * i + 1], flat[4 * i + 2], flat[4 * i + 3], data)
            })
            .collect();
        return Node::new_leaf(SmallVec::from_vec(items));
    }
    let (s, n_sub) = slices_and_group_size(indices.len(), height, m);
    let key_x = |i: &usize| flat[4 * i];
    let key_y = |i: &usize| flat[4 * i + 1];
    let mut children = Vec::new();
    for slab in SlabIterator::new(indices, s, key_x) {
        let groups = div_up(slab.len(), n_sub);
        for group in SlabIterator::new(slab, groups, key_y) {
            children.push(build_hybrid(group, flat, slots, height - 1, m));
        }
    }
    Node::new_interior(SmallVec::from_vec(children))
}
