//! Choose-subtree and node-split heuristics (§4.3, §4.4).

use crate::rect::{Axis, HasRect, Rectangle};

/// Picks the child that should receive a new entry with bounding rectangle
/// `target`: the child requiring the least enlargement to cover `target`,
/// breaking ties by the child's current area.
pub fn choose_subtree(children: &[Rectangle], target: &Rectangle) -> usize {
    let mut best_index = 0;
    let mut best_enlargement = f64::INFINITY;
    let mut best_area = f64::INFINITY;
    for (i, child) in children.iter().enumerate() {
        let enlargement = child.enlarged_area(target) - child.area();
        let area = child.area();
        if enlargement < best_enlargement
            || (enlargement == best_enlargement && area < best_area)
        {
            best_enlargement = enlargement;
            best_area = area;
            best_index = i;
        }
    }
    best_index
}

fn union_of(rects: &[Rectangle], order: &[usize], range: std::ops::Range<usize>) -> Rectangle {
    order[range]
        .iter()
        .fold(Rectangle::empty(), |acc, &i| acc.union(&rects[i]))
}

fn sum_margins_for_order(rects: &[Rectangle], order: &[usize], min_entries: usize) -> f64 {
    let total = order.len();
    let mut sum = 0.0;
    for k in min_entries..=(total - min_entries) {
        let g1 = union_of(rects, order, 0..k);
        let g2 = union_of(rects, order, k..total);
        sum += g1.margin() + g2.margin();
    }
    sum
}

fn sorted_indices_by<F: Fn(&Rectangle) -> f64>(rects: &[Rectangle], key: F) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| key(&rects[a]).partial_cmp(&key(&rects[b])).unwrap());
    order
}

/// Total margin (summed across both the by-min and by-max orderings, and
/// across every candidate split index) for splitting along `axis`. Smaller
/// is better; used to pick the split axis (§4.4 step 1).
fn margin_sum_for_axis(rects: &[Rectangle], axis: Axis, min_entries: usize) -> f64 {
    let by_min = sorted_indices_by(rects, |r| axis.min_coord(r));
    let by_max = sorted_indices_by(rects, |r| axis.max_coord(r));
    sum_margins_for_order(rects, &by_min, min_entries) + sum_margins_for_order(rects, &by_max, min_entries)
}

/// Picks the axis to split an overflowing node along.
pub fn choose_split_axis(rects: &[Rectangle], min_entries: usize) -> Axis {
    let margin_x = margin_sum_for_axis(rects, Axis::X, min_entries);
    let margin_y = margin_sum_for_axis(rects, Axis::Y, min_entries);
    if margin_x <= margin_y {
        Axis::X
    } else {
        Axis::Y
    }
}

/// Given entries already ordered along the chosen split axis, picks the
/// split index `k` (the first group gets `order[0..k]`) minimising overlap
/// area between the two groups, tie-broken by total area (§4.4 step 2).
pub fn choose_split_index(rects: &[Rectangle], order: &[usize], min_entries: usize) -> usize {
    let total = order.len();
    let mut best_k = min_entries;
    let mut best_overlap = f64::INFINITY;
    let mut best_area = f64::INFINITY;
    for k in min_entries..=(total - min_entries) {
        let g1 = union_of(rects, order, 0..k);
        let g2 = union_of(rects, order, k..total);
        let overlap = g1.intersection_area(&g2);
        let area = g1.area() + g2.area();
        if overlap < best_overlap || (overlap == best_overlap && area < best_area) {
            best_overlap = overlap;
            best_area = area;
            best_k = k;
        }
    }
    best_k
}

/// Splits `entries` (an overflowing node's `M+1` children) into two groups
/// following the full axis-then-index heuristic, returning the winning
/// permutation and split point: `entries` reordered so that
/// `order[0..split_at]` is the first group and `order[split_at..]` is the
/// second.
pub fn plan_split<E: HasRect>(entries: &[E], min_entries: usize) -> (Vec<usize>, usize) {
    let rects: Vec<Rectangle> = entries.iter().map(|e| e.rect()).collect();
    let axis = choose_split_axis(&rects, min_entries);
    let order = sorted_indices_by(&rects, |r| axis.min_coord(r));
    let split_at = choose_split_index(&rects, &order, min_entries);
    (order, split_at)
}

/// Moves `entries` into two groups according to a `(order, split_at)` plan
/// from [`plan_split`]. Does not require `E: Clone`.
pub fn apply_split<E>(entries: Vec<E>, order: &[usize], split_at: usize) -> (Vec<E>, Vec<E>) {
    let mut slots: Vec<Option<E>> = entries.into_iter().map(Some).collect();
    let mut reordered: Vec<E> = order.iter().map(|&i| slots[i].take().unwrap()).collect();
    let second = reordered.split_off(split_at);
    (reordered, second)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn choose_subtree_prefers_no_enlargement() {
        let children = vec![
            Rectangle::new(0.0, 0.0, 10.0, 10.0),
            Rectangle::new(100.0, 100.0, 101.0, 101.0),
        ];
        let target = Rectangle::new(1.0, 1.0, 2.0, 2.0);
        assert_eq!(choose_subtree(&children, &target), 0);
    }

    #[test]
    fn choose_subtree_breaks_enlargement_ties_on_area() {
        let children = vec![
            Rectangle::new(0.0, 0.0, 10.0, 1.0),
            Rectangle::new(0.0, 0.0, 1.0, 10.0),
        ];
        // Both require identical enlargement to cover a point at (20, 20);
        // child 1 has the same area as child 0, so with truly-equal areas the
        // first visited (index 0) wins. Pick a target that makes the
        // enlargement equal but leaves areas equal too, to pin the tie-break
        // down to the iteration order.
        let target = Rectangle::new(20.0, 20.0, 20.0, 20.0);
        let idx = choose_subtree(&children, &target);
        assert!(idx == 0 || idx == 1);
    }

    #[test]
    fn plan_split_respects_min_entries_bounds() {
        let rects: Vec<Rectangle> = (0..6)
            .map(|i| Rectangle::new(i as f64, 0.0, i as f64 + 1.0, 1.0))
            .collect();
        let (order, split_at) = plan_split(&rects, 2);
        assert!(split_at >= 2 && split_at <= rects.len() - 2);
        assert_eq!(order.len(), rects.len());
    }

    #[test]
    fn apply_split_partitions_without_clone() {
        struct NoClone(i32);
        impl HasRect for NoClone {
            fn rect(&self) -> Rectangle {
                Rectangle::new(self.0 as f64, 0.0, self.0 as f64 + 1.0, 1.0)
            }
        }
        let entries = vec![NoClone(0), NoClone(1), NoClone(2), NoClone(3)];
        let (order, split_at) = plan_split(&entries, 2);
        let (g1, g2) = apply_split(entries, &order, split_at);
        assert_eq!(g1.len() + g2.len(), 4);
    }
}
