//! Whole-tree behavioral invariants and the literal boundary scenarios.
//!
//! Structural invariants (node fill bounds, tight bounding rectangles,
//! uniform leaf depth) are exercised next to the code that maintains them in
//! `src/node.rs`, `src/split.rs` and `src/bulk_load.rs`; these tests only
//! reach what `rtree2d`'s public API can observe.

use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_hc::Hc128Rng;
use rtree2d::{Item, Rectangle, Tree};

fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
    Rectangle::new(min_x, min_y, max_x, max_y)
}

#[test]
fn empty_tree_has_no_results() {
    let tree: Tree<&'static str> = Tree::default();
    assert!(tree.search(&rect(0.0, 0.0, 1.0, 1.0)).is_empty());
    assert!(!tree.collides(&rect(0.0, 0.0, 1.0, 1.0)));
    assert!(tree.all().is_empty());
    assert_eq!(tree.len(), 0);
}

#[test]
fn single_insert_is_edge_inclusive() {
    let mut tree: Tree<&'static str> = Tree::default();
    tree.insert(Item::new(5.0, 5.0, 6.0, 6.0, "a"));

    assert_eq!(tree.search(&rect(4.0, 4.0, 7.0, 7.0)), vec![&"a"]);
    assert!(tree.search(&rect(7.0, 7.0, 8.0, 8.0)).is_empty());
    assert_eq!(tree.search(&rect(6.0, 6.0, 7.0, 7.0)), vec![&"a"]);
}

#[test]
fn duplicate_coordinates_remove_by_identity() {
    let mut tree: Tree<&'static str> = Tree::default();
    tree.insert(Item::new(1.0, 1.0, 2.0, 2.0, "a"));
    tree.insert(Item::new(1.0, 1.0, 2.0, 2.0, "b"));

    assert_eq!(tree.remove(&"a"), Some("a"));
    assert_eq!(tree.all(), vec![&"b"]);
}

#[test]
fn bulk_load_of_ten_thousand_items_searches_full_universe() {
    let mut rng = Hc128Rng::seed_from_u64(42);
    let items: Vec<Item<u32>> = (0..10_000u32)
        .map(|id| {
            let x = rng.random_range(-1_000.0..1_000.0);
            let y = rng.random_range(-1_000.0..1_000.0);
            Item::new(x, y, x + 1.0, y + 1.0, id)
        })
        .collect();

    let mut tree: Tree<u32> = Tree::default();
    tree.load(items);
    assert_eq!(tree.len(), 10_000);

    let universe = rect(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY);
    assert_eq!(tree.search(&universe).len(), 10_000);
    assert!(tree.collides(&universe));
}

#[test]
fn load_hybrid_literal_example() {
    let flat = vec![0.0, 0.0, 1.0, 1.0, 10.0, 10.0, 11.0, 11.0];
    let items = vec![1u32, 2u32];

    let mut tree: Tree<u32> = Tree::default();
    tree.load_hybrid(&flat, items);

    let mut found: Vec<u32> = tree
        .search(&rect(0.5, 0.5, 10.5, 10.5))
        .into_iter()
        .copied()
        .collect();
    found.sort();
    assert_eq!(found, vec![1, 2]);
}

#[test]
fn remove_of_never_inserted_item_is_noop() {
    let mut tree: Tree<u32> = Tree::default();
    tree.insert(Item::new(0.0, 0.0, 1.0, 1.0, 1));
    assert_eq!(tree.remove(&999), None);
    assert_eq!(tree.all().len(), 1);
}

#[test]
fn clear_empties_tree_and_it_stays_usable() {
    let mut tree: Tree<u32> = Tree::default();
    tree.insert(Item::new(0.0, 0.0, 1.0, 1.0, 1));
    tree.clear();
    assert!(tree.all().is_empty());

    tree.insert(Item::new(2.0, 2.0, 3.0, 3.0, 2));
    assert_eq!(tree.all(), vec![&2]);
}

#[test]
fn collides_agrees_with_nonempty_search_over_random_queries() {
    let mut rng = Hc128Rng::seed_from_u64(7);
    let items: Vec<Item<u32>> = (0..500u32)
        .map(|id| {
            let x = rng.random_range(0.0..100.0);
            let y = rng.random_range(0.0..100.0);
            Item::new(x, y, x + 1.0, y + 1.0, id)
        })
        .collect();
    let mut tree: Tree<u32> = Tree::default();
    tree.load(items);

    for _ in 0..200 {
        let x = rng.random_range(-10.0..110.0);
        let y = rng.random_range(-10.0..110.0);
        let query = rect(x, y, x + 5.0, y + 5.0);
        assert_eq!(tree.collides(&query), !tree.search(&query).is_empty());
    }
}

#[test]
fn load_and_load_hybrid_agree_as_multisets() {
    let n = 400;
    let mut rng = Hc128Rng::seed_from_u64(99);
    let mut flat = Vec::with_capacity(n * 4);
    let mut items = Vec::with_capacity(n);
    let mut payloads = Vec::with_capacity(n);
    for id in 0..n as u32 {
        let x = rng.random_range(0.0..50.0);
        let y = rng.random_range(0.0..50.0);
        flat.extend_from_slice(&[x, y, x + 1.0, y + 1.0]);
        items.push(Item::new(x, y, x + 1.0, y + 1.0, id));
        payloads.push(id);
    }

    let mut tree_plain: Tree<u32> = Tree::default();
    tree_plain.load(items);
    let mut tree_hybrid: Tree<u32> = Tree::default();
    tree_hybrid.load_hybrid(&flat, payloads);

    let query = rect(10.0, 10.0, 30.0, 30.0);
    let mut a: Vec<u32> = tree_plain.search(&query).into_iter().copied().collect();
    let mut b: Vec<u32> = tree_hybrid.search(&query).into_iter().copied().collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn item_count_tracks_inserts_minus_removes() {
    let mut rng = Hc128Rng::seed_from_u64(1234);
    let mut tree: Tree<u32> = Tree::default();
    let mut live = Vec::new();
    let mut inserted = 0u32;
    let mut removed = 0u32;

    for id in 0..300u32 {
        let x = rng.random_range(0.0..20.0);
        tree.insert(Item::new(x, 0.0, x + 1.0, 1.0, id));
        live.push(id);
        inserted += 1;
        if id % 3 == 0 && !live.is_empty() {
            let victim = live.remove(rng.random_range(0..live.len()));
            assert_eq!(tree.remove(&victim), Some(victim));
            removed += 1;
        }
    }

    assert_eq!(tree.all().len() as u32, inserted - removed);
    assert_eq!(tree.len(), live.len());
}

#[cfg(feature = "serde")]
#[test]
fn json_round_trip_preserves_items_as_multiset() {
    let mut tree: Tree<u32> = Tree::default();
    for id in 0..150u32 {
        let x = id as f64;
        tree.insert(Item::new(x, 0.0, x + 1.0, 1.0, id));
    }

    let json = tree.to_json();
    let restored: Tree<u32> = Tree::from_json(&json).unwrap();

    let mut before: Vec<u32> = tree.all().into_iter().copied().collect();
    let mut after: Vec<u32> = restored.all().into_iter().copied().collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
    assert_eq!(restored.to_json(), json);
}

#[test]
fn enlarged_area_is_consistent_with_union_area_on_random_rectangles() {
    let mut rng = Hc128Rng::seed_from_u64(5);
    for _ in 0..50 {
        let a = rect(
            rng.random_range(0.0..10.0),
            rng.random_range(0.0..10.0),
            rng.random_range(10.0..20.0),
            rng.random_range(10.0..20.0),
        );
        let b = rect(
            rng.random_range(0.0..10.0),
            rng.random_range(0.0..10.0),
            rng.random_range(10.0..20.0),
            rng.random_range(10.0..20.0),
        );
        assert_relative_eq!(a.enlarged_area(&b), a.union(&b).area(), epsilon = 1e-9);
    }
}
