//! Randomized operation sequences checked against std::collections::BTreeMap.

use ordered_index::{BPlusIndex, OrderedIndex, RedBlackIndex, RemovalStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const SEED: u64 = 42;

/// Apply the same random upserts and deletes to `index` and a BTreeMap,
/// checking invariants and contents along the way.
fn run_against_btreemap<I>(index: &mut I, seed: u64, operations: usize, key_space: i32)
where
    I: OrderedIndex<i32, u64>,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reference = BTreeMap::new();

    for step in 0..operations {
        let key = rng.gen_range(0..key_space);
        if rng.gen_bool(0.6) {
            let value = rng.gen::<u64>();
            assert_eq!(
                index.upsert(key, value),
                reference.insert(key, value),
                "upsert {} at step {}",
                key,
                step
            );
        } else {
            assert_eq!(
                index.delete(&key),
                reference.remove(&key),
                "delete {} at step {}",
                key,
                step
            );
        }

        if let Err(violation) = index.check_invariants() {
            panic!("step {}: {}", step, violation);
        }
        assert_eq!(index.len(), reference.len());
    }

    let ours: Vec<(i32, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let theirs: Vec<(i32, u64)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(ours, theirs);

    for key in 0..key_space {
        match reference.get(&key) {
            Some(value) => assert_eq!(index.search(&key), Ok((&key, value))),
            None => assert!(index.search(&key).is_err()),
        }
    }
}

#[test]
fn test_red_black_successor_matches_btreemap() {
    let mut index = RedBlackIndex::new();
    run_against_btreemap(&mut index, SEED, 3000, 300);
}

#[test]
fn test_red_black_predecessor_matches_btreemap() {
    let mut index = RedBlackIndex::with_strategy(RemovalStrategy::Predecessor);
    run_against_btreemap(&mut index, SEED + 1, 3000, 300);
}

#[test]
fn test_bplus_small_orders_match_btreemap() {
    for order in [3, 4, 5, 6, 7] {
        let mut index = BPlusIndex::new(order).unwrap();
        run_against_btreemap(&mut index, SEED + order as u64, 2000, 250);
    }
}

#[test]
fn test_bplus_default_order_matches_btreemap() {
    let mut index = BPlusIndex::with_default_order();
    run_against_btreemap(&mut index, SEED, 4000, 1000);
}

#[test]
fn test_drain_to_empty_and_refill() {
    let mut rb = RedBlackIndex::new();
    let mut bp = BPlusIndex::new(4).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut keys: Vec<i32> = (0..500).collect();

    for round in 0..2 {
        for &k in &keys {
            rb.insert(k, k);
            bp.insert(k, k).unwrap();
        }
        // shuffle removal order
        for i in (1..keys.len()).rev() {
            keys.swap(i, rng.gen_range(0..=i));
        }
        for &k in &keys {
            assert_eq!(rb.remove(&k), Some(k), "round {}", round);
            assert_eq!(bp.remove(&k), Some(k), "round {}", round);
        }
        assert!(rb.is_empty());
        assert!(bp.is_empty());
        assert!(bp.is_leaf_root());
        rb.check_invariants().unwrap();
        bp.check_invariants().unwrap();
    }
}

#[test]
fn test_range_matches_btreemap() {
    let mut rng = StdRng::seed_from_u64(SEED + 7);
    let mut reference = BTreeMap::new();
    let mut rb = RedBlackIndex::new();
    let mut bp = BPlusIndex::new(5).unwrap();
    for _ in 0..400 {
        let key = rng.gen_range(0..1000);
        reference.insert(key, ());
        rb.insert(key, ());
        bp.upsert(key, ());
    }

    for _ in 0..100 {
        let a = rng.gen_range(0..1000);
        let b = rng.gen_range(a..=1000);
        let expected: Vec<i32> = reference.range(a..b).map(|(k, _)| *k).collect();
        let rb_keys: Vec<i32> = rb.range(a..b).map(|(k, _)| *k).collect();
        let bp_keys: Vec<i32> = bp.range(a..b).map(|(k, _)| *k).collect();
        assert_eq!(rb_keys, expected, "red-black range {}..{}", a, b);
        assert_eq!(bp_keys, expected, "b+ range {}..{}", a, b);

        let expected: Vec<i32> = reference.range(a..=b).map(|(k, _)| *k).collect();
        assert_eq!(bp.range(a..=b).map(|(k, _)| *k).collect::<Vec<_>>(), expected);
        assert_eq!(rb.range(a..=b).map(|(k, _)| *k).collect::<Vec<_>>(), expected);
    }
}
