//! Structural properties of both indexes on hand-picked and generated inputs.

use ordered_index::bplus::NodeRef;
use ordered_index::{BPlusIndex, IndexError, OrderedIndex, RedBlackIndex, RemovalStrategy};
use paste::paste;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ----------------------------------------------------------------------------
// Red-Black scenarios
// ----------------------------------------------------------------------------

#[test]
fn test_red_black_small_scenario() {
    let mut tree = RedBlackIndex::new();
    for k in [10, 20, 5] {
        tree.insert(k, k.to_string());
    }
    assert_eq!(tree.first().map(|(k, _)| *k), Some(5));
    assert_eq!(tree.render(), "    20[R]\n10[B]\n    5[R]\n");
    tree.check_invariants().unwrap();

    assert_eq!(tree.remove(&10), Some("10".to_string()));
    tree.check_invariants().unwrap();
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![5, 20]);
}

#[test]
fn test_red_black_duplicate_insert_updates_in_place() {
    let mut tree = RedBlackIndex::new();
    assert_eq!(tree.insert(7, "first"), None);
    assert_eq!(tree.insert(7, "second"), Some("first"));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.search(&7), Ok((&7, &"second")));
}

#[test]
fn test_red_black_height_stays_logarithmic() {
    for strategy in [RemovalStrategy::Successor, RemovalStrategy::Predecessor] {
        let mut tree = RedBlackIndex::with_strategy(strategy);
        for k in 0..1023 {
            tree.insert(k, ());
        }
        // 2 * log2(n + 1)
        assert!(tree.height() <= 20, "height {}", tree.height());

        for k in (0..1023).step_by(2) {
            tree.remove(&k);
            tree.check_invariants().unwrap();
        }
        assert_eq!(tree.len(), 511);
    }
}

#[test]
fn test_removal_strategies_agree_on_contents() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut successor = RedBlackIndex::with_strategy(RemovalStrategy::Successor);
    let mut predecessor = RedBlackIndex::with_strategy(RemovalStrategy::Predecessor);

    for _ in 0..2000 {
        let key: u16 = rng.gen_range(0..200);
        if rng.gen_bool(0.5) {
            successor.insert(key, key);
            predecessor.insert(key, key);
        } else {
            assert_eq!(successor.remove(&key), predecessor.remove(&key));
        }
    }
    successor.check_invariants().unwrap();
    predecessor.check_invariants().unwrap();
    assert!(successor.iter().eq(predecessor.iter()));
}

#[test]
fn test_red_black_absent_operations_are_harmless() {
    let mut tree: RedBlackIndex<i32, i32> = RedBlackIndex::new();
    assert_eq!(tree.remove(&1), None);
    assert_eq!(tree.try_remove(&1), Err(IndexError::KeyNotFound));
    assert!(tree.search(&1).unwrap_err().is_not_found());
    tree.check_invariants().unwrap();
}

// ----------------------------------------------------------------------------
// B+ scenarios
// ----------------------------------------------------------------------------

#[test]
fn test_bplus_order_four_scenario() {
    let mut tree = BPlusIndex::new(4).unwrap();
    for k in 0..=12 {
        tree.insert(k, k).unwrap();
    }
    assert!(!tree.is_leaf_root());
    assert!(tree.search(&3).is_ok());
    assert!(tree.search(&11).is_ok());
    assert_eq!(tree.search(&13), Err(IndexError::KeyNotFound));
    tree.check_invariants().unwrap();
}

#[test]
fn test_bplus_root_split_has_one_key_two_children() {
    let mut tree = BPlusIndex::new(3).unwrap();
    tree.insert(1, ()).unwrap();
    tree.insert(2, ()).unwrap();
    tree.insert(3, ()).unwrap();

    let NodeRef::Branch(root) = tree.root_ref() else {
        panic!("expected a branch root");
    };
    let root = tree.get_branch(root).unwrap();
    assert_eq!(root.keys(), &[2]);
    assert_eq!(root.children().len(), 2);
}

#[test]
fn test_bplus_rejected_duplicate_changes_nothing() {
    let mut tree = BPlusIndex::new(4).unwrap();
    for k in 0..20 {
        tree.insert(k, k).unwrap();
    }
    let before = tree.render();
    assert_eq!(tree.insert(10, 99), Err(IndexError::KeyAlreadyExists));
    assert_eq!(tree.render(), before);
    assert_eq!(tree.get(&10), Some(&10));
}

#[test]
fn test_bplus_rejects_small_orders() {
    for order in 0..3 {
        let err = BPlusIndex::<i32, i32>::new(order).unwrap_err();
        assert!(err.is_order_error());
    }
}

/// Every node within its key-count bounds and the leaf chain in sync with the
/// full traversal.
fn assert_fan_out(tree: &BPlusIndex<i32, i32>) {
    let order = tree.order();
    let min_keys = order.div_ceil(2) - 1;
    assert!(tree.leaf_sizes().iter().all(|&n| n <= order - 1));
    if !tree.is_leaf_root() {
        assert!(tree.leaf_sizes().iter().all(|&n| n >= min_keys));
    }
    let chained: Vec<i32> = tree
        .leaf_chain()
        .flat_map(|(_, leaf)| leaf.keys().to_vec())
        .collect();
    let traversed: Vec<i32> = tree.keys().copied().collect();
    assert_eq!(chained, traversed);
    tree.check_invariants().unwrap();
}

macro_rules! bplus_order_tests {
    ($($order:literal),*) => {
        $(
            paste! {
                #[test]
                fn [<test_order_ $order _ascending_inserts>]() {
                    let mut tree = BPlusIndex::new($order).unwrap();
                    for k in 0..300 {
                        tree.insert(k, k).unwrap();
                        assert_fan_out(&tree);
                    }
                }

                #[test]
                fn [<test_order_ $order _random_inserts_and_deletes>]() {
                    let mut rng = StdRng::seed_from_u64($order);
                    let mut tree = BPlusIndex::new($order).unwrap();
                    for _ in 0..1500 {
                        let key = rng.gen_range(0..400);
                        if rng.gen_bool(0.55) {
                            tree.upsert(key, key);
                        } else {
                            tree.remove(&key);
                        }
                        assert_fan_out(&tree);
                    }
                }

                #[test]
                fn [<test_order_ $order _descending_deletes>]() {
                    let mut tree = BPlusIndex::new($order).unwrap();
                    for k in 0..200 {
                        tree.insert(k, k).unwrap();
                    }
                    for k in (0..200).rev() {
                        assert_eq!(tree.try_remove(&k), Ok(k));
                        assert_fan_out(&tree);
                    }
                    assert!(tree.is_leaf_root());
                }
            }
        )*
    };
}

bplus_order_tests!(3, 4, 5, 8, 16);

#[test]
fn test_both_indexes_through_one_contract() {
    fn fill<I: OrderedIndex<i32, i32>>(index: &mut I) -> Vec<i32> {
        for k in (0..100).rev() {
            index.upsert(k, -k);
        }
        for k in (0..100).filter(|k| k % 4 == 0) {
            index.delete(&k);
        }
        index.iter().map(|(k, _)| *k).collect()
    }

    let rb = fill(&mut RedBlackIndex::new());
    let bp = fill(&mut BPlusIndex::new(4).unwrap());
    assert_eq!(rb, bp);
    assert_eq!(rb.len(), 75);
}
