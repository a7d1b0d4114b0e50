//! Traversal-integrity properties shared by every store strategy.
//!
//! Each case replays a random sequence of creates and removes against a
//! store and against a plain `Vec` model, then checks that a full traversal
//! visits exactly the model's records, once each, in creation order.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use proptest::prelude::*;
use sparkfield_store::{AnyHandle, AnyStore, ParticleStore, StoreError, StoreOptions};
use sparkfield_types::StoreKind;

#[derive(Debug, Clone, Copy)]
enum Op {
    Create,
    /// Remove the live record at `index % len`, if any.
    Remove(usize),
    /// Walk the store, removing every record whose id is divisible by `k`.
    Sweep(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Create),
        3 => any::<usize>().prop_map(Op::Remove),
        1 => (2_u64..5).prop_map(Op::Sweep),
    ]
}

fn kind_strategy() -> impl Strategy<Value = StoreKind> {
    prop_oneof![
        Just(StoreKind::Heap),
        Just(StoreKind::Pooled),
        Just(StoreKind::HandleList),
    ]
}

/// Collect ids by walking the cursor protocol rather than `iter()`.
fn walk(store: &AnyStore) -> Vec<u64> {
    let mut out = Vec::new();
    let mut h = store.first();
    while h != store.end() {
        out.push(store.get(h).unwrap().birth_tick);
        h = store.next(h).unwrap();
    }
    out
}

fn replay(kind: StoreKind, ops: &[Op]) -> (AnyStore, Vec<(u64, AnyHandle)>) {
    let mut store = AnyStore::new(kind, StoreOptions::default()).unwrap();
    let mut model: Vec<(u64, AnyHandle)> = Vec::new();
    let mut next_id = 0_u64;

    for op in ops {
        match *op {
            Op::Create => {
                let h = store.create().unwrap();
                store.get_mut(h).unwrap().birth_tick = next_id;
                model.push((next_id, h));
                next_id += 1;
            }
            Op::Remove(index) => {
                if model.is_empty() {
                    continue;
                }
                let at = index % model.len();
                let (_, h) = model.remove(at);
                let successor = store.remove(h).unwrap();
                let expected = model.get(at).map_or(store.end(), |(_, next)| *next);
                assert_eq!(successor, expected);
            }
            Op::Sweep(k) => {
                let mut h = store.first();
                while h != store.end() {
                    if store.get(h).unwrap().birth_tick % k == 0 {
                        h = store.remove(h).unwrap();
                    } else {
                        h = store.next(h).unwrap();
                    }
                }
                model.retain(|(id, _)| id % k != 0);
            }
        }
    }
    (store, model)
}

proptest! {
    #[test]
    fn traversal_matches_model(
        kind in kind_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let (store, model) = replay(kind, &ops);
        let expected: Vec<u64> = model.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(walk(&store), expected.clone());
        let via_iter: Vec<u64> = store.iter().map(|r| r.birth_tick).collect();
        prop_assert_eq!(via_iter, expected);
        prop_assert_eq!(store.len(), model.len());
    }

    #[test]
    fn removed_handles_are_never_reachable(
        kind in kind_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let mut store = AnyStore::new(kind, StoreOptions::default()).unwrap();
        let mut removed = Vec::new();
        for op in &ops {
            match op {
                Op::Create => {
                    store.create().unwrap();
                }
                Op::Remove(_) | Op::Sweep(_) => {
                    let h = store.first();
                    if h != store.end() {
                        store.remove(h).unwrap();
                        removed.push(h);
                    }
                }
            }
        }
        for h in removed {
            prop_assert_eq!(
                store.get(h).unwrap_err(),
                StoreError::InvalidHandle { operation: "get" }
            );
        }
    }
}

#[test]
fn all_strategies_agree_on_a_fixed_script() {
    let ops = [
        Op::Create,
        Op::Create,
        Op::Create,
        Op::Remove(1),
        Op::Create,
        Op::Sweep(3),
        Op::Create,
        Op::Remove(0),
        Op::Create,
    ];
    let walks: Vec<Vec<u64>> = StoreKind::ALL
        .iter()
        .map(|kind| walk(&replay(*kind, &ops).0))
        .collect();
    // ids 0..=5 created; 1 removed; sweep(3) drops 0 and 3; then 2 removed.
    assert_eq!(walks, vec![vec![4, 5]; 3]);
}
