use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Set(#[proptest(strategy = "0u32..64")] u32, u32),
    #[proptest(weight = 1)]
    Duplicate(#[proptest(strategy = "0u32..64")] u32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0u32..64")] u32),
    #[proptest(weight = 1)]
    Get(#[proptest(strategy = "0u32..64")] u32),
}

fn keys_in_order<const N: usize>(t: &RbTree<N>) -> Vec<u32> {
    t.iter().map(|(k, _)| k).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_map_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        let mut t: RbTree<32> = RbTree::new();
        let mut m: BTreeMap<u32, u32> = BTreeMap::new();

        for op in ops {
            // A map has no duplicates: treat them as plain updates.
            let op = match op {
                Op::Duplicate(key) => Op::Set(key, !key),
                op => op,
            };
            match op {
                Op::Set(key, value) => {
                    let stored = t.set(key, value);
                    prop_assert_eq!(stored, m.contains_key(&key) || m.len() < 32);
                    if stored {
                        m.insert(key, value);
                    }
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(key), m.get(&key).copied());
                }
                Op::Duplicate(_) => unreachable!(),
            }
            prop_assert_eq!(t.check(), Ok(()));
            prop_assert_eq!(t.len(), m.len());
        }

        let got: Vec<(u32, u32)> = t.iter().collect();
        let expected: Vec<(u32, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_multiset_stays_sorted(ops in prop::collection::vec(any::<Op>(), 0..=600)) {
        let mut t: RbTree<64> = RbTree::new();
        let mut model: BTreeMap<u32, usize> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(key, _) | Op::Duplicate(key) => {
                    if t.insert_duplicate(key, key) {
                        *model.entry(key).or_default() += 1;
                    } else {
                        prop_assert_eq!(t.len(), 64);
                    }
                }
                Op::Remove(key) => {
                    let removed = t.remove(key);
                    match model.get_mut(&key) {
                        Some(n) => {
                            prop_assert_eq!(removed, Some(key));
                            *n -= 1;
                            if *n == 0 {
                                model.remove(&key);
                            }
                        }
                        None => prop_assert_eq!(removed, None),
                    }
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.contains(key), model.contains_key(&key));
                }
            }
            prop_assert!(t.validate());
            prop_assert_eq!(t.check(), Ok(()));
        }

        let expected: Vec<u32> = model
            .iter()
            .flat_map(|(&k, &n)| std::iter::repeat(k).take(n))
            .collect();
        prop_assert_eq!(keys_in_order(&t), expected);
    }

    #[test]
    fn prop_remove_in_any_order(
        keys in prop::collection::btree_set(0u32..1_000, 0..=128),
        seed in any::<u64>(),
    ) {
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut t: RbTree<128> = RbTree::new();
        for &k in &keys {
            prop_assert!(t.set(k, !k));
        }

        let mut order: Vec<u32> = keys.iter().copied().collect();
        order.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));

        for (n, &k) in order.iter().enumerate() {
            prop_assert_eq!(t.remove(k), Some(!k));
            prop_assert_eq!(t.get(k), None);
            prop_assert_eq!(t.len(), order.len() - n - 1);
            prop_assert_eq!(t.check(), Ok(()));
        }
        prop_assert!(t.root.is_invalid());
    }
}

fn for_each_permutation(items: &[u32], mut f: impl FnMut(&[u32])) {
    fn rec(items: &[u32], used: &mut [bool], out: &mut Vec<u32>, f: &mut impl FnMut(&[u32])) {
        if out.len() == items.len() {
            f(out);
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i]);
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = [1, 2, 3, 4, 5, 6, 7];
    for_each_permutation(&keys, |perm| {
        let mut t: RbTree<8> = RbTree::new();
        for &k in perm {
            assert!(t.set(k, k));
            assert_eq!(t.check(), Ok(()), "after inserting {k} from {perm:?}");
        }
        assert_eq!(keys_in_order(&t), keys);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = [1, 2, 3, 4, 5, 6, 7];
    let mut base: RbTree<8> = RbTree::new();
    for &k in &keys {
        base.set(k, k);
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        for &k in perm {
            assert_eq!(t.remove(k), Some(k));
            assert_eq!(t.check(), Ok(()), "after removing {k} from {perm:?}");
        }
        assert!(t.is_empty());
        assert!(t.root.is_invalid());
    });
}
