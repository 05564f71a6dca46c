//! In-place sorters over a [`Dataset`].
//!
//! Every sorter leaves the dataset in non-decreasing order. Scratch space is
//! a stack array sized by the dataset's capacity, never the heap.

use crate::dataset::Dataset;
use crate::heap::BinaryHeap;
use crate::rbtree::RbTree;
use crate::slot::INVALID;

/// A sorter: reorders a dataset in place.
pub type Sorter<const N: usize> = fn(&mut Dataset<N>);

/// Every sorter with its name, in a fixed order.
pub fn all<const N: usize>() -> [(&'static str, Sorter<N>); 7] {
    [
        ("bubble", bubble::<N>),
        ("quicksort", quicksort::<N>),
        ("mergesort", mergesort::<N>),
        ("radixsort", radixsort::<N>),
        ("bitonicsort", bitonicsort::<N>),
        ("heapsort", heapsort::<N>),
        ("treesort", treesort::<N>),
    ]
}

// =============================================================================
// Bubble
// =============================================================================

/// Stops after a pass without swaps. Each pass settles the largest remaining
/// value, so the bound shrinks by one every time.
pub fn bubble<const N: usize>(data: &mut Dataset<N>) {
    let v = data.as_mut_slice();
    let mut bound = v.len();
    let mut swapped = true;
    while swapped && bound > 1 {
        swapped = false;
        for i in 1..bound {
            if v[i - 1] > v[i] {
                v.swap(i - 1, i);
                swapped = true;
            }
        }
        bound -= 1;
    }
}

// =============================================================================
// Quicksort
// =============================================================================

/// Hoare partition around the lower middle element.
///
/// Returns `j` such that every value in `v[..=j]` is `<=` every value in
/// `v[j + 1..]`, with `j < v.len() - 1` so both sides are non-empty.
/// Requires `v.len() >= 2`.
fn hoare_partition(v: &mut [u32]) -> usize {
    let pivot = v[(v.len() - 1) / 2];
    let mut i = 0;
    let mut j = v.len() - 1;
    loop {
        while v[i] < pivot {
            i += 1;
        }
        while v[j] > pivot {
            j -= 1;
        }
        if i >= j {
            return j;
        }
        v.swap(i, j);
        i += 1;
        j -= 1;
    }
}

fn quicksort_slice(mut v: &mut [u32]) {
    // Recurse into the smaller side and loop on the larger one, which keeps
    // the stack depth logarithmic.
    while v.len() > 1 {
        let split = hoare_partition(v) + 1;
        let (lo, hi) = std::mem::take(&mut v).split_at_mut(split);
        if lo.len() < hi.len() {
            quicksort_slice(lo);
            v = hi;
        } else {
            quicksort_slice(hi);
            v = lo;
        }
    }
}

pub fn quicksort<const N: usize>(data: &mut Dataset<N>) {
    quicksort_slice(data.as_mut_slice());
}

// =============================================================================
// Mergesort
// =============================================================================

/// Top-down. `aux` must be at least as long as `v`.
fn mergesort_slice(v: &mut [u32], aux: &mut [u32]) {
    let n = v.len();
    if n < 2 {
        return;
    }
    let mid = n / 2;
    mergesort_slice(&mut v[..mid], &mut aux[..mid]);
    mergesort_slice(&mut v[mid..], &mut aux[mid..n]);
    if v[mid - 1] <= v[mid] {
        return;
    }

    aux[..n].copy_from_slice(v);
    let (left, right) = aux[..n].split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in v.iter_mut() {
        // Ties take from the left, so the merge is stable.
        if j == right.len() || (i < left.len() && left[i] <= right[j]) {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}

pub fn mergesort<const N: usize>(data: &mut Dataset<N>) {
    let mut aux = [0u32; N];
    mergesort_slice(data.as_mut_slice(), &mut aux);
}

// =============================================================================
// Radix
// =============================================================================

/// MSB-first binary radix: split `v` on `bit` (zeros first), then each half
/// on the next lower bit.
fn radix_partition(v: &mut [u32], bit: u32) {
    if v.len() < 2 {
        return;
    }
    let mask = 1u32 << bit;
    let mut zeros = 0;
    let mut ones = v.len();
    while zeros < ones {
        if v[zeros] & mask == 0 {
            zeros += 1;
        } else {
            ones -= 1;
            v.swap(zeros, ones);
        }
    }
    if bit > 0 {
        let (lo, hi) = v.split_at_mut(zeros);
        radix_partition(lo, bit - 1);
        radix_partition(hi, bit - 1);
    }
}

pub fn radixsort<const N: usize>(data: &mut Dataset<N>) {
    radix_partition(data.as_mut_slice(), u32::BITS - 1);
}

// =============================================================================
// Bitonic
// =============================================================================

/// Merges a bitonic `v` into `ascending` order. Works for any length by
/// comparing across the largest power of two below `v.len()`.
fn bitonic_merge(v: &mut [u32], ascending: bool) {
    let n = v.len();
    if n < 2 {
        return;
    }
    let m = 1 << (n - 1).ilog2();
    for i in 0..n - m {
        if (v[i] > v[i + m]) == ascending {
            v.swap(i, i + m);
        }
    }
    let (lo, hi) = v.split_at_mut(m);
    bitonic_merge(lo, ascending);
    bitonic_merge(hi, ascending);
}

fn bitonic_slice(v: &mut [u32], ascending: bool) {
    let n = v.len();
    if n < 2 {
        return;
    }
    let (lo, hi) = v.split_at_mut(n / 2);
    bitonic_slice(lo, !ascending);
    bitonic_slice(hi, ascending);
    bitonic_merge(v, ascending);
}

pub fn bitonicsort<const N: usize>(data: &mut Dataset<N>) {
    bitonic_slice(data.as_mut_slice(), true);
}

// =============================================================================
// Heap / tree
// =============================================================================

/// Builds a [`BinaryHeap`] from the values and pops the maximum into the
/// tail until the heap is empty.
pub fn heapsort<const N: usize>(data: &mut Dataset<N>) {
    let mut heap: BinaryHeap<N> = BinaryHeap::new();
    let built = heap.build(data.as_slice());
    debug_assert!(built, "a dataset always fits a heap of equal capacity");

    for slot in data.as_mut_slice().iter_mut().rev() {
        match heap.remove() {
            Some(max) => *slot = max,
            None => break,
        }
    }
}

/// Inserts every value into a multiset [`RbTree`] and reads them back in
/// order.
///
/// [`INVALID`] cannot be a tree key. Those values are counted instead and
/// written at the tail, which is where the maximum belongs anyway.
pub fn treesort<const N: usize>(data: &mut Dataset<N>) {
    let mut tree: RbTree<N> = RbTree::new();
    let mut saturated = 0;
    for &v in data.as_slice() {
        if v == INVALID {
            saturated += 1;
        } else {
            let stored = tree.insert_duplicate(v, v);
            debug_assert!(stored, "a dataset always fits a tree of equal capacity");
        }
    }

    let v = data.as_mut_slice();
    let split = v.len() - saturated;
    let (sorted, tail) = v.split_at_mut(split);
    for (slot, (key, _)) in sorted.iter_mut().zip(tree.iter()) {
        *slot = key;
    }
    tail.fill(INVALID);
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const N: usize = crate::DATASET_CAPACITY;

    fn assert_sorts(values: &[u32]) {
        let mut expected = values.to_vec();
        expected.sort_unstable();

        for (name, sort) in all::<N>() {
            let mut data: Dataset<N> = Dataset::try_from(values).unwrap();
            sort(&mut data);
            assert!(data.validate(), "{name} left {data:?} unsorted");
            assert_eq!(data.as_slice(), &expected[..], "{name} lost values of {values:?}");
        }
    }

    #[test]
    fn test_names() {
        let names: Vec<&str> = all::<N>().iter().map(|&(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "bubble",
                "quicksort",
                "mergesort",
                "radixsort",
                "bitonicsort",
                "heapsort",
                "treesort"
            ]
        );
    }

    #[test]
    fn test_edge_cases() {
        assert_sorts(&[]);
        assert_sorts(&[42]);
        assert_sorts(&[2, 1]);
        assert_sorts(&[1, 2]);
        assert_sorts(&[7, 7, 7, 7, 7]);
        assert_sorts(&[0, u32::MAX, 0, u32::MAX, 1]);
        assert_sorts(&[u32::MAX; 3]);
        assert_sorts(&[3, 1, 2, 3, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_ordered_inputs() {
        let ascending: Vec<u32> = (0..N as u32).collect();
        let descending: Vec<u32> = ascending.iter().rev().copied().collect();
        let organ_pipe: Vec<u32> = (0..N as u32 / 2).chain((0..N as u32 / 2).rev()).collect();
        assert_sorts(&ascending);
        assert_sorts(&descending);
        assert_sorts(&organ_pipe);
    }

    #[test]
    fn test_full_capacity_duplicate_heavy() {
        let mut rng = StdRng::seed_from_u64(8);
        let values: Vec<u32> = (0..N).map(|_| rng.gen_range(0..4)).collect();
        assert_sorts(&values);
    }

    #[test]
    fn test_random_datasets_every_size() {
        let mut rng = StdRng::seed_from_u64(9);
        for len in 0..=N {
            let data: Dataset<N> = Dataset::random_with_len(&mut rng, len);
            assert_sorts(data.as_slice());
        }
        for _ in 0..200 {
            let data: Dataset<N> = Dataset::random(&mut rng);
            assert_sorts(data.as_slice());
        }
    }

    #[test]
    fn test_hoare_partition_splits() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..2_000 {
            let len = rng.gen_range(2..40);
            let mut v: Vec<u32> = (0..len).map(|_| rng.gen_range(0..10)).collect();
            let j = hoare_partition(&mut v);
            assert!(j < len - 1);
            let left_max = v[..=j].iter().max().copied();
            let right_min = v[j + 1..].iter().min().copied();
            assert!(left_max <= right_min, "{v:?} split at {j}");
        }
    }

    #[test]
    fn test_small_capacity() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let len = rng.gen_range(0..=5);
            let values: Vec<u32> = (0..len).map(|_| rng.gen_range(0..6)).collect();
            let mut expected = values.clone();
            expected.sort_unstable();
            for (name, sort) in all::<5>() {
                let mut data: Dataset<5> = Dataset::try_from(&values[..]).unwrap();
                sort(&mut data);
                assert_eq!(data.as_slice(), &expected[..], "{name}");
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            .. ProptestConfig::default()
        })]

        #[test]
        fn prop_every_sorter_matches_std(values in prop::collection::vec(any::<u32>(), 0..=N)) {
            let mut expected = values.clone();
            expected.sort_unstable();
            for (name, sort) in all::<N>() {
                let mut data: Dataset<N> = Dataset::try_from(&values[..]).unwrap();
                sort(&mut data);
                prop_assert_eq!(data.as_slice(), &expected[..], "{}", name);
            }
        }
    }
}
