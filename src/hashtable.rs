//! Open-addressing hashtable with linear probing.
//!
//! There are no tombstones. Lookups probe every slot starting at
//! `hash_fnv1(key) % N` (wrapping once) instead of stopping at the first free
//! slot, so removing from the middle of a probe run never hides later
//! entries. Worst case is O(N) per lookup.

use std::fmt;

use crate::hash::hash_fnv1;
use crate::slot::{assert_capacity, INVALID};
use crate::HASHTABLE_CAPACITY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    key: u32,
    value: u32,
}

impl Entry {
    const FREE: Entry = Entry {
        key: INVALID,
        value: INVALID,
    };

    #[inline]
    fn is_taken(&self) -> bool {
        self.key != INVALID
    }
}

/// Fixed-capacity `u32 -> u32` map.
#[derive(Clone)]
pub struct Hashtable<const N: usize = HASHTABLE_CAPACITY> {
    arr: [Entry; N],
    len: usize,
}

impl<const N: usize> Hashtable<N> {
    const CAPACITY_OK: () = assert_capacity(N);

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            arr: [Entry::FREE; N],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Fraction of taken slots.
    pub fn load_factor(&self) -> f32 {
        if N == 0 {
            return 0.0;
        }
        self.len as f32 / N as f32
    }

    /// Probes from `key`'s home slot for the slot holding `key`, or for the
    /// first free slot when `seeking_free` is set. Returns [`INVALID`] when
    /// none is found within one full wrap.
    pub fn index(&self, key: u32, seeking_free: bool) -> u32 {
        if N == 0 || (!seeking_free && key == INVALID) {
            return INVALID;
        }
        let home = hash_fnv1(key) as usize % N;
        (0..N)
            .map(|i| (home + i) % N)
            .find(|&j| {
                let entry = &self.arr[j];
                if seeking_free {
                    !entry.is_taken()
                } else {
                    entry.is_taken() && entry.key == key
                }
            })
            .map_or(INVALID, |j| j as u32)
    }

    pub fn contains(&self, key: u32) -> bool {
        self.index(key, false) != INVALID
    }

    /// Stores `value` under `key`, overwriting an existing entry.
    ///
    /// Returns `false` if `key` is [`INVALID`] or the key is new and the
    /// table is full.
    pub fn set(&mut self, key: u32, value: u32) -> bool {
        if key == INVALID {
            return false;
        }
        let existing = self.index(key, false);
        if existing != INVALID {
            self.arr[existing as usize].value = value;
            return true;
        }

        if self.len == N {
            debug_log!(capacity = N, key, "hashtable full");
            return false;
        }
        let slot = self.index(key, true);
        debug_assert_ne!(slot, INVALID, "free slot must exist below capacity");
        self.arr[slot as usize] = Entry { key, value };
        self.len += 1;
        true
    }

    pub fn get(&self, key: u32) -> Option<u32> {
        match self.index(key, false) {
            INVALID => None,
            i => Some(self.arr[i as usize].value),
        }
    }

    /// Frees `key`'s slot, returning its value.
    pub fn remove(&mut self, key: u32) -> Option<u32> {
        match self.index(key, false) {
            INVALID => None,
            i => {
                let entry = std::mem::replace(&mut self.arr[i as usize], Entry::FREE);
                self.len -= 1;
                Some(entry.value)
            }
        }
    }

    /// Taken `(key, value)` entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.arr
            .iter()
            .filter(|e| e.is_taken())
            .map(|e| (e.key, e.value))
    }
}

impl<const N: usize> Default for Hashtable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for Hashtable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<const N: usize> fmt::Display for Hashtable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.arr.iter().enumerate() {
            if entry.is_taken() {
                writeln!(f, "{i:03} -> ({} {})", entry.key, entry.value)?;
            } else {
                writeln!(f, "{i:03} -> free")?;
            }
        }
        writeln!(f, "load factor : {:.3}", self.load_factor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    /// Keys whose home slot in a table of `N` is `home`.
    fn colliding<const N: usize>(home: usize, count: usize) -> Vec<u32> {
        (0u32..)
            .filter(|&k| hash_fnv1(k) as usize % N == home)
            .take(count)
            .collect()
    }

    #[test]
    fn test_basic() {
        let mut t: Hashtable = Hashtable::new();
        assert!(t.set(1, 10));
        assert!(t.set(2, 20));
        assert_eq!(t.get(1), Some(10));
        assert_eq!(t.get(2), Some(20));
        assert_eq!(t.get(3), None);
        assert!(t.contains(1));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_set_twice_keeps_one_entry() {
        let mut t: Hashtable = Hashtable::new();
        assert!(t.set(7, 1));
        assert!(t.set(7, 2));
        assert_eq!(t.get(7), Some(2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.iter().filter(|&(k, _)| k == 7).count(), 1);
    }

    #[test]
    fn test_home_slot() {
        let mut t: Hashtable = Hashtable::new();
        let home = hash_fnv1(12345) % 256;
        assert_eq!(t.index(12345, true), home);
        t.set(12345, 1);
        assert_eq!(t.index(12345, false), home);
    }

    #[test]
    fn test_probing_survives_middle_removal() {
        let mut t: Hashtable<16> = Hashtable::new();
        let keys = colliding::<16>(3, 3);
        for &k in &keys {
            assert!(t.set(k, k));
        }
        assert_eq!(t.index(keys[2], false), 5);

        assert_eq!(t.remove(keys[1]), Some(keys[1]));
        assert_eq!(t.get(keys[2]), Some(keys[2]));
        // The freed middle slot is reused.
        assert_eq!(t.index(keys[1], true), 4);
    }

    #[test]
    fn test_probe_wraps_around() {
        let mut t: Hashtable<8> = Hashtable::new();
        let keys = colliding::<8>(7, 2);
        t.set(keys[0], 0);
        t.set(keys[1], 1);
        assert_eq!(t.index(keys[0], false), 7);
        assert_eq!(t.index(keys[1], false), 0);
    }

    #[test]
    fn test_full_table() {
        let mut t: Hashtable<8> = Hashtable::new();
        for k in 0..8 {
            assert!(t.set(k, k));
        }
        assert_eq!(t.load_factor(), 1.0);
        assert!(!t.set(100, 1));
        assert_eq!(t.index(100, true), INVALID);
        // Overwrites still work at full load.
        assert!(t.set(3, 30));
        assert_eq!(t.get(3), Some(30));

        assert_eq!(t.remove(0), Some(0));
        assert!(t.set(100, 1));
        assert_eq!(t.get(100), Some(1));
    }

    #[test]
    fn test_invalid_key() {
        let mut t: Hashtable = Hashtable::new();
        assert!(!t.set(INVALID, 1));
        assert_eq!(t.get(INVALID), None);
        assert_eq!(t.remove(INVALID), None);
        assert!(t.is_empty());
    }

    #[test]
    fn test_display_dump() {
        let mut t: Hashtable<4> = Hashtable::new();
        let home = hash_fnv1(5) as usize % 4;
        t.set(5, 50);
        let dump = t.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[home], format!("{home:03} -> (5 50)"));
        assert_eq!(lines[(home + 1) % 4], format!("{:03} -> free", (home + 1) % 4));
        assert_eq!(lines[4], "load factor : 0.250");
    }

    #[test]
    fn test_randomized_against_hashmap() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut t: Hashtable<64> = Hashtable::new();
        let mut m: HashMap<u32, u32> = HashMap::new();

        for _ in 0..20_000 {
            let key = rng.gen_range(0..100);
            match rng.gen_range(0..3) {
                0 => {
                    let v = rng.gen();
                    let stored = t.set(key, v);
                    assert_eq!(stored, m.contains_key(&key) || m.len() < 64);
                    if stored {
                        m.insert(key, v);
                    }
                }
                1 => assert_eq!(t.remove(key), m.remove(&key)),
                _ => assert_eq!(t.get(key), m.get(&key).copied()),
            }
            assert_eq!(t.len(), m.len());
        }

        let mut got: Vec<(u32, u32)> = t.iter().collect();
        let mut expected: Vec<(u32, u32)> = m.into_iter().collect();
        got.sort_unstable();
        expected.sort_unstable();
        assert_eq!(got, expected);
    }
}
