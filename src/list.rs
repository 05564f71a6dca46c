//! Circular doubly-linked list over a fixed slot array.
//!
//! Every slot sits on exactly one of two rings threaded through the same
//! `prev`/`next` fields: the live ring (reachable from `last_index`) or the
//! free ring (reachable from `next_free`). A single-element ring links to
//! itself. A slot holds a value iff its value is not [`INVALID`].

use std::fmt;

use crate::slot::{assert_capacity, Slot, INVALID};
use crate::LIST_CAPACITY;

#[derive(Clone, Copy, Debug)]
struct ListNode {
    value: u32,
    prev: u32,
    next: u32,
}

/// Fixed-capacity list with O(1) allocate/deallocate.
///
/// ```
/// use fixed_arena::{LinkedList, INVALID};
///
/// let mut list: LinkedList = LinkedList::new();
/// let a = list.push(1);
/// let b = list.push(2);
/// list.insert_before(0, a);
///
/// assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 0]);
/// assert_eq!(list.remove(b), Some(2));
/// assert_ne!(a, INVALID);
/// ```
#[derive(Clone)]
pub struct LinkedList<const N: usize = LIST_CAPACITY> {
    arr: [ListNode; N],
    last_index: u32,
    next_free: u32,
    len: usize,
}

impl<const N: usize> LinkedList<N> {
    const CAPACITY_OK: () = assert_capacity(N);

    /// Creates an empty list with every slot on the free ring.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;

        let mut arr = [ListNode {
            value: INVALID,
            prev: INVALID,
            next: INVALID,
        }; N];
        for (i, node) in arr.iter_mut().enumerate() {
            node.prev = ((i + N - 1) % N) as u32;
            node.next = ((i + 1) % N) as u32;
        }

        Self {
            arr,
            last_index: INVALID,
            next_free: if N == 0 { INVALID } else { 0 },
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

    /// Most recently inserted slot still live, or [`INVALID`].
    #[inline]
    pub fn last(&self) -> u32 {
        self.last_index
    }

    fn live(&self, index: u32) -> Option<&ListNode> {
        let node = self.arr.get(index.to_index()?)?;
        node.value.is_valid().then_some(node)
    }

    /// Value in a live slot.
    pub fn get(&self, index: u32) -> Option<u32> {
        self.live(index).map(|n| n.value)
    }

    /// Successor of a live slot on the ring, or [`INVALID`].
    pub fn next(&self, index: u32) -> u32 {
        self.live(index).map_or(INVALID, |n| n.next)
    }

    /// Predecessor of a live slot on the ring, or [`INVALID`].
    pub fn prev(&self, index: u32) -> u32 {
        self.live(index).map_or(INVALID, |n| n.prev)
    }

    /// Number of slots on the free ring.
    pub fn free_len(&self) -> usize {
        let mut count = 0;
        let mut current = self.next_free;
        while current.is_valid() {
            count += 1;
            current = self.arr[current as usize].next;
            if current == self.next_free {
                break;
            }
        }
        count
    }

    /// Pops the head of the free ring, or returns [`INVALID`] when it is
    /// exhausted.
    ///
    /// The slot comes back detached (linked to itself) and valueless; it is
    /// not counted as live until a value is spliced in.
    pub fn allocate(&mut self) -> u32 {
        let result = self.next_free;
        let Some(r) = result.to_index() else {
            debug_log!(capacity = N, "linked list full");
            return INVALID;
        };

        let ListNode { prev, next, .. } = self.arr[r];
        self.next_free = if next == result { INVALID } else { next };
        self.arr[prev as usize].next = next;
        self.arr[next as usize].prev = prev;

        let node = &mut self.arr[r];
        node.prev = result;
        node.next = result;
        result
    }

    /// Pushes a detached slot back onto the free ring.
    ///
    /// Only slots handed out by [`allocate`](Self::allocate) and not yet
    /// given a value are accepted. Live slots (use [`remove`](Self::remove)),
    /// slots already on the free ring, and out-of-range indices are refused
    /// with `false` and leave both rings untouched.
    pub fn deallocate(&mut self, index: u32) -> bool {
        if !self.is_detached(index) {
            debug_log!(index, "linked list deallocate refused");
            return false;
        }
        let i = index as usize;
        match self.next_free.to_index() {
            Some(head) => {
                let after = self.arr[head].next;
                self.arr[i].prev = self.next_free;
                self.arr[i].next = after;
                self.arr[after as usize].prev = index;
                self.arr[head].next = index;
            }
            None => self.next_free = index,
        }
        true
    }

    /// Valueless, linked to itself, and not the sole free slot.
    fn is_detached(&self, index: u32) -> bool {
        match index.to_index().filter(|&i| i < N) {
            Some(i) => {
                let node = &self.arr[i];
                node.value.is_invalid()
                    && node.prev == index
                    && node.next == index
                    && self.next_free != index
            }
            None => false,
        }
    }

    /// Appends after [`last`](Self::last).
    pub fn push(&mut self, value: u32) -> u32 {
        self.insert_after(value, INVALID)
    }

    /// Inserts `value` after `index` (after `last` when `index` is
    /// [`INVALID`]) and makes it the new `last`.
    ///
    /// Returns the new slot, or [`INVALID`] if the list is full, `value` is
    /// [`INVALID`], or `index` is not live.
    pub fn insert_after(&mut self, value: u32, index: u32) -> u32 {
        self.insert(value, index, true)
    }

    /// Inserts `value` before `index` (before `last` when `index` is
    /// [`INVALID`]) and makes it the new `last`.
    pub fn insert_before(&mut self, value: u32, index: u32) -> u32 {
        self.insert(value, index, false)
    }

    fn insert(&mut self, value: u32, index: u32, after: bool) -> u32 {
        let anchor = if index.is_invalid() { self.last_index } else { index };
        if value.is_invalid() || (anchor.is_valid() && self.live(anchor).is_none()) {
            return INVALID;
        }

        let new_index = self.allocate();
        let Some(n) = new_index.to_index() else {
            return INVALID;
        };

        if let Some(a) = anchor.to_index() {
            if after {
                let next = self.arr[a].next;
                self.arr[n].prev = anchor;
                self.arr[n].next = next;
                self.arr[next as usize].prev = new_index;
                self.arr[a].next = new_index;
            } else {
                let prev = self.arr[a].prev;
                self.arr[n].next = anchor;
                self.arr[n].prev = prev;
                self.arr[prev as usize].next = new_index;
                self.arr[a].prev = new_index;
            }
        }
        // With no anchor the slot stays linked to itself: a one-element ring.

        self.arr[n].value = value;
        self.last_index = new_index;
        self.len += 1;
        new_index
    }

    /// Unlinks a live slot and returns it to the free ring.
    ///
    /// If it was `last`, `last` moves to its predecessor.
    pub fn remove(&mut self, index: u32) -> Option<u32> {
        let ListNode { value, prev, next } = *self.live(index)?;

        if self.last_index == index {
            self.last_index = if prev == index { INVALID } else { prev };
        }
        self.arr[prev as usize].next = next;
        self.arr[next as usize].prev = prev;
        self.arr[index as usize] = ListNode {
            value: INVALID,
            prev: index,
            next: index,
        };
        self.len -= 1;
        let freed = self.deallocate(index);
        debug_assert!(freed, "unlinked slot {index} must be detached");
        Some(value)
    }

    /// Live values, starting after `last` and ending with it.
    pub fn iter(&self) -> Iter<'_, N> {
        let start = self.next(self.last_index);
        Iter {
            list: self,
            current: start,
            remaining: self.len,
        }
    }
}

impl<const N: usize> Default for LinkedList<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for LinkedList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Slot dump: `index : (value prev next)` per slot, then the free head.
impl<const N: usize> fmt::Display for LinkedList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.arr.iter().enumerate() {
            writeln!(f, "{i} : ({} {} {})", node.value, node.prev, node.next)?;
        }
        writeln!(f, "next free {}", self.next_free)
    }
}

pub struct Iter<'a, const N: usize> {
    list: &'a LinkedList<N>,
    current: u32,
    remaining: usize,
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.live(self.current)?;
        self.remaining -= 1;
        self.current = node.next;
        Some(node.value)
    }
}
