//! Implicit binary max-heap over a fixed array.
//!
//! The children of slot `i` are `2i + 1` and `2i + 2`.

use std::fmt;

use crate::HEAP_CAPACITY;

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
fn left(i: usize) -> usize {
    2 * i + 1
}

/// Fixed-capacity max-heap of `u32`.
///
/// ```
/// use fixed_arena::BinaryHeap;
///
/// let mut heap: BinaryHeap = BinaryHeap::new();
/// heap.build(&[3, 9, 1, 7]);
/// heap.insert(5);
///
/// assert_eq!(heap.remove(), Some(9));
/// assert_eq!(heap.remove(), Some(7));
/// assert_eq!(heap.len(), 3);
/// ```
#[derive(Clone)]
pub struct BinaryHeap<const N: usize = HEAP_CAPACITY> {
    arr: [u32; N],
    count: usize,
}

impl<const N: usize> BinaryHeap<N> {
    pub fn new() -> Self {
        Self {
            arr: [0; N],
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// The maximum, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<u32> {
        self.as_slice().first().copied()
    }

    /// Stored values in heap (level) order.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.arr[..self.count]
    }

    /// Adds `value`, sifting it up past smaller ancestors. Returns `false`
    /// when the heap is full.
    pub fn insert(&mut self, value: u32) -> bool {
        if self.count == N {
            debug_log!(capacity = N, "binary heap full");
            return false;
        }
        let mut i = self.count;
        self.arr[i] = value;
        self.count += 1;

        while i > 0 && self.arr[parent(i)] < self.arr[i] {
            self.arr.swap(parent(i), i);
            i = parent(i);
        }
        true
    }

    /// Replaces the contents with `values` and restores the heap property
    /// bottom-up. Returns `false`, leaving the heap untouched, if `values`
    /// does not fit.
    pub fn build(&mut self, values: &[u32]) -> bool {
        if values.len() > N {
            debug_log!(capacity = N, len = values.len(), "binary heap build refused");
            return false;
        }
        self.arr[..values.len()].copy_from_slice(values);
        self.count = values.len();

        for i in (0..self.count / 2).rev() {
            self.heapify(i);
        }
        true
    }

    /// Pops the maximum. The last value moves to the root and sifts down.
    pub fn remove(&mut self) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        let max = self.arr[0];
        self.count -= 1;
        self.arr[0] = self.arr[self.count];
        self.heapify(0);
        Some(max)
    }

    /// Sifts the value at `i` down until neither child is larger.
    /// Out-of-range `i` is a no-op.
    pub fn heapify(&mut self, mut i: usize) {
        loop {
            let l = left(i);
            let r = l + 1;
            let mut largest = i;
            if l < self.count && self.arr[l] > self.arr[largest] {
                largest = l;
            }
            if r < self.count && self.arr[r] > self.arr[largest] {
                largest = r;
            }
            if largest == i {
                return;
            }
            self.arr.swap(i, largest);
            i = largest;
        }
    }

    /// `true` if every parent is `>=` its children.
    pub fn is_valid(&self) -> bool {
        (1..self.count).all(|i| self.arr[parent(i)] >= self.arr[i])
    }
}

impl<const N: usize> Default for BinaryHeap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for BinaryHeap<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<const N: usize> fmt::Display for BinaryHeap<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.count)?;
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}
