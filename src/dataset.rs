//! Bounded integer sequences, the input the [`sorts`](crate::sorts) work on.

use std::fmt;

use rand::Rng;

use crate::error::Full;
use crate::DATASET_CAPACITY;

/// Up to `N` integers stored inline.
///
/// ```
/// use fixed_arena::{sorts, Dataset};
///
/// let mut data: Dataset = Dataset::try_from(&[3, 1, 2][..]).unwrap();
/// sorts::bubble(&mut data);
/// assert_eq!(data.as_slice(), &[1, 2, 3]);
/// assert!(data.validate());
/// ```
#[derive(Clone)]
pub struct Dataset<const N: usize = DATASET_CAPACITY> {
    items: [u32; N],
    count: usize,
}

impl<const N: usize> Dataset<N> {
    pub fn new() -> Self {
        Self {
            items: [0; N],
            count: 0,
        }
    }

    /// Random values with a random length in `0..N`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let len = if N == 0 { 0 } else { rng.gen_range(0..N) };
        Self::random_with_len(rng, len)
    }

    /// `len` random values, clamped to `N`.
    pub fn random_with_len<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let mut data = Self::new();
        data.count = len.min(N);
        rng.fill(&mut data.items[..data.count]);
        data
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

    pub fn push(&mut self, value: u32) -> Result<(), Full> {
        if self.count == N {
            debug_log!(capacity = N, "dataset overflow");
            return Err(Full { capacity: N });
        }
        self.items[self.count] = value;
        self.count += 1;
        Ok(())
    }

    /// # Panics
    ///
    /// If `a` or `b` is not below [`len`](Self::len).
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.as_mut_slice().swap(a, b);
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.items[..self.count]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.items[..self.count]
    }

    /// `true` if the values are in non-decreasing order.
    pub fn validate(&self) -> bool {
        self.as_slice().windows(2).all(|w| w[0] <= w[1])
    }
}

impl<const N: usize> Default for Dataset<N> {
    fn default() -> Self {
        Self::new()
    }
}

// Slots past `count` are scratch and do not take part in equality.
impl<const N: usize> PartialEq for Dataset<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> Eq for Dataset<N> {}

impl<const N: usize> TryFrom<&[u32]> for Dataset<N> {
    type Error = Full;

    fn try_from(values: &[u32]) -> Result<Self, Full> {
        if values.len() > N {
            debug_log!(capacity = N, len = values.len(), "dataset overflow");
            return Err(Full { capacity: N });
        }
        let mut data = Self::new();
        data.items[..values.len()].copy_from_slice(values);
        data.count = values.len();
        Ok(data)
    }
}

impl<const N: usize> fmt::Debug for Dataset<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<const N: usize> fmt::Display for Dataset<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {{", self.count)?;
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("}")
    }
}
