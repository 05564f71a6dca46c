//! Slot indices and the "no slot" sentinel.
//!
//! Links between nodes are plain `u32` indices into a container's backing
//! array. The all-bits-set value is reserved: as an index it means "no node",
//! as a key or value it marks a free slot.

/// Reserved index/key/value meaning "absent".
pub const INVALID: u32 = u32::MAX;

/// Sentinel helpers for `u32` slot indices.
///
/// ```
/// use fixed_arena::{Slot, INVALID};
///
/// assert!(INVALID.is_invalid());
/// assert_eq!(3u32.to_index(), Some(3));
/// assert_eq!(INVALID.to_index(), None);
/// ```
pub trait Slot: Copy {
    /// Returns `true` for the sentinel.
    fn is_invalid(self) -> bool;

    /// Returns `true` for anything but the sentinel.
    #[inline]
    fn is_valid(self) -> bool {
        !self.is_invalid()
    }

    /// Converts to an array index, or `None` for the sentinel.
    fn to_index(self) -> Option<usize>;
}

impl Slot for u32 {
    #[inline]
    fn is_invalid(self) -> bool {
        self == INVALID
    }

    #[inline]
    fn to_index(self) -> Option<usize> {
        (self != INVALID).then_some(self as usize)
    }
}

/// Compile-time guard shared by the containers: `N` slots must be
/// addressable without colliding with [`INVALID`].
pub(crate) const fn assert_capacity(n: usize) {
    assert!(n < INVALID as usize, "capacity collides with the INVALID sentinel");
}
