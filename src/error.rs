//! Error types.
//!
//! Hot-path operations report failure through sentinels (`INVALID`, `None`,
//! `false`). These types cover the places that describe *why*.

use thiserror::Error;

/// A fixed-capacity container was asked to hold more than it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("capacity of {capacity} exceeded")]
pub struct Full {
    /// Slot count of the container that refused.
    pub capacity: usize,
}

/// A red-black tree invariant that [`RbTree::check`](crate::RbTree::check)
/// found broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// The root is red.
    #[error("root {index} is red")]
    RedRoot {
        /// Root slot.
        index: u32,
    },

    /// The root has a parent link.
    #[error("root {index} has parent {parent}")]
    RootHasParent {
        /// Root slot.
        index: u32,
        /// Its parent link.
        parent: u32,
    },

    /// Two adjacent red nodes.
    #[error("red node {index} has red child {child}")]
    RedChild {
        /// Red parent slot.
        index: u32,
        /// Red child slot.
        child: u32,
    },

    /// A path to an empty child position has the wrong number of black nodes.
    #[error("black height {found} below node {index}, expected {expected}")]
    BlackHeight {
        /// Deepest node on the offending path.
        index: u32,
        /// Black height of the leftmost path.
        expected: u32,
        /// Black height of this path.
        found: u32,
    },

    /// In-order traversal is not non-decreasing.
    #[error("key {key} at node {index} is out of order")]
    OutOfOrder {
        /// Offending slot.
        index: u32,
        /// Its key.
        key: u32,
    },

    /// A child's parent link does not point back at its parent.
    #[error("node {child} has parent {found}, expected {expected}")]
    BrokenParent {
        /// Child slot.
        child: u32,
        /// Slot that links to `child`.
        expected: u32,
        /// `child`'s parent link.
        found: u32,
    },

    /// A link leads out of bounds or into a free slot.
    #[error("node {index} links to free slot {target}")]
    FreeSlotLinked {
        /// Linking slot, `INVALID` for the root link.
        index: u32,
        /// Target of the link.
        target: u32,
    },

    /// The reachable node count disagrees with the stored length.
    #[error("{reachable} reachable nodes but len is {len}")]
    CountMismatch {
        /// Nodes reached from the root.
        reachable: usize,
        /// Stored length.
        len: usize,
    },
}
