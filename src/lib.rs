//! # fixed-arena
//!
//! Fixed-capacity containers built on the "arena + index" pattern: every
//! node lives in a preallocated array and links are `u32` slot indices, with
//! [`INVALID`] (`u32::MAX`) meaning "no node".
//!
//! - [`RbTree`]: ordered map with red-black rebalancing
//! - [`LinkedList`]: circular doubly-linked list with an embedded free ring
//! - [`Hashtable`]: FNV-1 hashed, linear-probed map
//! - [`BinaryHeap`]: implicit max-heap
//! - [`Dataset`] and [`sorts`]: bounded integer sequences and in-place sorters
//!
//! Nothing grows. Operations that would exceed capacity are refused and
//! report it through a `false`/`INVALID`/`None` return.
//!
//! ## Example
//!
//! ```rust
//! use fixed_arena::RbTree;
//!
//! let mut tree: RbTree = RbTree::new();
//! tree.set(5, 50);
//! tree.set(3, 30);
//! tree.set(8, 80);
//!
//! assert_eq!(tree.get(3), Some(30));
//! assert_eq!(tree.remove(5), Some(50));
//! assert_eq!(tree.get(5), None);
//! assert!(tree.validate());
//! ```

#![forbid(unsafe_code)]

#[macro_use]
mod trace;

pub mod dataset;
pub mod error;
pub mod hash;
pub mod hashtable;
pub mod heap;
pub mod list;
pub mod rbtree;
pub mod slot;
pub mod sorts;

pub use dataset::Dataset;
pub use error::{Full, Violation};
pub use hash::hash_fnv1;
pub use hashtable::Hashtable;
pub use heap::BinaryHeap;
pub use list::LinkedList;
pub use rbtree::RbTree;
pub use slot::{Slot, INVALID};

// =============================================================================
// Configuration
// =============================================================================

/// Default slot count of [`LinkedList`].
pub const LIST_CAPACITY: usize = 7;
/// Default slot count of [`Hashtable`].
pub const HASHTABLE_CAPACITY: usize = 256;
/// Default slot count of [`RbTree`].
pub const RBTREE_CAPACITY: usize = 256;
/// Default slot count of [`BinaryHeap`].
pub const HEAP_CAPACITY: usize = 1024;
/// Default item count of [`Dataset`].
pub const DATASET_CAPACITY: usize = 256;
