//! Index-based red-black tree.
//!
//! Nodes live in a fixed `[Node; N]` array and refer to each other by slot
//! index. A slot is taken iff its key is not [`INVALID`], so `u32::MAX` can
//! never be stored as a key.
//!
//! Invariants after every public mutation:
//! 1. a non-empty tree has a black root with no parent,
//! 2. no red node has a red child,
//! 3. every path from the root to an empty child position crosses the same
//!    number of black nodes,
//! 4. in-order traversal is non-decreasing (ties descend right),
//! 5. `parent` links are the exact inverse of `left`/`right` links.
//!
//! [`RbTree::check`] verifies all five from scratch.

use std::fmt;

use crate::error::Violation;
use crate::slot::{assert_capacity, Slot, INVALID};
use crate::RBTREE_CAPACITY;

// =============================================================================
// Nodes
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    key: u32,
    value: u32,
    left: u32,
    right: u32,
    parent: u32,
    color: Color,
}

impl Node {
    const FREE: Node = Node {
        key: INVALID,
        value: INVALID,
        left: INVALID,
        right: INVALID,
        parent: INVALID,
        color: Color::Black,
    };

    #[inline]
    fn is_taken(&self) -> bool {
        self.key != INVALID
    }
}

// =============================================================================
// Rebalancing cases
// =============================================================================

/// Rebalancing step taken by the insertion/deletion fixups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fixup {
    /// Red parent, red uncle: recolor and continue at the grandparent.
    InsertRecolor,
    /// Zig-zag shape straightened by rotating the parent.
    InsertInner,
    /// Straight shape: recolor and rotate the grandparent.
    InsertOuter,
    /// Red sibling rotated above the parent.
    DeleteRedSibling,
    /// Black sibling with black children under a black parent: push up.
    DeleteBlackSibling,
    /// Black sibling with black children under a red parent: absorb.
    DeleteRedParent,
    /// Near nephew red, far nephew black: rotate the sibling.
    DeleteNearNephew,
    /// Far nephew red: rotate the parent, done.
    DeleteFarNephew,
}

impl Fixup {
    #[cfg(test)]
    pub(crate) const COUNT: usize = 8;
}

#[cfg(test)]
thread_local! {
    static FIXUP_HITS: std::cell::Cell<[u32; Fixup::COUNT]> =
        const { std::cell::Cell::new([0; Fixup::COUNT]) };
}

/// Returns and resets how often each [`Fixup`] case ran on this thread.
#[cfg(test)]
pub(crate) fn take_fixup_hits() -> [u32; Fixup::COUNT] {
    FIXUP_HITS.with(|hits| hits.replace([0; Fixup::COUNT]))
}

#[inline]
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn record(case: Fixup, index: u32) {
    trace_log!(?case, index, "red-black fixup");
    #[cfg(test)]
    FIXUP_HITS.with(|hits| {
        let mut counts = hits.get();
        counts[case as usize] += 1;
        hits.set(counts);
    });
}

// =============================================================================
// RbTree
// =============================================================================

/// Fixed-capacity ordered map from `u32` keys to `u32` values.
///
/// Full trees refuse new keys: [`set`](Self::set) returns `false` and leaves
/// the tree untouched. Updating an existing key always succeeds.
#[derive(Clone)]
pub struct RbTree<const N: usize = RBTREE_CAPACITY> {
    nodes: [Node; N],
    root: u32,
    len: usize,
}

impl<const N: usize> RbTree<N> {
    const CAPACITY_OK: () = assert_capacity(N);

    /// Creates an empty tree.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            nodes: [Node::FREE; N],
            root: INVALID,
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

    /// Frees every slot.
    pub fn clear(&mut self) {
        self.nodes = [Node::FREE; N];
        self.root = INVALID;
        self.len = 0;
    }

    // -------------------------------------------------------------------------
    // Link accessors. An INVALID index reads as an empty, black position.
    // -------------------------------------------------------------------------

    #[inline]
    fn node(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    #[inline]
    fn node_mut(&mut self, index: u32) -> &mut Node {
        &mut self.nodes[index as usize]
    }

    #[inline]
    fn left(&self, index: u32) -> u32 {
        self.node(index).left
    }

    #[inline]
    fn right(&self, index: u32) -> u32 {
        self.node(index).right
    }

    #[inline]
    fn parent(&self, index: u32) -> u32 {
        self.node(index).parent
    }

    #[inline]
    fn color(&self, index: u32) -> Color {
        match index.to_index() {
            Some(i) => self.nodes[i].color,
            None => Color::Black,
        }
    }

    #[inline]
    fn is_red(&self, index: u32) -> bool {
        self.color(index) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, index: u32, color: Color) {
        debug_assert!(index.is_valid(), "recoloring an empty position");
        self.node_mut(index).color = color;
    }

    /// First free slot, or INVALID.
    // TODO: thread free slots into a chain like `LinkedList` to make this O(1).
    fn allocate(&self) -> u32 {
        self.nodes
            .iter()
            .position(|n| !n.is_taken())
            .map_or(INVALID, |i| i as u32)
    }

    fn find(&self, key: u32) -> u32 {
        if key.is_invalid() {
            return INVALID;
        }
        let mut current = self.root;
        while let Some(i) = current.to_index() {
            let node = &self.nodes[i];
            if key == node.key {
                return current;
            }
            current = if key < node.key { node.left } else { node.right };
        }
        INVALID
    }

    /// Rightmost node of the subtree rooted at `index`.
    fn max_below(&self, mut index: u32) -> u32 {
        while self.right(index).is_valid() {
            index = self.right(index);
        }
        index
    }

    fn min_below(&self, mut index: u32) -> u32 {
        while self.left(index).is_valid() {
            index = self.left(index);
        }
        index
    }

    // -------------------------------------------------------------------------
    // Rotations
    // -------------------------------------------------------------------------

    /// Points `parent`'s link (or the root) that referenced `old` at `new`,
    /// and `new`'s parent link at `parent`.
    fn replace_child(&mut self, parent: u32, old: u32, new: u32) {
        match parent.to_index() {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == old {
                    node.left = new;
                } else {
                    debug_assert_eq!(node.right, old, "parent does not link to child");
                    node.right = new;
                }
            }
        }
        if new.is_valid() {
            self.node_mut(new).parent = parent;
        }
    }

    /// `x`'s right child takes its place; `x` becomes that child's left child.
    fn rotate_left(&mut self, x: u32) {
        let y = self.right(x);
        debug_assert!(y.is_valid(), "rotate_left without a right child");
        let inner = self.left(y);

        self.node_mut(x).right = inner;
        if inner.is_valid() {
            self.node_mut(inner).parent = x;
        }

        let parent = self.parent(x);
        self.replace_child(parent, x, y);

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, x: u32) {
        let y = self.left(x);
        debug_assert!(y.is_valid(), "rotate_right without a left child");
        let inner = self.right(y);

        self.node_mut(x).left = inner;
        if inner.is_valid() {
            self.node_mut(inner).parent = x;
        }

        let parent = self.parent(x);
        self.replace_child(parent, x, y);

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
    }

    /// Rotates `x` down toward its left side when `left` is set.
    #[inline]
    fn rotate_down(&mut self, x: u32, left: bool) {
        if left {
            self.rotate_left(x);
        } else {
            self.rotate_right(x);
        }
    }
}

impl<const N: usize> RbTree<N> {
    /// Returns the value stored under `key`.
    pub fn get(&self, key: u32) -> Option<u32> {
        self.find(key).to_index().map(|i| self.nodes[i].value)
    }

    pub fn contains(&self, key: u32) -> bool {
        self.find(key).is_valid()
    }

    /// Inserts `key` or overwrites its value.
    ///
    /// Returns `false` when the key is [`INVALID`] or a new node is needed
    /// and every slot is taken.
    pub fn set(&mut self, key: u32, value: u32) -> bool {
        self.insert(key, value, false)
    }

    /// Always inserts a fresh node, even if `key` is already present.
    ///
    /// This turns the tree into a multiset. [`get`](Self::get) and
    /// [`remove`](Self::remove) then act on an arbitrary one of the
    /// duplicates.
    pub fn insert_duplicate(&mut self, key: u32, value: u32) -> bool {
        self.insert(key, value, true)
    }

    fn insert(&mut self, key: u32, value: u32, allow_duplicate: bool) -> bool {
        if key.is_invalid() {
            return false;
        }

        let mut parent = INVALID;
        let mut go_left = false;
        let mut current = self.root;
        while let Some(i) = current.to_index() {
            let node = &mut self.nodes[i];
            if !allow_duplicate && node.key == key {
                node.value = value;
                return true;
            }
            parent = current;
            go_left = key < node.key;
            current = if go_left { node.left } else { node.right };
        }

        let index = self.allocate();
        if index.is_invalid() {
            debug_log!(capacity = N, key, "red-black tree full");
            return false;
        }

        *self.node_mut(index) = Node {
            key,
            value,
            left: INVALID,
            right: INVALID,
            parent,
            color: Color::Red,
        };
        match parent.to_index() {
            None => self.root = index,
            Some(p) if go_left => self.nodes[p].left = index,
            Some(p) => self.nodes[p].right = index,
        }
        self.len += 1;

        self.insert_fixup(index);
        true
    }

    fn insert_fixup(&mut self, mut x: u32) {
        loop {
            let mut p = self.parent(x);
            if p.is_invalid() {
                self.set_color(x, Color::Black);
                return;
            }
            if !self.is_red(p) {
                return;
            }

            // A red parent is never the root.
            let g = self.parent(p);
            debug_assert!(g.is_valid(), "red root");
            let parent_is_left = self.left(g) == p;
            let uncle = if parent_is_left {
                self.right(g)
            } else {
                self.left(g)
            };

            if self.is_red(uncle) {
                record(Fixup::InsertRecolor, g);
                self.set_color(p, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(g, Color::Red);
                x = g;
                continue;
            }

            let inner = if parent_is_left {
                self.right(p) == x
            } else {
                self.left(p) == x
            };
            if inner {
                record(Fixup::InsertInner, x);
                self.rotate_down(p, parent_is_left);
                p = x;
            }

            record(Fixup::InsertOuter, g);
            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            self.rotate_down(g, !parent_is_left);
            return;
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: u32) -> Option<u32> {
        let mut z = self.find(key);
        if z.is_invalid() {
            return None;
        }
        let removed = self.node(z).value;

        // Two children: take over the in-order predecessor's entry and
        // delete the predecessor, which has no right child.
        if self.left(z).is_valid() && self.right(z).is_valid() {
            let pred = self.max_below(self.left(z));
            let Node {
                key: pred_key,
                value: pred_value,
                ..
            } = *self.node(pred);
            let node = self.node_mut(z);
            node.key = pred_key;
            node.value = pred_value;
            z = pred;
        }

        let child = if self.left(z).is_valid() {
            self.left(z)
        } else {
            self.right(z)
        };

        // A black node with a single child has a red child. A black leaf
        // leaves a double-black hole, fixed while it is still linked.
        if !self.is_red(z) {
            if self.is_red(child) {
                self.set_color(child, Color::Black);
            } else {
                self.remove_fixup(z);
            }
        }

        let parent = self.parent(z);
        self.replace_child(parent, z, child);
        *self.node_mut(z) = Node::FREE;
        self.len -= 1;

        if let Some(r) = self.root.to_index() {
            self.nodes[r].color = Color::Black;
        }
        Some(removed)
    }

    fn remove_fixup(&mut self, mut x: u32) {
        while x != self.root && !self.is_red(x) {
            let p = self.parent(x);
            let x_is_left = self.left(p) == x;
            let sibling = |t: &Self| if x_is_left { t.right(p) } else { t.left(p) };

            let mut s = sibling(&*self);
            debug_assert!(s.is_valid(), "double-black node without a sibling");

            if self.is_red(s) {
                record(Fixup::DeleteRedSibling, s);
                self.set_color(s, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate_down(p, x_is_left);
                s = sibling(&*self);
            }

            let (near, far) = if x_is_left {
                (self.left(s), self.right(s))
            } else {
                (self.right(s), self.left(s))
            };

            if !self.is_red(near) && !self.is_red(far) {
                if self.is_red(p) {
                    record(Fixup::DeleteRedParent, p);
                } else {
                    record(Fixup::DeleteBlackSibling, p);
                }
                self.set_color(s, Color::Red);
                x = p;
                continue;
            }

            if !self.is_red(far) {
                record(Fixup::DeleteNearNephew, near);
                self.set_color(near, Color::Black);
                self.set_color(s, Color::Red);
                self.rotate_down(s, !x_is_left);
                s = sibling(&*self);
            }

            record(Fixup::DeleteFarNephew, s);
            let far = if x_is_left { self.right(s) } else { self.left(s) };
            self.set_color(s, self.color(p));
            self.set_color(p, Color::Black);
            self.set_color(far, Color::Black);
            self.rotate_down(p, x_is_left);
            x = self.root;
        }
        self.set_color(x, Color::Black);
    }

    /// Smallest key and its value.
    pub fn first(&self) -> Option<(u32, u32)> {
        self.root.to_index()?;
        let n = self.node(self.min_below(self.root));
        Some((n.key, n.value))
    }

    /// Largest key and its value.
    pub fn last(&self) -> Option<(u32, u32)> {
        self.root.to_index()?;
        let n = self.node(self.max_below(self.root));
        Some((n.key, n.value))
    }

    /// Number of nodes on the longest root-to-leaf path. O(n log n): each
    /// leaf climbs its parent links.
    pub fn height(&self) -> usize {
        let mut best = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.is_taken() || node.left.is_valid() || node.right.is_valid() {
                continue;
            }
            let mut depth = 0;
            let mut current = i as u32;
            while current.is_valid() {
                depth += 1;
                current = self.parent(current);
            }
            best = best.max(depth);
        }
        best
    }

    /// In-order successor of `index` along the parent links, or INVALID.
    fn successor(&self, index: u32) -> u32 {
        let right = self.right(index);
        if right.is_valid() {
            return self.min_below(right);
        }
        let mut child = index;
        let mut parent = self.parent(index);
        while parent.is_valid() && self.right(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// In-order `(key, value)` pairs. Walks the parent links and allocates
    /// nothing.
    pub fn iter(&self) -> Iter<'_, N> {
        let next = if self.root.is_valid() {
            self.min_below(self.root)
        } else {
            INVALID
        };
        Iter { tree: self, next }
    }
}

// =============================================================================
// Invariant checks
// =============================================================================

impl<const N: usize> RbTree<N> {
    /// Checks the color invariants: black root, no red-red pair, uniform
    /// black height.
    pub fn validate(&self) -> bool {
        self.color_violation().is_none()
    }

    /// Verifies every tree invariant, reporting the first one broken.
    pub fn check(&self) -> Result<(), Violation> {
        self.check_links()?;
        if let Some(violation) = self.color_violation() {
            return Err(violation);
        }
        self.check_order()
    }

    fn check_links(&self) -> Result<(), Violation> {
        let linked = |index: u32, target: u32| -> Result<(), Violation> {
            match target.to_index() {
                Some(t) if t < N && self.nodes[t].is_taken() => Ok(()),
                _ => Err(Violation::FreeSlotLinked { index, target }),
            }
        };

        if self.root.is_invalid() {
            return match self.len {
                0 => Ok(()),
                len => Err(Violation::CountMismatch { reachable: 0, len }),
            };
        }
        linked(INVALID, self.root)?;
        let root_parent = self.parent(self.root);
        if root_parent.is_valid() {
            return Err(Violation::RootHasParent {
                index: self.root,
                parent: root_parent,
            });
        }

        let mut reachable = 0usize;
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            reachable += 1;
            if reachable > N {
                // Only a cycle can reach more nodes than there are slots.
                return Err(Violation::CountMismatch {
                    reachable,
                    len: self.len,
                });
            }
            let node = self.node(index);
            for child in [node.left, node.right] {
                if child.is_invalid() {
                    continue;
                }
                linked(index, child)?;
                let found = self.parent(child);
                if found != index {
                    return Err(Violation::BrokenParent {
                        child,
                        expected: index,
                        found,
                    });
                }
                stack.push(child);
            }
        }

        if reachable != self.len {
            return Err(Violation::CountMismatch {
                reachable,
                len: self.len,
            });
        }
        Ok(())
    }

    fn color_violation(&self) -> Option<Violation> {
        if self.root.is_invalid() {
            return None;
        }
        if self.is_red(self.root) {
            return Some(Violation::RedRoot { index: self.root });
        }

        // Target black height from the leftmost path.
        let mut expected = 0u32;
        let mut current = self.root;
        while current.is_valid() {
            if !self.is_red(current) {
                expected += 1;
            }
            current = self.left(current);
        }

        let mut stack = vec![(self.root, 1u32)];
        while let Some((index, blacks)) = stack.pop() {
            let node = self.node(index);
            let children = [node.left, node.right];
            if node.color == Color::Red {
                if let Some(&child) = children.iter().find(|&&c| self.is_red(c)) {
                    return Some(Violation::RedChild { index, child });
                }
            }
            for child in children {
                if child.is_valid() {
                    stack.push((child, blacks + u32::from(!self.is_red(child))));
                } else if blacks != expected {
                    return Some(Violation::BlackHeight {
                        index,
                        expected,
                        found: blacks,
                    });
                }
            }
        }
        None
    }

    fn check_order(&self) -> Result<(), Violation> {
        let mut prev: Option<u32> = None;
        let mut iter = self.iter();
        while let Some(index) = iter.next_index() {
            let key = self.node(index).key;
            if prev.is_some_and(|p| p > key) {
                return Err(Violation::OutOfOrder { index, key });
            }
            prev = Some(key);
        }
        Ok(())
    }
}

impl<const N: usize> Default for RbTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for RbTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Slot dump: one line per taken slot.
impl<const N: usize> fmt::Display for RbTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let link = |i: u32| match i.to_index() {
            Some(i) => i.to_string(),
            None => "-".to_string(),
        };
        writeln!(f, "root {} len {}", link(self.root), self.len)?;
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.is_taken() {
                continue;
            }
            writeln!(
                f,
                "{i:03} : {} -> {} (l {} r {} p {}) {}",
                node.key,
                node.value,
                link(node.left),
                link(node.right),
                link(node.parent),
                match node.color {
                    Color::Red => 'R',
                    Color::Black => 'B',
                },
            )?;
        }
        Ok(())
    }
}

/// In-order iterator over an [`RbTree`].
pub struct Iter<'a, const N: usize> {
    tree: &'a RbTree<N>,
    next: u32,
}

impl<'a, const N: usize> Iter<'a, N> {
    fn next_index(&mut self) -> Option<u32> {
        let index = self.next;
        if index.is_invalid() {
            return None;
        }
        self.next = self.tree.successor(index);
        Some(index)
    }
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node(self.next_index()?);
        Some((node.key, node.value))
    }
}


#[cfg(test)]
mod proptests;
