// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The broad-phase index: item storage, ternary tree build, and queries.

use alloc::vec::Vec;
use core::fmt;

use thicket_geom::{BoundingBox, Vec3};

use crate::queue::FastQueue;

/// Minimum longest-axis extent a node needs before it may be subdivided.
///
/// Prevents infinite subdivision of clusters whose padded boxes are all
/// (near-)coincident.
const MIN_SPLIT_EXTENT: f64 = 1e-3;

/// Error produced by [`BoxSpace::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpaceError {
    /// An item's refreshed box, after margin padding, had `min > max` on some
    /// axis. The index is left stale; queries return nothing until a
    /// successful rebuild.
    InvalidBounds {
        /// Position of the offending item in the current item array.
        index: usize,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { index } => {
                write!(f, "item {index} produced an invalid bounding box (min > max)")
            }
        }
    }
}

impl core::error::Error for SpaceError {}

struct SpaceItem<T> {
    payload: T,
    bb: BoundingBox,
}

#[derive(Copy, Clone, Debug)]
enum NodeKind {
    Leaf,
    Internal {
        /// Index of the first of three contiguous children in the node array.
        first_child: usize,
    },
}

/// A tree node owning the half-open item range `[head, tail)`.
///
/// For an internal node the range is the union of its children's ranges, so
/// emitting `head..tail` covers the whole subtree without descending.
#[derive(Clone, Debug)]
struct Node {
    head: usize,
    tail: usize,
    bb: BoundingBox,
    kind: NodeKind,
}

/// A broad-phase spatial index over `(payload, AABB)` items.
///
/// Items live in one contiguous, reorderable array; their array position (not
/// identity) determines tree membership, and the build physically swaps items
/// while partitioning. No external index into the item array survives an
/// [`BoxSpace::update`] call.
///
/// The tree is rebuilt from scratch on every `update`: the structure has only
/// two states, *built* and *stale*. Items appended with
/// [`BoxSpace::add_item`] stay outside the hierarchy (and outside every query
/// result) until the next rebuild.
pub struct BoxSpace<T> {
    items: Vec<SpaceItem<T>>,
    nodes: Vec<Node>,
    margin: f64,
    min_items_per_node: usize,
}

impl<T> fmt::Debug for BoxSpace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxSpace")
            .field("items", &self.items.len())
            .field("nodes", &self.nodes.len())
            .field("margin", &self.margin)
            .field("min_items_per_node", &self.min_items_per_node)
            .finish_non_exhaustive()
    }
}

impl<T> BoxSpace<T> {
    /// Create an empty space.
    ///
    /// `margin` symmetrically pads every item box during
    /// [`BoxSpace::update`], anticipating motion between rebuilds.
    /// `min_items_per_node` is the item count a node must exceed before it is
    /// considered for subdivision (clamped to at least 1).
    pub fn new(margin: f64, min_items_per_node: usize) -> Self {
        Self {
            items: Vec::new(),
            nodes: Vec::new(),
            margin,
            min_items_per_node: min_items_per_node.max(1),
        }
    }

    /// The padding applied to every item box on rebuild.
    pub const fn margin(&self) -> f64 {
        self.margin
    }

    /// Number of stored items, including ones not yet indexed.
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the space holds no items.
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append one item without touching the tree.
    ///
    /// The item is excluded from every query until the next
    /// [`BoxSpace::update`].
    pub fn add_item(&mut self, payload: T) {
        self.items.push(SpaceItem {
            payload,
            bb: BoundingBox::EMPTY,
        });
    }

    /// Replace the whole item set, leaving the structure stale.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        self.nodes.clear();
        self.items.extend(items.into_iter().map(|payload| SpaceItem {
            payload,
            bb: BoundingBox::EMPTY,
        }));
    }

    /// Drop all items and nodes.
    pub fn clear(&mut self) {
        self.items.clear();
        self.nodes.clear();
    }

    /// Rebuild the hierarchy.
    ///
    /// `refresh` must write each item's current world-space box; the box is
    /// then padded by the margin. A padded box with `min > max` on any axis
    /// fails fast with [`SpaceError::InvalidBounds`] instead of propagating
    /// through the overlap math.
    pub fn update(
        &mut self,
        mut refresh: impl FnMut(&T, &mut BoundingBox),
    ) -> Result<(), SpaceError> {
        self.nodes.clear();
        for (index, item) in self.items.iter_mut().enumerate() {
            refresh(&item.payload, &mut item.bb);
            item.bb = item.bb.inflated(self.margin);
            if !item.bb.is_valid() {
                return Err(SpaceError::InvalidBounds { index });
            }
        }
        if self.items.is_empty() {
            return Ok(());
        }

        let mut root_bb = BoundingBox::EMPTY;
        for item in &self.items {
            root_bb.add_box(&item.bb);
        }
        self.nodes.push(Node {
            head: 0,
            tail: self.items.len(),
            bb: root_bb,
            kind: NodeKind::Leaf,
        });

        // Children are always appended after their parent, so a forward scan
        // visits every node without an explicit work stack.
        let mut next = 0;
        while next < self.nodes.len() {
            self.split_node(next);
            next += 1;
        }
        Ok(())
    }

    /// Subdivide one node in place if it qualifies.
    fn split_node(&mut self, node: usize) {
        let head = self.nodes[node].head;
        let tail = self.nodes[node].tail;
        let count = tail - head;
        if count <= self.min_items_per_node {
            return;
        }
        let (axis, extent) = self.nodes[node].bb.longest_axis();
        if extent <= MIN_SPLIT_EXTENT {
            return;
        }
        let centre = self.nodes[node].bb.center().component(axis);

        // Ternary partition in two Hoare passes over the node's slice: first
        // split off the items entirely at or below the centre, then split the
        // straddlers from the items entirely above it.
        let slice = &mut self.items[head..tail];
        let left_len = partition(slice, |bb| bb.max.component(axis) <= centre);
        let straddle_len = partition(&mut slice[left_len..], |bb| {
            !(bb.min.component(axis) > centre)
        });
        let mid1 = head + left_len;
        let mid2 = mid1 + straddle_len;

        // All items in one bucket: subdividing would recreate this node
        // verbatim and the tree would never terminate.
        if mid1 - head == count || mid2 - mid1 == count || tail - mid2 == count {
            return;
        }

        let first_child = self.nodes.len();
        for (h, t) in [(head, mid1), (mid1, mid2), (mid2, tail)] {
            // Children get tight union boxes; the margin is not applied again.
            let mut bb = BoundingBox::EMPTY;
            for item in &self.items[h..t] {
                bb.add_box(&item.bb);
            }
            self.nodes.push(Node {
                head: h,
                tail: t,
                bb,
                kind: NodeKind::Leaf,
            });
        }
        self.nodes[node].kind = NodeKind::Internal { first_child };
    }

    /// Visit every unordered pair of distinct items whose padded boxes
    /// overlap, exactly once, in no particular order.
    ///
    /// Returning `false` from `visit` aborts the remainder of the query.
    pub fn overlap_self(&self, mut visit: impl FnMut(&T, &T) -> bool) {
        if self.nodes.is_empty() {
            return;
        }
        let mut frontier = FastQueue::with_capacity(64);
        frontier.enqueue((0_usize, 0_usize));
        while !frontier.is_empty() {
            let (a, b) = frontier.dequeue();
            if a != b {
                if !self.cross_step(&mut frontier, a, b, &mut visit) {
                    return;
                }
                continue;
            }
            match self.nodes[a].kind {
                NodeKind::Leaf => {
                    let head = self.nodes[a].head;
                    let tail = self.nodes[a].tail;
                    for i in head..tail {
                        for j in (i + 1)..tail {
                            if self.items[i].bb.overlaps(&self.items[j].bb)
                                && !visit(&self.items[i].payload, &self.items[j].payload)
                            {
                                return;
                            }
                        }
                    }
                }
                NodeKind::Internal { first_child } => {
                    for k in 0..3 {
                        frontier.enqueue((first_child + k, first_child + k));
                    }
                    // Only adjacent sibling pairs are cross-tested. The outer
                    // children sit on opposite sides of the split plane (left
                    // maxima at or below the centre, right minima above it),
                    // so the strict overlap test could never pass for them.
                    for k in 0..2 {
                        let l = first_child + k;
                        let r = first_child + k + 1;
                        if self.nodes[l].bb.overlaps(&self.nodes[r].bb) {
                            frontier.enqueue((l, r));
                        }
                    }
                }
            }
        }
    }

    /// One expansion step for a cross pair of distinct nodes in this tree.
    /// Returns `false` when the visitor asked to stop.
    fn cross_step(
        &self,
        frontier: &mut FastQueue<(usize, usize)>,
        a: usize,
        b: usize,
        visit: &mut impl FnMut(&T, &T) -> bool,
    ) -> bool {
        match (self.nodes[a].kind, self.nodes[b].kind) {
            (NodeKind::Leaf, NodeKind::Leaf) => {
                for i in self.nodes[a].head..self.nodes[a].tail {
                    for j in self.nodes[b].head..self.nodes[b].tail {
                        if self.items[i].bb.overlaps(&self.items[j].bb)
                            && !visit(&self.items[i].payload, &self.items[j].payload)
                        {
                            return false;
                        }
                    }
                }
            }
            (NodeKind::Internal { first_child }, _) => {
                for k in 0..3 {
                    if self.nodes[first_child + k].bb.overlaps(&self.nodes[b].bb) {
                        frontier.enqueue((first_child + k, b));
                    }
                }
            }
            (NodeKind::Leaf, NodeKind::Internal { first_child }) => {
                for k in 0..3 {
                    if self.nodes[a].bb.overlaps(&self.nodes[first_child + k].bb) {
                        frontier.enqueue((a, first_child + k));
                    }
                }
            }
        }
        true
    }

    /// Visit every overlapping `(item of self, item of other)` pair across
    /// two independently built spaces, exactly once.
    pub fn overlap_with<U>(&self, other: &BoxSpace<U>, mut visit: impl FnMut(&T, &U) -> bool) {
        if self.nodes.is_empty() || other.nodes.is_empty() {
            return;
        }
        if !self.nodes[0].bb.overlaps(&other.nodes[0].bb) {
            return;
        }
        let mut frontier = FastQueue::with_capacity(64);
        frontier.enqueue((0_usize, 0_usize));
        while !frontier.is_empty() {
            let (a, b) = frontier.dequeue();
            match (self.nodes[a].kind, other.nodes[b].kind) {
                (NodeKind::Leaf, NodeKind::Leaf) => {
                    for i in self.nodes[a].head..self.nodes[a].tail {
                        for j in other.nodes[b].head..other.nodes[b].tail {
                            if self.items[i].bb.overlaps(&other.items[j].bb)
                                && !visit(&self.items[i].payload, &other.items[j].payload)
                            {
                                return;
                            }
                        }
                    }
                }
                (NodeKind::Internal { first_child }, _) => {
                    for k in 0..3 {
                        if self.nodes[first_child + k].bb.overlaps(&other.nodes[b].bb) {
                            frontier.enqueue((first_child + k, b));
                        }
                    }
                }
                (NodeKind::Leaf, NodeKind::Internal { first_child }) => {
                    for k in 0..3 {
                        if self.nodes[a].bb.overlaps(&other.nodes[first_child + k].bb) {
                            frontier.enqueue((a, first_child + k));
                        }
                    }
                }
            }
        }
    }

    /// Visit every item whose padded box overlaps `query`, exactly once.
    ///
    /// A node box strictly contained in the query emits its whole item range
    /// without any further box tests.
    pub fn overlap_with_box(&self, query: &BoundingBox, mut visit: impl FnMut(&T) -> bool) {
        if self.nodes.is_empty() || !self.nodes[0].bb.overlaps(query) {
            return;
        }
        let mut frontier = FastQueue::with_capacity(64);
        frontier.enqueue(0_usize);
        while !frontier.is_empty() {
            let n = frontier.dequeue();
            if self.nodes[n].bb.is_within(query) {
                for i in self.nodes[n].head..self.nodes[n].tail {
                    if !visit(&self.items[i].payload) {
                        return;
                    }
                }
                continue;
            }
            match self.nodes[n].kind {
                NodeKind::Leaf => {
                    for i in self.nodes[n].head..self.nodes[n].tail {
                        if self.items[i].bb.overlaps(query) && !visit(&self.items[i].payload) {
                            return;
                        }
                    }
                }
                NodeKind::Internal { first_child } => {
                    for k in 0..3 {
                        if self.nodes[first_child + k].bb.overlaps(query) {
                            frontier.enqueue(first_child + k);
                        }
                    }
                }
            }
        }
    }

    /// Visit every item whose padded box is hit by the one-sided ray from
    /// `origin` along `dir`, exactly once.
    ///
    /// There is no containment short-circuit here; a ray cannot contain a
    /// node.
    pub fn overlap_with_ray(&self, origin: Vec3, dir: Vec3, mut visit: impl FnMut(&T) -> bool) {
        if self.nodes.is_empty() || !self.nodes[0].bb.intersects_ray(origin, dir) {
            return;
        }
        let mut frontier = FastQueue::with_capacity(64);
        frontier.enqueue(0_usize);
        while !frontier.is_empty() {
            let n = frontier.dequeue();
            match self.nodes[n].kind {
                NodeKind::Leaf => {
                    for i in self.nodes[n].head..self.nodes[n].tail {
                        if self.items[i].bb.intersects_ray(origin, dir)
                            && !visit(&self.items[i].payload)
                        {
                            return;
                        }
                    }
                }
                NodeKind::Internal { first_child } => {
                    for k in 0..3 {
                        if self.nodes[first_child + k].bb.intersects_ray(origin, dir) {
                            frontier.enqueue(first_child + k);
                        }
                    }
                }
            }
        }
    }
}

/// Hoare-style two-pointer partition over a slice of items; returns the length
/// of the predicate-true prefix.
fn partition<T>(items: &mut [SpaceItem<T>], pred: impl Fn(&BoundingBox) -> bool) -> usize {
    let mut lo = 0;
    let mut hi = items.len();
    while lo < hi {
        if pred(&items[lo].bb) {
            lo += 1;
        } else if !pred(&items[hi - 1].bb) {
            hi -= 1;
        } else {
            items.swap(lo, hi - 1);
            lo += 1;
            hi -= 1;
        }
    }
    lo
}
