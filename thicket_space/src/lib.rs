// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Space: a broad-phase spatial index rebuilt every simulation step.
//!
//! [`BoxSpace`] stores opaque payloads with axis-aligned bounding boxes in one
//! contiguous array and builds a ternary bounding-volume hierarchy over them on
//! every [`BoxSpace::update`]. Four queue-driven (never recursive) traversals
//! answer overlap questions:
//!
//! - [`BoxSpace::overlap_self`]: every unordered pair of distinct overlapping
//!   items, exactly once.
//! - [`BoxSpace::overlap_with`]: overlapping pairs across two independent
//!   spaces.
//! - [`BoxSpace::overlap_with_box`]: items overlapping a query box, with a
//!   containment short-circuit.
//! - [`BoxSpace::overlap_with_ray`]: items hit by a one-sided ray.
//!
//! Each traversal drives a visitor callback per discovery; returning `false`
//! aborts the rest of the query. Query outputs carry no ordering guarantee
//! beyond "no duplicates, no omissions".
//!
//! The index performs no narrow-phase intersection and no incremental tree
//! maintenance: [`BoxSpace::add_item`] only appends to the item array, and the
//! new item joins the hierarchy (and the query results) on the next `update`.
//!
//! # Example
//!
//! ```rust
//! use thicket_geom::{BoundingBox, Vec3};
//! use thicket_space::BoxSpace;
//!
//! let mut space: BoxSpace<BoundingBox> = BoxSpace::new(0.1, 4);
//! space.set_items([
//!     BoundingBox::new(Vec3::ZERO, Vec3::splat(1.0)),
//!     BoundingBox::new(Vec3::splat(0.5), Vec3::splat(1.5)),
//!     BoundingBox::new(Vec3::splat(4.0), Vec3::splat(5.0)),
//! ]);
//! // The refresh callback writes each item's current world-space box; here
//! // the payload is the box itself.
//! space.update(|payload, bb| *bb = *payload).unwrap();
//!
//! let mut pairs = 0;
//! space.overlap_self(|_, _| {
//!     pairs += 1;
//!     true
//! });
//! assert_eq!(pairs, 1);
//! ```
//!
//! # Concurrency
//!
//! A `BoxSpace` is single-threaded and unsynchronized; callers serialize
//! builds and queries against one instance. Independent instances are fully
//! independent and can be driven from separate worker threads (see the
//! `thicket_pool` crate).

#![no_std]

extern crate alloc;

pub mod queue;
pub mod space;

pub use queue::FastQueue;
pub use space::{BoxSpace, SpaceError};
