// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes.

use crate::floats;
use crate::vec::Vec3;
use crate::EPSILON;

/// Sentinel bound used by a cleared box so any subsequent add establishes
/// real bounds.
const CLEARED_BOUND: f64 = 1e15;

/// An axis-aligned bounding box given by its corner pair.
///
/// A box is *valid* when `max >= min` on every axis. A cleared box holds
/// inverted sentinel bounds (`min = +1e15`, `max = -1e15`) and stays invalid
/// until at least one point or box has been added to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// The cleared (invalid) box; adding any point or box establishes bounds.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(CLEARED_BOUND),
        max: Vec3::splat(-CLEARED_BOUND),
    };

    /// Create a box from its corners. Validity is not checked; see
    /// [`BoundingBox::is_valid`].
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Reset to the cleared sentinel state.
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Whether `max >= min` holds on every axis.
    pub fn is_valid(&self) -> bool {
        self.max.x >= self.min.x && self.max.y >= self.min.y && self.max.z >= self.min.z
    }

    /// Extend the box in place to contain `p`.
    pub fn add_point(&mut self, p: Vec3) {
        self.add_min_max(p, p);
    }

    /// Extend the box in place to contain `other`.
    pub fn add_box(&mut self, other: &Self) {
        self.add_min_max(other.min, other.max);
    }

    /// Extend the box in place by a raw corner pair.
    pub fn add_min_max(&mut self, min: Vec3, max: Vec3) {
        self.min.x = self.min.x.min(min.x);
        self.min.y = self.min.y.min(min.y);
        self.min.z = self.min.z.min(min.z);
        self.max.x = self.max.x.max(max.x);
        self.max.y = self.max.y.max(max.y);
        self.max.z = self.max.z.max(max.z);
    }

    /// The union of two boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.add_box(other);
        out
    }

    /// The intersection of two boxes. May be invalid when they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        }
    }

    /// Whether the two boxes overlap with strict inequalities on all axes.
    ///
    /// Boxes that touch on a face or edge without crossing do **not** overlap.
    /// Broad-phase pair emission relies on this exact convention.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.max.x > self.min.x
            && other.min.x < self.max.x
            && other.max.y > self.min.y
            && other.min.y < self.max.y
            && other.max.z > self.min.z
            && other.min.z < self.max.z
    }

    /// Whether `self` lies strictly inside `other` on every axis.
    #[inline]
    pub fn is_within(&self, other: &Self) -> bool {
        self.min.x > other.min.x
            && self.max.x < other.max.x
            && self.min.y > other.min.y
            && self.max.y < other.max.y
            && self.min.z > other.min.z
            && self.max.z < other.max.z
    }

    /// One-sided ray-slab intersection.
    ///
    /// For each axis whose direction component exceeds [`EPSILON`] in
    /// magnitude, the parameters of the near and far faces are computed;
    /// candidates with `s <= 0` are rejected (the ray origin itself does not
    /// hit), and a candidate is accepted only when its hit point lies strictly
    /// inside the other two axes' intervals.
    pub fn intersects_ray(&self, origin: Vec3, dir: Vec3) -> bool {
        for axis in 0..3 {
            let d = dir.component(axis);
            if floats::abs(d) <= EPSILON {
                continue;
            }
            let u = (axis + 1) % 3;
            let v = (axis + 2) % 3;
            for face in [self.min.component(axis), self.max.component(axis)] {
                let s = (face - origin.component(axis)) / d;
                if s <= 0.0 {
                    continue;
                }
                let hit_u = origin.component(u) + dir.component(u) * s;
                if hit_u <= self.min.component(u) || hit_u >= self.max.component(u) {
                    continue;
                }
                let hit_v = origin.component(v) + dir.component(v) * s;
                if hit_v > self.min.component(v) && hit_v < self.max.component(v) {
                    return true;
                }
            }
        }
        false
    }

    /// Corner `i` of 8, by bit pattern: bit 0 picks the X bound, bit 1 the Y
    /// bound, bit 2 the Z bound (set bit selects `max`).
    pub fn corner(&self, i: usize) -> Vec3 {
        Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        )
    }

    /// The box padded symmetrically by `margin` on all axes.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        let m = Vec3::splat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent per axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The axis index with the largest extent, and that extent.
    pub fn longest_axis(&self) -> (usize, f64) {
        let size = self.size();
        let mut axis = 0;
        let mut extent = size.x;
        if size.y > extent {
            axis = 1;
            extent = size.y;
        }
        if size.z > extent {
            axis = 2;
            extent = size.z;
        }
        (axis, extent)
    }
}
