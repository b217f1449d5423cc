// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine transformations with a homogeneous scale channel.

use core::ops::Mul;

use crate::floats;
use crate::quat::Quaternion;
use crate::vec::{Vec3, Vec4};
use crate::{EPSILON, EPSILON_SQUARED};

/// Tolerance on pairwise axis dot products for [`Transformation::is_uniform`].
const UNIFORM_TOLERANCE: f64 = 1e-3;

/// An affine 4×4 transformation stored as three basis vectors plus an origin.
///
/// Each column is a [`Vec4`] whose fourth component carries the homogeneous
/// scale/weight channel: 0 for the basis axes, 1 for the origin of a plain
/// affine transform.
///
/// The usual invariants (orthogonal-ish axes, non-degenerate basis) are
/// assumed rather than enforced. Callers validate with [`Self::is_uniform`],
/// [`Self::is_flat`], and [`Self::is_flipped`] before relying on
/// [`Self::inverse`] or [`Self::decompose`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transformation {
    /// First basis column.
    pub x_axis: Vec4,
    /// Second basis column.
    pub y_axis: Vec4,
    /// Third basis column.
    pub z_axis: Vec4,
    /// Origin column.
    pub origin: Vec4,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        x_axis: Vec4::new(1.0, 0.0, 0.0, 0.0),
        y_axis: Vec4::new(0.0, 1.0, 0.0, 0.0),
        z_axis: Vec4::new(0.0, 0.0, 1.0, 0.0),
        origin: Vec4::new(0.0, 0.0, 0.0, 1.0),
    };

    /// Assemble a transformation from rotation, per-axis scale, and
    /// translation.
    pub fn from_parts(rotation: Quaternion, scale: Vec3, translation: Vec3) -> Self {
        let (x, y, z) = rotation.to_axes();
        Self {
            x_axis: Vec4::from_vec3(x * scale.x, 0.0),
            y_axis: Vec4::from_vec3(y * scale.y, 0.0),
            z_axis: Vec4::from_vec3(z * scale.z, 0.0),
            origin: Vec4::from_vec3(translation, 1.0),
        }
    }

    /// A pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            origin: Vec4::from_vec3(translation, 1.0),
            ..Self::IDENTITY
        }
    }

    /// Apply to a homogeneous 4-vector.
    #[inline]
    pub fn apply4(&self, v: Vec4) -> Vec4 {
        self.x_axis * v.x + self.y_axis * v.y + self.z_axis * v.z + self.origin * v.w
    }

    /// Transform a point (weight 1), normalizing by the resulting weight when
    /// it is meaningfully non-unit.
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        let r = self.apply4(Vec4::from_vec3(p, 1.0));
        if floats::abs(r.w) > EPSILON {
            r.xyz() / r.w
        } else {
            r.xyz()
        }
    }

    /// Transform a direction (weight 0; translation does not apply).
    pub fn apply_vector(&self, v: Vec3) -> Vec3 {
        self.apply4(Vec4::from_vec3(v, 0.0)).xyz()
    }

    /// Determinant of the 3×3 basis (the triple product of the axes).
    pub fn basis_determinant(&self) -> f64 {
        self.x_axis
            .xyz()
            .dot(self.y_axis.xyz().cross(self.z_axis.xyz()))
    }

    /// Whether the three axes are pairwise orthogonal within
    /// `UNIFORM_TOLERANCE` (1e-3) on their dot products.
    pub fn is_uniform(&self) -> bool {
        let x = self.x_axis.xyz().normalized();
        let y = self.y_axis.xyz().normalized();
        let z = self.z_axis.xyz().normalized();
        floats::abs(x.dot(y)) < UNIFORM_TOLERANCE
            && floats::abs(y.dot(z)) < UNIFORM_TOLERANCE
            && floats::abs(z.dot(x)) < UNIFORM_TOLERANCE
    }

    /// Whether the basis is mirrored (negative determinant).
    pub fn is_flipped(&self) -> bool {
        self.basis_determinant() < 0.0
    }

    /// Whether any axis has near-zero length (degenerate basis).
    pub fn is_flat(&self) -> bool {
        self.x_axis.xyz().length_squared() < EPSILON_SQUARED
            || self.y_axis.xyz().length_squared() < EPSILON_SQUARED
            || self.z_axis.xyz().length_squared() < EPSILON_SQUARED
    }

    /// Invert via explicit 4×4 cofactor expansion.
    ///
    /// Returns `None` when the determinant magnitude falls below the
    /// [`EPSILON_SQUARED`] guard.
    pub fn inverse(&self) -> Option<Self> {
        let m = self.to_array();
        let mut inv = [0.0_f64; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if floats::abs(det) < EPSILON_SQUARED {
            return None;
        }
        let inv_det = 1.0 / det;
        for v in &mut inv {
            *v *= inv_det;
        }
        Some(Self::from_array(inv))
    }

    /// Split into rotation, per-axis scale, and translation.
    ///
    /// Assumes a non-flat, non-flipped basis; see the type-level invariants.
    pub fn decompose(&self) -> (Quaternion, Vec3, Vec3) {
        let sx = self.x_axis.xyz().length();
        let sy = self.y_axis.xyz().length();
        let sz = self.z_axis.xyz().length();
        let rotation = Quaternion::from_axes(
            self.x_axis.xyz().normalized(),
            self.y_axis.xyz().normalized(),
            self.z_axis.xyz().normalized(),
        )
        .normalized();
        (rotation, Vec3::new(sx, sy, sz), self.origin.xyz())
    }

    /// Blend towards `other` by `ratio` in `[0, 1]`, interpolating rotation
    /// spherically, translation linearly, and scale as a single uniform
    /// factor (the mean axis length).
    ///
    /// Used by callers animating between poses; the broad-phase index itself
    /// never blends transforms.
    #[must_use]
    pub fn transition_to(&self, other: &Self, ratio: f64) -> Self {
        let (ra, sa, ta) = self.decompose();
        let (rb, sb, tb) = other.decompose();
        let ua = (sa.x + sa.y + sa.z) / 3.0;
        let ub = (sb.x + sb.y + sb.z) / 3.0;
        let u = ua + (ub - ua) * ratio;
        Self::from_parts(ra.slerp(rb, ratio), Vec3::splat(u), ta.lerp(tb, ratio))
    }

    /// Like [`Self::transition_to`] but preserves non-uniform scale by
    /// interpolating each axis length separately.
    #[must_use]
    pub fn rotate_and_scale_to(&self, other: &Self, ratio: f64) -> Self {
        let (ra, sa, ta) = self.decompose();
        let (rb, sb, tb) = other.decompose();
        Self::from_parts(ra.slerp(rb, ratio), sa.lerp(sb, ratio), ta.lerp(tb, ratio))
    }

    fn to_array(&self) -> [f64; 16] {
        let c = [self.x_axis, self.y_axis, self.z_axis, self.origin];
        let mut out = [0.0; 16];
        for (i, col) in c.iter().enumerate() {
            out[i * 4] = col.x;
            out[i * 4 + 1] = col.y;
            out[i * 4 + 2] = col.z;
            out[i * 4 + 3] = col.w;
        }
        out
    }

    fn from_array(m: [f64; 16]) -> Self {
        Self {
            x_axis: Vec4::new(m[0], m[1], m[2], m[3]),
            y_axis: Vec4::new(m[4], m[5], m[6], m[7]),
            z_axis: Vec4::new(m[8], m[9], m[10], m[11]),
            origin: Vec4::new(m[12], m[13], m[14], m[15]),
        }
    }
}

impl Mul for Transformation {
    type Output = Self;

    /// Composition; the result applies `rhs` first, then `self`.
    fn mul(self, rhs: Self) -> Self {
        Self {
            x_axis: self.apply4(rhs.x_axis),
            y_axis: self.apply4(rhs.y_axis),
            z_axis: self.apply4(rhs.z_axis),
            origin: self.apply4(rhs.origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    fn sample() -> Transformation {
        Transformation::from_parts(
            Quaternion::from_axis_angle(Vec3::new(0.3, 1.0, -0.2), 0.8),
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(5.0, -3.0, 1.5),
        )
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(Transformation::IDENTITY.apply_point(p), p);
        assert_eq!(Transformation::IDENTITY.apply_vector(p), p);
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let t = Transformation::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(t.apply_point(p).approx_eq(Vec3::new(11.0, 2.0, 3.0)));
        assert!(t.apply_vector(p).approx_eq(p));
    }

    #[test]
    fn compose_applies_rhs_first() {
        let rot = Transformation::from_parts(
            Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2),
            Vec3::splat(1.0),
            Vec3::ZERO,
        );
        let shift = Transformation::from_translation(Vec3::new(1.0, 0.0, 0.0));
        // Shift first, then rotate: (1,0,0)+(1,0,0) = (2,0,0) -> (0,2,0).
        let p = (rot * shift).apply_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.approx_eq(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn inverse_round_trips_points() {
        let t = sample();
        let inv = t.inverse().expect("sample transform is invertible");
        for p in [Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 9.0)] {
            assert!(inv.apply_point(t.apply_point(p)).approx_eq(p));
        }
    }

    #[test]
    fn flat_transform_has_no_inverse() {
        let mut t = sample();
        t.z_axis = Vec4::new(0.0, 0.0, 0.0, 0.0);
        assert!(t.is_flat());
        assert!(t.inverse().is_none());
    }

    #[test]
    fn decompose_recomposes() {
        let t = sample();
        let (r, s, tr) = t.decompose();
        let back = Transformation::from_parts(r, s, tr);
        for p in [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-0.5, 4.0, 0.0)] {
            assert!(back.apply_point(p).approx_eq(t.apply_point(p)));
        }
    }

    #[test]
    fn uniform_and_flipped_diagnostics() {
        let t = sample();
        assert!(t.is_uniform());
        assert!(!t.is_flipped());
        assert!(!t.is_flat());

        let mut mirrored = t;
        mirrored.x_axis = mirrored.x_axis * -1.0;
        assert!(mirrored.is_flipped());

        let mut skewed = Transformation::IDENTITY;
        skewed.y_axis = Vec4::new(0.5, 1.0, 0.0, 0.0);
        assert!(!skewed.is_uniform());
    }

    #[test]
    fn transition_endpoints_and_midpoint() {
        let a = Transformation::IDENTITY;
        let b = Transformation::from_parts(
            Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2),
            Vec3::splat(3.0),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let p = Vec3::new(1.0, 0.0, 0.0);

        assert!(a.transition_to(&b, 0.0).apply_point(p).approx_eq(a.apply_point(p)));
        assert!(a.transition_to(&b, 1.0).apply_point(p).approx_eq(b.apply_point(p)));

        let (r, s, tr) = a.transition_to(&b, 0.5).decompose();
        let _ = r;
        assert!(s.approx_eq(Vec3::splat(2.0)));
        assert!(tr.approx_eq(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn scaled_transition_keeps_per_axis_scale() {
        let a = Transformation::from_parts(
            Quaternion::IDENTITY,
            Vec3::new(1.0, 2.0, 4.0),
            Vec3::ZERO,
        );
        let b = Transformation::from_parts(
            Quaternion::IDENTITY,
            Vec3::new(3.0, 2.0, 8.0),
            Vec3::ZERO,
        );
        let (_, s, _) = a.rotate_and_scale_to(&b, 0.5).decompose();
        assert!(s.approx_eq(Vec3::new(2.0, 2.0, 6.0)));
    }
}
