// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation quaternions.

use core::ops::Mul;

use crate::floats;
use crate::vec::Vec3;
use crate::{EPSILON, EPSILON_SQUARED};

/// A rotation quaternion `w + xi + yj + zk`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quaternion {
    /// Scalar part.
    pub w: f64,
    /// Vector part, X.
    pub x: f64,
    /// Vector part, Y.
    pub y: f64,
    /// Vector part, Z.
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a quaternion from raw components.
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized internally; a degenerate axis yields the
    /// identity.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        if axis.length_squared() < EPSILON_SQUARED {
            return Self::IDENTITY;
        }
        let k = axis.normalized();
        let half = angle * 0.5;
        let s = floats::sin(half);
        Self::new(floats::cos(half), k.x * s, k.y * s, k.z * s)
    }

    /// Build a rotation from three orthonormal basis vectors (the columns of
    /// a rotation matrix). Shepperd's method: branch on the largest diagonal
    /// term to keep the divisor well away from zero.
    ///
    /// The basis is assumed right-handed and orthonormal; callers normalize
    /// and validate first.
    pub fn from_axes(x: Vec3, y: Vec3, z: Vec3) -> Self {
        let (m00, m01, m02) = (x.x, y.x, z.x);
        let (m10, m11, m12) = (x.y, y.y, z.y);
        let (m20, m21, m22) = (x.z, y.z, z.z);
        let trace = m00 + m11 + m22;
        if trace > 0.0 {
            let s = floats::sqrt(trace + 1.0) * 2.0;
            Self::new(s * 0.25, (m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s)
        } else if m00 > m11 && m00 > m22 {
            let s = floats::sqrt(1.0 + m00 - m11 - m22) * 2.0;
            Self::new((m21 - m12) / s, s * 0.25, (m01 + m10) / s, (m02 + m20) / s)
        } else if m11 > m22 {
            let s = floats::sqrt(1.0 + m11 - m00 - m22) * 2.0;
            Self::new((m02 - m20) / s, (m01 + m10) / s, s * 0.25, (m12 + m21) / s)
        } else {
            let s = floats::sqrt(1.0 + m22 - m00 - m11) * 2.0;
            Self::new((m10 - m01) / s, (m02 + m20) / s, (m12 + m21) / s, s * 0.25)
        }
    }

    /// Dot product with another quaternion.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length of the quaternion viewed as a 4-vector.
    pub fn length(self) -> f64 {
        floats::sqrt(self.dot(self))
    }

    /// Scaled to unit length; a degenerate quaternion becomes the identity.
    pub fn normalized(self) -> Self {
        let len_sq = self.dot(self);
        if len_sq < EPSILON_SQUARED {
            return Self::IDENTITY;
        }
        let inv = 1.0 / floats::sqrt(len_sq);
        Self::new(self.w * inv, self.x * inv, self.y * inv, self.z * inv)
    }

    /// The inverse rotation (conjugate; assumes unit length).
    pub const fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a vector.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// The basis vectors of the equivalent rotation matrix, as columns.
    pub fn to_axes(self) -> (Vec3, Vec3, Vec3) {
        (
            self.rotate(Vec3::X),
            self.rotate(Vec3::Y),
            self.rotate(Vec3::Z),
        )
    }

    /// Spherical interpolation towards `other` by `t`, along the shorter arc.
    ///
    /// Nearly parallel rotations fall back to a normalized linear blend.
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let mut b = other;
        let mut d = self.dot(other);
        if d < 0.0 {
            b = Self::new(-b.w, -b.x, -b.y, -b.z);
            d = -d;
        }
        if d > 1.0 - EPSILON {
            return Self::new(
                self.w + (b.w - self.w) * t,
                self.x + (b.x - self.x) * t,
                self.y + (b.y - self.y) * t,
                self.z + (b.z - self.z) * t,
            )
            .normalized();
        }
        let angle = floats::acos(d.clamp(-1.0, 1.0));
        let sin_angle = floats::sin(angle);
        let wa = floats::sin((1.0 - t) * angle) / sin_angle;
        let wb = floats::sin(t * angle) / sin_angle;
        Self::new(
            self.w * wa + b.w * wb,
            self.x * wa + b.x * wb,
            self.y * wa + b.y * wb,
            self.z * wa + b.z * wb,
        )
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product; the result applies `rhs` first, then `self`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}
