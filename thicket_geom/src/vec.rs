// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 3D and 4D vectors.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::floats;
use crate::{EPSILON, EPSILON_SQUARED};

/// A 3D vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// The unit X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// The unit Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// The unit Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A vector with all components set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Component by axis index: `0 → x`, `1 → y`, anything else `→ z`.
    #[inline]
    pub const fn component(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length.
    #[inline]
    pub fn length(self) -> f64 {
        floats::sqrt(self.length_squared())
    }

    /// The vector scaled to unit length.
    ///
    /// A vector whose squared length is below [`EPSILON_SQUARED`] is returned
    /// unchanged instead of dividing by a near-zero length.
    pub fn normalized(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq < EPSILON_SQUARED {
            return self;
        }
        self / floats::sqrt(len_sq)
    }

    /// Component-wise equality within the absolute tolerance [`EPSILON`].
    pub fn approx_eq(self, other: Self) -> bool {
        floats::abs(self.x - other.x) < EPSILON
            && floats::abs(self.y - other.y) < EPSILON
            && floats::abs(self.z - other.z) < EPSILON
    }

    /// Linear interpolation towards `other` by `t`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    /// Some vector perpendicular to `self`.
    ///
    /// Crosses against the coordinate axis least aligned with `self`, so the
    /// result is non-zero for any non-zero input.
    pub fn orthogonal(self) -> Self {
        let ax = floats::abs(self.x);
        let ay = floats::abs(self.y);
        let az = floats::abs(self.z);
        let basis = if ax <= ay && ax <= az {
            Self::X
        } else if ay <= az {
            Self::Y
        } else {
            Self::Z
        };
        self.cross(basis)
    }

    /// Rodrigues rotation of `self` about `axis` by `angle` radians.
    ///
    /// The axis is normalized internally; a degenerate axis leaves the vector
    /// unchanged.
    pub fn rotated_about(self, axis: Self, angle: f64) -> Self {
        if axis.length_squared() < EPSILON_SQUARED {
            return self;
        }
        let k = axis.normalized();
        let c = floats::cos(angle);
        let s = floats::sin(angle);
        self * c + k.cross(self) * s + k * (k.dot(self) * (1.0 - c))
    }

    /// Signed angle from `self` to `other` around `normal`, in `(-π, π]`.
    ///
    /// Both vectors are projected into the 2D frame spanned by `self` and
    /// `normal × self`. Returns `0.0` when `self` is degenerate.
    pub fn signed_angle_to(self, other: Self, normal: Self) -> f64 {
        if self.length_squared() < EPSILON_SQUARED {
            return 0.0;
        }
        let frame_x = self.normalized();
        let frame_y = normal.normalized().cross(frame_x);
        let angle = floats::atan2(other.dot(frame_y), other.dot(frame_x));
        if angle <= -core::f64::consts::PI {
            angle + core::f64::consts::TAU
        } else {
            angle
        }
    }

    /// Spherical interpolation towards `other` by `t`.
    ///
    /// The direction travels along the great arc between the two vectors while
    /// the magnitude interpolates linearly. Antiparallel inputs have no unique
    /// rotation plane; an arbitrary side vector is constructed so the
    /// interpolation still sweeps through a half turn. Degenerate inputs fall
    /// back to [`Vec3::lerp`].
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let len_a = self.length();
        let len_b = other.length();
        if len_a * len_a < EPSILON_SQUARED || len_b * len_b < EPSILON_SQUARED {
            return self.lerp(other, t);
        }
        let a = self / len_a;
        let b = other / len_b;
        let len = len_a + (len_b - len_a) * t;
        let angle = floats::acos(a.dot(b).clamp(-1.0, 1.0));
        if angle < EPSILON {
            return a * len;
        }
        let mut axis = a.cross(b);
        if axis.length_squared() < EPSILON_SQUARED {
            axis = a.orthogonal();
        }
        a.rotated_about(axis, angle * t) * len
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// A 4D vector.
///
/// Used as the column type of [`Transformation`](crate::Transformation); the
/// `w` component carries the homogeneous scale/weight channel (0 for
/// directions, 1 for positions).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec4 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// Homogeneous weight component.
    pub w: f64,
}

impl Vec4 {
    /// Create a vector from components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Extend a [`Vec3`] with an explicit weight.
    pub const fn from_vec3(v: Vec3, w: f64) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// The spatial part.
    pub const fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// 4D dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Linear interpolation towards `other` by `t`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub for Vec4 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f64> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}
