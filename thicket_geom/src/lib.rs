// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Geom: a small 3D geometry kernel.
//!
//! This crate provides the value types the Thicket broad-phase index is built on:
//!
//! - [`Vec3`] / [`Vec4`]: vector algebra (dot, cross, normalization, rotation,
//!   interpolation). The fourth component of [`Vec4`] doubles as a homogeneous
//!   scale/weight channel.
//! - [`BoundingBox`]: axis-aligned boxes with union, strict overlap, strict
//!   containment, and one-sided ray-slab intersection.
//! - [`Quaternion`]: rotations, used when decomposing and blending transforms.
//! - [`Transformation`]: an affine 4×4 transform stored as three basis vectors
//!   plus an origin, with cofactor-expansion inversion and pose blending.
//!
//! # Conventions
//!
//! - All scalars are `f64`.
//! - Component comparisons use an absolute tolerance of [`EPSILON`] (`1e-6`);
//!   near-zero vectors are detected with [`EPSILON_SQUARED`] (`1e-12`) against
//!   the squared length.
//! - Overlap and containment tests are strict: boxes that merely touch on a
//!   face do not overlap. Broad-phase pairing relies on this exact convention.
//! - Transform invariants (orthogonal-ish axes, non-degenerate basis) are
//!   assumed rather than enforced; validate with [`Transformation::is_uniform`],
//!   [`Transformation::is_flat`], and [`Transformation::is_flipped`] before
//!   relying on inversion or decomposition.
//!
//! # no_std
//!
//! The crate is `no_std`. Float intrinsics come from `std` (default feature)
//! or from `libm` (enable the `libm` feature for no_std targets).

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(not(feature = "std"), not(feature = "libm")))]
compile_error!("thicket_geom requires either the `std` or the `libm` feature");

mod bbox;
mod floats;
mod quat;
mod transform;
mod vec;

pub use bbox::BoundingBox;
pub use quat::Quaternion;
pub use transform::Transformation;
pub use vec::{Vec3, Vec4};

/// Absolute tolerance for component-wise comparisons.
pub const EPSILON: f64 = 1e-6;

/// Squared-length guard below which a vector counts as zero.
pub const EPSILON_SQUARED: f64 = 1e-12;
