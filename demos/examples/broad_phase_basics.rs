// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad-phase basics.
//!
//! Build a space over a handful of moving spheres, rebuild each tick, and run
//! the pair, box, and ray queries.
//!
//! Run:
//! - `cargo run -p thicket_demos --example broad_phase_basics`

use thicket_geom::{BoundingBox, Vec3};
use thicket_space::BoxSpace;

struct Sphere {
    id: u32,
    center: Vec3,
    radius: f64,
    velocity: Vec3,
}

impl Sphere {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }
}

fn main() {
    let mut spheres = vec![
        Sphere {
            id: 0,
            center: Vec3::new(0.0, 0.0, 0.0),
            radius: 1.0,
            velocity: Vec3::new(1.0, 0.0, 0.0),
        },
        Sphere {
            id: 1,
            center: Vec3::new(6.0, 0.0, 0.0),
            radius: 1.0,
            velocity: Vec3::new(-1.0, 0.0, 0.0),
        },
        Sphere {
            id: 2,
            center: Vec3::new(3.0, 8.0, 0.0),
            radius: 2.0,
            velocity: Vec3::new(0.0, -1.0, 0.0),
        },
    ];

    // The margin absorbs up to half a unit of motion per tick, so boxes built
    // this tick stay conservative while the spheres drift.
    let mut space: BoxSpace<usize> = BoxSpace::new(0.5, 2);
    space.set_items(0..spheres.len());

    for tick in 0..6 {
        for s in &mut spheres {
            s.center = s.center + s.velocity;
        }
        space
            .update(|slot, bb| *bb = spheres[*slot].bounds())
            .expect("sphere bounds are finite");

        let mut pairs = Vec::new();
        space.overlap_self(|a, b| {
            pairs.push((spheres[*a].id, spheres[*b].id));
            true
        });
        println!("tick {tick}: candidate pairs {pairs:?}");
    }

    // Which spheres ended up inside this region of interest?
    let region = BoundingBox::new(Vec3::new(0.0, -3.0, -3.0), Vec3::new(8.0, 3.0, 3.0));
    let mut in_region = Vec::new();
    space.overlap_with_box(&region, |slot| {
        in_region.push(spheres[*slot].id);
        true
    });
    println!("in region: {in_region:?}");

    // Cast a ray down the x axis through the cluster.
    let mut hit_by_ray = Vec::new();
    space.overlap_with_ray(Vec3::new(-10.0, 0.0, 0.0), Vec3::X, |slot| {
        hit_by_ray.push(spheres[*slot].id);
        true
    });
    println!("ray candidates: {hit_by_ray:?}");
    assert!(!hit_by_ray.is_empty(), "the ray passes through the cluster");
}
