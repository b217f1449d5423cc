// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_geom::{BoundingBox, Vec3};
use thicket_space::BoxSpace;

struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<BoundingBox> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let lo = Vec3::new(x as f64 * cell, y as f64 * cell, z as f64 * cell);
                out.push(BoundingBox::new(lo, lo + Vec3::splat(cell)));
            }
        }
    }
    out
}

fn gen_random_boxes(count: usize, extent: f64, max_size: f64, seed: u64) -> Vec<BoundingBox> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(seed);
    for _ in 0..count {
        let lo = Vec3::new(
            rng.next_f64() * extent,
            rng.next_f64() * extent,
            rng.next_f64() * extent,
        );
        let size = Vec3::new(
            rng.next_f64() * max_size,
            rng.next_f64() * max_size,
            rng.next_f64() * max_size,
        );
        out.push(BoundingBox::new(lo, lo + size));
    }
    out
}

fn gen_clustered_boxes(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<BoundingBox> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push(Vec3::new(
            rng.next_f64() * 2000.0,
            rng.next_f64() * 2000.0,
            rng.next_f64() * 2000.0,
        ));
    }
    for c in centers {
        for _ in 0..per_cluster {
            let d = Vec3::new(
                (rng.next_f64() - 0.5) * spread,
                (rng.next_f64() - 0.5) * spread,
                (rng.next_f64() - 0.5) * spread,
            );
            let lo = c + d;
            out.push(BoundingBox::new(lo, lo + Vec3::splat(12.0)));
        }
    }
    out
}

fn built_space(boxes: &[BoundingBox], margin: f64, min_items: usize) -> BoxSpace<usize> {
    let mut space = BoxSpace::new(margin, min_items);
    space.set_items(0..boxes.len());
    space
        .update(|id, bb| *bb = boxes[*id])
        .expect("bench boxes are valid");
    space
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &n in &[8usize, 12, 16] {
        let boxes = gen_grid_boxes(n, 10.0);
        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_function(format!("grid_n{}", n * n * n), |b| {
            b.iter_batched(
                || {
                    let mut space = BoxSpace::new(0.5, 8);
                    space.set_items(0..boxes.len());
                    space
                },
                |mut space| {
                    space
                        .update(|id, bb| *bb = boxes[*id])
                        .expect("bench boxes are valid");
                    black_box(space);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let boxes = gen_random_boxes(4096, 2000.0, 24.0, 0xCAFE_F00D_DEAD_BEEF);
    group.bench_function("random_4096", |b| {
        b.iter_batched(
            || {
                let mut space = BoxSpace::new(0.5, 8);
                space.set_items(0..boxes.len());
                space
            },
            |mut space| {
                space
                    .update(|id, bb| *bb = boxes[*id])
                    .expect("bench boxes are valid");
                black_box(space);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_overlap_self(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_self");
    let sparse = built_space(&gen_random_boxes(4096, 2000.0, 24.0, 0xBADC_0FFE), 0.5, 8);
    group.bench_function("random_sparse_4096", |b| {
        b.iter(|| {
            let mut pairs = 0usize;
            sparse.overlap_self(|_, _| {
                pairs += 1;
                true
            });
            black_box(pairs);
        })
    });
    let clustered = built_space(&gen_clustered_boxes(16, 256, 128.0), 0.5, 8);
    group.bench_function("clustered_4096", |b| {
        b.iter(|| {
            let mut pairs = 0usize;
            clustered.overlap_self(|_, _| {
                pairs += 1;
                true
            });
            black_box(pairs);
        })
    });
    group.finish();
}

fn bench_overlap_with(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_with");
    let a = built_space(&gen_random_boxes(2048, 1000.0, 24.0, 0xFACE_FEED), 0.5, 8);
    let b_space = built_space(&gen_random_boxes(2048, 1000.0, 24.0, 0xDEAD_10CC), 0.5, 8);
    group.bench_function("random_2048_x_2048", |b| {
        b.iter(|| {
            let mut pairs = 0usize;
            a.overlap_with(&b_space, |_, _| {
                pairs += 1;
                true
            });
            black_box(pairs);
        })
    });
    group.finish();
}

fn bench_box_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_query");
    let space = built_space(&gen_grid_boxes(16, 8.0), 0.25, 8);
    group.bench_function("grid_4096_many_queries", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for q in 0..256 {
                let x = (q % 16) as f64 * 8.0;
                let y = (q / 16) as f64 * 8.0;
                let lo = Vec3::new(x, y, 32.0);
                let query = BoundingBox::new(lo, lo + Vec3::splat(48.0));
                space.overlap_with_box(&query, |_| {
                    total += 1;
                    true
                });
            }
            black_box(total);
        })
    });
    group.finish();
}

fn bench_ray_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("ray_query");
    let space = built_space(&gen_random_boxes(4096, 500.0, 16.0, 0x5EED_5EED), 0.0, 8);
    group.bench_function("random_4096_many_rays", |b| {
        let mut rng = Rng::new(0x0DDB_A11);
        b.iter(|| {
            let mut total = 0usize;
            for _ in 0..256 {
                let origin = Vec3::new(
                    rng.next_f64() * 500.0,
                    rng.next_f64() * 500.0,
                    -10.0,
                );
                let dir = Vec3::new(
                    rng.next_f64() - 0.5,
                    rng.next_f64() - 0.5,
                    1.0,
                );
                space.overlap_with_ray(origin, dir, |_| {
                    total += 1;
                    true
                });
            }
            black_box(total);
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_overlap_self,
    bench_overlap_with,
    bench_box_query,
    bench_ray_query,
);
criterion_main!(benches);
