// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_geom::{BoundingBox, Vec3};
use thicket_pool::WorkerPool;
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

fn gen_random_boxes(count: usize, extent: f64, seed: u64) -> Vec<BoundingBox> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(seed);
    for _ in 0..count {
        let lo = Vec3::new(
            rng.next_f64() * extent,
            rng.next_f64() * extent,
            rng.next_f64() * extent,
        );
        out.push(BoundingBox::new(lo, lo + Vec3::splat(12.0)));
    }
    out
}

/// Rebuild-and-query one lane; the unit of work handed to the pool.
fn lane_step(boxes: &[BoundingBox]) -> usize {
    let mut space = BoxSpace::new(0.5, 8);
    space.set_items(0..boxes.len());
    space
        .update(|id, bb| *bb = boxes[*id])
        .expect("bench boxes are valid");
    let mut pairs = 0usize;
    space.overlap_self(|_, _| {
        pairs += 1;
        true
    });
    pairs
}

fn bench_parallel_lanes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_lanes");
    let lanes: Vec<Vec<BoundingBox>> = (0..8u64)
        .map(|lane| gen_random_boxes(1024, 800.0, 0xCAFE_F00D ^ lane))
        .collect();
    group.throughput(Throughput::Elements((lanes.len() * 1024) as u64));

    group.bench_function("serial_8x1024", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for boxes in &lanes {
                total += lane_step(boxes);
            }
            black_box(total);
        })
    });

    for &workers in &[2usize, 4, 8] {
        group.bench_function(format!("workers{workers}_8x1024"), |b| {
            b.iter_batched(
                || (WorkerPool::new(workers), lanes.clone()),
                |(pool, lanes)| {
                    for boxes in lanes {
                        pool.execute(move || {
                            black_box(lane_step(&boxes));
                        })
                        .expect("pool accepts jobs before shutdown");
                    }
                    pool.wait_until_finished();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parallel_lanes);
criterion_main!(benches);
