// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallel spaces.
//!
//! Drive one independent `BoxSpace` per simulation island from a fixed worker
//! pool: each job rebuilds its island's index and collects candidate pairs,
//! and the barrier joins the tick.
//!
//! Run:
//! - `cargo run -p thicket_demos --example parallel_spaces`

use std::sync::mpsc;

use thicket_geom::{BoundingBox, Vec3};
use thicket_pool::WorkerPool;
use thicket_space::BoxSpace;

fn island_boxes(island: usize) -> Vec<BoundingBox> {
    // A line of slightly overlapping boxes, offset far away per island.
    let offset = island as f64 * 1000.0;
    (0..64)
        .map(|i| {
            let lo = Vec3::new(offset + i as f64 * 1.2, 0.0, 0.0);
            BoundingBox::new(lo, lo + Vec3::splat(1.5))
        })
        .collect()
}

fn main() {
    let pool = WorkerPool::new(4);
    let (tx, rx) = mpsc::channel();

    for island in 0..8_usize {
        let tx = tx.clone();
        pool.execute(move || {
            let boxes = island_boxes(island);
            let mut space = BoxSpace::new(0.1, 4);
            space.set_items(0..boxes.len());
            space
                .update(|slot, bb| *bb = boxes[*slot])
                .expect("island boxes are finite");
            let mut pairs = 0_usize;
            space.overlap_self(|_, _| {
                pairs += 1;
                true
            });
            tx.send((island, pairs)).expect("main thread is receiving");
        })
        .expect("pool accepts jobs before shutdown");
    }
    drop(tx);

    pool.wait_until_finished();

    let mut results: Vec<(usize, usize)> = rx.iter().collect();
    results.sort_unstable();
    for (island, pairs) in &results {
        println!("island {island}: {pairs} candidate pairs");
    }
    assert_eq!(results.len(), 8, "every island reports exactly once");
}
