// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Pool: a fixed-size worker thread pool with a FIFO job queue.
//!
//! [`WorkerPool`] spawns its threads up front and never grows or shrinks.
//! Jobs are boxed closures executed in submission order: workers pull from a
//! shared FIFO, so with one worker the pool is a strict serial executor, and
//! with several workers jobs *start* in submission order but may finish in
//! any order.
//!
//! [`WorkerPool::wait_until_finished`] is a barrier: it blocks the calling
//! thread until the queue is empty and every worker is idle. Shutdown (either
//! [`WorkerPool::shutdown`] or dropping the pool) drains the queue first and
//! then joins the workers, so every job accepted before shutdown runs to
//! completion; jobs submitted after shutdown are rejected with
//! [`PoolError::ShutDown`]. A panicking job is caught on its worker thread,
//! which survives and moves on to the next job.
//!
//! The pool pairs with `thicket_space`: one `BoxSpace` per worker job keeps
//! each index single-threaded while builds and queries for independent spaces
//! proceed in parallel.
//!
//! # Example
//!
//! ```rust
//! use std::sync::mpsc;
//! use thicket_pool::WorkerPool;
//!
//! let mut pool = WorkerPool::new(4);
//! let (tx, rx) = mpsc::channel();
//! for i in 0..8_u32 {
//!     let tx = tx.clone();
//!     pool.execute(move || tx.send(i * i).unwrap()).unwrap();
//! }
//! pool.wait_until_finished();
//! drop(tx);
//! assert_eq!(rx.iter().sum::<u32>(), 140);
//! pool.shutdown();
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Error produced by [`WorkerPool::execute`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoolError {
    /// The pool has been shut down; it accepts no further jobs.
    ShutDown,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShutDown => write!(f, "worker pool is shut down"),
        }
    }
}

impl std::error::Error for PoolError {}

struct PoolState {
    queue: VecDeque<Job>,
    /// Number of workers currently running a job.
    active: usize,
    shutdown: bool,
}

struct PoolInner {
    state: Mutex<PoolState>,
    /// Signalled when a job is queued or shutdown begins.
    task_ready: Condvar,
    /// Signalled when the last busy worker finds the queue empty.
    all_idle: Condvar,
}

impl PoolInner {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // Jobs run outside the lock, so a panicking job cannot poison it.
        self.state.lock().expect("pool state mutex poisoned")
    }
}

/// Decrements the active count when a job ends and wakes the barrier once
/// the pool is quiescent.
struct ActiveGuard<'a> {
    inner: &'a PoolInner,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        state.active -= 1;
        if state.queue.is_empty() && state.active == 0 {
            self.inner.all_idle.notify_all();
        }
    }
}

/// A fixed-size pool of worker threads executing queued jobs in FIFO order.
pub struct WorkerPool {
    inner: Arc<PoolInner>,
    workers: Vec<JoinHandle<()>>,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Spawn a pool with `workers` threads (clamped to at least 1).
    pub fn new(workers: usize) -> Self {
        let inner = Arc::new(PoolInner {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                active: 0,
                shutdown: false,
            }),
            task_ready: Condvar::new(),
            all_idle: Condvar::new(),
        });
        let workers = (0..workers.max(1))
            .map(|index| {
                let inner = Arc::clone(&inner);
                std::thread::Builder::new()
                    .name(format!("thicket-worker-{index}"))
                    .spawn(move || worker_loop(&inner))
                    .expect("failed to spawn worker thread")
            })
            .collect();
        Self { inner, workers }
    }

    /// Number of worker threads the pool was created with.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job for execution.
    ///
    /// Jobs start in submission order. After [`WorkerPool::shutdown`] every
    /// call fails with [`PoolError::ShutDown`].
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) -> Result<(), PoolError> {
        let mut state = self.inner.lock();
        if state.shutdown {
            return Err(PoolError::ShutDown);
        }
        state.queue.push_back(Box::new(job));
        drop(state);
        self.inner.task_ready.notify_one();
        Ok(())
    }

    /// Block until the queue is empty and every worker is idle.
    ///
    /// Jobs queued by other threads while this call is blocked extend the
    /// wait; the barrier releases only on a fully quiescent pool.
    pub fn wait_until_finished(&self) {
        let mut state = self.inner.lock();
        while !state.queue.is_empty() || state.active > 0 {
            state = self
                .inner
                .all_idle
                .wait(state)
                .expect("pool state mutex poisoned");
        }
    }

    /// Stop accepting jobs, drain the queue, and join the workers.
    ///
    /// Already-queued jobs still run; the call returns once every worker has
    /// exited. Idempotent, and also performed on drop.
    pub fn shutdown(&mut self) {
        {
            let mut state = self.inner.lock();
            state.shutdown = true;
        }
        self.inner.task_ready.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(inner: &PoolInner) {
    loop {
        let job = {
            let mut state = inner.lock();
            loop {
                if let Some(job) = state.queue.pop_front() {
                    state.active += 1;
                    break job;
                }
                // Exit only once the queue has drained.
                if state.shutdown {
                    return;
                }
                state = inner
                    .task_ready
                    .wait(state)
                    .expect("pool state mutex poisoned");
            }
        };
        let guard = ActiveGuard { inner };
        // The worker must outlive a panicking job, or a pool of one would
        // strand everything queued behind it. The panic still reports
        // through the panic hook on this thread.
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job));
        drop(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use thicket_geom::{BoundingBox, Vec3};
    use thicket_space::BoxSpace;

    #[test]
    fn single_worker_runs_jobs_in_submission_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut pool = WorkerPool::new(1);
        for i in 0..64 {
            let order = Arc::clone(&order);
            pool.execute(move || order.lock().unwrap().push(i)).unwrap();
        }
        pool.wait_until_finished();
        let seen = order.lock().unwrap().clone();
        assert_eq!(seen, (0..64).collect::<Vec<_>>());
        pool.shutdown();
    }

    #[test]
    fn wait_until_finished_is_a_barrier() {
        let done = Arc::new(Mutex::new(0_usize));
        let pool = WorkerPool::new(4);
        for _ in 0..16 {
            let done = Arc::clone(&done);
            pool.execute(move || {
                std::thread::sleep(Duration::from_millis(5));
                *done.lock().unwrap() += 1;
            })
            .unwrap();
        }
        pool.wait_until_finished();
        assert_eq!(*done.lock().unwrap(), 16);
    }

    #[test]
    fn execute_after_shutdown_is_rejected() {
        let mut pool = WorkerPool::new(2);
        pool.execute(|| {}).unwrap();
        pool.shutdown();
        assert_eq!(pool.execute(|| {}), Err(PoolError::ShutDown));
    }

    #[test]
    fn shutdown_drains_pending_jobs() {
        let done = Arc::new(Mutex::new(0_usize));
        let mut pool = WorkerPool::new(1);
        for _ in 0..8 {
            let done = Arc::clone(&done);
            pool.execute(move || {
                std::thread::sleep(Duration::from_millis(2));
                *done.lock().unwrap() += 1;
            })
            .unwrap();
        }
        pool.shutdown();
        assert_eq!(*done.lock().unwrap(), 8);
    }

    #[test]
    fn zero_workers_is_clamped_to_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.worker_count(), 1);
        let (tx, rx) = mpsc::channel();
        pool.execute(move || tx.send(7).unwrap()).unwrap();
        assert_eq!(rx.recv().unwrap(), 7);
    }

    #[test]
    fn panicking_job_does_not_hang_the_barrier() {
        let pool = WorkerPool::new(2);
        pool.execute(|| panic!("job failure under test")).unwrap();
        let (tx, rx) = mpsc::channel();
        pool.execute(move || tx.send(1).unwrap()).unwrap();
        pool.wait_until_finished();
        assert_eq!(rx.recv().unwrap(), 1);
    }

    #[test]
    fn single_worker_survives_panicking_job() {
        // The only worker must keep draining the queue after a job panics,
        // or everything queued behind the panic would be stranded.
        let pool = WorkerPool::new(1);
        pool.execute(|| panic!("job failure under test")).unwrap();
        let (tx, rx) = mpsc::channel();
        pool.execute(move || tx.send(1).unwrap()).unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Ok(1),
            "queued job must run after the panicking one"
        );
        pool.wait_until_finished();
    }

    #[test]
    fn independent_spaces_build_in_parallel() {
        let pool = WorkerPool::new(4);
        let (tx, rx) = mpsc::channel();
        for lane in 0..8_usize {
            let tx = tx.clone();
            pool.execute(move || {
                let offset = lane as f64 * 100.0;
                let mut space: BoxSpace<BoundingBox> = BoxSpace::new(0.1, 4);
                space.set_items((0..32).map(|i| {
                    let lo = Vec3::new(offset + i as f64, 0.0, 0.0);
                    BoundingBox::new(lo, lo + Vec3::splat(1.5))
                }));
                space.update(|payload, bb| *bb = *payload).unwrap();
                let mut pairs = 0_usize;
                space.overlap_self(|_, _| {
                    pairs += 1;
                    true
                });
                tx.send((lane, pairs)).unwrap();
            })
            .unwrap();
        }
        drop(tx);
        pool.wait_until_finished();
        let results: Vec<(usize, usize)> = rx.iter().collect();
        assert_eq!(results.len(), 8);
        for (_, pairs) in results {
            // Unit-spaced 1.5-unit boxes with 0.1 margin: each overlaps only
            // its immediate neighbor.
            assert_eq!(pairs, 31);
        }
    }
}
