// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular-buffer FIFO used as the traversal substrate for all queries.

use alloc::vec::Vec;

/// A growable circular-buffer FIFO.
///
/// [`FastQueue::enqueue`] never fails: when the buffer is full its capacity
/// doubles, copying the two wrap segments separately so FIFO order survives
/// the move. [`FastQueue::dequeue`] is an intentionally thin fast path that
/// panics on an empty queue; callers check [`FastQueue::is_empty`] first.
pub struct FastQueue<T> {
    buf: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> Default for FastQueue<T> {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}

impl<T> core::fmt::Debug for FastQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FastQueue")
            .field("len", &self.len)
            .field("capacity", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl<T> FastQueue<T> {
    /// Create an empty queue with room for `capacity` elements before the
    /// first grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        buf.resize_with(capacity, || None);
        Self {
            buf,
            head: 0,
            len: 0,
        }
    }

    /// Number of queued elements.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the queue holds no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop all queued elements, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in &mut self.buf {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Append an element at the back, growing as needed.
    pub fn enqueue(&mut self, value: T) {
        if self.len == self.buf.len() {
            self.grow();
        }
        let tail = (self.head + self.len) % self.buf.len();
        self.buf[tail] = Some(value);
        self.len += 1;
    }

    /// Remove and return the front element.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    pub fn dequeue(&mut self) -> T {
        assert!(self.len > 0, "dequeue from an empty FastQueue");
        let value = self.buf[self.head].take();
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        value.expect("queued slot must be occupied")
    }

    /// Double the backing buffer, re-packing the live elements at the front.
    ///
    /// The live region can wrap around the end of the old buffer, so it is
    /// copied as two segments: `head..` up to the buffer end, then the
    /// wrapped remainder from the start.
    fn grow(&mut self) {
        let cap = self.buf.len();
        let new_cap = (cap * 2).max(4);
        let mut new_buf: Vec<Option<T>> = Vec::new();
        new_buf.resize_with(new_cap, || None);
        let straight = self.len.min(cap - self.head);
        for i in 0..straight {
            new_buf[i] = self.buf[self.head + i].take();
        }
        for i in straight..self.len {
            new_buf[i] = self.buf[i - straight].take();
        }
        self.buf = new_buf;
        self.head = 0;
    }
}
