//! Lock-free single-producer single-consumer (SPSC) ring buffer.
//!
//! Carries dial edges from the edge interrupt to the idle loop. Uses atomic
//! indices, so neither side ever masks interrupts.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`push()`](SpscQueue::push) (the "producer").
//! - Only ONE context may call [`pop()`](SpscQueue::pop) (the "consumer").
//! - The two may preempt each other freely.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// A lock-free single-producer single-consumer (SPSC) queue.
///
/// The usable capacity is `N - 1` (one slot is reserved for full/empty
/// disambiguation, as in Lamport's queue). Rejected pushes are counted so the
/// consumer can report lost items.
pub struct SpscQueue<T, const N: usize> {
    buffer: [UnsafeCell<MaybeUninit<T>>; N],
    /// Write position (only modified by the producer).
    head: AtomicUsize,
    /// Read position (only modified by the consumer).
    tail: AtomicUsize,
    /// Pushes rejected because the queue was full (only modified by the producer).
    overflows: AtomicU32,
}

// SAFETY: values cross from the producer context to the consumer context, so
// T must be Send. head/tail are each written by one side only and the
// Acquire/Release pairs order the slot accesses around them.
unsafe impl<T: Send, const N: usize> Sync for SpscQueue<T, N> {}
unsafe impl<T: Send, const N: usize> Send for SpscQueue<T, N> {}

impl<T, const N: usize> SpscQueue<T, N> {
    /// Create a new empty queue, usable in a `static`.
    ///
    /// # Panics
    ///
    /// At compile time when `N < 2`.
    pub const fn new() -> Self {
        assert!(N >= 2, "SPSC queue must have at least 2 slots (1 usable)");

        SpscQueue {
            // SAFETY: an array of MaybeUninit is valid uninitialised, and
            // UnsafeCell does not change validity.
            buffer: unsafe {
                MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init()
            },
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overflows: AtomicU32::new(0),
        }
    }

    /// Push a value (producer side).
    ///
    /// Returns `Err(val)` if the queue is full, handing the value back.
    pub fn push(&self, val: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % N;

        if next_head == self.tail.load(Ordering::Acquire) {
            let lost = self.overflows.load(Ordering::Relaxed);
            self.overflows.store(lost.saturating_add(1), Ordering::Relaxed);
            return Err(val);
        }

        // SAFETY: only the producer advances head, and next_head != tail
        // means the consumer is not reading this slot.
        unsafe {
            (*self.buffer[head].get()).write(val);
        }

        self.head.store(next_head, Ordering::Release);
        Ok(())
    }

    /// Pop the oldest value (consumer side), `None` when empty.
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: only the consumer advances tail, and tail != head means the
        // producer finished writing this slot before publishing head.
        let val = unsafe { (*self.buffer[tail].get()).assume_init_read() };

        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(val)
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    /// Check if the queue is full.
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % N == tail
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }

    /// Usable capacity (`N - 1`).
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Total pushes rejected since creation.
    pub fn overflows(&self) -> u32 {
        self.overflows.load(Ordering::Relaxed)
    }
}

impl<T, const N: usize> Drop for SpscQueue<T, N> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}
