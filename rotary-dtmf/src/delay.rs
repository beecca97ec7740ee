//! Blocking millisecond waits counted in tick periods.
//!
//! [`TickDelay`] waits by repeatedly handing control to a [`WaitForTick`]
//! implementation until enough ticks have elapsed. On hardware that is a
//! `WFI`, so the core sleeps between timer interrupts; in tests it drives a
//! simulated tick.
//!
//! Accuracy is one tick. Because a millisecond is counted as a whole number
//! of ticks, long waits undercount slightly (15 ticks per ms instead of 15.625).

use crate::constants::{TICKS_PER_MS, US_PER_TICK};
#[cfg(feature = "pwm")]
use crate::constants::NS_PER_TICK;
use crate::time::{ms_to_ticks, TickCounter, Ticks};

/// Suspend the caller until (at least) the next interrupt.
pub trait WaitForTick {
    /// Block until something may have changed, typically the next tick.
    fn wait_for_tick(&mut self);
}

impl<W: WaitForTick + ?Sized> WaitForTick for &mut W {
    fn wait_for_tick(&mut self) {
        (**self).wait_for_tick()
    }
}

/// Delay service built on the shared [`TickCounter`].
///
/// Callable repeatedly in sequence from one context; it must not be used
/// from the tick interrupt itself.
pub struct TickDelay<'a, W> {
    ticks: &'a TickCounter,
    waiter: W,
}

impl<'a, W: WaitForTick> TickDelay<'a, W> {
    /// Wrap a tick counter and a way to wait for it.
    pub fn new(ticks: &'a TickCounter, waiter: W) -> Self {
        TickDelay { ticks, waiter }
    }

    /// Block for `count` tick periods.
    pub fn wait_ticks(&mut self, count: Ticks) {
        let start = self.ticks.now();
        while self.ticks.elapsed_since(start) < count {
            self.waiter.wait_for_tick();
        }
    }

    /// Block for approximately `ms` milliseconds.
    pub fn wait_ms(&mut self, ms: u32) {
        self.wait_ticks(ms_to_ticks(ms));
    }

    /// Tick counter this delay is measured against.
    pub fn ticks(&self) -> &'a TickCounter {
        self.ticks
    }

    /// Release the waiter.
    pub fn free(self) -> W {
        self.waiter
    }
}

/// Whole ticks in `us` microseconds.
#[inline]
pub const fn us_to_ticks(us: u32) -> Ticks {
    us / US_PER_TICK
}

#[cfg(feature = "pwm")]
impl<W: WaitForTick> embedded_hal::delay::DelayNs for TickDelay<'_, W> {
    fn delay_ns(&mut self, ns: u32) {
        self.wait_ticks(ns / NS_PER_TICK);
    }

    fn delay_us(&mut self, us: u32) {
        self.wait_ticks(us_to_ticks(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait_ms(ms);
    }
}

const _: () = assert!(TICKS_PER_MS > 0, "tick rate must be at least 1 kHz");
