//! Tick counting: the single time base for synthesis, delays and hold detection.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::constants::{SF_HOLD_MS, TICKS_PER_MS};

/// A point in time or a span, in tick periods. Wraps after ~76 hours at
/// 15 625 Hz; always compare with [`ticks_since`].
pub type Ticks = u32;

/// Special-function hold threshold in ticks.
pub const SF_HOLD_TICKS: Ticks = ms_to_ticks(SF_HOLD_MS);

/// Convert milliseconds to whole ticks.
#[inline]
pub const fn ms_to_ticks(ms: u32) -> Ticks {
    ms.saturating_mul(TICKS_PER_MS)
}

/// Ticks elapsed from `start` to `now`, correct across counter wrap.
#[inline]
pub const fn ticks_since(start: Ticks, now: Ticks) -> Ticks {
    now.wrapping_sub(start)
}

/// Free-running tick counter.
///
/// Only the tick interrupt calls [`advance`](Self::advance); every other
/// context just reads it.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    /// A counter at zero, usable in a `static`.
    pub const fn new() -> Self {
        TickCounter {
            ticks: AtomicU32::new(0),
        }
    }

    /// Count one tick. Call once per timer period.
    #[inline(always)]
    pub fn advance(&self) {
        // Single writer, so load + store cannot lose a tick.
        let now = self.ticks.load(Ordering::Relaxed);
        self.ticks.store(now.wrapping_add(1), Ordering::Release);
    }

    /// Current tick count.
    #[inline]
    pub fn now(&self) -> Ticks {
        self.ticks.load(Ordering::Acquire)
    }

    /// Ticks elapsed since `start`.
    #[inline]
    pub fn elapsed_since(&self, start: Ticks) -> Ticks {
        ticks_since(start, self.now())
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}
