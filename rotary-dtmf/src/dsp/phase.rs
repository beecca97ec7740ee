//! Extended-precision phase accumulator.
//!
//! The accumulator is a wrapping `u16` in fixed point: the low
//! [`PHASE_FRACTION_BITS`] bits are sub-sample phase and the bits above them
//! index the [`SINE_TABLE`](super::SINE_TABLE). Carrying the fraction gives
//! eight times finer frequency resolution than stepping whole table entries.
//!
//! ```text
//!  15                    3 2   0
//! ┌───────────────────────┬─────┐
//! │ table index (mod 128) │ frac│
//! └───────────────────────┴─────┘
//! index = ((acc + 4) >> 3) & 127
//! ```
//!
//! Adding half an index step (`4`) before the shift rounds to the nearest
//! entry instead of truncating. A full `u16` turn is a whole number of table
//! periods, so wrapping never introduces a phase jump.

use crate::constants::{PHASE_FRACTION_BITS, SINE_TABLE_SIZE};

/// Half of one table step in accumulator units (round-to-nearest offset).
pub const ROUNDING_OFFSET: u16 = 1 << (PHASE_FRACTION_BITS - 1);

/// Mask applied to the shifted accumulator to stay inside the table.
pub const INDEX_MASK: u16 = (SINE_TABLE_SIZE - 1) as u16;

/// Phase accumulator for one tone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseAccumulator(u16);

impl PhaseAccumulator {
    /// Accumulator at phase zero.
    pub const fn new() -> Self {
        PhaseAccumulator(0)
    }

    /// Raw accumulator value (index and fraction).
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Advance by `step` and return the table index for the new phase.
    #[inline(always)]
    pub fn advance(&mut self, step: u8) -> usize {
        self.0 = self.0.wrapping_add(step as u16);
        self.index()
    }

    /// Table index for the current phase, rounded to nearest.
    #[inline(always)]
    pub const fn index(self) -> usize {
        ((self.0.wrapping_add(ROUNDING_OFFSET) >> PHASE_FRACTION_BITS) & INDEX_MASK) as usize
    }

    /// Return to phase zero.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}
