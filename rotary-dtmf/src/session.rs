//! The live dialing session.
//!
//! One [`DialSession`] exists for the lifetime of the device. The rotation
//! fields (pulse count, special-function flag) return to idle defaults every
//! time the dial comes to rest; the speed-dial programming state survives
//! across rotations until the number is saved or programming is aborted.

use crate::speed_dial::{SlotIndex, SpeedDialNumber};

/// Speed-dial programming progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Programming {
    /// Normal dialing.
    #[default]
    Inactive,
    /// SF+0 was dialed; the next digit picks the slot.
    ChoosingSlot,
    /// Recording digits for `slot`; `next` is the buffer position to fill.
    Recording {
        /// Slot the number will be saved to.
        slot: SlotIndex,
        /// Next free position in the buffer.
        next: usize,
    },
}

impl Programming {
    /// True in any programming phase.
    #[inline]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Programming::Inactive)
    }
}

/// Dialing state shared by the pulse decoder and the controller.
#[derive(Clone, Debug)]
pub struct DialSession {
    /// Pulses counted in the current rotation; `None` while at rest.
    pulses: Option<u8>,
    /// The dial was held without pulses past the threshold this rotation.
    special_function: bool,
    /// Speed-dial programming state.
    programming: Programming,
    /// Number being recorded.
    buffer: SpeedDialNumber,
}

impl DialSession {
    /// Idle session: no rotation, no special function, not programming.
    pub const fn new() -> Self {
        DialSession {
            pulses: None,
            special_function: false,
            programming: Programming::Inactive,
            buffer: SpeedDialNumber::EMPTY,
        }
    }

    // ── Rotation ──────────────────────────────────────────────────────

    /// The dial left rest: start counting from zero.
    pub fn begin_rotation(&mut self) {
        self.pulses = Some(0);
        self.special_function = false;
    }

    /// Count one pulse. Saturates, so a runaway count stays invalid.
    pub fn count_pulse(&mut self) {
        if let Some(count) = self.pulses.as_mut() {
            *count = count.saturating_add(1);
        }
    }

    /// Pulses counted so far, `None` while at rest.
    #[inline]
    pub fn pulses(&self) -> Option<u8> {
        self.pulses
    }

    /// Mark the special function as selected for this rotation.
    pub fn select_special_function(&mut self) {
        self.special_function = true;
    }

    /// Whether the special function is selected.
    #[inline]
    pub fn special_function_selected(&self) -> bool {
        self.special_function
    }

    /// Consume the special-function flag (it applies to one digit only).
    pub fn take_special_function(&mut self) -> bool {
        core::mem::replace(&mut self.special_function, false)
    }

    /// Back to rest: drop the pulse count and the special-function flag.
    pub fn rest(&mut self) {
        self.pulses = None;
        self.special_function = false;
    }

    // ── Speed-dial programming ────────────────────────────────────────

    /// Current programming state.
    #[inline]
    pub fn programming(&self) -> Programming {
        self.programming
    }

    /// Enter programming: clear the buffer and wait for a slot.
    pub fn start_programming(&mut self) {
        self.buffer = SpeedDialNumber::EMPTY;
        self.programming = Programming::ChoosingSlot;
    }

    /// Choose the slot being programmed.
    pub fn choose_slot(&mut self, slot: SlotIndex) {
        self.programming = Programming::Recording { slot, next: 0 };
    }

    /// Store `code` at the next position and advance. Returns the position
    /// written, or `None` when not recording or the buffer is full.
    pub fn record(&mut self, code: u8) -> Option<usize> {
        let Programming::Recording { next, .. } = &mut self.programming else {
            return None;
        };
        if !self.buffer.set(*next, code) {
            return None;
        }
        let written = *next;
        *next += 1;
        Some(written)
    }

    /// Leave programming, returning the slot (if one was chosen) and the
    /// recorded number.
    pub fn finish_programming(&mut self) -> (Option<SlotIndex>, SpeedDialNumber) {
        let slot = match self.programming {
            Programming::Recording { slot, .. } => Some(slot),
            _ => None,
        };
        self.programming = Programming::Inactive;
        (slot, self.buffer)
    }

    /// Leave programming without saving.
    pub fn abort_programming(&mut self) {
        self.programming = Programming::Inactive;
    }

    /// Next buffer position while programming (`Some(0)` while choosing the
    /// slot), `None` when not programming.
    pub fn speed_dial_digit_index(&self) -> Option<usize> {
        match self.programming {
            Programming::Inactive => None,
            Programming::ChoosingSlot => Some(0),
            Programming::Recording { next, .. } => Some(next),
        }
    }

    /// Slot being programmed, once chosen.
    pub fn speed_dial_slot(&self) -> Option<SlotIndex> {
        match self.programming {
            Programming::Recording { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Number recorded so far.
    pub fn buffer(&self) -> &SpeedDialNumber {
        &self.buffer
    }
}

impl Default for DialSession {
    fn default() -> Self {
        Self::new()
    }
}
