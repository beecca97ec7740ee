//! Rotary-dial pulse decoder.
//!
//! Turns the time-stamped edges of the two dial contacts into at most one
//! digit per rotation, and detects the special-function hold.
//!
//! ## States
//!
//! ```text
//!               RotationStarted
//!   ┌─────────┐ ─────────────────► ┌──────────────────────────┐
//!   │ Resting │                    │ Rotating { since, armed }│◄─┐ Pulse
//!   └─────────┘ ◄───────────────── └──────────────────────────┘──┘ (disarms)
//!                RotationEnded
//!                (1..=10 pulses -> digit, otherwise discarded)
//! ```
//!
//! While rotating with the hold timer armed, [`PulseDecoder::poll_hold`]
//! selects the special function once [`SF_HOLD_TICKS`] pass without a pulse.
//! The hold fires at most once per rotation and any pulse disarms it for
//! good.

use crate::digit::Digit;
use crate::io::events::{DialEvent, TimedEvent};
use crate::session::DialSession;
use crate::time::{ticks_since, Ticks, SF_HOLD_TICKS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Resting,
    Rotating {
        /// Tick at which the dial left rest.
        since: Ticks,
        /// Hold detection still pending.
        armed: bool,
    },
}

/// What a rotation produced when the dial came back to rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationResult {
    /// A valid pulse count, decoded.
    Digit(Digit),
    /// Zero or more than ten pulses: no intentional dial.
    Discarded {
        /// Pulses that were counted.
        pulses: u8,
    },
}

/// Pulse-counting state machine.
pub struct PulseDecoder {
    phase: Phase,
}

impl PulseDecoder {
    /// A decoder with the dial at rest.
    pub const fn new() -> Self {
        PulseDecoder {
            phase: Phase::Resting,
        }
    }

    /// Feed one edge.
    ///
    /// Returns a result exactly once per rotation, on the edge that brings
    /// the dial back to rest. The caller must return the session to rest
    /// after acting on it.
    pub fn on_event(&mut self, session: &mut DialSession, event: TimedEvent) -> Option<RotationResult> {
        match (self.phase, event.event) {
            (Phase::Resting, DialEvent::RotationStarted) => {
                trace!("rotation started at {}", event.at);
                self.phase = Phase::Rotating {
                    since: event.at,
                    armed: true,
                };
                session.begin_rotation();
                None
            }
            (Phase::Rotating { since, .. }, DialEvent::Pulse) => {
                self.phase = Phase::Rotating { since, armed: false };
                session.count_pulse();
                None
            }
            (Phase::Rotating { .. }, DialEvent::RotationEnded) => {
                self.phase = Phase::Resting;
                let pulses = session.pulses().unwrap_or(0);
                let result = match Digit::from_pulses(pulses) {
                    Some(digit) => RotationResult::Digit(digit),
                    None => RotationResult::Discarded { pulses },
                };
                debug!("rotation ended: {}", result);
                Some(result)
            }
            // Stray pulses at rest, repeated starts and ends: nothing to do.
            _ => None,
        }
    }

    /// Check the hold timer against `now`.
    ///
    /// Returns `true` exactly once, when the special function becomes
    /// selected; the caller sounds the confirmation beep.
    pub fn poll_hold(&mut self, session: &mut DialSession, now: Ticks) -> bool {
        match self.phase {
            Phase::Rotating { since, armed: true } if ticks_since(since, now) >= SF_HOLD_TICKS => {
                self.phase = Phase::Rotating { since, armed: false };
                session.select_special_function();
                info!("special function selected");
                true
            }
            _ => false,
        }
    }

    /// Whether the dial is away from rest.
    pub fn is_rotating(&self) -> bool {
        matches!(self.phase, Phase::Rotating { .. })
    }

    /// Whether hold detection is pending (the tick must keep running).
    pub fn is_hold_armed(&self) -> bool {
        matches!(self.phase, Phase::Rotating { armed: true, .. })
    }
}

impl Default for PulseDecoder {
    fn default() -> Self {
        Self::new()
    }
}
