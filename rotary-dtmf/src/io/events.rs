//! Dial edges as discrete, time-stamped events.
//!
//! The edge interrupt only records what happened and when; all
//! interpretation happens later in [`PulseDecoder`](crate::pulse::PulseDecoder).

use crate::constants::EVENT_QUEUE_SLOTS;
use crate::time::Ticks;

use super::spsc::SpscQueue;

/// An edge on one of the two dial contacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DialEvent {
    /// The off-normal contact closed: the dial left its rest position.
    RotationStarted,
    /// One break of the pulse contact.
    Pulse,
    /// The dial returned to rest.
    RotationEnded,
}

impl DialEvent {
    /// Event for a level change of the rotation-in-progress input.
    ///
    /// The contact is active low: a low level means the dial is turning.
    #[inline]
    pub const fn from_rotation_level(high: bool) -> Self {
        if high {
            DialEvent::RotationEnded
        } else {
            DialEvent::RotationStarted
        }
    }
}

/// A [`DialEvent`] stamped with the tick count at which it was seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedEvent {
    /// Tick count when the edge interrupt ran.
    pub at: Ticks,
    /// What happened.
    pub event: DialEvent,
}

impl TimedEvent {
    /// Stamp `event` with `at`.
    pub const fn new(at: Ticks, event: DialEvent) -> Self {
        TimedEvent { at, event }
    }
}

/// Edge interrupt → idle loop channel.
pub type EventQueue = SpscQueue<TimedEvent, EVENT_QUEUE_SLOTS>;
