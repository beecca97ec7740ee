//! Main-loop driver.
//!
//! [`Dialer`] owns everything the idle context works on: the dial session,
//! the pulse decoder, the controller and the tone player. The firmware's
//! idle loop calls [`Dialer::service`] after every wake-up and then sleeps as
//! deeply as the returned [`SleepDepth`] allows.

use crate::constants::SF_BEEP_MS;
use crate::controller::{DialController, Outcome};
use crate::digit::Digit;
use crate::io::events::{EventQueue, TimedEvent};
use crate::player::TonePlayer;
use crate::pulse::{PulseDecoder, RotationResult};
use crate::session::DialSession;
use crate::speed_dial::SlotStorage;
use crate::time::{ticks_since, Ticks};
use crate::tone::Tone;

/// How deeply the processor may sleep until the next interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepDepth {
    /// Hold detection is pending: the tick timer must keep running.
    Idle,
    /// Nothing is timed: only a dial edge needs to wake us.
    PowerDown,
}

/// The later of two tick stamps, across counter wrap.
fn latest(a: Ticks, b: Ticks) -> Ticks {
    if ticks_since(a, b) <= Ticks::MAX / 2 {
        b
    } else {
        a
    }
}

/// Idle-context owner of the dialing state.
pub struct Dialer<S, P> {
    session: DialSession,
    decoder: PulseDecoder,
    controller: DialController<S>,
    player: P,
}

impl<S: SlotStorage, P: TonePlayer> Dialer<S, P> {
    /// Dialer at rest, persisting speed dials to `storage` and sounding
    /// tones through `player`.
    pub fn new(storage: S, player: P) -> Self {
        Dialer {
            session: DialSession::new(),
            decoder: PulseDecoder::new(),
            controller: DialController::new(storage),
            player,
        }
    }

    /// Handle one dial edge.
    ///
    /// The hold timer is checked against the edge's timestamp first, so a
    /// hold that elapsed before a late-processed pulse still counts and a
    /// pulse that came earlier still cancels it. When the edge ends a
    /// rotation the decoded digit is acted on and the session returns to
    /// rest, whatever the outcome.
    pub fn handle(&mut self, event: TimedEvent) -> Result<Option<Outcome>, S::Error> {
        self.check_hold(event.at);

        let Some(result) = self.decoder.on_event(&mut self.session, event) else {
            return Ok(None);
        };

        let outcome = match result {
            RotationResult::Digit(digit) => self.dial(digit).map(Some),
            RotationResult::Discarded { .. } => Ok(None),
        };
        self.session.rest();
        outcome
    }

    /// Drain `events`, then run hold detection at `now`.
    ///
    /// `now` must be read before the queue is drained. Playing tones while
    /// draining takes time; hold detection afterwards uses the newer of
    /// `now` and the last event handled, which no unseen edge can precede.
    pub fn service(&mut self, events: &EventQueue, now: Ticks) -> Result<SleepDepth, S::Error> {
        let mut now = now;
        while let Some(event) = events.pop() {
            now = latest(now, event.at);
            self.handle(event)?;
        }
        self.check_hold(now);
        Ok(self.sleep_depth())
    }

    /// Sleep depth for the current state.
    pub fn sleep_depth(&self) -> SleepDepth {
        if self.decoder.is_hold_armed() {
            SleepDepth::Idle
        } else {
            SleepDepth::PowerDown
        }
    }

    fn check_hold(&mut self, now: Ticks) {
        if self.decoder.poll_hold(&mut self.session, now) {
            self.player.play(Tone::Beep, SF_BEEP_MS);
        }
    }

    fn dial(&mut self, digit: Digit) -> Result<Outcome, S::Error> {
        let outcome = self.controller.process(&mut self.session, digit, &mut self.player)?;
        debug!("digit {}: {}", digit, outcome);
        Ok(outcome)
    }

    /// Current dial session.
    pub fn session(&self) -> &DialSession {
        &self.session
    }

    /// The pulse decoder.
    pub fn decoder(&self) -> &PulseDecoder {
        &self.decoder
    }

    /// The controller, for direct speed-dial store access.
    pub fn controller(&mut self) -> &mut DialController<S> {
        &mut self.controller
    }

    /// The tone player.
    pub fn player(&mut self) -> &mut P {
        &mut self.player
    }

    /// Release the storage and the player.
    pub fn free(self) -> (S, P) {
        (self.controller.free(), self.player)
    }
}
