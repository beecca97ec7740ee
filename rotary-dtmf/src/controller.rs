//! Digit decision table.
//!
//! [`DialController::process`] decides what a decoded digit means, given the
//! special-function flag and the speed-dial programming state, in this
//! precedence:
//!
//! | # | Condition | Action |
//! |---|-----------|--------|
//! | 1 | SF and `1` | treat as `*` |
//! | 2 | SF and `2` | treat as `#` |
//! | 3 | SF and `0` | enter programming, or save and leave it |
//! | 4 | programming | choose the slot, or record the digit (auto-save when full) |
//! | 5 | SF and `3`..`9` | play the stored speed-dial number |
//! | 6 | otherwise | send the digit's DTMF tone |
//!
//! The special-function flag is consumed by every call, so it applies to
//! exactly one digit. All feedback is audible: confirmation tunes, a low
//! beep per recorded digit and a long beep for errors.

use crate::constants::{
    CONFIRM_TUNE_MS, DTMF_DURATION_MS, ERROR_BEEP_MS, PROGRAMMING_TUNE_MS,
};
use crate::digit::Digit;
use crate::player::TonePlayer;
use crate::session::{DialSession, Programming};
use crate::speed_dial::{SlotIndex, SlotStorage, SpeedDialStore};
use crate::tone::Tone;

/// What processing a digit did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Sent the DTMF tone for a digit.
    Dialed(Digit),
    /// SF+0: programming mode entered, waiting for the slot digit.
    ProgrammingStarted,
    /// Slot chosen; digits are recorded from now on.
    SlotChosen(SlotIndex),
    /// The slot digit was not 3..9; programming abandoned.
    ProgrammingAborted,
    /// Digit stored in the programming buffer at `position`.
    DigitRecorded {
        /// Digit stored (after `*`/`#` remapping).
        digit: Digit,
        /// Buffer position it went to.
        position: usize,
    },
    /// Programming finished by SF+0 or a full buffer.
    ProgrammingFinished {
        /// Slot written, `None` if no slot had been chosen.
        saved_to: Option<SlotIndex>,
    },
    /// A stored number was played.
    SpeedDialed {
        /// Slot played.
        slot: SlotIndex,
        /// Tones sent.
        digits: usize,
    },
}

/// Interprets decoded digits and owns the speed-dial store.
pub struct DialController<S> {
    store: SpeedDialStore<S>,
}

impl<S: SlotStorage> DialController<S> {
    /// Controller over `storage`.
    pub const fn new(storage: S) -> Self {
        DialController {
            store: SpeedDialStore::new(storage),
        }
    }

    /// Act on one decoded digit.
    ///
    /// Storage failures abort the operation with the long error beep and
    /// are returned; the session is left out of programming mode either way.
    pub fn process<P: TonePlayer>(
        &mut self,
        session: &mut DialSession,
        digit: Digit,
        player: &mut P,
    ) -> Result<Outcome, S::Error> {
        let special = session.take_special_function();

        let digit = match (special, digit.code()) {
            (true, 1) => Digit::STAR,
            (true, 2) => Digit::POUND,
            _ => digit,
        };

        if special && digit == Digit::ZERO {
            if session.programming().is_active() {
                return self.finish_programming(session, player);
            }
            session.start_programming();
            info!("speed dial programming started");
            player.play(Tone::TuneAscending, PROGRAMMING_TUNE_MS);
            player.play(Tone::TuneDescending, PROGRAMMING_TUNE_MS);
            return Ok(Outcome::ProgrammingStarted);
        }

        match session.programming() {
            Programming::ChoosingSlot => match SlotIndex::from_digit(digit) {
                Some(slot) => {
                    session.choose_slot(slot);
                    debug!("programming slot {}", slot.digit());
                    player.play(Tone::TuneAscending, CONFIRM_TUNE_MS);
                    Ok(Outcome::SlotChosen(slot))
                }
                None => {
                    session.abort_programming();
                    warn!("invalid speed dial slot {}", digit.code());
                    player.play(Tone::Beep, ERROR_BEEP_MS);
                    Ok(Outcome::ProgrammingAborted)
                }
            },
            Programming::Recording { .. } => match session.record(digit.code()) {
                Some(position) => {
                    player.play(Tone::BeepLow, DTMF_DURATION_MS);
                    Ok(Outcome::DigitRecorded { digit, position })
                }
                // Buffer full: this digit is dropped and the number saved.
                None => self.finish_programming(session, player),
            },
            Programming::Inactive => {
                if special {
                    if let Some(slot) = SlotIndex::from_digit(digit) {
                        return self.speed_dial(slot, player);
                    }
                }
                player.play(Tone::Dtmf(digit), DTMF_DURATION_MS);
                Ok(Outcome::Dialed(digit))
            }
        }
    }

    /// Leave programming, saving the buffer if a slot was chosen.
    fn finish_programming<P: TonePlayer>(
        &mut self,
        session: &mut DialSession,
        player: &mut P,
    ) -> Result<Outcome, S::Error> {
        let (slot, number) = session.finish_programming();

        if let Some(slot) = slot {
            match self.store.write_slot(slot, &number) {
                Ok(written) => info!("saved slot {} ({} bytes written)", slot.digit(), written),
                Err(err) => {
                    warn!("saving slot {} failed", slot.digit());
                    player.play(Tone::Beep, ERROR_BEEP_MS);
                    return Err(err);
                }
            }
        }

        player.play(Tone::TuneDescending, CONFIRM_TUNE_MS);
        Ok(Outcome::ProgrammingFinished { saved_to: slot })
    }

    /// Play every stored digit of `slot`, each followed by an equal pause.
    fn speed_dial<P: TonePlayer>(&mut self, slot: SlotIndex, player: &mut P) -> Result<Outcome, S::Error> {
        let number = match self.store.read_slot(slot) {
            Ok(number) => number,
            Err(err) => {
                warn!("reading slot {} failed", slot.digit());
                player.play(Tone::Beep, ERROR_BEEP_MS);
                return Err(err);
            }
        };

        let mut digits = 0;
        for digit in number.digits() {
            player.play(Tone::Dtmf(digit), DTMF_DURATION_MS);
            player.pause(DTMF_DURATION_MS);
            digits += 1;
        }
        info!("speed dialed slot {}: {} digits", slot.digit(), digits);
        Ok(Outcome::SpeedDialed { slot, digits })
    }

    /// The speed-dial store.
    pub fn store(&mut self) -> &mut SpeedDialStore<S> {
        &mut self.store
    }

    /// Release the backing storage.
    pub fn free(self) -> S {
        self.store.free()
    }
}
