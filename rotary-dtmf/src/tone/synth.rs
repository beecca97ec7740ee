//! Dual-tone synthesiser using two phase accumulators and wavetable lookup.
//!
//! Split across the two execution contexts:
//!
//! - [`ToneControl`] is written by the main loop to start and stop tones. It
//!   packs both step widths into one `AtomicU16`, so the tick interrupt can
//!   never observe tone A from one digit paired with tone B from another.
//! - [`ToneSynth`] is owned by the tick interrupt and produces one sample per
//!   tick in constant time.
//!
//! The output sample is `sinA + sinB - sinB / 4`: the high tone at full scale,
//! the low tone at 3/4, as DTMF pre-emphasis asks. The sum peaks at
//! `127 + 96 = 223`, inside an 8-bit PWM duty.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::dsp::{PhaseAccumulator, SINE_TABLE};
use crate::tone::StepWidths;

/// Largest sample [`ToneSynth`] can produce.
pub const MAX_SAMPLE: u8 = 127 + (127 - (127 >> 2));

/// Step-width pair shared between the main loop and the tick interrupt.
///
/// Zero means stopped. Stores use `Release` and loads `Acquire`, so the tick
/// handler sees a tone's steps no later than the main loop's next wait.
pub struct ToneControl {
    word: AtomicU16,
}

impl ToneControl {
    /// A stopped control, usable in a `static`.
    pub const fn new() -> Self {
        ToneControl {
            word: AtomicU16::new(0),
        }
    }

    /// Start (or retune) output with `steps`. Silent steps stop output.
    #[inline]
    pub fn start(&self, steps: StepWidths) {
        let word = (steps.a as u16) | ((steps.b as u16) << 8);
        self.word.store(word, Ordering::Release);
    }

    /// Zero both step widths and silence the output.
    #[inline]
    pub fn stop(&self) {
        self.word.store(0, Ordering::Release);
    }

    /// Current step widths, `None` while stopped.
    #[inline]
    pub fn current(&self) -> Option<StepWidths> {
        match self.word.load(Ordering::Acquire) {
            0 => None,
            word => Some(StepWidths {
                a: word as u8,
                b: (word >> 8) as u8,
            }),
        }
    }

    /// True while a tone is being output.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.word.load(Ordering::Acquire) != 0
    }
}

impl Default for ToneControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick dual-tone generator.
///
/// Starting from silence resets both accumulators, so a tone's sample
/// sequence depends only on its step widths and the ticks since it started.
/// Retuning while running (the notes of a tune) keeps the phase continuous.
pub struct ToneSynth {
    /// High-tone accumulator.
    a: PhaseAccumulator,
    /// Low-tone accumulator.
    b: PhaseAccumulator,
    /// Whether the previous tick produced output.
    running: bool,
}

impl ToneSynth {
    /// A silent synthesiser at phase zero.
    pub const fn new() -> Self {
        ToneSynth {
            a: PhaseAccumulator::new(),
            b: PhaseAccumulator::new(),
            running: false,
        }
    }

    /// Run one tick against the shared control.
    ///
    /// Returns the sample to output, or `None` when the output must be
    /// switched off.
    #[inline]
    pub fn tick(&mut self, control: &ToneControl) -> Option<u8> {
        self.tick_steps(control.current())
    }

    /// Run one tick with explicit step widths.
    #[inline]
    pub fn tick_steps(&mut self, steps: Option<StepWidths>) -> Option<u8> {
        match steps {
            Some(steps) if !steps.is_silent() => {
                if !self.running {
                    self.a.reset();
                    self.b.reset();
                    self.running = true;
                }
                Some(self.next_sample(steps))
            }
            _ => {
                self.running = false;
                None
            }
        }
    }

    /// Advance both accumulators and combine the two table lookups.
    #[inline(always)]
    fn next_sample(&mut self, steps: StepWidths) -> u8 {
        let sin_a = SINE_TABLE[self.a.advance(steps.a)];

        // Tone B is optional; skip its accumulator entirely for single tones.
        let sin_b = if steps.b > 0 {
            SINE_TABLE[self.b.advance(steps.b)]
        } else {
            0
        };

        sin_a + (sin_b - (sin_b >> 2))
    }

    /// Whether the last tick produced output.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for ToneSynth {
    fn default() -> Self {
        Self::new()
    }
}
