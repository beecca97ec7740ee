//! Blocking tone playback for the main loop.
//!
//! [`TonePlayer`] is the seam between dialing decisions and sound: the
//! controller asks for tones and pauses, and an implementation makes them
//! audible. [`ToneOutput`] is the real one, writing step widths to the shared
//! [`ToneControl`] and waiting on a [`TickDelay`] while the tick interrupt
//! synthesises.

use crate::delay::{TickDelay, WaitForTick};
use crate::tone::synth::ToneControl;
use crate::tone::Tone;

/// Plays tones to completion.
pub trait TonePlayer {
    /// Sound `tone` for `duration_ms`, then fall silent.
    fn play(&mut self, tone: Tone, duration_ms: u32);

    /// Stay silent for `duration_ms`.
    fn pause(&mut self, duration_ms: u32);
}

impl<P: TonePlayer + ?Sized> TonePlayer for &mut P {
    fn play(&mut self, tone: Tone, duration_ms: u32) {
        (**self).play(tone, duration_ms)
    }

    fn pause(&mut self, duration_ms: u32) {
        (**self).pause(duration_ms)
    }
}

/// [`TonePlayer`] driving the tick-interrupt synthesiser.
pub struct ToneOutput<'a, W> {
    control: &'a ToneControl,
    delay: TickDelay<'a, W>,
}

impl<'a, W: WaitForTick> ToneOutput<'a, W> {
    /// Play through `control`, timing with `delay`.
    pub fn new(control: &'a ToneControl, delay: TickDelay<'a, W>) -> Self {
        ToneOutput { control, delay }
    }

    /// Delay used for timing.
    pub fn delay(&mut self) -> &mut TickDelay<'a, W> {
        &mut self.delay
    }
}

impl<W: WaitForTick> TonePlayer for ToneOutput<'_, W> {
    fn play(&mut self, tone: Tone, duration_ms: u32) {
        trace!("play {} for {} ms", tone, duration_ms);
        for segment in tone.segments(duration_ms) {
            self.control.start(segment.steps);
            self.delay.wait_ms(segment.duration_ms);
        }
        self.control.stop();
    }

    fn pause(&mut self, duration_ms: u32) {
        self.control.stop();
        self.delay.wait_ms(duration_ms);
    }
}
