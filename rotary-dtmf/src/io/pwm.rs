//! PWM audio output.
//!
//! [`PwmOutput`] turns each synthesised sample into a duty cycle on an
//! embedded-hal [`SetDutyCycle`] channel. Samples are 8-bit (the sum of a
//! full-scale and a 3/4-scale 7-bit sine), mapped onto the channel's full
//! duty range as `sample / 255`.
//!
//! ## Usage with RTIC
//!
//! ```ignore
//! // In the periodic timer ISR:
//! let sample = synth.tick(&TONE);
//! pwm.emit(sample).ok();
//! TICKS.advance();
//! ```

use embedded_hal::pwm::SetDutyCycle;

/// Full-scale sample value for the duty mapping.
pub const SAMPLE_FULL_SCALE: u16 = 255;

/// Sample sink driving a PWM channel.
pub struct PwmOutput<P> {
    channel: P,
    enabled: bool,
}

impl<P: SetDutyCycle> PwmOutput<P> {
    /// Take ownership of `channel` and force it off.
    pub fn new(mut channel: P) -> Result<Self, P::Error> {
        channel.set_duty_cycle_fully_off()?;
        Ok(PwmOutput {
            channel,
            enabled: false,
        })
    }

    /// Output one tick's sample, or switch the output off for `None`.
    #[inline]
    pub fn emit(&mut self, sample: Option<u8>) -> Result<(), P::Error> {
        match sample {
            Some(sample) => self.write(sample),
            None => self.silence(),
        }
    }

    /// Set the duty cycle for one sample.
    #[inline]
    pub fn write(&mut self, sample: u8) -> Result<(), P::Error> {
        self.enabled = true;
        self.channel
            .set_duty_cycle_fraction(sample as u16, SAMPLE_FULL_SCALE)
    }

    /// Drive the output fully off. Repeated calls while off are free.
    #[inline]
    pub fn silence(&mut self) -> Result<(), P::Error> {
        if self.enabled {
            self.enabled = false;
            self.channel.set_duty_cycle_fully_off()?;
        }
        Ok(())
    }

    /// Whether the last call drove a sample.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Release the PWM channel.
    pub fn free(self) -> P {
        self.channel
    }
}
