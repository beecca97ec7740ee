//! Rotary dial pulse-to-tone converter.
//!
//! Counts the pulses of a rotary dial and plays the matching DTMF tone pair
//! on a PWM pin, so an old rotary phone can dial on a tone-only line. Hold
//! the dial off-normal for two seconds before releasing it to reach the
//! special functions (`*`, `#`, speed dial and speed-dial programming).
//!
//! Hardware: Teensy 4.1, dial contacts to ground, RC low-pass on the output.
//!
//! Execution contexts:
//! ```text
//!   PIT ch0 @ 15 625 Hz (prio 3) ── ToneSynth ──► FlexPWM2 SM2 A (p6)
//!   GPIO4 edges (prio 2) ─────────── EventQueue ──► idle: Dialer::service
//! ```
//!
//! Pins:
//!   p2: rotation in progress (active low, both edges)
//!   p3: pulse contact (falling edge)
//!   p6: FLEXPWM2_PWMA02 audio out

#![no_std]
#![no_main]

use teensy4_panic as _;
use defmt_rtt as _;

use teensy4_bsp as bsp;

use bsp::hal::flexpwm;
use rotary_dtmf::delay::WaitForTick;
use rotary_dtmf::{EventQueue, TickCounter, ToneControl};

/// PWM counter period: one count per 8-bit sample step.
const PWM_PERIOD: u16 = 255;

// ── Cross-context state ──────────────────────────────────────────────

/// Tick count, written by the PIT ISR only.
static TICKS: TickCounter = TickCounter::new();
/// Step widths requested by the idle loop, read by the PIT ISR.
static TONE: ToneControl = ToneControl::new();
/// Dial edges from the GPIO ISR to the idle loop.
static EVENTS: EventQueue = EventQueue::new();

// ── Tick wait for the delay service ──────────────────────────────────

/// Sleeps until the next interrupt; the PIT guarantees one per tick.
struct Wfi;

impl WaitForTick for Wfi {
    fn wait_for_tick(&mut self) {
        cortex_m::asm::wfi();
    }
}

// ── FlexPWM channel (implements embedded-hal 1.0) ────────────────────

/// Output A of FlexPWM2 submodule 2 as a [`SetDutyCycle`] channel.
///
/// The submodule counts `0..=PWM_PERIOD` off the IPG clock; output A turns
/// on at zero and off at the duty value.
///
/// [`SetDutyCycle`]: embedded_hal::pwm::SetDutyCycle
struct FlexPwmDuty {
    pwm: flexpwm::Pwm<2>,
    sm: flexpwm::Submodule<2, 2>,
    out: flexpwm::Output<bsp::pins::t41::P6>,
}

impl FlexPwmDuty {
    fn new(
        mut pwm: flexpwm::Pwm<2>,
        mut sm: flexpwm::Submodule<2, 2>,
        pin: bsp::pins::t41::P6,
    ) -> Self {
        sm.set_debug_enable(true);
        sm.set_wait_enable(true);
        sm.set_clock_select(flexpwm::ClockSelect::Ipg);
        sm.set_prescaler(flexpwm::Prescaler::Prescaler1);
        sm.set_pair_operation(flexpwm::PairOperation::Independent);
        sm.set_load_mode(flexpwm::LoadMode::reload_full());
        sm.set_load_frequency(1);
        sm.set_value(flexpwm::FULL_RELOAD_VALUE_REGISTER, PWM_PERIOD as i16);

        let out = flexpwm::Output::new_a(pin);
        out.set_turn_on(&sm, 0);
        out.set_turn_off(&sm, 0);
        out.set_output_enable(&mut pwm, true);

        sm.set_load_ok(&mut pwm);
        sm.set_running(&mut pwm, true);

        FlexPwmDuty { pwm, sm, out }
    }
}

impl embedded_hal::pwm::ErrorType for FlexPwmDuty {
    type Error = core::convert::Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for FlexPwmDuty {
    fn max_duty_cycle(&self) -> u16 {
        PWM_PERIOD
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.out.set_turn_off(&self.sm, duty.min(PWM_PERIOD) as i16);
        self.sm.set_load_ok(&mut self.pwm);
        Ok(())
    }
}

#[rtic::app(device = teensy4_bsp, peripherals = true)]
mod app {
    use super::{FlexPwmDuty, Wfi, EVENTS, TICKS, TONE};
    use bsp::board;
    use bsp::hal;
    use teensy4_bsp as bsp;

    use hal::gpio::{Input, Trigger};
    use hal::iomuxc;

    use rotary_dtmf::constants::TICK_RATE_HZ;
    use rotary_dtmf::delay::TickDelay;
    use rotary_dtmf::io::pwm::PwmOutput;
    use rotary_dtmf::player::ToneOutput;
    use rotary_dtmf::{DialEvent, Dialer, MemoryStorage, TimedEvent, ToneSynth};

    /// Dial contacts switch to ground.
    const DIAL_PIN_CONFIG: iomuxc::Config = iomuxc::Config::zero()
        .set_pull_keeper(Some(iomuxc::PullKeeper::Pullup100k))
        .set_hysteresis(iomuxc::Hysteresis::Enabled);

    // TODO: persist speed dials in the FlexSPI flash; RAM storage is lost at power-off.
    type PulseDialer = Dialer<MemoryStorage, ToneOutput<'static, Wfi>>;

    // ── RTIC resources ───────────────────────────────────────────────

    #[local]
    struct Local {
        pit: hal::pit::Pit<0>,
        synth: ToneSynth,
        output: PwmOutput<FlexPwmDuty>,
        dial: Input<bsp::pins::t41::P2>,
        pulse: Input<bsp::pins::t41::P3>,
        dialer: PulseDialer,
    }

    #[shared]
    struct Shared {}

    // ── Init ─────────────────────────────────────────────────────────

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let board::Resources {
            mut pins,
            mut gpio4,
            pit: (mut pit, _, _, _),
            flexpwm2: (pwm, (_, _, sm2, _)),
            ..
        } = board::t41(cx.device);

        // ── Audio output, silent before the first tick ──────────────
        let output = PwmOutput::new(FlexPwmDuty::new(pwm, sm2, pins.p6))
            .unwrap_or_else(|never| match never {});

        // ── Dial inputs ─────────────────────────────────────────────
        iomuxc::configure(&mut pins.p2, DIAL_PIN_CONFIG);
        iomuxc::configure(&mut pins.p3, DIAL_PIN_CONFIG);
        let dial = gpio4.input(pins.p2);
        let pulse = gpio4.input(pins.p3);
        gpio4.set_interrupt(&dial, Some(Trigger::EitherEdge));
        gpio4.set_interrupt(&pulse, Some(Trigger::FallingEdge));

        // ── Sample clock ────────────────────────────────────────────
        pit.set_load_timer_value(board::PERCLK_FREQUENCY / TICK_RATE_HZ);
        pit.set_interrupt_enable(true);
        pit.enable();

        let player = ToneOutput::new(&TONE, TickDelay::new(&TICKS, Wfi));
        let dialer = Dialer::new(MemoryStorage::new(), player);

        defmt::info!("pulse-to-tone ready, {} Hz tick", TICK_RATE_HZ);

        (
            Shared {},
            Local {
                pit,
                synth: ToneSynth::new(),
                output,
                dial,
                pulse,
                dialer,
            },
        )
    }

    // ── PIT ISR: one sample per tick ─────────────────────────────────

    #[task(binds = PIT, local = [pit, synth, output], priority = 3)]
    fn tick(cx: tick::Context) {
        let tick::LocalResources {
            pit, synth, output, ..
        } = cx.local;

        while pit.is_elapsed() {
            pit.clear_elapsed();
        }

        let sample = synth.tick(&TONE);
        let _ = output.emit(sample); // Infallible
        TICKS.advance();
    }

    // ── GPIO ISR: stamp and queue dial edges ─────────────────────────

    #[task(binds = GPIO4_COMBINED_0_15, local = [dial, pulse], priority = 2)]
    fn dial_edge(cx: dial_edge::Context) {
        let dial_edge::LocalResources { dial, pulse, .. } = cx.local;
        let now = TICKS.now();

        let rotation = dial.is_triggered().then(|| {
            dial.clear_triggered();
            DialEvent::from_rotation_level(dial.is_set())
        });
        let pulsed = pulse.is_triggered();
        if pulsed {
            pulse.clear_triggered();
        }
        let pulse_event = pulsed.then_some(DialEvent::Pulse);

        // A pulse seen together with the return to rest came before it.
        let edges = match rotation {
            Some(DialEvent::RotationEnded) => [pulse_event, rotation],
            _ => [rotation, pulse_event],
        };
        for event in edges.into_iter().flatten() {
            // Overflows are counted by the queue and reported from idle.
            let _ = EVENTS.push(TimedEvent::new(now, event));
        }
    }

    // ── Idle: decode, dial, sleep ────────────────────────────────────

    #[idle(local = [dialer])]
    fn idle(cx: idle::Context) -> ! {
        let dialer = cx.local.dialer;
        let mut lost = 0;

        loop {
            let now = TICKS.now();
            if let Err(err) = dialer.service(&EVENTS, now) {
                defmt::warn!("speed dial storage error: {}", err);
            }

            let overflows = EVENTS.overflows();
            if overflows != lost {
                defmt::warn!("{} dial edges dropped", overflows - lost);
                lost = overflows;
            }

            // Idle and power-down both wait here: the PIT wakes us every
            // tick and the GPIO ISR on every edge.
            cortex_m::asm::wfi();
        }
    }
}
