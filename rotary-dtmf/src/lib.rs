//! # rotary-dtmf
//!
//! A `no_std`, zero-allocation pulse-to-tone converter core: it listens to a
//! mechanical rotary dial, decodes its pulse trains into digits and plays the
//! matching DTMF tone pairs, synthesised sample-by-sample from a fixed-rate
//! timer with integer arithmetic only.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Data | [`constants`] / [`digit`] | Fixed timing constants, digit codes |
//! | DSP | [`dsp`] / [`tone`] | Sine table, phase accumulators, DTMF step widths |
//! | Time | [`time`] / [`delay`] | Tick counter and the blocking millisecond wait |
//! | I/O | [`io`] | Edge event queue, PWM sample output |
//! | Dial | [`pulse`] / [`session`] | Pulse counting, special-function hold detection |
//! | Logic | [`controller`] / [`speed_dial`] | Digit decision table, persistent speed dial |
//! | Glue | [`dialer`] | Main-loop servicing of queued edges |
//!
//! ## Execution contexts
//!
//! ```text
//!   tick ISR (15 625 Hz)          edge ISR                 idle loop
//!   ┌───────────────────┐    ┌────────────────┐    ┌──────────────────────┐
//!   │ ToneSynth::tick   │    │ stamp edge     │    │ Dialer::service      │
//!   │ PwmOutput::emit   │    │ EventQueue     │───►│  PulseDecoder        │
//!   │ TickCounter++     │    │   .push()      │    │  DialController      │
//!   └────────▲──────────┘    └────────────────┘    │  ToneOutput (waits)  │
//!            │  ToneControl (AtomicU16 step pair)  └──────────┬───────────┘
//!            └────────────────────────────────────────────────┘
//! ```
//!
//! The tick ISR and the idle loop only share two atomics ([`time::TickCounter`]
//! and [`tone::synth::ToneControl`]); dial edges travel through a lock-free
//! single-producer single-consumer queue, so the dialing state itself is never
//! shared.
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `pwm` | yes | [`io::pwm`] output and `DelayNs` for [`delay::TickDelay`] (requires `embedded-hal`) |
//! | `defmt` | no | State-transition logging and `defmt::Format` derives |

#![no_std]

#[macro_use]
mod logging;

pub mod constants;
pub mod digit;
pub mod dsp;
pub mod tone;
pub mod time;
pub mod delay;
pub mod io;
pub mod session;
pub mod pulse;
pub mod speed_dial;
pub mod player;
pub mod controller;
pub mod dialer;

mod integration_tests;

pub use controller::{DialController, Outcome};
pub use dialer::{Dialer, SleepDepth};
pub use digit::Digit;
pub use io::events::{DialEvent, EventQueue, TimedEvent};
pub use speed_dial::{MemoryStorage, SlotIndex, SlotStorage, SpeedDialStore};
pub use time::TickCounter;
pub use tone::synth::{ToneControl, ToneSynth};
pub use tone::Tone;
