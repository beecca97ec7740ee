//! Boundaries between the interrupt handlers and the main loop.
//!
//! ## Components
//!
//! | Item | Producer | Consumer | Description |
//! |------|----------|----------|-------------|
//! | [`EventQueue`] | edge ISR | idle loop | Time-stamped dial edges |
//! | [`PwmOutput`] | tick ISR | PWM pin | One synthesised sample per tick |
//!
//! ## Utilities
//!
//! - [`spsc`]: lock-free single-producer single-consumer ring buffer

pub mod events;
pub mod spsc;
#[cfg(feature = "pwm")]
pub mod pwm;

pub use events::{DialEvent, EventQueue, TimedEvent};
#[cfg(feature = "pwm")]
pub use pwm::PwmOutput;
