//! Integer DSP primitives for the tone synthesiser.
//!
//! Everything here runs inside the tick interrupt, so it is branch-light,
//! allocation-free and uses no floating point.

pub mod phase;
pub mod wavetable;

pub use phase::PhaseAccumulator;
pub use wavetable::SINE_TABLE;
