//! Fixed configuration constants.
//!
//! Nothing here is runtime-configurable; the timing constants all derive from
//! the tick rate the firmware programs into its periodic timer.

/// Tick (sample) rate of the synthesis timer in Hz.
pub const TICK_RATE_HZ: u32 = 15_625;

/// Whole ticks per millisecond. The exact value is 15.625; delays undercount
/// by the fractional part.
pub const TICKS_PER_MS: u32 = TICK_RATE_HZ / 1_000;

/// Length of one tick in nanoseconds.
pub const NS_PER_TICK: u32 = 1_000_000_000 / TICK_RATE_HZ;

/// Length of one tick in microseconds.
pub const US_PER_TICK: u32 = 1_000_000 / TICK_RATE_HZ;

/// Number of entries in the sine wavetable (must be a power of two).
pub const SINE_TABLE_SIZE: usize = 128;

/// Fractional bits carried below the table index in a phase accumulator.
pub const PHASE_FRACTION_BITS: u32 = 3;

/// Duration of a dialed DTMF tone, and of the pause between speed-dial tones.
pub const DTMF_DURATION_MS: u32 = 100;

/// How long the dial must be held without pulses to select the special function.
pub const SF_HOLD_MS: u32 = 2_000;

/// Short beep confirming the special function.
pub const SF_BEEP_MS: u32 = 200;

/// Long beep signalling an invalid speed-dial slot or a storage failure.
pub const ERROR_BEEP_MS: u32 = 1_000;

/// Length of each confirmation tune played on entering programming mode.
pub const PROGRAMMING_TUNE_MS: u32 = 700;

/// Length of the tune confirming a chosen slot or a saved number.
pub const CONFIRM_TUNE_MS: u32 = 800;

/// Digits held by one speed-dial slot.
pub const SPEED_DIAL_CAPACITY: usize = 30;

/// Number of speed-dial slots (dialed as 3..=9).
pub const SPEED_DIAL_SLOTS: usize = 7;

/// Bytes of persistent storage needed for all slots.
pub const SPEED_DIAL_STORAGE_BYTES: usize = SPEED_DIAL_CAPACITY * SPEED_DIAL_SLOTS;

/// Total slots in the edge event queue. Usable capacity is one less.
pub const EVENT_QUEUE_SLOTS: usize = 64;
