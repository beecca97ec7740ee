//! Tone definitions: DTMF step-width table, beeps and confirmation tunes.
//!
//! A step width is the amount a [`PhaseAccumulator`](crate::dsp::PhaseAccumulator)
//! advances per tick. With a 128-entry table and 3 fractional bits one full
//! period is 1024 accumulator units, so
//!
//! ```text
//! step = round(1024 * f / sample_rate)      f = step * sample_rate / 1024
//! ```
//!
//! ## DTMF matrix
//!
//! ```text
//!          1209   1336   1477 Hz
//!   697 |   1      2      3
//!   770 |   4      5      6
//!   852 |   7      8      9
//!   941 |   *      0      #
//! ```
//!
//! Tone A is the high (column) frequency at full amplitude, tone B the low
//! (row) frequency at 3/4 amplitude.

pub mod synth;

use crate::digit::Digit;

/// DTMF row (low group) frequencies in Hz.
pub const ROW_HZ: [u16; 4] = [697, 770, 852, 941];

/// DTMF column (high group) frequencies in Hz.
pub const COLUMN_HZ: [u16; 3] = [1209, 1336, 1477];

/// Step widths for the DTMF columns, in [`COLUMN_HZ`] order.
pub const COLUMN_STEPS: [u8; 3] = [79, 87, 96];

/// Step widths for the DTMF rows, in [`ROW_HZ`] order.
pub const ROW_STEPS: [u8; 4] = [46, 50, 56, 61];

/// ~1 kHz single-tone beep.
pub const BEEP_STEP: u8 = 66;
/// ~500 Hz single-tone beep.
pub const BEEP_LOW_STEP: u8 = 33;
/// C5, 523.25 Hz.
pub const NOTE_C_STEP: u8 = 34;
/// E5, 659.26 Hz.
pub const NOTE_E_STEP: u8 = 43;
/// G5, 784 Hz.
pub const NOTE_G_STEP: u8 = 51;

/// Per-tick phase increments for the two tones.
///
/// `b == 0` means single-tone output; tone B is then not evaluated at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepWidths {
    /// High tone (full amplitude).
    pub a: u8,
    /// Low tone (3/4 amplitude), zero when unused.
    pub b: u8,
}

impl StepWidths {
    /// Both tones silent.
    pub const SILENT: StepWidths = StepWidths { a: 0, b: 0 };

    /// A dual-tone pair.
    pub const fn dual(a: u8, b: u8) -> Self {
        StepWidths { a, b }
    }

    /// Tone A only.
    pub const fn single(a: u8) -> Self {
        StepWidths { a, b: 0 }
    }

    /// True when neither tone advances.
    #[inline]
    pub const fn is_silent(self) -> bool {
        self.a == 0 && self.b == 0
    }
}

/// Immutable digit → step-width mapping derived from the DTMF matrix.
pub struct FrequencyTable;

impl FrequencyTable {
    const STEPS: [StepWidths; 12] = [
        StepWidths::dual(COLUMN_STEPS[1], ROW_STEPS[3]), // 0
        StepWidths::dual(COLUMN_STEPS[0], ROW_STEPS[0]), // 1
        StepWidths::dual(COLUMN_STEPS[1], ROW_STEPS[0]), // 2
        StepWidths::dual(COLUMN_STEPS[2], ROW_STEPS[0]), // 3
        StepWidths::dual(COLUMN_STEPS[0], ROW_STEPS[1]), // 4
        StepWidths::dual(COLUMN_STEPS[1], ROW_STEPS[1]), // 5
        StepWidths::dual(COLUMN_STEPS[2], ROW_STEPS[1]), // 6
        StepWidths::dual(COLUMN_STEPS[0], ROW_STEPS[2]), // 7
        StepWidths::dual(COLUMN_STEPS[1], ROW_STEPS[2]), // 8
        StepWidths::dual(COLUMN_STEPS[2], ROW_STEPS[2]), // 9
        StepWidths::dual(COLUMN_STEPS[0], ROW_STEPS[3]), // *
        StepWidths::dual(COLUMN_STEPS[2], ROW_STEPS[3]), // #
    ];

    /// Step widths for a keypad digit.
    #[inline]
    pub const fn steps(digit: Digit) -> StepWidths {
        Self::STEPS[digit.code() as usize]
    }

    /// Nominal (column, row) frequencies in Hz for a keypad digit.
    pub const fn frequencies(digit: Digit) -> (u16, u16) {
        let (col, row) = Self::matrix_position(digit);
        (COLUMN_HZ[col], ROW_HZ[row])
    }

    /// (column, row) of a digit in the keypad matrix.
    const fn matrix_position(digit: Digit) -> (usize, usize) {
        match digit.code() {
            0 => (1, 3),
            10 => (0, 3),
            11 => (2, 3),
            d => (((d - 1) % 3) as usize, ((d - 1) / 3) as usize),
        }
    }
}

/// Frequency in milli-hertz produced by `step` at `sample_rate_hz`.
pub const fn step_to_millihertz(step: u8, sample_rate_hz: u32) -> u32 {
    // 1024 accumulator units per period.
    ((step as u64 * sample_rate_hz as u64 * 1000) / 1024) as u32
}

/// Something the synthesiser can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    /// The dual-tone pair of a keypad digit.
    Dtmf(Digit),
    /// ~1 kHz beep (special-function confirmation, errors).
    Beep,
    /// ~500 Hz beep (speed-dial digit recorded).
    BeepLow,
    /// C-E-G, each note a third of the duration.
    TuneAscending,
    /// G-E-C, each note a third of the duration.
    TuneDescending,
}

impl Tone {
    /// Split a tone of `duration_ms` into the notes that make it up.
    pub fn segments(self, duration_ms: u32) -> Segments {
        let third = duration_ms / 3;
        match self {
            Tone::Dtmf(digit) => Segments::one(FrequencyTable::steps(digit), duration_ms),
            Tone::Beep => Segments::one(StepWidths::single(BEEP_STEP), duration_ms),
            Tone::BeepLow => Segments::one(StepWidths::single(BEEP_LOW_STEP), duration_ms),
            Tone::TuneAscending => {
                Segments::tune([NOTE_C_STEP, NOTE_E_STEP, NOTE_G_STEP], third)
            }
            Tone::TuneDescending => {
                Segments::tune([NOTE_G_STEP, NOTE_E_STEP, NOTE_C_STEP], third)
            }
        }
    }
}

/// One constant-frequency stretch of a tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    /// Step widths held for the whole segment.
    pub steps: StepWidths,
    /// How long to hold them.
    pub duration_ms: u32,
}

/// Iterator over the segments of a [`Tone`], played back-to-back.
#[derive(Clone, Debug)]
pub struct Segments {
    items: [Segment; 3],
    len: usize,
    pos: usize,
}

impl Segments {
    fn one(steps: StepWidths, duration_ms: u32) -> Self {
        let seg = Segment { steps, duration_ms };
        Segments { items: [seg; 3], len: 1, pos: 0 }
    }

    fn tune(notes: [u8; 3], note_ms: u32) -> Self {
        let items = notes.map(|step| Segment {
            steps: StepWidths::single(step),
            duration_ms: note_ms,
        });
        Segments { items, len: 3, pos: 0 }
    }
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.pos < self.len {
            let seg = self.items[self.pos];
            self.pos += 1;
            Some(seg)
        } else {
            None
        }
    }
}
