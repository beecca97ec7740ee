//! Dialed digit codes.
//!
//! A [`Digit`] is one of the twelve DTMF keys the converter can send: `0`-`9`,
//! `*` and `#`. Speed-dial slots persist these as raw byte codes where
//! [`OFF`] marks an empty position.

/// Stored code of an empty speed-dial position (erased EEPROM/flash reads as `0xFF`).
pub const OFF: u8 = 0xFF;

/// A key on the DTMF keypad.
///
/// Codes `0..=9` are the decimal digits, [`Digit::STAR`] is code 10 and
/// [`Digit::POUND`] is code 11.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    /// `*` key.
    pub const STAR: Digit = Digit(10);
    /// `#` key.
    pub const POUND: Digit = Digit(11);
    /// `0` key.
    pub const ZERO: Digit = Digit(0);

    /// Highest valid code (`#`).
    pub const MAX_CODE: u8 = 11;

    /// Build a digit from its code, or `None` if the code is not a key.
    pub const fn from_code(code: u8) -> Option<Self> {
        if code <= Self::MAX_CODE {
            Some(Digit(code))
        } else {
            None
        }
    }

    /// Decode a rotation's pulse count.
    ///
    /// One to nine pulses dial `1`-`9` and ten pulses dial `0`. Zero pulses
    /// (the dial was released without turning) or more than ten (contact
    /// bounce, a broken mechanism) yield `None`.
    pub const fn from_pulses(pulses: u8) -> Option<Self> {
        match pulses {
            1..=9 => Some(Digit(pulses)),
            10 => Some(Digit(0)),
            _ => None,
        }
    }

    /// Raw code, `0..=11`.
    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Decimal value for `0`-`9`, `None` for `*` and `#`.
    #[inline]
    pub const fn decimal(self) -> Option<u8> {
        if self.0 <= 9 {
            Some(self.0)
        } else {
            None
        }
    }

    /// Keypad character, handy for logs and tests.
    pub const fn as_char(self) -> char {
        match self.0 {
            10 => '*',
            11 => '#',
            d => (b'0' + d) as char,
        }
    }
}
