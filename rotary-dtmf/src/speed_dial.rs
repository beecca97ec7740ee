//! Persistent speed-dial numbers.
//!
//! Seven slots, dialed as special function 3..9, each hold up to
//! [`SPEED_DIAL_CAPACITY`] digit codes. Slots are laid out back to back in a
//! byte-addressed persistent memory (EEPROM, emulated EEPROM in flash, ...):
//!
//! ```text
//! address: 0        30       60             180      210
//!          ┌────────┬────────┬──── ··· ─────┬────────┐
//!          │ slot 3 │ slot 4 │              │ slot 9 │
//!          └────────┴────────┴──── ··· ─────┴────────┘
//! ```
//!
//! Unused positions hold [`OFF`], which is also what erased memory reads
//! as, so a fresh device has seven empty numbers.

use crate::constants::{SPEED_DIAL_CAPACITY, SPEED_DIAL_SLOTS, SPEED_DIAL_STORAGE_BYTES};
use crate::digit::{Digit, OFF};

/// A speed-dial slot, identified by the digit (3..=9) that selects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Lowest digit that selects a slot.
    pub const FIRST_DIGIT: u8 = 3;
    /// Highest digit that selects a slot.
    pub const LAST_DIGIT: u8 = 9;

    /// Slot selected by `digit`, or `None` outside 3..=9.
    pub const fn from_digit(digit: Digit) -> Option<Self> {
        match digit.code() {
            d @ Self::FIRST_DIGIT..=Self::LAST_DIGIT => Some(SlotIndex(d)),
            _ => None,
        }
    }

    /// The digit that selects this slot.
    #[inline]
    pub const fn digit(self) -> u8 {
        self.0
    }

    /// Zero-based slot position (digit 3 is slot 0).
    #[inline]
    pub const fn position(self) -> usize {
        (self.0 - Self::FIRST_DIGIT) as usize
    }

    /// Byte address of the slot in persistent memory.
    #[inline]
    pub const fn address(self) -> usize {
        self.position() * SPEED_DIAL_CAPACITY
    }

    /// All slots, in storage order.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (Self::FIRST_DIGIT..=Self::LAST_DIGIT).map(SlotIndex)
    }
}

/// One speed-dial number: a fixed-length run of digit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedDialNumber([u8; SPEED_DIAL_CAPACITY]);

impl SpeedDialNumber {
    /// All positions [`OFF`].
    pub const EMPTY: SpeedDialNumber = SpeedDialNumber([OFF; SPEED_DIAL_CAPACITY]);

    /// Wrap raw stored codes.
    pub const fn from_bytes(bytes: [u8; SPEED_DIAL_CAPACITY]) -> Self {
        SpeedDialNumber(bytes)
    }

    /// Build a number from digits, truncated to capacity.
    pub fn from_digits<I: IntoIterator<Item = Digit>>(digits: I) -> Self {
        let mut number = Self::EMPTY;
        for (slot, digit) in number.0.iter_mut().zip(digits) {
            *slot = digit.code();
        }
        number
    }

    /// Raw stored codes.
    pub fn as_bytes(&self) -> &[u8; SPEED_DIAL_CAPACITY] {
        &self.0
    }

    /// Write `code` at `position`. Returns `false` past capacity.
    pub fn set(&mut self, position: usize, code: u8) -> bool {
        match self.0.get_mut(position) {
            Some(slot) => {
                *slot = code;
                true
            }
            None => false,
        }
    }

    /// The dialable digits, in order. `OFF` and any other out-of-range code
    /// is skipped.
    pub fn digits(&self) -> impl Iterator<Item = Digit> + '_ {
        self.0.iter().filter_map(|&code| Digit::from_code(code))
    }

    /// True when no position holds a dialable digit.
    pub fn is_empty(&self) -> bool {
        self.digits().next().is_none()
    }
}

impl Default for SpeedDialNumber {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Raw byte-addressed persistent memory.
///
/// Implementations are thin wrappers over the device's EEPROM (or emulated
/// EEPROM) primitives.
pub trait SlotStorage {
    /// Error type for storage operations.
    type Error;

    /// Fill `buf` with the bytes starting at `address`.
    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `address`.
    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), Self::Error>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for &mut S {
    type Error = S::Error;

    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, buf)
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }
}

/// Error from [`MemoryStorage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryStorageError {
    /// The access runs past the end of the memory.
    OutOfBounds {
        /// First byte of the access.
        address: usize,
        /// Length of the access.
        len: usize,
    },
}

/// RAM-backed [`SlotStorage`], initialised to the erased state.
///
/// Used by host tests, and on boards whose persistent memory driver is not
/// wired up yet (contents are then lost at power-off).
pub struct MemoryStorage<const N: usize = SPEED_DIAL_STORAGE_BYTES> {
    bytes: [u8; N],
    bytes_written: usize,
}

impl<const N: usize> MemoryStorage<N> {
    /// Erased memory (all `0xFF`).
    pub const fn new() -> Self {
        MemoryStorage {
            bytes: [OFF; N],
            bytes_written: 0,
        }
    }

    /// Raw contents.
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Total bytes written since creation (wear indicator).
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    fn range(address: usize, len: usize) -> Result<core::ops::Range<usize>, MemoryStorageError> {
        match address.checked_add(len) {
            Some(end) if end <= N => Ok(address..end),
            _ => Err(MemoryStorageError::OutOfBounds { address, len }),
        }
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SlotStorage for MemoryStorage<N> {
    type Error = MemoryStorageError;

    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Self::Error> {
        let range = Self::range(address, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), Self::Error> {
        let range = Self::range(address, data.len())?;
        self.bytes[range].copy_from_slice(data);
        self.bytes_written += data.len();
        Ok(())
    }
}

/// Speed-dial numbers on top of a [`SlotStorage`].
pub struct SpeedDialStore<S> {
    storage: S,
}

impl<S: SlotStorage> SpeedDialStore<S> {
    /// Wrap a storage backend.
    pub const fn new(storage: S) -> Self {
        SpeedDialStore { storage }
    }

    /// Read the number stored in `slot`.
    pub fn read_slot(&mut self, slot: SlotIndex) -> Result<SpeedDialNumber, S::Error> {
        let mut bytes = [OFF; SPEED_DIAL_CAPACITY];
        self.storage.read(slot.address(), &mut bytes)?;
        Ok(SpeedDialNumber(bytes))
    }

    /// Save `number` to `slot`, writing only the bytes that changed.
    ///
    /// Returns how many bytes were written; saving an unchanged number
    /// costs no writes at all.
    pub fn write_slot(&mut self, slot: SlotIndex, number: &SpeedDialNumber) -> Result<usize, S::Error> {
        let current = self.read_slot(slot)?;
        let base = slot.address();
        let mut written = 0;

        let mut pos = 0;
        while pos < SPEED_DIAL_CAPACITY {
            if current.0[pos] == number.0[pos] {
                pos += 1;
                continue;
            }
            // Write each run of differing bytes in one call.
            let start = pos;
            while pos < SPEED_DIAL_CAPACITY && current.0[pos] != number.0[pos] {
                pos += 1;
            }
            self.storage.write(base + start, &number.0[start..pos])?;
            written += pos - start;
        }

        Ok(written)
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Release the backing storage.
    pub fn free(self) -> S {
        self.storage
    }
}

const _: () = assert!(SPEED_DIAL_STORAGE_BYTES == SPEED_DIAL_SLOTS * SPEED_DIAL_CAPACITY);
