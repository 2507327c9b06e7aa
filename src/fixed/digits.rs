//! The digit store: a two-sided growable buffer with an implicit radix point.
//!
//! Cells are stored least significant first. The lower half of the buffer
//! holds fractional digits, the upper half integer digits, and `center`
//! marks the boundary (the units digit lives at `center`).

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::debug;
use crate::error::BigFixedError;

/// Base used by [`BigFixedInt::default`].
pub const DEFAULT_RADIX: u64 = 10;

/// Number of cells a fresh value starts with.
pub const DEFAULT_CAPACITY: usize = 10;

/// Largest supported radix. Keeps the sum of two cells plus a carry well
/// inside a `u64`.
pub const MAX_RADIX: u64 = 1 << 32;

/// An unsigned fixed-point number of arbitrary precision in an arbitrary radix.
///
/// Invariants after every public operation:
/// - every cell is below `radix`
/// - `size * 2 < capacity`
/// - `center == capacity / 2`
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "RawDigits", into = "RawDigits")]
pub struct BigFixedInt {
    digits: Vec<u64>,
    center: usize,
    size: usize,
    radix: u64,
}

/// Serialized form: the radix and the raw cells in buffer order.
#[derive(Serialize, Deserialize)]
struct RawDigits {
    radix: u64,
    digits: Vec<u64>,
}

/// Allocate a zero-filled buffer, reporting failure instead of aborting.
fn zeroed_buffer(cells: usize) -> Result<Vec<u64>, BigFixedError> {
    let mut digits = Vec::new();
    digits
        .try_reserve_exact(cells)
        .map_err(|_| BigFixedError::AllocationFailure { cells })?;
    digits.resize(cells, 0);
    Ok(digits)
}

fn check_radix(radix: u64) -> Result<(), BigFixedError> {
    if (2..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(BigFixedError::InvalidRadix(radix))
    }
}

impl BigFixedInt {
    /// Create a zero value in the given radix with the default capacity.
    pub fn new(radix: u64) -> Result<Self, BigFixedError> {
        Self::with_capacity(radix, DEFAULT_CAPACITY)
    }

    /// Create a zero value with room for at least `capacity` cells.
    ///
    /// The capacity is rounded up to an even number of at least 2.
    pub fn with_capacity(radix: u64, capacity: usize) -> Result<Self, BigFixedError> {
        check_radix(radix)?;
        let capacity = capacity.max(2);
        let capacity = capacity
            .checked_add(capacity % 2)
            .ok_or(BigFixedError::AllocationFailure { cells: capacity })?;
        Ok(Self {
            digits: zeroed_buffer(capacity)?,
            center: capacity / 2,
            size: 0,
            radix,
        })
    }

    /// Create an integer value.
    pub fn from_u64(radix: u64, value: u64) -> Result<Self, BigFixedError> {
        let mut result = Self::new(radix)?;
        result.add_u64(value)?;
        Ok(result)
    }

    /// Create a value from explicit digits.
    ///
    /// `integer` is most significant first; `fraction` starts right after the
    /// radix point. `from_digits(10, &[1, 2], &[5])` is 12.5.
    pub fn from_digits(radix: u64, integer: &[u64], fraction: &[u64]) -> Result<Self, BigFixedError> {
        check_radix(radix)?;
        let half = integer.len().max(fraction.len()) + 1;
        let mut result = Self::with_capacity(radix, (half * 2).max(DEFAULT_CAPACITY))?;
        let center = result.center;
        for (offset, &digit) in integer.iter().rev().enumerate() {
            let index = center + offset;
            if digit >= radix {
                return Err(BigFixedError::DigitOutOfRange { index, digit, radix });
            }
            result.digits[index] = digit;
        }
        for (offset, &digit) in fraction.iter().enumerate() {
            let index = center - 1 - offset;
            if digit >= radix {
                return Err(BigFixedError::DigitOutOfRange { index, digit, radix });
            }
            result.digits[index] = digit;
        }
        result.refresh_size();
        result.reserve_headroom()?;
        Ok(result)
    }

    /// Clone, reporting allocation failure as an error.
    pub fn try_clone(&self) -> Result<Self, BigFixedError> {
        let mut digits = zeroed_buffer(self.digits.len())?;
        digits.copy_from_slice(&self.digits);
        Ok(Self {
            digits,
            center: self.center,
            size: self.size,
            radix: self.radix,
        })
    }

    #[inline]
    pub fn radix(&self) -> u64 {
        self.radix
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.digits.len()
    }

    /// Index of the units digit.
    #[inline]
    pub fn center(&self) -> usize {
        self.center
    }

    /// Digits in use on the wider side of the radix point.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw cells, least significant first.
    #[inline]
    pub fn digits(&self) -> &[u64] {
        &self.digits
    }

    #[inline]
    pub(crate) fn digits_mut(&mut self) -> &mut [u64] {
        &mut self.digits
    }

    /// Digit at a logical position (0 = units, -1 = first fractional digit).
    /// Positions outside the buffer read as zero.
    pub fn digit_at(&self, position: isize) -> u64 {
        self.index_of(position)
            .map(|index| self.digits[index])
            .unwrap_or(0)
    }

    fn index_of(&self, position: isize) -> Option<usize> {
        let index = self.center as isize + position;
        if index >= 0 && (index as usize) < self.digits.len() {
            Some(index as usize)
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|&d| d == 0)
    }

    /// Number of integer digits up to and including the leading nonzero one.
    pub fn integer_len(&self) -> usize {
        self.digits[self.center..]
            .iter()
            .rposition(|&d| d != 0)
            .map_or(0, |top| top + 1)
    }

    /// Number of fractional digits down to and including the last nonzero one.
    pub fn fraction_len(&self) -> usize {
        self.digits[..self.center]
            .iter()
            .position(|&d| d != 0)
            .map_or(0, |bottom| self.center - bottom)
    }

    /// Integer part as a `u64`, or `None` if it does not fit.
    pub fn to_u64(&self) -> Option<u64> {
        let mut value: u64 = 0;
        for &digit in self.digits[self.center..self.center + self.integer_len()].iter().rev() {
            value = value.checked_mul(self.radix)?.checked_add(digit)?;
        }
        Some(value)
    }

    pub(crate) fn check_radix_matches(&self, other: &Self) -> Result<(), BigFixedError> {
        if self.radix == other.radix {
            Ok(())
        } else {
            Err(BigFixedError::RadixMismatch { left: self.radix, right: other.radix })
        }
    }

    pub(crate) fn refresh_size(&mut self) {
        self.size = self.integer_len().max(self.fraction_len());
    }

    /// Double the buffer, keeping every digit at the same logical position.
    ///
    /// Returns how far existing indices moved up.
    pub fn grow(&mut self) -> Result<usize, BigFixedError> {
        let old_capacity = self.digits.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(BigFixedError::AllocationFailure { cells: usize::MAX })?;
        let mut grown = zeroed_buffer(new_capacity)?;
        let offset = old_capacity / 2;
        grown[offset..offset + old_capacity].copy_from_slice(&self.digits);
        self.digits = grown;
        self.center = new_capacity / 2;
        debug!(old_capacity, new_capacity, radix = self.radix, "digit buffer grown");
        Ok(offset)
    }

    /// Grow until `size * 2 < capacity`.
    pub(crate) fn reserve_headroom(&mut self) -> Result<(), BigFixedError> {
        self.reserve_for(0)
    }

    /// Grow until `places` more digits fit on either side of the point.
    fn reserve_for(&mut self, places: usize) -> Result<(), BigFixedError> {
        while self.size.saturating_add(places).saturating_mul(2) >= self.digits.len() {
            self.grow()?;
        }
        Ok(())
    }

    /// Multiply by `radix^places` by moving every digit up.
    pub fn shift_up(&mut self, places: usize) -> Result<(), BigFixedError> {
        if places == 0 || self.is_zero() {
            return Ok(());
        }
        self.reserve_for(places)?;
        // The top `places` cells are zero, so they wrap harmlessly to the bottom.
        self.digits.rotate_right(places);
        self.refresh_size();
        self.reserve_headroom()
    }

    /// Divide by `radix^places` by moving every digit down. Exact: digits
    /// cross into the fractional side instead of being dropped.
    pub fn shift_down(&mut self, places: usize) -> Result<(), BigFixedError> {
        if places == 0 || self.is_zero() {
            return Ok(());
        }
        self.reserve_for(places)?;
        self.digits.rotate_left(places);
        self.refresh_size();
        self.reserve_headroom()
    }
}

impl Default for BigFixedInt {
    fn default() -> Self {
        Self {
            digits: vec![0; DEFAULT_CAPACITY],
            center: DEFAULT_CAPACITY / 2,
            size: 0,
            radix: DEFAULT_RADIX,
        }
    }
}

impl TryFrom<RawDigits> for BigFixedInt {
    type Error = BigFixedError;

    fn try_from(raw: RawDigits) -> Result<Self, Self::Error> {
        check_radix(raw.radix)?;
        let len = raw.digits.len();
        if len == 0 || len % 2 != 0 {
            return Err(BigFixedError::InvalidLength(len));
        }
        if let Some((index, &digit)) = raw.digits.iter().enumerate().find(|&(_, &d)| d >= raw.radix) {
            return Err(BigFixedError::DigitOutOfRange { index, digit, radix: raw.radix });
        }
        let mut value = Self {
            digits: raw.digits,
            center: len / 2,
            size: 0,
            radix: raw.radix,
        };
        value.refresh_size();
        value.reserve_headroom()?;
        Ok(value)
    }
}

impl From<BigFixedInt> for RawDigits {
    fn from(value: BigFixedInt) -> Self {
        RawDigits { radix: value.radix, digits: value.digits }
    }
}

impl fmt::Debug for BigFixedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the significant digits, integer part most significant first.
        let integer: Vec<u64> = (0..self.integer_len().max(1))
            .rev()
            .map(|p| self.digit_at(p as isize))
            .collect();
        let fraction: Vec<u64> = (1..=self.fraction_len())
            .map(|p| self.digit_at(-(p as isize)))
            .collect();
        f.debug_struct("BigFixedInt")
            .field("radix", &self.radix)
            .field("integer", &integer)
            .field("fraction", &fraction)
            .field("capacity", &self.digits.len())
            .finish()
    }
}
