//! Magnitude comparison.
//!
//! The integer part decides; the fractional part only breaks ties. Both
//! halves are compared on logical positions, so operands of different
//! capacity line up on their radix points.

use std::cmp::Ordering;
use crate::error::BigFixedError;
use crate::fixed::BigFixedInt;

#[derive(Clone, Copy)]
enum Half {
    Integer,
    Fraction,
}

impl BigFixedInt {
    /// Lowest and highest logical position of one half of the buffer.
    fn half_range(&self, half: Half) -> (isize, isize) {
        let center = self.center() as isize;
        match half {
            Half::Integer => (0, self.capacity() as isize - center - 1),
            Half::Fraction => (-center, -1),
        }
    }

    /// Position of the most significant nonzero digit within one half.
    fn leading_position(&self, half: Half) -> Option<isize> {
        let (low, high) = self.half_range(half);
        (low..=high).rev().find(|&p| self.digit_at(p) != 0)
    }

    fn compare_half(&self, other: &Self, half: Half) -> Ordering {
        match (self.leading_position(half), other.leading_position(half)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) if a != b => a.cmp(&b),
            (Some(top), Some(_)) => {
                let low = self.half_range(half).0.min(other.half_range(half).0);
                (low..=top)
                    .rev()
                    .map(|p| self.digit_at(p).cmp(&other.digit_at(p)))
                    .find(|&ord| ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            }
        }
    }

    /// Compare the integer parts only.
    pub fn compare_upper(&self, other: &Self) -> Ordering {
        self.compare_half(other, Half::Integer)
    }

    /// Compare the fractional parts only.
    pub fn compare_lower(&self, other: &Self) -> Ordering {
        self.compare_half(other, Half::Fraction)
    }

    /// Total order on values of the same radix.
    pub fn compare(&self, other: &Self) -> Result<Ordering, BigFixedError> {
        self.check_radix_matches(other)?;
        Ok(match self.compare_upper(other) {
            Ordering::Equal => self.compare_lower(other),
            upper => upper,
        })
    }
}

/// Compare two values, returning -1, 0 or +1.
pub fn compare(a: &BigFixedInt, b: &BigFixedInt) -> Result<i8, BigFixedError> {
    a.compare(b).map(|ord| ord as i8)
}

impl PartialEq for BigFixedInt {
    /// Values in different radices are never equal.
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for BigFixedInt {
    /// Values in different radices are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}
