//! Multi-digit arithmetic: addition, subtraction and long division.
//!
//! Binary operations read the second operand and rewrite the first. The
//! operands must share a radix; differing capacities are aligned on the
//! radix point by growing the receiver.

use std::cmp::Ordering;
use tracing::{debug, trace};
use crate::error::BigFixedError;
use crate::fixed::BigFixedInt;

/// Grow `a` to at least the width of `b` and return the index offset that
/// maps a cell of `b` onto the cell of `a` at the same logical position.
fn align(a: &mut BigFixedInt, b: &BigFixedInt) -> Result<usize, BigFixedError> {
    a.check_radix_matches(b)?;
    while a.capacity() < b.capacity() {
        a.grow()?;
    }
    Ok(a.center() - b.center())
}

/// Cell of `digits` that lines up with index `index` of the receiver.
#[inline]
fn aligned_digit(digits: &[u64], offset: usize, index: usize) -> u64 {
    index
        .checked_sub(offset)
        .and_then(|i| digits.get(i))
        .copied()
        .unwrap_or(0)
}

/// `a += b`.
pub fn add_into(a: &mut BigFixedInt, b: &BigFixedInt) -> Result<(), BigFixedError> {
    let offset = align(a, b)?;
    let addend = b.digits();

    // Provisional sums: each cell is below 2 * radix until normalized.
    for (i, cell) in a.digits_mut().iter_mut().enumerate() {
        *cell += aligned_digit(addend, offset, i);
    }

    a.normalize()
}

/// `a -= b`. Fails with [`BigFixedError::Underflow`] when `a < b`, leaving
/// `a` untouched.
pub fn subtract_into(a: &mut BigFixedInt, b: &BigFixedInt) -> Result<(), BigFixedError> {
    if a.compare(b)? == Ordering::Less {
        return Err(BigFixedError::Underflow);
    }
    let offset = align(a, b)?;
    let radix = a.radix();
    let subtrahend = b.digits();
    let mut borrow = 0;

    for (i, cell) in a.digits_mut().iter_mut().enumerate() {
        let take = aligned_digit(subtrahend, offset, i) + borrow;
        if *cell < take {
            *cell = *cell + radix - take;
            borrow = 1;
        } else {
            *cell -= take;
            borrow = 0;
        }
    }
    debug_assert_eq!(borrow, 0, "borrow out of the top after a >= b check");

    a.normalize()
}

/// `value * digit` for a single digit below the radix.
fn times_digit(value: &BigFixedInt, digit: u64) -> Result<BigFixedInt, BigFixedError> {
    let mut product = value.try_clone()?;
    // Both factors are below 2^32, so each provisional cell fits in a u64.
    for cell in product.digits_mut().iter_mut() {
        *cell *= digit;
    }
    product.normalize()?;
    Ok(product)
}

/// Largest `d < radix` with `d * divisor <= remainder`, given
/// `remainder < divisor * radix`.
///
/// The leading cells bound the digit from both sides; a binary search
/// between the bounds keeps the cost at O(log radix) trial products.
fn quotient_digit(remainder: &BigFixedInt, divisor: &BigFixedInt) -> Result<u64, BigFixedError> {
    let radix = remainder.radix() as u128;
    let top = divisor.integer_len() as isize - 1;
    let lead = divisor.digit_at(top) as u128;
    let window = remainder.digit_at(top + 1) as u128 * radix + remainder.digit_at(top) as u128;

    let mut low = (window / (lead + 1)) as u64;
    let mut high = (window / lead).min(radix - 1) as u64;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if times_digit(divisor, mid)?.compare(remainder)? == Ordering::Greater {
            high = mid - 1;
        } else {
            low = mid;
        }
    }
    Ok(low)
}

/// Quotient `⌊a / b⌋` and remainder `a - b * quotient`.
///
/// Both operands are scaled by the same radix power so that the division
/// runs over integers; the remainder is scaled back and may be fractional.
pub fn div_rem(a: &BigFixedInt, b: &BigFixedInt) -> Result<(BigFixedInt, BigFixedInt), BigFixedError> {
    a.check_radix_matches(b)?;
    if b.is_zero() {
        return Err(BigFixedError::DivisionByZero);
    }
    let radix = a.radix();
    let scale = a.fraction_len().max(b.fraction_len());

    let mut dividend = a.try_clone()?;
    dividend.shift_up(scale)?;
    let mut divisor = b.try_clone()?;
    divisor.shift_up(scale)?;

    debug!(
        radix,
        scale,
        dividend_digits = dividend.integer_len(),
        divisor_digits = divisor.integer_len(),
        "long division"
    );

    let mut quotient = BigFixedInt::with_capacity(radix, dividend.capacity())?;
    let mut remainder = BigFixedInt::with_capacity(radix, divisor.capacity())?;

    // Most significant dividend digit first.
    for position in (0..dividend.integer_len()).rev() {
        remainder.shift_up(1)?;
        remainder.add_u64(dividend.digit_at(position as isize))?;

        let digit = quotient_digit(&remainder, &divisor)?;
        if digit > 0 {
            subtract_into(&mut remainder, &times_digit(&divisor, digit)?)?;
        }
        trace!(position, digit, "quotient digit");

        quotient.shift_up(1)?;
        quotient.add_u64(digit)?;
    }

    remainder.shift_down(scale)?;
    Ok((quotient, remainder))
}

/// New value holding `⌊a / b⌋`.
pub fn divide(a: &BigFixedInt, b: &BigFixedInt) -> Result<BigFixedInt, BigFixedError> {
    div_rem(a, b).map(|(quotient, _)| quotient)
}

/// `a = ⌊a / b⌋`, discarding the remainder.
pub fn divide_into(a: &mut BigFixedInt, b: &BigFixedInt) -> Result<(), BigFixedError> {
    *a = divide(a, b)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::MAX_RADIX;

    fn int(value: u64) -> BigFixedInt {
        BigFixedInt::from_u64(10, value).unwrap()
    }

    #[test]
    fn test_add_basic() {
        let mut a = int(100);
        add_into(&mut a, &int(50)).unwrap();
        assert_eq!(a.to_u64(), Some(150));
    }

    #[test]
    fn test_add_carry_grows() {
        let mut a = BigFixedInt::with_capacity(10, 8).unwrap();
        a.add_u64(999).unwrap();
        let capacity = a.capacity();
        add_into(&mut a, &int(1)).unwrap();
        assert_eq!(a, int(1000));
        assert!(a.capacity() > capacity);
    }

    #[test]
    fn test_add_carries_across_point() {
        let mut a = BigFixedInt::from_digits(10, &[9], &[5]).unwrap();
        let b = BigFixedInt::from_digits(10, &[0], &[5]).unwrap();
        add_into(&mut a, &b).unwrap();
        assert_eq!(a, int(10));
        assert_eq!(a.fraction_len(), 0);
    }

    #[test]
    fn test_add_wider_operand() {
        let mut a = int(1);
        let mut b = int(123_456_789);
        b.grow().unwrap();
        add_into(&mut a, &b).unwrap();
        assert_eq!(a.to_u64(), Some(123_456_790));
        assert_eq!(b.to_u64(), Some(123_456_789));
    }

    #[test]
    fn test_add_radix_mismatch() {
        let mut a = int(1);
        let b = BigFixedInt::from_u64(8, 1).unwrap();
        assert!(matches!(add_into(&mut a, &b), Err(BigFixedError::RadixMismatch { .. })));
        assert_eq!(a.to_u64(), Some(1));
    }

    #[test]
    fn test_subtract() {
        let mut a = int(100);
        subtract_into(&mut a, &int(30)).unwrap();
        assert_eq!(a.to_u64(), Some(70));
    }

    #[test]
    fn test_subtract_borrow_chain() {
        let mut a = int(1000);
        subtract_into(&mut a, &int(1)).unwrap();
        assert_eq!(a.to_u64(), Some(999));
        assert_eq!(a.size(), 3);
    }

    #[test]
    fn test_subtract_fraction() {
        let mut a = BigFixedInt::from_digits(10, &[1], &[]).unwrap();
        let b = BigFixedInt::from_digits(10, &[0], &[2, 5]).unwrap();
        subtract_into(&mut a, &b).unwrap();
        assert_eq!(a, BigFixedInt::from_digits(10, &[0], &[7, 5]).unwrap());
    }

    #[test]
    fn test_subtract_to_zero() {
        let mut a = int(4242);
        subtract_into(&mut a, &int(4242)).unwrap();
        assert!(a.is_zero());
        assert_eq!(a.size(), 0);
    }

    #[test]
    fn test_subtract_underflow() {
        let mut a = int(5);
        assert_eq!(subtract_into(&mut a, &int(7)), Err(BigFixedError::Underflow));
        assert_eq!(a.to_u64(), Some(5));
    }

    #[test]
    fn test_divide_basic() {
        let q = divide(&int(10), &int(3)).unwrap();
        assert_eq!(q.to_u64(), Some(3));

        let (q, r) = div_rem(&int(1_000_000), &int(7)).unwrap();
        assert_eq!(q.to_u64(), Some(142_857));
        assert_eq!(r.to_u64(), Some(1));
    }

    #[test]
    fn test_divide_into_discards_remainder() {
        let mut a = int(100);
        divide_into(&mut a, &int(8)).unwrap();
        assert_eq!(a.to_u64(), Some(12));
    }

    #[test]
    fn test_divide_by_larger() {
        let (q, r) = div_rem(&int(45), &int(123)).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, int(45));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(divide(&int(10), &int(0)).unwrap_err(), BigFixedError::DivisionByZero);
        let mut a = int(10);
        assert_eq!(divide_into(&mut a, &int(0)), Err(BigFixedError::DivisionByZero));
        assert_eq!(a.to_u64(), Some(10));
    }

    #[test]
    fn test_divide_fractional_operands() {
        // 10.5 / 0.5 = 21
        let a = BigFixedInt::from_digits(10, &[1, 0], &[5]).unwrap();
        let b = BigFixedInt::from_digits(10, &[0], &[5]).unwrap();
        let (q, r) = div_rem(&a, &b).unwrap();
        assert_eq!(q.to_u64(), Some(21));
        assert!(r.is_zero());

        // 7.25 / 2 = 3 remainder 1.25
        let a = BigFixedInt::from_digits(10, &[7], &[2, 5]).unwrap();
        let (q, r) = div_rem(&a, &int(2)).unwrap();
        assert_eq!(q.to_u64(), Some(3));
        assert_eq!(r, BigFixedInt::from_digits(10, &[1], &[2, 5]).unwrap());
    }

    #[test]
    fn test_divide_at_max_radix() {
        let a = BigFixedInt::from_u64(MAX_RADIX, MAX_RADIX - 1).unwrap();
        let b = BigFixedInt::from_u64(MAX_RADIX, 1).unwrap();
        let q = divide(&a, &b).unwrap();
        assert_eq!(q.to_u64(), Some(MAX_RADIX - 1));

        let a = BigFixedInt::from_u64(MAX_RADIX, u64::MAX).unwrap();
        for divisor in [3, MAX_RADIX - 1, MAX_RADIX + 7, u64::MAX / 5] {
            let b = BigFixedInt::from_u64(MAX_RADIX, divisor).unwrap();
            let (q, r) = div_rem(&a, &b).unwrap();
            assert_eq!(q.to_u64(), Some(u64::MAX / divisor));
            assert_eq!(r.to_u64(), Some(u64::MAX % divisor));
        }
    }

    #[test]
    fn test_quotient_digit_bounds() {
        // Small leading divisor cell: the estimate window is wide.
        let divisor = BigFixedInt::from_digits(1000, &[1, 999], &[]).unwrap();
        let remainder = BigFixedInt::from_digits(1000, &[1, 998, 5], &[]).unwrap();
        let digit = quotient_digit(&remainder, &divisor).unwrap();
        assert_eq!(digit, 1_998_005 / 1999);
    }

    #[test]
    fn test_divide_binary() {
        let a = BigFixedInt::from_u64(2, 0b1011_0110).unwrap();
        let b = BigFixedInt::from_u64(2, 0b101).unwrap();
        let (q, r) = div_rem(&a, &b).unwrap();
        assert_eq!(q.to_u64(), Some(182 / 5));
        assert_eq!(r.to_u64(), Some(182 % 5));
    }
}
