//! Carry propagation.
//!
//! Mutating operations leave provisional, possibly out-of-range values in
//! the cells; normalization settles every cell back into `[0, radix)`.

use tracing::trace;
use crate::error::BigFixedError;
use crate::fixed::BigFixedInt;

impl BigFixedInt {
    /// Propagate carries so every cell is below the radix.
    ///
    /// A carry out of the top cell grows the buffer and lands above the old
    /// most significant digit. Idempotent on settled values.
    pub fn normalize(&mut self) -> Result<(), BigFixedError> {
        self.settle_from(0, 0)
    }

    /// Add a small unsigned value to the units digit.
    pub fn add_u64(&mut self, value: u64) -> Result<(), BigFixedError> {
        self.reserve_headroom()?;
        let center = self.center();
        let units = std::mem::take(&mut self.digits_mut()[center]);
        // Wide carry-in: `value` may exceed both the radix and the cell width.
        self.settle_from(center, units as u128 + value as u128)
    }

    /// Settle cells from `start` upward with an initial carry.
    pub(crate) fn settle_from(&mut self, start: usize, carry: u128) -> Result<(), BigFixedError> {
        let radix = self.radix() as u128;
        let mut carry = carry;

        for cell in self.digits_mut()[start..].iter_mut() {
            let total = *cell as u128 + carry;
            *cell = (total % radix) as u64;
            carry = total / radix;
        }

        if carry > 0 {
            trace!(carry = carry as u64, "carry past most significant cell");
            let mut index = self.capacity();
            while carry > 0 {
                if index == self.capacity() {
                    index += self.grow()?;
                }
                self.digits_mut()[index] = (carry % radix) as u64;
                carry /= radix;
                index += 1;
            }
        }

        self.refresh_size();
        self.reserve_headroom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_u64_carries() {
        let mut value = BigFixedInt::from_u64(10, 999).unwrap();
        value.add_u64(1).unwrap();
        assert_eq!(value.to_u64(), Some(1000));
        assert_eq!(value.integer_len(), 4);
    }

    #[test]
    fn test_add_u64_beyond_radix() {
        let mut value = BigFixedInt::new(2).unwrap();
        value.add_u64(u64::MAX).unwrap();
        assert_eq!(value.integer_len(), 64);
        assert_eq!(value.to_u64(), Some(u64::MAX));
        assert!(value.size() * 2 < value.capacity());

        value.add_u64(1).unwrap();
        assert_eq!(value.integer_len(), 65);
        assert_eq!(value.to_u64(), None);
    }

    #[test]
    fn test_carry_past_top_grows() {
        // Two cells: one fractional, one integer. Anything >= radix overflows.
        let mut value = BigFixedInt::with_capacity(10, 2).unwrap();
        let before = value.capacity();
        value.digits_mut()[1] = 57;
        value.normalize().unwrap();
        assert!(value.capacity() > before);
        assert_eq!(value.to_u64(), Some(57));
        assert!(value.digits().iter().all(|&d| d < 10));
    }

    #[test]
    fn test_normalize_fractional_carry() {
        let mut value = BigFixedInt::new(10).unwrap();
        let below = value.center() - 1;
        value.digits_mut()[below] = 23;
        value.normalize().unwrap();
        assert_eq!(value.digit_at(0), 2);
        assert_eq!(value.digit_at(-1), 3);
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut value = BigFixedInt::from_digits(16, &[15, 3, 0, 9], &[1, 15]).unwrap();
        let before = value.digits().to_vec();
        value.normalize().unwrap();
        assert_eq!(value.digits(), &before[..]);
        value.normalize().unwrap();
        assert_eq!(value.digits(), &before[..]);
    }
}
