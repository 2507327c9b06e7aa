//! Error types for fixed-point operations.

use crate::handle::Handle;
use thiserror::Error;

/// Errors returned by [`BigFixedInt`](crate::BigFixedInt) and
/// [`HandleTable`](crate::HandleTable) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BigFixedError {
    #[error("failed to allocate a digit buffer of {cells} cells")]
    AllocationFailure { cells: usize },

    #[error("radix {0} out of range (expected 2..={})", crate::fixed::MAX_RADIX)]
    InvalidRadix(u64),

    #[error("radix mismatch: {left} vs {right}")]
    RadixMismatch { left: u64, right: u64 },

    #[error("invalid handle: {0:?}")]
    InvalidHandle(Handle),

    #[error("handle {0:?} passed as both operands")]
    AliasedOperands(Handle),

    #[error("handle table is full ({0} slots)")]
    HandleTableFull(usize),

    #[error("digit {digit} at index {index} is not below radix {radix}")]
    DigitOutOfRange { index: usize, digit: u64, radix: u64 },

    #[error("digit buffer length {0} must be even and non-zero")]
    InvalidLength(usize),

    #[error("division by zero")]
    DivisionByZero,

    #[error("subtraction underflow: subtrahend exceeds minuend")]
    Underflow,
}

impl BigFixedError {
    /// True for errors caused by a bad argument rather than by the values
    /// themselves (bad radix, bad handle, aliasing, malformed digits).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            BigFixedError::InvalidRadix(_)
                | BigFixedError::RadixMismatch { .. }
                | BigFixedError::InvalidHandle(_)
                | BigFixedError::AliasedOperands(_)
                | BigFixedError::DigitOutOfRange { .. }
                | BigFixedError::InvalidLength(_)
        )
    }
}
