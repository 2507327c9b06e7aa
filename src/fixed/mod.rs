//! Fixed-point big numbers in an arbitrary radix.
//!
//! This module provides the numeric engine:
//! - [`BigFixedInt`] - the digit store with its growth policy
//! - carry propagation (`normalize`, `add_u64`)
//! - magnitude comparison
//! - [`arith`] - addition, subtraction and long division

mod digits;
mod normalize;
mod compare;
pub mod arith;

pub use digits::{BigFixedInt, DEFAULT_CAPACITY, DEFAULT_RADIX, MAX_RADIX};
pub use compare::compare;
pub use arith::{add_into, subtract_into, divide, divide_into, div_rem};
