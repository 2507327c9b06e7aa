//! # bigfixed
//!
//! Unsigned fixed-point numbers of arbitrary precision in an arbitrary radix.
//!
//! A value is a growable buffer of digit cells with an implicit radix point
//! in the middle. Operations write provisional digits and then propagate
//! carries; the buffer doubles whenever the digits in use approach either
//! end.

pub mod fixed;
pub mod handle;
mod error;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use fixed::{BigFixedInt, DEFAULT_CAPACITY, DEFAULT_RADIX, MAX_RADIX};
pub use fixed::{add_into, subtract_into, divide, divide_into, div_rem, compare};
pub use error::BigFixedError;
pub use handle::{Handle, HandleTable};
