//! Deterministic Q16.16 fixed-point numbers
//!
//! This library provides a single 32-bit fixed-point type for code that must
//! produce bit-identical results on every machine:
//!
//! - **`Fx32`**: 32-bit signed, 16 integer bits and 16 fractional bits
//!   - Range: -32768.0 to 32767.9999847412109375
//!   - Precision: 1/65536 (0.0000152587890625)
//!   - Use cases: lockstep simulation, networked game logic, embedded control
//!
//! ## Features
//!
//! - **Saturating arithmetic**: overflow clamps to `MIN`/`MAX`, it never wraps
//! - **Exact decimal parsing**: literals are scaled without a binary-float step
//! - **no_std compatible**: no allocation on any arithmetic path
//! - **Serde support**: textual serialization behind the `serde` feature
//! - **Math helpers**: `sqrt`, integer `pow`, clamping and interpolation in [`math`]
//!
//! ## Example
//!
//! ```rust
//! use fixq::{Fx32, math};
//!
//! let speed = Fx32::from_decimal_str("2.5").unwrap();
//! let time = Fx32::from_int(4);
//! assert_eq!(speed * time, Fx32::from_int(10));
//!
//! let nine = Fx32::from_int(9);
//! assert_eq!(math::sqrt(nine).unwrap(), Fx32::from_int(3));
//!
//! // Overflow saturates instead of wrapping
//! assert_eq!(Fx32::MAX + Fx32::ONE, Fx32::MAX);
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(test)]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

mod fx32;
pub mod math;

pub use fx32::{Exact, Fx32};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedError {
    #[error("division by zero")]
    DivideByZero,

    #[error("square root of a negative number")]
    DomainError,

    #[error("invalid decimal string")]
    InvalidFormat,

    #[error("decimal value out of Q16.16 range")]
    Overflow,
}

pub type Result<T> = core::result::Result<T, FixedError>;
