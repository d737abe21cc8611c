//! A 96 bit decimal number with a scale of 0 to 28, following the .NET `System.Decimal`
//! (and OLE Automation `DECIMAL`) layout and arithmetic.
//!
//! A `Decimal` is `m / 10^e` where `m` is a 96 bit unsigned magnitude with a separate sign and
//! `e` is the scale. Results that don't fit are rounded half to even into the largest scale that
//! holds them; results that can't fit at any scale are reported as errors.
//!
//! ```
//! use decimal96::prelude::*;
//!
//! let a = Decimal::from_str("1.00").unwrap();
//! let b = Decimal::from_str("2.0").unwrap();
//! assert_eq!((a + b).to_string(), "3.00");
//!
//! let third = Decimal::ONE / Decimal::from(3);
//! assert_eq!(third.to_string(), "0.3333333333333333333333333333");
//!
//! assert!(Decimal::MAX.checked_mul(Decimal::TWO).is_none());
//! ```
#![forbid(unsafe_code)]
#![deny(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

mod arithmetic_impls;
mod constants;
mod convert;
mod decimal;
mod error;
mod ops;
mod str;

#[cfg(feature = "proptest")]
mod proptest;
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde;

pub use decimal::{Decimal, RoundingStrategy};
pub use error::Error;

/// A convenience module appropriate for glob imports (`use decimal96::prelude::*;`).
pub mod prelude {
    pub use crate::{Decimal, RoundingStrategy};
    pub use core::str::FromStr;
    pub use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
}

/// Shortcut for `core::result::Result<T, decimal96::Error>`. Useful to distinguish
/// between `decimal96` and `std` types.
pub type Result<T> = core::result::Result<T, Error>;
