use crate::constants::{MAX_I128_REPR, MAX_PRECISION_U32};
use crate::Decimal;
use alloc::string::String;
use core::fmt;

/// Error type for the library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A generic error, raised while parsing or when given a non-finite float.
    ErrorString(String),
    /// The value is larger than the largest representable `Decimal`.
    ExceedsMaximumPossibleValue,
    /// The value is smaller than the smallest representable `Decimal`.
    LessThanMinimumPossibleValue,
    /// A divisor was zero.
    DivisionByZero,
    /// The requested scale is above 28.
    ScaleExceedsMaximumPrecision(u32),
    /// Raw flags with reserved bits set, or a scale above 28.
    InvalidFlags(u32),
    /// The `Decimal` does not fit the named type.
    ConversionTo(String),
}

impl<S> From<S> for Error
where
    S: Into<String>,
{
    #[inline]
    fn from(from: S) -> Self {
        Self::ErrorString(from.into())
    }
}

#[cold]
pub(crate) fn tail_error(from: &'static str) -> Result<Decimal, Error> {
    Err(from.into())
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ErrorString(ref err) => f.pad(err),
            Self::ExceedsMaximumPossibleValue => {
                write!(f, "Number exceeds maximum value that can be represented: {}", MAX_I128_REPR)
            }
            Self::LessThanMinimumPossibleValue => {
                write!(f, "Number less than minimum value that can be represented: {}", -MAX_I128_REPR)
            }
            Self::DivisionByZero => f.pad("Division by zero"),
            Self::ScaleExceedsMaximumPrecision(ref scale) => {
                write!(f, "Scale exceeds maximum precision: {} > {}", scale, MAX_PRECISION_U32)
            }
            Self::InvalidFlags(ref flags) => write!(f, "Invalid decimal flags: {:#010x}", flags),
            Self::ConversionTo(ref type_name) => write!(f, "Error while converting to {}", type_name),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn it_formats_errors() {
        assert_eq!(
            Error::ScaleExceedsMaximumPrecision(29).to_string(),
            "Scale exceeds maximum precision: 29 > 28"
        );
        assert_eq!(Error::InvalidFlags(0x1D_0000).to_string(), "Invalid decimal flags: 0x001d0000");
        assert_eq!(Error::ConversionTo("i64".into()).to_string(), "Error while converting to i64");
        assert_eq!(Error::from("Invalid decimal: empty").to_string(), "Invalid decimal: empty");
    }
}
