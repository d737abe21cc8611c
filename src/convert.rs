use crate::constants::{
    CURRENCY_SCALE, DOUBLE_BIAS, DOUBLE_POWERS_10, MAX_I128_REPR, MAX_PRECISION_I32, POWERS_10, POWERS_10_U64,
    SINGLE_BIAS, TWO_POW_64,
};
use crate::decimal::{Decimal, RoundingStrategy};
use crate::error::Error;
use crate::ops::common::{mul_64x64_to_128, Buf12, Split64};
use crate::ops::round_magnitude;

use core::convert::TryFrom;
use num_traits::{FromPrimitive, ToPrimitive};

// A float with a binary exponent below this can't reach half of 10^-28.
const MIN_FLOAT_EXPONENT: i32 = -94;
// Anything at or above 2^96 doesn't fit the mantissa.
const MAX_FLOAT_EXPONENT: i32 = 96;
// log10(2) * 2^16
const LOG10_2_SCALED: i32 = 19728;

impl Decimal {
    /// Converts to the OLE Automation currency format: a 64 bit integer counting
    /// ten-thousandths. Extra digits are rounded half to even.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let price = Decimal::new(1234567, 5);
    /// assert_eq!(price.to_oa_currency().unwrap(), 123457);
    /// ```
    pub fn to_oa_currency(&self) -> crate::Result<i64> {
        if !self.is_valid() {
            return Err(Error::InvalidFlags(self.to_bits()[3]));
        }
        let negative = self.is_sign_negative();
        let scale = self.scale();
        let mut buf = Buf12::from_decimal(self);
        if scale < CURRENCY_SCALE {
            if buf.increase_scale(POWERS_10[(CURRENCY_SCALE - scale) as usize]) != 0 {
                return Err(currency_overflow());
            }
        } else {
            round_magnitude(
                &mut buf,
                scale - CURRENCY_SCALE,
                negative,
                RoundingStrategy::MidpointNearestEven,
            );
        }
        if buf.hi() != 0 {
            return Err(currency_overflow());
        }

        let magnitude = buf.low64();
        if negative {
            // i64::MIN has no positive counterpart
            if magnitude > i64::MIN.unsigned_abs() {
                return Err(currency_overflow());
            }
            Ok((magnitude as i64).wrapping_neg())
        } else if magnitude > i64::MAX as u64 {
            Err(currency_overflow())
        } else {
            Ok(magnitude as i64)
        }
    }

    /// Builds a `Decimal` from an OLE Automation currency value, i.e. `cy / 10^4`. Trailing
    /// zeros are dropped from the fraction.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let price = Decimal::from_oa_currency(123450);
    /// assert_eq!(price.to_string(), "12.345");
    /// ```
    #[must_use]
    pub fn from_oa_currency(cy: i64) -> Decimal {
        let mut buf = Buf12::zero();
        buf.set_low64(cy.unsigned_abs());
        let mut scale = CURRENCY_SCALE;
        while scale > 0 && buf.div32_const(10) {
            scale -= 1;
        }
        Decimal::from_buf(&buf, cy < 0, scale)
    }
}

fn currency_overflow() -> Error {
    Error::ConversionTo("OLE Automation currency".into())
}

fn float_overflow(negative: bool) -> Error {
    if negative {
        Error::LessThanMinimumPossibleValue
    } else {
        Error::ExceedsMaximumPossibleValue
    }
}

// Scales a non-negative float so that its integer part carries `digits + 1` significant
// digits, as far as a scale of 28 allows. Returns the scaled value and the power of ten it
// was multiplied by, which is negative when it had to be divided.
fn scale_float(value: f64, exponent: i32, digits: i32) -> (f64, i32) {
    let upper = DOUBLE_POWERS_10[(digits + 1) as usize];
    let mut value = value;
    let mut power = digits - ((exponent * LOG10_2_SCALED) >> 16);
    if power >= 0 {
        power = power.min(MAX_PRECISION_I32);
        value *= DOUBLE_POWERS_10[power as usize];
    } else if power != -1 || value >= upper {
        value /= DOUBLE_POWERS_10[(-power) as usize];
    } else {
        power = 0;
    }

    // The estimate of log10 can come up a digit short
    if value < DOUBLE_POWERS_10[digits as usize] && power < MAX_PRECISION_I32 {
        value *= 10.0;
        power += 1;
    }
    (value, power)
}

// Rounds half to even on the least significant bit of the integer part.
fn round_float(value: f64) -> u64 {
    let mut integer = value as u64;
    let fraction = value - integer as f64;
    if fraction > 0.5 || (fraction == 0.5 && integer & 1 != 0) {
        integer += 1;
    }
    integer
}

// Drops trailing zeros from a mantissa that was scaled up by 10^power, trying each power of
// two in `steps` once. Returns the remaining scale.
fn factor_out_zeros(buf: &mut Buf12, power: i32, max: i32, steps: &[usize]) -> u32 {
    let mut power = power;
    let mut limit = power.min(max);
    for &step in steps {
        if step as i32 <= limit && buf.div32_const(POWERS_10[step]) {
            power -= step as i32;
            limit -= step as i32;
        }
    }
    power as u32
}

fn from_f64(input: f64) -> crate::Result<Decimal> {
    if !input.is_finite() {
        return Err(Error::from("Invalid decimal: NaN or infinite float"));
    }
    let exponent = ((input.to_bits() >> 52) & 0x7FF) as i32 - DOUBLE_BIAS;
    if exponent < MIN_FLOAT_EXPONENT {
        return Ok(Decimal::ZERO);
    }
    let negative = input.is_sign_negative();
    if exponent > MAX_FLOAT_EXPONENT {
        return Err(float_overflow(negative));
    }

    // A double only carries 15 significant digits, anything past that is noise
    let (value, power) = scale_float(input.abs(), exponent, 14);
    let mantissa = round_float(value);
    if mantissa == 0 {
        return Ok(Decimal::ZERO);
    }

    let mut buf = Buf12::zero();
    if power < 0 {
        // At most 14 more digits
        let (high, low) = mul_64x64_to_128(Split64(mantissa), Split64(POWERS_10_U64[(-power) as usize]));
        if high >> 32 != 0 {
            return Err(float_overflow(negative));
        }
        buf.set_low64(low);
        buf.data[2] = high as u32;
        return Ok(Decimal::from_buf(&buf, negative, 0));
    }

    buf.set_low64(mantissa);
    let scale = factor_out_zeros(&mut buf, power, 14, &[8, 4, 2, 1]);
    Ok(Decimal::from_buf(&buf, negative, scale))
}

fn from_f32(input: f32) -> crate::Result<Decimal> {
    if !input.is_finite() {
        return Err(Error::from("Invalid decimal: NaN or infinite float"));
    }
    let exponent = ((input.to_bits() >> 23) & 0xFF) as i32 - SINGLE_BIAS;
    if exponent < MIN_FLOAT_EXPONENT {
        return Ok(Decimal::ZERO);
    }
    let negative = input.is_sign_negative();
    if exponent > MAX_FLOAT_EXPONENT {
        return Err(float_overflow(negative));
    }

    // 7 significant digits for a single
    let (value, power) = scale_float(f64::from(input).abs(), exponent, 6);
    let mantissa = round_float(value);
    if mantissa == 0 {
        return Ok(Decimal::ZERO);
    }

    let mut buf = Buf12::zero();
    buf.set_low64(mantissa);
    if power < 0 {
        // Up to 22 more digits, which can leave 96 bits
        let mut remaining = (-power) as usize;
        while remaining > 0 {
            let step = remaining.min(9);
            if buf.increase_scale(POWERS_10[step]) != 0 {
                return Err(float_overflow(negative));
            }
            remaining -= step;
        }
        return Ok(Decimal::from_buf(&buf, negative, 0));
    }

    let scale = factor_out_zeros(&mut buf, power, 6, &[4, 2, 1]);
    Ok(Decimal::from_buf(&buf, negative, scale))
}

fn to_f64(value: &Decimal) -> f64 {
    let magnitude = (Split64::from_parts(value.lo(), value.mid()).0 as f64 + value.hi() as f64 * TWO_POW_64)
        / DOUBLE_POWERS_10[value.scale() as usize];
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

const fn from_magnitude(magnitude: u64, negative: bool) -> Decimal {
    Decimal::from_parts(magnitude as u32, (magnitude >> 32) as u32, 0, negative, 0)
}

macro_rules! impl_from_signed {
    ($($T:ty),*) => {
        $(
            impl From<$T> for Decimal {
                #[inline]
                fn from(t: $T) -> Decimal {
                    from_magnitude((t as i64).unsigned_abs(), t < 0)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($T:ty),*) => {
        $(
            impl From<$T> for Decimal {
                #[inline]
                fn from(t: $T) -> Decimal {
                    from_magnitude(t as u64, false)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl TryFrom<i128> for Decimal {
    type Error = Error;

    fn try_from(t: i128) -> Result<Self, Error> {
        Decimal::try_from_i128_with_scale(t, 0)
    }
}

impl TryFrom<u128> for Decimal {
    type Error = Error;

    fn try_from(t: u128) -> Result<Self, Error> {
        if t > MAX_I128_REPR as u128 {
            return Err(Error::ExceedsMaximumPossibleValue);
        }
        Decimal::try_from_i128_with_scale(t as i128, 0)
    }
}

impl TryFrom<f64> for Decimal {
    type Error = Error;

    /// Keeps the 15 significant digits a double can be trusted with, rounding half to even.
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// # use core::convert::TryFrom;
    /// let tenth = Decimal::try_from(0.1f64).unwrap();
    /// assert_eq!(tenth.to_string(), "0.1");
    /// ```
    fn try_from(value: f64) -> Result<Self, Error> {
        from_f64(value)
    }
}

impl TryFrom<f32> for Decimal {
    type Error = Error;

    /// Keeps the 7 significant digits a single can be trusted with, rounding half to even.
    fn try_from(value: f32) -> Result<Self, Error> {
        from_f32(value)
    }
}

macro_rules! impl_try_from_decimal {
    ($($T:ty),*) => {
        $(
            impl TryFrom<Decimal> for $T {
                type Error = Error;

                /// Truncates toward zero, then fails if the integer part doesn't fit.
                #[inline]
                fn try_from(t: Decimal) -> Result<Self, Error> {
                    <$T>::try_from(t.trunc().mantissa()).map_err(|_| Error::ConversionTo(stringify!($T).into()))
                }
            }
        )*
    };
}

impl_try_from_decimal!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<Decimal> for f64 {
    type Error = Error;

    fn try_from(t: Decimal) -> Result<Self, Error> {
        if !t.is_valid() {
            return Err(Error::InvalidFlags(t.to_bits()[3]));
        }
        Ok(to_f64(&t))
    }
}

impl TryFrom<Decimal> for f32 {
    type Error = Error;

    fn try_from(t: Decimal) -> Result<Self, Error> {
        f64::try_from(t).map(|value| value as f32)
    }
}

impl FromPrimitive for Decimal {
    fn from_i32(n: i32) -> Option<Decimal> {
        Some(Decimal::from(n))
    }

    fn from_i64(n: i64) -> Option<Decimal> {
        Some(Decimal::from(n))
    }

    fn from_i128(n: i128) -> Option<Decimal> {
        Decimal::try_from(n).ok()
    }

    fn from_u32(n: u32) -> Option<Decimal> {
        Some(Decimal::from(n))
    }

    fn from_u64(n: u64) -> Option<Decimal> {
        Some(Decimal::from(n))
    }

    fn from_u128(n: u128) -> Option<Decimal> {
        Decimal::try_from(n).ok()
    }

    fn from_f32(n: f32) -> Option<Decimal> {
        from_f32(n).ok()
    }

    fn from_f64(n: f64) -> Option<Decimal> {
        from_f64(n).ok()
    }
}

impl ToPrimitive for Decimal {
    fn to_i64(&self) -> Option<i64> {
        i64::try_from(self.trunc().mantissa()).ok()
    }

    fn to_i128(&self) -> Option<i128> {
        Some(self.trunc().mantissa())
    }

    fn to_u64(&self) -> Option<u64> {
        u64::try_from(self.trunc().mantissa()).ok()
    }

    fn to_u128(&self) -> Option<u128> {
        u128::try_from(self.trunc().mantissa()).ok()
    }

    fn to_f64(&self) -> Option<f64> {
        f64::try_from(*self).ok()
    }

    fn to_f32(&self) -> Option<f32> {
        f32::try_from(*self).ok()
    }
}
