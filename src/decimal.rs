use crate::constants::{
    MAX_I128_REPR, MAX_PRECISION_U32, SCALE_MASK, SCALE_SHIFT, SIGN_MASK, SIGN_SHIFT, TEN_TO_POWER_NINE,
    UNSIGN_MASK, UNUSED_BITS_MASK,
};
use crate::error::Error;
use crate::ops;
use crate::ops::common::Buf12;

use core::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};
use num_traits::{Bounded, One, Zero};

/// The rounding strategy used when dropping digits from a `Decimal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingStrategy {
    /// When a number is halfway between two others, it is rounded toward the nearest even number.
    /// Also known as "Bankers Rounding".
    /// e.g.
    /// 6.5 -> 6, 7.5 -> 8
    /// -6.5 -> -6, -7.5 -> -8
    MidpointNearestEven,
    /// When a number is halfway between two others, it is rounded toward the nearest number that
    /// is away from zero. e.g. 6.4 -> 6, 6.5 -> 7, -6.5 -> -7
    MidpointAwayFromZero,
    /// When a number is halfway between two others, it is rounded toward the nearest number that
    /// is toward zero. e.g. 6.4 -> 6, 6.5 -> 6, -6.5 -> -6
    MidpointTowardZero,
    /// The number is always rounded toward zero. e.g. -6.8 -> -6, 6.8 -> 6
    ToZero,
    /// The number is always rounded away from zero. e.g. -6.8 -> -7, 6.8 -> 7
    AwayFromZero,
    /// The number is always rounded towards negative infinity. e.g. 6.8 -> 6, -6.8 -> -7
    ToNegativeInfinity,
    /// The number is always rounded towards positive infinity. e.g. 6.8 -> 7, -6.8 -> -6
    ToPositiveInfinity,
}

/// `Decimal` represents a 128 bit representation of a fixed-precision decimal number.
/// The finite set of values of type `Decimal` are of the form m / 10<sup>e</sup>,
/// where m is an integer such that -2<sup>96</sup> < m < 2<sup>96</sup>, and e is an integer
/// between 0 and 28 inclusive.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "c-repr", repr(C))]
pub struct Decimal {
    // Bits 0-15: unused
    // Bits 16-23: Contains "e", a value between 0-28 that indicates the scale
    // Bits 24-30: unused
    // Bit 31: the sign of the Decimal value, 0 meaning positive and 1 meaning negative.
    flags: u32,
    // The lo, mid, hi, and flags fields contain the representation of the
    // Decimal value as a 96-bit integer.
    hi: u32,
    lo: u32,
    mid: u32,
}

/// The outcome of an engine operation, before it is mapped onto the public API.
#[must_use]
pub(crate) enum CalculationResult {
    Ok(Decimal),
    Overflow,
    DivByZero,
}

impl Decimal {
    /// The smallest value that can be represented by this decimal type.
    pub const MIN: Decimal = Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, true, 0);
    /// The largest value that can be represented by this decimal type.
    pub const MAX: Decimal = Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, 0);
    /// A constant representing 0.
    pub const ZERO: Decimal = Decimal::from_parts(0, 0, 0, false, 0);
    /// A constant representing 1.
    pub const ONE: Decimal = Decimal::from_parts(1, 0, 0, false, 0);
    /// A constant representing -1.
    pub const NEGATIVE_ONE: Decimal = Decimal::from_parts(1, 0, 0, true, 0);
    /// A constant representing 2.
    pub const TWO: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
    /// A constant representing 10.
    pub const TEN: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
    /// A constant representing 100.
    pub const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
    /// A constant representing 1000.
    pub const ONE_THOUSAND: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
    /// The maximum supported scale value.
    pub const MAX_SCALE: u32 = MAX_PRECISION_U32;

    /// Returns a `Decimal` with a 64 bit `m` representation and corresponding `e` scale.
    ///
    /// # Arguments
    ///
    /// * `num` - An i64 that represents the `m` portion of the decimal number
    /// * `scale` - A u32 representing the `e` portion of the decimal number.
    ///
    /// # Panics
    ///
    /// This function panics if `scale` is > 28.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let pi = Decimal::new(3141, 3);
    /// assert_eq!(pi.to_string(), "3.141");
    /// ```
    #[must_use]
    pub fn new(num: i64, scale: u32) -> Decimal {
        match Self::try_new(num, scale) {
            Err(e) => panic!("{}", e),
            Ok(d) => d,
        }
    }

    /// Checked version of `Decimal::new`. Will return an error instead of panicking.
    pub fn try_new(num: i64, scale: u32) -> crate::Result<Decimal> {
        if scale > MAX_PRECISION_U32 {
            return Err(Error::ScaleExceedsMaximumPrecision(scale));
        }
        let magnitude = num.unsigned_abs();
        Ok(Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            0,
            num < 0,
            scale,
        ))
    }

    /// Creates a `Decimal` using a 128 bit signed `m` representation and corresponding `e` scale.
    ///
    /// # Panics
    ///
    /// This function panics if `scale` is > 28 or if `num` exceeds the 96 bit mantissa.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let pi = Decimal::from_i128_with_scale(3141i128, 3);
    /// assert_eq!(pi.to_string(), "3.141");
    /// ```
    #[must_use]
    pub fn from_i128_with_scale(num: i128, scale: u32) -> Decimal {
        match Self::try_from_i128_with_scale(num, scale) {
            Ok(d) => d,
            Err(e) => panic!("{}", e),
        }
    }

    /// Checked version of `Decimal::from_i128_with_scale`. Will return an error instead of panicking.
    pub fn try_from_i128_with_scale(num: i128, scale: u32) -> crate::Result<Decimal> {
        if scale > MAX_PRECISION_U32 {
            return Err(Error::ScaleExceedsMaximumPrecision(scale));
        }
        let magnitude = num.unsigned_abs();
        if magnitude > MAX_I128_REPR as u128 {
            return Err(if num < 0 {
                Error::LessThanMinimumPossibleValue
            } else {
                Error::ExceedsMaximumPossibleValue
            });
        }
        Ok(Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            (magnitude >> 64) as u32,
            num < 0,
            scale,
        ))
    }

    /// Returns a `Decimal` using the instances constituent parts.
    ///
    /// # Arguments
    ///
    /// * `lo` - The low 32 bits of a 96-bit integer.
    /// * `mid` - The middle 32 bits of a 96-bit integer.
    /// * `hi` - The high 32 bits of a 96-bit integer.
    /// * `negative` - `true` to indicate a negative number.
    /// * `scale` - A power of 10 ranging from 0 to 28.
    ///
    /// # Panics
    ///
    /// This function panics if `scale` is > 28.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let pi = Decimal::from_parts(1102470952, 185874565, 1703060790, false, 28);
    /// assert_eq!(pi.to_string(), "3.1415926535897932384626433832");
    /// ```
    #[must_use]
    pub const fn from_parts(lo: u32, mid: u32, hi: u32, negative: bool, scale: u32) -> Decimal {
        assert!(scale <= MAX_PRECISION_U32, "Scale exceeds maximum precision");
        Decimal {
            lo,
            mid,
            hi,
            flags: flags(negative, scale),
        }
    }

    // Skips flag validation. Callers outside `try_from_bits` must pass well formed flags.
    #[must_use]
    pub(crate) const fn from_parts_raw(lo: u32, mid: u32, hi: u32, flags: u32) -> Decimal {
        Decimal { lo, mid, hi, flags }
    }

    /// Builds a `Decimal` from its `[lo, mid, hi, flags]` words, rejecting flags with reserved
    /// bits set or a scale above 28.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let value = Decimal::try_from_bits([12345, 0, 0, 0x8002_0000]).unwrap();
    /// assert_eq!(value.to_string(), "-123.45");
    /// assert!(Decimal::try_from_bits([1, 0, 0, 0x001D_0000]).is_err());
    /// ```
    pub fn try_from_bits(bits: [u32; 4]) -> crate::Result<Decimal> {
        let decimal = Decimal::from_parts_raw(bits[0], bits[1], bits[2], bits[3]);
        if decimal.is_valid() {
            Ok(decimal)
        } else {
            Err(Error::InvalidFlags(bits[3]))
        }
    }

    /// Returns the `[lo, mid, hi, flags]` words of this `Decimal`.
    #[must_use]
    pub const fn to_bits(&self) -> [u32; 4] {
        [self.lo, self.mid, self.hi, self.flags]
    }

    /// Returns `true` when no reserved flag bits are set and the scale is at most 28.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.flags & UNUSED_BITS_MASK == 0 && self.scale() <= MAX_PRECISION_U32
    }

    /// Returns the scale of the decimal number, otherwise known as `e`.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let num = Decimal::new(1234, 3);
    /// assert_eq!(num.scale(), 3u32);
    /// ```
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> u32 {
        (self.flags & SCALE_MASK) >> SCALE_SHIFT
    }

    /// Returns the mantissa of the decimal number.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let num = Decimal::new(-1234, 3);
    /// assert_eq!(num.mantissa(), -1234i128);
    /// ```
    #[must_use]
    pub const fn mantissa(&self) -> i128 {
        let raw = (self.lo as i128) | ((self.mid as i128) << 32) | ((self.hi as i128) << 64);
        if self.is_sign_negative() {
            -raw
        } else {
            raw
        }
    }

    /// Sets the scale without touching the mantissa, i.e. divides the value by a power of 10.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let mut one = Decimal::ONE;
    /// one.set_scale(5).unwrap();
    /// assert_eq!(one.to_string(), "0.00001");
    /// ```
    pub fn set_scale(&mut self, scale: u32) -> crate::Result<()> {
        if scale > MAX_PRECISION_U32 {
            return Err(Error::ScaleExceedsMaximumPrecision(scale));
        }
        self.flags = (self.flags & SIGN_MASK) | (scale << SCALE_SHIFT);
        Ok(())
    }

    /// An optimized method for changing the sign of a decimal number.
    pub fn set_sign_positive(&mut self, positive: bool) {
        if positive {
            self.flags &= UNSIGN_MASK;
        } else {
            self.flags |= SIGN_MASK;
        }
    }

    /// An optimized method for changing the sign of a decimal number.
    pub fn set_sign_negative(&mut self, negative: bool) {
        self.set_sign_positive(!negative);
    }

    /// Returns `true` if the sign bit is set, including for negative zero.
    #[inline(always)]
    #[must_use]
    pub const fn is_sign_negative(&self) -> bool {
        self.flags & SIGN_MASK > 0
    }

    /// Returns `true` if the sign bit is clear.
    #[inline(always)]
    #[must_use]
    pub const fn is_sign_positive(&self) -> bool {
        self.flags & SIGN_MASK == 0
    }

    /// Returns `true` if the mantissa is zero, whatever the sign or scale.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.lo == 0 && self.mid == 0 && self.hi == 0
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Decimal {
        let mut me = *self;
        me.set_sign_positive(true);
        me
    }

    /// Returns `1` for positive numbers, `-1` for negative numbers and `0` for zero of
    /// either sign.
    #[must_use]
    pub fn signum(&self) -> Decimal {
        if self.is_zero() {
            Decimal::ZERO
        } else if self.is_sign_negative() {
            Decimal::NEGATIVE_ONE
        } else {
            Decimal::ONE
        }
    }

    /// Strips any trailing zeros from the decimal number. Zero of any sign or scale becomes
    /// plain `0`.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// # use std::str::FromStr;
    /// let number = Decimal::from_str("3.100").unwrap();
    /// assert_eq!(number.normalize().to_string(), "3.1");
    /// ```
    #[must_use]
    pub fn normalize(&self) -> Decimal {
        if self.is_zero() {
            return Decimal::ZERO;
        }
        let mut scale = self.scale();
        let mut buf = Buf12::from_decimal(self);
        while scale > 0 && buf.div32_const(10) {
            scale -= 1;
        }
        Decimal::from_buf(&buf, self.is_sign_negative(), scale)
    }

    /// Returns the integer part of the number, dropping the fraction without rounding.
    /// The sign is kept, so `-0.5` truncates to `-0`.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let pi = Decimal::new(3141, 3);
    /// assert_eq!(pi.trunc(), Decimal::new(3, 0));
    /// ```
    #[must_use]
    pub fn trunc(&self) -> Decimal {
        self.round_dp_with_strategy(0, RoundingStrategy::ToZero)
    }

    /// Returns the fractional portion of the number.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let pi = Decimal::new(3141, 3);
    /// assert_eq!(pi.fract(), Decimal::new(141, 3));
    /// ```
    #[must_use]
    pub fn fract(&self) -> Decimal {
        // The integral part never has a larger magnitude than the number
        *self - self.trunc()
    }

    /// Returns the largest integer less than or equal to the number.
    #[must_use]
    pub fn floor(&self) -> Decimal {
        self.round_dp_with_strategy(0, RoundingStrategy::ToNegativeInfinity)
    }

    /// Returns the smallest integer greater than or equal to the number.
    #[must_use]
    pub fn ceil(&self) -> Decimal {
        self.round_dp_with_strategy(0, RoundingStrategy::ToPositiveInfinity)
    }

    /// Returns the maximum of the two numbers. Ties keep `self`.
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let x = Decimal::new(1, 0);
    /// let y = Decimal::new(2, 0);
    /// assert_eq!(y, x.max(y));
    /// ```
    #[must_use]
    pub fn max(self, other: Decimal) -> Decimal {
        if ops::cmp_impl(&self, &other) == Ordering::Less {
            other
        } else {
            self
        }
    }

    /// Returns the minimum of the two numbers. Ties keep `other`.
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let x = Decimal::new(1, 0);
    /// let y = Decimal::new(2, 0);
    /// assert_eq!(x, x.min(y));
    /// ```
    #[must_use]
    pub fn min(self, other: Decimal) -> Decimal {
        if ops::cmp_impl(&self, &other) == Ordering::Less {
            self
        } else {
            other
        }
    }

    /// Returns a new `Decimal` number with no fractional portion (i.e. an integer).
    /// Rounding currently follows "Bankers Rounding" rules. e.g. 6.5 -> 6, 7.5 -> 8
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let number = Decimal::new(25, 1);
    /// assert_eq!(number.round().to_string(), "2");
    /// ```
    #[must_use]
    pub fn round(&self) -> Decimal {
        self.round_dp(0)
    }

    /// Returns a new `Decimal` number with the specified number of decimal points for fractional
    /// portion. Rounding currently follows "Bankers Rounding" rules. e.g. 6.5 -> 6, 7.5 -> 8
    ///
    /// # Arguments
    /// * `dp`: the number of decimal points to round to.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// # use std::str::FromStr;
    /// let pi = Decimal::from_str("3.1415926535897932384626433832").unwrap();
    /// assert_eq!(pi.round_dp(2).to_string(), "3.14");
    /// ```
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
    }

    /// Returns a new `Decimal` number with the specified number of decimal points for fractional
    /// portion, rounded using the given strategy. A number that already has `dp` or fewer
    /// decimal places is returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # use decimal96::{Decimal, RoundingStrategy};
    /// # use std::str::FromStr;
    /// let tax = Decimal::from_str("3.4395").unwrap();
    /// assert_eq!(tax.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero).to_string(), "3.44");
    /// ```
    #[must_use]
    pub fn round_dp_with_strategy(&self, dp: u32, strategy: RoundingStrategy) -> Decimal {
        ops::round_impl(self, dp, strategy)
    }

    /// Checked addition. Computes `self + other`, returning `None` if overflow occurred.
    #[inline(always)]
    #[must_use]
    pub fn checked_add(self, other: Decimal) -> Option<Decimal> {
        self.try_add(other).ok()
    }

    /// Addition that reports overflow as an `Error`.
    pub fn try_add(self, other: Decimal) -> crate::Result<Decimal> {
        // Addition only overflows when both magnitudes push the same way as `self`
        into_result(ops::add_impl(&self, &other), self.is_sign_negative())
    }

    /// Checked subtraction. Computes `self - other`, returning `None` if overflow occurred.
    #[inline(always)]
    #[must_use]
    pub fn checked_sub(self, other: Decimal) -> Option<Decimal> {
        self.try_sub(other).ok()
    }

    /// Subtraction that reports overflow as an `Error`.
    pub fn try_sub(self, other: Decimal) -> crate::Result<Decimal> {
        into_result(ops::sub_impl(&self, &other), self.is_sign_negative())
    }

    /// Checked multiplication. Computes `self * other`, returning `None` if overflow occurred.
    #[inline]
    #[must_use]
    pub fn checked_mul(self, other: Decimal) -> Option<Decimal> {
        self.try_mul(other).ok()
    }

    /// Multiplication that reports overflow as an `Error`.
    pub fn try_mul(self, other: Decimal) -> crate::Result<Decimal> {
        into_result(
            ops::mul_impl(&self, &other),
            self.is_sign_negative() != other.is_sign_negative(),
        )
    }

    /// Checked division. Computes `self / other`, returning `None` if `other == 0.0` or the
    /// division results in overflow.
    #[inline]
    #[must_use]
    pub fn checked_div(self, other: Decimal) -> Option<Decimal> {
        self.try_div(other).ok()
    }

    /// Division that reports overflow and division by zero as an `Error`.
    pub fn try_div(self, other: Decimal) -> crate::Result<Decimal> {
        into_result(
            ops::div_impl(&self, &other),
            self.is_sign_negative() != other.is_sign_negative(),
        )
    }

    /// Checked remainder. Computes `self % other`, returning `None` if `other == 0.0`.
    #[inline]
    #[must_use]
    pub fn checked_rem(self, other: Decimal) -> Option<Decimal> {
        self.try_rem(other).ok()
    }

    /// Remainder that reports division by zero as an `Error`. The result takes the sign of
    /// `self`.
    pub fn try_rem(self, other: Decimal) -> crate::Result<Decimal> {
        into_result(ops::rem_impl(&self, &other), self.is_sign_negative())
    }

    /// Divides the raw 96 bit mantissa by 10<sup>9</sup> in place and returns the remainder.
    /// Sign and scale are left as they are.
    ///
    /// Repeated calls peel off nine decimal digits at a time, least significant first.
    ///
    /// ```
    /// # use decimal96::Decimal;
    /// let mut value = Decimal::new(1_234_567_890_123, 2);
    /// assert_eq!(value.div_mod_1e9(), 567_890_123);
    /// assert_eq!(value.mantissa(), 1_234);
    /// assert_eq!(value.scale(), 2);
    /// ```
    pub fn div_mod_1e9(&mut self) -> u32 {
        let mut buf = Buf12::from_decimal(self);
        let remainder = buf.div32(TEN_TO_POWER_NINE);
        self.set_mantissa(&buf);
        remainder
    }

    /// Multiplies the raw mantissa by 10, wrapping on overflow. Sign and scale are left as
    /// they are.
    pub fn mul10_raw(&mut self) {
        let mut buf = Buf12::from_decimal(self);
        let _ = buf.increase_scale(10);
        self.set_mantissa(&buf);
    }

    /// Adds `value` to the raw mantissa. Returns `true` if the sum carried out of 96 bits, in
    /// which case the mantissa has wrapped.
    pub fn add_u32_raw(&mut self, value: u32) -> bool {
        let mut buf = Buf12::from_decimal(self);
        let overflowed = buf.add32(value).is_err();
        self.set_mantissa(&buf);
        overflowed
    }

    #[inline(always)]
    pub(crate) const fn lo(&self) -> u32 {
        self.lo
    }

    #[inline(always)]
    pub(crate) const fn mid(&self) -> u32 {
        self.mid
    }

    #[inline(always)]
    pub(crate) const fn hi(&self) -> u32 {
        self.hi
    }

    pub(crate) const fn from_buf(buf: &Buf12, negative: bool, scale: u32) -> Decimal {
        Decimal::from_parts(buf.lo(), buf.mid(), buf.hi(), negative, scale)
    }

    fn set_mantissa(&mut self, buf: &Buf12) {
        self.lo = buf.lo();
        self.mid = buf.mid();
        self.hi = buf.hi();
    }
}

#[inline]
const fn flags(negative: bool, scale: u32) -> u32 {
    (scale << SCALE_SHIFT) | ((negative as u32) << SIGN_SHIFT)
}

fn into_result(result: CalculationResult, negative: bool) -> crate::Result<Decimal> {
    match result {
        CalculationResult::Ok(value) => Ok(value),
        CalculationResult::Overflow if negative => Err(Error::LessThanMinimumPossibleValue),
        CalculationResult::Overflow => Err(Error::ExceedsMaximumPossibleValue),
        CalculationResult::DivByZero => Err(Error::DivisionByZero),
    }
}

impl Default for Decimal {
    /// Returns the default value for a `Decimal` (equivalent to `Decimal::ZERO`). [Read more]
    ///
    /// [Read more]: core::default::Default#tymethod.default
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl Zero for Decimal {
    fn zero() -> Decimal {
        Decimal::ZERO
    }

    fn is_zero(&self) -> bool {
        Decimal::is_zero(self)
    }
}

impl One for Decimal {
    fn one() -> Decimal {
        Decimal::ONE
    }
}

impl Bounded for Decimal {
    fn min_value() -> Self {
        Decimal::MIN
    }

    fn max_value() -> Self {
        Decimal::MAX
    }
}

impl PartialEq for Decimal {
    #[inline]
    fn eq(&self, other: &Decimal) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal values differ only in trailing zeros, sign of zero or scale of zero
        let normalized = self.normalize();
        normalized.lo.hash(state);
        normalized.mid.hash(state);
        normalized.hi.hash(state);
        normalized.flags.hash(state);
    }
}

impl PartialOrd for Decimal {
    #[inline]
    fn partial_cmp(&self, other: &Decimal) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Decimal) -> Ordering {
        ops::cmp_impl(self, other)
    }
}
