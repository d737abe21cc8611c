use crate::constants::{MAX_I32_SCALE, MAX_PRECISION_I32, OVERFLOW_MAX_1_HI, POWERS_10, POWER_OVERFLOW_VALUES};
use crate::decimal::{CalculationResult, Decimal};
use crate::ops::common::{div_mod_64_by_32, mul32, Buf12, Buf16, Overflow};

use core::cmp::Ordering;

// What is left over after dividing, along with the divisor needed to keep going. The quotient is
// built up the same way whatever the width of the divisor; only these steps differ.
trait Remainder {
    fn is_zero(&self) -> bool;

    // Whether the quotient rounds up: twice the remainder against the divisor, ties to even.
    fn round_up(&self, quotient_odd: bool) -> bool;

    // Multiplies the remainder by `power` and divides again, returning the next quotient digits.
    fn scale_and_divide(&mut self, power: u32) -> u32;
}

struct Remainder32 {
    remainder: u32,
    divisor: u32,
}

impl Remainder for Remainder32 {
    fn is_zero(&self) -> bool {
        self.remainder == 0
    }

    fn round_up(&self, quotient_odd: bool) -> bool {
        // A remainder with its top bit set doubles past any 32 bit divisor
        if self.remainder >> 31 != 0 {
            return true;
        }
        let doubled = self.remainder << 1;
        doubled > self.divisor || (doubled == self.divisor && quotient_odd)
    }

    fn scale_and_divide(&mut self, power: u32) -> u32 {
        let (quotient, remainder) = div_mod_64_by_32(mul32(self.remainder, power), self.divisor);
        self.remainder = remainder;
        quotient
    }
}

struct Remainder64 {
    remainder: Buf16,
    divisor: u64,
}

impl Remainder for Remainder64 {
    fn is_zero(&self) -> bool {
        self.remainder.low64() == 0
    }

    fn round_up(&self, quotient_odd: bool) -> bool {
        let remainder = self.remainder.low64();
        if remainder >> 63 != 0 {
            return true;
        }
        let doubled = remainder << 1;
        doubled > self.divisor || (doubled == self.divisor && quotient_odd)
    }

    fn scale_and_divide(&mut self, power: u32) -> u32 {
        // Below 2^64 * 10^9, so the product stays within 96 bits
        let _ = self.remainder.increase_scale(power);
        self.remainder.partial_divide_64(self.divisor)
    }
}

struct Remainder96 {
    remainder: Buf16,
    divisor: Buf12,
}

impl Remainder for Remainder96 {
    fn is_zero(&self) -> bool {
        self.remainder.is_zero()
    }

    fn round_up(&self, quotient_odd: bool) -> bool {
        let mut doubled = self.remainder.resize::<3>();
        if doubled.shl(1) != 0 {
            return true;
        }
        match doubled.cmp(&self.divisor) {
            Ordering::Greater => true,
            Ordering::Equal => quotient_odd,
            Ordering::Less => false,
        }
    }

    fn scale_and_divide(&mut self, power: u32) -> u32 {
        // Below 2^96 * 10^9, so the product stays within 128 bits
        let _ = self.remainder.increase_scale(power);
        self.remainder.partial_divide_96(&self.divisor)
    }
}

pub(crate) fn div_impl(dividend: &Decimal, divisor: &Decimal) -> CalculationResult {
    if divisor.is_zero() {
        return CalculationResult::DivByZero;
    }

    // Pre calculate the scale and the sign
    let scale = (dividend.scale() as i32) - (divisor.scale() as i32);
    let negative = dividend.is_sign_negative() ^ divisor.is_sign_negative();
    if dividend.is_zero() {
        return CalculationResult::Ok(Decimal::from_parts(0, 0, 0, negative, scale.max(0) as u32));
    }

    let mut quotient = Buf12::from_decimal(dividend);
    let divisor = Buf12::from_decimal(divisor);

    // Branch depending on the complexity of the divisor
    if divisor.hi() | divisor.mid() == 0 {
        // We have a simple(r) divisor (32 bit)
        let remainder = quotient.div32(divisor.lo());
        return divide(
            quotient,
            Remainder32 {
                remainder,
                divisor: divisor.lo(),
            },
            scale,
            negative,
        );
    }

    // The divisor is wider than 32 bits. Shift both operands left until the top bit of the divisor
    // is set; the quotient is unchanged and each long division step can then be estimated from
    // the leading words alone.
    let mut remainder = quotient.resize::<4>();
    if divisor.hi() == 0 {
        let shift = divisor.mid().leading_zeros();
        remainder.shl(shift);
        let divisor = divisor.low64() << shift;

        // Divide the upper 96 bits first, then bring down the low word
        let low = remainder.data[0];
        remainder.data = [remainder.data[1], remainder.data[2], remainder.data[3], 0];
        let mid = remainder.partial_divide_64(divisor);
        remainder.data = [low, remainder.data[0], remainder.data[1], 0];
        let lo = remainder.partial_divide_64(divisor);

        divide(
            Buf12::from_words(lo, mid, 0),
            Remainder64 { remainder, divisor },
            scale,
            negative,
        )
    } else {
        let shift = divisor.hi().leading_zeros();
        remainder.shl(shift);
        let mut divisor = divisor;
        divisor.shl(shift);
        let lo = remainder.partial_divide_96(&divisor);

        divide(
            Buf12::from_words(lo, 0, 0),
            Remainder96 { remainder, divisor },
            scale,
            negative,
        )
    }
}

// Folds the remainder into the quotient one power of ten at a time until either the remainder
// is exhausted or the quotient can't take another digit, in which case it is rounded.
fn divide<R: Remainder>(mut quotient: Buf12, mut remainder: R, scale: i32, negative: bool) -> CalculationResult {
    let mut scale = scale;
    // Only a quotient that absorbed remainder digits can carry superfluous trailing zeros
    let require_unscale = !remainder.is_zero();

    loop {
        let power_scale = if remainder.is_zero() {
            // If the scale is positive then we're actually done
            if scale >= 0 {
                break;
            }
            (-scale).min(MAX_I32_SCALE) as usize
        } else {
            // Figure out how much we can scale by
            let power_scale = match find_scale(&quotient, scale) {
                Ok(power_scale) => power_scale,
                Err(_) => return CalculationResult::Overflow,
            };
            if power_scale == 0 {
                // No more scaling can be done, but remainder is non-zero so we round if necessary.
                if remainder.round_up(quotient.lo() & 1 != 0) {
                    match round_up(&mut quotient, scale) {
                        Ok(new_scale) => scale = new_scale,
                        Err(_) => return CalculationResult::Overflow,
                    }
                }
                break;
            }
            power_scale
        };

        // Do some scaling
        let power = POWERS_10[power_scale];
        scale += power_scale as i32;
        if quotient.increase_scale(power) != 0 {
            return CalculationResult::Overflow;
        }

        let digits = remainder.scale_and_divide(power);
        if quotient.add32(digits).is_err() {
            match unscale_from_overflow(&mut quotient, scale, !remainder.is_zero()) {
                Ok(new_scale) => scale = new_scale,
                Err(_) => return CalculationResult::Overflow,
            }
            break;
        }
    }

    if require_unscale {
        scale = unscale(&mut quotient, scale);
    }
    CalculationResult::Ok(Decimal::from_buf(&quotient, negative, scale as u32))
}

// Adjust the number to deal with an overflow. This function follows being scaled up (i.e. multiplied
// by 10), so this effectively tries to reverse that by dividing by 10 then feeding in the high bit
// to undo the overflow and rounding instead.
// Returns the updated scale.
fn unscale_from_overflow(num: &mut Buf12, scale: i32, sticky: bool) -> Result<i32, Overflow> {
    if scale <= 0 {
        return Err(Overflow);
    }
    num.descale_carry(sticky);
    Ok(scale - 1)
}

// Determine the maximum value of x that ensures that the quotient when scaled up by 10^x
// still fits in 96 bits, without taking the scale past 28. Ultimately, we want to make scale
// positive - if we can't then we're going to overflow. Because x is ultimately used to lookup
// inside the POWERS array, it must be a valid value 0 <= x <= 9
fn find_scale(num: &Buf12, scale: i32) -> Result<usize, Overflow> {
    let fits = |power: usize| power == 0 || *num <= POWER_OVERFLOW_VALUES[power - 1];

    // Quick check to stop us from trying to scale any more.
    let x = if num.hi() > OVERFLOW_MAX_1_HI || scale >= MAX_PRECISION_I32 {
        0
    } else {
        let limit = if scale > MAX_PRECISION_I32 - MAX_I32_SCALE {
            (MAX_PRECISION_I32 - scale) as usize
        } else {
            // A full 10^9 step is always taken when it fits, even if the scale stays negative.
            // Later steps bring it back up.
            if fits(MAX_I32_SCALE as usize) {
                return Ok(MAX_I32_SCALE as usize);
            }
            MAX_I32_SCALE as usize
        };
        if fits(limit) {
            limit
        } else {
            // Binary search for the largest power that still fits
            let (mut low, mut high) = (0, limit - 1);
            while low < high {
                let mid = (low + high + 1) / 2;
                if fits(mid) {
                    low = mid;
                } else {
                    high = mid - 1;
                }
            }
            low
        }
    };

    // Confirm we've actually resolved things
    if x as i32 + scale < 0 {
        Err(Overflow)
    } else {
        Ok(x)
    }
}

#[inline]
fn round_up(num: &mut Buf12, scale: i32) -> Result<i32, Overflow> {
    match num.add32(1) {
        Ok(()) => Ok(scale),
        Err(_) => unscale_from_overflow(num, scale, true),
    }
}

fn unscale(num: &mut Buf12, scale: i32) -> i32 {
    // Since 10 = 2 * 5, there must be a factor of 2 for every power of 10 we can extract.
    // We use this as a quick test on whether to try a given power.
    let mut scale = scale;
    while num.lo() & 0xFF == 0 && scale >= 8 && num.div32_const(100_000_000) {
        scale -= 8;
    }

    if num.lo() & 0xF == 0 && scale >= 4 && num.div32_const(10_000) {
        scale -= 4;
    }

    if num.lo() & 0x3 == 0 && scale >= 2 && num.div32_const(100) {
        scale -= 2;
    }

    if num.lo() & 0x1 == 0 && scale >= 1 && num.div32_const(10) {
        scale -= 1;
    }
    scale
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::TEN_TO_POWER_NINE;

    fn div(a: Decimal, b: Decimal) -> Decimal {
        match div_impl(&a, &b) {
            CalculationResult::Ok(value) => value,
            CalculationResult::Overflow => panic!("overflow dividing {} by {}", a, b),
            CalculationResult::DivByZero => panic!("division by zero"),
        }
    }

    #[test]
    fn it_finds_the_largest_scale_that_fits() {
        assert_eq!(find_scale(&Buf12::from_words(1, 0, 0), 0), Ok(9));
        assert_eq!(find_scale(&Buf12::from_words(1, 0, 0), 25), Ok(3));
        assert_eq!(find_scale(&Buf12::from_words(1, 0, 0), 28), Ok(0));
        assert_eq!(find_scale(&POWER_OVERFLOW_VALUES[4], 0), Ok(5));

        let mut just_over = POWER_OVERFLOW_VALUES[4];
        assert_eq!(just_over.add32(1), Ok(()));
        assert_eq!(find_scale(&just_over, 0), Ok(4));

        assert_eq!(find_scale(&Buf12::from_words(0, 0, u32::MAX), 3), Ok(0));
        assert_eq!(find_scale(&Buf12::from_words(0, 0, u32::MAX), -1), Err(Overflow));
        assert_eq!(find_scale(&Buf12::from_words(1, 0, 0), -10), Ok(9));
        assert_eq!(find_scale(&Buf12::from_words(1, 0, 0), -25), Ok(9));
    }

    #[test]
    fn it_strips_trailing_zeros_from_the_quotient() {
        let mut num = Buf12::from_words(TEN_TO_POWER_NINE, 0, 0);
        assert_eq!(unscale(&mut num, 12), 3);
        assert_eq!(num.lo(), 1);

        let mut num = Buf12::from_words(120, 0, 0);
        assert_eq!(unscale(&mut num, 0), 0);
        assert_eq!(num.lo(), 120);
    }

    #[test]
    fn it_divides_by_32_bit_divisors() {
        // 3333333333333333333333333333 at scale 28
        assert_eq!(
            div(Decimal::ONE, Decimal::new(3, 0)).to_bits(),
            [0x0555_5555, 0x14B7_00CB, 0x0AC5_44CA, 0x001C_0000]
        );
        assert_eq!(div(Decimal::new(1000, 2), Decimal::TWO).to_bits(), [5, 0, 0, 0]);
        assert_eq!(div(Decimal::new(7, 0), Decimal::new(3, 4)).to_string(), "23333.333333333333333333333333");
    }

    #[test]
    fn it_divides_by_64_bit_divisors() {
        let divisor = Decimal::new(1_000_000_000_000_000_000, 0);
        assert_eq!(div(Decimal::from_i128_with_scale(10i128.pow(27), 0), divisor).to_string(), "1000000000");
        assert_eq!(div(Decimal::ONE, divisor).to_string(), "0.000000000000000001");
        assert_eq!(
            div(Decimal::new(2, 0), Decimal::new(3_000_000_000_000_000_000, 0)).to_string(),
            "0.0000000000000000006666666667"
        );
    }

    #[test]
    fn it_divides_by_96_bit_divisors() {
        assert_eq!(div(Decimal::MAX, Decimal::MAX).to_bits(), [1, 0, 0, 0]);
        assert_eq!(div(Decimal::ONE, Decimal::MAX).to_bits(), [0, 0, 0, 0]);
        let divisor = Decimal::from_i128_with_scale(3 * 10i128.pow(20), 0);
        assert_eq!(div(Decimal::MAX, divisor).to_string(), "264093875.04754779197847983445");
    }

    #[test]
    fn it_divides_by_values_with_a_large_scale() {
        // Natural scale -20, brought back up by the remainder digits
        assert_eq!(div(Decimal::ONE, Decimal::new(3, 20)).to_string(), "33333333333333333333.333333333");
        let result = div(
            Decimal::from_parts(2_136_564_730, 0, 0, true, 16),
            Decimal::from_parts(2_889_741_400, 0, 0, true, 27),
        );
        assert_eq!(result.to_string(), "73936191314.558458414306553521");
        // Exact quotients still scale up with a zero remainder
        assert_eq!(div(Decimal::new(6, 0), Decimal::new(3, 20)).to_string(), "200000000000000000000");
    }

    #[test]
    fn it_preserves_the_scale_of_a_zero_dividend() {
        let result = div(Decimal::new(0, 5), Decimal::new(-1, 2));
        assert_eq!(result.to_bits(), [0, 0, 0, 0x8003_0000]);
    }

    #[test]
    fn it_overflows_when_the_quotient_is_too_large() {
        assert!(matches!(
            div_impl(&Decimal::MAX, &Decimal::new(1, 1)),
            CalculationResult::Overflow
        ));
        assert!(matches!(
            div_impl(&Decimal::ONE, &Decimal::ZERO),
            CalculationResult::DivByZero
        ));
    }
}
