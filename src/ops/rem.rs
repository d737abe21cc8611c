use crate::decimal::{CalculationResult, Decimal};
use crate::ops::{add_impl, cmp_impl, div_impl, mul_impl, sub_impl};

use core::cmp::Ordering;

// 1e-28 either side of zero
const NEAR_POSITIVE_ZERO: Decimal = Decimal::from_parts(1, 0, 0, false, 28);
const NEAR_NEGATIVE_ZERO: Decimal = Decimal::from_parts(1, 0, 0, true, 28);

macro_rules! tri {
    ($expr:expr) => {
        match $expr {
            CalculationResult::Ok(value) => value,
            other => return other,
        }
    };
}

// Computes `d1 - trunc(d1 / d2) * d2`. The result takes the sign of the dividend.
pub(crate) fn rem_impl(d1: &Decimal, d2: &Decimal) -> CalculationResult {
    if d2.is_zero() {
        return CalculationResult::DivByZero;
    }
    if d1.is_zero() {
        return CalculationResult::Ok(*d1);
    }

    // The sign of the divisor doesn't matter
    let mut d2 = *d2;
    d2.set_sign_negative(d1.is_sign_negative());
    if cmp_magnitude(d1, &d2) == Ordering::Less {
        return CalculationResult::Ok(*d1);
    }

    // Take one divisor off up front. Dividing a 28 digit number can round the quotient up, and
    // the multiplication below would then overflow for values close to the maximum.
    let mut d1 = tri!(sub_impl(d1, &d2));
    if d1.is_zero() {
        d1.set_sign_negative(d2.is_sign_negative());
    }

    let quotient = tri!(div_impl(&d1, &d2)).trunc();
    let product = tri!(mul_impl(&quotient, &d2));
    let result = tri!(sub_impl(&d1, &product));

    if result.is_sign_negative() == d1.is_sign_negative() {
        return CalculationResult::Ok(result);
    }
    if cmp_impl(&NEAR_NEGATIVE_ZERO, &result) != Ordering::Greater
        && cmp_impl(&result, &NEAR_POSITIVE_ZERO) != Ordering::Greater
    {
        // The quotient ran out of digits and rounded, leaving a result a hair either side of
        // zero. Only its sign is wrong.
        let mut result = result;
        result.set_sign_negative(d1.is_sign_negative());
        CalculationResult::Ok(result)
    } else {
        // The quotient rounded up, so the product overshot. Add the divisor back.
        add_impl(&result, &d2)
    }
}

fn cmp_magnitude(d1: &Decimal, d2: &Decimal) -> Ordering {
    cmp_impl(&d1.abs(), &d2.abs())
}

#[cfg(test)]
mod test {
    use super::*;

    fn rem(a: Decimal, b: Decimal) -> Decimal {
        match rem_impl(&a, &b) {
            CalculationResult::Ok(value) => value,
            _ => panic!("unexpected failure for {} % {}", a, b),
        }
    }

    #[test]
    fn it_takes_the_sign_of_the_dividend() {
        assert_eq!(rem(Decimal::new(-7, 0), Decimal::new(3, 0)), Decimal::new(-1, 0));
        assert_eq!(rem(Decimal::new(7, 0), Decimal::new(-3, 0)), Decimal::new(1, 0));
        assert_eq!(rem(Decimal::new(-7, 0), Decimal::new(-3, 0)), Decimal::new(-1, 0));
    }

    #[test]
    fn it_returns_small_dividends_unchanged() {
        let dividend = Decimal::new(-25, 1);
        assert_eq!(rem(dividend, Decimal::new(3, 0)).to_bits(), dividend.to_bits());
    }

    #[test]
    fn it_keeps_the_sign_of_a_zero_remainder() {
        let result = rem(Decimal::new(-6, 0), Decimal::new(3, 0));
        assert!(result.is_zero());
        assert!(result.is_sign_negative());
    }

    fn quotient(a: Decimal, b: Decimal) -> Decimal {
        match div_impl(&a, &b) {
            CalculationResult::Ok(value) => value,
            _ => panic!("unexpected failure for {} / {}", a, b),
        }
    }

    #[test]
    fn it_fixes_the_sign_of_a_result_next_to_zero() {
        let dividend = Decimal::from_i128_with_scale(60_000_000_000_000_000_000_000_000_001, 28);
        let divisor = Decimal::from_i128_with_scale(30_000_000_000_000_000_000_000_000_001, 28);
        // 3 / 3.0000000000000000000000000001 rounds up to 1 at 28 places, so the product
        // overshoots by exactly 1e-28
        let reduced = Decimal::from_i128_with_scale(30_000_000_000_000_000_000_000_000_000, 28);
        assert_eq!(quotient(reduced, divisor).to_bits(), [1, 0, 0, 0]);

        assert_eq!(rem(dividend, divisor).to_bits(), [1, 0, 0, 0x001C_0000]);
        assert_eq!(rem(-dividend, divisor).to_bits(), [1, 0, 0, 0x801C_0000]);
    }

    #[test]
    fn it_adds_the_divisor_back_when_the_quotient_rounds_up() {
        let dividend = Decimal::from_i128_with_scale(29_999_999_999_999_999_999_999_999_999, 1);
        let divisor = Decimal::new(3, 0);
        // 2999999999999999999999999996.9 / 3 only has room for one decimal place and rounds up
        let reduced = Decimal::from_i128_with_scale(29_999_999_999_999_999_999_999_999_969, 1);
        assert_eq!(
            quotient(reduced, divisor),
            Decimal::from_i128_with_scale(999_999_999_999_999_999_999_999_999, 0)
        );

        assert_eq!(rem(dividend, divisor), Decimal::new(29, 1));
        assert_eq!(rem(dividend, divisor).scale(), 1);
        assert_eq!(rem(-dividend, divisor), Decimal::new(-29, 1));
    }

    #[test]
    fn it_handles_divisors_with_a_large_scale() {
        assert_eq!(rem(Decimal::ONE, Decimal::new(3, 20)).to_string(), "0.00000000000000000001");
    }

    #[test]
    fn it_rejects_a_zero_divisor() {
        assert!(matches!(
            rem_impl(&Decimal::ONE, &Decimal::ZERO),
            CalculationResult::DivByZero
        ));
    }
}
