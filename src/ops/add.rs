use crate::decimal::{CalculationResult, Decimal};
use crate::ops::common::{Buf12, Buf24};

pub(crate) fn add_impl(d1: &Decimal, d2: &Decimal) -> CalculationResult {
    add_sub_internal(d1, d2, false)
}

pub(crate) fn sub_impl(d1: &Decimal, d2: &Decimal) -> CalculationResult {
    add_sub_internal(d1, d2, true)
}

#[inline]
fn add_sub_internal(d1: &Decimal, d2: &Decimal, subtract: bool) -> CalculationResult {
    // Once the signs are folded in, the magnitudes are either added or subtracted
    let subtract = subtract ^ (d1.is_sign_negative() != d2.is_sign_negative());
    let scale1 = d1.scale();
    let scale2 = d2.scale();

    if scale1 == scale2 {
        return aligned_add(
            Buf12::from_decimal(d1),
            &Buf12::from_decimal(d2),
            d1.is_sign_negative(),
            scale1,
            subtract,
        );
    }

    // The operand with the smaller scale is scaled up to the other's. When that operand is `d2`
    // the magnitudes swap places, which flips the sign of a difference.
    if scale1 < scale2 {
        unaligned_add(d1, d2, d1.is_sign_negative(), subtract)
    } else {
        unaligned_add(d2, d1, d1.is_sign_negative() ^ subtract, subtract)
    }
}

fn aligned_add(mut result: Buf12, other: &Buf12, negative: bool, scale: u32, subtract: bool) -> CalculationResult {
    let mut negative = negative;
    if subtract {
        if result.sub_buf(other) {
            result.negate();
            negative = !negative;
        }
    } else if result.add_buf(other) {
        // The addition carried above 96 bits. Try to reduce the scale factor.
        if scale == 0 {
            return CalculationResult::Overflow;
        }
        result.descale_carry(false);
        return CalculationResult::Ok(Decimal::from_buf(&result, negative, scale - 1));
    }
    CalculationResult::Ok(Decimal::from_buf(&result, negative, scale))
}

// `low` has the smaller scale and is multiplied up to the scale of `high` in 192 bits before
// the magnitudes are combined. The result is then compacted back into 96 bits.
fn unaligned_add(low: &Decimal, high: &Decimal, negative: bool, subtract: bool) -> CalculationResult {
    let scale = high.scale();
    let mut result = Buf24::scaled_from(&Buf12::from_decimal(low), scale - low.scale());
    let other = Buf12::from_decimal(high);

    let mut negative = negative;
    if subtract {
        if result.sub_buf(&other) {
            // Only possible when the scaled value was still below 2^96
            result.negate();
            negative = !negative;
        }
    } else {
        // Both fit well inside 192 bits
        let _ = result.add_buf(&other);
    }

    let scale = match result.upper_word() {
        Some(upper) if upper > 2 => match result.rescale(upper, scale) {
            Some(scale) => scale,
            None => return CalculationResult::Overflow,
        },
        _ => scale,
    };
    CalculationResult::Ok(Decimal::from_buf(&result.low96(), negative, scale))
}

#[cfg(test)]
mod test {
    use super::*;

    fn add(a: Decimal, b: Decimal) -> Decimal {
        match add_impl(&a, &b) {
            CalculationResult::Ok(value) => value,
            _ => panic!("unexpected failure adding {} and {}", a, b),
        }
    }

    #[test]
    fn it_keeps_the_larger_scale() {
        let result = add(Decimal::new(100, 2), Decimal::new(20, 1));
        assert_eq!(result.to_bits(), [300, 0, 0, 0x0002_0000]);
    }

    #[test]
    fn it_flips_the_sign_of_a_negative_difference() {
        let result = add(Decimal::new(5, 0), Decimal::new(-75, 1));
        assert_eq!(result.to_bits(), [25, 0, 0, 0x8001_0000]);

        let result = add(Decimal::new(-75, 1), Decimal::new(5, 0));
        assert_eq!(result.to_bits(), [25, 0, 0, 0x8001_0000]);
    }

    #[test]
    fn it_descales_a_carry_out_of_96_bits() {
        // (2^96 - 1) / 10 + (2^96 - 1) / 10 at scale 1
        let max_tenth = Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, 1);
        let result = add(max_tenth, max_tenth);
        assert_eq!(result.scale(), 0);
        assert_eq!(result.to_string(), "15845632502852867518708790067");
    }

    #[test]
    fn it_overflows_without_scale_to_spare() {
        assert!(matches!(
            add_impl(&Decimal::MAX, &Decimal::ONE),
            CalculationResult::Overflow
        ));
        assert!(matches!(
            sub_impl(&Decimal::MIN, &Decimal::ONE),
            CalculationResult::Overflow
        ));
    }

    #[test]
    fn it_rounds_when_the_scales_cannot_be_aligned() {
        // 79228162514264337593543950334.5 needs a 97th bit at scale 1, so it rounds to even
        let result = add(Decimal::from_parts(u32::MAX - 1, u32::MAX, u32::MAX, false, 0), Decimal::new(5, 1));
        assert_eq!(result.to_string(), "79228162514264337593543950334");
    }
}
