use crate::constants::{MAX_I64_SCALE, MAX_PRECISION_U32, POWERS_10_U64};
use crate::decimal::{CalculationResult, Decimal};
use crate::ops::common::{mul32, Buf12, Buf24};

pub(crate) fn mul_impl(d1: &Decimal, d2: &Decimal) -> CalculationResult {
    let negative = d1.is_sign_negative() ^ d2.is_sign_negative();
    let scale = d1.scale() + d2.scale();
    let a = Buf12::from_decimal(d1);
    let b = Buf12::from_decimal(d2);

    if a.hi() == 0 && a.mid() == 0 && b.hi() == 0 && b.mid() == 0 {
        // Upper 64 bits are zero on both sides so the product fits in 64 bits
        let mut low64 = mul32(a.lo(), b.lo());
        let mut scale = scale;
        if scale > MAX_PRECISION_U32 {
            // Result scale is too big. Divide the product down, rounding half to even.
            let excess = scale - MAX_PRECISION_U32;
            if excess > MAX_I64_SCALE {
                return CalculationResult::Ok(Decimal::ZERO);
            }
            let power = POWERS_10_U64[excess as usize];
            let quotient = low64 / power;
            let remainder = low64 - quotient * power;
            let half = power >> 1;
            low64 = quotient;
            if remainder > half || (remainder == half && quotient & 1 != 0) {
                low64 += 1;
            }
            scale = MAX_PRECISION_U32;
        }
        return CalculationResult::Ok(Decimal::from_parts(
            low64 as u32,
            (low64 >> 32) as u32,
            0,
            negative,
            scale,
        ));
    }

    let mut product = mul_96x96(&a, &b);
    let upper = match product.upper_word() {
        Some(upper) => upper,
        None => return CalculationResult::Ok(Decimal::ZERO),
    };

    let scale = if upper > 2 || scale > MAX_PRECISION_U32 {
        match product.rescale(upper, scale) {
            Some(scale) => scale,
            None => return CalculationResult::Overflow,
        }
    } else {
        scale
    };
    CalculationResult::Ok(Decimal::from_buf(&product.low96(), negative, scale))
}

// Schoolbook multiplication: nine 32x32 partial products with the carries folded in as we go.
fn mul_96x96(a: &Buf12, b: &Buf12) -> Buf24 {
    let mut product = Buf24::zero();
    for (i, &x) in a.data.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &y) in b.data.iter().enumerate() {
            // (2^32 - 1)^2 + 2 * (2^32 - 1) is exactly u64::MAX
            let partial = mul32(x, y) + product.data[i + j] as u64 + carry;
            product.data[i + j] = partial as u32;
            carry = partial >> 32;
        }
        product.data[i + 3] = carry as u32;
    }
    product
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_multiplies_96_bit_values() {
        let max = Buf12::from_words(u32::MAX, u32::MAX, u32::MAX);
        let product = mul_96x96(&max, &max);
        // (2^96 - 1)^2 = 2^192 - 2^97 + 1
        assert_eq!(product.data, [1, 0, 0, u32::MAX - 1, u32::MAX, u32::MAX]);
    }

    #[test]
    fn it_rounds_small_products_to_the_maximum_scale() {
        let a = Decimal::from_parts(15, 0, 0, false, 20);
        let b = Decimal::from_parts(1, 0, 0, true, 9);
        match mul_impl(&a, &b) {
            CalculationResult::Ok(result) => assert_eq!(result.to_bits(), [2, 0, 0, 0x801C_0000]),
            _ => panic!("unexpected overflow"),
        }
    }

    #[test]
    fn it_drops_products_too_small_to_represent() {
        let tiny = Decimal::from_parts(u32::MAX, 0, 0, false, 28);
        match mul_impl(&tiny, &tiny) {
            CalculationResult::Ok(result) => assert_eq!(result.to_bits(), [0, 0, 0, 0]),
            _ => panic!("unexpected overflow"),
        }
    }

    #[test]
    fn it_overflows_when_the_product_cannot_be_scaled_down() {
        assert!(matches!(mul_impl(&Decimal::MAX, &Decimal::TWO), CalculationResult::Overflow));
    }
}
