use crate::constants::{MAX_I32_SCALE, MAX_PRECISION_I32, POWERS_10, TEN_TO_POWER_NINE, U32_MASK};
use crate::decimal::Decimal;

use core::cmp::Ordering;

/// The value no longer fits the buffer, or the scale, it was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overflow;

/// A 64 bit scratch register with independent views of its 32 bit halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Split64(pub u64);

impl Split64 {
    pub const fn from_parts(low: u32, high: u32) -> Self {
        Split64(((high as u64) << 32) | low as u64)
    }

    pub const fn low32(self) -> u32 {
        self.0 as u32
    }

    pub const fn high32(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

#[inline(always)]
pub const fn mul32(a: u32, b: u32) -> u64 {
    a as u64 * b as u64
}

/// Divides a 64 bit value by a 32 bit one. The quotient must fit in 32 bits.
#[inline]
pub fn div_mod_64_by_32(num: u64, den: u32) -> (u32, u32) {
    debug_assert!(num >> 32 < den as u64);
    let den = den as u64;
    ((num / den) as u32, (num % den) as u32)
}

/// Full 128 bit product of two 64 bit values, returned as (high, low).
pub fn mul_64x64_to_128(a: Split64, b: Split64) -> (u64, u64) {
    let ll = mul32(a.low32(), b.low32());
    let lh = mul32(a.low32(), b.high32());
    let hl = mul32(a.high32(), b.low32());
    let hh = mul32(a.high32(), b.high32());

    // At most 3 * (2^32 - 1), so the cross sum can't overflow
    let cross = (ll >> 32) + (lh & U32_MASK) + (hl & U32_MASK);
    let low = (ll & U32_MASK) | (cross << 32);
    let high = hh + (lh >> 32) + (hl >> 32) + (cross >> 32);
    (high, low)
}

/// Little endian buffer of `N` 32 bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Buf<const N: usize> {
    pub data: [u32; N],
}

pub type Buf12 = Buf<3>;
pub type Buf16 = Buf<4>;
pub type Buf24 = Buf<6>;

impl<const N: usize> Buf<N> {
    pub const fn zero() -> Self {
        Buf { data: [0; N] }
    }

    pub const fn low64(&self) -> u64 {
        ((self.data[1] as u64) << 32) | (self.data[0] as u64)
    }

    pub fn set_low64(&mut self, value: u64) {
        self.data[1] = (value >> 32) as u32;
        self.data[0] = value as u32;
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|w| *w == 0)
    }

    /// Index of the most significant non-zero word.
    pub fn upper_word(&self) -> Option<usize> {
        self.data.iter().rposition(|w| *w != 0)
    }

    /// Copies the words into a buffer of another width. Words that don't fit are dropped.
    pub fn resize<const M: usize>(&self) -> Buf<M> {
        let mut result = Buf::<M>::zero();
        let len = N.min(M);
        result.data[..len].copy_from_slice(&self.data[..len]);
        result
    }

    /// Multiplies the buffer by `power`, returning the word that was carried out of it.
    pub fn increase_scale(&mut self, power: u32) -> u32 {
        let mut carry = 0u64;
        for word in self.data.iter_mut() {
            let product = mul32(*word, power) + carry;
            *word = product as u32;
            carry = product >> 32;
        }
        carry as u32
    }

    /// Divides the buffer by `divisor` in place and returns the remainder.
    pub fn div32(&mut self, divisor: u32) -> u32 {
        self.div32_upto(N - 1, divisor)
    }

    /// Like `div32`, for a value whose words above `upper` are known to be zero.
    pub fn div32_upto(&mut self, upper: usize, divisor: u32) -> u32 {
        let mut remainder = 0u32;
        for word in self.data[..=upper].iter_mut().rev() {
            let (quotient, rem) = div_mod_64_by_32(((remainder as u64) << 32) | *word as u64, divisor);
            *word = quotient;
            remainder = rem;
        }
        remainder
    }

    /// Adds a 32 bit value. Fails if the sum carries out of the buffer, in which case the
    /// buffer holds the wrapped sum.
    pub fn add32(&mut self, value: u32) -> Result<(), Overflow> {
        let mut carry = value;
        for word in self.data.iter_mut() {
            let (sum, overflowed) = word.overflowing_add(carry);
            *word = sum;
            if !overflowed {
                return Ok(());
            }
            carry = 1;
        }
        Err(Overflow)
    }

    /// Adds a buffer no wider than this one, returning the carry out of the top word.
    pub fn add_buf<const M: usize>(&mut self, other: &Buf<M>) -> bool {
        debug_assert!(M <= N);
        let mut carry = false;
        for (i, word) in self.data.iter_mut().enumerate() {
            let rhs = if i < M { other.data[i] } else { 0 };
            let (sum, c1) = word.overflowing_add(rhs);
            let (sum, c2) = sum.overflowing_add(carry as u32);
            *word = sum;
            carry = c1 || c2;
        }
        carry
    }

    /// Subtracts a buffer no wider than this one, returning the borrow out of the top word.
    pub fn sub_buf<const M: usize>(&mut self, other: &Buf<M>) -> bool {
        debug_assert!(M <= N);
        let mut borrow = false;
        for (i, word) in self.data.iter_mut().enumerate() {
            let rhs = if i < M { other.data[i] } else { 0 };
            let (diff, b1) = word.overflowing_sub(rhs);
            let (diff, b2) = diff.overflowing_sub(borrow as u32);
            *word = diff;
            borrow = b1 || b2;
        }
        borrow
    }

    /// Two's complement negation.
    pub fn negate(&mut self) {
        for word in self.data.iter_mut() {
            *word = !*word;
        }
        // Only the all-zero buffer wraps, and its negation is itself.
        let _ = self.add32(1);
    }

    /// Shifts left by less than a word, returning the bits shifted out.
    pub fn shl(&mut self, bits: u32) -> u32 {
        debug_assert!(bits < 32);
        if bits == 0 {
            return 0;
        }
        let mut carry = 0;
        for word in self.data.iter_mut() {
            let next = *word >> (32 - bits);
            *word = (*word << bits) | carry;
            carry = next;
        }
        carry
    }
}

impl<const N: usize> Ord for Buf<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.data.iter().rev().cmp(other.data.iter().rev())
    }
}

impl<const N: usize> PartialOrd for Buf<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Buf12 {
    pub const fn from_words(lo: u32, mid: u32, hi: u32) -> Self {
        Buf { data: [lo, mid, hi] }
    }

    pub const fn from_decimal(value: &Decimal) -> Self {
        Buf12::from_words(value.lo(), value.mid(), value.hi())
    }

    pub const fn lo(&self) -> u32 {
        self.data[0]
    }

    pub const fn mid(&self) -> u32 {
        self.data[1]
    }

    pub const fn hi(&self) -> u32 {
        self.data[2]
    }

    pub const fn high64(&self) -> u64 {
        ((self.data[2] as u64) << 32) | (self.data[1] as u64)
    }

    pub fn set_high64(&mut self, value: u64) {
        self.data[2] = (value >> 32) as u32;
        self.data[1] = value as u32;
    }

    /// Undoes an addition that carried out of 96 bits: divides `2^96 + self` by ten, rounding
    /// half to even. `sticky` marks non-zero digits below the ones held here.
    pub fn descale_carry(&mut self, sticky: bool) {
        let mut wide = self.resize::<4>();
        wide.data[3] = 1;
        let remainder = wide.div32(10);
        *self = wide.resize::<3>();
        if remainder > 5 || (remainder == 5 && (sticky || self.data[0] & 1 != 0)) {
            // Just over 2^93, the increment can't carry out
            let _ = self.add32(1);
        }
    }

    /// Divides by `pow` only when it divides the value exactly. Returns whether it did.
    pub fn div32_const(&mut self, pow: u32) -> bool {
        let pow64 = pow as u64;
        let high64 = self.high64();
        let lo = self.data[0] as u64;
        let div64: u64 = high64 / pow64;
        let div = ((((high64 - div64 * pow64) << 32) + lo) / pow64) as u32;
        if self.data[0] == div.wrapping_mul(pow) {
            self.set_high64(div64);
            self.data[0] = div;
            true
        } else {
            false
        }
    }
}

impl Buf16 {
    /// Divides the low 96 bits by a 64 bit divisor with its top bit set. The upper 64 of those
    /// bits must already be below the divisor. Returns the 32 bit quotient and leaves the
    /// remainder in the low 64 bits.
    pub fn partial_divide_64(&mut self, divisor: u64) -> u32 {
        let den = [divisor as u32, (divisor >> 32) as u32];
        divide_step(&mut self.data[..3], &den)
    }

    /// Divides all 128 bits by a 96 bit divisor with its top bit set. The upper 96 bits must
    /// already be below the divisor. Returns the 32 bit quotient and leaves the remainder in
    /// the low 96 bits.
    pub fn partial_divide_96(&mut self, divisor: &Buf12) -> u32 {
        divide_step(&mut self.data, &divisor.data)
    }
}

/// One digit of base 2^32 long division.
///
/// `num` holds one more word than `den`, the top bit of `den` is set and the upper words of
/// `num` compare below `den`. The digit is estimated from the top two words of `num` and the
/// top word of `den`; with a normalized divisor that estimate is at most two too large, so after
/// multiplying back the divisor is added again until the remainder is no longer negative.
/// Returns the digit; the remainder is left in the low words of `num`.
pub fn divide_step(num: &mut [u32], den: &[u32]) -> u32 {
    let n = den.len();
    debug_assert_eq!(num.len(), n + 1);
    debug_assert!(den[n - 1] >> 31 == 1);

    let top = ((num[n] as u64) << 32) | num[n - 1] as u64;
    let mut quotient = (top / den[n - 1] as u64).min(U32_MASK) as u32;

    let mut carry = 0u64;
    let mut borrow = false;
    for (i, word) in num.iter_mut().enumerate() {
        let product = mul32(quotient, if i < n { den[i] } else { 0 }) + carry;
        carry = product >> 32;
        let (diff, b1) = word.overflowing_sub(product as u32);
        let (diff, b2) = diff.overflowing_sub(borrow as u32);
        *word = diff;
        borrow = b1 || b2;
    }

    let mut negative = borrow;
    while negative {
        quotient -= 1;
        let mut carry = false;
        for (i, word) in num.iter_mut().enumerate() {
            let (sum, c1) = word.overflowing_add(if i < n { den[i] } else { 0 });
            let (sum, c2) = sum.overflowing_add(carry as u32);
            *word = sum;
            carry = c1 || c2;
        }
        // Carrying out of the top word means the remainder crossed back over zero
        negative = !carry;
    }
    debug_assert_eq!(num[n], 0);
    quotient
}

impl Buf24 {
    /// Widens a 96 bit value and multiplies it by 10^`power`, for `power` up to 28.
    pub fn scaled_from(value: &Buf12, power: u32) -> Buf24 {
        let mut result = value.resize::<6>();
        let mut power = power;
        while power > 0 {
            let step = power.min(MAX_I32_SCALE as u32);
            // 2^96 * 10^28 is well inside 192 bits
            let _ = result.increase_scale(POWERS_10[step as usize]);
            power -= step;
        }
        result
    }

    pub fn low96(&self) -> Buf12 {
        self.resize::<3>()
    }

    /// Divides the buffer down until the value fits in 96 bits and the scale is at most 28,
    /// rounding half to even on the dropped digits. `upper` is the index of the most
    /// significant non-zero word. Returns the new scale, or `None` if the value can't be
    /// represented at a non-negative scale.
    pub fn rescale(&mut self, upper: usize, scale: u32) -> Option<u32> {
        let mut scale = scale as i32;
        let mut upper = upper;

        // Estimate the digits to drop from the position of the most significant bit, using
        // 77/256 as log10(2). The estimate can come up one digit short.
        let mut new_scale = if upper > 2 {
            let bits = upper as i32 * 32 - 64 - 1 - self.data[upper].leading_zeros() as i32;
            let digits = ((bits * 77) >> 8) + 1;
            if digits > scale {
                return None;
            }
            digits
        } else {
            0
        };

        if new_scale < scale - MAX_PRECISION_I32 {
            new_scale = scale - MAX_PRECISION_I32;
        }
        if new_scale == 0 {
            return Some(scale as u32);
        }

        scale -= new_scale;
        let mut sticky = 0u32;
        let mut remainder = 0u32;
        loop {
            sticky |= remainder;
            let power = if new_scale > MAX_I32_SCALE {
                TEN_TO_POWER_NINE
            } else {
                POWERS_10[new_scale as usize]
            };
            remainder = self.div32_upto(upper, power);
            // Dividing by less than 2^32 can only clear the top word
            if upper > 0 && self.data[upper] == 0 {
                upper -= 1;
            }

            new_scale -= MAX_I32_SCALE;
            if new_scale > 0 {
                continue;
            }

            if upper > 2 {
                // The estimate was one short
                if scale == 0 {
                    return None;
                }
                new_scale = 1;
                scale -= 1;
                continue;
            }

            let half = power >> 1;
            if remainder > half || (remainder == half && (sticky != 0 || self.data[0] & 1 != 0)) {
                // Can't carry out of 192 bits here
                let _ = self.add32(1);
                if self.data[3] != 0 {
                    // Rounding carried out of 96 bits, so drop one more digit
                    if scale == 0 {
                        return None;
                    }
                    upper = 3;
                    sticky = 0;
                    remainder = 0;
                    new_scale = 1;
                    scale -= 1;
                    continue;
                }
            }
            return Some(scale as u32);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn to_u128(buf: &Buf16) -> u128 {
        buf.data.iter().rev().fold(0u128, |acc, w| (acc << 32) | *w as u128)
    }

    fn from_u128(value: u128) -> Buf16 {
        Buf {
            data: [value as u32, (value >> 32) as u32, (value >> 64) as u32, (value >> 96) as u32],
        }
    }

    #[test]
    fn it_splits_and_joins_64_bit_values() {
        let split = Split64::from_parts(0xDEAD_BEEF, 0x0123_4567);
        assert_eq!(split.0, 0x0123_4567_DEAD_BEEF);
        assert_eq!(split.low32(), 0xDEAD_BEEF);
        assert_eq!(split.high32(), 0x0123_4567);
        assert_eq!(Split64::from_parts(1, 2).0, 0x0000_0002_0000_0001);
    }

    #[test]
    fn it_multiplies_64_by_64() {
        let tests: &[(u64, u64)] = &[
            (0, 0),
            (1, u64::MAX),
            (u64::MAX, u64::MAX),
            (0xFFFF_FFFF, 0xFFFF_FFFF),
            (0x1234_5678_9ABC_DEF0, 0x0FED_CBA9_8765_4321),
            (10_000_000_000_000_000_000, 10_000_000_000_000_000_000),
        ];
        for &(a, b) in tests {
            let expected = a as u128 * b as u128;
            let (high, low) = mul_64x64_to_128(Split64(a), Split64(b));
            assert_eq!(high, (expected >> 64) as u64, "{} * {}", a, b);
            assert_eq!(low, expected as u64, "{} * {}", a, b);
        }
    }

    #[test]
    fn it_divides_64_by_32() {
        assert_eq!(div_mod_64_by_32(100, 7), (14, 2));
        assert_eq!(div_mod_64_by_32(0xFFFF_FFFE_FFFF_FFFF, u32::MAX), (u32::MAX, 0xFFFF_FFFE));
    }

    #[test]
    fn it_divides_buffers_by_32_bit_values() {
        let value: u128 = 0x0000_0000_FFFF_FFFF_1234_5678_9ABC_DEF0;
        let mut buf = from_u128(value);
        let remainder = buf.div32(1_000_000_000);
        assert_eq!(to_u128(&buf), value / 1_000_000_000);
        assert_eq!(remainder as u128, value % 1_000_000_000);
    }

    #[test]
    fn it_adds_with_carry() {
        let mut buf = Buf12::from_words(u32::MAX, u32::MAX, 0);
        assert_eq!(buf.add32(1), Ok(()));
        assert_eq!(buf.data, [0, 0, 1]);

        let mut buf = Buf12::from_words(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(buf.add32(2), Err(Overflow));
        assert_eq!(buf.data, [1, 0, 0]);
    }

    #[test]
    fn it_subtracts_and_negates() {
        let mut buf = Buf12::from_words(5, 0, 0);
        let borrow = buf.sub_buf(&Buf12::from_words(7, 0, 0));
        assert!(borrow);
        buf.negate();
        assert_eq!(buf.data, [2, 0, 0]);

        let mut zero = Buf12::zero();
        zero.negate();
        assert!(zero.is_zero());
    }

    #[test]
    fn it_compares_from_the_top_word() {
        let a = Buf12::from_words(0, 0, 1);
        let b = Buf12::from_words(u32::MAX, u32::MAX, 0);
        assert!(a > b);
        assert_eq!(a.upper_word(), Some(2));
        assert_eq!(b.upper_word(), Some(1));
        assert_eq!(Buf12::zero().upper_word(), None);
    }

    #[test]
    fn it_divides_only_when_exact() {
        let mut buf = Buf12::from_words(1200, 0, 0);
        assert!(buf.div32_const(100));
        assert_eq!(buf.lo(), 12);
        assert!(!buf.div32_const(100));
        assert_eq!(buf.lo(), 12);
    }

    #[test]
    fn it_performs_a_long_division_step() {
        // Dividends and divisors chosen to exercise the estimate correction
        let tests: &[(u128, u128)] = &[
            (0x8000_0000_0000_0000_0000_0000_0000_0000 - 1, 0x8000_0000_0000_0000_0000_0001),
            (0xFFFF_FFFF_FFFF_FFFF_FFFF_FFFE_0000_0000, 0xFFFF_FFFF_FFFF_FFFF_FFFF_FFFF),
            (0x7FFF_FFFF_8000_0000_0000_0000_0000_0000, 0x8000_0000_0000_0000_0000_0001),
            (0x1234_5678_9ABC_DEF0_1234_5678_9ABC_DEF0, 0x8765_4321_0FED_CBA9_8765_4321),
        ];
        for &(num, den) in tests {
            let mut buf = from_u128(num);
            let divisor = Buf12::from_words(den as u32, (den >> 32) as u32, (den >> 64) as u32);
            let quotient = buf.partial_divide_96(&divisor);
            assert_eq!(quotient as u128, num / den, "{:x} / {:x}", num, den);
            assert_eq!(to_u128(&buf), num % den, "{:x} % {:x}", num, den);
        }
    }

    #[test]
    fn it_performs_a_64_bit_long_division_step() {
        let num: u128 = 0x0000_0000_8000_0000_0000_0000_1234_5678;
        let den: u64 = 0x8000_0000_0000_0001;
        let mut buf = from_u128(num);
        let quotient = buf.partial_divide_64(den);
        assert_eq!(quotient as u128, num / den as u128);
        assert_eq!(buf.low64() as u128, num % den as u128);
        assert_eq!(buf.data[2], 0);
    }

    #[test]
    fn it_leaves_small_values_alone_when_rescaling() {
        let mut buf = Buf24::zero();
        buf.data[0] = 12345;
        assert_eq!(buf.rescale(0, 2), Some(2));
        assert_eq!(buf.data[0], 12345);
    }

    #[test]
    fn it_rescales_into_96_bits() {
        // 2^96 at scale 1 becomes 2^96 / 10, rounded down
        let mut buf = Buf24::zero();
        buf.data[3] = 1;
        assert_eq!(buf.rescale(3, 1), Some(0));
        assert_eq!(buf.low96(), Buf12::from_words(2576980378, 2576980377, 429496729));
    }

    #[test]
    fn it_rescales_down_to_the_maximum_precision() {
        // 25 at scale 30 rounds half to even at scale 28
        let mut buf = Buf24::zero();
        buf.data[0] = 25;
        assert_eq!(buf.rescale(0, 30), Some(28));
        assert_eq!(buf.data[0], 0);

        let mut buf = Buf24::zero();
        buf.data[0] = 150;
        assert_eq!(buf.rescale(0, 30), Some(28));
        assert_eq!(buf.data[0], 2);
    }

    #[test]
    fn it_fails_to_rescale_without_scale_to_spare() {
        let mut buf = Buf24::zero();
        buf.data[4] = 1;
        assert_eq!(buf.rescale(4, 0), None);
    }
}
