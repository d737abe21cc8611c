use crate::constants::{MAX_I32_SCALE, POWERS_10, TEN_TO_POWER_NINE};
use crate::decimal::{Decimal, RoundingStrategy};
use crate::ops::common::Buf12;

use core::cmp::Ordering;

// The digits lost by dividing a mantissa down. `remainder` is what the last (most significant)
// chunk left behind out of `power`; `sticky` records whether any earlier chunk left anything.
struct Dropped {
    remainder: u32,
    power: u32,
    sticky: bool,
}

impl Dropped {
    fn rounds_up(&self, quotient_odd: bool, negative: bool, strategy: RoundingStrategy) -> bool {
        let inexact = self.remainder != 0 || self.sticky;
        // Every power here is even, so half of it is exact
        let half = self.power >> 1;
        let against_half = match self.remainder.cmp(&half) {
            Ordering::Equal if self.sticky => Ordering::Greater,
            ordering => ordering,
        };
        match strategy {
            RoundingStrategy::MidpointNearestEven => match against_half {
                Ordering::Greater => true,
                Ordering::Equal => quotient_odd,
                Ordering::Less => false,
            },
            RoundingStrategy::MidpointAwayFromZero => against_half != Ordering::Less,
            RoundingStrategy::MidpointTowardZero => against_half == Ordering::Greater,
            RoundingStrategy::ToZero => false,
            RoundingStrategy::AwayFromZero => inexact,
            RoundingStrategy::ToNegativeInfinity => negative && inexact,
            RoundingStrategy::ToPositiveInfinity => !negative && inexact,
        }
    }
}

// Divides by 10^digits, at most 10^9 at a time, least significant digits first.
fn drop_digits(value: &mut Buf12, digits: u32) -> Dropped {
    debug_assert!(digits > 0);
    let mut digits = digits;
    let mut sticky = false;
    loop {
        let power = if digits > MAX_I32_SCALE as u32 {
            TEN_TO_POWER_NINE
        } else {
            POWERS_10[digits as usize]
        };
        let remainder = value.div32(power);
        digits = digits.saturating_sub(MAX_I32_SCALE as u32);
        if digits == 0 {
            return Dropped {
                remainder,
                power,
                sticky,
            };
        }
        sticky |= remainder != 0;
    }
}

/// Drops `digits` decimal digits from a magnitude, rounding the rest with `strategy`. `negative`
/// is the sign of the number the magnitude belongs to.
pub(crate) fn round_magnitude(value: &mut Buf12, digits: u32, negative: bool, strategy: RoundingStrategy) {
    if digits == 0 {
        return;
    }
    let dropped = drop_digits(value, digits);
    if dropped.rounds_up(value.lo() & 1 != 0, negative, strategy) {
        // At least one digit is gone, so there is room for the increment
        let _ = value.add32(1);
    }
}

pub(crate) fn round_impl(value: &Decimal, dp: u32, strategy: RoundingStrategy) -> Decimal {
    let scale = value.scale();
    if dp >= scale {
        return *value;
    }
    let negative = value.is_sign_negative();
    let mut buf = Buf12::from_decimal(value);
    round_magnitude(&mut buf, scale - dp, negative, strategy);
    Decimal::from_buf(&buf, negative, dp)
}
