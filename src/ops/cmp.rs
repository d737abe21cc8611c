use crate::decimal::Decimal;
use crate::ops::common::{Buf12, Buf24};

use core::cmp::Ordering;

pub(crate) fn cmp_impl(d1: &Decimal, d2: &Decimal) -> Ordering {
    if d2.is_zero() {
        return if d1.is_zero() {
            Ordering::Equal
        } else if d1.is_sign_negative() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    if d1.is_zero() {
        return if d2.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    // If the sign is different, then it's an easy answer
    if d1.is_sign_negative() != d2.is_sign_negative() {
        return if d1.is_sign_negative() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    // Negative is handled differently. i.e. 0.5 > 0.01 however -0.5 < -0.01
    let ordering = cmp_magnitude(d1, d2);
    if d1.is_sign_negative() {
        ordering.reverse()
    } else {
        ordering
    }
}

// Compares the magnitudes, bringing the one with the smaller scale up to the other's scale.
fn cmp_magnitude(d1: &Decimal, d2: &Decimal) -> Ordering {
    let a = Buf12::from_decimal(d1);
    let b = Buf12::from_decimal(d2);
    let (scale1, scale2) = (d1.scale(), d2.scale());
    match scale1.cmp(&scale2) {
        Ordering::Equal => a.cmp(&b),
        Ordering::Less => Buf24::scaled_from(&a, scale2 - scale1).cmp(&b.resize()),
        Ordering::Greater => a.resize::<6>().cmp(&Buf24::scaled_from(&b, scale1 - scale2)),
    }
}
