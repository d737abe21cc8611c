use crate::{
    constants::{MAX_PRECISION_U32, MAX_STR_BUFFER_SIZE, POWER_OVERFLOW_VALUES},
    error::{tail_error, Error},
    ops::common::Buf12,
    Decimal,
};

use arrayvec::{ArrayString, ArrayVec};

use core::{fmt, str::FromStr};

// impl that doesn't allocate for serialization purposes.
//
// When `precision` asks for fewer places than the scale the value is rounded half to even
// first. Zeros beyond the scale are not written; their count is returned instead, so the buffer
// never holds more than a sign, 29 digits and a point.
pub(crate) fn to_str_internal(
    value: &Decimal,
    precision: Option<usize>,
) -> (ArrayString<MAX_STR_BUFFER_SIZE>, Option<usize>) {
    let value = match precision {
        Some(prec) if prec < value.scale() as usize => value.round_dp(prec as u32),
        _ => *value,
    };
    let scale = value.scale() as usize;

    // Peel off nine digits at a time, least significant first
    let mut chars = ArrayVec::<u8, MAX_STR_BUFFER_SIZE>::new();
    let mut working = value;
    while !working.is_zero() {
        let mut chunk = working.div_mod_1e9();
        let digits = if working.is_zero() { 0 } else { 9 };
        let mut written = 0;
        while chunk > 0 || written < digits {
            chars.push(b'0' + (chunk % 10) as u8);
            chunk /= 10;
            written += 1;
        }
    }
    while scale > chars.len() {
        chars.push(b'0');
    }

    let mut rep = ArrayString::new();
    // Zero never carries a sign
    if value.is_sign_negative() && !value.is_zero() {
        rep.push('-');
    }
    let len = chars.len();
    let whole_len = len - scale;
    if whole_len == 0 {
        rep.push('0');
    }
    for (i, c) in chars.iter().rev().enumerate() {
        if i == whole_len {
            rep.push('.');
        }
        rep.push(char::from(*c));
    }

    let additional = match precision {
        Some(prec) if prec > scale => {
            if scale == 0 {
                rep.push('.');
            }
            Some(prec - scale)
        }
        _ => None,
    };
    (rep, additional)
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let (rep, additional) = to_str_internal(self, f.precision());
        let (is_nonnegative, rep) = match rep.strip_prefix('-') {
            Some(digits) => (false, digits),
            None => (true, rep.as_str()),
        };
        if let Some(additional) = additional {
            let value = [rep, "0".repeat(additional).as_str()].concat();
            f.pad_integral(is_nonnegative, "", value.as_str())
        } else {
            f.pad_integral(is_nonnegative, "", rep)
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(value: &str) -> Result<Decimal, Self::Err> {
        parse_str_radix_10(value)
    }
}

// Appends a decimal digit to the mantissa. Leaves it alone and returns false if the result
// wouldn't fit in 96 bits.
fn push_digit(value: &mut Decimal, digit: u32) -> bool {
    if Buf12::from_decimal(value) > POWER_OVERFLOW_VALUES[0] {
        return false;
    }
    let mut next = *value;
    next.mul10_raw();
    if next.add_u32_raw(digit) {
        return false;
    }
    *value = next;
    true
}

/// Parses an optional sign, digits with at most one point and `_` separators. Fractional
/// digits that don't fit are rounded half away from zero; integer digits that don't fit are
/// an error.
pub(crate) fn parse_str_radix_10(str: &str) -> Result<Decimal, crate::Error> {
    let (negative, bytes) = match str.as_bytes() {
        [] => return tail_error("Invalid decimal: empty"),
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] => (false, rest),
        bytes => (false, bytes),
    };

    let mut value = Decimal::ZERO;
    let mut scale = 0u32;
    let mut point = false;
    let mut has_digit = false;
    // First digit that didn't fit
    let mut dropped = None;
    for b in bytes {
        match *b {
            b'0'..=b'9' => {
                has_digit = true;
                if dropped.is_some() {
                    continue;
                }
                let digit = u32::from(*b - b'0');
                if (point && scale == MAX_PRECISION_U32) || !push_digit(&mut value, digit) {
                    if !point {
                        return tail_error("Invalid decimal: overflow from too many digits");
                    }
                    dropped = Some(digit);
                } else if point {
                    scale += 1;
                }
            }
            b'.' if point => return tail_error("Invalid decimal: two decimal points"),
            b'.' => point = true,
            b'_' if !has_digit => return tail_error("Invalid decimal: must start lead with a number"),
            b'_' => {}
            _ => return tail_error("Invalid decimal: unknown character"),
        }
    }
    if !has_digit {
        return tail_error("Invalid decimal: no digits found");
    }

    let mut buf = Buf12::from_decimal(&value);
    if matches!(dropped, Some(digit) if digit >= 5) && buf.add32(1).is_err() {
        // Rounded up to 2^96
        if scale == 0 {
            return tail_error("Invalid decimal: overflow when rounding");
        }
        buf.descale_carry(false);
        scale -= 1;
    }
    Ok(Decimal::from_buf(&buf, negative, scale))
}
