use crate::{
    decimal::{CalculationResult, Decimal},
    error::{tail_error, Error},
    ops,
};

use core::{
    iter::{Product, Sum},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign},
};
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedRem, CheckedSub, Num, Signed, Zero};

macro_rules! forward_val_val_binop {
    (impl $imp:ident for $res:ty, $method:ident) => {
        impl $imp<$res> for $res {
            type Output = $res;

            #[inline]
            fn $method(self, other: $res) -> $res {
                (&self).$method(&other)
            }
        }
    };
}

macro_rules! forward_ref_val_binop {
    (impl $imp:ident for $res:ty, $method:ident) => {
        impl<'a> $imp<$res> for &'a $res {
            type Output = $res;

            #[inline]
            fn $method(self, other: $res) -> $res {
                self.$method(&other)
            }
        }
    };
}

macro_rules! forward_val_ref_binop {
    (impl $imp:ident for $res:ty, $method:ident) => {
        impl<'a> $imp<&'a $res> for $res {
            type Output = $res;

            #[inline]
            fn $method(self, other: &$res) -> $res {
                (&self).$method(other)
            }
        }
    };
}

macro_rules! forward_all_binop {
    (impl $imp:ident for $res:ty, $method:ident) => {
        forward_val_val_binop!(impl $imp for $res, $method);
        forward_ref_val_binop!(impl $imp for $res, $method);
        forward_val_ref_binop!(impl $imp for $res, $method);
    };
}

// Implements the operator on references, panicking with the given message when the engine can't
// produce a result.
macro_rules! impl_binop {
    (impl $imp:ident for $res:ty, $method:ident, $engine:path, $overflow:literal, $div_by_zero:literal) => {
        forward_all_binop!(impl $imp for $res, $method);

        impl<'a, 'b> $imp<&'b $res> for &'a $res {
            type Output = $res;

            #[inline(always)]
            fn $method(self, other: &$res) -> $res {
                match $engine(self, other) {
                    CalculationResult::Ok(value) => value,
                    CalculationResult::Overflow => panic!($overflow),
                    CalculationResult::DivByZero => panic!($div_by_zero),
                }
            }
        }
    };
}

macro_rules! impl_assign_op {
    (impl $imp:ident for $res:ty, $method:ident, $op:ident) => {
        impl $imp<$res> for $res {
            #[inline]
            fn $method(&mut self, other: $res) {
                *self = (&*self).$op(&other);
            }
        }

        impl<'a> $imp<&'a $res> for $res {
            #[inline]
            fn $method(&mut self, other: &'a $res) {
                *self = (&*self).$op(other);
            }
        }

        impl<'a> $imp<$res> for &'a mut $res {
            #[inline]
            fn $method(&mut self, other: $res) {
                **self = (&**self).$op(&other);
            }
        }

        impl<'a> $imp<&'a $res> for &'a mut $res {
            #[inline]
            fn $method(&mut self, other: &'a $res) {
                **self = (&**self).$op(other);
            }
        }
    };
}

impl_binop!(impl Add for Decimal, add, ops::add_impl, "Addition overflowed", "Addition overflowed");
impl_binop!(impl Sub for Decimal, sub, ops::sub_impl, "Subtraction overflowed", "Subtraction overflowed");
impl_binop!(impl Mul for Decimal, mul, ops::mul_impl, "Multiplication overflowed", "Multiplication overflowed");
impl_binop!(impl Div for Decimal, div, ops::div_impl, "Division overflowed", "Division by zero");
impl_binop!(impl Rem for Decimal, rem, ops::rem_impl, "Remainder overflowed", "Remainder by zero");

impl_assign_op!(impl AddAssign for Decimal, add_assign, add);
impl_assign_op!(impl SubAssign for Decimal, sub_assign, sub);
impl_assign_op!(impl MulAssign for Decimal, mul_assign, mul);
impl_assign_op!(impl DivAssign for Decimal, div_assign, div);
impl_assign_op!(impl RemAssign for Decimal, rem_assign, rem);

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        let mut copy = self;
        copy.set_sign_negative(self.is_sign_positive());
        copy
    }
}

impl<'a> Neg for &'a Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -*self
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::ZERO, |sum, value| sum + value)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::ZERO, |sum, value| sum + value)
    }
}

impl Product for Decimal {
    fn product<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::ONE, |product, value| product * value)
    }
}

impl<'a> Product<&'a Decimal> for Decimal {
    fn product<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::ONE, |product, value| product * value)
    }
}

impl CheckedAdd for Decimal {
    #[inline]
    fn checked_add(&self, v: &Decimal) -> Option<Decimal> {
        Decimal::checked_add(*self, *v)
    }
}

impl CheckedSub for Decimal {
    #[inline]
    fn checked_sub(&self, v: &Decimal) -> Option<Decimal> {
        Decimal::checked_sub(*self, *v)
    }
}

impl CheckedMul for Decimal {
    #[inline]
    fn checked_mul(&self, v: &Decimal) -> Option<Decimal> {
        Decimal::checked_mul(*self, *v)
    }
}

impl CheckedDiv for Decimal {
    #[inline]
    fn checked_div(&self, v: &Decimal) -> Option<Decimal> {
        Decimal::checked_div(*self, *v)
    }
}

impl CheckedRem for Decimal {
    #[inline]
    fn checked_rem(&self, v: &Decimal) -> Option<Decimal> {
        Decimal::checked_rem(*self, *v)
    }
}

impl Num for Decimal {
    type FromStrRadixErr = Error;

    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        if radix != 10 {
            return tail_error("Unsupported radix: only base 10 is supported");
        }
        crate::str::parse_str_radix_10(str)
    }
}

impl Signed for Decimal {
    fn abs(&self) -> Self {
        Decimal::abs(self)
    }

    fn abs_sub(&self, other: &Self) -> Self {
        if self <= other {
            Decimal::ZERO
        } else {
            self - other
        }
    }

    fn signum(&self) -> Self {
        Decimal::signum(self)
    }

    fn is_positive(&self) -> bool {
        self.is_sign_positive() && !Zero::is_zero(self)
    }

    fn is_negative(&self) -> bool {
        self.is_sign_negative() && !Zero::is_zero(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn it_supports_every_operand_form() {
        let a = Decimal::new(15, 1);
        let b = Decimal::new(5, 1);
        assert_eq!(a + b, Decimal::TWO);
        assert_eq!(&a - b, Decimal::ONE);
        assert_eq!(a * &b, Decimal::new(75, 2));
        assert_eq!(&a / &b, Decimal::new(3, 0));
        assert_eq!(a % b, Decimal::ZERO);

        let mut c = a;
        c += b;
        c -= &b;
        c *= Decimal::TWO;
        c /= &Decimal::TEN;
        assert_eq!(c, Decimal::new(3, 1));
        c %= Decimal::new(2, 1);
        assert_eq!(c, Decimal::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "Multiplication overflowed")]
    fn it_panics_on_overflow() {
        let _ = Decimal::MAX * Decimal::TWO;
    }

    #[test]
    #[should_panic(expected = "Division by zero")]
    fn it_panics_on_division_by_zero() {
        let _ = Decimal::ONE / Decimal::ZERO;
    }

    #[test]
    #[should_panic(expected = "Remainder by zero")]
    fn it_panics_on_remainder_by_zero() {
        let _ = Decimal::ONE % Decimal::ZERO;
    }

    #[test]
    fn it_negates() {
        assert_eq!((-Decimal::ONE).to_bits(), Decimal::NEGATIVE_ONE.to_bits());
        assert_eq!((-&Decimal::NEGATIVE_ONE).to_bits(), Decimal::ONE.to_bits());
        assert_eq!((-Decimal::ZERO).to_bits(), [0, 0, 0, 0x8000_0000]);
    }

    #[test]
    fn it_sums_and_multiplies_iterators() {
        let values: Vec<Decimal> = (1..=5).map(Decimal::from).collect();
        assert_eq!(values.iter().sum::<Decimal>(), Decimal::from(15));
        assert_eq!(values.iter().product::<Decimal>(), Decimal::from(120));
        assert_eq!(values.into_iter().sum::<Decimal>(), Decimal::from(15));
        assert_eq!(Vec::<Decimal>::new().into_iter().product::<Decimal>(), Decimal::ONE);
    }

    #[test]
    fn it_implements_num_traits() {
        assert_eq!(CheckedAdd::checked_add(&Decimal::MAX, &Decimal::ONE), None);
        assert_eq!(CheckedDiv::checked_div(&Decimal::ONE, &Decimal::ZERO), None);
        assert_eq!(Decimal::from_str_radix("1.5", 10), Ok(Decimal::new(15, 1)));
        assert!(Decimal::from_str_radix("1.5", 16).is_err());
        assert_eq!(Signed::signum(&Decimal::new(-25, 1)), Decimal::NEGATIVE_ONE);
        assert_eq!(Signed::abs_sub(&Decimal::ONE, &Decimal::TWO), Decimal::ZERO);
        assert!(!Signed::is_negative(&Decimal::from_parts(0, 0, 0, true, 0)));
    }
}
