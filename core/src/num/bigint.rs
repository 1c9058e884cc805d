use crate::num::magnitude::{self, LIMB_BITS};
use crate::num::{DivideByZero, ParseBigIntError, ValueTooLarge};
use crate::storage::{Limb, LimbVec};
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::hash::{Hash, Hasher};
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};
use std::{fmt, str};

/// Largest power of ten that fits in one limb; decimal output is produced
/// in groups of this many digits.
const DECIMAL_GROUP: Limb = 100_000_000;
const DECIMAL_GROUP_DIGITS: usize = 8;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn flip(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }

    fn from_negative(negative: bool) -> Self {
        if negative {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// Arbitrary-precision signed integer.
///
/// Cloning is O(1): the limbs are shared until one of the copies is
/// modified. Values are not `Send`, since the sharing is not thread-safe.
#[derive(Clone)]
pub struct BigInt {
    sign: Sign,
    mag: LimbVec,
}

impl BigInt {
    fn from_parts(sign: Sign, mut mag: LimbVec) -> Self {
        magnitude::trim(&mut mag);
        let sign = if magnitude::is_zero(mag.as_slice()) {
            Sign::Positive
        } else {
            sign
        };
        Self { sign, mag }
    }

    pub fn zero() -> Self {
        Self::from(0_u32)
    }

    pub fn one() -> Self {
        Self::from(1_u32)
    }

    pub fn is_zero(&self) -> bool {
        magnitude::is_zero(self.mag.as_slice())
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative && !self.is_zero()
    }

    /// -1, 0 or 1
    pub fn signum(&self) -> Self {
        if self.is_zero() {
            Self::zero()
        } else if self.is_negative() {
            -Self::one()
        } else {
            Self::one()
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            sign: Sign::Positive,
            mag: self.mag.clone(),
        }
    }

    /// The limbs of the absolute value, least significant first.
    pub fn limbs(&self) -> &LimbVec {
        &self.mag
    }

    /// Number of significant bits in the absolute value; 0 for zero.
    pub fn bit_len(&self) -> usize {
        let limbs = self.mag.as_slice();
        match limbs.iter().rposition(|&limb| limb != 0) {
            Some(top) => top * LIMB_BITS + (Limb::BITS - limbs[top].leading_zeros()) as usize,
            None => 0,
        }
    }

    fn parts(&self) -> (bool, &[Limb]) {
        (self.is_negative(), self.mag.as_slice())
    }

    pub fn parse(s: &str) -> Result<Self, ParseBigIntError> {
        let digits = s.trim_start_matches(&['+', '-'][..]);
        // an even number of minus signs cancels out
        let minus_signs = s[..s.len() - digits.len()]
            .chars()
            .filter(|&ch| ch == '-')
            .count();
        if digits.is_empty() {
            return Err(ParseBigIntError::Empty);
        }
        let mut mag = magnitude::zero();
        for ch in digits.chars() {
            let digit = ch.to_digit(10).ok_or(ParseBigIntError::InvalidDigit(ch))?;
            magnitude::mul_small_add(&mut mag, 10, digit);
        }
        Ok(Self::from_parts(
            Sign::from_negative(minus_signs % 2 == 1),
            mag,
        ))
    }

    pub fn try_as_usize(&self) -> Result<usize, ValueTooLarge> {
        if self.is_negative() {
            return Err(ValueTooLarge {});
        }
        let mut res: usize = 0;
        for &limb in self.mag.iter().rev() {
            res = res
                .checked_mul(1 << LIMB_BITS)
                .and_then(|r| r.checked_add(usize::try_from(limb).ok()?))
                .ok_or(ValueTooLarge {})?;
        }
        Ok(res)
    }

    fn add_ref(&self, other: &Self) -> Self {
        let (a, b) = (self.mag.as_slice(), other.mag.as_slice());
        if self.sign == other.sign {
            return Self::from_parts(self.sign, magnitude::add(a, b));
        }
        match magnitude::cmp(a, b) {
            Ordering::Less => Self::from_parts(other.sign, magnitude::sub(b, a)),
            _ => Self::from_parts(self.sign, magnitude::sub(a, b)),
        }
    }

    fn sub_ref(&self, other: &Self) -> Self {
        self.add_ref(&-other)
    }

    fn mul_ref(&self, other: &Self) -> Self {
        let sign = if self.sign == other.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        Self::from_parts(
            sign,
            magnitude::mul(self.mag.as_slice(), other.mag.as_slice()),
        )
    }

    /// Truncating division: the quotient is rounded toward zero.
    pub fn checked_div(&self, other: &Self) -> Result<Self, DivideByZero> {
        if other.is_zero() {
            return Err(DivideByZero {});
        }
        let quot = magnitude::div(self.mag.as_slice(), other.mag.as_slice());
        let sign = if self.sign == other.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        Ok(Self::from_parts(sign, quot))
    }

    /// Remainder of truncating division; it has the sign of `self` or is
    /// zero.
    pub fn checked_rem(&self, other: &Self) -> Result<Self, DivideByZero> {
        Ok(self.div_rem(other)?.1)
    }

    pub fn div_rem(&self, other: &Self) -> Result<(Self, Self), DivideByZero> {
        let quot = self.checked_div(other)?;
        let rem = self - &(&quot * other);
        Ok((quot, rem))
    }

    fn div_ref(&self, other: &Self) -> Self {
        match self.checked_div(other) {
            Ok(res) => res,
            Err(DivideByZero {}) => panic!("attempt to divide by zero"),
        }
    }

    fn rem_ref(&self, other: &Self) -> Self {
        match self.checked_rem(other) {
            Ok(res) => res,
            Err(DivideByZero {}) => {
                panic!("attempt to calculate the remainder with a divisor of zero")
            }
        }
    }

    fn bitwise(&self, other: &Self, op: impl Fn(Limb, Limb) -> Limb) -> Self {
        let (negative, mag) = magnitude::bitwise(self.parts(), other.parts(), op);
        Self::from_parts(Sign::from_negative(negative), mag)
    }

    fn bitand_ref(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a & b)
    }

    fn bitor_ref(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a | b)
    }

    fn bitxor_ref(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a ^ b)
    }

    fn shl_ref(&self, bits: usize) -> Self {
        Self::from_parts(self.sign, magnitude::shl(self.mag.as_slice(), bits))
    }

    /// Arithmetic shift: negative values round toward negative infinity.
    fn shr_ref(&self, bits: usize) -> Self {
        let (negative, mag) = self.parts();
        let (pattern, extension) = magnitude::to_twos_complement(negative, mag, mag.len());
        let shifted = magnitude::shr_pattern(pattern.as_slice(), extension, bits);
        let (negative, mag) = magnitude::from_twos_complement(shifted, extension);
        Self::from_parts(Sign::from_negative(negative), mag)
    }

    pub fn pow(&self, mut exponent: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        while exponent > 0 {
            if exponent % 2 == 1 {
                result = &result * &base;
            }
            exponent >>= 1;
            if exponent > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// `++x`
    pub fn increment(&mut self) {
        *self += Self::one();
    }

    /// `--x`
    pub fn decrement(&mut self) {
        *self -= Self::one();
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(n: &BigInt) -> i8 {
            if n.is_zero() {
                0
            } else if n.sign == Sign::Negative {
                -1
            } else {
                1
            }
        }
        match rank(self).cmp(&rank(other)) {
            Ordering::Equal => (),
            unequal => return unequal,
        }
        let ord = magnitude::cmp(self.mag.as_slice(), other.mag.as_slice());
        if self.sign == Sign::Negative {
            ord.reverse()
        } else {
            ord
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_negative().hash(state);
        for limb in self.mag.iter().rev().skip_while(|&&limb| limb == 0) {
            limb.hash(state);
        }
    }
}

impl From<u64> for BigInt {
    fn from(mut n: u64) -> Self {
        let mut mag = LimbVec::new();
        loop {
            mag.push(magnitude::truncate(n));
            n >>= LIMB_BITS;
            if n == 0 {
                break;
            }
        }
        Self {
            sign: Sign::Positive,
            mag,
        }
    }
}

impl From<i64> for BigInt {
    fn from(n: i64) -> Self {
        // unsigned_abs cannot overflow, even for i64::MIN
        let abs = Self::from(n.unsigned_abs());
        if n < 0 {
            -abs
        } else {
            abs
        }
    }
}

impl From<u32> for BigInt {
    fn from(n: u32) -> Self {
        Self::from(u64::from(n))
    }
}

impl From<i32> for BigInt {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}

impl str::FromStr for BigInt {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, ParseBigIntError> {
        Self::parse(s)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut groups = vec![];
        let mut rest = self.mag.clone();
        while !magnitude::is_zero(rest.as_slice()) {
            let (quot, group) = magnitude::div_small(rest.as_slice(), DECIMAL_GROUP);
            groups.push(group);
            rest = quot;
        }
        let mut digits = String::new();
        let mut groups = groups.iter().rev();
        match groups.next() {
            Some(most_significant) => digits.push_str(&most_significant.to_string()),
            None => digits.push('0'),
        }
        for group in groups {
            digits.push_str(&format!("{:0width$}", group, width = DECIMAL_GROUP_DIGITS));
        }
        f.pad_integral(!self.is_negative(), "", &digits)
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Neg for BigInt {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_parts(self.sign.flip(), self.mag)
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        -self.clone()
    }
}

/// `!x == -(x + 1)`, i.e. the bitwise complement of the two's-complement
/// pattern.
impl Not for BigInt {
    type Output = Self;

    fn not(self) -> Self {
        !&self
    }
}

impl Not for &BigInt {
    type Output = BigInt;

    fn not(self) -> BigInt {
        -(self + BigInt::one())
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $assign_imp:ident, $assign_method:ident, $inner:ident) => {
        impl $imp<&BigInt> for &BigInt {
            type Output = BigInt;

            fn $method(self, other: &BigInt) -> BigInt {
                self.$inner(other)
            }
        }

        impl $imp<BigInt> for &BigInt {
            type Output = BigInt;

            fn $method(self, other: BigInt) -> BigInt {
                self.$inner(&other)
            }
        }

        impl $imp<&BigInt> for BigInt {
            type Output = BigInt;

            fn $method(self, other: &BigInt) -> BigInt {
                self.$inner(other)
            }
        }

        impl $imp<BigInt> for BigInt {
            type Output = BigInt;

            fn $method(self, other: BigInt) -> BigInt {
                self.$inner(&other)
            }
        }

        impl $assign_imp<&BigInt> for BigInt {
            fn $assign_method(&mut self, other: &BigInt) {
                *self = self.$inner(other);
            }
        }

        impl $assign_imp<BigInt> for BigInt {
            fn $assign_method(&mut self, other: BigInt) {
                *self = self.$inner(&other);
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign, add_ref);
forward_binop!(Sub, sub, SubAssign, sub_assign, sub_ref);
forward_binop!(Mul, mul, MulAssign, mul_assign, mul_ref);
forward_binop!(Div, div, DivAssign, div_assign, div_ref);
forward_binop!(Rem, rem, RemAssign, rem_assign, rem_ref);
forward_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, bitand_ref);
forward_binop!(BitOr, bitor, BitOrAssign, bitor_assign, bitor_ref);
forward_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, bitxor_ref);

macro_rules! forward_shift {
    ($imp:ident, $method:ident, $assign_imp:ident, $assign_method:ident, $inner:ident) => {
        impl $imp<usize> for &BigInt {
            type Output = BigInt;

            fn $method(self, bits: usize) -> BigInt {
                self.$inner(bits)
            }
        }

        impl $imp<usize> for BigInt {
            type Output = BigInt;

            fn $method(self, bits: usize) -> BigInt {
                self.$inner(bits)
            }
        }

        impl $assign_imp<usize> for BigInt {
            fn $assign_method(&mut self, bits: usize) {
                *self = self.$inner(bits);
            }
        }
    };
}

forward_shift!(Shl, shl, ShlAssign, shl_assign, shl_ref);
forward_shift!(Shr, shr, ShrAssign, shr_assign, shr_ref);
