//! Unsigned limb arithmetic. Inputs are limb slices, least-significant limb
//! first, without superfluous leading zeroes; outputs are trimmed the same
//! way.

use crate::storage::{Limb, LimbVec};
use std::cmp::Ordering;

pub(crate) const LIMB_BITS: usize = 30;
pub(crate) const RADIX: u64 = 1 << LIMB_BITS;
pub(crate) const LIMB_MASK: Limb = (1 << LIMB_BITS) - 1;

#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
pub(crate) const fn truncate(n: u64) -> Limb {
    (n & (RADIX - 1)) as Limb
}

fn get(limbs: &[Limb], idx: usize) -> Limb {
    limbs.get(idx).copied().unwrap_or(0)
}

pub(crate) fn zero() -> LimbVec {
    LimbVec::from_elem(1, 0)
}

pub(crate) fn is_zero(limbs: &[Limb]) -> bool {
    limbs.iter().all(|&limb| limb == 0)
}

/// Drops leading zero limbs, keeping a single `0` for zero.
pub(crate) fn trim(mag: &mut LimbVec) {
    let mut len = mag.len();
    {
        let limbs = mag.as_slice();
        while len > 1 && limbs[len - 1] == 0 {
            len -= 1;
        }
    }
    if len == 0 {
        mag.push(0);
    } else {
        mag.truncate(len);
    }
}

pub(crate) fn cmp(a: &[Limb], b: &[Limb]) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

pub(crate) fn add(a: &[Limb], b: &[Limb]) -> LimbVec {
    let mut res = LimbVec::with_len(a.len().max(b.len()));
    let mut carry = 0;
    for (i, slot) in res.make_mut_slice().iter_mut().enumerate() {
        carry += u64::from(get(a, i)) + u64::from(get(b, i));
        *slot = truncate(carry);
        carry >>= LIMB_BITS;
    }
    if carry != 0 {
        res.push(truncate(carry));
    }
    res
}

/// Computes `a - b`. Requires `a >= b`.
pub(crate) fn sub(a: &[Limb], b: &[Limb]) -> LimbVec {
    debug_assert_ne!(cmp(a, b), Ordering::Less);
    let mut res = LimbVec::with_len(a.len());
    let mut borrow = 0;
    for (i, slot) in res.make_mut_slice().iter_mut().enumerate() {
        let minuend = u64::from(a[i]);
        let subtrahend = u64::from(get(b, i)) + borrow;
        if minuend >= subtrahend {
            *slot = truncate(minuend - subtrahend);
            borrow = 0;
        } else {
            *slot = truncate(minuend + RADIX - subtrahend);
            borrow = 1;
        }
    }
    trim(&mut res);
    res
}

pub(crate) fn mul(a: &[Limb], b: &[Limb]) -> LimbVec {
    if is_zero(a) || is_zero(b) {
        return zero();
    }
    let mut res = LimbVec::with_len(a.len() + b.len());
    {
        let out = res.make_mut_slice();
        for (i, &x) in a.iter().enumerate() {
            let mut acc = 0;
            for (j, &y) in b.iter().enumerate() {
                acc += u64::from(x) * u64::from(y) + u64::from(out[i + j]);
                out[i + j] = truncate(acc);
                acc >>= LIMB_BITS;
            }
            out[i + b.len()] = truncate(acc);
        }
    }
    trim(&mut res);
    res
}

/// `mag = mag * factor + addend`, in place.
pub(crate) fn mul_small_add(mag: &mut LimbVec, factor: Limb, addend: Limb) {
    let mut carry = u64::from(addend);
    for limb in mag.make_mut_slice() {
        carry += u64::from(*limb) * u64::from(factor);
        *limb = truncate(carry);
        carry >>= LIMB_BITS;
    }
    if carry != 0 {
        mag.push(truncate(carry));
    }
    trim(mag);
}

/// Long division by a single nonzero limb. Returns quotient and remainder.
pub(crate) fn div_small(a: &[Limb], divisor: Limb) -> (LimbVec, Limb) {
    debug_assert_ne!(divisor, 0);
    let divisor = u64::from(divisor);
    let mut quot = LimbVec::with_len(a.len());
    let mut rem = 0;
    {
        let out = quot.make_mut_slice();
        for i in (0..a.len()).rev() {
            rem = (rem << LIMB_BITS) | u64::from(a[i]);
            out[i] = truncate(rem / divisor);
            rem %= divisor;
        }
    }
    trim(&mut quot);
    (quot, truncate(rem))
}

/// `rem * RADIX + limb`
fn shift_in(rem: &LimbVec, limb: Limb) -> LimbVec {
    let mut next = LimbVec::from_elem(1, limb);
    if !is_zero(rem.as_slice()) {
        next.extend_from_slice(rem.as_slice());
    }
    next
}

/// Largest `d` in `[0, RADIX)` with `d * divisor <= rem`.
fn quotient_limb(divisor: &[Limb], rem: &[Limb]) -> Limb {
    let (mut low, mut high) = (0, RADIX);
    while high - low > 1 {
        let mid = (low + high) / 2;
        let trial = mul(divisor, &[truncate(mid)]);
        if cmp(trial.as_slice(), rem) == Ordering::Greater {
            high = mid;
        } else {
            low = mid;
        }
    }
    truncate(low)
}

/// Quotient of `a / b` for any nonzero `b`.
pub(crate) fn div(a: &[Limb], b: &[Limb]) -> LimbVec {
    debug_assert!(!is_zero(b));
    if cmp(a, b) == Ordering::Less {
        return zero();
    }
    if b.len() == 1 {
        return div_small(a, b[0]).0;
    }
    let mut quot = LimbVec::with_len(a.len());
    let mut rem = zero();
    for i in (0..a.len()).rev() {
        rem = shift_in(&rem, a[i]);
        if cmp(rem.as_slice(), b) != Ordering::Less {
            let digit = quotient_limb(b, rem.as_slice());
            quot.make_mut_slice()[i] = digit;
            rem = sub(rem.as_slice(), mul(b, &[digit]).as_slice());
        }
    }
    trim(&mut quot);
    quot
}

pub(crate) fn shl(mag: &[Limb], bits: usize) -> LimbVec {
    if is_zero(mag) {
        return zero();
    }
    let limbs = bits / LIMB_BITS;
    let shift = bits % LIMB_BITS;
    let mut res = LimbVec::with_len(limbs + mag.len() + 1);
    {
        let out = res.make_mut_slice();
        for (i, &limb) in mag.iter().enumerate() {
            let wide = u64::from(limb) << shift;
            out[i + limbs] |= truncate(wide);
            out[i + limbs + 1] = truncate(wide >> LIMB_BITS);
        }
    }
    trim(&mut res);
    res
}

/// Shifts a two's-complement pattern right by `bits`. Every limb above the
/// pattern is taken to equal `extension`, so this is an arithmetic shift.
pub(crate) fn shr_pattern(pattern: &[Limb], extension: Limb, bits: usize) -> LimbVec {
    let limbs = bits / LIMB_BITS;
    let shift = bits % LIMB_BITS;
    let at = |i: usize| {
        i.checked_add(limbs)
            .and_then(|i| pattern.get(i))
            .copied()
            .unwrap_or(extension)
    };
    let mut res = LimbVec::with_len(pattern.len().max(1));
    for (i, slot) in res.make_mut_slice().iter_mut().enumerate() {
        let low = u64::from(at(i)) >> shift;
        let high = u64::from(at(i + 1)) << (LIMB_BITS - shift);
        *slot = truncate(low | high);
    }
    res
}

/// Two's-complement negation modulo `RADIX^len`. Returns the carry out of
/// the top limb, which is only set when every limb was zero.
fn negate_in_place(limbs: &mut [Limb]) -> bool {
    let mut carry = 1;
    for limb in limbs {
        carry += u64::from(!*limb & LIMB_MASK);
        *limb = truncate(carry);
        carry >>= LIMB_BITS;
    }
    carry != 0
}

/// The `width`-limb two's-complement pattern of a signed magnitude, plus the
/// limb that repeats above it (all zeroes or all ones).
pub(crate) fn to_twos_complement(negative: bool, mag: &[Limb], width: usize) -> (LimbVec, Limb) {
    debug_assert!(width >= mag.len());
    let mut pattern = LimbVec::with_len(width);
    {
        let out = pattern.make_mut_slice();
        out[..mag.len()].copy_from_slice(mag);
        if negative {
            negate_in_place(out);
        }
    }
    (pattern, if negative { LIMB_MASK } else { 0 })
}

/// Inverse of [`to_twos_complement`]: returns whether the value is negative,
/// and its trimmed magnitude.
pub(crate) fn from_twos_complement(mut pattern: LimbVec, extension: Limb) -> (bool, LimbVec) {
    let negative = extension != 0;
    if negative && negate_in_place(pattern.make_mut_slice()) {
        pattern.push(1);
    }
    trim(&mut pattern);
    (negative, pattern)
}

/// Applies `op` limb by limb to the infinite two's-complement patterns of
/// both operands.
pub(crate) fn bitwise(
    a: (bool, &[Limb]),
    b: (bool, &[Limb]),
    op: impl Fn(Limb, Limb) -> Limb,
) -> (bool, LimbVec) {
    let width = a.1.len().max(b.1.len()).max(1);
    let (mut res, ext_a) = to_twos_complement(a.0, a.1, width);
    let (pattern_b, ext_b) = to_twos_complement(b.0, b.1, width);
    for (x, &y) in res.make_mut_slice().iter_mut().zip(pattern_b.iter()) {
        *x = op(*x, y) & LIMB_MASK;
    }
    from_twos_complement(res, op(ext_a, ext_b) & LIMB_MASK)
}
