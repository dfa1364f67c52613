//! Scalar arithmetic modulo the curve order using 32-bit limbs.
//! Ported from <https://github.com/bitcoin-core/secp256k1>

mod wide32;

pub(crate) use self::wide32::WideScalar;

use crate::arithmetic::util::{adc32, sbb32};
use core::ops::{Add, Mul, Neg};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

#[cfg(test)]
use num_bigint::{BigUint, ToBigUint};

/// Constant representing the modulus
/// n = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
pub const MODULUS: [u32; 8] = [
    0xD036_4141,
    0xBFD2_5E8C,
    0xAF48_A03B,
    0xBAAE_DCE6,
    0xFFFF_FFFE,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
];

/// Limbs of 2^256 minus the secp256k1 order.
pub const NEG_MODULUS: [u32; 8] = [
    !MODULUS[0] + 1,
    !MODULUS[1],
    !MODULUS[2],
    !MODULUS[3],
    !MODULUS[4],
    !MODULUS[5],
    !MODULUS[6],
    !MODULUS[7],
];

/// Constant representing the modulus / 2
const FRAC_MODULUS_2: [u32; 8] = [
    0x681B_20A0,
    0xDFE9_2F46,
    0x57A4_501D,
    0x5D57_6E73,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0x7FFF_FFFF,
];

/// `n - 2` in big-endian bytes, the inversion exponent.
const MODULUS_MINUS_TWO: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x3F,
];

/// Subtracts `rhs` from `lhs`, returning the difference and the final borrow
/// (`0` or `u32::MAX`).
#[inline(always)]
fn sbb_array(lhs: &[u32; 8], rhs: &[u32; 8]) -> ([u32; 8], u32) {
    let mut r = [0u32; 8];
    let mut borrow = 0;
    for i in 0..8 {
        (r[i], borrow) = sbb32(lhs[i], rhs[i], borrow);
    }
    (r, borrow)
}

/// Adds `rhs` to `lhs`, returning the sum and the final carry (`0` or `1`).
#[inline(always)]
fn adc_array(lhs: &[u32; 8], rhs: &[u32; 8]) -> ([u32; 8], u32) {
    let mut r = [0u32; 8];
    let mut carry = 0;
    for i in 0..8 {
        (r[i], carry) = adc32(lhs[i], rhs[i], carry);
    }
    (r, carry)
}

/// Scalars are elements in the finite field modulo n.
///
/// Held as eight little-endian 32-bit limbs, always fully reduced into `[0, n)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar(pub(crate) [u32; 8]);

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self([0, 0, 0, 0, 0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0]);

    /// Creates a scalar from a small integer.
    pub const fn from_u32(k: u32) -> Self {
        Self([k, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Returns `Choice(1)` if the little-endian limbs encode a value `>= n`.
    fn check_overflow(w: &[u32; 8]) -> Choice {
        let (_, borrow) = sbb_array(w, &MODULUS);
        // no borrow means w >= n
        !Choice::from((borrow >> 31) as u8)
    }

    /// Subtracts `n` once if `overflow` is set, by adding `2^256 - n` and
    /// dropping the carry.
    fn reduce(w: &[u32; 8], overflow: Choice) -> Self {
        let mask = 0u32.wrapping_sub(overflow.unwrap_u8() as u32);
        let mut correction = [0u32; 8];
        for (c, n) in correction.iter_mut().zip(NEG_MODULUS.iter()) {
            *c = n & mask;
        }
        let (r, _) = adc_array(w, &correction);
        Self(r)
    }

    /// Parses a big-endian 32-byte integer, reducing it modulo `n`.
    ///
    /// The returned `Choice` reports whether the input was `>= n`.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> (Self, Choice) {
        let mut w = [0u32; 8];
        for (i, chunk) in bytes.rchunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let overflow = Self::check_overflow(&w);
        (Self::reduce(&w, overflow), overflow)
    }

    /// Attempts to parse the given byte array as a scalar.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, n).
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let (scalar, overflow) = Self::from_bytes_reduced(bytes);
        CtOption::new(scalar, !overflow)
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, w) in out.rchunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&w.to_be_bytes());
        }
        out
    }

    /// Is this scalar greater than n / 2?
    pub fn is_high(&self) -> Choice {
        let (_, borrow) = sbb_array(&FRAC_MODULUS_2, &self.0);
        Choice::from((borrow >> 31) as u8)
    }

    /// Is this scalar equal to zero?
    pub fn is_zero(&self) -> Choice {
        self.0.iter().fold(0u32, |acc, w| acc | w).ct_eq(&0)
    }

    /// Is this scalar odd?
    pub fn is_odd(&self) -> Choice {
        ((self.0[0] & 1) as u8).into()
    }

    /// Returns `n - self`, or zero for a zero scalar.
    pub fn negate(&self) -> Self {
        let (r, _) = sbb_array(&MODULUS, &self.0);
        let mask = 0u32.wrapping_sub((!self.is_zero()).unwrap_u8() as u32);
        let mut out = [0u32; 8];
        for (o, w) in out.iter_mut().zip(r.iter()) {
            *o = w & mask;
        }
        Self(out)
    }

    /// Negates the scalar if `flag` is set.
    pub fn conditional_negate(&self, flag: Choice) -> Self {
        Self::conditional_select(self, &self.negate(), flag)
    }

    /// Returns `self + rhs mod n`.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = adc_array(&self.0, &rhs.0);
        let overflow = Choice::from(carry as u8) | Self::check_overflow(&sum);
        Self::reduce(&sum, overflow)
    }

    /// Returns `self * rhs mod n`.
    pub fn mul(&self, rhs: &Self) -> Self {
        WideScalar::mul_wide(self, rhs).reduce()
    }

    /// Returns `self * self mod n`.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns the multiplicative inverse modulo `n`, mapping zero to zero.
    ///
    /// Computes `self^(n-2)` with a fixed 4-bit window; the exponent is
    /// public so the table index never depends on secret data.
    pub fn invert(&self) -> Self {
        let mut table = [Self::ONE; 16];
        for i in 1..16 {
            table[i] = table[i - 1].mul(self);
        }

        let mut r = Self::ONE;
        for byte in MODULUS_MINUS_TWO.iter() {
            for nibble in [byte >> 4, byte & 0x0F] {
                for _ in 0..4 {
                    r = r.square();
                }
                r = r.mul(&table[nibble as usize]);
            }
        }
        r
    }

    /// Extracts `count` bits starting at `offset`. The bits must not cross a
    /// 32-bit limb boundary; the limb index is public, the value is not
    /// branched on.
    pub fn get_bits(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count > 0 && count < 32);
        debug_assert!((offset + count - 1) >> 5 == offset >> 5);
        (self.0[offset >> 5] >> (offset & 0x1F)) & ((1 << count) - 1)
    }

    /// Extracts `count` bits starting at `offset`, possibly spanning two
    /// limbs. Variable time with respect to `offset`.
    pub fn get_bits_var(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count > 0 && count < 32);
        debug_assert!(offset + count <= 256);
        if (offset + count - 1) >> 5 == offset >> 5 {
            self.get_bits(offset, count)
        } else {
            let lo = self.0[offset >> 5] >> (offset & 0x1F);
            let hi = self.0[(offset >> 5) + 1] << (32 - (offset & 0x1F));
            (lo | hi) & ((1 << count) - 1)
        }
    }

    #[cfg(test)]
    pub fn modulus_as_biguint() -> BigUint {
        Self::ONE.negate().to_biguint().unwrap() + 1.to_biguint().unwrap()
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut r = [0u32; 8];
        for (i, w) in r.iter_mut().enumerate() {
            *w = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(r)
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl From<u32> for Scalar {
    fn from(k: u32) -> Self {
        Self::from_u32(k)
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar::add(self, other)
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar::add(&self, other)
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar::mul(self, other)
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar::mul(&self, other)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}
