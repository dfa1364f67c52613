//! Field element modulo the curve internal modulus using 32-bit limbs.
//! Inspired by the implementation in <https://github.com/bitcoin-core/secp256k1>

use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

/// Mask for a full 26-bit limb.
const M26: u32 = 0x3FFFFFF;

/// Mask for the 22-bit top limb.
const M22: u32 = 0x03FFFFF;

/// `2^260 mod p`, split as `R0 + R1 * 2^26`.
const R0: u128 = 0x3D10;
const R1: u128 = 0x400;

/// Scalars modulo SECP256k1 modulus (2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1).
/// Uses 10 32-bit limbs (little-endian), where in the normalized form
/// first 9 contain 26 bits of the value each, and the last one contains 22 bits.
/// Arithmetic can be done without modulo reduction for some time,
/// using the remaining overflow bits.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement10x26(pub(crate) [u32; 10]);

impl FieldElement10x26 {
    /// Zero element.
    pub const ZERO: Self = Self([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Unpacks eight little-endian 32-bit words into 26-bit limbs.
    /// Does not check the result for being in the correct range.
    pub(crate) const fn from_words_unchecked(words: &[u32; 8]) -> Self {
        let mut r = [0u32; 10];
        let mut i = 0;
        while i < 10 {
            let bit = 26 * i;
            let word = bit / 32;
            let shift = bit % 32;
            let mut limb = words[word] >> shift;
            if shift > 6 && word + 1 < 8 {
                limb |= words[word + 1] << (32 - shift);
            }
            r[i] = limb & if i == 9 { M22 } else { M26 };
            i += 1;
        }
        Self(r)
    }

    /// Packs the limbs into eight little-endian 32-bit words.
    /// The element must be normalized.
    pub(crate) fn to_words(self) -> [u32; 8] {
        let mut w = [0u32; 8];
        for i in 0..10 {
            let bit = 26 * i;
            let word = bit / 32;
            let shift = bit % 32;
            w[word] |= self.0[i] << shift;
            if shift > 6 && word + 1 < 8 {
                w[word + 1] |= self.0[i] >> (32 - shift);
            }
        }
        w
    }

    /// Attempts to parse the given byte array as an SEC1-encoded field element.
    /// Does not check the result for being in the correct range.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        let mut words = [0u32; 8];
        let mut j = 0;
        while j < 8 {
            let o = 28 - 4 * j;
            words[j] = ((bytes[o] as u32) << 24)
                | ((bytes[o + 1] as u32) << 16)
                | ((bytes[o + 2] as u32) << 8)
                | (bytes[o + 3] as u32);
            j += 1;
        }
        Self::from_words_unchecked(&words)
    }

    /// Attempts to parse the given byte array as an SEC1-encoded field element.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, p).
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let res = Self::from_bytes_unchecked(bytes);
        let overflow = res.get_overflow();
        CtOption::new(res, !overflow)
    }

    pub const fn from_u64(val: u64) -> Self {
        let w0 = (val as u32) & M26;
        let val = val >> 26;
        let w1 = (val as u32) & M26;
        let w2 = (val >> 26) as u32;
        Self([w0, w1, w2, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Returns the SEC1 encoding of this field element.
    /// The element must be normalized.
    pub fn to_bytes(self) -> [u8; 32] {
        let words = self.to_words();
        let mut r = [0u8; 32];
        for (j, w) in words.iter().enumerate() {
            let o = 28 - 4 * j;
            r[o..o + 4].copy_from_slice(&w.to_be_bytes());
        }
        r
    }

    /// Checks if the field element is greater or equal to the modulus.
    /// Only meaningful for weakly normalized input.
    fn get_overflow(&self) -> Choice {
        let t = &self.0;
        let m = t[2] & t[3] & t[4] & t[5] & t[6] & t[7] & t[8];
        let x = (t[9] >> 22 != 0)
            | ((t[9] == M22) & (m == M26) & ((t[1] + 0x40 + ((t[0] + 0x3D1) >> 26)) > M26));
        Choice::from(x as u8)
    }

    /// Adds `x * (2^256 - modulus)` and propagates carries through limbs 0..9.
    fn add_modulus_correction(mut t: [u32; 10], x: u32) -> [u32; 10] {
        t[0] += x * 0x3D1;
        t[1] += x << 6;
        for i in 0..9 {
            t[i + 1] += t[i] >> 26;
            t[i] &= M26;
        }
        t
    }

    /// Brings the field element's magnitude to 1, but does not necessarily normalize it.
    pub fn normalize_weak(&self) -> Self {
        let mut t = self.0;

        // Reduce t9 at the start so there will be at most a single carry from the first pass
        let x = t[9] >> 22;
        t[9] &= M22;

        let t = Self::add_modulus_correction(t, x);

        // At most a carry into bit 22 of t9 (i.e. bit 256 of the field element) remains
        debug_assert!(t[9] >> 23 == 0);

        Self(t)
    }

    /// Fully normalizes the field element.
    /// That is, first nine limbs are at most 26 bit large, the last limb is at most 22 bit large,
    /// and the value is less than the modulus.
    pub fn normalize(&self) -> Self {
        let res = self.normalize_weak();

        // At most a single final reduction is needed
        let overflow = res.get_overflow();
        let x = overflow.unwrap_u8() as u32;

        // Always apply the (possibly zero) reduction
        let mut t = Self::add_modulus_correction(res.0, x);
        debug_assert!(t[9] >> 22 == x);
        t[9] &= M22;

        Self(t)
    }

    /// Checks if the field element becomes zero if normalized.
    pub fn normalizes_to_zero(&self) -> Choice {
        let t = self.normalize_weak().0;

        // z0 tracks a possible raw value of 0, z1 tracks a possible raw value of the modulus
        let mut z0 = 0u32;
        let mut z1 = (t[0] ^ 0x3D0) & (t[1] ^ 0x40) & (t[9] ^ 0x3C00000);
        for limb in t.iter() {
            z0 |= limb;
        }
        for limb in t[2..9].iter() {
            z1 &= limb;
        }

        Choice::from(((z0 == 0) | (z1 == M26)) as u8)
    }

    /// Determine if this `FieldElement10x26` is zero.
    ///
    /// # Returns
    ///
    /// If zero, return `Choice(1)`.  Otherwise, return `Choice(0)`.
    pub fn is_zero(&self) -> Choice {
        let acc = self.0.iter().fold(0u32, |acc, limb| acc | limb);
        Choice::from((acc == 0) as u8)
    }

    /// Determine if this `FieldElement10x26` is odd in the SEC1 sense: `self mod 2 == 1`.
    ///
    /// # Returns
    ///
    /// If odd, return `Choice(1)`.  Otherwise, return `Choice(0)`.
    pub fn is_odd(&self) -> Choice {
        (self.0[0] as u8 & 1).into()
    }

    // The maximum number `m` for which `0x3FFFFFF * 2 * (m + 1) < 2^32`
    #[cfg(debug_assertions)]
    pub const fn max_magnitude() -> u32 {
        31u32
    }

    /// Returns -self, treating it as a value of given magnitude.
    /// The provided magnitude must be equal or greater than the actual magnitude of `self`.
    pub const fn negate(&self, magnitude: u32) -> Self {
        let m = 2 * (magnitude + 1);
        let mut r = [0u32; 10];
        r[0] = 0x3FFFC2F * m - self.0[0];
        r[1] = 0x3FFFFBF * m - self.0[1];
        let mut i = 2;
        while i < 9 {
            r[i] = M26 * m - self.0[i];
            i += 1;
        }
        r[9] = M22 * m - self.0[9];
        Self(r)
    }

    /// Returns self + rhs mod p.
    /// Sums the magnitudes.
    pub const fn add(&self, rhs: &Self) -> Self {
        let mut r = [0u32; 10];
        let mut i = 0;
        while i < 10 {
            r[i] = self.0[i] + rhs.0[i];
            i += 1;
        }
        Self(r)
    }

    /// Returns 2*self.
    /// Doubles the magnitude.
    pub const fn double(&self) -> Self {
        self.add(self)
    }

    /// Multiplies by a single-limb integer.
    /// Multiplies the magnitude by the same value.
    pub const fn mul_single(&self, rhs: u32) -> Self {
        let mut r = [0u32; 10];
        let mut i = 0;
        while i < 10 {
            r[i] = self.0[i] * rhs;
            i += 1;
        }
        Self(r)
    }

    #[inline(always)]
    fn mul_inner(&self, rhs: &Self) -> Self {
        // Schoolbook product: p[k] = sum(a[i]*b[k-i]) is the coefficient of 2^(26k).
        let mut p = [0u128; 19];
        for i in 0..10 {
            for j in 0..10 {
                p[i + j] += (self.0[i] as u128) * (rhs.0[j] as u128);
            }
        }

        // Fold the upper half down: 2^(26*10) = 2^260 = R0 + R1 * 2^26 (mod p).
        // Targets are always below index 10, so one descending pass suffices.
        for k in (10..19).rev() {
            let hi = p[k];
            p[k - 10] += hi * R0;
            p[k - 9] += hi * R1;
        }

        // Carry through limbs 0..9, leaving everything above bit 256 in `top`.
        let mut r = [0u32; 10];
        let mut acc = 0u128;
        for k in 0..9 {
            acc += p[k];
            r[k] = (acc as u32) & M26;
            acc >>= 26;
        }
        acc += p[9];
        r[9] = (acc as u32) & M22;
        let top = acc >> 22;

        // 2^256 = 0x3D1 + 0x40 * 2^26 (mod p).
        let mut acc = r[0] as u128 + top * 0x3D1;
        r[0] = (acc as u32) & M26;
        acc >>= 26;
        acc += r[1] as u128 + top * 0x40;
        r[1] = (acc as u32) & M26;
        acc >>= 26;
        for limb in r[2..9].iter_mut() {
            acc += *limb as u128;
            *limb = (acc as u32) & M26;
            acc >>= 26;
        }
        r[9] += acc as u32;

        debug_assert!(r[9] >> 23 == 0);

        Self(r)
    }

    /// Returns self * rhs mod p
    /// Brings the magnitude to 1 (but doesn't normalize the result).
    /// The magnitudes of arguments should be <= 8.
    #[inline(always)]
    pub fn mul(&self, rhs: &Self) -> Self {
        self.mul_inner(rhs)
    }

    /// Returns self * self
    /// Brings the magnitude to 1 (but doesn't normalize the result).
    /// The magnitudes of arguments should be <= 8.
    pub fn square(&self) -> Self {
        self.mul_inner(self)
    }
}

impl Default for FieldElement10x26 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElement10x26 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut r = [0u32; 10];
        for (i, limb) in r.iter_mut().enumerate() {
            *limb = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(r)
    }
}

impl ConstantTimeEq for FieldElement10x26 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Zeroize for FieldElement10x26 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
