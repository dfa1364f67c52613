//! Limb arithmetic shared by the scalar code.

#[cfg(test)]
use num_bigint::BigUint;
#[cfg(test)]
use num_traits::Zero;

/// Splits a 64-bit intermediate into its low limb and the limb above it.
#[inline(always)]
const fn split(wide: u64) -> (u32, u32) {
    (wide as u32, (wide >> 32) as u32)
}

/// `a + b + carry` as `(sum, carry)`.
#[inline(always)]
pub const fn adc32(a: u32, b: u32, carry: u32) -> (u32, u32) {
    split(a as u64 + b as u64 + carry as u64)
}

/// `a - b - borrow` as `(difference, borrow)`.
///
/// Only the top bit of the incoming borrow is read. The outgoing borrow is
/// all ones when the subtraction wrapped and zero otherwise, so it can be
/// used directly as a mask.
#[inline(always)]
pub const fn sbb32(a: u32, b: u32, borrow: u32) -> (u32, u32) {
    split((a as u64).wrapping_sub(b as u64 + (borrow >> 31) as u64))
}

/// `a + b * c + carry` as `(low, high)`. Cannot overflow 64 bits.
#[inline(always)]
pub const fn mac32(a: u32, b: u32, c: u32, carry: u32) -> (u32, u32) {
    split(a as u64 + b as u64 * c as u64 + carry as u64)
}

/// Reads 32 big-endian bytes as an integer.
#[cfg(test)]
pub fn bytes_to_biguint(bytes: &[u8; 32]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Writes `x mod 2^256` as 32 big-endian bytes.
#[cfg(test)]
pub fn biguint_to_bytes(x: &BigUint) -> [u8; 32] {
    let mut out = [0u8; 32];
    if x.is_zero() {
        return out;
    }
    let be = x.to_bytes_be();
    let tail = &be[be.len().saturating_sub(32)..];
    out[32 - tail.len()..].copy_from_slice(tail);
    out
}
