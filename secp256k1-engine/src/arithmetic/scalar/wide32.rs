//! 512-bit products of scalars and their reduction modulo the curve order.

use super::{Scalar, NEG_MODULUS};
use crate::arithmetic::util::{adc32, mac32};
use elliptic_curve::subtle::Choice;

/// Number of non-zero limbs in `2^256 - n`.
const NEG_MODULUS_LIMBS: usize = 5;

/// Unreduced product of two scalars as 16 little-endian 32-bit limbs.
#[derive(Clone, Copy, Debug, Default)]
pub struct WideScalar(pub(crate) [u32; 16]);

impl WideScalar {
    /// Schoolbook multiplication. Every limb pair is visited regardless of
    /// the limb values.
    pub fn mul_wide(a: &Scalar, b: &Scalar) -> Self {
        let mut w = [0u32; 16];
        for i in 0..8 {
            let mut carry = 0;
            for j in 0..8 {
                (w[i + j], carry) = mac32(w[i + j], a.0[i], b.0[j], carry);
            }
            w[i + 8] = carry;
        }
        Self(w)
    }

    /// Reduces the 512-bit value modulo `n`.
    ///
    /// Uses `2^256 = 2^256 - n (mod n)` three times: 512 bits fold to at most
    /// 386, then to 260, then to 256 plus a carry bit. A final conditional
    /// subtraction brings the result into `[0, n)`.
    pub fn reduce(&self) -> Scalar {
        let (lo, hi) = split(&self.0[..16]);
        let m = fold(&lo, &hi);

        let (lo, hi) = split(&m[..13]);
        let p = fold(&lo, &hi[..5]);

        let (lo, hi) = split(&p[..9]);
        let r = fold(&lo, &hi[..1]);

        let mut limbs = [0u32; 8];
        limbs.copy_from_slice(&r[..8]);
        debug_assert!(r[8] >> 1 == 0);

        let overflow = Choice::from(r[8] as u8) | Scalar::check_overflow(&limbs);
        Scalar::reduce(&limbs, overflow)
    }
}

/// Splits a limb slice into its low 256 bits and the remaining high limbs
/// (zero-padded to eight).
fn split(limbs: &[u32]) -> ([u32; 8], [u32; 8]) {
    let mut lo = [0u32; 8];
    let mut hi = [0u32; 8];
    lo.copy_from_slice(&limbs[..8]);
    hi[..limbs.len() - 8].copy_from_slice(&limbs[8..]);
    (lo, hi)
}

/// Computes `lo + hi * (2^256 - n)`.
///
/// The loop bounds depend only on `hi.len()`, never on limb values.
fn fold(lo: &[u32; 8], hi: &[u32]) -> [u32; 14] {
    let mut out = [0u32; 14];
    out[..8].copy_from_slice(lo);

    for (i, h) in hi.iter().enumerate() {
        let mut carry = 0;
        for j in 0..NEG_MODULUS_LIMBS {
            (out[i + j], carry) = mac32(out[i + j], *h, NEG_MODULUS[j], carry);
        }
        for limb in out[i + NEG_MODULUS_LIMBS..].iter_mut() {
            (*limb, carry) = adc32(*limb, 0, carry);
        }
        debug_assert!(carry == 0);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::WideScalar;
    use crate::arithmetic::scalar::Scalar;

    #[test]
    fn reduce_max_product() {
        // (n - 1)^2 = 1 (mod n)
        let minus_one = Scalar::ONE.negate();
        assert_eq!(WideScalar::mul_wide(&minus_one, &minus_one).reduce(), Scalar::ONE);
    }

    #[test]
    fn reduce_all_ones() {
        // 2^512 - 1 exercises every carry path of the three folds.
        let wide = WideScalar([u32::MAX; 16]);
        assert_eq!(
            wide.reduce().to_bytes(),
            hex_literal::hex!("9D671CD581C69BC5E697F5E45BCD07C6741496C20E7CF878896CF21467D7D13F")
        );
    }
}
