//! Blinded multiplication of the generator: `gn*G`.
//!
//! The scalar is cut into 64 four-bit windows. For window `j` the table holds
//! `i*16^j*G + U_j` for every nibble value `i`, so each window costs one
//! constant-time table scan and one constant-time addition.
//!
//! The offsets `U_j` are multiples of a point with unknown discrete logarithm
//! and sum to the identity: `U_j = 2^j*U` for `j < 63`, and
//! `U_63 = (1 - 2^63)*U`. No partial sum of the computation is therefore a
//! multiple of `G` alone.
//!
//! On top of that the context holds a secret blinding pair: the scalar
//! actually decomposed is `gn + blind`, and the accumulator starts at
//! `initial = -blind*G`. Both are refreshed by [`GenContext::blind`].

use crate::arithmetic::{AffinePoint, AffineStorage, FieldElement, ProjectivePoint, Scalar};
use alloc::vec::Vec;
use elliptic_curve::{
    subtle::{ConditionallySelectable, ConstantTimeEq},
    zeroize::Zeroize,
};
use rfc6979::HmacDrbg;
use sha2::Sha256;

/// Number of 4-bit windows in a 256-bit scalar.
const WINDOWS: usize = 64;

/// Entries per window.
const WINDOW_SIZE: usize = 16;

/// x-coordinate of the point with unknown discrete logarithm: the ASCII
/// string below, interpreted as a big-endian integer.
const NUMS_X: &[u8; 32] = b"The scalar for this x is unknown";

/// The even square root of `NUMS_X^3 + 7`.
const NUMS_Y: [u8; 32] = [
    0x28, 0xeb, 0xb7, 0xe4, 0xe1, 0xf6, 0xa1, 0x2e, 0x1c, 0x0f, 0xaa, 0xf4, 0x7e, 0x09, 0xc3, 0x33,
    0x05, 0xd5, 0x08, 0x90, 0x85, 0x69, 0x30, 0xe6, 0x7e, 0x52, 0x99, 0x34, 0x8f, 0xf7, 0xf2, 0x0e,
];

/// Precomputed comb table and blinding state for `gn*G`.
#[derive(Clone)]
pub struct GenContext {
    prec: Vec<[AffineStorage; WINDOW_SIZE]>,
    blind: Scalar,
    initial: ProjectivePoint,
}

impl GenContext {
    /// Builds the table and applies the default (deterministic) blinding.
    pub fn new() -> Self {
        let mut ctx = Self {
            prec: build_table(),
            blind: Scalar::ZERO,
            initial: ProjectivePoint::IDENTITY,
        };
        ctx.blind(None);
        ctx
    }

    /// Computes `gn*G` in constant time.
    pub fn ecmult_gen(&self, gn: &Scalar) -> ProjectivePoint {
        let mut r = self.initial;
        let mut gnb = gn.add(&self.blind);
        let mut add = AffineStorage::default();

        for (j, window) in self.prec.iter().enumerate() {
            let bits = gnb.get_bits(j * 4, 4);
            for (i, entry) in window.iter().enumerate() {
                add.conditional_assign(entry, (i as u32).ct_eq(&bits));
            }
            r = r.add_ge(&AffinePoint::from_storage(&add));
        }

        add.zeroize();
        gnb.zeroize();
        r
    }

    /// Refreshes the blinding pair.
    ///
    /// With a seed, the new pair is derived from the seed chained with the
    /// current blinding value. Without one, the pair is reset and rederived
    /// deterministically, which restores the state of a freshly built
    /// context.
    ///
    /// The result of [`GenContext::ecmult_gen`] never changes; only the
    /// intermediate values do.
    pub fn blind(&mut self, seed: Option<&[u8; 32]>) {
        if seed.is_none() {
            self.initial = ProjectivePoint::GENERATOR;
            self.blind = Scalar::ONE.negate();
        }

        // The prior blinding value is chained forward through the seed.
        let mut blind_bytes = self.blind.to_bytes();
        let seed = seed.map_or(&[][..], |s| &s[..]);
        let mut rng = HmacDrbg::<Sha256>::new(&blind_bytes, seed, &[]);
        blind_bytes.zeroize();

        // Randomize the projective coordinates of the starting point.
        let mut nonce = [0u8; 32];
        let mut s = loop {
            rng.fill_bytes(&mut nonce);
            let s: Option<FieldElement> = FieldElement::from_bytes(&nonce).into();
            match s {
                Some(s) if !bool::from(s.is_zero()) => break s,
                _ => continue,
            }
        };
        self.initial = self.initial.rescale(&s);
        s.zeroize();

        let mut b = loop {
            rng.fill_bytes(&mut nonce);
            let (b, overflow) = Scalar::from_bytes_reduced(&nonce);
            if !bool::from(overflow | b.is_zero()) {
                break b;
            }
        };
        nonce.zeroize();

        let gb = self.ecmult_gen(&b);
        self.blind = b.negate();
        self.initial = gb;
        b.zeroize();
    }
}

impl Default for GenContext {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for GenContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GenContext").finish_non_exhaustive()
    }
}

impl Drop for GenContext {
    fn drop(&mut self) {
        self.blind.zeroize();
        self.initial.zeroize();
    }
}

/// The point `U` with unknown discrete logarithm: the even-y point at
/// [`NUMS_X`] plus `G`.
fn nums_point() -> ProjectivePoint {
    let nums = AffinePoint::from_xy(
        FieldElement::from_bytes_unchecked(NUMS_X),
        FieldElement::from_bytes_unchecked(&NUMS_Y),
    );
    debug_assert!(nums.is_valid());
    ProjectivePoint::from(nums).add_ge_var(&AffinePoint::GENERATOR)
}

/// Computes `prec[j][i] = i*16^j*G + U_j`.
fn build_table() -> Vec<[AffineStorage; WINDOW_SIZE]> {
    let mut points = Vec::with_capacity(WINDOWS * WINDOW_SIZE);
    let mut gbase = ProjectivePoint::GENERATOR;
    let mut numsbase = nums_point();
    let nums = numsbase;

    for j in 0..WINDOWS {
        let mut p = numsbase;
        points.push(p);
        for _ in 1..WINDOW_SIZE {
            p = p + &gbase;
            points.push(p);
        }

        for _ in 0..4 {
            gbase = gbase.double();
        }
        numsbase = numsbase.double();
        if j == WINDOWS - 2 {
            // The last window gets (1 - 2^63)*U so the offsets cancel.
            numsbase = -numsbase + &nums;
        }
    }

    let affine = ProjectivePoint::batch_to_affine(&points);
    affine
        .chunks_exact(WINDOW_SIZE)
        .map(|window| {
            let mut row = [AffineStorage::default(); WINDOW_SIZE];
            for (entry, point) in row.iter_mut().zip(window.iter()) {
                *entry = point.to_storage();
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{nums_point, GenContext, NUMS_X, NUMS_Y};
    use crate::{
        arithmetic::{AffinePoint, FieldElement, ProjectivePoint, Scalar},
        test_vectors::group::{ADD_TEST_VECTORS, MUL_TEST_VECTORS},
    };
    use elliptic_curve::subtle::Choice;
    use once_cell::sync::Lazy;
    use proptest::prelude::*;

    static CTX: Lazy<GenContext> = Lazy::new(GenContext::new);

    #[test]
    fn nums_coordinates_lie_on_curve() {
        let x = FieldElement::from_bytes(NUMS_X).unwrap();
        let nums = AffinePoint::decompress(&x, Choice::from(0)).unwrap();
        assert!(nums.is_valid());
        assert_eq!(nums.y.to_bytes(), NUMS_Y);
        assert_eq!(
            nums_point(),
            ProjectivePoint::from(nums).add_ge_var(&AffinePoint::GENERATOR)
        );
    }

    #[test]
    fn nums_point_is_valid() {
        let u = nums_point();
        assert!(u.is_valid());
        assert_ne!(u.to_affine(), AffinePoint::GENERATOR);
    }

    #[test]
    fn small_multiples() {
        assert!(CTX.ecmult_gen(&Scalar::ZERO).is_identity());
        for (i, (x, y)) in ADD_TEST_VECTORS.iter().enumerate() {
            let p = CTX.ecmult_gen(&Scalar::from(i as u32 + 1)).to_affine();
            assert_eq!(&p.x.to_bytes(), x);
            assert_eq!(&p.y.to_bytes(), y);
        }
    }

    #[test]
    fn generator_vectors() {
        for (k, x, y) in MUL_TEST_VECTORS {
            let k = Scalar::from_bytes(k).unwrap();
            let p = CTX.ecmult_gen(&k).to_affine();
            assert_eq!(&p.x.to_bytes(), x);
            assert_eq!(&p.y.to_bytes(), y);
        }
    }

    #[test]
    fn reblinding_keeps_results() {
        let k = Scalar::from_bytes(&MUL_TEST_VECTORS[0].0).unwrap();
        let expected = CTX.ecmult_gen(&k);

        let mut ctx = CTX.clone();
        ctx.blind(Some(&[0x5a; 32]));
        assert_ne!(ctx.blind, CTX.blind);
        assert_eq!(ctx.ecmult_gen(&k), expected);

        ctx.blind(Some(&[0xa5; 32]));
        assert_eq!(ctx.ecmult_gen(&k), expected);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut ctx = CTX.clone();
        ctx.blind(Some(&[0x01; 32]));
        ctx.blind(None);
        assert_eq!(ctx.blind, CTX.blind);
        assert_eq!(ctx.initial, CTX.initial);
    }

    #[test]
    fn initial_is_minus_blind_times_g() {
        let expected = CTX.ecmult_gen(&CTX.blind.negate());
        assert_eq!(CTX.initial, expected);
        assert!((CTX.initial + &CTX.ecmult_gen(&CTX.blind)).is_identity());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn linear(a in any::<u32>(), b in any::<u32>()) {
            let (a, b) = (Scalar::from(a), Scalar::from(b));
            let sum = CTX.ecmult_gen(&a) + &CTX.ecmult_gen(&b);
            prop_assert_eq!(CTX.ecmult_gen(&(a + &b)), sum);
        }
    }
}
