//! Field arithmetic modulo p = 2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1

use cfg_if::cfg_if;

mod field_10x26;

cfg_if! {
    if #[cfg(debug_assertions)] {
        mod field_impl;
        use field_impl::FieldElementImpl;
    } else {
        use field_10x26::FieldElement10x26 as FieldElementImpl;
    }
}

use core::ops::{Add, Mul};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

#[cfg(test)]
use super::util::bytes_to_biguint;
#[cfg(test)]
use num_bigint::BigUint;

/// An element in the finite field used for curve coordinates.
///
/// Values carry an implicit *magnitude*: additions grow it, multiplications
/// and normalization bring it back to 1. Equality, parity and serialization
/// need a normalized value.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldElement(FieldElementImpl);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self(FieldElementImpl::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(FieldElementImpl::ONE);

    /// Creates a normalized field element from a small integer.
    pub const fn from_u64(val: u64) -> Self {
        Self(FieldElementImpl::from_u64(val))
    }

    /// Parses a big-endian integer in `[0, p)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        FieldElementImpl::from_bytes(bytes).map(Self)
    }

    /// Parses a big-endian integer known to be below `p`.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self(FieldElementImpl::from_bytes_unchecked(bytes))
    }

    /// Big-endian encoding of the fully reduced value.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.normalize().to_bytes()
    }

    /// Packs a normalized element into storage form.
    pub fn to_storage(self) -> FieldStorage {
        FieldStorage(self.0.to_words())
    }

    /// Unpacks a storage form element. The result is normalized.
    pub const fn from_storage(storage: &FieldStorage) -> Self {
        Self(FieldElementImpl::from_words_unchecked(&storage.0))
    }

    /// Is this (normalized) element zero?
    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    /// Is this (normalized) element odd?
    pub fn is_odd(&self) -> Choice {
        self.0.is_odd()
    }

    /// Would this element be zero after normalization?
    pub fn normalizes_to_zero(&self) -> Choice {
        self.0.normalizes_to_zero()
    }

    /// Reduces to magnitude 1 and into `[0, p)`.
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }

    /// Reduces to magnitude 1; the value may still be `>= p`.
    pub fn normalize_weak(&self) -> Self {
        Self(self.0.normalize_weak())
    }

    /// `-self`, where `magnitude` bounds the magnitude of `self`. The result
    /// has magnitude `magnitude + 1`.
    pub fn negate(&self, magnitude: u32) -> Self {
        Self(self.0.negate(magnitude))
    }

    /// `2*self`, doubling the magnitude.
    pub fn double(&self) -> Self {
        Self(self.0.double())
    }

    /// `rhs*self` for a small integer, multiplying the magnitude by `rhs`.
    pub fn mul_single(&self, rhs: u32) -> Self {
        Self(self.0.mul_single(rhs))
    }

    /// `self*rhs`. Inputs may have magnitude up to 8; the output has
    /// magnitude 1.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }

    /// `self*self`, with the same magnitude rules as [`FieldElement::mul`].
    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    fn pow2k(&self, k: usize) -> Self {
        (0..k).fold(*self, |x, _| x.square())
    }

    /// Computes `self^(2^k - 1)` for `k = 2, 22, 223`.
    ///
    /// Both `p - 2` and `(p + 1)/4` are made of runs of ones of these
    /// lengths, so inversion and square roots share this chain:
    /// 1, [2], 3, 6, 9, 11, [22], 44, 88, 176, 220, [223].
    fn runs_of_ones(&self) -> (Self, Self, Self) {
        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);
        (x2, x22, x223)
    }

    /// `self^(p - 2)`: the inverse of a non-zero element, and zero for zero.
    /// The result has magnitude 1.
    pub fn invert(&self) -> Self {
        let (x2, x22, x223) = self.runs_of_ones();
        // p - 2 = [223 ones] 0 [22 ones] 0000 1 0 11 0 1
        x223.pow2k(23)
            .mul(&x22)
            .pow2k(5)
            .mul(self)
            .pow2k(3)
            .mul(&x2)
            .pow2k(2)
            .mul(self)
    }

    /// Square root via `self^((p + 1)/4)`, valid since `p = 3 mod 4`.
    ///
    /// `None` if `self` is not a quadratic residue. The result has
    /// magnitude 1.
    pub fn sqrt(&self) -> CtOption<Self> {
        let (x2, x22, x223) = self.runs_of_ones();
        // (p + 1)/4 = [223 ones] 0 [22 ones] 0000 11 00
        let root = x223.pow2k(23).mul(&x22).pow2k(6).mul(&x2).pow2k(2);

        let is_root = (root.square().negate(1) + self).normalizes_to_zero();
        CtOption::new(root, is_root)
    }

    #[cfg(test)]
    pub fn modulus_as_biguint() -> BigUint {
        bytes_to_biguint(&Self::ONE.negate(1).normalize().to_bytes()) + 1u8
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(FieldElementImpl::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    /// Compares the represented values; both sides are normalized first.
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.normalize().ct_eq(&other.0.normalize())
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

macro_rules! impl_field_op {
    ($op:ident, $op_fn:ident) => {
        impl $op<&FieldElement> for FieldElement {
            type Output = FieldElement;

            fn $op_fn(self, rhs: &FieldElement) -> FieldElement {
                FieldElement(self.0.$op_fn(&rhs.0))
            }
        }

        impl $op<&FieldElement> for &FieldElement {
            type Output = FieldElement;

            fn $op_fn(self, rhs: &FieldElement) -> FieldElement {
                FieldElement(self.0.$op_fn(&rhs.0))
            }
        }
    };
}

impl_field_op!(Add, add);
impl_field_op!(Mul, mul);

/// Packed form of a normalized field element: eight little-endian 32-bit words.
///
/// Used inside opaque public keys and precomputed tables, never for arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStorage(pub(crate) [u32; 8]);

impl FieldStorage {
    /// Serializes the words in little-endian order.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Inverse of [`FieldStorage::to_le_bytes`].
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }
}

impl ConditionallySelectable for FieldStorage {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut words = [0u32; 8];
        for (i, word) in words.iter_mut().enumerate() {
            *word = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(words)
    }
}

impl Zeroize for FieldStorage {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldElement, FieldStorage};
    use crate::arithmetic::util::{biguint_to_bytes, bytes_to_biguint};
    use hex_literal::hex;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn fe(x: &BigUint) -> FieldElement {
        FieldElement::from_bytes(&biguint_to_bytes(x)).unwrap()
    }

    fn big(x: &FieldElement) -> BigUint {
        bytes_to_biguint(&x.to_bytes())
    }

    fn p() -> BigUint {
        FieldElement::modulus_as_biguint()
    }

    #[test]
    fn modulus() {
        let expected = hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
        assert_eq!(biguint_to_bytes(&p()), expected);
        assert!(bool::from(FieldElement::from_bytes(&expected).is_none()));

        let mut p_minus_one = expected;
        p_minus_one[31] -= 1;
        assert!(bool::from(FieldElement::from_bytes(&p_minus_one).is_some()));
    }

    #[test]
    fn identities() {
        let (zero, one) = (FieldElement::ZERO, FieldElement::ONE);
        assert_eq!((one + &zero).normalize(), one);
        assert_eq!((one * &one).normalize(), one);
        assert!(bool::from((zero * &one).normalize().is_zero()));
        assert_eq!(FieldElement::default(), zero);
    }

    #[test]
    fn doubling_walks_powers_of_two() {
        let two = FieldElement::from_u64(2);
        let (mut doubled, mut multiplied) = (FieldElement::ONE, FieldElement::ONE);
        for i in 0..300u32 {
            assert_eq!(big(&doubled), (BigUint::from(1u8) << i) % p());
            assert_eq!(multiplied, doubled);
            doubled = doubled.double().normalize();
            multiplied = multiplied * &two;
        }
    }

    #[test]
    fn negation_stacks_magnitude() {
        let two = FieldElement::ONE.double();
        let minus_two = two.negate(2);
        assert!(bool::from((two + &minus_two).normalizes_to_zero()));
        assert_eq!(minus_two.negate(3).normalize(), two.normalize());
    }

    #[test]
    fn inverse_of_small_values() {
        assert!(bool::from(FieldElement::ZERO.invert().normalizes_to_zero()));
        assert_eq!(FieldElement::ONE.invert().normalize(), FieldElement::ONE);

        // 2^-1 = (p + 1)/2
        let half = (p() + 1u8) >> 1;
        assert_eq!(big(&FieldElement::from_u64(2).invert().normalize()), half);
    }

    #[test]
    fn square_roots() {
        let two = FieldElement::from_u64(2);
        let root = two.square().sqrt().unwrap().normalize();
        assert!(root == two || root == two.negate(1).normalize());

        // p = 3 mod 4, so -1 is a non-residue
        assert!(bool::from(FieldElement::ONE.negate(1).sqrt().is_none()));
        // 7 is a non-residue
        assert!(bool::from(FieldElement::from_u64(7).sqrt().is_none()));
    }

    #[test]
    fn storage_layout() {
        let gx = FieldElement::from_bytes(&hex!(
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        ))
        .unwrap();
        let storage = gx.to_storage();
        assert_eq!(storage.0[0], 0x16f8_1798);
        assert_eq!(storage.0[7], 0x79be_667e);
        assert_eq!(FieldStorage::from_le_bytes(&storage.to_le_bytes()), storage);
        assert_eq!(FieldElement::from_storage(&storage), gx);
    }

    prop_compose! {
        fn field_element()(bytes in any::<[u8; 32]>()) -> FieldElement {
            // 2^256 < 2p, so one subtraction suffices
            let mut x = bytes_to_biguint(&bytes);
            if x >= p() {
                x -= p();
            }
            fe(&x)
        }
    }

    proptest! {
        #[test]
        fn matches_biguint(a in field_element(), b in field_element()) {
            let (x, y, m) = (big(&a), big(&b), p());
            prop_assert_eq!(big(&(a + &b).normalize()), (&x + &y) % &m);
            prop_assert_eq!(big(&(a * &b).normalize()), (&x * &y) % &m);
            prop_assert_eq!(big(&a.square().normalize()), (&x * &x) % &m);
            prop_assert_eq!(big(&a.negate(1).normalize()), (&m - &x) % &m);
        }

        #[test]
        fn mul_at_max_magnitude(a in field_element(), b in field_element()) {
            let m = p();
            let a8 = a.mul_single(8);
            let b8 = b.negate(1).mul_single(4);
            let expected = (big(&a) * 8u32) * ((&m - big(&b)) * 4u32) % &m;
            prop_assert_eq!(big(&(a8 * &b8).normalize()), expected);
        }

        #[test]
        fn sqrt_of_square(a in field_element()) {
            let root = a.square().sqrt().unwrap().normalize();
            prop_assert!(root == a || root == a.negate(1).normalize());
        }

        #[test]
        fn invert_is_inverse(a in field_element()) {
            prop_assume!(!bool::from(a.is_zero()));
            prop_assert_eq!((a * &a.invert()).normalize(), FieldElement::ONE);
        }
    }
}
