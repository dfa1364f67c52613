//! Checked field representation used in debug builds.
//!
//! Carries the magnitude and normalization state next to the 10x26 value and
//! asserts the preconditions of every operation against them.

use super::field_10x26::FieldElement10x26 as Inner;
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::Zeroize,
};

/// Largest magnitude accepted by `mul` and `square`.
const MAX_MUL_MAGNITUDE: u32 = 8;

#[derive(Clone, Copy, Debug)]
pub struct FieldElementImpl {
    value: Inner,
    magnitude: u32,
    normalized: bool,
}

impl FieldElementImpl {
    pub const ZERO: Self = Self::normalized(Inner::ZERO);
    pub const ONE: Self = Self::normalized(Inner::ONE);

    const fn normalized(value: Inner) -> Self {
        Self {
            value,
            magnitude: 1,
            normalized: true,
        }
    }

    fn with_magnitude(value: Inner, magnitude: u32) -> Self {
        debug_assert!(
            magnitude <= Inner::max_magnitude(),
            "field magnitude {magnitude} exceeds the limb headroom"
        );
        Self {
            value,
            magnitude,
            normalized: false,
        }
    }

    fn value_normalized(&self) -> &Inner {
        debug_assert!(self.normalized, "field element is not normalized");
        &self.value
    }

    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self::normalized(Inner::from_bytes_unchecked(bytes))
    }

    pub(crate) const fn from_words_unchecked(words: &[u32; 8]) -> Self {
        Self::normalized(Inner::from_words_unchecked(words))
    }

    pub const fn from_u64(val: u64) -> Self {
        Self::normalized(Inner::from_u64(val))
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        Inner::from_bytes(bytes).map(Self::normalized)
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.value_normalized().to_bytes()
    }

    pub(crate) fn to_words(self) -> [u32; 8] {
        self.value_normalized().to_words()
    }

    pub fn normalize_weak(&self) -> Self {
        Self::with_magnitude(self.value.normalize_weak(), 1)
    }

    pub fn normalize(&self) -> Self {
        Self::normalized(self.value.normalize())
    }

    pub fn normalizes_to_zero(&self) -> Choice {
        self.value.normalizes_to_zero()
    }

    pub fn is_zero(&self) -> Choice {
        self.value_normalized().is_zero()
    }

    pub fn is_odd(&self) -> Choice {
        self.value_normalized().is_odd()
    }

    pub fn negate(&self, magnitude: u32) -> Self {
        debug_assert!(
            self.magnitude <= magnitude,
            "negate called with magnitude {magnitude}, value has {}",
            self.magnitude
        );
        Self::with_magnitude(self.value.negate(magnitude), magnitude + 1)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self::with_magnitude(self.value.add(&rhs.value), self.magnitude + rhs.magnitude)
    }

    pub fn double(&self) -> Self {
        Self::with_magnitude(self.value.double(), self.magnitude * 2)
    }

    pub fn mul_single(&self, rhs: u32) -> Self {
        Self::with_magnitude(self.value.mul_single(rhs), self.magnitude * rhs)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        debug_assert!(self.magnitude <= MAX_MUL_MAGNITUDE && rhs.magnitude <= MAX_MUL_MAGNITUDE);
        Self::with_magnitude(self.value.mul(&rhs.value), 1)
    }

    pub fn square(&self) -> Self {
        debug_assert!(self.magnitude <= MAX_MUL_MAGNITUDE);
        Self::with_magnitude(self.value.square(), 1)
    }
}

impl Default for FieldElementImpl {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElementImpl {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        // The bookkeeping only exists in debug builds; branching on it is fine.
        let picked = if bool::from(choice) { b } else { a };
        Self {
            value: Inner::conditional_select(&a.value, &b.value, choice),
            magnitude: picked.magnitude,
            normalized: picked.normalized,
        }
    }
}

impl ConstantTimeEq for FieldElementImpl {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.value.ct_eq(&other.value)
    }
}

impl Zeroize for FieldElementImpl {
    fn zeroize(&mut self) {
        *self = Self::ZERO;
        self.value.zeroize();
    }
}
