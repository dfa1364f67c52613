//! A pure-Rust implementation of group operations on secp256k1.

pub(crate) mod affine;
mod field;
pub(crate) mod mul;
pub(crate) mod mul_gen;
pub(crate) mod projective;
pub(crate) mod scalar;
mod util;

pub use self::{
    affine::{AffinePoint, AffineStorage},
    field::{FieldElement, FieldStorage},
    mul::MulContext,
    mul_gen::GenContext,
    projective::ProjectivePoint,
    scalar::Scalar,
};

/// `b` in the curve equation `y² = x³ + b`.
pub(crate) const CURVE_EQUATION_B_SINGLE: u32 = 7u32;

#[rustfmt::skip]
pub(crate) const CURVE_EQUATION_B: FieldElement = FieldElement::from_u64(CURVE_EQUATION_B_SINGLE as u64);
