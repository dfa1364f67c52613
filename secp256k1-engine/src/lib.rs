//! Pure Rust secp256k1 ECDSA engine.
//!
//! The engine is organised bottom-up:
//!
//! - [`arithmetic`]: field elements modulo `p`, scalars modulo `n`, affine and
//!   Jacobian points, and the two multiplication contexts (blinded comb
//!   tables for `k*G`, wNAF tables for `a*P + b*G`).
//! - [`nonce`]: RFC6979 HMAC-SHA256 deterministic nonce generation.
//! - [`Context`]: owns the precomputed tables and the diagnostic callbacks,
//!   and exposes key parsing, signing, verification, tweaking and recovery.
//!
//! ## Usage
//!
//! ```
//! use secp256k1_engine::{Context, Flags};
//!
//! let ctx = Context::new(Flags::CONTEXT_SIGN | Flags::CONTEXT_VERIFY)?;
//! let seckey = [0x42u8; 32];
//! let msg = [0x07u8; 32];
//!
//! let public_key = ctx.create_public_key(&seckey)?;
//! let signature = ctx.sign(&msg, &seckey, None, None)?;
//! assert!(ctx.verify(&signature, &msg, &public_key)?);
//! # Ok::<(), secp256k1_engine::Error>(())
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "expose-field")]
pub mod arithmetic;
#[cfg(not(feature = "expose-field"))]
mod arithmetic;

pub mod ecdsa;
pub mod nonce;

mod context;
mod error;
mod public_key;
mod secret_key;

#[cfg(any(feature = "test-vectors", test))]
pub mod test_vectors;

pub use crate::{
    context::{Callbacks, Context, Flags},
    ecdsa::{recoverable::RecoverableSignature, DerSignature, Signature},
    error::{Error, Result},
    nonce::{NonceFunction, Rfc6979},
    public_key::{PublicKey, SerializedPublicKey},
};
pub use elliptic_curve;

use elliptic_curve::{
    bigint::U256,
    consts::U32,
    Curve, FieldBytesEncoding, PrimeCurve,
};

/// Order of the secp256k1 elliptic curve in hexadecimal.
const ORDER_HEX: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

/// secp256k1 elliptic curve.
///
/// Specified in Certicom's SECG in SEC 2: Recommended Elliptic Curve Domain Parameters:
///
/// <https://www.secg.org/sec2-v2.pdf>
///
/// The curve's equation is `y² = x³ + 7` over a ~256-bit prime field.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Secp256k1;

impl Curve for Secp256k1 {
    /// 32-byte serialized field elements.
    type FieldBytesSize = U32;

    /// 256-bit field modulus.
    type Uint = U256;

    /// Curve order.
    const ORDER: U256 = U256::from_be_hex(ORDER_HEX);
}

impl PrimeCurve for Secp256k1 {}

impl FieldBytesEncoding<Secp256k1> for U256 {}
