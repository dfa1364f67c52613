//! Recoverable signatures.
//!
//! A recoverable signature carries, next to `(r, s)`, a 2-bit recovery id
//! which allows the signer's public key to be computed from the signature
//! and the signed digest alone:
//!
//! - bit 0: the y-coordinate of the nonce point `k*G` is odd
//! - bit 1: the x-coordinate of `k*G` exceeded the group order, so `r` is
//!   that x-coordinate minus `n`
//!
//! ## Signing/Recovery Example
//!
//! ```
//! use secp256k1_engine::{Context, Flags};
//!
//! let ctx = Context::new(Flags::CONTEXT_SIGN | Flags::CONTEXT_VERIFY)?;
//! let seckey = [0x42u8; 32];
//! let msg = [0x07u8; 32];
//!
//! let signature = ctx.sign_recoverable(&msg, &seckey, None, None)?;
//! let recovered = ctx.recover(&signature, &msg)?;
//! assert_eq!(recovered, ctx.create_public_key(&seckey)?);
//! # Ok::<(), secp256k1_engine::Error>(())
//! ```

use super::{r_candidates, Signature};
use crate::{
    arithmetic::{AffinePoint, ProjectivePoint, Scalar},
    nonce::NonceFunction,
    Context, Error, PublicKey, Result,
};
use core::fmt::{self, Debug};
use elliptic_curve::subtle::Choice;

/// Size of a recoverable signature in bytes
pub const SIZE: usize = 65;

/// ECDSA signature with recovery id.
///
/// Opaque: `r || s || recid`, with `r` and `s` below the group order and
/// `recid` in `0..=3`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct RecoverableSignature {
    bytes: [u8; SIZE],
}

impl RecoverableSignature {
    fn new(signature: &Signature, recid: u8) -> Self {
        debug_assert!(recid <= 3);
        let mut bytes = [0u8; SIZE];
        bytes[..64].copy_from_slice(&signature.0);
        bytes[64] = recid;
        Self { bytes }
    }

    /// Get the recovery id of this signature.
    pub fn recovery_id(&self) -> u8 {
        self.bytes[64]
    }

    /// Drops the recovery id.
    pub fn to_signature(&self) -> Signature {
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&self.bytes[..64]);
        Signature(bytes)
    }
}

impl From<RecoverableSignature> for Signature {
    fn from(sig: RecoverableSignature) -> Self {
        sig.to_signature()
    }
}

impl Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature {{ bytes: {:?} }}", &self.bytes[..])
    }
}

impl Context {
    /// Parses a 64-byte compact signature together with its recovery id.
    pub fn parse_compact_recoverable_signature(
        &self,
        input64: &[u8],
        recid: u8,
    ) -> Result<RecoverableSignature> {
        self.arg_check(recid <= 3, "recid >= 0 && recid <= 3")?;
        let signature = self.parse_compact_signature(input64)?;
        Ok(RecoverableSignature::new(&signature, recid))
    }

    /// Serializes a recoverable signature as 64-byte compact `r || s` and the
    /// recovery id.
    pub fn serialize_compact_recoverable_signature(
        &self,
        signature: &RecoverableSignature,
    ) -> ([u8; 64], u8) {
        let compact = self.serialize_compact_signature(&signature.to_signature());
        (compact, signature.recovery_id())
    }

    /// Like [`Context::sign`], also recording the recovery id.
    pub fn sign_recoverable(
        &self,
        msg32: &[u8],
        secret_key: &[u8],
        noncefp: Option<&dyn NonceFunction>,
        noncedata: Option<&[u8; 32]>,
    ) -> Result<RecoverableSignature> {
        let (signature, recid) = self.sign_with_recid(msg32, secret_key, noncefp, noncedata)?;
        Ok(RecoverableSignature::new(&signature, recid))
    }

    /// Recovers the public key that produced `signature` over `msg32`.
    ///
    /// Fails with [`Error::InvalidSignature`] if no such key exists. Requires
    /// a context built with [`Flags::CONTEXT_VERIFY`].
    ///
    /// [`Flags::CONTEXT_VERIFY`]: crate::Flags::CONTEXT_VERIFY
    #[allow(non_snake_case)]
    pub fn recover(&self, signature: &RecoverableSignature, msg32: &[u8]) -> Result<PublicKey> {
        let mul = self.mul_context()?;
        let msg32 = self.arg_bytes::<32>(msg32, "msg32 length")?;
        let recid = signature.recovery_id();

        let (r, s) = signature.to_signature().scalars();
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(Error::InvalidSignature);
        }

        let x = match (recid & 2 != 0, r_candidates(&r)) {
            (false, (xr, _)) => xr,
            (true, (_, Some(wrapped))) => wrapped,
            (true, (_, None)) => return Err(Error::InvalidSignature),
        };
        let R = AffinePoint::decompress(&x, Choice::from(recid & 1));
        let R = Option::<AffinePoint>::from(R).ok_or(Error::InvalidSignature)?;

        // Q = r⁻¹(s·R - m·G)
        let msg = Scalar::from_bytes_reduced(msg32).0;
        let r_inv = r.invert();
        let u1 = r_inv.mul(&msg).negate();
        let u2 = r_inv.mul(&s);
        let q = mul.ecmult(&ProjectivePoint::from(R), &u2, &u1);
        if q.is_identity() {
            return Err(Error::InvalidSignature);
        }

        Ok(PublicKey::from_point(&q.to_affine()))
    }
}

#[cfg(test)]
mod tests {
    use super::RecoverableSignature;
    use crate::{
        test_vectors::ecdsa::{ECDSA_TEST_VECTORS, RFC6979_TEST_VECTORS},
        Callbacks, Context, Error, Flags,
    };
    use hex_literal::hex;
    use once_cell::sync::Lazy;
    use proptest::prelude::*;

    static CTX: Lazy<Context> = Lazy::new(|| {
        Context::with_callbacks(
            Flags::CONTEXT_SIGN | Flags::CONTEXT_VERIFY,
            Callbacks::silent(),
        )
        .unwrap()
    });

    /// Signature recovery test vectors
    struct RecoveryTestVector {
        pk: [u8; 33],
        sig: [u8; 65],
        msg: [u8; 32],
    }

    /// SHA-256 of "example message"
    const EXAMPLE_MESSAGE: [u8; 32] =
        hex!("ad84cd0b10fc028738971b078124aec2a0e7c6d986a381be0b386f32bee887af");

    const RECOVERY_TEST_VECTORS: &[RecoveryTestVector] = &[
        // Recovery ID 0
        RecoveryTestVector {
            pk: hex!("021a7a569e91dbf60581509c7fc946d1003b60c7dee85299538db6353538d59574"),
            sig: hex!(
                "ce53abb3721bafc561408ce8ff99c909f7f0b18a2f788649d6470162ab1aa03239
                 71edc523a6d6453f3fb6128d318d9db1a5ff3386feb1047d9816e780039d5200"
            ),
            msg: EXAMPLE_MESSAGE,
        },
        // Recovery ID 1
        RecoveryTestVector {
            pk: hex!("036d6caac248af96f6afa7f904f550253a0f3ef3f5aa2fe6838a95b216691468e2"),
            sig: hex!(
                "46c05b6368a44b8810d79859441d819b8e7cdc8bfd371e35c53196f4bcacdb5135
                 c7facce2a97b95eacba8a586d87b7958aaf8368ab29cee481f76e871dbd9cb01"
            ),
            msg: EXAMPLE_MESSAGE,
        },
    ];

    fn parse(sig: &[u8; 65]) -> RecoverableSignature {
        CTX.parse_compact_recoverable_signature(&sig[..64], sig[64])
            .unwrap()
    }

    #[test]
    fn public_key_recovery() {
        for vector in RECOVERY_TEST_VECTORS {
            let sig = parse(&vector.sig);
            let pk = CTX.recover(&sig, &vector.msg).unwrap();
            let expected = CTX.parse_public_key(&vector.pk).unwrap();
            assert_eq!(pk, expected);
            assert_eq!(
                CTX.verify(&sig.to_signature(), &vector.msg, &pk),
                Ok(true)
            );
        }
    }

    #[test]
    fn recovery_id_selects_key() {
        let vector = &RECOVERY_TEST_VECTORS[0];
        let mut flipped = vector.sig;
        flipped[64] ^= 1;
        let pk = CTX.recover(&parse(&flipped), &vector.msg).unwrap();
        assert_ne!(pk, CTX.parse_public_key(&vector.pk).unwrap());

        // r is far above p - n, so r + n is not a field element
        flipped[64] = 2;
        assert_eq!(
            CTX.recover(&parse(&flipped), &vector.msg),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn sign_recoverable_vectors() {
        for vector in ECDSA_TEST_VECTORS.iter().chain(RFC6979_TEST_VECTORS) {
            let k = vector.k;
            let fixed = move |_: &[u8; 32],
                              _: &[u8; 32],
                              _: Option<&[u8; 16]>,
                              _: Option<&[u8; 32]>,
                              _: u32| Some(k);
            let sig = CTX
                .sign_recoverable(&vector.m, &vector.d, Some(&fixed), None)
                .unwrap();

            let (compact, recid) = CTX.serialize_compact_recoverable_signature(&sig);
            assert_eq!(compact[..32], vector.r);
            assert_eq!(compact[32..], vector.s);
            assert_eq!(recid, vector.recid);

            let pk = CTX.recover(&sig, &vector.m).unwrap();
            let mut uncompressed = [0x04u8; 65];
            uncompressed[1..33].copy_from_slice(&vector.q_x);
            uncompressed[33..].copy_from_slice(&vector.q_y);
            assert_eq!(pk, CTX.parse_public_key(&uncompressed).unwrap());
        }
    }

    #[test]
    fn parse_checks_recid() {
        let mut ctx = Context::new(Flags::CONTEXT_NONE).unwrap();
        ctx.set_illegal_callback(|msg| assert_eq!(msg, "recid >= 0 && recid <= 3"));
        let sig = &RECOVERY_TEST_VECTORS[0].sig;
        assert_eq!(
            ctx.parse_compact_recoverable_signature(&sig[..64], 4),
            Err(Error::IllegalArgument)
        );
        assert!(ctx
            .parse_compact_recoverable_signature(&sig[..64], 3)
            .is_ok());
    }

    #[test]
    fn zero_signature_does_not_recover() {
        let sig = CTX
            .parse_compact_recoverable_signature(&[0u8; 64], 0)
            .unwrap();
        assert_eq!(
            CTX.recover(&sig, &EXAMPLE_MESSAGE),
            Err(Error::InvalidSignature)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn recover_round_trip(d in any::<[u8; 32]>(), m in any::<[u8; 32]>()) {
            prop_assume!(CTX.verify_secret_key(&d).is_ok());
            let sig = CTX.sign_recoverable(&m, &d, None, None).unwrap();
            prop_assert_eq!(sig.to_signature(), CTX.sign(&m, &d, None, None).unwrap());
            prop_assert_eq!(CTX.recover(&sig, &m).unwrap(), CTX.create_public_key(&d).unwrap());
        }
    }
}
