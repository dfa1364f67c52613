//! Elliptic Curve Digital Signature Algorithm (ECDSA)
//!
//! Signatures are created with [`Context::sign`] and checked with
//! [`Context::verify`]. Both work on 32-byte message digests; hashing the
//! message is up to the caller.
//!
//! Signatures produced by this engine are always in "low S" form, and
//! verification rejects the "high S" form, as described in
//! [BIP 0062: Dealing with Malleability][1]. Signatures obtained elsewhere can
//! be brought into low-S form with [`Context::normalize_signature`].
//!
//! [1]: https://github.com/bitcoin/bips/blob/master/bip-0062.mediawiki

mod der;
pub mod recoverable;
mod sign;
mod verify;

use crate::{
    arithmetic::{FieldElement, Scalar},
    Context, Error, Result,
};
use core::fmt;

/// Group order `n` as a big-endian integer.
const ORDER_BYTES: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `p - n` as a big-endian integer.
///
/// An `r` below this value may stem from an x-coordinate `r + n`.
const P_MINUS_ORDER_BYTES: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x45, 0x51, 0x23, 0x19, 0x50, 0xB7, 0x5F, 0xC4, 0x40, 0x2D, 0xA1, 0x72, 0x2F, 0xC9, 0xBA, 0xEE,
];

/// Group order `n` as a field element.
const ORDER_AS_FIELD: FieldElement = FieldElement::from_bytes_unchecked(&ORDER_BYTES);

/// Lifts `r` to the field, also returning `r + n` when that is still a field
/// element.
fn r_candidates(r: &Scalar) -> (FieldElement, Option<FieldElement>) {
    let bytes = r.to_bytes();
    let xr = FieldElement::from_bytes_unchecked(&bytes);
    // big-endian byte order matches integer order
    let wrapped = (bytes < P_MINUS_ORDER_BYTES).then(|| xr + &ORDER_AS_FIELD);
    (xr, wrapped)
}

/// ECDSA/secp256k1 signature (fixed-size)
///
/// Opaque: holds `r` and `s`, both below the group order. Use the compact or
/// DER codecs of [`Context`] to move signatures in and out of the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

impl Signature {
    pub(crate) fn from_scalars(r: &Scalar, s: &Scalar) -> Self {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&r.to_bytes());
        bytes[32..].copy_from_slice(&s.to_bytes());
        Self(bytes)
    }

    /// Returns `(r, s)`.
    pub(crate) fn scalars(&self) -> (Scalar, Scalar) {
        let (r, s) = split(&self.0);
        (
            Scalar::from_bytes_reduced(&r).0,
            Scalar::from_bytes_reduced(&s).0,
        )
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// DER encoding of a signature, at most 72 bytes.
#[derive(Clone, Copy)]
pub struct DerSignature {
    bytes: [u8; der::MAX_SIZE],
    len: usize,
}

impl DerSignature {
    /// Length of the encoding in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for DerSignature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl PartialEq for DerSignature {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Eq for DerSignature {}

impl fmt::Debug for DerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DerSignature").field(&self.as_ref()).finish()
    }
}

fn split(bytes: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    (r, s)
}

impl Context {
    /// Parses a 64-byte compact signature `r || s` (big-endian).
    ///
    /// Fails with [`Error::InvalidSignature`] if either value is not below
    /// the group order. Zero values are accepted and never verify.
    pub fn parse_compact_signature(&self, input64: &[u8]) -> Result<Signature> {
        let input64 = self.arg_bytes::<64>(input64, "input64 length")?;
        let (r, s) = split(input64);
        let (_, r_overflow) = Scalar::from_bytes_reduced(&r);
        let (_, s_overflow) = Scalar::from_bytes_reduced(&s);
        if bool::from(r_overflow | s_overflow) {
            return Err(Error::InvalidSignature);
        }
        Ok(Signature(*input64))
    }

    /// Serializes a signature in 64-byte compact form `r || s`.
    pub fn serialize_compact_signature(&self, signature: &Signature) -> [u8; 64] {
        signature.0
    }

    /// Parses a DER signature.
    ///
    /// Length and structure violations are rejected, but integers that are
    /// negative or exceed the group order are read as zero so that the
    /// signature parses and later fails to verify.
    pub fn parse_der_signature(&self, input: &[u8]) -> Result<Signature> {
        let (r, s) = der::parse(input).ok_or(Error::InvalidSignature)?;
        Ok(Signature::from_scalars(&r, &s))
    }

    /// Serializes a signature in minimal DER form.
    pub fn serialize_der_signature(&self, signature: &Signature) -> DerSignature {
        let (r, s) = signature.scalars();
        let mut bytes = [0u8; der::MAX_SIZE];
        let len = der::serialize(&r, &s, &mut bytes);
        DerSignature { bytes, len }
    }

    /// Converts a signature to low-S form.
    ///
    /// Returns the normalized signature and whether it differs from the
    /// input, i.e. whether the input had a high `s`.
    pub fn normalize_signature(&self, signature: &Signature) -> (Signature, bool) {
        let (r, s) = signature.scalars();
        let high = s.is_high();
        let s = s.conditional_negate(high);
        (Signature::from_scalars(&r, &s), high.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{r_candidates, Signature, ORDER_AS_FIELD, P_MINUS_ORDER_BYTES};
    use crate::{
        arithmetic::{FieldElement, Scalar},
        Callbacks, Context, Error, Flags,
    };
    use hex_literal::hex;
    use once_cell::sync::Lazy;
    use proptest::prelude::*;

    static CTX: Lazy<Context> =
        Lazy::new(|| Context::with_callbacks(Flags::CONTEXT_NONE, Callbacks::silent()).unwrap());

    const SIG_HI: [u8; 64] = hex!(
        "20c01a910ebb2610af2d763fa09b3b30923c8e408b11df2c61ad76d970a2f1bc"
        "ee2f11ef8cb00a49617d1357f4d55641090a48f201e9b959c48f6f6bec6f938f"
    );
    const SIG_LO: [u8; 64] = hex!(
        "20c01a910ebb2610af2d763fa09b3b30923c8e408b11df2c61ad76d970a2f1bc"
        "11d0ee10734ff5b69e82eca80b2aa9bdb1a493f4ad5ee6e1fb42ef20e3c6adb2"
    );

    #[test]
    fn constants() {
        let n = FieldElement::from_bytes(&super::ORDER_BYTES).unwrap();
        assert_eq!(ORDER_AS_FIELD, n);

        // n + (p - n) wraps to zero
        let p_minus_n = FieldElement::from_bytes(&P_MINUS_ORDER_BYTES).unwrap();
        assert!(bool::from((n + &p_minus_n).normalize().is_zero()));
    }

    #[test]
    fn r_lifts_to_one_or_two_x_coordinates() {
        let (xr, wrapped) = r_candidates(&Scalar::ONE);
        assert_eq!(xr, FieldElement::ONE);
        assert_eq!(wrapped, Some(ORDER_AS_FIELD + &FieldElement::ONE));

        let p_minus_n = Scalar::from_bytes(&P_MINUS_ORDER_BYTES).unwrap();
        assert_eq!(r_candidates(&p_minus_n).1, None);
    }

    #[test]
    fn normalize_s_high() {
        let sig_hi = CTX.parse_compact_signature(&SIG_HI).unwrap();
        let sig_lo = CTX.parse_compact_signature(&SIG_LO).unwrap();

        let (normalized, changed) = CTX.normalize_signature(&sig_hi);
        assert!(changed);
        assert_eq!(normalized, sig_lo);
    }

    #[test]
    fn normalize_s_low() {
        let mut bytes = [0u8; 64];
        bytes[31] = 1;
        bytes[63] = 1;
        let sig = CTX.parse_compact_signature(&bytes).unwrap();

        let (normalized, changed) = CTX.normalize_signature(&sig);
        assert!(!changed);
        assert_eq!(normalized, sig);
    }

    #[test]
    fn compact_round_trip() {
        let sig = CTX.parse_compact_signature(&SIG_LO).unwrap();
        assert_eq!(CTX.serialize_compact_signature(&sig), SIG_LO);
    }

    #[test]
    fn compact_rejects_overflow() {
        let mut bytes = SIG_LO;
        bytes[..32].copy_from_slice(&hex!(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        ));
        assert_eq!(
            CTX.parse_compact_signature(&bytes),
            Err(Error::InvalidSignature)
        );

        let mut bytes = SIG_LO;
        bytes[32..].copy_from_slice(&[0xff; 32]);
        assert_eq!(
            CTX.parse_compact_signature(&bytes),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn compact_checks_length() {
        assert_eq!(
            CTX.parse_compact_signature(&SIG_LO[..63]),
            Err(Error::IllegalArgument)
        );
    }

    #[test]
    fn der_round_trip() {
        let sig = CTX.parse_compact_signature(&SIG_LO).unwrap();
        let der = CTX.serialize_der_signature(&sig);
        assert_eq!(der.len(), 70);
        assert_eq!(CTX.parse_der_signature(der.as_ref()).unwrap(), sig);
    }

    #[test]
    fn der_overflowing_integer_reads_as_zero() {
        let sig = CTX.parse_der_signature(&hex!("3006020180020101")).unwrap();
        assert_eq!(sig.scalars(), (Scalar::ZERO, Scalar::ONE));
        assert_eq!(
            CTX.parse_der_signature(&hex!("3006020180020101ff")),
            Err(Error::InvalidSignature)
        );
    }

    prop_compose! {
        fn signature()(r in any::<[u8; 32]>(), s in any::<[u8; 32]>()) -> Signature {
            Signature::from_scalars(
                &Scalar::from_bytes_reduced(&r).0,
                &Scalar::from_bytes_reduced(&s).0,
            )
        }
    }

    proptest! {
        #[test]
        fn codecs_round_trip(sig in signature()) {
            let compact = CTX.serialize_compact_signature(&sig);
            prop_assert_eq!(CTX.parse_compact_signature(&compact).unwrap(), sig);

            let der = CTX.serialize_der_signature(&sig);
            prop_assert_eq!(CTX.parse_der_signature(der.as_ref()).unwrap(), sig);
        }

        #[test]
        fn normalize_is_idempotent(sig in signature()) {
            let (once, _) = CTX.normalize_signature(&sig);
            let (twice, changed) = CTX.normalize_signature(&once);
            prop_assert!(!changed);
            prop_assert_eq!(once, twice);
        }
    }
}
