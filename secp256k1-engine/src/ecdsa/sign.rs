//! ECDSA signing.

use super::Signature;
use crate::{
    arithmetic::{GenContext, Scalar},
    nonce::{NonceFunction, Rfc6979},
    secret_key::load_secret_key,
    Context, Error, Result,
};
use elliptic_curve::zeroize::Zeroize;

impl Context {
    /// Signs a 32-byte message digest with a 32-byte secret key.
    ///
    /// The nonce comes from `noncefp`, or from [`Rfc6979`] if `None`;
    /// `noncedata` is passed through to it as extra entropy. The signature
    /// is always in low-S form.
    ///
    /// Requires a context built with [`Flags::CONTEXT_SIGN`].
    ///
    /// [`Flags::CONTEXT_SIGN`]: crate::Flags::CONTEXT_SIGN
    pub fn sign(
        &self,
        msg32: &[u8],
        secret_key: &[u8],
        noncefp: Option<&dyn NonceFunction>,
        noncedata: Option<&[u8; 32]>,
    ) -> Result<Signature> {
        let (signature, _) = self.sign_with_recid(msg32, secret_key, noncefp, noncedata)?;
        Ok(signature)
    }

    /// Signs, also returning the recovery id of the signature.
    pub(crate) fn sign_with_recid(
        &self,
        msg32: &[u8],
        secret_key: &[u8],
        noncefp: Option<&dyn NonceFunction>,
        noncedata: Option<&[u8; 32]>,
    ) -> Result<(Signature, u8)> {
        let gen = self.gen_context()?;
        let msg32 = self.arg_bytes::<32>(msg32, "msg32 length")?;
        let secret_key = self.arg_bytes::<32>(secret_key, "seckey length")?;
        let noncefp = noncefp.unwrap_or(&Rfc6979);

        let mut sec = load_secret_key(secret_key)?;
        let msg = Scalar::from_bytes_reduced(msg32).0;

        let mut attempt = 0u32;
        let res = loop {
            let mut nonce32 = match noncefp.nonce(msg32, secret_key, None, noncedata, attempt) {
                Some(nonce32) => nonce32,
                None => break Err(Error::NonceGeneration),
            };
            let (mut k, overflow) = Scalar::from_bytes_reduced(&nonce32);
            nonce32.zeroize();

            let sig = if bool::from(overflow | k.is_zero()) {
                None
            } else {
                sign_prehashed(gen, &sec, &msg, &k)
            };
            k.zeroize();

            if let Some((r, s, recid)) = sig {
                break Ok((Signature::from_scalars(&r, &s), recid));
            }

            attempt = match attempt.checked_add(1) {
                Some(attempt) => attempt,
                None => break Err(Error::NonceGeneration),
            };
        };

        sec.zeroize();
        res
    }
}

/// Computes `(r, s, recid)` for secret key `sec`, message scalar `msg` and
/// non-zero nonce `k`. The returned `s` is low.
///
/// Returns `None` if `r` or `s` comes out zero, in which case the caller
/// must retry with another nonce.
fn sign_prehashed(
    gen: &GenContext,
    sec: &Scalar,
    msg: &Scalar,
    k: &Scalar,
) -> Option<(Scalar, Scalar, u8)> {
    let mut rp = gen.ecmult_gen(k).to_affine();
    let mut x = rp.x.to_bytes();
    let (r, overflow) = Scalar::from_bytes_reduced(&x);
    let mut recid = (overflow.unwrap_u8() << 1) | rp.y.normalize().is_odd().unwrap_u8();
    rp.zeroize();
    x.zeroize();

    // s = k⁻¹(m + r·d)
    let mut n = r.mul(sec).add(msg);
    let mut s = k.invert().mul(&n);
    n.zeroize();

    if bool::from(r.is_zero() | s.is_zero()) {
        s.zeroize();
        return None;
    }

    let high = s.is_high();
    s = s.conditional_negate(high);
    recid ^= high.unwrap_u8();
    Some((r, s, recid))
}

#[cfg(test)]
mod tests {
    use crate::{
        test_vectors::ecdsa::{ECDSA_TEST_VECTORS, RFC6979_TEST_VECTORS},
        Callbacks, Context, Error, Flags, NonceFunction, Rfc6979,
    };
    use core::cell::Cell;
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

    fn compact(ctx: &Context, r: &[u8; 32], s: &[u8; 32]) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(r);
        bytes[32..].copy_from_slice(s);
        ctx.serialize_compact_signature(&ctx.parse_compact_signature(&bytes).unwrap())
    }

    #[test]
    fn rfc6979_vectors() {
        for vector in RFC6979_TEST_VECTORS {
            let sig = CTX.sign(&vector.m, &vector.d, None, None).unwrap();
            assert_eq!(
                CTX.serialize_compact_signature(&sig),
                compact(&CTX, &vector.r, &vector.s)
            );
            assert_eq!(
                Rfc6979.nonce(&vector.m, &vector.d, None, None, 0),
                Some(vector.k)
            );
        }
    }

    #[test]
    fn fixed_nonce_vectors() {
        for vector in ECDSA_TEST_VECTORS.iter().chain(RFC6979_TEST_VECTORS) {
            let k = vector.k;
            let fixed = move |_: &[u8; 32], _: &[u8; 32], _: Option<&[u8; 16]>, _: Option<&[u8; 32]>, _: u32| {
                Some(k)
            };
            let (sig, recid) = CTX
                .sign_with_recid(&vector.m, &vector.d, Some(&fixed), None)
                .unwrap();
            assert_eq!(
                CTX.serialize_compact_signature(&sig),
                compact(&CTX, &vector.r, &vector.s)
            );
            assert_eq!(recid, vector.recid);
        }
    }

    #[test]
    fn extra_entropy() {
        let vector = &RFC6979_TEST_VECTORS[1];
        let data = [0x11u8; 32];
        let sig = CTX.sign(&vector.m, &vector.d, None, Some(&data)).unwrap();
        assert_eq!(
            CTX.serialize_compact_signature(&sig),
            hex!(
                "7d253919426f679f4529668d3771b36906c824744a6086a8a21245618756794f"
                "00e9af292be7ece81dd48e70ad8f9e3aad6eaab2f9d108d9ba7773f819aaf32b"
            )
        );
    }

    #[test]
    fn deterministic() {
        let vector = &RFC6979_TEST_VECTORS[0];
        let a = CTX.sign(&vector.m, &vector.d, None, None).unwrap();
        let b = CTX.sign(&vector.m, &vector.d, None, None).unwrap();
        assert_eq!(a, b);

        let mut ctx = CTX.clone();
        ctx.randomize(Some(&[0x33; 32])).unwrap();
        assert_eq!(ctx.sign(&vector.m, &vector.d, None, None).unwrap(), a);
    }

    #[test]
    fn retries_invalid_nonces() {
        let vector = &ECDSA_TEST_VECTORS[0];
        let attempts = Cell::new(0);
        let nonces = |_: &[u8; 32], _: &[u8; 32], _: Option<&[u8; 16]>, _: Option<&[u8; 32]>, i: u32| {
            attempts.set(i + 1);
            match i {
                // zero, then the group order: both unusable
                0 => Some([0u8; 32]),
                1 => Some(hex!(
                    "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
                )),
                _ => Some(vector.k),
            }
        };
        let sig = CTX.sign(&vector.m, &vector.d, Some(&nonces), None).unwrap();
        assert_eq!(attempts.get(), 3);
        assert_eq!(
            CTX.serialize_compact_signature(&sig),
            compact(&CTX, &vector.r, &vector.s)
        );
    }

    #[test]
    fn failing_nonce_function() {
        let vector = &ECDSA_TEST_VECTORS[0];
        let refuse = |_: &[u8; 32],
                      _: &[u8; 32],
                      _: Option<&[u8; 16]>,
                      _: Option<&[u8; 32]>,
                      _: u32|
         -> Option<[u8; 32]> { None };
        assert_eq!(
            CTX.sign(&vector.m, &vector.d, Some(&refuse), None),
            Err(Error::NonceGeneration)
        );
    }

    #[test]
    fn rejects_invalid_secret_key() {
        let msg = [0x42u8; 32];
        assert_eq!(CTX.sign(&msg, &[0u8; 32], None, None), Err(Error::InvalidSecretKey));
        let order = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        assert_eq!(CTX.sign(&msg, &order, None, None), Err(Error::InvalidSecretKey));
    }

    #[test]
    fn checks_arguments() {
        let vector = &ECDSA_TEST_VECTORS[0];
        assert_eq!(
            CTX.sign(&vector.m[..31], &vector.d, None, None),
            Err(Error::IllegalArgument)
        );
        assert_eq!(
            CTX.sign(&vector.m, &vector.d[..31], None, None),
            Err(Error::IllegalArgument)
        );

        let verify_only =
            Context::with_callbacks(Flags::CONTEXT_VERIFY, Callbacks::silent()).unwrap();
        assert_eq!(
            verify_only.sign(&vector.m, &vector.d, None, None),
            Err(Error::IllegalArgument)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn signatures_are_low_s(d in any::<[u8; 32]>(), m in any::<[u8; 32]>()) {
            prop_assume!(CTX.verify_secret_key(&d).is_ok());
            let sig = CTX.sign(&m, &d, None, None).unwrap();
            let (_, changed) = CTX.normalize_signature(&sig);
            prop_assert!(!changed);
        }
    }
}
