//! Secret key validation and tweaks.
//!
//! Secret keys are plain 32-byte big-endian scalars owned by the caller. The
//! in-place operations compute into a temporary and only write the result
//! back on success.

use crate::{arithmetic::Scalar, Context, Error, Result};
use elliptic_curve::zeroize::Zeroize;

/// Parses a secret key: a scalar in `[1, n)`.
pub(crate) fn load_secret_key(bytes: &[u8; 32]) -> Result<Scalar> {
    load_nonzero(bytes).ok_or(Error::InvalidSecretKey)
}

/// Parses a tweak: a scalar in `[1, n)`.
pub(crate) fn load_tweak(bytes: &[u8; 32]) -> Result<Scalar> {
    load_nonzero(bytes).ok_or(Error::InvalidTweak)
}

fn load_nonzero(bytes: &[u8; 32]) -> Option<Scalar> {
    let (mut s, overflow) = Scalar::from_bytes_reduced(bytes);
    if bool::from(overflow | s.is_zero()) {
        s.zeroize();
        None
    } else {
        Some(s)
    }
}

impl Context {
    /// Checks that `secret_key` is 32 bytes encoding a scalar in `[1, n)`.
    pub fn verify_secret_key(&self, secret_key: &[u8]) -> Result<()> {
        let secret_key = self.arg_bytes::<32>(secret_key, "seckey length")?;
        load_secret_key(secret_key).map(|mut s| s.zeroize())
    }

    /// Replaces `secret_key` with `n - secret_key`.
    pub fn negate_secret_key(&self, secret_key: &mut [u8]) -> Result<()> {
        self.update_secret_key(secret_key, |sec| Ok(sec.negate()))
    }

    /// Replaces `secret_key` with `secret_key + tweak mod n`.
    ///
    /// Fails with [`Error::InvalidTweak`] if the tweak is zero, not below the
    /// group order, or cancels the key. On failure the key is left
    /// unchanged.
    pub fn secret_key_tweak_add(&self, secret_key: &mut [u8], tweak: &[u8]) -> Result<()> {
        let tweak = self.arg_bytes::<32>(tweak, "tweak length")?;
        self.update_secret_key(secret_key, |sec| {
            let mut term = load_tweak(tweak)?;
            let sum = sec.add(&term);
            term.zeroize();
            if bool::from(sum.is_zero()) {
                return Err(Error::InvalidTweak);
            }
            Ok(sum)
        })
    }

    /// Replaces `secret_key` with `secret_key * tweak mod n`.
    ///
    /// Fails with [`Error::InvalidTweak`] if the tweak is zero or not below
    /// the group order. On failure the key is left unchanged.
    pub fn secret_key_tweak_mul(&self, secret_key: &mut [u8], tweak: &[u8]) -> Result<()> {
        let tweak = self.arg_bytes::<32>(tweak, "tweak length")?;
        self.update_secret_key(secret_key, |sec| {
            let mut factor = load_tweak(tweak)?;
            let product = sec.mul(&factor);
            factor.zeroize();
            Ok(product)
        })
    }

    /// Loads `secret_key`, applies `f` and stores the result in place.
    fn update_secret_key(
        &self,
        secret_key: &mut [u8],
        f: impl FnOnce(&Scalar) -> Result<Scalar>,
    ) -> Result<()> {
        self.arg_check(secret_key.len() == 32, "seckey length")?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(secret_key);

        let sec = load_secret_key(&bytes);
        bytes.zeroize();

        let mut sec = sec?;
        let res = f(&sec);
        sec.zeroize();

        let mut out = res?;
        secret_key.copy_from_slice(&out.to_bytes());
        out.zeroize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Callbacks, Context, Error, Flags};
    use hex_literal::hex;
    use once_cell::sync::Lazy;
    use proptest::prelude::*;

    static CTX: Lazy<Context> =
        Lazy::new(|| Context::with_callbacks(Flags::CONTEXT_SIGN, Callbacks::silent()).unwrap());

    const SECRET: [u8; 32] = hex!("ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f");
    const TWEAK: [u8; 32] = hex!("0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20");
    const ORDER: [u8; 32] = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
    const ORDER_MINUS_ONE: [u8; 32] =
        hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");

    #[test]
    fn verify_boundaries() {
        assert!(CTX.verify_secret_key(&SECRET).is_ok());
        assert!(CTX.verify_secret_key(&ORDER_MINUS_ONE).is_ok());
        assert_eq!(CTX.verify_secret_key(&ORDER), Err(Error::InvalidSecretKey));
        assert_eq!(CTX.verify_secret_key(&[0u8; 32]), Err(Error::InvalidSecretKey));
        assert_eq!(CTX.verify_secret_key(&[1u8; 33]), Err(Error::IllegalArgument));
    }

    #[test]
    fn tweak_add() {
        let mut key = SECRET;
        CTX.secret_key_tweak_add(&mut key, &TWEAK).unwrap();
        assert_eq!(
            key,
            hex!("ecb4c387027d2e911332b78f03cc088bbe9ffd09ecdf199eabf8354179cb5d2f")
        );
    }

    #[test]
    fn tweak_mul() {
        let mut key = SECRET;
        CTX.secret_key_tweak_mul(&mut key, &TWEAK).unwrap();
        assert_eq!(
            key,
            hex!("62815264e7dc741b49b420e5b49c9f9bd047e551eb96749d1ba5e6905e557447")
        );
    }

    #[test]
    fn tweak_add_to_zero_leaves_key_unchanged() {
        let cancel = hex!("144d3f7d0288d876f5d7537d094206830d20f2f0d77f9db52cf4446773890332");
        let mut key = SECRET;
        assert_eq!(
            CTX.secret_key_tweak_add(&mut key, &cancel),
            Err(Error::InvalidTweak)
        );
        assert_eq!(key, SECRET);
    }

    #[test]
    fn invalid_tweaks() {
        let mut key = SECRET;
        for tweak in [[0u8; 32], ORDER] {
            assert_eq!(
                CTX.secret_key_tweak_add(&mut key, &tweak),
                Err(Error::InvalidTweak)
            );
            assert_eq!(
                CTX.secret_key_tweak_mul(&mut key, &tweak),
                Err(Error::InvalidTweak)
            );
        }
        assert_eq!(
            CTX.secret_key_tweak_add(&mut key, &TWEAK[..16]),
            Err(Error::IllegalArgument)
        );
        assert_eq!(key, SECRET);
    }

    #[test]
    fn invalid_key_is_rejected() {
        let mut key = ORDER;
        assert_eq!(
            CTX.secret_key_tweak_add(&mut key, &TWEAK),
            Err(Error::InvalidSecretKey)
        );
        assert_eq!(CTX.negate_secret_key(&mut key), Err(Error::InvalidSecretKey));
        assert_eq!(key, ORDER);

        let mut short = [1u8; 31];
        assert_eq!(CTX.negate_secret_key(&mut short), Err(Error::IllegalArgument));
    }

    #[test]
    fn negate() {
        let mut key = SECRET;
        CTX.negate_secret_key(&mut key).unwrap();
        assert_eq!(
            key,
            hex!("144d3f7d0288d876f5d7537d094206830d20f2f0d77f9db52cf4446773890332")
        );
        CTX.negate_secret_key(&mut key).unwrap();
        assert_eq!(key, SECRET);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Tweaking the secret key and the public key by the same amount
        /// keeps them matched.
        #[test]
        fn tweaks_commute_with_derivation(secret in any::<[u8; 32]>(), tweak in any::<[u8; 32]>()) {
            static FULL: Lazy<Context> = Lazy::new(|| {
                Context::with_callbacks(
                    Flags::CONTEXT_SIGN | Flags::CONTEXT_VERIFY,
                    Callbacks::silent(),
                )
                .unwrap()
            });
            prop_assume!(FULL.verify_secret_key(&secret).is_ok());
            prop_assume!(FULL.verify_secret_key(&tweak).is_ok());

            let mut sec = secret;
            let mut public_key = FULL.create_public_key(&secret).unwrap();
            FULL.secret_key_tweak_mul(&mut sec, &tweak).unwrap();
            FULL.public_key_tweak_mul(&mut public_key, &tweak).unwrap();
            prop_assert_eq!(FULL.create_public_key(&sec).unwrap(), public_key);

            if FULL.secret_key_tweak_add(&mut sec, &tweak).is_ok() {
                FULL.public_key_tweak_add(&mut public_key, &tweak).unwrap();
                prop_assert_eq!(FULL.create_public_key(&sec).unwrap(), public_key);
            }
        }
    }
}
