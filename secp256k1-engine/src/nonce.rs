//! Deterministic nonce generation.
//!
//! Nonces are drawn from an HMAC-SHA256 based deterministic random bit
//! generator as described in [RFC6979 § 3.2], keyed with the secret key, the
//! message digest and optional extra data. Signing the same digest with the
//! same key and no extra data always yields the same nonce, so no external
//! randomness is ever needed.
//!
//! [RFC6979 § 3.2]: https://datatracker.ietf.org/doc/html/rfc6979#section-3

use elliptic_curve::zeroize::Zeroize;
use rfc6979::HmacDrbg;
use sha2::Sha256;

/// Source of per-attempt signing nonces.
///
/// `nonce` receives the 32-byte message digest, the 32-byte secret key, an
/// optional 16-byte algorithm tag, optional 32-byte extra data and the
/// attempt counter. The signer calls it with attempt `0, 1, 2, ...` until the
/// returned nonce produces a valid signature. Returning `None` aborts
/// signing.
///
/// Any closure with the matching signature implements this trait.
pub trait NonceFunction {
    /// Produces the nonce for the given attempt.
    fn nonce(
        &self,
        msg32: &[u8; 32],
        key32: &[u8; 32],
        algo16: Option<&[u8; 16]>,
        data: Option<&[u8; 32]>,
        attempt: u32,
    ) -> Option<[u8; 32]>;
}

impl<F> NonceFunction for F
where
    F: Fn(&[u8; 32], &[u8; 32], Option<&[u8; 16]>, Option<&[u8; 32]>, u32) -> Option<[u8; 32]>,
{
    fn nonce(
        &self,
        msg32: &[u8; 32],
        key32: &[u8; 32],
        algo16: Option<&[u8; 16]>,
        data: Option<&[u8; 32]>,
        attempt: u32,
    ) -> Option<[u8; 32]> {
        self(msg32, key32, algo16, data, attempt)
    }
}

/// The default nonce function: RFC6979 with HMAC-SHA256.
///
/// The generator is seeded with `key32 || msg32 || data || algo16` (absent
/// parts are omitted) and the output for attempt `i` is its `i`-th 32-byte
/// block.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rfc6979;

impl NonceFunction for Rfc6979 {
    fn nonce(
        &self,
        msg32: &[u8; 32],
        key32: &[u8; 32],
        algo16: Option<&[u8; 16]>,
        data: Option<&[u8; 32]>,
        attempt: u32,
    ) -> Option<[u8; 32]> {
        let mut extra = [0u8; 48];
        let mut len = 0;
        for part in [data.map(|d| &d[..]), algo16.map(|a| &a[..])].into_iter().flatten() {
            extra[len..len + part.len()].copy_from_slice(part);
            len += part.len();
        }

        let mut rng = HmacDrbg::<Sha256>::new(key32, msg32, &extra[..len]);
        extra.zeroize();

        let mut nonce = [0u8; 32];
        for _ in 0..=attempt {
            rng.fill_bytes(&mut nonce);
        }
        Some(nonce)
    }
}
