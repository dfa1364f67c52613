//! ECDSA verification.

use super::{r_candidates, Signature};
use crate::{
    arithmetic::{AffinePoint, MulContext, ProjectivePoint, Scalar},
    Context, PublicKey, Result,
};

impl Context {
    /// Verifies a signature over a 32-byte message digest.
    ///
    /// Returns `Ok(false)` for a well-formed but invalid signature, including
    /// any signature with a high `s`: pass it through
    /// [`Context::normalize_signature`] first to accept those.
    ///
    /// Requires a context built with [`Flags::CONTEXT_VERIFY`].
    ///
    /// [`Flags::CONTEXT_VERIFY`]: crate::Flags::CONTEXT_VERIFY
    pub fn verify(
        &self,
        signature: &Signature,
        msg32: &[u8],
        public_key: &PublicKey,
    ) -> Result<bool> {
        let mul = self.mul_context()?;
        let msg32 = self.arg_bytes::<32>(msg32, "msg32 length")?;

        let (r, s) = signature.scalars();
        if bool::from(s.is_high()) {
            return Ok(false);
        }

        let q = self.load_public_key(public_key)?;
        let msg = Scalar::from_bytes_reduced(msg32).0;
        Ok(verify_prehashed(mul, &r, &s, &q, &msg))
    }
}

/// Checks `x(s⁻¹·m·G + s⁻¹·r·Q) mod n == r`.
#[allow(clippy::many_single_char_names)]
fn verify_prehashed(
    mul: &MulContext,
    r: &Scalar,
    s: &Scalar,
    q: &AffinePoint,
    msg: &Scalar,
) -> bool {
    if bool::from(r.is_zero() | s.is_zero()) {
        return false;
    }

    let s_inv = s.invert();
    let u1 = msg.mul(&s_inv);
    let u2 = r.mul(&s_inv);
    let pr = mul.ecmult(&ProjectivePoint::from(*q), &u2, &u1);
    if pr.is_identity() {
        return false;
    }

    // Compare in the field, skipping the inversion of z. The x-coordinate
    // may be r or, if small enough, r + n.
    let (xr, wrapped) = r_candidates(r);
    pr.eq_x_var(&xr) || wrapped.map_or(false, |xr| pr.eq_x_var(&xr))
}
