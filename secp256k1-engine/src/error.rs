//! Error types.

use core::fmt;

/// Result type with the engine's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Engine errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Caller misuse: wrong flags, missing context capability, bad recovery
    /// id and similar. Always preceded by a call to the context's
    /// illegal-argument callback.
    IllegalArgument,

    /// Secret key is zero or not below the group order.
    InvalidSecretKey,

    /// Public key encoding is malformed or the point is not on the curve.
    InvalidPublicKey,

    /// Signature encoding is malformed or a component is out of range.
    InvalidSignature,

    /// Tweak is zero, out of range, or produced a degenerate key.
    InvalidTweak,

    /// The nonce function refused to produce a nonce.
    NonceGeneration,

    /// A point-valued result is the point at infinity.
    PointAtInfinity,

    /// An internal invariant did not hold. Always preceded by a call to the
    /// context's error callback.
    Internal,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IllegalArgument => f.write_str("illegal argument"),
            Error::InvalidSecretKey => f.write_str("invalid secret key"),
            Error::InvalidPublicKey => f.write_str("invalid public key"),
            Error::InvalidSignature => f.write_str("invalid signature"),
            Error::InvalidTweak => f.write_str("invalid tweak"),
            Error::NonceGeneration => f.write_str("nonce generation failed"),
            Error::PointAtInfinity => f.write_str("point at infinity"),
            Error::Internal => f.write_str("internal consistency check failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
