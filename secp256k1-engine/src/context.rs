//! Engine context: precomputed tables, blinding state and diagnostics.

use crate::{
    arithmetic::{GenContext, MulContext},
    Error, Result,
};
use alloc::sync::Arc;
use core::{fmt, ops::BitOr};
use elliptic_curve::rand_core::CryptoRngCore;
use elliptic_curve::zeroize::Zeroize;

/// Capability and serialization flags.
///
/// The low byte holds the flag type; the bits above it hold the options for
/// that type. Flags of the same type combine with `|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    const TYPE_MASK: u32 = (1 << 8) - 1;
    const TYPE_CONTEXT: u32 = 1 << 0;
    const TYPE_COMPRESSION: u32 = 1 << 1;

    const BIT_CONTEXT_VERIFY: u32 = 1 << 8;
    const BIT_CONTEXT_SIGN: u32 = 1 << 9;
    const BIT_COMPRESSION: u32 = 1 << 8;

    /// Context with neither signing nor verification tables.
    pub const CONTEXT_NONE: Self = Self(Self::TYPE_CONTEXT);

    /// Context able to verify signatures and tweak public keys.
    pub const CONTEXT_VERIFY: Self = Self(Self::TYPE_CONTEXT | Self::BIT_CONTEXT_VERIFY);

    /// Context able to sign and derive public keys.
    pub const CONTEXT_SIGN: Self = Self(Self::TYPE_CONTEXT | Self::BIT_CONTEXT_SIGN);

    /// Serialize public keys in 33-byte compressed form.
    pub const EC_COMPRESSED: Self = Self(Self::TYPE_COMPRESSION | Self::BIT_COMPRESSION);

    /// Serialize public keys in 65-byte uncompressed form.
    pub const EC_UNCOMPRESSED: Self = Self(Self::TYPE_COMPRESSION);

    /// Creates flags from their raw bit representation.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub(crate) const fn is_context(self) -> bool {
        self.0 & Self::TYPE_MASK == Self::TYPE_CONTEXT
    }

    pub(crate) const fn is_compression(self) -> bool {
        self.0 & Self::TYPE_MASK == Self::TYPE_COMPRESSION
    }

    pub(crate) const fn sign(self) -> bool {
        self.0 & Self::BIT_CONTEXT_SIGN != 0
    }

    pub(crate) const fn verify(self) -> bool {
        self.0 & Self::BIT_CONTEXT_VERIFY != 0
    }

    pub(crate) const fn compressed(self) -> bool {
        self.0 & Self::BIT_COMPRESSION != 0
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Diagnostic callback invoked with a short description of the failed check.
pub type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// The illegal-argument and internal-error handlers of a [`Context`].
///
/// Handlers only observe failures; the operation that triggered them still
/// returns its error afterwards. The default handlers panic.
#[derive(Clone)]
pub struct Callbacks {
    illegal: Callback,
    error: Callback,
}

impl Callbacks {
    /// Creates a set of handlers.
    pub fn new(
        illegal: impl Fn(&str) + Send + Sync + 'static,
        error: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            illegal: Arc::new(illegal),
            error: Arc::new(error),
        }
    }

    /// Handlers that ignore every report.
    pub fn silent() -> Self {
        Self::new(|_| {}, |_| {})
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        Self::new(default_illegal_callback, default_error_callback)
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

#[allow(clippy::panic)]
fn default_illegal_callback(msg: &str) {
    panic!("[libsecp256k1] illegal argument: {msg}");
}

#[allow(clippy::panic)]
fn default_error_callback(msg: &str) {
    panic!("[libsecp256k1] internal consistency check failed: {msg}");
}

/// Entry point of the engine.
///
/// A context owns the precomputed tables selected by its [`Flags`]: the
/// blinded generator table for signing and key derivation, and the odd
/// multiples of `G` for verification, public key tweaks and recovery.
/// Building them is expensive; create one context and share it.
///
/// All operations take `&self` and may run concurrently, except
/// [`Context::randomize`] and the callback setters, which need `&mut self`.
/// Cloning deep-copies the tables and shares the callbacks. Dropping a
/// context wipes its blinding state.
#[derive(Clone, Debug)]
pub struct Context {
    gen: Option<GenContext>,
    mul: Option<MulContext>,
    callbacks: Callbacks,
}

impl Context {
    /// Creates a context with the capabilities selected by `flags`.
    ///
    /// `flags` must be a combination of [`Flags::CONTEXT_NONE`],
    /// [`Flags::CONTEXT_SIGN`] and [`Flags::CONTEXT_VERIFY`].
    pub fn new(flags: Flags) -> Result<Self> {
        Self::with_callbacks(flags, Callbacks::default())
    }

    /// Creates a context reporting diagnostics to `callbacks`.
    pub fn with_callbacks(flags: Flags, callbacks: Callbacks) -> Result<Self> {
        if !flags.is_context() {
            (callbacks.illegal)("Invalid flags");
            return Err(Error::IllegalArgument);
        }

        Ok(Self {
            gen: flags.sign().then(GenContext::new),
            mul: flags.verify().then(MulContext::new),
            callbacks,
        })
    }

    /// Can this context sign and derive public keys?
    pub fn can_sign(&self) -> bool {
        self.gen.is_some()
    }

    /// Can this context verify and tweak public keys?
    pub fn can_verify(&self) -> bool {
        self.mul.is_some()
    }

    /// Replaces the illegal-argument handler.
    pub fn set_illegal_callback(&mut self, f: impl Fn(&str) + Send + Sync + 'static) {
        self.callbacks.illegal = Arc::new(f);
    }

    /// Replaces the internal-error handler.
    pub fn set_error_callback(&mut self, f: impl Fn(&str) + Send + Sync + 'static) {
        self.callbacks.error = Arc::new(f);
    }

    /// Restores the default (panicking) handlers.
    pub fn reset_callbacks(&mut self) {
        self.callbacks = Callbacks::default();
    }

    /// Refreshes the blinding of the generator multiplication.
    ///
    /// `Some(seed)` mixes 32 bytes of fresh randomness into the blinding
    /// value; `None` resets it to the state of a freshly created context.
    /// Results of every operation are unaffected. Should be called after
    /// creating or cloning a signing context, and may be called any number
    /// of times afterwards.
    pub fn randomize(&mut self, seed: Option<&[u8; 32]>) -> Result<()> {
        match self.gen.as_mut() {
            Some(gen) => {
                gen.blind(seed);
                Ok(())
            }
            None => {
                (self.callbacks.illegal)("context not built for signing");
                Err(Error::IllegalArgument)
            }
        }
    }

    /// [`Context::randomize`] with a seed drawn from `rng`.
    pub fn randomize_with_rng(&mut self, rng: &mut impl CryptoRngCore) -> Result<()> {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let res = self.randomize(Some(&seed));
        seed.zeroize();
        res
    }

    /// Reports an illegal argument unless `cond` holds.
    pub(crate) fn arg_check(&self, cond: bool, msg: &str) -> Result<()> {
        if cond {
            Ok(())
        } else {
            (self.callbacks.illegal)(msg);
            Err(Error::IllegalArgument)
        }
    }

    /// Reports a violated internal invariant.
    pub(crate) fn internal_error(&self, msg: &str) -> Error {
        (self.callbacks.error)(msg);
        Error::Internal
    }

    /// Checks that `buf` is exactly `N` bytes long and borrows it as an array.
    pub(crate) fn arg_bytes<'a, const N: usize>(
        &self,
        buf: &'a [u8],
        msg: &str,
    ) -> Result<&'a [u8; N]> {
        match buf.try_into() {
            Ok(array) => Ok(array),
            Err(_) => {
                (self.callbacks.illegal)(msg);
                Err(Error::IllegalArgument)
            }
        }
    }

    pub(crate) fn gen_context(&self) -> Result<&GenContext> {
        match &self.gen {
            Some(gen) => Ok(gen),
            None => {
                (self.callbacks.illegal)("context not built for signing");
                Err(Error::IllegalArgument)
            }
        }
    }

    pub(crate) fn mul_context(&self) -> Result<&MulContext> {
        match &self.mul {
            Some(mul) => Ok(mul),
            None => {
                (self.callbacks.illegal)("context not built for verification");
                Err(Error::IllegalArgument)
            }
        }
    }
}
