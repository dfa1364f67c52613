//! Public keys: SEC1 parsing and serialization, derivation, tweaks and
//! combination.

use crate::{
    arithmetic::{AffinePoint, AffineStorage, FieldElement, ProjectivePoint, Scalar},
    secret_key::{load_secret_key, load_tweak},
    Context, Error, Flags, Result,
};
use core::fmt;
use elliptic_curve::{subtle::Choice, zeroize::Zeroize};

/// Tag byte of a compressed point with even `y`.
const TAG_COMPRESSED_EVEN: u8 = 0x02;
/// Tag byte of a compressed point with odd `y`.
const TAG_COMPRESSED_ODD: u8 = 0x03;
/// Tag byte of an uncompressed point.
const TAG_UNCOMPRESSED: u8 = 0x04;
/// Tag bytes of a hybrid point with even and odd `y`.
const TAG_HYBRID_EVEN: u8 = 0x06;
const TAG_HYBRID_ODD: u8 = 0x07;

/// Opaque public key.
///
/// Holds a curve point in its internal 64-byte storage form. This is not a
/// wire format: use [`Context::parse_public_key`] and
/// [`Context::serialize_public_key`] to move keys in and out of the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub(crate) [u8; 64]);

impl PublicKey {
    pub(crate) fn from_point(p: &AffinePoint) -> Self {
        Self(p.to_storage().to_bytes())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// SEC1 encoding of a public key: 33 bytes compressed or 65 bytes
/// uncompressed.
#[derive(Clone, Copy)]
pub struct SerializedPublicKey {
    bytes: [u8; 65],
    len: usize,
}

impl SerializedPublicKey {
    /// Length of the encoding in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: an encoded key has at least a tag byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for SerializedPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl PartialEq for SerializedPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Eq for SerializedPublicKey {}

impl fmt::Debug for SerializedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SerializedPublicKey")
            .field(&self.as_ref())
            .finish()
    }
}

impl Context {
    /// Loads the point held by an opaque public key.
    pub(crate) fn load_public_key(&self, public_key: &PublicKey) -> Result<AffinePoint> {
        let storage = AffineStorage::from_bytes(&public_key.0);
        // An all-zero x never comes out of parsing, so the key was not
        // initialized by this engine.
        self.arg_check(public_key.0[..32].iter().any(|b| *b != 0), "pubkey")?;
        Ok(AffinePoint::from_storage(&storage))
    }

    /// Parses a SEC1 public key.
    ///
    /// Accepts the compressed (`02`/`03`), uncompressed (`04`) and hybrid
    /// (`06`/`07`) encodings. Fails with [`Error::InvalidPublicKey`] if the
    /// encoding is malformed or the point is not on the curve.
    pub fn parse_public_key(&self, input: &[u8]) -> Result<PublicKey> {
        let point = match input {
            [tag @ (TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD), x @ ..] if x.len() == 32 => {
                let x = parse_coordinate(x)?;
                let point = AffinePoint::decompress(&x, Choice::from(*tag & 1));
                Option::<AffinePoint>::from(point).ok_or(Error::InvalidPublicKey)?
            }
            [tag @ (TAG_UNCOMPRESSED | TAG_HYBRID_EVEN | TAG_HYBRID_ODD), xy @ ..]
                if xy.len() == 64 =>
            {
                let x = parse_coordinate(&xy[..32])?;
                let y = parse_coordinate(&xy[32..])?;
                if *tag != TAG_UNCOMPRESSED && bool::from(y.is_odd()) != (*tag == TAG_HYBRID_ODD)
                {
                    return Err(Error::InvalidPublicKey);
                }
                let point = AffinePoint::from_xy(x, y);
                if !point.is_valid() {
                    return Err(Error::InvalidPublicKey);
                }
                point
            }
            _ => return Err(Error::InvalidPublicKey),
        };

        Ok(PublicKey::from_point(&point))
    }

    /// Serializes a public key in the form selected by `flags`, which must be
    /// [`Flags::EC_COMPRESSED`] or [`Flags::EC_UNCOMPRESSED`].
    pub fn serialize_public_key(
        &self,
        public_key: &PublicKey,
        flags: Flags,
    ) -> Result<SerializedPublicKey> {
        self.arg_check(flags.is_compression(), "Invalid flags")?;
        let point = self.load_public_key(public_key)?;

        let x = point.x.to_bytes();
        let y = point.y.normalize();
        let mut bytes = [0u8; 65];
        bytes[1..33].copy_from_slice(&x);

        let len = if flags.compressed() {
            bytes[0] = TAG_COMPRESSED_EVEN | y.is_odd().unwrap_u8();
            33
        } else {
            bytes[0] = TAG_UNCOMPRESSED;
            bytes[33..].copy_from_slice(&y.to_bytes());
            65
        };

        Ok(SerializedPublicKey { bytes, len })
    }

    /// Computes the public key of a 32-byte secret key.
    pub fn create_public_key(&self, secret_key: &[u8]) -> Result<PublicKey> {
        let gen = self.gen_context()?;
        let secret_key = self.arg_bytes::<32>(secret_key, "seckey length")?;

        let mut sec = load_secret_key(secret_key)?;
        let mut point = gen.ecmult_gen(&sec).to_affine();
        sec.zeroize();

        let public_key = PublicKey::from_point(&point);
        point.zeroize();
        Ok(public_key)
    }

    /// Replaces `public_key` with its negation.
    pub fn negate_public_key(&self, public_key: &mut PublicKey) -> Result<()> {
        let point = self.load_public_key(public_key)?;
        *public_key = PublicKey::from_point(&-point);
        Ok(())
    }

    /// Replaces `public_key` with `public_key + tweak*G`.
    ///
    /// The tweak must be a non-zero scalar below the group order. On failure
    /// the key is left unchanged.
    pub fn public_key_tweak_add(&self, public_key: &mut PublicKey, tweak: &[u8]) -> Result<()> {
        let mul = self.mul_context()?;
        let tweak = self.arg_bytes::<32>(tweak, "tweak length")?;
        let term = load_tweak(tweak)?;
        let point = self.load_public_key(public_key)?;

        let sum = mul.ecmult(&ProjectivePoint::from(point), &Scalar::ONE, &term);
        if sum.is_identity() {
            return Err(Error::InvalidTweak);
        }

        *public_key = PublicKey::from_point(&sum.to_affine());
        Ok(())
    }

    /// Replaces `public_key` with `tweak*public_key`.
    ///
    /// The tweak must be a non-zero scalar below the group order. On failure
    /// the key is left unchanged.
    pub fn public_key_tweak_mul(&self, public_key: &mut PublicKey, tweak: &[u8]) -> Result<()> {
        let mul = self.mul_context()?;
        let tweak = self.arg_bytes::<32>(tweak, "tweak length")?;
        let factor = load_tweak(tweak)?;
        let point = self.load_public_key(public_key)?;

        let product = mul.ecmult(&ProjectivePoint::from(point), &factor, &Scalar::ZERO);
        if product.is_identity() {
            return Err(self.internal_error("tweaked public key is infinity"));
        }

        *public_key = PublicKey::from_point(&product.to_affine());
        Ok(())
    }

    /// Adds up one or more public keys.
    ///
    /// Fails with [`Error::PointAtInfinity`] if the keys sum to the point at
    /// infinity.
    pub fn combine_public_keys(&self, public_keys: &[&PublicKey]) -> Result<PublicKey> {
        self.arg_check(!public_keys.is_empty(), "n >= 1")?;

        let mut sum = ProjectivePoint::IDENTITY;
        for public_key in public_keys {
            sum = sum.add_ge(&self.load_public_key(public_key)?);
        }

        if sum.is_identity() {
            return Err(Error::PointAtInfinity);
        }
        Ok(PublicKey::from_point(&sum.to_affine()))
    }
}

fn parse_coordinate(bytes: &[u8]) -> Result<FieldElement> {
    let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidPublicKey)?;
    Option::from(FieldElement::from_bytes(bytes)).ok_or(Error::InvalidPublicKey)
}
