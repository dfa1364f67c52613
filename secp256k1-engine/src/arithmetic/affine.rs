//! Affine points

use super::{FieldElement, FieldStorage, CURVE_EQUATION_B};
use core::ops::Neg;
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, CtOption},
    zeroize::Zeroize,
};

/// secp256k1 curve point expressed in affine coordinates.
///
/// The point at infinity is marked by an explicit flag; its coordinates are
/// meaningless.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: FieldElement,

    /// y-coordinate
    pub(crate) y: FieldElement,

    /// Is this point the point at infinity?
    pub(crate) infinity: bool,
}

impl AffinePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: true,
    };

    /// Base point of secp256k1.
    ///
    /// ```text
    /// Gₓ = 79be667e f9dcbbac 55a06295 ce870b07 029bfcdb 2dce28d9 59f2815b 16f81798
    /// Gᵧ = 483ada77 26a3c465 5da4fbfc 0e1108a8 fd17b448 a6855419 9c47d08f fb10d4b8
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_bytes_unchecked(&[
            0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87,
            0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b,
            0x16, 0xf8, 0x17, 0x98,
        ]),
        y: FieldElement::from_bytes_unchecked(&[
            0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11,
            0x08, 0xa8, 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f,
            0xfb, 0x10, 0xd4, 0xb8,
        ]),
        infinity: false,
    };

    /// Create a finite point from its coordinates. No curve check is made.
    pub const fn from_xy(x: FieldElement, y: FieldElement) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    /// Recovers the point with the given x-coordinate and y parity.
    ///
    /// Returns `None` if `x³ + 7` is not a square. The returned `y` is normalized.
    pub fn decompress(x: &FieldElement, y_is_odd: Choice) -> CtOption<Self> {
        let x = x.normalize();
        let alpha = (x.square() * &x) + &CURVE_EQUATION_B;

        alpha.sqrt().map(|beta| {
            let beta = beta.normalize();
            let y = FieldElement::conditional_select(
                &beta.negate(1).normalize(),
                &beta,
                // beta.is_odd() == y_is_odd
                !(beta.is_odd() ^ y_is_odd),
            );
            Self::from_xy(x, y)
        })
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Checks the curve equation `y² = x³ + 7`. The point at infinity is not valid.
    pub fn is_valid(&self) -> bool {
        if self.infinity {
            return false;
        }
        let y2 = self.y.square();
        let x3 = (self.x.square() * &self.x + &CURVE_EQUATION_B).normalize_weak();
        bool::from((y2.negate(1) + &x3).normalizes_to_zero())
    }

    /// Converts a finite point into its packed storage form.
    pub fn to_storage(&self) -> AffineStorage {
        debug_assert!(!self.infinity);
        AffineStorage {
            x: self.x.normalize().to_storage(),
            y: self.y.normalize().to_storage(),
        }
    }

    /// Loads a finite point from its packed storage form.
    pub const fn from_storage(storage: &AffineStorage) -> Self {
        Self::from_xy(
            FieldElement::from_storage(&storage.x),
            FieldElement::from_storage(&storage.y),
        )
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl Eq for AffinePoint {}

impl Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> Self::Output {
        AffinePoint {
            x: self.x,
            y: self.y.normalize_weak().negate(1),
            infinity: self.infinity,
        }
    }
}

impl Zeroize for AffinePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.infinity = false;
    }
}

/// Packed coordinates of a finite affine point.
///
/// This is the representation held in precomputed tables and inside the
/// opaque public key: `x` then `y`, each as eight little-endian words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AffineStorage {
    pub(crate) x: FieldStorage,
    pub(crate) y: FieldStorage,
}

impl AffineStorage {
    /// Serializes as 64 bytes: `x` words then `y` words, little-endian.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.x.to_le_bytes());
        out[32..].copy_from_slice(&self.y.to_le_bytes());
        out
    }

    /// Inverse of [`AffineStorage::to_bytes`].
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[..32]);
        y.copy_from_slice(&bytes[32..]);
        Self {
            x: FieldStorage::from_le_bytes(&x),
            y: FieldStorage::from_le_bytes(&y),
        }
    }
}

impl ConditionallySelectable for AffineStorage {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldStorage::conditional_select(&a.x, &b.x, choice),
            y: FieldStorage::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl Zeroize for AffineStorage {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
    }
}
