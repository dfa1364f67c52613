//! Jacobian points

#![allow(clippy::op_ref)]

use super::{AffinePoint, FieldElement, CURVE_EQUATION_B_SINGLE};
use alloc::vec::Vec;
use core::ops::{Add, Neg};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable},
    zeroize::Zeroize,
};

/// A point on the secp256k1 curve in Jacobian coordinates.
///
/// `(X, Y, Z)` represents the affine point `(X/Z², Y/Z³)`. The point at
/// infinity is flagged explicitly; no coordinate pattern stands for it.
///
/// Coordinates are kept at small magnitudes between operations rather than
/// normalized: after [`ProjectivePoint::double`] they are at most `(6, 4, 2)`,
/// after the additions at most `(5, 3, 1)`.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) infinity: bool,
}

impl ProjectivePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        z: FieldElement::ZERO,
        infinity: true,
    };

    /// Base point of secp256k1.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
        infinity: false,
    };

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// Returns the affine representation of this point.
    ///
    /// The inversion of `z` runs in constant time.
    pub fn to_affine(&self) -> AffinePoint {
        let zinv = self.z.invert();
        let mut r = self.to_affine_with_zinv(&zinv);
        r.infinity = self.infinity;
        r
    }

    /// Converts to affine given a precomputed `1/z`.
    pub(crate) fn to_affine_with_zinv(&self, zinv: &FieldElement) -> AffinePoint {
        let zinv2 = zinv.square();
        let zinv3 = zinv2 * zinv;
        AffinePoint {
            x: self.x * &zinv2,
            y: self.y * &zinv3,
            infinity: self.infinity,
        }
    }

    /// Converts a slice of points to affine with a single field inversion.
    ///
    /// Points at infinity are skipped during the inversion and come out as
    /// [`AffinePoint::IDENTITY`].
    pub fn batch_to_affine(points: &[Self]) -> Vec<AffinePoint> {
        let mut out = Vec::with_capacity(points.len());

        // Prefix products of the finite z-coordinates.
        let mut acc = FieldElement::ONE;
        let mut prefix = Vec::with_capacity(points.len());
        for p in points {
            prefix.push(acc);
            if !p.infinity {
                acc = acc * &p.z;
            }
        }

        let mut inv = acc.invert();
        let mut zinvs = Vec::with_capacity(points.len());
        zinvs.resize(points.len(), FieldElement::ZERO);
        for (i, p) in points.iter().enumerate().rev() {
            if p.infinity {
                continue;
            }
            zinvs[i] = inv * &prefix[i];
            inv = inv * &p.z;
        }

        for (p, zinv) in points.iter().zip(zinvs.iter()) {
            if p.infinity {
                out.push(AffinePoint::IDENTITY);
            } else {
                out.push(p.to_affine_with_zinv(zinv));
            }
        }
        out
    }

    /// Checks `Y² = X³ + 7·Z⁶`. The point at infinity is not valid.
    pub fn is_valid(&self) -> bool {
        if self.infinity {
            return false;
        }
        let y2 = self.y.square();
        let x3 = self.x.square() * &self.x;
        let z2 = self.z.square();
        let z6 = (z2.square() * &z2).mul_single(CURVE_EQUATION_B_SINGLE);
        let rhs = (x3 + &z6).normalize_weak();
        y2 == rhs
    }

    /// Returns `-self`.
    fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.normalize_weak().negate(1),
            z: self.z,
            infinity: self.infinity,
        }
    }

    /// Returns `2 * self`.
    ///
    /// Doubling never reaches infinity from a finite point on this curve,
    /// since no point has `y = 0`.
    pub fn double(&self) -> Self {
        if self.infinity {
            return Self::IDENTITY;
        }

        let z = (self.z * &self.y).mul_single(2); // Z' = 2*Y*Z (2)
        let t1 = self.x.square().mul_single(3); // T1 = 3*X^2 (3)
        let t2 = t1.square(); // T2 = 9*X^4 (1)
        let t3 = self.y.square().mul_single(2); // T3 = 2*Y^2 (2)
        let t4 = t3.square().mul_single(2); // T4 = 8*Y^4 (2)
        let t3 = t3 * &self.x; // T3 = 2*X*Y^2 (1)

        // X' = 9*X^4 - 8*X*Y^2 (6)
        let x = t3.mul_single(4).negate(4) + &t2;

        // Y' = 36*X^3*Y^2 - 27*X^6 - 8*Y^4 (4)
        let t2 = t2.negate(1);
        let t3 = t3.mul_single(6) + &t2;
        let y = (t1 * &t3) + &t4.negate(2);

        Self {
            x,
            y,
            z,
            infinity: false,
        }
    }

    /// Variable-time addition of two Jacobian points.
    pub fn add_var(&self, other: &Self) -> Self {
        if self.infinity {
            return *other;
        }
        if other.infinity {
            return *self;
        }

        let z22 = other.z.square();
        let z12 = self.z.square();
        let u1 = self.x * &z22;
        let u2 = other.x * &z12;
        let s1 = self.y * &z22 * &other.z;
        let s2 = other.y * &z12 * &self.z;
        let h = u1.negate(1) + &u2;
        let i = s1.negate(1) + &s2;

        if bool::from(h.normalizes_to_zero()) {
            if bool::from(i.normalizes_to_zero()) {
                return self.double();
            }
            return Self::IDENTITY;
        }

        let z = self.z * &other.z * &h;
        self.finish_add(&u1, &s1, &h, &i, z)
    }

    /// Variable-time addition of a Jacobian and an affine point.
    pub fn add_ge_var(&self, other: &AffinePoint) -> Self {
        if self.infinity {
            return Self::from(*other);
        }
        if other.infinity {
            return *self;
        }

        let z12 = self.z.square();
        let u1 = self.x.normalize_weak();
        let u2 = other.x * &z12;
        let s1 = self.y.normalize_weak();
        let s2 = other.y * &z12 * &self.z;
        let h = u1.negate(1) + &u2;
        let i = s1.negate(1) + &s2;

        if bool::from(h.normalizes_to_zero()) {
            if bool::from(i.normalizes_to_zero()) {
                return self.double();
            }
            return Self::IDENTITY;
        }

        let z = self.z * &h;
        self.finish_add(&u1, &s1, &h, &i, z)
    }

    /// Shared tail of the variable-time additions, given `H = U2 - U1` and
    /// `I = S2 - S1`.
    fn finish_add(
        &self,
        u1: &FieldElement,
        s1: &FieldElement,
        h: &FieldElement,
        i: &FieldElement,
        z: FieldElement,
    ) -> Self {
        let i2 = i.square();
        let h2 = h.square();
        let h3 = h * &h2;
        let t = u1 * &h2;

        let x = (t.mul_single(2) + &h3).negate(3) + &i2;
        let y = ((x.negate(5) + &t) * i) + &(h3 * s1).negate(1);

        Self {
            x,
            y,
            z,
            infinity: false,
        }
    }

    /// Constant-time addition of a Jacobian point and a finite affine point.
    ///
    /// Uses the unified addition/doubling law of Brier and Joye, with an
    /// alternate expression for `λ` when `y1 = -y2` but `x1 ≠ x2`. The
    /// running time is independent of both inputs, including whether `self`
    /// is the point at infinity.
    pub fn add_ge(&self, other: &AffinePoint) -> Self {
        debug_assert!(!other.infinity);
        let a_infinity = Choice::from(self.infinity as u8);

        let zz = self.z.square(); // Z1^2
        let u1 = self.x.normalize_weak(); // U1 (1)
        let u2 = other.x * &zz; // U2 = X2*Z1^2 (1)
        let s1 = self.y.normalize_weak(); // S1 (1)
        let s2 = other.y * &zz * &self.z; // S2 = Y2*Z1^3 (1)
        let t = u1 + &u2; // T = U1+U2 (2)
        let m = s1 + &s2; // M = S1+S2 (2)
        let m_alt = u2.negate(1); // -U2 (2)
        let rr = t.square() + &(u1 * &m_alt); // R = T^2-U1*U2 (2)

        // R/M = 0/0 only if y1 = -y2 and x1^3 = x2^3 with x1 != x2.
        let degenerate = m.normalizes_to_zero() & rr.normalizes_to_zero();

        // Alternate lambda = (y1 - y2)/(x1 - x2).
        let rr_alt = s1.mul_single(2); // (2)
        let m_alt = m_alt + &u1; // U1-U2 (3)

        let rr_alt = FieldElement::conditional_select(&rr_alt, &rr, !degenerate);
        let m_alt = FieldElement::conditional_select(&m_alt, &m, !degenerate);

        let n = m_alt.square(); // Malt^2 (1)
        let q = n * &t; // Q = T*Malt^2 (1)

        // M^3*Malt is either Malt^4 or zero.
        let n = n.square();
        let n = FieldElement::conditional_select(&n, &m, degenerate); // (2)

        let t = rr_alt.square(); // Ralt^2 (1)
        let z = self.z * &m_alt; // Malt*Z (1)
        let infinity = z.normalizes_to_zero() & !a_infinity;
        let z = z.mul_single(2); // Z3 = 2*Malt*Z (2)
        let q = q.negate(1); // -Q (2)
        let t = (t + &q).normalize_weak(); // Ralt^2-Q (1)
        let x = t;
        let t = t.mul_single(2) + &q; // 2*x3 - Q (4)
        let t = (t * &rr_alt) + &n; // Ralt*(2*x3 - Q) + M^3*Malt (3)
        let y = t.negate(3).normalize_weak(); // (1)
        let x = x.mul_single(4); // X3 = 4*(Ralt^2-Q) (4)
        let y = y.mul_single(4); // Y3 (4)

        // If self is the point at infinity, the result is (X2, Y2, 1).
        let x = FieldElement::conditional_select(&x, &other.x, a_infinity);
        let y = FieldElement::conditional_select(&y, &other.y, a_infinity);
        let z = FieldElement::conditional_select(&z, &FieldElement::ONE, a_infinity);

        Self {
            x,
            y,
            z,
            infinity: bool::from(infinity),
        }
    }

    /// Multiplies the coordinates by `(s², s³, s)`, which leaves the point
    /// unchanged. `s` must be non-zero.
    pub fn rescale(&self, s: &FieldElement) -> Self {
        debug_assert!(!bool::from(s.normalize().is_zero()));
        let zz = s.square();
        Self {
            x: self.x * &zz,
            y: self.y * &zz * s,
            z: self.z * s,
            infinity: self.infinity,
        }
    }

    /// Checks whether the affine x-coordinate of this finite point equals `x`.
    pub fn eq_x_var(&self, x: &FieldElement) -> bool {
        debug_assert!(!self.infinity);
        let r = self.z.square() * x;
        r == self.x.normalize_weak()
    }
}

impl From<AffinePoint> for ProjectivePoint {
    fn from(p: AffinePoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
            infinity: p.infinity,
        }
    }
}

impl From<&ProjectivePoint> for AffinePoint {
    fn from(p: &ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.to_affine() == other.to_affine()
    }
}

impl Eq for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Zeroize for ProjectivePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
        self.infinity = false;
    }
}

impl Add<&ProjectivePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add_var(self, other)
    }
}

impl Add<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add_var(&self, other)
    }
}

impl Add<&AffinePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &AffinePoint) -> ProjectivePoint {
        ProjectivePoint::add_ge_var(self, other)
    }
}

impl Add<&AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &AffinePoint) -> ProjectivePoint {
        ProjectivePoint::add_ge_var(&self, other)
    }
}

impl Neg for ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(&self)
    }
}

impl<'a> Neg for &'a ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{AffinePoint, ProjectivePoint};
    use crate::{arithmetic::FieldElement, test_vectors::group::ADD_TEST_VECTORS};

    #[test]
    fn affine_to_projective() {
        let basepoint_affine = AffinePoint::GENERATOR;
        let basepoint_projective = ProjectivePoint::GENERATOR;

        assert_eq!(
            ProjectivePoint::from(basepoint_affine),
            basepoint_projective,
        );
        assert_eq!(basepoint_projective.to_affine(), basepoint_affine);
        assert!(basepoint_projective.is_valid());
        assert!(!ProjectivePoint::IDENTITY.is_valid());
        assert!(ProjectivePoint::IDENTITY.to_affine().is_identity());
    }

    #[test]
    fn projective_identity_addition() {
        let identity = ProjectivePoint::IDENTITY;
        let generator = ProjectivePoint::GENERATOR;

        assert_eq!(identity + &generator, generator);
        assert_eq!(generator + &identity, generator);
        assert_eq!(identity.add_ge_var(&AffinePoint::GENERATOR), generator);
        assert_eq!(identity.add_ge(&AffinePoint::GENERATOR), generator);
    }

    #[test]
    fn test_vector_repeated_add() {
        let generator = ProjectivePoint::GENERATOR;
        let mut p = generator;

        for i in 0..ADD_TEST_VECTORS.len() {
            let affine = p.to_affine();
            assert!(affine.is_valid());
            assert!(p.is_valid());

            let (expected_x, expected_y) = ADD_TEST_VECTORS[i];
            assert_eq!(affine.x.to_bytes(), expected_x);
            assert_eq!(affine.y.to_bytes(), expected_y);

            p = p + &generator;
        }
    }

    #[test]
    fn test_vector_repeated_add_mixed() {
        let generator = AffinePoint::GENERATOR;
        let mut p = ProjectivePoint::GENERATOR;

        for i in 0..ADD_TEST_VECTORS.len() {
            let affine = p.to_affine();
            let (expected_x, expected_y) = ADD_TEST_VECTORS[i];
            assert_eq!(affine.x.to_bytes(), expected_x);
            assert_eq!(affine.y.to_bytes(), expected_y);

            p = p + &generator;
        }
    }

    #[test]
    fn test_vector_repeated_add_constant_time() {
        let generator = AffinePoint::GENERATOR;
        let mut p = ProjectivePoint::IDENTITY;

        for i in 0..ADD_TEST_VECTORS.len() {
            p = p.add_ge(&generator);
            let affine = p.to_affine();
            let (expected_x, expected_y) = ADD_TEST_VECTORS[i];
            assert_eq!(affine.x.to_bytes(), expected_x);
            assert_eq!(affine.y.to_bytes(), expected_y);
        }
    }

    #[test]
    fn test_vector_double_generator() {
        let generator = ProjectivePoint::GENERATOR;
        let mut p = generator;

        for i in 0..2 {
            let affine = p.to_affine();
            let (expected_x, expected_y) = ADD_TEST_VECTORS[i];
            assert_eq!(affine.x.to_bytes(), expected_x);
            assert_eq!(affine.y.to_bytes(), expected_y);

            p = p.double();
        }
    }

    #[test]
    fn double_matches_add() {
        let g = ProjectivePoint::GENERATOR;
        let p = g.double().double() + &g;
        assert_eq!(p.double(), p + &p);
        assert_eq!(p.double(), p.add_ge_var(&p.to_affine()));
        assert_eq!(p.double(), p.add_ge(&p.to_affine()));
    }

    #[test]
    fn add_negation_is_identity() {
        let g = ProjectivePoint::GENERATOR.double();
        assert!((g + &(-g)).is_identity());
        assert!(g.add_ge_var(&(-g.to_affine())).is_identity());
        assert!(g.add_ge(&(-g.to_affine())).is_identity());
    }

    #[test]
    fn add_ge_cube_root_of_unity() {
        // beta * x keeps the curve equation, so (beta*x, -y) + (x, y) hits the
        // degenerate branch of the unified formula.
        let beta = FieldElement::from_bytes(&hex_literal::hex!(
            "7ae96a2b657c07106e64479eac3434e99cf0497512f58995c1396c28719501ee"
        ))
        .unwrap();
        let g = AffinePoint::GENERATOR;
        let endo = AffinePoint::from_xy((g.x * &beta).normalize(), g.y.negate(1).normalize());
        assert!(endo.is_valid());

        let expected = ProjectivePoint::from(endo).add_var(&ProjectivePoint::GENERATOR);
        let actual = ProjectivePoint::from(endo).add_ge(&g);
        assert_eq!(actual.to_affine(), expected.to_affine());
        assert!(actual.is_valid());
    }

    #[test]
    fn rescale_keeps_point() {
        let p = ProjectivePoint::GENERATOR.double();
        let s = FieldElement::from_u64(12345);
        assert_eq!(p.rescale(&s), p);
        assert!(p.rescale(&s).is_valid());
    }

    #[test]
    fn eq_x() {
        let p = ProjectivePoint::GENERATOR.double().double();
        let x = p.to_affine().x.normalize();
        assert!(p.eq_x_var(&x));
        assert!(!p.eq_x_var(&(x + &FieldElement::ONE).normalize()));
    }

    #[test]
    fn batch_to_affine() {
        let g = ProjectivePoint::GENERATOR;
        let points = [g, g.double(), ProjectivePoint::IDENTITY, g.double() + &g];
        let affine = ProjectivePoint::batch_to_affine(&points);

        assert_eq!(affine.len(), points.len());
        for (p, a) in points.iter().zip(affine.iter()) {
            assert_eq!(&p.to_affine(), a);
        }
        assert!(affine[2].is_identity());
    }
}
