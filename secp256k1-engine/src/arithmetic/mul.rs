//! Multiplication of arbitrary points: `na*A + ng*G`.
//!
//! Both scalars are recoded in width-w non-adjacent form and processed in a
//! single double-and-add pass (Strauss' algorithm). Odd multiples of `A` are
//! computed per call; odd multiples of `G` come from a table built once per
//! context.
//!
//! This path is variable time and must only see public inputs.

use crate::arithmetic::{AffinePoint, AffineStorage, ProjectivePoint, Scalar};
use alloc::vec::Vec;

/// Window size for the per-call table of odd multiples of `A`.
const WINDOW_A: usize = 5;

/// Window size for the precomputed table of odd multiples of `G`.
const WINDOW_G: usize = 16;

/// Number of entries in a table of odd multiples for window `w`.
const fn table_size(w: usize) -> usize {
    1 << (w - 2)
}

/// Precomputed odd multiples `[G, 3G, 5G, ..., (2^15 - 1)G]`.
#[derive(Clone)]
pub struct MulContext {
    pre_g: Vec<AffineStorage>,
}

impl MulContext {
    /// Builds the table of odd multiples of the generator.
    pub fn new() -> Self {
        let table = odd_multiples(&ProjectivePoint::GENERATOR, table_size(WINDOW_G));
        Self {
            pre_g: table.iter().map(AffinePoint::to_storage).collect(),
        }
    }

    /// Computes `na*a + ng*G`.
    pub fn ecmult(&self, a: &ProjectivePoint, na: &Scalar, ng: &Scalar) -> ProjectivePoint {
        let mut wnaf_na = [0i32; 256];
        let mut bits_na = 0;
        let mut pre_a = Vec::new();

        if !a.is_identity() && !bool::from(na.is_zero()) {
            bits_na = wnaf(&mut wnaf_na, na, WINDOW_A);
            pre_a = odd_multiples(a, table_size(WINDOW_A));
        }

        let mut wnaf_ng = [0i32; 256];
        let bits_ng = wnaf(&mut wnaf_ng, ng, WINDOW_G);

        let bits = bits_na.max(bits_ng);
        let mut r = ProjectivePoint::IDENTITY;

        for i in (0..bits).rev() {
            r = r.double();

            let n = wnaf_na[i];
            if i < bits_na && n != 0 {
                r = r.add_ge_var(&table_get(&pre_a, n));
            }

            let n = wnaf_ng[i];
            if i < bits_ng && n != 0 {
                r = r.add_ge_var(&self.table_get_g(n));
            }
        }

        r
    }

    /// Looks up `n*G` for odd `n` in the generator table.
    fn table_get_g(&self, n: i32) -> AffinePoint {
        debug_assert!(n & 1 == 1);
        let idx = (n.unsigned_abs() as usize - 1) / 2;
        let p = AffinePoint::from_storage(&self.pre_g[idx]);
        if n > 0 {
            p
        } else {
            -p
        }
    }
}

impl Default for MulContext {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MulContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MulContext")
            .field("pre_g", &self.pre_g.len())
            .finish()
    }
}

/// Computes `[a, 3a, 5a, ..., (2n - 1)a]` in affine form.
fn odd_multiples(a: &ProjectivePoint, n: usize) -> Vec<AffinePoint> {
    let d = a.double().to_affine();
    let mut points = Vec::with_capacity(n);
    let mut p = *a;
    points.push(p);
    for _ in 1..n {
        p = p.add_ge_var(&d);
        points.push(p);
    }
    ProjectivePoint::batch_to_affine(&points)
}

fn table_get(table: &[AffinePoint], n: i32) -> AffinePoint {
    debug_assert!(n & 1 == 1);
    let p = table[(n.unsigned_abs() as usize - 1) / 2];
    if n > 0 {
        p
    } else {
        -p
    }
}

/// Converts `s` to width-`w` non-adjacent form.
///
/// Every non-zero digit is odd and lies in `(-2^(w-1), 2^(w-1))`, and any two
/// non-zero digits are at least `w` positions apart. Returns one more than
/// the index of the highest non-zero digit, or zero for a zero scalar.
fn wnaf(out: &mut [i32; 256], s: &Scalar, w: usize) -> usize {
    debug_assert!((2..=31).contains(&w));
    out.iter_mut().for_each(|d| *d = 0);

    // Work on whichever of s, -s is below 2^255 so no carry escapes the top.
    let mut s = *s;
    let mut sign = 1;
    if s.get_bits(255, 1) != 0 {
        s = s.negate();
        sign = -1;
    }

    let mut last_set_bit = None;
    let mut carry = 0;
    let mut bit = 0;
    while bit < 256 {
        if s.get_bits(bit, 1) == carry as u32 {
            bit += 1;
            continue;
        }

        let now = w.min(256 - bit);
        let mut word = s.get_bits_var(bit, now) as i32 + carry;
        carry = (word >> (w - 1)) & 1;
        word -= carry << w;

        out[bit] = sign * word;
        last_set_bit = Some(bit);
        bit += now;
    }
    debug_assert!(carry == 0);

    last_set_bit.map_or(0, |b| b + 1)
}
