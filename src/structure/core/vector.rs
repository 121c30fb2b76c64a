/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use std::ops::{Add, Sub, Neg, Mul, Div, AddAssign, SubAssign, Index, IndexMut};

/// A cartesian or fractional 3-vector.
///
/// Deliberately tiny; the pair traversal only ever needs differences,
/// norms and products with a lattice matrix.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct V3(pub [f64; 3]);

/// A 3x3 matrix stored as rows.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct M33(pub [V3; 3]);

#[inline]
pub fn dot(a: &V3, b: &V3) -> f64
{ a.0[0] * b.0[0] + a.0[1] * b.0[1] + a.0[2] * b.0[2] }

impl V3 {
    #[inline]
    pub fn zero() -> Self { V3([0.0; 3]) }

    #[inline]
    pub fn sqnorm(&self) -> f64 { dot(self, self) }

    #[inline]
    pub fn norm(&self) -> f64 { self.sqnorm().sqrt() }

    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> V3
    { V3([f(self.0[0]), f(self.0[1]), f(self.0[2])]) }

    #[inline]
    pub fn cross(&self, other: &V3) -> V3 {
        let [a0, a1, a2] = self.0;
        let [b0, b1, b2] = other.0;
        V3([
            a1 * b2 - a2 * b1,
            a2 * b0 - a0 * b2,
            a0 * b1 - a1 * b0,
        ])
    }

    /// Row-vector times matrix, i.e. a linear combination of the matrix rows.
    #[inline]
    pub fn dot_mat(&self, m: &M33) -> V3 {
        let M33([r0, r1, r2]) = *m;
        r0 * self.0[0] + r1 * self.0[1] + r2 * self.0[2]
    }
}

impl From<[f64; 3]> for V3 {
    #[inline(always)]
    fn from(x: [f64; 3]) -> V3 { V3(x) }
}

impl Index<usize> for V3 {
    type Output = f64;

    #[inline(always)]
    fn index(&self, i: usize) -> &f64 { &self.0[i] }
}

impl IndexMut<usize> for V3 {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut f64 { &mut self.0[i] }
}

macro_rules! impl_elementwise {
    ($Trait:ident, $method:ident, $op:tt) => {
        impl $Trait<V3> for V3 {
            type Output = V3;

            #[inline]
            fn $method(self, other: V3) -> V3 {
                V3([self.0[0] $op other.0[0], self.0[1] $op other.0[1], self.0[2] $op other.0[2]])
            }
        }
    };
}

impl_elementwise!(Add, add, +);
impl_elementwise!(Sub, sub, -);

impl AddAssign<V3> for V3 {
    #[inline]
    fn add_assign(&mut self, other: V3) { *self = *self + other; }
}

impl SubAssign<V3> for V3 {
    #[inline]
    fn sub_assign(&mut self, other: V3) { *self = *self - other; }
}

impl Neg for V3 {
    type Output = V3;

    #[inline]
    fn neg(self) -> V3 { self.map(|x| -x) }
}

impl Mul<f64> for V3 {
    type Output = V3;

    #[inline]
    fn mul(self, s: f64) -> V3 { self.map(|x| x * s) }
}

impl Div<f64> for V3 {
    type Output = V3;

    #[inline]
    fn div(self, s: f64) -> V3 { self.map(|x| x / s) }
}

impl M33 {
    #[inline]
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self
    { M33([V3(rows[0]), V3(rows[1]), V3(rows[2])]) }

    pub fn det(&self) -> f64 {
        let M33([a, b, c]) = *self;
        dot(&a, &b.cross(&c))
    }

    /// Inverse by cofactors.
    ///
    /// Returns `None` for a (numerically) singular matrix.
    pub fn inverse(&self) -> Option<M33> {
        let M33([a, b, c]) = *self;
        let det = self.det();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        // columns of the inverse are the cross products of pairs of rows
        let (x, y, z) = (b.cross(&c) / det, c.cross(&a) / det, a.cross(&b) / det);
        Some(M33([
            V3([x[0], y[0], z[0]]),
            V3([x[1], y[1], z[1]]),
            V3([x[2], y[2], z[2]]),
        ]))
    }
}
