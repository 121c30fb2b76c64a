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

use crate::core::vector::{V3, M33};
use crate::FailResult;

use std::sync::Arc;

/// Defines a vector basis for periodic boundary conditions in three dimensions.
///
/// A linear transformation between "fractional" data and "cartesian" data,
/// with the lattice vectors as the rows of the matrix.
#[derive(Debug, Clone)]
pub struct Lattice {
    matrix: Arc<M33>,
    inverse: Arc<M33>,
}

// Manual impl that doesn't compare the inverse.
impl PartialEq<Lattice> for Lattice {
    fn eq(&self, other: &Lattice) -> bool {
        // deconstruct to get errors when new fields are added
        let Lattice { ref matrix, inverse: _ } = *self;
        matrix == &other.matrix
    }
}

impl Lattice {
    /// Create a lattice from a matrix where the rows are lattice vectors.
    pub fn new(matrix: &M33) -> FailResult<Self> {
        let inverse = match matrix.inverse() {
            Some(inverse) => inverse,
            None => bail!("lattice matrix is singular: {:?}", matrix),
        };
        Ok(Lattice { matrix: Arc::new(*matrix), inverse: Arc::new(inverse) })
    }

    /// A cubic lattice ((a, a, a), (90, 90, 90))
    pub fn cubic(a: f64) -> FailResult<Self> { Self::orthorhombic(a, a, a) }

    /// An orthorhombic lattice ((a, b, c), (90, 90, 90))
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> FailResult<Self>
    { Self::new(&M33::from_rows([[a, 0., 0.], [0., b, 0.], [0., 0., c]])) }

    /// Lattice from cell lengths and angles (in degrees).
    ///
    /// Uses the convention where `a` lies along x and `b` lies in the xy plane.
    pub fn from_parameters(
        a: f64, b: f64, c: f64,
        alpha: f64, beta: f64, gamma: f64,
    ) -> FailResult<Self> {
        ensure!(a > 0.0 && b > 0.0 && c > 0.0, "lattice lengths must be positive: {:?}", (a, b, c));
        let (ca, cb) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (cg, sg) = (gamma.to_radians().cos(), gamma.to_radians().sin());
        ensure!(sg.abs() > 1e-12, "degenerate lattice angle gamma = {}", gamma);

        let cy = (ca - cb * cg) / sg;
        let cz_sq = 1.0 - cb * cb - cy * cy;
        ensure!(cz_sq > 0.0, "impossible lattice angles: {:?}", (alpha, beta, gamma));

        Self::new(&M33::from_rows([
            [a, 0.0, 0.0],
            [b * cg, b * sg, 0.0],
            [c * cb, c * cy, c * cz_sq.sqrt()],
        ]))
    }

    /// Matrix where lattice vectors are rows.
    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    #[inline]
    pub fn vectors(&self) -> &[V3; 3]
    { &(self.matrix.0) }

    /// Get the (positive) volume of the lattice cell.
    pub fn volume(&self) -> f64
    { self.matrix.det().abs() }

    #[inline]
    pub fn frac_to_cart(&self, frac: V3) -> V3
    { frac.dot_mat(&self.matrix) }

    #[inline]
    pub fn cart_to_frac(&self, cart: V3) -> V3
    { cart.dot_mat(&self.inverse) }

    /// Distance between adjacent lattice planes spanned by each pair of vectors.
    ///
    /// Element `k` is the height of the cell measured perpendicular to the plane
    /// of the two vectors other than `k`.  A sphere of radius `r` spans at most
    /// `r / spacing[k]` cells along fractional axis `k`.
    pub fn plane_spacings(&self) -> [f64; 3] {
        let [a, b, c] = *self.vectors();
        let volume = self.volume();
        [
            volume / b.cross(&c).norm(),
            volume / c.cross(&a).norm(),
            volume / a.cross(&b).norm(),
        ]
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn parameters_match_explicit_cubic() {
        let a = Lattice::from_parameters(3.52387, 3.52387, 3.52387, 90.0, 90.0, 90.0).unwrap();
        let b = Lattice::cubic(3.52387).unwrap();
        for (va, vb) in a.vectors().iter().zip(b.vectors()) {
            assert!((*va - *vb).norm() < 1e-12);
        }
        assert!((a.volume() - 3.52387f64.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn hexagonal_spacings() {
        let lattice = Lattice::from_parameters(2.0, 2.0, 5.0, 90.0, 90.0, 120.0).unwrap();
        let [s0, s1, s2] = lattice.plane_spacings();
        let expected = 2.0 * (3f64).sqrt() / 2.0;
        assert!((s0 - expected).abs() < 1e-12);
        assert!((s1 - expected).abs() < 1e-12);
        assert!((s2 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn frac_cart_round_trip() {
        let lattice = Lattice::from_parameters(3.0, 4.0, 5.0, 80.0, 95.0, 110.0).unwrap();
        let frac = V3([0.25, -0.5, 1.75]);
        let back = lattice.cart_to_frac(lattice.frac_to_cart(frac));
        assert!((back - frac).norm() < 1e-12);
    }

    #[test]
    fn singular_lattice_is_an_error() {
        assert!(Lattice::orthorhombic(1.0, 0.0, 1.0).is_err());
        assert!(Lattice::from_parameters(1.0, 1.0, 1.0, 90.0, 90.0, 0.0).is_err());
    }
}
