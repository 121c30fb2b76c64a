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

//! Small reference structures for tests and documentation.

use crate::{AtomicStructure, CoordsKind, Lattice, PeriodicStructure, Site, V3};

pub const NICKEL_A: f64 = 3.52387;
pub const NICKEL_UISO: f64 = 0.0126651;

const FCC_BASIS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
];

/// Conventional 4-site cell of fcc nickel.
pub fn nickel_fcc() -> PeriodicStructure
{ nickel_supercell([1, 1, 1]) }

/// A diagonal supercell of the conventional nickel cell.
pub fn nickel_supercell([na, nb, nc]: [usize; 3]) -> PeriodicStructure {
    let lattice = Lattice::orthorhombic(
        NICKEL_A * na as f64,
        NICKEL_A * nb as f64,
        NICKEL_A * nc as f64,
    ).expect("(BUG) nickel lattice is singular");

    let mut carts = vec![];
    for ia in 0..na {
        for ib in 0..nb {
            for ic in 0..nc {
                let cell = V3([ia as f64, ib as f64, ic as f64]);
                for &frac in &FCC_BASIS {
                    carts.push((cell + V3(frac)) * NICKEL_A);
                }
            }
        }
    }
    let types = vec!["Ni"; carts.len()];
    PeriodicStructure::from_coords(lattice, CoordsKind::Carts(carts), &types, NICKEL_UISO)
        .expect("(BUG) nickel coords are inconsistent")
}

/// The sites of a nickel supercell as a finite cluster.
pub fn nickel_cluster(reps: [usize; 3]) -> AtomicStructure {
    let sites: Vec<Site> = nickel_supercell(reps).sites().to_vec();
    AtomicStructure::new(sites)
}
