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

use crate::quantity::{ExtraComparable, ExtraSnapshot, PairQuantity, QuantityCore};

use rsp2_structure::{PairTraversal, V3};

use std::cmp::Ordering;

// bond directions closer than this are the same bond
const DIRECTION_TOL: f64 = 1e-8;

/// One directed bond, from `site0` to an image of `site1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub site0: usize,
    pub site1: usize,
    pub type0: String,
    pub type1: String,
    pub direction: V3,
}

impl Bond {
    pub fn length(&self) -> f64 { self.direction.norm() }

    fn reversed(&self) -> Bond {
        Bond {
            site0: self.site1,
            site1: self.site0,
            type0: self.type1.clone(),
            type1: self.type0.clone(),
            direction: -self.direction,
        }
    }

    fn matches(&self, other: &Bond) -> bool {
        self.site0 == other.site0
            && self.site1 == other.site1
            && (self.direction - other.direction).sqnorm() <= DIRECTION_TOL * DIRECTION_TOL
    }
}

/// The list of directed bonds within the distance window.
///
/// The value holds the number of bonds and their total length.  Every
/// unordered bond appears in the list in both directions.
#[derive(Debug, Clone, Default)]
pub struct BondCalculator {
    core: QuantityCore,
    bonds: Vec<Bond>,
    stashed_bonds: Option<Vec<Bond>>,
}

impl BondCalculator {
    /// Unbounded window; see [`NeighborCount::new`](crate::calculators::NeighborCount::new).
    pub fn new() -> Self
    { Self::default() }

    pub fn with_rmax(rmax: f64) -> Self {
        let mut out = Self::new();
        out.set_rmax(rmax);
        out
    }

    pub fn set_rmin(&mut self, rmin: f64) { self.core.set_rmin(rmin); }
    pub fn set_rmax(&mut self, rmax: f64) { self.core.set_rmax(rmax); }

    pub fn set_pair_mask(&mut self, i: usize, j: usize, enabled: bool)
    { self.core.set_pair_mask(i, j, enabled); }

    /// Bonds in the order they were found.
    pub fn bonds(&self) -> &[Bond] { &self.bonds }

    pub fn count(&self) -> f64
    { self.core.value().get(0).cloned().unwrap_or(0.0) }

    pub fn distances(&self) -> Vec<f64>
    { self.bonds.iter().map(Bond::length).collect() }

    /// The bonds in an order that does not depend on how they were found.
    pub fn sorted_bonds(&self) -> Vec<Bond> {
        let mut bonds = self.bonds.clone();
        bonds.sort_by(canonical_order);
        bonds
    }

    fn remove_bond(&mut self, bond: &Bond) {
        match self.bonds.iter().position(|b| b.matches(bond)) {
            Some(pos) => { self.bonds.swap_remove(pos); },
            None => warn!("Removing a bond that was never added: {:?}", bond),
        }
    }
}

// Directions compare on a coarse grid first, then exactly.
fn canonical_order(a: &Bond, b: &Bond) -> Ordering {
    let key = |v: &V3| [v[0], v[1], v[2]].iter().map(|x| (x / DIRECTION_TOL).round() as i64).collect::<Vec<_>>();
    let exact = |v: &V3| [v[0], v[1], v[2]];
    (a.site0, a.site1).cmp(&(b.site0, b.site1))
        .then_with(|| key(&a.direction).cmp(&key(&b.direction)))
        .then_with(|| exact(&a.direction).partial_cmp(&exact(&b.direction)).unwrap_or(Ordering::Equal))
}

impl PairQuantity for BondCalculator {
    fn core(&self) -> &QuantityCore { &self.core }
    fn core_mut(&mut self) -> &mut QuantityCore { &mut self.core }

    fn value_size(&self) -> usize { 2 }

    fn reset_value(&mut self) {
        self.bonds.clear();
        self.core.reset_value(2);
    }

    fn add_pair_contribution(&mut self, pair: &dyn PairTraversal, scale: i32) {
        let bond = {
            let structure = self.core.structure().expect("(BUG) bond calculator has no structure");
            let (site0, site1) = (pair.site_a(), pair.site_b());
            Bond {
                site0, site1,
                type0: structure.site(site0).atom_type.clone(),
                type1: structure.site(site1).atom_type.clone(),
                direction: pair.r01(),
            }
        };

        {
            let value = self.core.value_mut();
            value[0] += f64::from(scale);
            value[1] += f64::from(scale) * bond.length();
        }

        let mirror = match scale.abs() {
            2 => Some(bond.reversed()),
            _ => None,
        };
        if scale > 0 {
            self.bonds.extend(mirror);
            self.bonds.push(bond);
        } else {
            if let Some(mirror) = mirror {
                self.remove_bond(&mirror);
            }
            self.remove_bond(&bond);
        }
    }

    fn stash_partial_value(&mut self) {
        self.stashed_bonds = Some(self.bonds.clone());
        self.core.stash_value();
    }

    fn restore_partial_value(&mut self) {
        self.bonds = self.stashed_bonds.take().expect("(BUG) restore without a stash");
        self.core.restore_value();
    }

    fn extra_comparable(&self) -> Option<&dyn ExtraComparable>
    { Some(self) }
}

impl ExtraComparable for BondCalculator {
    fn extra_snapshot(&self) -> ExtraSnapshot {
        let bonds = self.sorted_bonds();
        ExtraSnapshot {
            sites: bonds.iter().map(|b| (b.site0, b.site1)).collect(),
            types: bonds.iter().map(|b| (b.type0.clone(), b.type1.clone())).collect(),
            vectors: bonds.iter().map(|b| b.direction).collect(),
        }
    }
}
