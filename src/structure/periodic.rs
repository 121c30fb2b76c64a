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

use crate::view::{in_window, PairTraversal, PartnerSearch, SearchTraversal, StructureView};
use crate::{CoordsKind, FailResult, Lattice, Site, V3};

/// A crystal: sites in a periodic cell.
///
/// Pairs include every periodic image of the partner site, so even a
/// single-site structure has neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicStructure {
    lattice: Lattice,
    sites: Vec<Site>,
    // cached from the lattice
    spacings: [f64; 3],
}

impl PeriodicStructure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        let spacings = lattice.plane_spacings();
        PeriodicStructure { lattice, sites, spacings }
    }

    /// Build from positions and per-site atom types.
    ///
    /// The sites are fully occupied and carry displacement `uiso`.
    pub fn from_coords(
        lattice: Lattice,
        coords: CoordsKind,
        atom_types: &[&str],
        uiso: f64,
    ) -> FailResult<Self> {
        ensure!(
            coords.len() == atom_types.len(),
            "got {} positions but {} atom types", coords.len(), atom_types.len(),
        );
        let carts = coords.into_carts(&lattice);
        let sites = izip!(carts, atom_types)
            .map(|(cart, &atom_type)| Site::new(atom_type, cart).with_uiso(uiso))
            .collect();
        Ok(Self::new(lattice, sites))
    }

    pub fn sites(&self) -> &[Site]
    { &self.sites }

    pub fn sites_mut(&mut self) -> &mut Vec<Site>
    { &mut self.sites }

    pub fn set_lattice(&mut self, lattice: Lattice) {
        self.spacings = lattice.plane_spacings();
        self.lattice = lattice;
    }

    /// Fractional coordinates of one site.
    pub fn site_frac(&self, index: usize) -> V3
    { self.lattice.cart_to_frac(self.sites[index].cart) }
}

impl StructureView for PeriodicStructure {
    fn site_count(&self) -> usize { self.sites.len() }

    fn site(&self, index: usize) -> &Site { &self.sites[index] }

    fn lattice(&self) -> Option<&Lattice> { Some(&self.lattice) }

    fn create_pair_traversal(&self) -> Box<dyn PairTraversal + '_>
    { Box::new(SearchTraversal::new(self)) }
}

impl PartnerSearch for PeriodicStructure {
    fn site_count(&self) -> usize { self.sites.len() }

    fn push_partner_images(
        &self,
        anchor: usize,
        partner: usize,
        window: (f64, f64),
        out: &mut Vec<(usize, V3)>,
    ) {
        let (_, rmax) = window;
        let delta = self.sites[partner].cart - self.sites[anchor].cart;
        let frac = self.lattice.cart_to_frac(delta);

        // The image `n` lies at fractional offset `frac + n`, whose component along
        // axis `k` can be at most `rmax / spacing[k]` in magnitude for the image to
        // be in range.  (pad slightly; the exact test below has the final word)
        let bounds = |k: usize| {
            let reach = rmax * (1.0 + 1e-9) / self.spacings[k];
            let lo = f64::ceil(-reach - frac[k]) as i64;
            let hi = f64::floor(reach - frac[k]) as i64;
            lo..=hi
        };

        for n0 in bounds(0) {
            for n1 in bounds(1) {
                for n2 in bounds(2) {
                    if anchor == partner && (n0, n1, n2) == (0, 0, 0) {
                        continue;
                    }
                    let image = V3([n0 as f64, n1 as f64, n2 as f64]);
                    let r01 = delta + self.lattice.frac_to_cart(image);
                    if in_window(r01.sqnorm(), window) {
                        out.push((partner, r01));
                    }
                }
            }
        }
    }
}
