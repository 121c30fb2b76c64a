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
use crate::{Site, V3};

/// A finite cluster of sites with no periodicity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomicStructure {
    sites: Vec<Site>,
}

impl AtomicStructure {
    pub fn new(sites: Vec<Site>) -> Self
    { AtomicStructure { sites } }

    pub fn sites(&self) -> &[Site]
    { &self.sites }

    pub fn sites_mut(&mut self) -> &mut Vec<Site>
    { &mut self.sites }
}

impl StructureView for AtomicStructure {
    fn site_count(&self) -> usize { self.sites.len() }

    fn site(&self, index: usize) -> &Site { &self.sites[index] }

    fn create_pair_traversal(&self) -> Box<dyn PairTraversal + '_>
    { Box::new(SearchTraversal::new(self)) }
}

impl PartnerSearch for AtomicStructure {
    fn site_count(&self) -> usize { self.sites.len() }

    fn push_partner_images(
        &self,
        anchor: usize,
        partner: usize,
        window: (f64, f64),
        out: &mut Vec<(usize, V3)>,
    ) {
        if anchor == partner {
            return;
        }
        let r01 = self.sites[partner].cart - self.sites[anchor].cart;
        if in_window(r01.sqnorm(), window) {
            out.push((partner, r01));
        }
    }
}
