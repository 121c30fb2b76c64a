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

use crate::quantity::{PairQuantity, QuantityCore};

use rsp2_structure::PairTraversal;

/// Total number of ordered neighbor pairs within the distance window.
#[derive(Debug, Clone, Default)]
pub struct NeighborCount {
    core: QuantityCore,
}

impl NeighborCount {
    /// The window extends to [`DEFAULT_RMAX`](rsp2_structure::DEFAULT_RMAX), which
    /// reaches every pair of a finite cluster.  Set a finite `rmax` before using it
    /// on a periodic structure, where a window this wide enumerates an enormous
    /// number of images.
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

    pub fn mask_all_pairs(&mut self, enabled: bool)
    { self.core.mask_all_pairs(enabled); }

    pub fn total(&self) -> f64
    { self.core.value().get(0).cloned().unwrap_or(0.0) }

    /// Neighbors per site of the bound structure.
    pub fn mean_neighbors(&self) -> f64 {
        match self.core.structure().map(|s| s.site_count()) {
            None | Some(0) => 0.0,
            Some(n) => self.total() / n as f64,
        }
    }
}

impl PairQuantity for NeighborCount {
    fn core(&self) -> &QuantityCore { &self.core }
    fn core_mut(&mut self) -> &mut QuantityCore { &mut self.core }

    fn value_size(&self) -> usize { 1 }

    fn add_pair_contribution(&mut self, _: &dyn PairTraversal, scale: i32) {
        self.core.value_mut()[0] += f64::from(scale);
    }
}
