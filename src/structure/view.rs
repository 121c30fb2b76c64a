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

//! The interface through which pair sums see a structure.

use crate::{Lattice, Site, V3};

use std::fmt;

/// Upper end of the distance window of a freshly created traversal.
pub const DEFAULT_RMAX: f64 = 1.0e6;

/// Read-only view of an ordered sequence of sites.
///
/// Implementors are shared between threads as `Arc<dyn StructureView>`, and are
/// expected to be immutable once shared.  Anything that "modifies" a structure
/// should produce a new snapshot.
pub trait StructureView: fmt::Debug + Send + Sync {
    fn site_count(&self) -> usize;

    /// # Panics
    ///
    /// Panics if `index >= self.site_count()`.
    fn site(&self, index: usize) -> &Site;

    fn total_occupancy(&self) -> f64
    { (0..self.site_count()).map(|i| self.site(i).occupancy).sum() }

    /// The periodic cell, for structures that have one.
    fn lattice(&self) -> Option<&Lattice>
    { None }

    fn create_pair_traversal(&self) -> Box<dyn PairTraversal + '_>;
}

/// A cursor over the ordered pairs `(anchor, partner)` of a structure.
///
/// The pairs visited are those between the anchor site and every image of every
/// selected partner site whose distance lies within `[rmin, rmax]`.  Changing the
/// anchor, the selection or the window takes effect on the next `rewind()`.
///
/// ```text
/// t.select_anchor_site(i);
/// t.select_site_range(0, i + 1);
/// t.rewind();
/// while !t.finished() {
///     visit(t.site_a(), t.site_b(), t.distance());
///     t.advance();
/// }
/// ```
pub trait PairTraversal {
    fn select_anchor_site(&mut self, anchor: usize);

    /// Select the partner sites `lo..hi`.
    fn select_site_range(&mut self, lo: usize, hi: usize);

    fn select_sites(&mut self, sites: &[usize]);

    fn set_rmin(&mut self, rmin: f64);
    fn set_rmax(&mut self, rmax: f64);
    fn rmin(&self) -> f64;
    fn rmax(&self) -> f64;

    fn rewind(&mut self);
    fn finished(&self) -> bool;
    fn advance(&mut self);

    /// The anchor of the current pair.
    fn site_a(&self) -> usize;

    /// The partner of the current pair.
    ///
    /// # Panics
    ///
    /// Panics when `finished()`.
    fn site_b(&self) -> usize;

    /// Cartesian vector from the anchor to the current partner image.
    ///
    /// # Panics
    ///
    /// Panics when `finished()`.
    fn r01(&self) -> V3;

    fn distance(&self) -> f64
    { self.r01().norm() }
}

/// The geometric half of a traversal.
///
/// The reference adapters only differ in how they find the images of one partner
/// around an anchor, so [`SearchTraversal`] implements all of the selection and
/// cursor bookkeeping on top of this.
pub trait PartnerSearch {
    fn site_count(&self) -> usize;

    /// Push `(partner, r01)` for every image of `partner` at a distance from
    /// `anchor` within `window = (rmin, rmax)`.  The anchor's own zero image must
    /// be skipped.
    fn push_partner_images(
        &self,
        anchor: usize,
        partner: usize,
        window: (f64, f64),
        out: &mut Vec<(usize, V3)>,
    );
}

/// A [`PairTraversal`] for any [`PartnerSearch`].
#[derive(Debug, Clone)]
pub struct SearchTraversal<'a, S: ?Sized> {
    search: &'a S,
    anchor: usize,
    sites: Vec<usize>,
    rmin: f64,
    rmax: f64,
    pairs: Vec<(usize, V3)>,
    cursor: usize,
}

impl<'a, S: PartnerSearch + ?Sized> SearchTraversal<'a, S> {
    /// Anchored at site 0 with every site selected.
    pub fn new(search: &'a S) -> Self {
        SearchTraversal {
            search,
            anchor: 0,
            sites: (0..search.site_count()).collect(),
            rmin: 0.0,
            rmax: DEFAULT_RMAX,
            pairs: vec![],
            cursor: 0,
        }
    }

    fn current(&self) -> (usize, V3) {
        assert!(!self.finished(), "pair traversal is finished");
        self.pairs[self.cursor]
    }
}

impl<'a, S: PartnerSearch + ?Sized> PairTraversal for SearchTraversal<'a, S> {
    fn select_anchor_site(&mut self, anchor: usize) {
        debug_assert!(anchor < self.search.site_count());
        self.anchor = anchor;
    }

    fn select_site_range(&mut self, lo: usize, hi: usize) {
        let hi = hi.min(self.search.site_count());
        self.sites.clear();
        self.sites.extend(lo..hi);
    }

    fn select_sites(&mut self, sites: &[usize]) {
        debug_assert!(sites.iter().all(|&s| s < self.search.site_count()));
        self.sites.clear();
        self.sites.extend_from_slice(sites);
    }

    fn set_rmin(&mut self, rmin: f64) { self.rmin = rmin; }
    fn set_rmax(&mut self, rmax: f64) { self.rmax = rmax; }
    fn rmin(&self) -> f64 { self.rmin }
    fn rmax(&self) -> f64 { self.rmax }

    fn rewind(&mut self) {
        self.pairs.clear();
        self.cursor = 0;
        if self.rmax < self.rmin.max(0.0) {
            return;
        }
        for &partner in &self.sites {
            self.search.push_partner_images(self.anchor, partner, (self.rmin, self.rmax), &mut self.pairs);
        }
    }

    fn finished(&self) -> bool { self.cursor >= self.pairs.len() }

    fn advance(&mut self) {
        if !self.finished() {
            self.cursor += 1;
        }
    }

    fn site_a(&self) -> usize { self.anchor }
    fn site_b(&self) -> usize { self.current().0 }
    fn r01(&self) -> V3 { self.current().1 }
}

/// Whether a squared distance lies in the inclusive window.
#[inline]
pub(crate) fn in_window(sqnorm: f64, (rmin, rmax): (f64, f64)) -> bool {
    let square = |x: f64| x * x;
    let lo = if rmin > 0.0 { square(rmin) } else { 0.0 };
    lo <= sqnorm && sqnorm <= square(rmax)
}
