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

//! The accumulator side of a pair sum.
//!
//! A [`PairQuantity`] supplies the contribution of one pair and owns the result.
//! Everything evaluators need to know about it beyond that lives in a
//! [`QuantityCore`], which the implementor embeds and exposes.

mod mask;

pub use self::mask::PairMask;

use crate::ticker::EventTicker;

use rsp2_structure::{PairTraversal, StructureView, DEFAULT_RMAX, V3};

use std::fmt;
use std::sync::Arc;

/// The state shared by every pair quantity.
#[derive(Clone)]
pub struct QuantityCore {
    value: Vec<f64>,
    structure: Option<Arc<dyn StructureView>>,
    // version of the settings that determine `value` for a given structure
    ticker: EventTicker,
    // stamped by evaluators when `value` is brought up to date
    value_ticker: EventTicker,
    mask: PairMask,
    rmin: f64,
    rmax: f64,
    stashed: Option<Vec<f64>>,
}

impl Default for QuantityCore {
    fn default() -> Self {
        QuantityCore {
            value: vec![],
            structure: None,
            ticker: EventTicker::new(),
            value_ticker: EventTicker::new(),
            mask: PairMask::new(),
            rmin: 0.0,
            rmax: DEFAULT_RMAX,
            stashed: None,
        }
    }
}

impl fmt::Debug for QuantityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantityCore")
            .field("value", &self.value)
            .field("site_count", &self.structure.as_ref().map(|s| s.site_count()))
            .field("ticker", &self.ticker)
            .field("value_ticker", &self.value_ticker)
            .field("mask", &self.mask)
            .field("rmin", &self.rmin)
            .field("rmax", &self.rmax)
            .finish()
    }
}

impl QuantityCore {
    pub fn new() -> Self
    { Self::default() }

    pub fn value(&self) -> &[f64] { &self.value }
    pub fn value_mut(&mut self) -> &mut [f64] { &mut self.value }

    /// Replace the value with `len` zeros.
    pub fn reset_value(&mut self, len: usize) {
        self.value.clear();
        self.value.resize(len, 0.0);
    }

    pub fn structure(&self) -> Option<&Arc<dyn StructureView>>
    { self.structure.as_ref() }

    pub fn ticker(&self) -> EventTicker { self.ticker }
    pub fn value_ticker(&self) -> EventTicker { self.value_ticker }

    /// Record a change to the configuration.
    pub fn click(&mut self) { self.ticker.click(); }

    pub fn rmin(&self) -> f64 { self.rmin }
    pub fn rmax(&self) -> f64 { self.rmax }

    pub fn set_rmin(&mut self, rmin: f64) {
        if rmin != self.rmin {
            self.rmin = rmin;
            self.click();
        }
    }

    pub fn set_rmax(&mut self, rmax: f64) {
        if rmax != self.rmax {
            self.rmax = rmax;
            self.click();
        }
    }

    pub fn mask(&self) -> &PairMask { &self.mask }

    pub fn set_pair_mask(&mut self, i: usize, j: usize, enabled: bool) {
        if self.mask.get(i, j) != enabled {
            self.mask.set(i, j, enabled);
            self.click();
        }
    }

    pub fn mask_all_pairs(&mut self, enabled: bool) {
        self.mask.set_all(enabled);
        self.click();
    }

    pub fn stash_value(&mut self)
    { self.stashed = Some(self.value.clone()); }

    /// # Panics
    ///
    /// Panics if nothing was stashed.
    pub fn restore_value(&mut self) {
        let stashed = self.stashed.take().expect("(BUG) restore without a stash");
        self.value = stashed;
    }
}

/// Extra results of a quantity that the verifying evaluator should compare,
/// besides its value vector.
pub trait ExtraComparable {
    /// The extra results, in an order that does not depend on evaluation order.
    fn extra_snapshot(&self) -> ExtraSnapshot;
}

/// Site-labeled vectors, such as the bonds of a bond list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtraSnapshot {
    pub sites: Vec<(usize, usize)>,
    pub types: Vec<(String, String)>,
    pub vectors: Vec<V3>,
}

impl ExtraSnapshot {
    /// Labels must match exactly, and vectors elementwise within `eps`.
    pub fn agrees_with(&self, other: &ExtraSnapshot, eps: f64) -> bool {
        self.sites == other.sites
            && self.types == other.types
            && self.vectors.len() == other.vectors.len()
            && self.vectors.iter().zip(&other.vectors).all(|(a, b)| {
                (0..3).all(|k| (a[k] - b[k]).abs() <= eps)
            })
    }
}

/// A quantity that is a sum of contributions from pairs of sites.
///
/// Implementors provide [`add_pair_contribution`](PairQuantity::add_pair_contribution),
/// and the storage through `core()`.  The remaining methods have defaults that
/// may be overridden when a quantity keeps more state than its value vector.
pub trait PairQuantity: Send {
    fn core(&self) -> &QuantityCore;
    fn core_mut(&mut self) -> &mut QuantityCore;

    /// Length of the value vector for the bound structure.
    fn value_size(&self) -> usize;

    /// Add `scale` times the contribution of the traversal's current pair.
    ///
    /// `scale` is one of `+1, +2, -1, -2`.  A scale of 2 stands for an ordered
    /// pair together with its mirror image.
    fn add_pair_contribution(&mut self, pair: &dyn PairTraversal, scale: i32);

    fn reset_value(&mut self) {
        let len = self.value_size();
        self.core_mut().reset_value(len);
    }

    /// Hook for settings that depend on the structure.
    ///
    /// Called when a structure is bound, before the value is reset.  An
    /// implementation that changes the configuration must click the ticker.
    fn configure_for_structure(&mut self, _structure: &Arc<dyn StructureView>) {}

    fn configure_traversal(&self, traversal: &mut dyn PairTraversal) {
        traversal.set_rmin(self.core().rmin());
        traversal.set_rmax(self.core().rmax());
    }

    /// Save the partial result across a `set_structure` in the middle of an
    /// incremental update.
    fn stash_partial_value(&mut self)
    { self.core_mut().stash_value() }

    fn restore_partial_value(&mut self)
    { self.core_mut().restore_value() }

    fn extra_comparable(&self) -> Option<&dyn ExtraComparable>
    { None }

    /// Version of the configuration.
    ///
    /// When the quantity is at least as new as an evaluator's last result, the
    /// evaluator must recompute from scratch.
    fn ticker(&self) -> EventTicker
    { self.core().ticker() }

    fn value(&self) -> &[f64]
    { self.core().value() }

    fn structure(&self) -> Option<&Arc<dyn StructureView>>
    { self.core().structure() }

    fn has_mask(&self) -> bool
    { self.core().mask().is_active() }

    fn pair_mask(&self, i: usize, j: usize) -> bool
    { self.core().mask().get(i, j) }

    fn set_structure(&mut self, structure: &Arc<dyn StructureView>) {
        self.core_mut().structure = Some(structure.clone());
        self.configure_for_structure(structure);
        self.reset_value();
    }

    /// Called by evaluators on completing an update.
    fn stamp_value(&mut self, stamp: EventTicker)
    { self.core_mut().value_ticker = stamp; }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn settings_click_the_ticker() {
        let mut core = QuantityCore::new();
        let t0 = core.ticker();

        core.set_rmax(3.0);
        let t1 = core.ticker();
        assert!(t1 > t0);

        // unchanged values leave it alone
        core.set_rmax(3.0);
        core.set_pair_mask(0, 1, true);
        assert_eq!(core.ticker(), t1);

        core.set_pair_mask(0, 1, false);
        let t2 = core.ticker();
        assert!(t2 > t1);

        core.mask_all_pairs(true);
        assert!(core.ticker() > t2);
        assert!(!core.mask().is_active());
    }

    #[test]
    fn stash_and_restore() {
        let mut core = QuantityCore::new();
        core.reset_value(2);
        core.value_mut()[1] = 4.0;
        core.stash_value();
        core.reset_value(3);
        assert_eq!(core.value(), &[0.0; 3][..]);
        core.restore_value();
        assert_eq!(core.value(), &[0.0, 4.0][..]);
    }

    #[test]
    fn snapshot_agreement() {
        let a = ExtraSnapshot {
            sites: vec![(0, 1)],
            types: vec![("Ni".into(), "Ni".into())],
            vectors: vec![V3([1.0, 0.0, 0.0])],
        };
        let mut b = a.clone();
        b.vectors[0][0] += 1e-12;
        assert!(a.agrees_with(&b, 1e-8));

        b.vectors[0][0] += 1e-3;
        assert!(!a.agrees_with(&b, 1e-8));

        let mut c = a.clone();
        c.sites[0] = (1, 0);
        assert!(!a.agrees_with(&c, 1e-8));
    }
}
