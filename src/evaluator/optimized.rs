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

use super::basic::update_completely;
use super::{sum_anchor_pairs, Evaluator, EvaluatorKind, EvaluatorSettings};
use crate::diff::{complementary_indices, DiffMethod, StructureDiff};
use crate::errors::EvalError;
use crate::quantity::PairQuantity;

use rsp2_structure::StructureView;

use std::sync::Arc;

/// Updates the sum from the difference between the previous structure and the
/// new one, recomputing from scratch whenever that is invalid or not worth it.
#[derive(Debug, Clone, Default)]
pub struct Incremental {
    settings: EvaluatorSettings,
    last_structure: Option<Arc<dyn StructureView>>,
}

/// Why a fast update was not done.
type Declined = &'static str;

impl Incremental {
    pub fn new() -> Self
    { Self::default() }

    pub fn with_settings(settings: EvaluatorSettings) -> Self
    { Incremental { settings, last_structure: None } }

    /// The structure of the last completed update.
    pub fn last_structure(&self) -> Option<&Arc<dyn StructureView>>
    { self.last_structure.as_ref() }

    fn update_completely(&mut self, pq: &mut dyn PairQuantity, structure: &Arc<dyn StructureView>) {
        update_completely(&mut self.settings, pq, structure);
        self.last_structure = Some(structure.clone());
    }

    fn fast_update(
        &mut self,
        pq: &mut dyn PairQuantity,
        stru1: &Arc<dyn StructureView>,
    ) -> Result<(), Declined> {
        let stru0 = match &self.last_structure {
            Some(stru0) => stru0.clone(),
            None => return Err("no previous structure"),
        };
        if pq.ticker() >= self.settings.value_ticker {
            return Err("quantity configuration is newer than the last result");
        }
        // the partial value must belong to stru0
        if !pq.structure().map_or(false, |s| Arc::ptr_eq(s, &stru0)) {
            return Err("quantity is bound to another structure");
        }
        // A worker's records were dealt out by the full loop, which the fast path
        // does not replay; it could be asked to remove one that another worker holds.
        if self.settings.parallel.is_parallel() && pq.extra_comparable().is_some() {
            return Err("extra results of a worker cannot be updated from a diff");
        }

        let diff = StructureDiff::between(&stru0, stru1);
        if !diff.allows_fast_update() {
            return Err("fast update would not save work");
        }
        if (self.settings.flags.fixed_site_index || pq.has_mask()) && diff.method != DiffMethod::SideBySide {
            return Err("site indices are not preserved");
        }

        let full_sum = self.settings.flags.use_full_sum;
        let has_mask = pq.has_mask();
        // one counter is shared by both phases
        let mut chunker = self.settings.parallel.chunker();
        let mut npairs = 0;

        // Subtract the pairs of removed sites from the old structure.
        {
            let npop = diff.pop0.len();
            let mut anchors = diff.pop0.clone();
            if !diff.pop0.is_empty() {
                anchors.extend(complementary_indices(stru0.site_count(), &diff.pop0));
            }

            let mut traversal = stru0.create_pair_traversal();
            pq.configure_traversal(&mut *traversal);
            traversal.select_sites(&anchors);

            let last_anchor = match full_sum {
                true => anchors.len(),
                false => npop,
            };
            let mut needs_reselection = full_sum;
            for k in 0..last_anchor {
                if !chunker.next_is_mine() {
                    continue;
                }
                traversal.select_anchor_site(anchors[k]);
                if !full_sum {
                    // removed sites already visited as anchors are done
                    traversal.select_sites(&anchors[k..]);
                } else if needs_reselection && k >= npop {
                    // unchanged anchors only pair with removed sites
                    traversal.select_sites(&diff.pop0);
                    needs_reselection = false;
                }
                npairs += sum_anchor_pairs(pq, &mut *traversal, -1, full_sum, has_mask, None);
            }
        }

        pq.stash_partial_value();
        pq.set_structure(stru1);
        if pq.ticker() >= self.settings.value_ticker {
            return Err("binding the new structure changed the quantity configuration");
        }
        pq.restore_partial_value();

        // Add the pairs of added sites in the new structure.
        {
            let nadd = diff.add1.len();
            let mut anchors = vec![];
            if !diff.add1.is_empty() {
                anchors = complementary_indices(stru1.site_count(), &diff.add1);
                anchors.extend(&diff.add1);
            }
            let first_added = anchors.len() - nadd;

            let mut traversal = stru1.create_pair_traversal();
            pq.configure_traversal(&mut *traversal);
            traversal.select_sites(&diff.add1);

            let first_anchor = match full_sum {
                true => 0,
                false => first_added,
            };
            let mut needs_reselection = full_sum;
            for k in first_anchor..anchors.len() {
                if !chunker.next_is_mine() {
                    continue;
                }
                traversal.select_anchor_site(anchors[k]);
                if !full_sum {
                    traversal.select_sites(&anchors[..=k]);
                } else if needs_reselection && k >= first_added {
                    traversal.select_sites(&anchors);
                    needs_reselection = false;
                }
                npairs += sum_anchor_pairs(pq, &mut *traversal, 1, full_sum, has_mask, None);
            }
        }

        trace!(
            "Incremental update: {} sites removed, {} added, {} pair contributions",
            diff.pop0.len(), diff.add1.len(), npairs,
        );
        self.last_structure = Some(stru1.clone());
        self.settings.stamp(pq, npairs);
        Ok(())
    }
}

impl Evaluator for Incremental {
    fn kind(&self) -> EvaluatorKind { EvaluatorKind::Incremental }

    fn settings(&self) -> &EvaluatorSettings { &self.settings }
    fn settings_mut(&mut self) -> &mut EvaluatorSettings { &mut self.settings }

    fn update_value(
        &mut self,
        pq: &mut dyn PairQuantity,
        structure: &Arc<dyn StructureView>,
    ) -> Result<(), EvalError> {
        self.settings.kind_used = Some(EvaluatorKind::Incremental);
        if let Err(reason) = self.fast_update(pq, structure) {
            debug!("Recomputing pair sum from scratch: {}", reason);
            self.update_completely(pq, structure);
        }
        Ok(())
    }
}
