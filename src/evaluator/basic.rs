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

use super::{sum_anchor_pairs, Evaluator, EvaluatorKind, EvaluatorSettings};
use crate::errors::EvalError;
use crate::quantity::PairQuantity;

use rsp2_structure::StructureView;

use std::sync::Arc;

/// Recomputes the whole sum on every update.
#[derive(Debug, Clone, Default)]
pub struct FromScratch {
    settings: EvaluatorSettings,
}

impl FromScratch {
    pub fn new() -> Self
    { Self::default() }

    pub fn with_settings(settings: EvaluatorSettings) -> Self
    { FromScratch { settings } }
}

impl Evaluator for FromScratch {
    fn kind(&self) -> EvaluatorKind { EvaluatorKind::FromScratch }

    fn settings(&self) -> &EvaluatorSettings { &self.settings }
    fn settings_mut(&mut self) -> &mut EvaluatorSettings { &mut self.settings }

    fn update_value(
        &mut self,
        pq: &mut dyn PairQuantity,
        structure: &Arc<dyn StructureView>,
    ) -> Result<(), EvalError> {
        update_completely(&mut self.settings, pq, structure);
        Ok(())
    }
}

/// The from-scratch algorithm, shared by all evaluators.
pub(super) fn update_completely(
    settings: &mut EvaluatorSettings,
    pq: &mut dyn PairQuantity,
    structure: &Arc<dyn StructureView>,
) {
    settings.kind_used = Some(EvaluatorKind::FromScratch);
    pq.set_structure(structure);

    let mut traversal = structure.create_pair_traversal();
    pq.configure_traversal(&mut *traversal);

    let nsites = structure.site_count();
    let full_sum = settings.flags.use_full_sum;
    let has_mask = pq.has_mask();
    let split = settings.parallel.split(nsites);
    let mut chunker = settings.parallel.chunker();

    let mut npairs = 0;
    for i0 in 0..nsites {
        if split.chops_outer() && !chunker.next_is_mine() {
            continue;
        }
        traversal.select_anchor_site(i0);
        let i1_end = match full_sum {
            true => nsites,
            false => i0 + 1,
        };
        traversal.select_site_range(0, i1_end);

        let inner_chunker = match split.chops_inner() {
            true => Some(&mut chunker),
            false => None,
        };
        npairs += sum_anchor_pairs(pq, &mut *traversal, 1, full_sum, has_mask, inner_chunker);
    }

    trace!("From-scratch update over {} sites: {} pair contributions ({:?})", nsites, npairs, split);
    settings.stamp(pq, npairs);
}
