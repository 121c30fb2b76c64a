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

use rsp2_pairsum::{Evaluator, EvaluatorFlags, FromScratch, PairQuantity};
use rsp2_pairsum::rsp2_structure::{Site, StructureView, V3};

use rand::Rng;

use std::sync::Arc;

pub const ATOM_TYPES: &[&str] = &["Ni", "Cu", "Fe"];

pub fn share<S: StructureView + 'static>(structure: S) -> Arc<dyn StructureView>
{ Arc::new(structure) }

/// Value of a fresh copy of `pq` computed from scratch on one worker.
pub fn from_scratch<Q: PairQuantity + Clone>(
    pq: &Q,
    structure: &Arc<dyn StructureView>,
    flags: EvaluatorFlags,
) -> Vec<f64> {
    let mut pq = pq.clone();
    let mut ev = FromScratch::new();
    ev.set_flags(flags);
    ev.update_value(&mut pq, structure).unwrap();
    pq.value().to_vec()
}

/// Make a small random change to one site: a new type, a displacement, or
/// a new occupancy.
pub fn random_edit(rng: &mut impl Rng, sites: &mut [Site]) {
    let index = rng.gen_range(0..sites.len());
    let site = &mut sites[index];
    match rng.gen_range(0..3) {
        0 => site.atom_type = ATOM_TYPES[rng.gen_range(0..ATOM_TYPES.len())].to_string(),
        1 => site.cart += V3([
            rng.gen_range(-0.2..0.2),
            rng.gen_range(-0.2..0.2),
            rng.gen_range(-0.2..0.2),
        ]),
        _ => site.occupancy = rng.gen_range(0.5..1.0),
    }
}
