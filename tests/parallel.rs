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

mod shared;

use self::shared::fixtures::{from_scratch, random_edit, share};
use self::shared::util::{assert_values_close, init_logging};

use rsp2_pairsum::{
    BondCalculator, DebyeSum, Evaluator, EvaluatorConfig, EvaluatorKind, ExtraComparable, FromScratch,
    NeighborCount, PairQuantity, ParallelEvaluation,
};
use rsp2_pairsum::rsp2_structure::{samples, V3};

use rand::{rngs::StdRng, SeedableRng};

fn config(kind: EvaluatorKind, ncpu: usize) -> EvaluatorConfig {
    let mut config = EvaluatorConfig::default();
    config.kind = kind;
    config.threading.ncpu = ncpu;
    config
}

#[test]
fn workers_cover_every_pair() {
    init_logging();
    let ni = share(samples::nickel_supercell([2, 2, 2]));
    let prototype = NeighborCount::with_rmax(3.6);

    for ncpu in 1..=5 {
        let mut group = ParallelEvaluation::new(&prototype, &config(EvaluatorKind::FromScratch, ncpu)).unwrap();
        assert_eq!(group.ncpu(), ncpu);
        assert_eq!(group.update_value(&ni).unwrap(), vec![32.0 * 18.0]);

        let partials = group.quantities().map(|q| q.total()).collect::<Vec<_>>();
        assert_eq!(partials.iter().sum::<f64>(), 32.0 * 18.0);
        if ncpu > 1 {
            assert!(partials.iter().all(|&x| x < 32.0 * 18.0), "{:?}", partials);
        }
    }
}

#[test]
fn incremental_workers_match_a_serial_sum() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);

    let mut prototype = DebyeSum::new();
    prototype.set_qmax(5.0).unwrap();
    prototype.set_qstep(0.5).unwrap();
    prototype.set_rmax(4.5);

    let mut current = samples::nickel_supercell([2, 2, 1]);
    let mut sites = current.sites().to_vec();

    for &use_rayon in &[true, false] {
        let mut group = ParallelEvaluation::new(&prototype, &config(EvaluatorKind::Incremental, 3))
            .unwrap()
            .use_rayon(use_rayon);

        let start = share(current.clone());
        let total = group.update_value(&start).unwrap();
        assert_values_close(&total, &from_scratch(&prototype, &start, Default::default()));

        for _ in 0..6 {
            random_edit(&mut rng, &mut sites);
            *current.sites_mut() = sites.clone();
            let structure = share(current.clone());

            let total = group.update_value(&structure).unwrap();
            assert_values_close(&total, &from_scratch(&prototype, &structure, Default::default()));
        }
        assert!(group.evaluators().any(|ev| ev.kind_used() == Some(EvaluatorKind::Incremental)));
    }
}

#[test]
fn reconfiguring_every_worker() {
    let ni = share(samples::nickel_fcc());
    let mut group = ParallelEvaluation::new(&NeighborCount::with_rmax(3.0), &config(EvaluatorKind::Incremental, 2))
        .unwrap();
    assert_eq!(group.update_value(&ni).unwrap(), vec![48.0]);

    group.for_each_quantity(|q| q.set_rmax(3.6));
    assert_eq!(group.update_value(&ni).unwrap(), vec![72.0]);
    assert!(group.evaluators().all(|ev| ev.kind_used() == Some(EvaluatorKind::FromScratch)));
    assert_eq!(group.total_value(), vec![72.0]);
}

#[test]
fn bond_lists_of_workers_stay_complete() {
    init_logging();
    let old = samples::nickel_fcc();
    let mut new = old.clone();
    new.sites_mut()[2].cart += V3([0.03, -0.01, 0.02]);
    let (old, new) = (share(old), share(new));

    let prototype = BondCalculator::with_rmax(3.0);
    let mut group = ParallelEvaluation::new(&prototype, &config(EvaluatorKind::Incremental, 3)).unwrap();
    group.update_value(&old).unwrap();
    let total = group.update_value(&new).unwrap();
    assert!(group.evaluators().all(|ev| ev.kind_used() == Some(EvaluatorKind::FromScratch)));

    let mut reference = prototype.clone();
    FromScratch::new().update_value(&mut reference, &new).unwrap();
    assert_values_close(&total, reference.value());

    let bonds: Vec<_> = group.quantities().flat_map(|q| q.bonds().iter().cloned()).collect();
    assert_eq!(bonds.len(), reference.bonds().len());

    let mut sites: Vec<_> = bonds.iter().map(|b| (b.site0, b.site1)).collect();
    sites.sort();
    assert_eq!(sites, reference.extra_snapshot().sites);
}
