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

//! Running a group of workers on one structure and summing their shares.

use crate::config::EvaluatorConfig;
use crate::errors::EvalError;
use crate::evaluator::Evaluator;
use crate::quantity::PairQuantity;

use rsp2_structure::StructureView;

use rayon::prelude::*;

use std::sync::Arc;

#[derive(Debug)]
struct Worker<Q> {
    quantity: Q,
    evaluator: Box<dyn Evaluator>,
}

/// One (quantity, evaluator) pair per worker.
///
/// Each worker keeps its own partial value and its own incremental baseline.
/// Workers run on the rayon thread pool unless `use_rayon` is turned off, in
/// which case they run one after another on the calling thread.
#[derive(Debug)]
pub struct ParallelEvaluation<Q> {
    workers: Vec<Worker<Q>>,
    use_rayon: bool,
}

impl<Q: PairQuantity + Clone> ParallelEvaluation<Q> {
    /// One worker per configured CPU, each with a copy of `prototype`.
    pub fn new(prototype: &Q, config: &EvaluatorConfig) -> Result<Self, EvalError> {
        let ncpu = config.threading.ncpu;
        if ncpu < 1 {
            return Err(EvalError::InvalidWorkerCount { ncpu });
        }
        let workers = (0..ncpu).map(|cpu_index| Ok(Worker {
            quantity: prototype.clone(),
            evaluator: config.build_worker(cpu_index)?,
        })).collect::<Result<Vec<_>, EvalError>>()?;

        Ok(ParallelEvaluation { workers, use_rayon: true })
    }
}

impl<Q: PairQuantity> ParallelEvaluation<Q> {
    pub fn use_rayon(mut self, use_rayon: bool) -> Self
    { self.use_rayon = use_rayon; self }

    pub fn ncpu(&self) -> usize { self.workers.len() }

    /// Apply a change to every worker's quantity.
    pub fn for_each_quantity(&mut self, mut f: impl FnMut(&mut Q)) {
        for worker in &mut self.workers {
            f(&mut worker.quantity);
        }
    }

    pub fn quantities(&self) -> impl Iterator<Item=&Q> {
        self.workers.iter().map(|w| &w.quantity)
    }

    pub fn evaluators(&self) -> impl Iterator<Item=&dyn Evaluator> {
        self.workers.iter().map(|w| &*w.evaluator)
    }

    /// Bring every worker up to date, and return the total value.
    pub fn update_value(&mut self, structure: &Arc<dyn StructureView>) -> Result<Vec<f64>, EvalError> {
        let update = |w: &mut Worker<Q>| w.evaluator.update_value(&mut w.quantity, structure);
        if self.use_rayon {
            self.workers.par_iter_mut().map(update).collect::<Result<(), _>>()?;
        } else {
            self.workers.iter_mut().map(update).collect::<Result<(), _>>()?;
        }
        Ok(self.total_value())
    }

    /// Elementwise sum of the partial values of all workers.
    pub fn total_value(&self) -> Vec<f64> {
        let mut total: Vec<f64> = vec![];
        for worker in &self.workers {
            let value = worker.quantity.value();
            if total.len() < value.len() {
                total.resize(value.len(), 0.0);
            }
            for (t, x) in total.iter_mut().zip(value) {
                *t += x;
            }
        }
        total
    }
}
