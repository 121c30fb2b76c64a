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

//! Strategies for bringing a [`PairQuantity`] up to date with a structure.

mod basic;
mod optimized;
mod check;

pub use self::basic::FromScratch;
pub use self::optimized::Incremental;
pub use self::check::{Verifying, value_tolerance, SQRT_DOUBLE_EPS};

use crate::chunk::{self, LoopChunker, LoopSplit};
use crate::errors::EvalError;
use crate::quantity::PairQuantity;
use crate::ticker::EventTicker;

use rsp2_structure::{PairTraversal, StructureView};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluatorKind {
    /// Always recompute every pair.
    #[serde(alias = "basic")]
    FromScratch,
    /// Update from the difference to the previous structure, when possible.
    #[serde(alias = "optimized")]
    Incremental,
    /// Incremental, cross-checked against a full recomputation.
    #[serde(alias = "check")]
    Verifying,
}

impl EvaluatorKind {
    pub fn name(self) -> &'static str {
        match self {
            EvaluatorKind::FromScratch => "from-scratch",
            EvaluatorKind::Incremental => "incremental",
            EvaluatorKind::Verifying => "verifying",
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { f.write_str(self.name()) }
}

impl FromStr for EvaluatorKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, EvalError> {
        match s {
            "from-scratch" | "basic" => Ok(EvaluatorKind::FromScratch),
            "incremental" | "optimized" => Ok(EvaluatorKind::Incremental),
            "verifying" | "check" => Ok(EvaluatorKind::Verifying),
            _ => Err(EvalError::InvalidStrategyName { name: s.to_string() }),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EvaluatorFlags {
    /// Visit every ordered pair with scale 1, instead of the triangular half
    /// with scale 2.
    pub use_full_sum: bool,
    /// Only update incrementally when site indices keep their meaning.
    pub fixed_site_index: bool,
}

/// The position of one evaluator among a group of workers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParallelConfig {
    cpu_index: usize,
    ncpu: usize,
    load_variance: f64,
}

impl Default for ParallelConfig {
    fn default() -> Self
    { ParallelConfig { cpu_index: 0, ncpu: 1, load_variance: chunk::DEFAULT_LOAD_VARIANCE } }
}

impl ParallelConfig {
    pub fn serial() -> Self
    { Self::default() }

    pub fn new(cpu_index: usize, ncpu: usize) -> Result<Self, EvalError>
    { Self::serial().with_workers(cpu_index, ncpu) }

    pub fn with_workers(self, cpu_index: usize, ncpu: usize) -> Result<Self, EvalError> {
        if ncpu < 1 {
            return Err(EvalError::InvalidWorkerCount { ncpu });
        }
        if cpu_index >= ncpu {
            return Err(EvalError::InvalidWorkerIndex { cpu_index, ncpu });
        }
        Ok(ParallelConfig { cpu_index, ncpu, ..self })
    }

    pub fn with_load_variance(self, load_variance: f64) -> Result<Self, EvalError> {
        if !(load_variance >= 0.0 && load_variance.is_finite()) {
            return Err(EvalError::InvalidParameter { name: "load-variance", value: load_variance });
        }
        Ok(ParallelConfig { load_variance, ..self })
    }

    pub fn cpu_index(&self) -> usize { self.cpu_index }
    pub fn ncpu(&self) -> usize { self.ncpu }
    pub fn load_variance(&self) -> f64 { self.load_variance }

    pub fn is_parallel(&self) -> bool { self.ncpu > 1 }

    pub fn chunker(&self) -> LoopChunker
    { LoopChunker::new(self.cpu_index, self.ncpu) }

    pub fn split(&self, nsites: usize) -> LoopSplit
    { chunk::choose_split(self.ncpu, nsites, self.load_variance) }
}

/// Runtime configuration and bookkeeping common to all evaluators.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorSettings {
    pub flags: EvaluatorFlags,
    pub parallel: ParallelConfig,
    /// Stamped every time the evaluator completes an update.
    pub value_ticker: EventTicker,
    /// The strategy that actually ran on the last update.
    pub kind_used: Option<EvaluatorKind>,
    /// Number of pair contributions made on the last update.
    pub pairs_visited: usize,
}

impl EvaluatorSettings {
    fn stamp(&mut self, pq: &mut dyn PairQuantity, pairs_visited: usize) {
        self.pairs_visited = pairs_visited;
        self.value_ticker.click();
        pq.stamp_value(self.value_ticker);
    }
}

/// Brings a pair quantity up to date with a structure.
pub trait Evaluator: fmt::Debug + Send {
    fn kind(&self) -> EvaluatorKind;

    fn settings(&self) -> &EvaluatorSettings;
    fn settings_mut(&mut self) -> &mut EvaluatorSettings;

    /// Make `pq` hold its value for `structure`.
    ///
    /// With more than one worker configured, only this worker's share of the
    /// pairs is included, and the shares of all workers must be summed.
    fn update_value(
        &mut self,
        pq: &mut dyn PairQuantity,
        structure: &Arc<dyn StructureView>,
    ) -> Result<(), EvalError>;

    fn kind_used(&self) -> Option<EvaluatorKind>
    { self.settings().kind_used }

    fn value_ticker(&self) -> EventTicker
    { self.settings().value_ticker }

    fn pairs_visited(&self) -> usize
    { self.settings().pairs_visited }

    fn flags(&self) -> EvaluatorFlags
    { self.settings().flags }

    fn set_flags(&mut self, flags: EvaluatorFlags)
    { self.settings_mut().flags = flags; }

    fn parallel_configuration(&self) -> ParallelConfig
    { self.settings().parallel }

    fn set_parallel_configuration(&mut self, cpu_index: usize, ncpu: usize) -> Result<(), EvalError> {
        let parallel = self.settings().parallel.with_workers(cpu_index, ncpu)?;
        self.settings_mut().parallel = parallel;
        Ok(())
    }

    fn set_load_variance(&mut self, load_variance: f64) -> Result<(), EvalError> {
        let parallel = self.settings().parallel.with_load_variance(load_variance)?;
        self.settings_mut().parallel = parallel;
        Ok(())
    }
}

/// Construct an evaluator, optionally carrying over the runtime configuration
/// of another.
///
/// Flags, parallel configuration, value ticker and last used kind are copied.
/// The previous structure remembered by an incremental evaluator is not, so the
/// first update of the new evaluator is always a full one.
pub fn create_evaluator(kind: EvaluatorKind, source: Option<&dyn Evaluator>) -> Box<dyn Evaluator> {
    let settings = source.map(|ev| ev.settings().clone()).unwrap_or_default();
    match kind {
        EvaluatorKind::FromScratch => Box::new(FromScratch::with_settings(settings)),
        EvaluatorKind::Incremental => Box::new(Incremental::with_settings(settings)),
        EvaluatorKind::Verifying => Box::new(Verifying::with_settings(settings)),
    }
}

pub fn create_evaluator_by_name(name: &str, source: Option<&dyn Evaluator>) -> Result<Box<dyn Evaluator>, EvalError> {
    let kind = name.parse()?;
    Ok(create_evaluator(kind, source))
}

/// Contribute every pair of the traversal's current anchor.
///
/// Returns the number of contributions made.
fn sum_anchor_pairs(
    pq: &mut dyn PairQuantity,
    traversal: &mut dyn PairTraversal,
    sign: i32,
    full_sum: bool,
    has_mask: bool,
    mut inner_chunker: Option<&mut LoopChunker>,
) -> usize {
    let i0 = traversal.site_a();
    let mut count = 0;
    traversal.rewind();
    while !traversal.finished() {
        let mine = match inner_chunker {
            Some(ref mut chunker) => chunker.next_is_mine(),
            None => true,
        };
        if mine {
            let i1 = traversal.site_b();
            if !has_mask || pq.pair_mask(i0, i1) {
                let scale = if full_sum || i0 == i1 { 1 } else { 2 };
                pq.add_pair_contribution(&*traversal, sign * scale);
                count += 1;
            }
        }
        traversal.advance();
    }
    count
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        for &kind in &[EvaluatorKind::FromScratch, EvaluatorKind::Incremental, EvaluatorKind::Verifying] {
            assert_eq!(kind.name().parse::<EvaluatorKind>(), Ok(kind));
        }
        assert_eq!("basic".parse::<EvaluatorKind>(), Ok(EvaluatorKind::FromScratch));
        assert_eq!("optimized".parse::<EvaluatorKind>(), Ok(EvaluatorKind::Incremental));
        assert_eq!("check".parse::<EvaluatorKind>(), Ok(EvaluatorKind::Verifying));

        let err = "fastest".parse::<EvaluatorKind>().unwrap_err();
        assert_eq!(err, EvalError::InvalidStrategyName { name: "fastest".into() });
        assert!(err.is_config_error());
    }

    #[test]
    fn worker_validation() {
        assert_eq!(ParallelConfig::new(0, 0), Err(EvalError::InvalidWorkerCount { ncpu: 0 }));
        assert_eq!(ParallelConfig::new(3, 3), Err(EvalError::InvalidWorkerIndex { cpu_index: 3, ncpu: 3 }));

        let par = ParallelConfig::new(2, 3).unwrap();
        assert!(par.is_parallel());
        assert_eq!((par.cpu_index(), par.ncpu()), (2, 3));
        assert!(!ParallelConfig::serial().is_parallel());

        assert!(par.with_load_variance(-1.0).is_err());
        assert!(par.with_load_variance(std::f64::NAN).is_err());
        assert_eq!(par.with_load_variance(0.5).unwrap().load_variance(), 0.5);
    }

    #[test]
    fn failed_reconfiguration_keeps_settings() {
        let mut ev = create_evaluator(EvaluatorKind::FromScratch, None);
        ev.set_parallel_configuration(1, 4).unwrap();

        assert!(ev.set_parallel_configuration(0, 0).is_err());
        assert_eq!(ev.parallel_configuration().ncpu(), 4);
        assert_eq!(ev.parallel_configuration().cpu_index(), 1);
    }

    #[test]
    fn factory_copies_configuration() {
        let mut src = create_evaluator(EvaluatorKind::Incremental, None);
        src.set_flags(EvaluatorFlags { use_full_sum: true, fixed_site_index: true });
        src.set_parallel_configuration(1, 2).unwrap();
        src.settings_mut().value_ticker.click();
        src.settings_mut().kind_used = Some(EvaluatorKind::FromScratch);

        let ev = create_evaluator(EvaluatorKind::Verifying, Some(&*src));
        assert_eq!(ev.kind(), EvaluatorKind::Verifying);
        assert_eq!(ev.flags(), src.flags());
        assert_eq!(ev.parallel_configuration(), src.parallel_configuration());
        assert_eq!(ev.value_ticker(), src.value_ticker());
        assert_eq!(ev.kind_used(), Some(EvaluatorKind::FromScratch));

        let fresh = create_evaluator(EvaluatorKind::Incremental, None);
        assert_eq!(fresh.flags(), EvaluatorFlags::default());
        assert_eq!(fresh.kind_used(), None);
    }

    #[test]
    fn factory_by_name() {
        assert_eq!(create_evaluator_by_name("optimized", None).unwrap().kind(), EvaluatorKind::Incremental);
        match create_evaluator_by_name("nope", None) {
            Err(EvalError::InvalidStrategyName { .. }) => {},
            r => panic!("{:?}", r),
        }
    }
}
