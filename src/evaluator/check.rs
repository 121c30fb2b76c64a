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
use super::{Evaluator, EvaluatorKind, EvaluatorSettings, Incremental};
use crate::errors::EvalError;
use crate::quantity::{ExtraSnapshot, PairQuantity};

use rsp2_structure::StructureView;

use std::sync::Arc;

/// Square root of the machine epsilon.
pub const SQRT_DOUBLE_EPS: f64 = 1.4901161193847656e-08;

/// Runs [`Incremental`], and checks the fast updates against a full recomputation.
///
/// This is meant for testing the fast path of a quantity.  It is at least as
/// expensive as [`FromScratch`](super::FromScratch).
#[derive(Debug, Clone, Default)]
pub struct Verifying {
    incremental: Incremental,
}

impl Verifying {
    pub fn new() -> Self
    { Self::default() }

    pub fn with_settings(settings: EvaluatorSettings) -> Self
    { Verifying { incremental: Incremental::with_settings(settings) } }
}

impl Evaluator for Verifying {
    fn kind(&self) -> EvaluatorKind { EvaluatorKind::Verifying }

    fn settings(&self) -> &EvaluatorSettings { self.incremental.settings() }
    fn settings_mut(&mut self) -> &mut EvaluatorSettings { self.incremental.settings_mut() }

    fn update_value(
        &mut self,
        pq: &mut dyn PairQuantity,
        structure: &Arc<dyn StructureView>,
    ) -> Result<(), EvalError> {
        self.incremental.update_value(pq, structure)?;
        if self.kind_used() == Some(EvaluatorKind::FromScratch) {
            return Ok(());
        }
        if self.settings().parallel.is_parallel() {
            warn!("Skipping verification of a worker's partial pair sum; only the total is comparable.");
            return Ok(());
        }

        let saved = SavedResults::capture(pq);
        update_completely(self.settings_mut(), pq, structure);
        self.settings_mut().kind_used = Some(EvaluatorKind::Verifying);

        saved.compare(pq).map_err(|detail| EvalError::ConsistencyViolation { detail })
    }
}

struct SavedResults {
    value: Vec<f64>,
    extra: Option<ExtraSnapshot>,
}

impl SavedResults {
    fn capture(pq: &dyn PairQuantity) -> Self {
        SavedResults {
            value: pq.value().to_vec(),
            extra: pq.extra_comparable().map(|x| x.extra_snapshot()),
        }
    }

    fn compare(&self, pq: &dyn PairQuantity) -> Result<(), String> {
        let current = pq.value();
        if current.len() != self.value.len() {
            return Err(format!("value length {} != {}", self.value.len(), current.len()));
        }
        let eps = value_tolerance(&self.value);
        let bad = self.value.iter().zip(current).position(|(a, b)| !((a - b).abs() <= eps));
        if let Some(k) = bad {
            return Err(format!(
                "value[{}] = {} after the fast update, {} from scratch (tolerance {:e})",
                k, self.value[k], current[k], eps,
            ));
        }

        let current_extra = pq.extra_comparable().map(|x| x.extra_snapshot());
        match (&self.extra, &current_extra) {
            (None, None) => Ok(()),
            (Some(a), Some(b)) => match a.agrees_with(b, SQRT_DOUBLE_EPS) {
                true => Ok(()),
                false => Err(format!(
                    "extra results differ ({} records after the fast update, {} from scratch)",
                    a.sites.len(), b.sites.len(),
                )),
            },
            _ => Err("extra results appeared or disappeared".to_string()),
        }
    }
}

/// Absolute tolerance for comparing value vectors, scaled by the largest
/// magnitude (but never below that of 1.0).
pub fn value_tolerance(value: &[f64]) -> f64 {
    let largest = value.iter().fold(1.0_f64, |acc, x| acc.max(x.abs()));
    SQRT_DOUBLE_EPS * largest
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_eps() {
        assert_eq!(SQRT_DOUBLE_EPS, std::f64::EPSILON.sqrt());
    }

    #[test]
    fn tolerance_scaling() {
        assert_eq!(value_tolerance(&[]), SQRT_DOUBLE_EPS);
        assert_eq!(value_tolerance(&[0.25, -0.5]), SQRT_DOUBLE_EPS);
        assert_eq!(value_tolerance(&[3.0, -40.0]), 40.0 * SQRT_DOUBLE_EPS);
    }
}
