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

use crate::errors::EvalError;
use crate::evaluator::SQRT_DOUBLE_EPS;
use crate::quantity::{PairQuantity, QuantityCore};
use crate::ticker::EventTicker;

use rsp2_structure::PairTraversal;

use std::collections::BTreeMap;

/// Contributions below this magnitude end the loop over Q.
pub const DEFAULT_DEBYE_PRECISION: f64 = 1e-6;

/// The Debye scattering sum `Σ f_a f_b sin(Q r_ab) / r_ab` on a grid of Q.
///
/// Each pair is damped by a Debye-Waller factor from the `Uiso` of both sites.
/// Scattering factors are constant per atom type, and default to 1.
#[derive(Debug, Clone)]
pub struct DebyeSum {
    core: QuantityCore,
    qmin: f64,
    qmax: f64,
    qstep: f64,
    precision: f64,
    scattering_factors: BTreeMap<String, f64>,
    qgrid_ticker: EventTicker,
    table_ticker: EventTicker,
    cache: StructureCache,
}

// Derived from the bound structure on every reset.
#[derive(Debug, Clone, Default)]
struct StructureCache {
    site_factors: Vec<f64>,
    site_uiso: Vec<f64>,
    average_factor: f64,
    total_occupancy: f64,
}

impl Default for DebyeSum {
    fn default() -> Self {
        DebyeSum {
            core: QuantityCore::new(),
            qmin: 0.0,
            qmax: 10.0,
            qstep: 0.05,
            precision: DEFAULT_DEBYE_PRECISION,
            scattering_factors: BTreeMap::new(),
            qgrid_ticker: EventTicker::new(),
            table_ticker: EventTicker::new(),
            cache: StructureCache::default(),
        }
    }
}

fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), EvalError> {
    match value >= 0.0 && value.is_finite() {
        true => Ok(()),
        false => Err(EvalError::InvalidParameter { name, value }),
    }
}

impl DebyeSum {
    /// Unbounded window; see [`NeighborCount::new`](crate::calculators::NeighborCount::new).
    pub fn new() -> Self
    { Self::default() }

    pub fn set_rmin(&mut self, rmin: f64) { self.core.set_rmin(rmin); }
    pub fn set_rmax(&mut self, rmax: f64) { self.core.set_rmax(rmax); }

    pub fn qmin(&self) -> f64 { self.qmin }
    pub fn qmax(&self) -> f64 { self.qmax }
    pub fn qstep(&self) -> f64 { self.qstep }
    pub fn precision(&self) -> f64 { self.precision }

    pub fn set_qmin(&mut self, qmin: f64) -> Result<(), EvalError> {
        ensure_non_negative("qmin", qmin)?;
        self.qmin = qmin;
        self.qgrid_ticker.click();
        Ok(())
    }

    pub fn set_qmax(&mut self, qmax: f64) -> Result<(), EvalError> {
        ensure_non_negative("qmax", qmax)?;
        self.qmax = qmax;
        self.qgrid_ticker.click();
        Ok(())
    }

    pub fn set_qstep(&mut self, qstep: f64) -> Result<(), EvalError> {
        if !(qstep > SQRT_DOUBLE_EPS && qstep.is_finite()) {
            return Err(EvalError::InvalidParameter { name: "qstep", value: qstep });
        }
        self.qstep = qstep;
        self.qgrid_ticker.click();
        Ok(())
    }

    pub fn set_precision(&mut self, precision: f64) -> Result<(), EvalError> {
        ensure_non_negative("debye-precision", precision)?;
        if precision != self.precision {
            self.precision = precision;
            self.core.click();
        }
        Ok(())
    }

    pub fn scattering_factor(&self, atom_type: &str) -> f64
    { self.scattering_factors.get(atom_type).cloned().unwrap_or(1.0) }

    pub fn set_scattering_factor(&mut self, atom_type: &str, factor: f64) -> Result<(), EvalError> {
        if !factor.is_finite() {
            return Err(EvalError::InvalidParameter { name: "scattering-factor", value: factor });
        }
        self.scattering_factors.insert(atom_type.to_string(), factor);
        self.table_ticker.click();
        Ok(())
    }

    /// Index of the first Q point that is computed.
    pub fn qmin_points(&self) -> usize
    { (self.qmin / self.qstep) as usize }

    /// Length of the Q grid, which always starts at zero.
    pub fn total_q_points(&self) -> usize {
        let dq = self.qstep;
        let mut total = (self.qmax / dq).ceil() as usize;
        // include qmax when it is a close multiple of dq
        if (self.qmax - total as f64 * dq).abs() <= SQRT_DOUBLE_EPS {
            total += 1;
        }
        total
    }

    pub fn q_grid(&self) -> Vec<f64>
    { (0..self.total_q_points()).map(|k| k as f64 * self.qstep).collect() }

    /// The sum normalized per unit of occupancy and average squared scattering factor.
    pub fn f_of_q(&self) -> Vec<f64> {
        let mut out = self.core.value().to_vec();
        let norm = self.cache.average_factor.powi(2) * self.cache.total_occupancy;
        let scale = match norm == 0.0 {
            true => 0.0,
            false => 1.0 / norm,
        };
        for x in out.iter_mut().skip(self.qmin_points()) {
            *x *= scale;
        }
        out
    }

    fn cache_structure_data(&mut self) {
        let cache = match self.core.structure() {
            None => StructureCache::default(),
            Some(structure) => {
                let n = structure.site_count();
                let site_factors: Vec<f64> = (0..n).map(|i| {
                    let site = structure.site(i);
                    self.scattering_factor(&site.atom_type) * site.occupancy
                }).collect();
                let site_uiso = (0..n).map(|i| structure.site(i).uiso).collect();

                let total_occupancy = structure.total_occupancy();
                let sum: f64 = site_factors.iter().sum();
                let average_factor = match total_occupancy > SQRT_DOUBLE_EPS {
                    true => sum / total_occupancy,
                    false => sum,
                };
                StructureCache { site_factors, site_uiso, average_factor, total_occupancy }
            },
        };
        self.cache = cache;
    }
}

impl PairQuantity for DebyeSum {
    fn core(&self) -> &QuantityCore { &self.core }
    fn core_mut(&mut self) -> &mut QuantityCore { &mut self.core }

    fn value_size(&self) -> usize { self.total_q_points() }

    fn reset_value(&mut self) {
        self.cache_structure_data();
        let len = self.value_size();
        self.core.reset_value(len);
    }

    fn add_pair_contribution(&mut self, pair: &dyn PairTraversal, scale: i32) {
        let dist = pair.distance();
        if dist.abs() <= SQRT_DOUBLE_EPS {
            return;
        }
        let (a, b) = (pair.site_a(), pair.site_b());
        let factor = f64::from(scale) * self.cache.site_factors[a] * self.cache.site_factors[b] / dist;
        let sigma_sq = self.cache.site_uiso[a] + self.cache.site_uiso[b];

        let (start, end) = (self.qmin_points(), self.total_q_points());
        let (qstep, precision) = (self.qstep, self.precision);
        let value = self.core.value_mut();
        for kq in start..end {
            let q = kq as f64 * qstep;
            let sine_scale = factor * (-0.5 * sigma_sq * q * q).exp();
            if sine_scale.abs() < precision {
                break;
            }
            value[kq] += sine_scale * (q * dist).sin();
        }
    }

    fn ticker(&self) -> EventTicker {
        let mut ticker = self.core.ticker();
        ticker.update_from(&self.qgrid_ticker);
        ticker.update_from(&self.table_ticker);
        ticker
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn q_grid() {
        let mut debye = DebyeSum::new();
        assert_eq!(debye.total_q_points(), 201);
        assert_eq!(debye.qmin_points(), 0);

        debye.set_qmin(1.0).unwrap();
        debye.set_qmax(2.0).unwrap();
        debye.set_qstep(0.25).unwrap();
        assert_eq!(debye.qmin_points(), 4);
        assert_eq!(debye.q_grid(), vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0]);

        // qmax between grid points is not included
        debye.set_qmax(2.1).unwrap();
        assert_eq!(debye.total_q_points(), 9);
    }

    #[test]
    fn settings_are_validated() {
        let mut debye = DebyeSum::new();
        assert_eq!(debye.set_qmin(-1.0), Err(EvalError::InvalidParameter { name: "qmin", value: -1.0 }));
        assert!(debye.set_qmax(-0.5).is_err());
        assert!(debye.set_qstep(0.0).is_err());
        assert!(debye.set_qstep(-0.1).is_err());
        assert!(debye.set_precision(-1e-3).is_err());
        assert!(debye.set_scattering_factor("Ni", std::f64::INFINITY).is_err());
        assert_eq!(debye.qstep(), 0.05);
    }

    #[test]
    fn sub_tickers_are_merged() {
        let mut debye = DebyeSum::new();
        let t0 = debye.ticker();

        debye.set_qmax(5.0).unwrap();
        let t1 = debye.ticker();
        assert!(t1 > t0);

        debye.set_scattering_factor("Ni", 2.0).unwrap();
        let t2 = debye.ticker();
        assert!(t2 > t1);

        debye.set_rmax(4.0);
        assert!(debye.ticker() > t2);
        assert_eq!(debye.scattering_factor("Ni"), 2.0);
        assert_eq!(debye.scattering_factor("Cu"), 1.0);
    }
}
