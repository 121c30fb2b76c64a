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

#![allow(non_snake_case)]

//! Evaluator settings as read from YAML.
//!
//! ```yaml
//! kind: incremental
//! use-full-sum: false
//! fixed-site-index: false
//! threading:
//!   ncpu: 4
//!   cpu-index: 0
//!   load-variance: 0.1
//! ```

use crate::chunk::DEFAULT_LOAD_VARIANCE;
use crate::errors::{EvalError, FailResult};
use crate::evaluator::{create_evaluator, Evaluator, EvaluatorFlags, EvaluatorKind, ParallelConfig};

use std::io::Read;

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct EvaluatorConfig {
    #[serde(default="_evaluator_config__kind")]
    pub kind: EvaluatorKind,

    /// Sum over all ordered pairs rather than half of them.
    #[serde(default)]
    pub use_full_sum: bool,

    #[serde(default)]
    pub fixed_site_index: bool,

    #[serde(default)]
    pub threading: Threading,
}
fn _evaluator_config__kind() -> EvaluatorKind { EvaluatorKind::Incremental }

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Threading {
    /// Number of workers that share the pair loops.
    #[serde(default="_threading__ncpu")]
    pub ncpu: usize,

    /// This worker's index.  Ignored by `build_worker`.
    #[serde(default)]
    pub cpu_index: usize,

    /// Tolerated load imbalance when splitting the loop over anchor sites.
    #[serde(default="_threading__load_variance")]
    pub load_variance: f64,
}
fn _threading__ncpu() -> usize { 1 }
fn _threading__load_variance() -> f64 { DEFAULT_LOAD_VARIANCE }

impl Default for Threading {
    fn default() -> Self {
        Threading {
            ncpu: _threading__ncpu(),
            cpu_index: 0,
            load_variance: _threading__load_variance(),
        }
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            kind: _evaluator_config__kind(),
            use_full_sum: false,
            fixed_site_index: false,
            threading: Threading::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Read YAML, warning about any unrecognized keys.
    pub fn from_reader(mut r: impl Read) -> FailResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> FailResult<Self> {
        // serde_yaml rejects a document with no content
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(s)?;
        let value = match value {
            // an explicit null, "~"
            serde_yaml::Value::Null => serde_yaml::Value::Mapping(Default::default()),
            value => value,
        };

        match serde_ignored::deserialize(value, |path| warn!("Unused config item (possible typo?): {}", path)) {
            Ok(config) => Ok(config),
            Err(_) => {
                // errors through a Value lose their location; parse again for a better one
                let config: EvaluatorConfig = serde_yaml::from_str(s)?;
                Ok(config)
            },
        }
    }

    pub fn flags(&self) -> EvaluatorFlags {
        EvaluatorFlags {
            use_full_sum: self.use_full_sum,
            fixed_site_index: self.fixed_site_index,
        }
    }

    pub fn parallel(&self, cpu_index: usize) -> Result<ParallelConfig, EvalError> {
        ParallelConfig::new(cpu_index, self.threading.ncpu)?
            .with_load_variance(self.threading.load_variance)
    }

    /// Create the evaluator for the configured worker.
    pub fn build(&self) -> Result<Box<dyn Evaluator>, EvalError>
    { self.build_worker(self.threading.cpu_index) }

    /// Create the evaluator for one worker of the configured group.
    pub fn build_worker(&self, cpu_index: usize) -> Result<Box<dyn Evaluator>, EvalError> {
        let parallel = self.parallel(cpu_index)?;
        let mut evaluator = create_evaluator(self.kind, None);
        evaluator.set_flags(self.flags());
        evaluator.settings_mut().parallel = parallel;
        Ok(evaluator)
    }
}
