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

pub type FailResult<T> = Result<T, failure::Error>;

/// Errors reported by evaluators and pair quantities.
///
/// Everything except [`EvalError::ConsistencyViolation`] is a configuration
/// error, raised at the point of misuse.  A consistency violation means the
/// incremental path has a bug; it is never recovered from.
///
/// Silent fallbacks to full recomputation are not errors and never show up here.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum EvalError {
    #[fail(display = "Number of CPU ncpu must be at least 1 (got {}).", ncpu)]
    InvalidWorkerCount { ncpu: usize },

    #[fail(display = "CPU index {} is out of range for {} CPUs.", cpu_index, ncpu)]
    InvalidWorkerIndex { cpu_index: usize, ncpu: usize },

    #[fail(display = "Invalid evaluator type {:?}.", name)]
    InvalidStrategyName { name: String },

    #[fail(display = "Invalid value for {}: {}", name, value)]
    InvalidParameter { name: &'static str, value: f64 },

    #[fail(display = "Inconsistent results from incremental evaluation: {}", detail)]
    ConsistencyViolation { detail: String },
}

impl EvalError {
    pub fn is_config_error(&self) -> bool {
        match self {
            EvalError::ConsistencyViolation { .. } => false,
            EvalError::InvalidWorkerCount { .. } |
            EvalError::InvalidWorkerIndex { .. } |
            EvalError::InvalidStrategyName { .. } |
            EvalError::InvalidParameter { .. } => true,
        }
    }
}
