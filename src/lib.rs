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

//! Incrementally updated sums over pairs of sites.
//!
//! A [`PairQuantity`] accumulates the contributions of site pairs into a value
//! vector.  An [`Evaluator`] brings it up to date for a structure, either by
//! recomputing every pair ([`FromScratch`]), or by subtracting and adding only
//! the pairs that touch sites which changed since the previous structure
//! ([`Incremental`]).  [`Verifying`] does the latter and checks it against the
//! former.
//!
//! ```text
//! let mut pq = NeighborCount::with_rmax(3.0);
//! let mut ev = create_evaluator(EvaluatorKind::Incremental, None);
//! ev.update_value(&mut pq, &structure)?;
//! ```
//!
//! Logical clocks ([`EventTicker`]) decide when a previous result can be reused.

#[macro_use] extern crate failure;
#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;

pub extern crate rsp2_structure;

mod errors;
mod ticker;
mod chunk;
mod diff;
mod quantity;
mod evaluator;
mod config;
mod parallel;
pub mod calculators;

//---------------------------
// public reexports; API

pub use crate::errors::{EvalError, FailResult};
pub use crate::ticker::EventTicker;
pub use crate::chunk::{choose_split, LoopChunker, LoopSplit, DEFAULT_LOAD_VARIANCE};
pub use crate::diff::{complementary_indices, DiffMethod, StructureDiff};
pub use crate::quantity::{ExtraComparable, ExtraSnapshot, PairMask, PairQuantity, QuantityCore};
pub use crate::evaluator::{
    create_evaluator, create_evaluator_by_name, value_tolerance,
    Evaluator, EvaluatorFlags, EvaluatorKind, EvaluatorSettings, ParallelConfig,
    FromScratch, Incremental, Verifying, SQRT_DOUBLE_EPS,
};
pub use crate::config::{EvaluatorConfig, Threading};
pub use crate::parallel::ParallelEvaluation;
pub use crate::calculators::{BondCalculator, DebyeSum, NeighborCount};
