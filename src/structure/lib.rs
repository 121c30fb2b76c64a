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

//! Site-indexed structures, as seen by pair sums.
//!
//! The central items are the [`StructureView`] and [`PairTraversal`] traits.
//! [`PeriodicStructure`] and [`AtomicStructure`] are reference implementations.

#[macro_use] extern crate failure;
#[macro_use] extern crate itertools;

pub type FailResult<T> = Result<T, failure::Error>;

mod core;
mod view;
mod periodic;
mod atoms;
pub mod samples;

//---------------------------
// public reexports; API

pub use crate::core::vector::{V3, M33, dot};
pub use crate::core::lattice::Lattice;
pub use crate::core::coords::CoordsKind;
pub use crate::core::site::Site;

pub use crate::view::{StructureView, PairTraversal, PartnerSearch, SearchTraversal, DEFAULT_RMAX};
pub use crate::periodic::PeriodicStructure;
pub use crate::atoms::AtomicStructure;
