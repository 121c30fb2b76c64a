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

//! Reference implementations of [`PairQuantity`](crate::PairQuantity).

mod neighbors;
mod bonds;
mod debye;

pub use self::neighbors::NeighborCount;
pub use self::bonds::{Bond, BondCalculator};
pub use self::debye::{DebyeSum, DEFAULT_DEBYE_PRECISION};
