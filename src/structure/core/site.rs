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

use crate::V3;

/// Everything a pair quantity can know about one site.
///
/// Two sites compare equal only if every field is bitwise-equal; this is the
/// comparison used when diffing snapshots index-by-index.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Element or ion symbol, e.g. `"Ni"` or `"O2-"`.
    pub atom_type: String,
    pub cart: V3,
    pub occupancy: f64,
    /// Isotropic mean-square displacement.
    pub uiso: f64,
}

impl Site {
    /// A fully occupied site with no thermal displacement.
    pub fn new(atom_type: impl Into<String>, cart: V3) -> Self {
        Site {
            atom_type: atom_type.into(),
            cart,
            occupancy: 1.0,
            uiso: 0.0,
        }
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self
    { self.occupancy = occupancy; self }

    pub fn with_uiso(mut self, uiso: f64) -> Self
    { self.uiso = uiso; self }
}
