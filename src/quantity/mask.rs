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

use std::collections::HashSet;

/// Which site pairs take part in a sum.
///
/// Stored as a default flag plus the set of unordered pairs that differ from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PairMask {
    default: bool,
    exceptions: HashSet<(usize, usize)>,
}

impl Default for PairMask {
    fn default() -> Self
    { PairMask { default: true, exceptions: HashSet::new() } }
}

fn unordered(i: usize, j: usize) -> (usize, usize)
{ if i <= j { (i, j) } else { (j, i) } }

impl PairMask {
    pub fn new() -> Self
    { Self::default() }

    pub fn get(&self, i: usize, j: usize) -> bool {
        match self.exceptions.contains(&unordered(i, j)) {
            true => !self.default,
            false => self.default,
        }
    }

    pub fn set(&mut self, i: usize, j: usize, enabled: bool) {
        let key = unordered(i, j);
        if enabled == self.default {
            self.exceptions.remove(&key);
        } else {
            self.exceptions.insert(key);
        }
    }

    /// Set every pair to `enabled`, forgetting all exceptions.
    pub fn set_all(&mut self, enabled: bool) {
        self.default = enabled;
        self.exceptions.clear();
    }

    /// Whether any pair might be disabled.
    pub fn is_active(&self) -> bool
    { !self.default || !self.exceptions.is_empty() }
}
