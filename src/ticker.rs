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

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// High 32 bits are the major counter, low 32 bits the minor one, so that a
// plain increment carries from minor into major.
static GLOBAL_TICK: AtomicU64 = AtomicU64::new(0);

const MINOR_BITS: u32 = 32;
const MINOR_MASK: u64 = (1 << MINOR_BITS) - 1;

/// A stamp from the process-wide logical clock.
///
/// Every `click()` anywhere in the process produces a distinct, strictly newer
/// stamp, so two tickers can be compared to tell which object was modified
/// last.  A default-constructed ticker is older than any clicked one.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EventTicker {
    tick: u64,
}

impl EventTicker {
    pub fn new() -> Self
    { Self::default() }

    /// Advance the global clock and take its new value.
    pub fn click(&mut self) {
        self.tick = GLOBAL_TICK.fetch_add(1, Ordering::SeqCst) + 1;
    }

    /// Become `other` if it is newer.
    pub fn update_from(&mut self, other: &EventTicker) {
        if *other > *self {
            *self = *other;
        }
    }

    pub fn major(&self) -> u32 { (self.tick >> MINOR_BITS) as u32 }
    pub fn minor(&self) -> u32 { (self.tick & MINOR_MASK) as u32 }
}

impl fmt::Debug for EventTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventTicker({}, {})", self.major(), self.minor())
    }
}
