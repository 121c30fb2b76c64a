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

//! Round-robin partitioning of the pair loops between workers.
//!
//! Every worker runs the same loops in the same order.  At each chunk boundary
//! a worker consults its [`LoopChunker`], and skips the iteration unless it owns
//! it.  Since all workers count the same boundaries, the iterations they keep
//! are disjoint and together cover everything exactly once.

/// Default for [`choose_split`]'s `load_variance`.
pub const DEFAULT_LOAD_VARIANCE: f64 = 0.1;

/// Which of the two nested loops gets divided between workers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopSplit {
    /// One worker; nothing is skipped.
    Serial,
    /// Anchor sites are dealt out round-robin.
    Outer,
    /// Pairs within each anchor's inner loop are dealt out round-robin.
    Inner,
}

impl LoopSplit {
    pub fn chops_outer(self) -> bool { self == LoopSplit::Outer }
    pub fn chops_inner(self) -> bool { self == LoopSplit::Inner }
}

/// Decide how a double loop with `nsites` anchors is split over `ncpu` workers.
///
/// Splitting the outer loop is preferred when there are many more anchors than
/// workers (`ncpu <= (nsites - 1) * load_variance + 1`).  Otherwise the trailing
/// anchors of a half sum, which have few partners, would leave workers idle.
pub fn choose_split(ncpu: usize, nsites: usize, load_variance: f64) -> LoopSplit {
    if ncpu <= 1 {
        return LoopSplit::Serial;
    }
    let threshold = nsites.saturating_sub(1) as f64 * load_variance + 1.0;
    match ncpu as f64 <= threshold {
        true => LoopSplit::Outer,
        false => LoopSplit::Inner,
    }
}

/// The running counter of one worker.
#[derive(Debug, Clone)]
pub struct LoopChunker {
    counter: usize,
    ncpu: usize,
}

impl LoopChunker {
    /// `ncpu` must be nonzero.
    pub fn new(cpu_index: usize, ncpu: usize) -> Self {
        debug_assert!(ncpu >= 1);
        debug_assert!(cpu_index < ncpu);
        LoopChunker { counter: cpu_index, ncpu }
    }

    /// Count one chunk boundary, and report whether this worker owns it.
    pub fn next_is_mine(&mut self) -> bool {
        let n = self.counter;
        self.counter += 1;
        n % self.ncpu == 0
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn split_choice() {
        assert_eq!(choose_split(1, 1000, 0.1), LoopSplit::Serial);
        assert_eq!(choose_split(4, 100, 0.1), LoopSplit::Outer);
        assert_eq!(choose_split(4, 4, 0.1), LoopSplit::Inner);
        assert_eq!(choose_split(2, 0, 0.1), LoopSplit::Inner);

        // boundary is inclusive: (11 - 1) * 0.1 + 1 == 2
        assert_eq!(choose_split(2, 11, 0.1), LoopSplit::Outer);
        assert_eq!(choose_split(2, 10, 0.1), LoopSplit::Inner);

        // a large variance always splits the outer loop
        assert_eq!(choose_split(8, 2, 10.0), LoopSplit::Outer);
    }

    // A ragged double loop resembling a half sum.
    fn visit(split: LoopSplit, cpu_index: usize, ncpu: usize) -> Vec<(usize, usize)> {
        let mut chunker = LoopChunker::new(cpu_index, ncpu);
        let mut out = vec![];
        for i in 0..9 {
            if split.chops_outer() && !chunker.next_is_mine() {
                continue;
            }
            for j in 0..=i {
                if split.chops_inner() && !chunker.next_is_mine() {
                    continue;
                }
                out.push((i, j));
            }
        }
        out
    }

    #[test]
    fn workers_partition_the_loop() {
        let mut expected = visit(LoopSplit::Serial, 0, 1);
        expected.sort();

        for &split in &[LoopSplit::Outer, LoopSplit::Inner] {
            for ncpu in 1..6 {
                let mut all: Vec<_> = (0..ncpu).flat_map(|cpu| visit(split, cpu, ncpu)).collect();
                all.sort();
                assert_eq!(all, expected, "{:?} with {} cpus", split, ncpu);
            }
        }
    }

    #[test]
    fn single_worker_owns_everything() {
        let mut c = LoopChunker::new(0, 1);
        assert!((0..20).all(|_| c.next_is_mine()));
    }
}
