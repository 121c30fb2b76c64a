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

use rsp2_structure::StructureView;

use std::fmt;
use std::sync::Arc;

/// How two snapshots were compared.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiffMethod {
    /// The snapshots were treated as unrelated.
    General,
    /// The snapshots have equal length and were compared index by index.
    SideBySide,
}

/// The change between two structure snapshots, as seen by a pair sum.
///
/// `pop0` holds the indices (in the old structure) of sites whose pairs must be
/// subtracted, and `add1` the indices (in the new structure) of sites whose pairs
/// must be added.  Both are sorted.
#[derive(Clone)]
pub struct StructureDiff {
    pub stru0: Arc<dyn StructureView>,
    pub stru1: Arc<dyn StructureView>,
    pub pop0: Vec<usize>,
    pub add1: Vec<usize>,
    pub method: DiffMethod,
}

impl StructureDiff {
    pub fn between(stru0: &Arc<dyn StructureView>, stru1: &Arc<dyn StructureView>) -> Self {
        let n0 = stru0.site_count();
        let n1 = stru1.site_count();

        let (pop0, add1, method) = {
            if Arc::ptr_eq(stru0, stru1) {
                (vec![], vec![], DiffMethod::SideBySide)
            } else if n0 != n1 {
                ((0..n0).collect(), (0..n1).collect(), DiffMethod::General)
            } else if stru0.lattice() != stru1.lattice() {
                // every pair separation changes
                ((0..n0).collect(), (0..n1).collect(), DiffMethod::SideBySide)
            } else {
                let changed: Vec<usize> = {
                    (0..n0)
                        .filter(|&i| stru0.site(i) != stru1.site(i))
                        .collect()
                };
                (changed.clone(), changed, DiffMethod::SideBySide)
            }
        };

        StructureDiff {
            stru0: stru0.clone(),
            stru1: stru1.clone(),
            pop0, add1, method,
        }
    }

    pub fn is_empty(&self) -> bool
    { self.pop0.is_empty() && self.add1.is_empty() }

    /// Whether an incremental update is valid, and expected to be cheaper
    /// than recomputing the new sum.
    pub fn allows_fast_update(&self) -> bool {
        match self.method {
            DiffMethod::General => false,
            DiffMethod::SideBySide => {
                if self.is_empty() {
                    return true;
                }
                let n0 = self.stru0.site_count() as f64;
                let n1 = self.stru1.site_count() as f64;
                let npop = self.pop0.len() as f64;
                let nadd = self.add1.len() as f64;

                let fast_work = 2.0 * (npop * n0 + nadd * n1);
                let full_work = n0 * n0 + n1 * n1;
                fast_work < full_work
            },
        }
    }
}

impl fmt::Debug for StructureDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureDiff")
            .field("n0", &self.stru0.site_count())
            .field("n1", &self.stru1.site_count())
            .field("pop0", &self.pop0)
            .field("add1", &self.add1)
            .field("method", &self.method)
            .finish()
    }
}

/// The indices in `0..n` that are not in `indices`, in ascending order.
///
/// `indices` must be sorted.
pub fn complementary_indices(n: usize, indices: &[usize]) -> Vec<usize> {
    debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));

    let mut out = Vec::with_capacity(n.saturating_sub(indices.len()));
    let mut skip = indices.iter().cloned().peekable();
    for i in 0..n {
        if skip.peek() == Some(&i) {
            skip.next();
        } else {
            out.push(i);
        }
    }
    out
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use rsp2_structure::{samples, AtomicStructure, Lattice, Site, V3};

    fn share<S: StructureView + 'static>(s: S) -> Arc<dyn StructureView> { Arc::new(s) }

    #[test]
    fn identical_snapshot() {
        let s = share(samples::nickel_fcc());
        let diff = StructureDiff::between(&s, &s);
        assert!(diff.is_empty());
        assert_eq!(diff.method, DiffMethod::SideBySide);
        assert!(diff.allows_fast_update());
    }

    #[test]
    fn equal_but_distinct_snapshot() {
        let a = share(samples::nickel_fcc());
        let b = share(samples::nickel_fcc());
        let diff = StructureDiff::between(&a, &b);
        assert!(diff.is_empty());
        assert!(diff.allows_fast_update());
    }

    #[test]
    fn single_substitution() {
        let old = samples::nickel_supercell([2, 2, 2]);
        let mut new = old.clone();
        new.sites_mut()[5].atom_type = "Cu".into();

        let diff = StructureDiff::between(&share(old), &share(new));
        assert_eq!(diff.pop0, vec![5]);
        assert_eq!(diff.add1, vec![5]);
        assert_eq!(diff.method, DiffMethod::SideBySide);
        assert!(diff.allows_fast_update());
    }

    #[test]
    fn occupancy_and_uiso_count_as_changes() {
        let old = samples::nickel_fcc();
        let mut new = old.clone();
        new.sites_mut()[1].occupancy = 0.5;
        new.sites_mut()[3].uiso = 0.02;

        let diff = StructureDiff::between(&share(old), &share(new));
        assert_eq!(diff.pop0, vec![1, 3]);
        assert_eq!(diff.add1, vec![1, 3]);
    }

    #[test]
    fn everything_changed_is_not_fast() {
        let old = samples::nickel_fcc();
        let mut new = old.clone();
        for site in new.sites_mut() {
            site.cart += V3([0.01, 0.0, 0.0]);
        }
        let diff = StructureDiff::between(&share(old), &share(new));
        assert_eq!(diff.pop0.len(), 4);
        assert!(!diff.allows_fast_update());
    }

    #[test]
    fn lattice_change() {
        let old = samples::nickel_fcc();
        let mut new = old.clone();
        new.set_lattice(Lattice::cubic(3.6).unwrap());

        let diff = StructureDiff::between(&share(old), &share(new));
        assert_eq!(diff.method, DiffMethod::SideBySide);
        assert_eq!(diff.pop0, vec![0, 1, 2, 3]);
        assert_eq!(diff.add1, vec![0, 1, 2, 3]);
        assert!(!diff.allows_fast_update());
    }

    #[test]
    fn length_change_is_general() {
        let old = samples::nickel_cluster([1, 1, 1]);
        let mut new = old.clone();
        new.sites_mut().push(Site::new("Ni", V3([10.0, 10.0, 10.0])));

        let diff = StructureDiff::between(&share(old), &share(new));
        assert_eq!(diff.method, DiffMethod::General);
        assert_eq!(diff.pop0, vec![0, 1, 2, 3]);
        assert_eq!(diff.add1, vec![0, 1, 2, 3, 4]);
        assert!(!diff.allows_fast_update());
    }

    #[test]
    fn empty_structures() {
        let a = share(AtomicStructure::default());
        let b = share(AtomicStructure::default());
        let diff = StructureDiff::between(&a, &b);
        assert!(diff.is_empty());
        assert!(diff.allows_fast_update());
    }

    #[test]
    fn complement() {
        assert_eq!(complementary_indices(5, &[1, 3]), vec![0, 2, 4]);
        assert_eq!(complementary_indices(3, &[]), vec![0, 1, 2]);
        assert_eq!(complementary_indices(3, &[0, 1, 2]), Vec::<usize>::new());
        assert_eq!(complementary_indices(0, &[]), Vec::<usize>::new());
    }
}
