// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Combining the supracontexts of lattices built over disjoint label ranges.
//!
//! A point of the full lattice is a tuple of points, one per sub-lattice,
//! and the subcontexts it reaches are those reached in every coordinate.
//! Combining two lists therefore intersects every pair of subcontext sets
//! and multiplies their counts; equal intersections are merged by adding
//! counts. The operation is associative and commutative, so sub-lattices
//! can be combined in any grouping. Only the last step removes
//! heterogeneous supracontexts, since pruning earlier would lose points
//! that become homogeneous once intersected further.

use context::{SubcontextId, SubcontextList};
use rayon::prelude::*;

use crate::supra::{Homogeneity, SupraSet, Supracontext};
use crate::{Cancel, LatticeError};

fn intersection(a: &[SubcontextId], b: &[SubcontextId]) -> Vec<SubcontextId> {
    let (mut i, mut j) = (0, 0);
    let mut out = vec![];
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn combine_with(
    a: &[Supracontext],
    b: &[Supracontext],
    subs: &SubcontextList,
    keep_heterogeneous: bool,
) -> Vec<Supracontext> {
    a.par_iter()
        .fold(SupraSet::new, |mut set, x| {
            for y in b {
                let ids = intersection(x.subcontexts(), y.subcontexts());
                if ids.is_empty() {
                    continue;
                }
                let homogeneity = Homogeneity::of(&ids, subs);
                if !keep_heterogeneous && homogeneity == Homogeneity::Heterogeneous {
                    continue;
                }
                if let Some(outcome) = homogeneity.outcome() {
                    set.add(ids, outcome, x.count() * y.count());
                }
            }
            set
        })
        .reduce(SupraSet::new, SupraSet::merge)
        .into_sorted_vec()
}

/// Combine two intermediate lists, keeping heterogeneous intersections.
pub fn combine(
    a: &[Supracontext],
    b: &[Supracontext],
    subs: &SubcontextList,
) -> Vec<Supracontext> {
    combine_with(a, b, subs, true)
}

/// Combine the last two lists, keeping only homogeneous intersections.
pub fn combine_final(
    a: &[Supracontext],
    b: &[Supracontext],
    subs: &SubcontextList,
) -> Vec<Supracontext> {
    combine_with(a, b, subs, false)
}

/// The homogeneous supracontexts of a single, already complete list.
pub fn homogeneous_only(supras: Vec<Supracontext>, subs: &SubcontextList) -> Vec<Supracontext> {
    supras
        .into_iter()
        .filter(|s| Homogeneity::of(s.subcontexts(), subs) != Homogeneity::Heterogeneous)
        .collect()
}

fn reduce(
    mut parts: Vec<Vec<Supracontext>>,
    subs: &SubcontextList,
    cancel: &Cancel,
) -> Result<Vec<Supracontext>, LatticeError> {
    if parts.len() <= 1 {
        return Ok(parts.pop().unwrap_or_default());
    }
    let right = parts.split_off(parts.len() / 2);
    let (left, right) = rayon::join(
        || reduce(parts, subs, cancel),
        || reduce(right, subs, cancel),
    );
    let (left, right) = (left?, right?);
    cancel.check()?;
    Ok(combine(&left, &right, subs))
}

/// Combine any number of sub-lattices as a balanced tree, applying the
/// final combination at the root.
pub fn combine_all(
    mut parts: Vec<Vec<Supracontext>>,
    subs: &SubcontextList,
    cancel: &Cancel,
) -> Result<Vec<Supracontext>, LatticeError> {
    if parts.len() <= 1 {
        return Ok(homogeneous_only(parts.pop().unwrap_or_default(), subs));
    }
    let right = parts.split_off(parts.len() / 2);
    let (left, right) = rayon::join(
        || reduce(parts, subs, cancel),
        || reduce(right, subs, cancel),
    );
    let (left, right) = (left?, right?);
    cancel.check()?;
    Ok(combine_final(&left, &right, subs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{chapter3, counts};
    use context::{MissingDataCompare, Outcome};
    use num_bigint::BigUint;

    fn supra(ids: &[usize], count: u32) -> Supracontext {
        Supracontext::new(ids.to_vec(), Outcome::Nondeterministic, BigUint::from(count))
    }

    #[test]
    fn intersections() {
        assert_eq!(intersection(&[0, 2, 3, 7], &[1, 2, 7, 9]), vec![2, 7]);
        assert!(intersection(&[0, 1], &[2, 3]).is_empty());
    }

    #[test]
    fn multiplies_and_merges() {
        // subcontexts: 0 nondeterministic, 1..=3 all class 1
        let subs = chapter3(MissingDataCompare::Match);
        let a = vec![supra(&[0, 1, 2], 2), supra(&[1, 3], 3)];
        let b = vec![supra(&[1, 2], 5), supra(&[1, 3], 1), supra(&[0], 7), supra(&[0, 1], 1)];
        let combined = combine(&a, &b, &subs);
        assert_eq!(
            counts(&combined),
            vec![
                (vec![0], 14),
                (vec![0, 1], 2),
                (vec![1], 20),
                (vec![1, 2], 10),
                (vec![1, 3], 3)
            ]
        );
        assert_eq!(combined[1].outcome(), Outcome::Nondeterministic);
        assert_eq!(combined[2].outcome(), Outcome::Class(1));

        let last = combine_final(&a, &b, &subs);
        assert_eq!(
            counts(&last),
            vec![(vec![0], 14), (vec![1], 20), (vec![1, 2], 10), (vec![1, 3], 3)]
        );
    }

    #[test]
    fn single_part_is_filtered() {
        let subs = chapter3(MissingDataCompare::Match);
        let only = vec![supra(&[0], 2), supra(&[0, 1], 1), supra(&[2, 3], 4)];
        let result = combine_all(vec![only], &subs, &Cancel::new()).unwrap();
        assert_eq!(counts(&result), vec![(vec![0], 2), (vec![2, 3], 4)]);
        assert!(combine_all(vec![], &subs, &Cancel::new()).unwrap().is_empty());
    }
}
