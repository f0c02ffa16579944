// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

use std::time::Instant;

use context::{Labeler, SubcontextList};
use rayon::prelude::*;

use crate::combine::combine_all;
use crate::heterogeneous::HeterogeneousLattice;
use crate::supra::Supracontext;
use crate::{Cancel, Lattice, LatticeError};

/// Splits labels into contiguous ranges, fills an unpruned lattice for each
/// range in parallel, then combines the results.
///
/// Produces the same supracontexts and counts as
/// [`BasicLattice`](crate::BasicLattice) while each sub-lattice only has
/// `2^(cardinality / num_lattices)` points.
#[derive(Clone, Copy, Debug)]
pub struct DistributedLattice {
    num_lattices: usize,
}

impl DistributedLattice {
    /// Fails unless `num_lattices` is at least two.
    pub fn new(num_lattices: usize) -> Result<Self, LatticeError> {
        if num_lattices < 2 {
            return Err(LatticeError::TooFewLattices(num_lattices));
        }
        Ok(DistributedLattice { num_lattices })
    }

    /// Number of sub-lattices filled.
    pub fn num_lattices(&self) -> usize {
        self.num_lattices
    }
}

impl Lattice for DistributedLattice {
    fn name(&self) -> &'static str {
        "distributed"
    }

    fn build(
        &mut self,
        subs: &SubcontextList,
        cancel: &Cancel,
    ) -> Result<Vec<Supracontext>, LatticeError> {
        if subs.is_empty() || subs.cardinality() == 0 {
            return Ok(vec![]);
        }
        let masks = Labeler::get_masks(subs.cardinality(), self.num_lattices)?;
        if masks.len() < 2 {
            return Err(LatticeError::TooFewLattices(masks.len()));
        }
        let start = Instant::now();
        let parts = masks
            .par_iter()
            .map(|mask| HeterogeneousLattice::new(*mask).build(subs, cancel))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "filled {} sub-lattices ({} supracontexts) in {:0.1}s",
            parts.len(),
            parts.iter().map(Vec::len).sum::<usize>(),
            start.elapsed().as_secs_f64()
        );
        let supras = combine_all(parts, subs, cancel)?;
        log::debug!(
            "combined into {} supracontexts in {:0.1}s",
            supras.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(supras)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{chapter3, counts, random_subcontexts};
    use crate::BasicLattice;
    use context::MissingDataCompare;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_single_lattice() {
        assert_eq!(
            DistributedLattice::new(1).unwrap_err(),
            LatticeError::TooFewLattices(1)
        );
        let training = context::TrainingSet::new(
            vec!["a".to_string()],
            vec![context::Exemplar::known(&[1], Some(0))],
        )
        .unwrap();
        let labeler = Labeler::new(
            context::Exemplar::known(&[2], None),
            MissingDataCompare::Match,
            false,
        );
        let subs = SubcontextList::new(labeler, &training).unwrap();
        // a single feature cannot be split
        assert_eq!(
            DistributedLattice::new(3).unwrap().build(&subs, &Cancel::new()),
            Err(LatticeError::TooFewLattices(1))
        );
    }

    #[test]
    fn chapter3_matches_exhaustive() {
        let subs = chapter3(MissingDataCompare::Match);
        let expected = vec![(vec![0], 2), (vec![1], 1), (vec![1, 3], 1)];
        for n in 2..=5 {
            let supras = DistributedLattice::new(n)
                .unwrap()
                .build(&subs, &Cancel::new())
                .unwrap();
            assert_eq!(counts(&supras), expected, "{n} lattices");
        }
    }

    #[test]
    fn random_data_matches_exhaustive() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..60 {
            let subs = random_subcontexts(&mut rng, 8, 12);
            let exhaustive = BasicLattice::new().build(&subs, &Cancel::new()).unwrap();
            for n in 2..=subs.cardinality() {
                let distributed = DistributedLattice::new(n)
                    .unwrap()
                    .build(&subs, &Cancel::new())
                    .unwrap();
                assert_eq!(counts(&distributed), counts(&exhaustive), "{subs} with {n} lattices");
                for (d, e) in distributed.iter().zip(&exhaustive) {
                    assert_eq!(d.outcome(), e.outcome());
                }
            }
        }
    }

    #[test]
    fn cancelled() {
        let subs = chapter3(MissingDataCompare::Match);
        let cancel = Cancel::new();
        cancel.cancel();
        assert_eq!(
            DistributedLattice::new(2).unwrap().build(&subs, &cancel),
            Err(LatticeError::Cancelled)
        );
    }
}
