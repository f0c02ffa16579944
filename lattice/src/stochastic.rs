// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Randomized approximation of the exhaustive lattice.
//!
//! Instead of visiting lattice points, each subcontext `p` is counted
//! directly: of the `2^m` points at or below `p` (`m` = number of matching
//! positions of its label), those also reached by a subcontext that
//! disagrees with `p` are heterogeneous. The points reached by both `p` and
//! `x` lie below the intersection `p ∩ x`, so the heterogeneous points are
//! the union of the down-sets of the labels in `H(p) = { p ∩ x }`. That union
//! is bounded by counting the down-sets by size and scaled by the
//! fraction of random unions of `H(p)` found to be heterogeneous.

use context::{numeric, Label, SubcontextList};
use num_bigint::BigUint;
use num_traits::{CheckedSub, Zero};
use rand::Rng;

use crate::supra::{Homogeneity, Supracontext};
use crate::{Cancel, Lattice, LatticeError};

/// Number of random unions drawn per subcontext unless configured.
pub const DEFAULT_SAMPLES: usize = 1000;

/// Estimates each subcontext's homogeneous point count by sampling.
///
/// Every subcontext becomes its own supracontext. Results are reproducible
/// for a given random number generator state.
#[derive(Clone, Debug)]
pub struct StochasticLattice<R: Rng> {
    rng: R,
    samples: usize,
}

impl<R: Rng> StochasticLattice<R> {
    /// Sample [`DEFAULT_SAMPLES`] unions per subcontext from `rng`.
    pub fn new(rng: R) -> Self {
        Self::with_samples(rng, DEFAULT_SAMPLES)
    }

    /// Sample `samples` unions per subcontext; with none, counts are not
    /// reduced.
    pub fn with_samples(rng: R, samples: usize) -> Self {
        StochasticLattice { rng, samples }
    }

    /// Labels of the points shared with every disagreeing subcontext.
    fn heterogeneous_intersections(
        subs: &SubcontextList,
        p: usize,
    ) -> Result<Vec<Label>, LatticeError> {
        let sub = subs.get(p);
        let start = Homogeneity::Empty.with(sub.outcome());
        let mut out = vec![];
        for (x, other) in subs.iter().enumerate() {
            if x != p && start.with(other.outcome()) == Homogeneity::Heterogeneous {
                out.push(sub.label().intersect(other.label())?);
            }
        }
        Ok(out)
    }

    /// Fraction (as numerator and denominator) of random non-empty unions of
    /// `labels` that lie below some label of `labels`.
    fn heterogeneous_ratio(&mut self, labels: &[Label]) -> Result<(usize, usize), LatticeError> {
        let (mut hits, mut draws) = (0, 0);
        for _ in 0..self.samples {
            let mut union: Option<Label> = None;
            for l in labels {
                if self.rng.gen_bool(0.5) {
                    union = Some(match union {
                        Some(u) => u.union(l)?,
                        None => l.clone(),
                    });
                }
            }
            let Some(union) = union else { continue };
            draws += 1;
            if labels.iter().any(|l| union.is_descendant_of(l)) {
                hits += 1;
            }
        }
        Ok((hits, draws))
    }

    fn estimate(&mut self, subs: &SubcontextList, p: usize) -> Result<BigUint, LatticeError> {
        let size = subs.get(p).label().num_matches();
        let points = numeric::pow2(size);
        let hetero = Self::heterogeneous_intersections(subs, p)?;
        if hetero.is_empty() {
            return Ok(points);
        }
        let most_matches = hetero.iter().map(Label::num_matches).max().unwrap_or(0);
        let upper: BigUint = (1..=most_matches)
            .map(|k| numeric::binomial(size, k))
            .sum();
        let (hits, draws) = self.heterogeneous_ratio(&hetero)?;
        if draws == 0 {
            return Ok(points);
        }
        let estimate = upper * hits / draws;
        Ok(points.checked_sub(&estimate).unwrap_or_else(BigUint::zero))
    }
}

impl<R: Rng> Lattice for StochasticLattice<R> {
    fn name(&self) -> &'static str {
        "stochastic"
    }

    fn build(
        &mut self,
        subs: &SubcontextList,
        cancel: &Cancel,
    ) -> Result<Vec<Supracontext>, LatticeError> {
        let mut supras = vec![];
        for (p, sub) in subs.iter().enumerate() {
            cancel.check()?;
            let count = self.estimate(subs, p)?;
            if !count.is_zero() {
                supras.push(Supracontext::new(vec![p], sub.outcome(), count));
            }
        }
        log::debug!(
            "estimated {} supracontexts from {} samples each",
            supras.len(),
            self.samples
        );
        Ok(supras)
    }
}
