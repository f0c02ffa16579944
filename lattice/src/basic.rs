// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

use context::{numeric, SubcontextList};

use crate::fill::Filler;
use crate::supra::Supracontext;
use crate::{Cancel, Lattice, LatticeError};

/// The exhaustive lattice: every point reachable from a subcontext is
/// visited, and points turning heterogeneous are pruned as soon as they do.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicLattice;

impl BasicLattice {
    /// The exhaustive lattice builder.
    pub fn new() -> Self {
        BasicLattice
    }
}

impl Lattice for BasicLattice {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn build(
        &mut self,
        subs: &SubcontextList,
        cancel: &Cancel,
    ) -> Result<Vec<Supracontext>, LatticeError> {
        if subs.is_empty() || subs.cardinality() == 0 {
            return Ok(vec![]);
        }
        if subs.len() == 1 {
            // every point at or below the lone subcontext reaches it
            let sub = subs.get(0);
            let count = numeric::pow2(sub.label().num_matches());
            return Ok(vec![Supracontext::new(vec![0], sub.outcome(), count)]);
        }
        let supras = Filler::new(true).fill(subs, cancel, |label| Ok(label.clone()))?;
        log::debug!(
            "exhaustive lattice over {} subcontexts has {} supracontexts",
            subs.len(),
            supras.len()
        );
        Ok(supras)
    }
}
