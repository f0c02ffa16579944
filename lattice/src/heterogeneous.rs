// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

use context::{LabelMask, SubcontextList};

use crate::fill::Filler;
use crate::supra::Supracontext;
use crate::{Cancel, Lattice, LatticeError};

/// A lattice over one contiguous range of label positions, filled without
/// homogeneity pruning. Heterogeneous supracontexts are kept (marked
/// nondeterministic) so that sub-lattices can later be combined.
#[derive(Clone, Copy, Debug)]
pub struct HeterogeneousLattice {
    mask: LabelMask,
}

impl HeterogeneousLattice {
    /// A lattice over the positions covered by `mask`.
    pub fn new(mask: LabelMask) -> Self {
        HeterogeneousLattice { mask }
    }

    /// The covered label positions.
    pub fn mask(&self) -> LabelMask {
        self.mask
    }
}

impl Lattice for HeterogeneousLattice {
    fn name(&self) -> &'static str {
        "heterogeneous"
    }

    fn build(
        &mut self,
        subs: &SubcontextList,
        cancel: &Cancel,
    ) -> Result<Vec<Supracontext>, LatticeError> {
        if subs.is_empty() {
            return Ok(vec![]);
        }
        let mask = self.mask;
        Filler::new(false).fill(subs, cancel, |label| Ok(label.mask(&mask)?))
    }
}
