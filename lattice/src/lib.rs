// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! The supracontextual lattice.
//!
//! Every lattice point is a subset of the test item's features; the
//! subcontexts it reaches are those whose labels match the test item on all
//! of them. Points reaching subcontexts that disagree in outcome are
//! heterogeneous and contribute nothing. A [`Lattice`] turns a
//! [`SubcontextList`] into the list of homogeneous [`Supracontext`]s, each
//! with the number of points reaching it.
//!
//! Three strategies are provided: [`BasicLattice`] visits every point,
//! [`DistributedLattice`] fills lattices over label ranges in parallel and
//! combines them, and [`StochasticLattice`] estimates counts by sampling.

// configure clippy
#![allow(clippy::needless_return)]
#![allow(clippy::new_without_default)]
#![deny(clippy::uninlined_format_args)]
#![allow(clippy::len_without_is_empty)]
// documentation-related lints (only checked when running rustdoc)
#![warn(missing_docs)]
#![allow(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::broken_intra_doc_links)]

use context::{ContextError, SubcontextList};
use thiserror::Error;

mod basic;
mod cancel;
pub mod combine;
mod distributed;
mod fill;
mod heterogeneous;
mod stochastic;
mod supra;
#[cfg(test)]
mod test_util;

pub use basic::BasicLattice;
pub use cancel::Cancel;
pub use distributed::DistributedLattice;
pub use heterogeneous::HeterogeneousLattice;
pub use stochastic::{StochasticLattice, DEFAULT_SAMPLES};
pub use supra::{Homogeneity, SupraSet, Supracontext};

/// Reasons a lattice could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// Labels could not be masked or combined
    #[error("{0}")]
    Context(#[from] ContextError),
    /// The build was cancelled before it finished
    #[error("lattice construction was cancelled")]
    Cancelled,
    /// A distributed lattice needs at least two partitions
    #[error("a distributed lattice needs at least two sub-lattices, got {0}")]
    TooFewLattices(usize),
}

/// A strategy for building the supracontextual lattice.
pub trait Lattice {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Build the homogeneous supracontexts for `subs`. Nothing partial is
    /// returned when `cancel` trips.
    fn build(
        &mut self,
        subs: &SubcontextList,
        cancel: &Cancel,
    ) -> Result<Vec<Supracontext>, LatticeError>;
}
