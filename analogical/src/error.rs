// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

use context::ContextError;
use lattice::LatticeError;
use thiserror::Error;

/// Reasons a prediction could not be made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmError {
    /// The test item or training data could not be labeled
    #[error("{0}")]
    Context(#[from] ContextError),
    /// The lattice could not be built
    #[error("{0}")]
    Lattice(#[from] LatticeError),
    /// The configuration is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
