// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Failure to build labels or subcontexts from the given exemplars.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Two feature vectors or labels of different sizes were combined
    #[error("cardinality mismatch: expected {expected}, found {found}")]
    CardinalityMismatch {
        /// The size of the left-hand side (or of the test item)
        expected: usize,
        /// The offending size
        found: usize,
    },
    /// A mask was empty or reached past the end of a label
    #[error("invalid mask ({start}, {len}) for cardinality {cardinality}")]
    InvalidMask {
        /// First position covered by the mask
        start: usize,
        /// Number of positions covered by the mask
        len: usize,
        /// Cardinality of the label the mask was applied to
        cardinality: usize,
    },
    /// A label position past its cardinality was queried
    #[error("position {position} out of range for cardinality {cardinality}")]
    PositionOutOfRange {
        /// The queried position
        position: usize,
        /// Cardinality of the label
        cardinality: usize,
    },
    /// A mask covered no positions
    #[error("empty mask at position {0}")]
    EmptyMask(usize),
    /// Label parts did not cover every position exactly once
    #[error("label parts do not partition cardinality {0}")]
    IncompleteParts(usize),
    /// A label cannot be split into the requested number of partitions
    #[error("cannot split cardinality {cardinality} into {requested} partitions")]
    InvalidPartitionCount {
        /// The number of partitions asked for
        requested: usize,
        /// The cardinality being split
        cardinality: usize,
    },
    /// A raw bit pattern had bits set beyond the label's cardinality
    #[error("bits {bits:#b} do not fit in cardinality {cardinality}")]
    BitsOutOfRange {
        /// The offending pattern
        bits: u64,
        /// The requested cardinality
        cardinality: usize,
    },
    /// A training exemplar had no outcome
    #[error("training exemplar {0} has no outcome")]
    MissingOutcome(usize),
    /// A training exemplar's outcome does not name one of the classes
    #[error("training exemplar {index} has outcome {outcome} but there are only {num_classes} classes")]
    OutcomeOutOfRange {
        /// Position of the exemplar in the training set
        index: usize,
        /// The offending class index
        outcome: usize,
        /// Number of known classes
        num_classes: usize,
    },
}
