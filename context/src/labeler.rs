// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Labeling data items relative to a test item, and splitting labels into
//! contiguous partitions.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{ContextError, Exemplar, Label, MissingDataCompare};

/// A contiguous, non-empty range of label positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LabelMask {
    start: usize,
    len: usize,
}

impl LabelMask {
    /// The range `start..start + len`; `len` must be positive.
    pub fn new(start: usize, len: usize) -> Result<Self, ContextError> {
        if len == 0 {
            return Err(ContextError::EmptyMask(start));
        }
        Ok(LabelMask { start, len })
    }

    /// First covered position.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of covered positions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// One past the last covered position.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

impl Display for LabelMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

/// Produces labels for data items by comparing them with a fixed test item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labeler {
    test: Exemplar,
    compare: MissingDataCompare,
    ignore_unknowns: bool,
    // feature index for each label position
    positions: Vec<usize>,
}

impl Labeler {
    /// A labeler for `test`. With `ignore_unknowns`, features missing in the
    /// test item are left out of labels altogether.
    pub fn new(test: Exemplar, compare: MissingDataCompare, ignore_unknowns: bool) -> Self {
        let positions = (0..test.len())
            .filter(|&f| !(ignore_unknowns && test.value(f).is_missing()))
            .collect();
        Labeler {
            test,
            compare,
            ignore_unknowns,
            positions,
        }
    }

    /// The test item.
    pub fn test_item(&self) -> &Exemplar {
        &self.test
    }

    /// The missing data policy.
    pub fn missing_data_compare(&self) -> MissingDataCompare {
        self.compare
    }

    /// Whether features unknown in the test item are left out.
    pub fn ignore_unknowns(&self) -> bool {
        self.ignore_unknowns
    }

    /// Number of label positions.
    pub fn cardinality(&self) -> usize {
        self.positions.len()
    }

    /// Whether feature `feature` of the test item is left out of labels.
    pub fn is_ignored(&self, feature: usize) -> bool {
        self.ignore_unknowns && self.test.value(feature).is_missing()
    }

    /// The label of `data` relative to the test item.
    pub fn label(&self, data: &Exemplar) -> Result<Label, ContextError> {
        if data.len() != self.test.len() {
            return Err(ContextError::CardinalityMismatch {
                expected: self.test.len(),
                found: data.len(),
            });
        }
        let mismatches = self.positions.iter().enumerate().filter_map(|(pos, &f)| {
            let (t, d) = (self.test.value(f), data.value(f));
            let matches = if t.is_missing() || d.is_missing() {
                self.compare.matches(t, d)
            } else {
                t == d
            };
            (!matches).then_some(pos)
        });
        Label::from_mismatches(self.cardinality(), mismatches)
    }

    /// The label matching the test item everywhere.
    pub fn lattice_top(&self) -> Label {
        Label::all_match(self.cardinality())
    }

    /// The label mismatching the test item everywhere.
    pub fn lattice_bottom(&self) -> Label {
        Label::all_mismatch(self.cardinality())
    }

    /// The test item's considered values, with each mismatch of `label`
    /// shown as `*`.
    pub fn context_string(&self, label: &Label) -> Result<String, ContextError> {
        if label.cardinality() != self.cardinality() {
            return Err(ContextError::CardinalityMismatch {
                expected: self.cardinality(),
                found: label.cardinality(),
            });
        }
        let context = self
            .positions
            .iter()
            .zip(label.iter())
            .map(|(&f, mismatch)| {
                if mismatch {
                    "*".to_string()
                } else {
                    self.test.value(f).to_string()
                }
            })
            .join(" ");
        Ok(context)
    }

    /// The test item's considered values.
    pub fn instance_string(&self) -> String {
        self.positions
            .iter()
            .map(|&f| self.test.value(f))
            .join(" ")
    }

    /// Masks splitting this labeler's labels into `num_partitions` ranges.
    pub fn masks(&self, num_partitions: usize) -> Result<Vec<LabelMask>, ContextError> {
        Self::get_masks(self.cardinality(), num_partitions)
    }

    /// Split `cardinality` positions into `num_partitions` contiguous ranges
    /// whose sizes differ by at most one, the larger ranges coming last.
    /// More partitions than positions yields one range per position.
    pub fn get_masks(
        cardinality: usize,
        num_partitions: usize,
    ) -> Result<Vec<LabelMask>, ContextError> {
        if num_partitions == 0 || cardinality == 0 {
            return Err(ContextError::InvalidPartitionCount {
                requested: num_partitions,
                cardinality,
            });
        }
        let n = num_partitions.min(cardinality);
        let base = cardinality / n;
        let remainder = cardinality % n;
        let mut start = 0;
        let mut masks = Vec::with_capacity(n);
        for i in 0..n {
            let len = base + usize::from(i >= n - remainder);
            masks.push(LabelMask::new(start, len)?);
            start += len;
        }
        Ok(masks)
    }
}
