// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Grouping training exemplars by label.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::hashmap::HashMap;
use crate::{ClassIndex, ContextError, Label, Labeler, Outcome, TrainingSet};

/// Position of a subcontext in its [`SubcontextList`].
pub type SubcontextId = usize;

/// The training exemplars sharing one label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subcontext {
    label: Label,
    exemplars: Vec<usize>,
    outcome: Outcome,
}

impl Subcontext {
    fn new(label: Label, exemplar: usize, class: ClassIndex) -> Self {
        Subcontext {
            label,
            exemplars: vec![exemplar],
            outcome: Outcome::Class(class),
        }
    }

    fn add(&mut self, exemplar: usize, class: ClassIndex) {
        self.exemplars.push(exemplar);
        self.outcome = self.outcome.merge(Outcome::Class(class));
    }

    /// The shared label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Indices into the training set, in training order.
    pub fn exemplars(&self) -> &[usize] {
        &self.exemplars
    }

    /// Number of exemplars.
    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    /// The shared class, or `Nondeterministic` if the exemplars disagree.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether the exemplars disagree.
    pub fn is_nondeterministic(&self) -> bool {
        self.outcome.is_nondeterministic()
    }
}

impl Display for Subcontext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}|{}|{})",
            self.label,
            self.outcome,
            self.exemplars.iter().join("/")
        )
    }
}

/// Every subcontext for one test item, sorted by label.
#[derive(Clone, Debug)]
pub struct SubcontextList {
    labeler: Labeler,
    subcontexts: Vec<Subcontext>,
    num_exemplars: usize,
}

impl SubcontextList {
    /// Label every training exemplar and group them by label.
    pub fn new(labeler: Labeler, training: &TrainingSet) -> Result<Self, ContextError> {
        let mut by_label: HashMap<Label, Subcontext> = HashMap::default();
        for (index, exemplar) in training.exemplars().iter().enumerate() {
            let label = labeler.label(exemplar)?;
            let class = training.outcome(index);
            match by_label.get_mut(&label) {
                Some(sub) => sub.add(index, class),
                None => {
                    by_label.insert(label.clone(), Subcontext::new(label, index, class));
                }
            }
        }
        let subcontexts = by_label
            .into_values()
            .sorted_by(|a, b| a.label.cmp(&b.label))
            .collect_vec();
        log::debug!(
            "{} exemplars fall into {} subcontexts",
            training.len(),
            subcontexts.len()
        );
        Ok(SubcontextList {
            labeler,
            subcontexts,
            num_exemplars: training.len(),
        })
    }

    /// The labeler that produced the labels.
    pub fn labeler(&self) -> &Labeler {
        &self.labeler
    }

    /// Label cardinality.
    pub fn cardinality(&self) -> usize {
        self.labeler.cardinality()
    }

    /// Number of subcontexts.
    pub fn len(&self) -> usize {
        self.subcontexts.len()
    }

    /// Whether there are no subcontexts.
    pub fn is_empty(&self) -> bool {
        self.subcontexts.is_empty()
    }

    /// Number of training exemplars grouped.
    pub fn num_exemplars(&self) -> usize {
        self.num_exemplars
    }

    /// Subcontext `id`.
    pub fn get(&self, id: SubcontextId) -> &Subcontext {
        &self.subcontexts[id]
    }

    /// All subcontexts, sorted by label.
    pub fn subcontexts(&self) -> &[Subcontext] {
        &self.subcontexts
    }

    /// All subcontexts, sorted by label.
    pub fn iter(&self) -> std::slice::Iter<'_, Subcontext> {
        self.subcontexts.iter()
    }

    /// Whether every training exemplar is in exactly one subcontext.
    pub fn is_partition(&self) -> bool {
        let mut seen = vec![false; self.num_exemplars];
        for e in self.iter().flat_map(|s| s.exemplars.iter().copied()) {
            if e >= seen.len() || seen[e] {
                return false;
            }
            seen[e] = true;
        }
        seen.into_iter().all(|s| s)
    }
}

impl<'a> IntoIterator for &'a SubcontextList {
    type Item = &'a Subcontext;
    type IntoIter = std::slice::Iter<'a, Subcontext>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for SubcontextList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.subcontexts.iter().join(","))
    }
}
