// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Feature vectors and the training data they come in.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::ContextError;

/// Index of a class in the host's class ordering.
pub type ClassIndex = usize;

/// A single feature value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// A known nominal value
    Known(u32),
    /// An unknown value
    Missing,
}

impl Value {
    /// Whether the value is unknown.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Known(value)
    }
}

impl From<Option<u32>> for Value {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(v) => Value::Known(v),
            None => Value::Missing,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Known(v) => write!(f, "{v}"),
            Value::Missing => write!(f, "?"),
        }
    }
}

/// The outcome shared by a group of exemplars.
///
/// `Nondeterministic` marks a group whose members disagree; once a group
/// becomes nondeterministic it never goes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    /// Every member has this class
    Class(ClassIndex),
    /// Members have more than one class
    Nondeterministic,
}

impl Outcome {
    /// The agreed class, if there is one.
    pub fn class(&self) -> Option<ClassIndex> {
        match self {
            Outcome::Class(c) => Some(*c),
            Outcome::Nondeterministic => None,
        }
    }

    /// Whether members disagree.
    pub fn is_nondeterministic(&self) -> bool {
        matches!(self, Outcome::Nondeterministic)
    }

    /// The outcome after adding a member with outcome `other`.
    pub fn merge(self, other: Outcome) -> Outcome {
        if self == other {
            self
        } else {
            Outcome::Nondeterministic
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Class(c) => write!(f, "{c}"),
            Outcome::Nondeterministic => write!(f, "&nondeterministic&"),
        }
    }
}

/// An ordered feature vector, optionally labeled with a class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Exemplar {
    features: Vec<Value>,
    outcome: Option<ClassIndex>,
}

impl Exemplar {
    /// An exemplar with the given values and class.
    pub fn new(features: Vec<Value>, outcome: Option<ClassIndex>) -> Self {
        Exemplar { features, outcome }
    }

    /// An exemplar without missing values.
    pub fn known(values: &[u32], outcome: Option<ClassIndex>) -> Self {
        Self::new(values.iter().map(|&v| Value::Known(v)).collect(), outcome)
    }

    /// The feature values.
    pub fn features(&self) -> &[Value] {
        &self.features
    }

    /// The value of feature `index`.
    pub fn value(&self, index: usize) -> Value {
        self.features[index]
    }

    /// The exemplar's class, if it has one.
    pub fn outcome(&self) -> Option<ClassIndex> {
        self.outcome
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }
}

impl Display for Exemplar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.features.iter().join(" "))?;
        if let Some(c) = self.outcome {
            write!(f, " -> {c}")?;
        }
        Ok(())
    }
}

/// Classified exemplars together with the class names they refer to.
///
/// Construction checks that every exemplar has an outcome naming one of the
/// classes and that all exemplars have the same number of features.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingSet {
    classes: Vec<String>,
    exemplars: Vec<Exemplar>,
    outcomes: Vec<ClassIndex>,
}

impl TrainingSet {
    /// Validate and bundle training data.
    pub fn new(classes: Vec<String>, exemplars: Vec<Exemplar>) -> Result<Self, ContextError> {
        let mut outcomes = Vec::with_capacity(exemplars.len());
        for (index, e) in exemplars.iter().enumerate() {
            let outcome = e.outcome.ok_or(ContextError::MissingOutcome(index))?;
            if outcome >= classes.len() {
                return Err(ContextError::OutcomeOutOfRange {
                    index,
                    outcome,
                    num_classes: classes.len(),
                });
            }
            if e.len() != exemplars[0].len() {
                return Err(ContextError::CardinalityMismatch {
                    expected: exemplars[0].len(),
                    found: e.len(),
                });
            }
            outcomes.push(outcome);
        }
        Ok(TrainingSet {
            classes,
            exemplars,
            outcomes,
        })
    }

    /// Class names, indexed by [`ClassIndex`].
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// The name of class `class`.
    pub fn class_name(&self, class: ClassIndex) -> &str {
        &self.classes[class]
    }

    /// The class index with the given name.
    pub fn class_index(&self, name: &str) -> Option<ClassIndex> {
        self.classes.iter().position(|c| c == name)
    }

    /// The exemplars in their original order.
    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    /// Exemplar `index`.
    pub fn get(&self, index: usize) -> &Exemplar {
        &self.exemplars[index]
    }

    /// The class of exemplar `index`.
    pub fn outcome(&self, index: usize) -> ClassIndex {
        self.outcomes[index]
    }

    /// Number of exemplars.
    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    /// Whether there are no exemplars.
    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    /// Number of features per exemplar, or `None` for an empty set.
    pub fn num_features(&self) -> Option<usize> {
        self.exemplars.first().map(Exemplar::len)
    }

    /// The same set without the exemplars whose feature values equal
    /// `features`. The remaining exemplars keep their relative order.
    pub fn without_features(&self, features: &[Value]) -> TrainingSet {
        let (exemplars, outcomes): (Vec<Exemplar>, Vec<ClassIndex>) = self
            .exemplars
            .iter()
            .zip(&self.outcomes)
            .filter(|(e, _)| e.features() != features)
            .map(|(e, &o)| (e.clone(), o))
            .unzip();
        TrainingSet {
            classes: self.classes.clone(),
            exemplars,
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<String> {
        vec!["e".to_string(), "r".to_string()]
    }

    #[test]
    fn training_set_validation() {
        let ok = TrainingSet::new(
            classes(),
            vec![
                Exemplar::known(&[3, 1, 0], Some(0)),
                Exemplar::known(&[2, 1, 0], Some(1)),
            ],
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.outcome(1), 1);
        assert_eq!(ok.num_features(), Some(3));
        assert_eq!(ok.class_index("r"), Some(1));

        assert_eq!(
            TrainingSet::new(classes(), vec![Exemplar::known(&[3, 1, 0], None)]),
            Err(ContextError::MissingOutcome(0))
        );
        assert_eq!(
            TrainingSet::new(classes(), vec![Exemplar::known(&[3, 1, 0], Some(2))]),
            Err(ContextError::OutcomeOutOfRange {
                index: 0,
                outcome: 2,
                num_classes: 2
            })
        );
        assert_eq!(
            TrainingSet::new(
                classes(),
                vec![
                    Exemplar::known(&[3, 1, 0], Some(0)),
                    Exemplar::known(&[3, 1], Some(0)),
                ]
            ),
            Err(ContextError::CardinalityMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn removing_an_item() {
        let set = TrainingSet::new(
            classes(),
            vec![
                Exemplar::known(&[3, 1, 2], Some(0)),
                Exemplar::known(&[2, 1, 0], Some(1)),
                Exemplar::known(&[3, 1, 2], Some(1)),
                Exemplar::new(vec![3.into(), Value::Missing, 2.into()], Some(0)),
            ],
        )
        .unwrap();
        let rest = set.without_features(Exemplar::known(&[3, 1, 2], None).features());
        assert_eq!(rest.len(), 2);
        assert_eq!(rest.get(0), &Exemplar::known(&[2, 1, 0], Some(1)));
        assert_eq!(rest.outcome(1), 0);
        assert_eq!(rest.classes(), set.classes());
        assert_eq!(set.without_features(&[Value::Known(9)]), set);
    }

    #[test]
    fn outcome_merge() {
        let e = Outcome::Class(0);
        let r = Outcome::Class(1);
        assert_eq!(e.merge(e), e);
        assert_eq!(e.merge(r), Outcome::Nondeterministic);
        assert_eq!(Outcome::Nondeterministic.merge(e), Outcome::Nondeterministic);
    }

    #[test]
    fn display() {
        let e = Exemplar::new(vec![Value::Known(3), Value::Missing, 2.into()], Some(1));
        insta::assert_display_snapshot!(e, @"3 ? 2 -> 1");
    }
}
