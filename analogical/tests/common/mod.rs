// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

#![allow(dead_code)]

use context::{Exemplar, TrainingSet, Value};
use rand::Rng;

/// Parse `"3 ? 2"` into feature values.
pub fn values(s: &str) -> Vec<Value> {
    s.split_whitespace()
        .map(|v| match v {
            "?" => Value::Missing,
            _ => Value::Known(v.parse().unwrap()),
        })
        .collect()
}

pub fn item(s: &str) -> Exemplar {
    Exemplar::new(values(s), None)
}

/// Training data from `(features, class name)` rows.
pub fn training(rows: &[(&str, &str)]) -> TrainingSet {
    let mut classes: Vec<String> = vec![];
    let exemplars = rows
        .iter()
        .map(|(features, class)| {
            let index = match classes.iter().position(|c| c == class) {
                Some(i) => i,
                None => {
                    classes.push(class.to_string());
                    classes.len() - 1
                }
            };
            Exemplar::new(values(features), Some(index))
        })
        .collect();
    TrainingSet::new(classes, exemplars).unwrap()
}

/// The worked example of chapter 3 of Skousen's *Analogical Modeling*;
/// classify `3 1 2`.
pub fn chapter3() -> TrainingSet {
    training(&[
        ("3 1 0", "e"),
        ("2 1 0", "r"),
        ("0 3 2", "r"),
        ("2 1 2", "r"),
        ("3 1 1", "r"),
    ])
}

fn random_value<R: Rng + ?Sized>(rng: &mut R) -> Value {
    if rng.gen_bool(0.1) {
        Value::Missing
    } else {
        Value::Known(rng.gen_range(0..3))
    }
}

/// Random training data and test item with `card` features drawn from a
/// small alphabet, about a tenth of them missing.
pub fn random_problem(rng: &mut impl Rng, card: usize, size: usize) -> (Exemplar, TrainingSet) {
    let num_classes = rng.gen_range(2..=4);
    let mut exemplars = vec![];
    for _ in 0..size {
        let features = (0..card).map(|_| random_value(rng)).collect();
        exemplars.push(Exemplar::new(features, Some(rng.gen_range(0..num_classes))));
    }
    let test = Exemplar::new((0..card).map(|_| random_value(rng)).collect(), None);
    let classes = (0..num_classes).map(|c| format!("c{c}")).collect();
    (test, TrainingSet::new(classes, exemplars).unwrap())
}
