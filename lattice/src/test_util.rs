// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Fixtures shared by the lattice unit tests.

use context::{Exemplar, Labeler, MissingDataCompare, SubcontextList, TrainingSet, Value};
use num_traits::ToPrimitive;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::Supracontext;

/// The worked example of chapter 3 of Skousen's *Analogical Modeling*: test
/// item `3 1 2` against `310 e`, `210 r`, `032 r`, `212 r`, `311 r`.
pub fn chapter3(compare: MissingDataCompare) -> SubcontextList {
    let training = TrainingSet::new(
        vec!["e".to_string(), "r".to_string()],
        vec![
            Exemplar::known(&[3, 1, 0], Some(0)),
            Exemplar::known(&[2, 1, 0], Some(1)),
            Exemplar::known(&[0, 3, 2], Some(1)),
            Exemplar::known(&[2, 1, 2], Some(1)),
            Exemplar::known(&[3, 1, 1], Some(1)),
        ],
    )
    .unwrap();
    let labeler = Labeler::new(Exemplar::known(&[3, 1, 2], None), compare, false);
    SubcontextList::new(labeler, &training).unwrap()
}

fn random_value<R: Rng + ?Sized>(rng: &mut R) -> Value {
    if rng.gen_bool(0.1) {
        Value::Missing
    } else {
        Value::Known(rng.gen_range(0..3))
    }
}

/// Random training data with up to `max_card` features, some of them missing.
pub fn random_subcontexts(
    rng: &mut impl Rng,
    max_card: usize,
    max_exemplars: usize,
) -> SubcontextList {
    let card = rng.gen_range(1..=max_card);
    let num_classes = rng.gen_range(2..=3);
    let exemplars = (0..rng.gen_range(1..=max_exemplars))
        .map(|_| {
            let features = (0..card).map(|_| random_value(rng)).collect();
            Exemplar::new(features, Some(rng.gen_range(0..num_classes)))
        })
        .collect();
    let classes = (0..num_classes).map(|c| format!("c{c}")).collect();
    let training = TrainingSet::new(classes, exemplars).unwrap();
    let test = Exemplar::known(&(0..card).map(|_| rng.gen_range(0..3)).collect::<Vec<u32>>(), None);
    let compare = *MissingDataCompare::ALL.choose(rng).unwrap();
    SubcontextList::new(Labeler::new(test, compare, false), &training).unwrap()
}

/// Subcontext sets with their counts, for compact comparisons.
pub fn counts(supras: &[Supracontext]) -> Vec<(Vec<usize>, u64)> {
    supras
        .iter()
        .map(|s| (s.subcontexts().to_vec(), s.count().to_u64().unwrap()))
        .collect()
}
