// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Turning supracontext counts into pointers, likelihoods and a prediction.

use std::collections::BTreeMap;

use context::numeric::{ratio, to_f64};
use context::{
    ClassIndex, ContextError, Exemplar, Label, Labeler, SubcontextId, SubcontextList, TrainingSet,
};
use itertools::Itertools;
use lattice::Supracontext;
use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::Zero;

use crate::CountingMode;

/// The pointers one subcontext contributes, broken down by class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GangEffect {
    subcontext: SubcontextId,
    label: Label,
    context: String,
    class_pointers: BTreeMap<ClassIndex, BigUint>,
    class_exemplars: BTreeMap<ClassIndex, Vec<usize>>,
    total: BigUint,
}

impl GangEffect {
    /// The subcontext's position in the subcontext list.
    pub fn subcontext(&self) -> SubcontextId {
        self.subcontext
    }

    /// The subcontext's label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The test item with the subcontext's mismatches shown as `*`.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Pointers per class.
    pub fn class_pointers(&self) -> &BTreeMap<ClassIndex, BigUint> {
        &self.class_pointers
    }

    /// Exemplars of the subcontext, per class.
    pub fn class_exemplars(&self) -> &BTreeMap<ClassIndex, Vec<usize>> {
        &self.class_exemplars
    }

    /// Pointers over all classes.
    pub fn total(&self) -> &BigUint {
        &self.total
    }
}

/// The outcome of analogical modeling for one test item.
///
/// Built once from the supracontexts of a lattice; all quantities are
/// derived eagerly and the set is immutable afterwards.
#[derive(Clone, Debug)]
pub struct AnalogicalSet {
    subs: SubcontextList,
    supras: Vec<Supracontext>,
    classes: Vec<String>,
    counting_mode: CountingMode,
    exemplar_pointers: BTreeMap<usize, BigUint>,
    class_pointers: Vec<BigUint>,
    total: BigUint,
    likelihoods: Vec<BigRational>,
    predicted: Vec<ClassIndex>,
    gang_effects: Vec<GangEffect>,
}

impl AnalogicalSet {
    /// Aggregate `supras`, built from `subs`, into pointers.
    pub fn new(
        subs: SubcontextList,
        supras: Vec<Supracontext>,
        training: &TrainingSet,
        counting_mode: CountingMode,
    ) -> Result<Self, ContextError> {
        let mut exemplar_pointers: BTreeMap<usize, BigUint> = BTreeMap::new();
        for supra in &supras {
            let pointers = match counting_mode {
                CountingMode::Linear => supra.count().clone(),
                CountingMode::Quadratic => supra.count() * supra.num_exemplars(&subs),
            };
            for &id in supra.subcontexts() {
                for &e in subs.get(id).exemplars() {
                    *exemplar_pointers.entry(e).or_default() += &pointers;
                }
            }
        }

        let mut class_pointers = vec![BigUint::zero(); training.num_classes()];
        for (&e, pointers) in &exemplar_pointers {
            class_pointers[training.outcome(e)] += pointers;
        }
        let total: BigUint = class_pointers.iter().sum();
        let likelihoods = class_pointers
            .iter()
            .map(|p| ratio(p, &total))
            .collect_vec();

        let predicted = match class_pointers.iter().max() {
            Some(max) if !max.is_zero() => class_pointers
                .iter()
                .positions(|p| p == max)
                .collect(),
            _ => vec![],
        };

        let gang_effects = Self::gang_effects_of(&subs, &supras, &exemplar_pointers, training)?;

        Ok(AnalogicalSet {
            subs,
            supras,
            classes: training.classes().to_vec(),
            counting_mode,
            exemplar_pointers,
            class_pointers,
            total,
            likelihoods,
            predicted,
            gang_effects,
        })
    }

    fn gang_effects_of(
        subs: &SubcontextList,
        supras: &[Supracontext],
        exemplar_pointers: &BTreeMap<usize, BigUint>,
        training: &TrainingSet,
    ) -> Result<Vec<GangEffect>, ContextError> {
        let gangs = supras
            .iter()
            .flat_map(|s| s.subcontexts().iter().copied())
            .unique()
            .map(|id| {
                let sub = subs.get(id);
                let mut class_pointers: BTreeMap<ClassIndex, BigUint> = BTreeMap::new();
                let mut class_exemplars: BTreeMap<ClassIndex, Vec<usize>> = BTreeMap::new();
                for &e in sub.exemplars() {
                    let class = training.outcome(e);
                    if let Some(p) = exemplar_pointers.get(&e) {
                        *class_pointers.entry(class).or_default() += p;
                    }
                    class_exemplars.entry(class).or_default().push(e);
                }
                Ok(GangEffect {
                    subcontext: id,
                    label: sub.label().clone(),
                    context: subs.labeler().context_string(sub.label())?,
                    total: class_pointers.values().sum(),
                    class_pointers,
                    class_exemplars,
                })
            })
            .collect::<Result<Vec<_>, ContextError>>()?;
        Ok(gangs
            .into_iter()
            .sorted_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)))
            .collect())
    }

    /// The supracontexts the set was built from.
    pub fn supracontexts(&self) -> &[Supracontext] {
        &self.supras
    }

    /// The subcontexts the supracontexts refer to.
    pub fn subcontexts(&self) -> &SubcontextList {
        &self.subs
    }

    /// The labeler built for the test item.
    pub fn labeler(&self) -> &Labeler {
        self.subs.labeler()
    }

    /// The item being classified.
    pub fn test_item(&self) -> &Exemplar {
        self.subs.labeler().test_item()
    }

    /// How counts were turned into pointers.
    pub fn counting_mode(&self) -> CountingMode {
        self.counting_mode
    }

    /// Class names, indexed by [`ClassIndex`].
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Pointers per training exemplar, for exemplars in the analogical set.
    pub fn exemplar_pointers(&self) -> &BTreeMap<usize, BigUint> {
        &self.exemplar_pointers
    }

    /// Each exemplar's share of all pointers.
    pub fn exemplar_effects(&self) -> BTreeMap<usize, f64> {
        self.exemplar_pointers
            .iter()
            .map(|(&e, p)| (e, to_f64(&ratio(p, &self.total))))
            .collect()
    }

    /// Pointers per class, indexed by [`ClassIndex`].
    pub fn class_pointers(&self) -> &[BigUint] {
        &self.class_pointers
    }

    /// Pointers over all classes.
    pub fn total_pointers(&self) -> &BigUint {
        &self.total
    }

    /// Exact class probabilities, indexed by [`ClassIndex`]; all zero when
    /// no exemplar received pointers.
    pub fn exact_distribution(&self) -> &[BigRational] {
        &self.likelihoods
    }

    /// Class probabilities, indexed by [`ClassIndex`].
    pub fn distribution(&self) -> Vec<f64> {
        self.likelihoods.iter().map(to_f64).collect()
    }

    /// The probability of `class`.
    pub fn class_likelihood(&self, class: ClassIndex) -> f64 {
        to_f64(&self.likelihoods[class])
    }

    /// The most likely class; ties go to the lowest class index.
    pub fn predicted_class(&self) -> Option<ClassIndex> {
        self.predicted.first().copied()
    }

    /// Every class sharing the highest probability, ascending.
    pub fn predicted_classes(&self) -> &[ClassIndex] {
        &self.predicted
    }

    /// The probability of the predicted class, or zero without a prediction.
    pub fn class_probability(&self) -> f64 {
        self.predicted_class()
            .map_or(0.0, |c| self.class_likelihood(c))
    }

    /// Per-subcontext pointers, largest first, then by label.
    pub fn gang_effects(&self) -> &[GangEffect] {
        &self.gang_effects
    }
}
