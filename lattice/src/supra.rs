// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Supracontexts: sets of subcontexts reached from lattice points, with the
//! number of points reaching them.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use context::hashmap::HashMap;
use context::{Outcome, SubcontextId, SubcontextList};
use itertools::Itertools;
use num_bigint::BigUint;
use num_traits::Zero;

/// Homogeneity of a set of subcontexts as it grows.
///
/// A set is homogeneous when its subcontexts share one class, or when it
/// holds a single nondeterministic subcontext and nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Homogeneity {
    /// No subcontexts yet
    Empty,
    /// Adding nothing else has broken homogeneity
    Homogeneous(Outcome),
    /// Contains disagreeing subcontexts
    Heterogeneous,
}

impl Homogeneity {
    /// The homogeneity after adding a subcontext with outcome `outcome`.
    pub fn with(self, outcome: Outcome) -> Homogeneity {
        match (self, outcome) {
            (Homogeneity::Empty, o) => Homogeneity::Homogeneous(o),
            (Homogeneity::Homogeneous(Outcome::Class(a)), Outcome::Class(b)) if a == b => self,
            _ => Homogeneity::Heterogeneous,
        }
    }

    /// The homogeneity of the given subcontexts.
    pub fn of(ids: &[SubcontextId], subs: &SubcontextList) -> Homogeneity {
        ids.iter()
            .fold(Homogeneity::Empty, |h, &id| h.with(subs.get(id).outcome()))
    }

    /// The outcome recorded for a supracontext with this homogeneity.
    /// Heterogeneous sets only occur in unpruned lattices and are marked
    /// nondeterministic.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Homogeneity::Empty => None,
            Homogeneity::Homogeneous(o) => Some(o),
            Homogeneity::Heterogeneous => Some(Outcome::Nondeterministic),
        }
    }
}

/// A set of subcontexts with the number of lattice points pointing at it.
///
/// Equality and hashing consider only the subcontext set.
#[derive(Clone, Debug)]
pub struct Supracontext {
    subs: Vec<SubcontextId>,
    outcome: Outcome,
    count: BigUint,
}

impl Supracontext {
    /// A supracontext over `subs` (in any order) with the given outcome and
    /// count.
    pub fn new(mut subs: Vec<SubcontextId>, outcome: Outcome, count: BigUint) -> Self {
        subs.sort_unstable();
        subs.dedup();
        Supracontext {
            subs,
            outcome,
            count,
        }
    }

    /// Subcontext ids, ascending.
    pub fn subcontexts(&self) -> &[SubcontextId] {
        &self.subs
    }

    /// The shared class, or `Nondeterministic`.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Number of lattice points pointing here.
    pub fn count(&self) -> &BigUint {
        &self.count
    }

    /// Number of training exemplars across all subcontexts.
    pub fn num_exemplars(&self, subs: &SubcontextList) -> usize {
        self.subs.iter().map(|&id| subs.get(id).len()).sum()
    }

    /// Renders the supracontext with its subcontexts spelled out.
    pub fn display<'a>(&'a self, subs: &'a SubcontextList) -> impl Display + 'a {
        SupraDisplay { supra: self, subs }
    }
}

impl PartialEq for Supracontext {
    fn eq(&self, other: &Self) -> bool {
        self.subs == other.subs
    }
}

impl Eq for Supracontext {}

impl Hash for Supracontext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subs.hash(state);
    }
}

struct SupraDisplay<'a> {
    supra: &'a Supracontext,
    subs: &'a SubcontextList,
}

impl Display for SupraDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}x{}]",
            self.supra.count,
            self.supra.subs.iter().map(|&id| self.subs.get(id)).join(",")
        )
    }
}

/// Supracontexts keyed by subcontext set; inserting an existing set adds to
/// its count.
#[derive(Clone, Debug, Default)]
pub struct SupraSet {
    entries: HashMap<Vec<SubcontextId>, (Outcome, BigUint)>,
}

impl SupraSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` points to the supracontext over `subs` (sorted).
    pub fn add(&mut self, subs: Vec<SubcontextId>, outcome: Outcome, count: BigUint) {
        if count.is_zero() {
            return;
        }
        match self.entries.get_mut(&subs) {
            Some((_, c)) => *c += count,
            None => {
                self.entries.insert(subs, (outcome, count));
            }
        }
    }

    /// Add a supracontext, merging with an equal one.
    pub fn insert(&mut self, supra: Supracontext) {
        self.add(supra.subs, supra.outcome, supra.count);
    }

    /// Fold every entry of `other` into this set.
    pub fn merge(mut self, other: SupraSet) -> SupraSet {
        if self.entries.len() < other.entries.len() {
            return other.merge(self);
        }
        for (subs, (outcome, count)) in other.entries {
            self.add(subs, outcome, count);
        }
        self
    }

    /// Number of distinct supracontexts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The supracontexts ordered by subcontext set.
    pub fn into_sorted_vec(self) -> Vec<Supracontext> {
        self.entries
            .into_iter()
            .map(|(subs, (outcome, count))| Supracontext {
                subs,
                outcome,
                count,
            })
            .sorted_by(|a, b| a.subs.cmp(&b.subs))
            .collect()
    }
}

impl FromIterator<Supracontext> for SupraSet {
    fn from_iter<T: IntoIterator<Item = Supracontext>>(iter: T) -> Self {
        let mut set = SupraSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Supracontext> for SupraSet {
    fn extend<T: IntoIterator<Item = Supracontext>>(&mut self, iter: T) {
        for supra in iter {
            self.insert(supra);
        }
    }
}
