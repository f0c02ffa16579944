// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Incremental lattice filling shared by the exhaustive and heterogeneous
//! lattices.
//!
//! Each lattice point (a label) refers to a record in an arena. Inserting a
//! subcontext visits its own point and every descendant point; a point moves
//! to a record holding its previous subcontexts plus the new one. Points that
//! shared a record before the insertion share the derived record after it, so
//! the record's count is the number of points referring to it.

use context::hashmap::HashMap;
use context::{Label, Outcome, SubcontextId, SubcontextList};
use fxhash::FxHashMap;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::supra::{Homogeneity, Supracontext};
use crate::{Cancel, LatticeError};

type Handle = usize;

/// The record every point starts at.
const EMPTY: Handle = 0;

#[derive(Debug)]
struct Record {
    subs: Vec<SubcontextId>,
    homogeneity: Homogeneity,
    count: BigUint,
    derived_from: Option<Handle>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Point {
    Record(Handle),
    /// Pruned: no further subcontexts are added here.
    Heterogeneous,
}

pub(crate) struct Filler {
    arena: Vec<Record>,
    points: HashMap<Label, Point>,
    prune: bool,
}

impl Filler {
    /// With `prune`, points turning heterogeneous are dropped from the lattice.
    pub(crate) fn new(prune: bool) -> Self {
        Filler {
            arena: vec![Record {
                subs: vec![],
                homogeneity: Homogeneity::Empty,
                count: BigUint::zero(),
                derived_from: None,
            }],
            points: HashMap::default(),
            prune,
        }
    }

    /// Insert every subcontext, labeled by `label_of`, in list order.
    pub(crate) fn fill<F>(
        mut self,
        subs: &SubcontextList,
        cancel: &Cancel,
        label_of: F,
    ) -> Result<Vec<Supracontext>, LatticeError>
    where
        F: Fn(&Label) -> Result<Label, LatticeError>,
    {
        for (id, sub) in subs.iter().enumerate() {
            cancel.check()?;
            let label = label_of(sub.label())?;
            self.insert(id, sub.outcome(), label);
        }
        Ok(self.into_supracontexts())
    }

    fn insert(&mut self, id: SubcontextId, outcome: Outcome, label: Label) {
        if self.prune && self.points.get(&label) == Some(&Point::Heterogeneous) {
            return;
        }
        // records already derived during this insertion, by parent
        let mut derived: FxHashMap<Handle, Handle> = FxHashMap::default();
        let descendants = label.descendants();
        self.visit(label, id, outcome, &mut derived);
        for point in descendants {
            self.visit(point, id, outcome, &mut derived);
        }
    }

    fn visit(
        &mut self,
        point: Label,
        id: SubcontextId,
        outcome: Outcome,
        derived: &mut FxHashMap<Handle, Handle>,
    ) {
        let current = match self.points.get(&point) {
            Some(Point::Heterogeneous) => return,
            Some(Point::Record(h)) => *h,
            None => EMPTY,
        };
        if let Some(&child) = derived.get(&current) {
            debug_assert_eq!(self.arena[child].derived_from, Some(current));
            self.release(current);
            self.arena[child].count += 1u32;
            self.points.insert(point, Point::Record(child));
            return;
        }
        let homogeneity = self.arena[current].homogeneity.with(outcome);
        if self.prune && homogeneity == Homogeneity::Heterogeneous {
            self.release(current);
            self.points.insert(point, Point::Heterogeneous);
            return;
        }
        let mut subs = self.arena[current].subs.clone();
        subs.push(id);
        let child = self.arena.len();
        self.arena.push(Record {
            subs,
            homogeneity,
            count: BigUint::one(),
            derived_from: Some(current),
        });
        self.release(current);
        derived.insert(current, child);
        self.points.insert(point, Point::Record(child));
    }

    fn release(&mut self, handle: Handle) {
        if handle == EMPTY {
            return;
        }
        let record = &mut self.arena[handle];
        record.count -= 1u32;
        if record.count.is_zero() {
            // unreachable from any point; children already copied its subs
            record.subs = Vec::new();
        }
    }

    fn into_supracontexts(self) -> Vec<Supracontext> {
        let Filler { arena, points, .. } = self;
        log::debug!(
            "filled {} lattice points using {} records",
            points.len(),
            arena.len()
        );
        drop(points);
        let mut supras: Vec<Supracontext> = arena
            .into_iter()
            .skip(1)
            .filter(|r| !r.count.is_zero())
            .filter_map(|r| {
                let outcome = r.homogeneity.outcome()?;
                Some(Supracontext::new(r.subs, outcome, r.count))
            })
            .collect();
        supras.sort_by(|a, b| a.subcontexts().cmp(b.subcontexts()));
        supras
    }
}
