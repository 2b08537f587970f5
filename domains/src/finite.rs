// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_span::Symbol;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::BoolLattice;

/// The subset lattice over a fixed finite carrier of tags (enum literals).
/// Small carriers (≤ 4 literals) are conceptually an enumerated power-set;
/// larger ones a direct finite-subset representation. Both cases share this
/// one representation — an explicit member set against a shared carrier —
/// since enumerating versus not enumerating the power-set is a
/// representation choice, not a difference in the lattice's semantics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FiniteSet {
    pub carrier: Arc<Vec<Symbol>>,
    pub members: IndexSet<Symbol>,
}

impl PartialEq for FiniteSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}
impl Eq for FiniteSet {}

impl fmt::Display for FiniteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{m}")?;
        }
        write!(f, "}}")
    }
}

impl FiniteSet {
    pub fn bottom(carrier: Arc<Vec<Symbol>>) -> Self {
        Self { carrier, members: IndexSet::new() }
    }

    pub fn top(carrier: Arc<Vec<Symbol>>) -> Self {
        let members = carrier.iter().copied().collect();
        Self { carrier, members }
    }

    pub fn singleton(carrier: Arc<Vec<Symbol>>, tag: Symbol) -> Self {
        let mut members = IndexSet::new();
        members.insert(tag);
        Self { carrier, members }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn le(&self, other: &FiniteSet) -> bool {
        self.members.is_subset(&other.members)
    }

    pub fn join(&self, other: &FiniteSet) -> FiniteSet {
        FiniteSet { carrier: self.carrier.clone(), members: self.members.union(&other.members).copied().collect() }
    }

    pub fn meet(&self, other: &FiniteSet) -> FiniteSet {
        FiniteSet {
            carrier: self.carrier.clone(),
            members: self.members.intersection(&other.members).copied().collect(),
        }
    }

    pub fn eq_op(&self, other: &FiniteSet) -> BoolLattice {
        if self.is_empty() || other.is_empty() {
            return BoolLattice::Bottom;
        }
        let overlap = self.meet(other);
        if overlap.is_empty() {
            BoolLattice::False
        } else if self.members.len() == 1 && other.members.len() == 1 && self.members == other.members {
            BoolLattice::True
        } else {
            BoolLattice::Top
        }
    }

    pub fn neq_op(&self, other: &FiniteSet) -> BoolLattice {
        self.eq_op(other).not()
    }

    /// Backward eq: `expected = {true}` intersects both
    /// sides with `l ⊓ r`; `expected = {false}` or `⊤` leaves both
    /// unrefined (a disjunction over "any pair that differs").
    pub fn inv_eq(expected: &BoolLattice, l: &FiniteSet, r: &FiniteSet) -> Option<(FiniteSet, FiniteSet)> {
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => {
                let overlap = l.meet(r);
                if overlap.is_empty() { None } else { Some((overlap.clone(), overlap)) }
            }
            _ => Some((l.clone(), r.clone())),
        }
    }
}
