// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_span::Symbol;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BoolLattice;

pub type VarId = usize;

/// A single location an access path can denote: a variable, a field
/// projection off some base, a subprogram reference (for function
/// pointers/closures), the null location, or the unknown location `Top`
/// that absorbs anything the analysis can't pin down.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessAtom {
    Var(VarId),
    Field(Symbol, Box<AccessAtom>),
    Subprogram(Symbol),
    Null,
    Top,
}

impl fmt::Display for AccessAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessAtom::Var(v) => write!(f, "v{v}"),
            AccessAtom::Field(name, base) => write!(f, "{base}.{name}"),
            AccessAtom::Subprogram(name) => write!(f, "&{name}"),
            AccessAtom::Null => write!(f, "null"),
            AccessAtom::Top => write!(f, "*"),
        }
    }
}

/// Two atoms "touch" when a strong update through one could alias the
/// other: identical atoms, anything paired with `Top`, fields sharing a
/// base, or the same variable/subprogram/null. Touching atoms are merged on
/// insertion into one `Top`-ish member instead of kept distinct, which is
/// what bounds the set's size without a reflection-based split capability.
fn touches(a: &AccessAtom, b: &AccessAtom) -> bool {
    use AccessAtom::*;
    if a == b {
        return true;
    }
    match (a, b) {
        (Top, _) | (_, Top) => true,
        (Field(_, ba), Field(_, bb)) => ba == bb,
        _ => false,
    }
}

/// The powerset lattice over `AccessAtom`, used for `may-point-to` sets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPathSet {
    pub members: IndexSet<AccessAtom>,
}

impl fmt::Display for AccessPathSet {
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

impl AccessPathSet {
    pub fn bottom() -> Self {
        Self { members: IndexSet::new() }
    }

    pub fn top() -> Self {
        let mut members = IndexSet::new();
        members.insert(AccessAtom::Top);
        Self { members }
    }

    pub fn singleton(atom: AccessAtom) -> Self {
        let mut members = IndexSet::new();
        members.insert(atom);
        Self { members }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn le(&self, other: &AccessPathSet) -> bool {
        self.members.iter().all(|m| other.members.contains(m) || other.members.contains(&AccessAtom::Top))
    }

    /// Inserts every member of `other` into `self`, folding any pair that
    /// touches into a single `Top` member.
    pub fn join(&self, other: &AccessPathSet) -> AccessPathSet {
        let mut members = self.members.clone();
        for atom in &other.members {
            insert_with_merge(&mut members, atom.clone());
        }
        AccessPathSet { members }
    }

    pub fn meet(&self, other: &AccessPathSet) -> AccessPathSet {
        if self.members.contains(&AccessAtom::Top) {
            return other.clone();
        }
        if other.members.contains(&AccessAtom::Top) {
            return self.clone();
        }
        let members = self.members.intersection(&other.members).cloned().collect();
        AccessPathSet { members }
    }

    pub fn eq_op(&self, other: &AccessPathSet) -> BoolLattice {
        if self.is_empty() || other.is_empty() {
            return BoolLattice::Bottom;
        }
        let overlap = self.meet(other);
        if overlap.is_empty() {
            BoolLattice::False
        } else if self.members.len() == 1 && self.members == other.members {
            BoolLattice::True
        } else {
            BoolLattice::Top
        }
    }

    pub fn neq_op(&self, other: &AccessPathSet) -> BoolLattice {
        self.eq_op(other).not()
    }

    /// Backward eq: `expected = {true}` intersects both sides (they must
    /// denote the same location); `expected = {false}` or `⊤` leaves both
    /// unrefined, since excluding one member from a may-alias set is only
    /// sound when the other side is an exact singleton, which `meet`
    /// already handles precisely.
    pub fn inv_eq(expected: &BoolLattice, l: &AccessPathSet, r: &AccessPathSet) -> Option<(AccessPathSet, AccessPathSet)> {
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => {
                let overlap = l.meet(r);
                if overlap.is_empty() { None } else { Some((overlap.clone(), overlap)) }
            }
            _ => Some((l.clone(), r.clone())),
        }
    }

    /// True when the set can only ever denote the null location.
    pub fn must_be_null(&self) -> BoolLattice {
        if self.is_empty() {
            BoolLattice::Bottom
        } else if self.members.len() == 1 && self.members.contains(&AccessAtom::Null) {
            BoolLattice::True
        } else if !self.members.contains(&AccessAtom::Null) {
            BoolLattice::False
        } else {
            BoolLattice::Top
        }
    }
}

fn insert_with_merge(members: &mut IndexSet<AccessAtom>, atom: AccessAtom) {
    if members.contains(&atom) {
        return;
    }
    if let Some(clash) = members.iter().find(|m| touches(m, &atom)).cloned() {
        members.shift_remove(&clash);
        members.insert(AccessAtom::Top);
    } else {
        members.insert(atom);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distinct_vars_stay_distinct() {
        let s = AccessPathSet::singleton(AccessAtom::Var(1)).join(&AccessPathSet::singleton(AccessAtom::Var(2)));
        assert_eq!(s.members.len(), 2);
    }

    #[test]
    fn fields_on_the_same_base_merge_to_top() {
        let base = Box::new(AccessAtom::Var(1));
        let a = AccessPathSet::singleton(AccessAtom::Field(Symbol::intern("x"), base.clone()));
        let b = AccessPathSet::singleton(AccessAtom::Field(Symbol::intern("y"), base));
        let joined = a.join(&b);
        assert!(joined.members.contains(&AccessAtom::Top));
    }

    #[test]
    fn must_be_null_is_precise_for_a_null_singleton() {
        let s = AccessPathSet::singleton(AccessAtom::Null);
        assert_eq!(s.must_be_null(), BoolLattice::True);
    }
}
