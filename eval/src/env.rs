// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! An abstract environment: a mapping from variable to abstract value, the
//! unit the evaluator propagates along CFG edges.

use adastat_domains::AbsValue;
use adastat_ir::VarId;
use indexmap::{IndexMap, IndexSet};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Env {
    values: IndexMap<VarId, AbsValue>,
}

impl Env {
    pub fn new() -> Self {
        Self { values: IndexMap::new() }
    }

    /// A variable absent from the map is unconstrained (`⊤`), matching a
    /// `ReadStmt`'s havoc semantics for any variable the environment hasn't
    /// recorded yet.
    pub fn get(&self, var: VarId) -> AbsValue {
        self.values.get(&var).cloned().unwrap_or(AbsValue::Universe)
    }

    pub fn set(&mut self, var: VarId, value: AbsValue) {
        self.values.insert(var, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &AbsValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    fn keys_union(&self, other: &Env) -> IndexSet<VarId> {
        self.values.keys().chain(other.values.keys()).copied().collect()
    }

    pub fn le(&self, other: &Env) -> bool {
        self.keys_union(other).into_iter().all(|k| self.get(k).le(&other.get(k)))
    }

    pub fn join(&self, other: &Env) -> Env {
        let mut values = IndexMap::new();
        for k in self.keys_union(other) {
            values.insert(k, self.get(k).join(&other.get(k)));
        }
        Env { values }
    }

    pub fn widen(&self, other: &Env) -> Env {
        let mut values = IndexMap::new();
        for k in self.keys_union(other) {
            values.insert(k, self.get(k).widen(&other.get(k)));
        }
        Env { values }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_domains::{BoolLattice, Interval};

    #[test]
    fn unset_variable_reads_as_universe() {
        let env = Env::new();
        assert_eq!(env.get(VarId(0)), AbsValue::Universe);
    }

    #[test]
    fn join_merges_two_environments_pointwise() {
        let mut a = Env::new();
        a.set(VarId(0), AbsValue::Interval(Interval::point(1)));
        let mut b = Env::new();
        b.set(VarId(0), AbsValue::Interval(Interval::point(2)));
        b.set(VarId(1), AbsValue::Bool(BoolLattice::True));
        let joined = a.join(&b);
        assert_eq!(joined.get(VarId(0)), AbsValue::Interval(Interval::Range(1, 2)));
        assert_eq!(joined.get(VarId(1)), AbsValue::Bool(BoolLattice::True));
    }

    #[test]
    fn widen_only_grows_on_the_interval_component() {
        let mut a = Env::new();
        a.set(VarId(0), AbsValue::Interval(Interval::Range(0, 5)));
        let mut b = Env::new();
        b.set(VarId(0), AbsValue::Interval(Interval::Range(0, 6)));
        let widened = a.widen(&b);
        assert_eq!(widened.get(VarId(0)), AbsValue::Interval(Interval::Range(0, i128::MAX)));
    }
}
