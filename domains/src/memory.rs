// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AbsValue, BoolLattice};

pub type VarId = usize;

/// A random-access stack frame: one abstract value per variable slot. Slots
/// absent from the map are implicitly unconstrained (`Universe`) rather
/// than absent — every slot a procedure declares is expected to appear.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub slots: IndexMap<VarId, AbsValue>,
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "v{k} = {v}")?;
        }
        write!(f, "}}")
    }
}

impl Memory {
    pub fn bottom() -> Self {
        Self { slots: IndexMap::new() }
    }

    pub fn is_bottom(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, var: VarId) -> AbsValue {
        self.slots.get(&var).cloned().unwrap_or(AbsValue::Universe)
    }

    pub fn update(&self, var: VarId, value: AbsValue) -> Memory {
        let mut slots = self.slots.clone();
        slots.insert(var, value);
        Memory { slots }
    }

    /// `inv_get`: refines the slot `var` was read from to `⊓ expected`,
    /// leaving the rest of the frame unchanged.
    pub fn inv_get(&self, var: VarId, expected: &AbsValue) -> Memory {
        let refined = self.get(var).meet(expected);
        self.update(var, refined)
    }

    /// `offset`: models pointer arithmetic as an opaque relabelling — the
    /// analysis tracks that the result still denotes a cell of `var`'s
    /// frame but does not refine which one.
    pub fn offset(&self, var: VarId, _delta: &AbsValue) -> AbsValue {
        self.get(var)
    }

    pub fn copy_offset(&self, var: VarId) -> AbsValue {
        self.get(var)
    }

    pub fn le(&self, other: &Memory) -> bool {
        let keys: std::collections::BTreeSet<_> = self.slots.keys().chain(other.slots.keys()).collect();
        keys.into_iter().all(|k| self.get(*k).le(&other.get(*k)))
    }

    pub fn join(&self, other: &Memory) -> Memory {
        let keys: std::collections::BTreeSet<_> = self.slots.keys().chain(other.slots.keys()).copied().collect();
        let mut slots = IndexMap::new();
        for k in keys {
            slots.insert(k, self.get(k).join(&other.get(k)));
        }
        Memory { slots }
    }

    pub fn meet(&self, other: &Memory) -> Memory {
        let keys: std::collections::BTreeSet<_> = self.slots.keys().chain(other.slots.keys()).copied().collect();
        let mut slots = IndexMap::new();
        for k in keys {
            slots.insert(k, self.get(k).meet(&other.get(k)));
        }
        Memory { slots }
    }

    /// Memory equality is not refined: whether two frames are
    /// pointer-identical isn't expressible from the per-slot abstraction
    /// alone, so this always answers `⊤` rather than guessing.
    pub fn eq_op(&self, _other: &Memory) -> BoolLattice {
        BoolLattice::Top
    }

    pub fn neq_op(&self, _other: &Memory) -> BoolLattice {
        BoolLattice::Top
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Interval;

    #[test]
    fn update_then_get_round_trips() {
        let m = Memory::bottom().update(0, AbsValue::Interval(Interval::point(7)));
        assert_eq!(m.get(0), AbsValue::Interval(Interval::point(7)));
    }

    #[test]
    fn inv_get_narrows_only_the_targeted_slot() {
        let m = Memory::bottom()
            .update(0, AbsValue::Interval(Interval::Range(0, 10)))
            .update(1, AbsValue::Interval(Interval::Range(0, 10)));
        let refined = m.inv_get(0, &AbsValue::Interval(Interval::Range(0, 3)));
        assert_eq!(refined.get(0), AbsValue::Interval(Interval::Range(0, 3)));
        assert_eq!(refined.get(1), AbsValue::Interval(Interval::Range(0, 10)));
    }

    #[test]
    fn equality_is_always_imprecise() {
        let m = Memory::bottom();
        assert_eq!(m.eq_op(&m), BoolLattice::Top);
    }
}
