// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four-element boolean lattice `{∅, {false}, {true}, {false, true}}`.
/// Ordered `Bottom < False, True < Top`; `False`/`True` are incomparable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolLattice {
    Bottom,
    False,
    True,
    Top,
}

impl fmt::Display for BoolLattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolLattice::Bottom => write!(f, "⊥"),
            BoolLattice::False => write!(f, "{{false}}"),
            BoolLattice::True => write!(f, "{{true}}"),
            BoolLattice::Top => write!(f, "{{false, true}}"),
        }
    }
}

impl BoolLattice {
    pub fn from_concrete(b: bool) -> Self {
        if b { BoolLattice::True } else { BoolLattice::False }
    }

    pub fn may_be_true(&self) -> bool {
        matches!(self, BoolLattice::True | BoolLattice::Top)
    }

    pub fn may_be_false(&self) -> bool {
        matches!(self, BoolLattice::False | BoolLattice::Top)
    }

    pub fn le(&self, other: &BoolLattice) -> bool {
        use BoolLattice::*;
        matches!(
            (self, other),
            (Bottom, _) | (_, Top) | (False, False) | (True, True)
        )
    }

    pub fn join(&self, other: &BoolLattice) -> BoolLattice {
        use BoolLattice::*;
        match (self, other) {
            (Bottom, x) | (x, Bottom) => *x,
            (a, b) if a == b => *a,
            _ => Top,
        }
    }

    pub fn meet(&self, other: &BoolLattice) -> BoolLattice {
        use BoolLattice::*;
        match (self, other) {
            (Top, x) | (x, Top) => *x,
            (a, b) if a == b => *a,
            _ => Bottom,
        }
    }

    pub fn not(&self) -> BoolLattice {
        use BoolLattice::*;
        match self {
            Bottom => Bottom,
            False => True,
            True => False,
            Top => Top,
        }
    }

    /// Forward `and`: pointwise over the represented concrete pairs.
    pub fn and(&self, other: &BoolLattice) -> BoolLattice {
        use BoolLattice::*;
        match (self, other) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (False, _) | (_, False) => False,
            (True, True) => True,
            _ => Top,
        }
    }

    pub fn or(&self, other: &BoolLattice) -> BoolLattice {
        use BoolLattice::*;
        match (self, other) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (True, _) | (_, True) => True,
            (False, False) => False,
            _ => Top,
        }
    }

    pub fn eq_op(&self, other: &BoolLattice) -> BoolLattice {
        use BoolLattice::*;
        match (self, other) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (False, False) | (True, True) => True,
            (False, True) | (True, False) => False,
            _ => Top,
        }
    }

    pub fn neq_op(&self, other: &BoolLattice) -> BoolLattice {
        self.eq_op(other).not()
    }

    /// Backward `and`: `expected = {true}` forces both inputs to `{true}`;
    /// `expected = {false}` leaves a disjunction (unchanged, since either
    /// input alone being false suffices); `expected = ∅` is infeasible.
    pub fn inv_and(expected: &BoolLattice, l: &BoolLattice, r: &BoolLattice) -> Option<(BoolLattice, BoolLattice)> {
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => Some((l.meet(&BoolLattice::True), r.meet(&BoolLattice::True))),
            _ => Some((*l, *r)),
        }
    }

    pub fn inv_or(expected: &BoolLattice, l: &BoolLattice, r: &BoolLattice) -> Option<(BoolLattice, BoolLattice)> {
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::False => Some((l.meet(&BoolLattice::False), r.meet(&BoolLattice::False))),
            _ => Some((*l, *r)),
        }
    }

    pub fn inv_not(expected: &BoolLattice, x: &BoolLattice) -> Option<BoolLattice> {
        if matches!(expected, BoolLattice::Bottom) { None } else { Some(x.meet(&expected.not())) }
    }

    /// Backward eq: `expected = {true}` intersects both sides with
    /// `l ⊓ r`; `expected = {false}` or `⊤` leaves both unrefined.
    pub fn inv_eq(expected: &BoolLattice, l: &BoolLattice, r: &BoolLattice) -> Option<(BoolLattice, BoolLattice)> {
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => {
                let m = l.meet(r);
                if matches!(m, BoolLattice::Bottom) { None } else { Some((m, m)) }
            }
            _ => Some((*l, *r)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use BoolLattice::*;

    #[test]
    fn inv_and_true_forces_both_true() {
        assert_eq!(BoolLattice::inv_and(&True, &Top, &Top), Some((True, True)));
    }

    #[test]
    fn inv_and_false_is_unrefined() {
        assert_eq!(BoolLattice::inv_and(&False, &Top, &Top), Some((Top, Top)));
    }

    #[test]
    fn inv_and_bottom_is_infeasible() {
        assert_eq!(BoolLattice::inv_and(&Bottom, &Top, &Top), None);
    }

    #[test]
    fn and_is_monotone() {
        assert!(False.and(&Top).le(&Top.and(&Top)));
        assert!(True.and(&True).le(&Top.and(&Top)));
    }
}
