// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::BoolLattice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Either `⊥` or a closed integer interval `[lo, hi]`.
/// `⊔` takes the enclosing interval; no widening happens here (the
/// evaluator applies widening at loop headers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    Bottom,
    Range(i128, i128),
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Bottom => write!(f, "⊥"),
            Interval::Range(lo, hi) => write!(f, "[{lo}, {hi}]"),
        }
    }
}

impl Interval {
    pub fn point(v: i128) -> Self {
        Interval::Range(v, v)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Interval::Bottom)
    }

    pub fn lo(&self) -> Option<i128> {
        match self {
            Interval::Bottom => None,
            Interval::Range(lo, _) => Some(*lo),
        }
    }

    pub fn hi(&self) -> Option<i128> {
        match self {
            Interval::Bottom => None,
            Interval::Range(_, hi) => Some(*hi),
        }
    }

    pub fn normalize(lo: i128, hi: i128) -> Self {
        if lo > hi { Interval::Bottom } else { Interval::Range(lo, hi) }
    }

    pub fn le(&self, other: &Interval) -> bool {
        match (self, other) {
            (Interval::Bottom, _) => true,
            (_, Interval::Bottom) => false,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => l1 >= l2 && h1 <= h2,
        }
    }

    pub fn join(&self, other: &Interval) -> Interval {
        match (self, other) {
            (Interval::Bottom, x) | (x, Interval::Bottom) => *x,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => Interval::Range((*l1).min(*l2), (*h1).max(*h2)),
        }
    }

    pub fn meet(&self, other: &Interval) -> Interval {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => Interval::Bottom,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => Interval::normalize((*l1).max(*l2), (*h1).min(*h2)),
        }
    }

    /// Forward `widen`: the standard interval widening operator, applied by
    /// the evaluator at loop headers.
    pub fn widen(&self, other: &Interval) -> Interval {
        match (self, other) {
            (Interval::Bottom, x) | (x, Interval::Bottom) => *x,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => {
                let lo = if l2 < l1 { i128::MIN } else { *l1 };
                let hi = if h2 > h1 { i128::MAX } else { *h1 };
                Interval::Range(lo, hi)
            }
        }
    }

    pub fn add(&self, other: &Interval) -> Interval {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => Interval::Bottom,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => {
                Interval::Range(l1.saturating_add(*l2), h1.saturating_add(*h2))
            }
        }
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => Interval::Bottom,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => {
                Interval::Range(l1.saturating_sub(*h2), h1.saturating_sub(*l2))
            }
        }
    }

    pub fn neg(&self) -> Interval {
        match self {
            Interval::Bottom => Interval::Bottom,
            Interval::Range(lo, hi) => Interval::Range(-*hi, -*lo),
        }
    }

    pub fn lt(&self, other: &Interval) -> BoolLattice {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => BoolLattice::Bottom,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => {
                if h1 < l2 {
                    BoolLattice::True
                } else if l1 >= h2 {
                    BoolLattice::False
                } else {
                    BoolLattice::Top
                }
            }
        }
    }

    pub fn le_op(&self, other: &Interval) -> BoolLattice {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => BoolLattice::Bottom,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => {
                if h1 <= l2 {
                    BoolLattice::True
                } else if l1 > h2 {
                    BoolLattice::False
                } else {
                    BoolLattice::Top
                }
            }
        }
    }

    pub fn gt(&self, other: &Interval) -> BoolLattice {
        other.lt(self)
    }

    pub fn ge(&self, other: &Interval) -> BoolLattice {
        other.le_op(self)
    }

    pub fn eq_op(&self, other: &Interval) -> BoolLattice {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => BoolLattice::Bottom,
            (Interval::Range(l1, h1), Interval::Range(l2, h2)) => {
                if l1 == h1 && l2 == h2 && l1 == l2 {
                    BoolLattice::True
                } else if h1 < l2 || h2 < l1 {
                    BoolLattice::False
                } else {
                    BoolLattice::Top
                }
            }
        }
    }

    pub fn neq_op(&self, other: &Interval) -> BoolLattice {
        self.eq_op(other).not()
    }

    /// Backward `add`: given expected output `[a, b]` and the inputs'
    /// current bounds, refine `l := l ⊓ [a - hi(r), b - lo(r)]` and
    /// symmetrically for `r`.
    pub fn inv_add(expected: &Interval, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        let Interval::Range(a, b) = expected else { return None };
        let Interval::Range(rl, rh) = r else { return Some((Interval::Bottom, Interval::Bottom)) };
        let Interval::Range(ll, lh) = l else { return Some((Interval::Bottom, Interval::Bottom)) };
        let refined_l = l.meet(&Interval::normalize(a.saturating_sub(*rh), b.saturating_sub(*rl)));
        let refined_r = r.meet(&Interval::normalize(a.saturating_sub(*lh), b.saturating_sub(*ll)));
        if refined_l.is_bottom() || refined_r.is_bottom() { None } else { Some((refined_l, refined_r)) }
    }

    pub fn inv_sub(expected: &Interval, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        // l - r = expected  <=>  l = expected + r  &  r = l - expected
        let neg_expected = expected.neg();
        Interval::inv_add(&neg_expected, r, l).map(|(r2, l2)| (l2, r2))
    }

    pub fn inv_neg(expected: &Interval, x: &Interval) -> Option<Interval> {
        if expected.is_bottom() { return None; }
        let refined = x.meet(&expected.neg());
        if refined.is_bottom() { None } else { Some(refined) }
    }

    /// Backward comparisons: `inv_lt({true}, l, r)` refines
    /// `l.hi := min(l.hi, r.hi - 1)`, `r.lo := max(r.lo, l.lo + 1)`, and so
    /// on for the other truth values and operators.
    pub fn inv_lt(expected: &BoolLattice, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        let (Interval::Range(ll, lh), Interval::Range(rl, rh)) = (l, r) else { return Some((*l, *r)) };
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => {
                let l2 = Interval::normalize(*ll, (*lh).min(rh.saturating_sub(1)));
                let r2 = Interval::normalize((*rl).max(ll.saturating_add(1)), *rh);
                if l2.is_bottom() || r2.is_bottom() { None } else { Some((l2, r2)) }
            }
            BoolLattice::False => {
                // not (l < r)  <=>  l >= r
                let l2 = Interval::normalize((*ll).max(*rl), *lh);
                let r2 = Interval::normalize(*rl, (*rh).min(*lh));
                if l2.is_bottom() || r2.is_bottom() { None } else { Some((l2, r2)) }
            }
            BoolLattice::Top => Some((*l, *r)),
        }
    }

    pub fn inv_le(expected: &BoolLattice, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        let (Interval::Range(ll, lh), Interval::Range(rl, rh)) = (l, r) else { return Some((*l, *r)) };
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => {
                let l2 = Interval::normalize(*ll, (*lh).min(*rh));
                let r2 = Interval::normalize((*rl).max(*ll), *rh);
                if l2.is_bottom() || r2.is_bottom() { None } else { Some((l2, r2)) }
            }
            BoolLattice::False => Interval::inv_lt(&BoolLattice::True, r, l).map(|(r2, l2)| (l2, r2)),
            BoolLattice::Top => Some((*l, *r)),
        }
    }

    pub fn inv_gt(expected: &BoolLattice, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        Interval::inv_lt(expected, r, l).map(|(r2, l2)| (l2, r2))
    }

    pub fn inv_ge(expected: &BoolLattice, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        Interval::inv_le(expected, r, l).map(|(r2, l2)| (l2, r2))
    }

    pub fn inv_eq(expected: &BoolLattice, l: &Interval, r: &Interval) -> Option<(Interval, Interval)> {
        match expected {
            BoolLattice::Bottom => None,
            BoolLattice::True => {
                let m = l.meet(r);
                if m.is_bottom() { None } else { Some((m, m)) }
            }
            _ => Some((*l, *r)),
        }
    }

    /// Splits `self \ other` into a finite cover.
    /// At most two pieces: the part below `other` and the part above it.
    pub fn split(&self, other: &Interval) -> Vec<Interval> {
        let (Interval::Range(sl, sh), Interval::Range(ol, oh)) = (self, other) else {
            return if self.is_bottom() { vec![] } else { vec![*self] };
        };
        let mut pieces = Vec::new();
        if *sl < *ol {
            pieces.push(Interval::Range(*sl, (*ol - 1).min(*sh)));
        }
        if *sh > *oh {
            pieces.push(Interval::Range((*oh + 1).max(*sl), *sh));
        }
        pieces.retain(|p| !p.is_bottom());
        pieces
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn assume_refines_interval_through_and() {
        // x in [-20, 20]; assume(x >= 0 and x <= 10) -> x in [0, 10].
        let x = Interval::Range(-20, 20);
        let (x1, _) = Interval::inv_ge(&BoolLattice::True, &x, &Interval::point(0)).unwrap();
        let (x2, _) = Interval::inv_le(&BoolLattice::True, &x1, &Interval::point(10)).unwrap();
        assert_eq!(x2, Interval::Range(0, 10));
    }

    #[test]
    fn inv_eq_of_conflicting_points_is_infeasible() {
        assert_eq!(Interval::inv_eq(&BoolLattice::True, &Interval::point(5), &Interval::point(7)), None);
    }

    #[test]
    fn add_then_inv_add_refines_to_a_subset() {
        let l = Interval::Range(0, 10);
        let r = Interval::Range(0, 10);
        let out = l.add(&r);
        let (l2, r2) = Interval::inv_add(&out, &l, &r).unwrap();
        assert!(l2.le(&l));
        assert!(r2.le(&r));
    }

    #[test]
    fn split_covers_the_difference() {
        let a = Interval::Range(-10, 10);
        let b = Interval::Range(3, 3);
        let pieces = a.split(&b);
        assert_eq!(pieces, vec![Interval::Range(-10, 2), Interval::Range(4, 10)]);
    }
}
