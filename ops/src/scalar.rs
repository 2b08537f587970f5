// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Forward and backward implementations for the scalar operators (`not`,
//! `and`, `or`, `eq`, `neq`, `add`, `sub`, `neg`, `lt`, `le`, `gt`, `ge`).
//! Every function dispatches on the `AbsValue` variant and calls straight
//! into the owning domain's own method; the `adastat-providers` crate is
//! what turns these into `Signature`-keyed entries, including the
//! per-component composition needed for `Product`.

use adastat_domains::{AbsValue, AccessPathSet, BoolLattice, FiniteSet, Interval};

pub fn not_fwd(x: &AbsValue) -> AbsValue {
    match x {
        AbsValue::Bool(b) => AbsValue::Bool(b.not()),
        _ => AbsValue::Universe,
    }
}

pub fn not_bwd(expected: &AbsValue, x: &AbsValue) -> Option<AbsValue> {
    match (expected, x) {
        (AbsValue::Bool(e), AbsValue::Bool(v)) => BoolLattice::inv_not(e, v).map(AbsValue::Bool),
        _ => Some(x.clone()),
    }
}

pub fn and_fwd(l: &AbsValue, r: &AbsValue) -> AbsValue {
    match (l, r) {
        (AbsValue::Bool(a), AbsValue::Bool(b)) => AbsValue::Bool(a.and(b)),
        _ => AbsValue::Universe,
    }
}

pub fn and_bwd(expected: &AbsValue, l: &AbsValue, r: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    match (expected, l, r) {
        (AbsValue::Bool(e), AbsValue::Bool(a), AbsValue::Bool(b)) => {
            BoolLattice::inv_and(e, a, b).map(|(a, b)| (AbsValue::Bool(a), AbsValue::Bool(b)))
        }
        _ => Some((l.clone(), r.clone())),
    }
}

pub fn or_fwd(l: &AbsValue, r: &AbsValue) -> AbsValue {
    match (l, r) {
        (AbsValue::Bool(a), AbsValue::Bool(b)) => AbsValue::Bool(a.or(b)),
        _ => AbsValue::Universe,
    }
}

pub fn or_bwd(expected: &AbsValue, l: &AbsValue, r: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    match (expected, l, r) {
        (AbsValue::Bool(e), AbsValue::Bool(a), AbsValue::Bool(b)) => {
            BoolLattice::inv_or(e, a, b).map(|(a, b)| (AbsValue::Bool(a), AbsValue::Bool(b)))
        }
        _ => Some((l.clone(), r.clone())),
    }
}

/// Forward `eq`/`neq` are domain-agnostic: `AbsValue::eq_abs` already folds
/// structurally over every variant, including `Product` (the conjunction of
/// component equalities). Backward `eq` is not: it needs the per-domain
/// refinement below (and, for `Product`, the sequenced provider in
/// `adastat-providers` that asks each component in turn).
pub fn eq_fwd(l: &AbsValue, r: &AbsValue) -> AbsValue {
    AbsValue::Bool(l.eq_abs(r))
}

pub fn neq_fwd(l: &AbsValue, r: &AbsValue) -> AbsValue {
    AbsValue::Bool(l.neq_abs(r))
}

pub fn eq_bwd(expected: &AbsValue, l: &AbsValue, r: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    let AbsValue::Bool(e) = expected else { return Some((l.clone(), r.clone())) };
    match (l, r) {
        (AbsValue::Bool(a), AbsValue::Bool(b)) => BoolLattice::inv_eq(e, a, b).map(|(a, b)| (AbsValue::Bool(a), AbsValue::Bool(b))),
        (AbsValue::Finite(a), AbsValue::Finite(b)) => FiniteSet::inv_eq(e, a, b).map(|(a, b)| (AbsValue::Finite(a), AbsValue::Finite(b))),
        (AbsValue::Interval(a), AbsValue::Interval(b)) => Interval::inv_eq(e, a, b).map(|(a, b)| (AbsValue::Interval(a), AbsValue::Interval(b))),
        (AbsValue::AccessPath(a), AbsValue::AccessPath(b)) => {
            AccessPathSet::inv_eq(e, a, b).map(|(a, b)| (AbsValue::AccessPath(a), AbsValue::AccessPath(b)))
        }
        // Memory eq/neq is explicitly not refined: any caller relying on
        // refinement here just keeps its current bounds rather than
        // getting a spurious answer.
        (AbsValue::Memory(_), AbsValue::Memory(_)) => Some((l.clone(), r.clone())),
        _ => Some((l.clone(), r.clone())),
    }
}

pub fn neq_bwd(expected: &AbsValue, l: &AbsValue, r: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    let AbsValue::Bool(e) = expected else { return Some((l.clone(), r.clone())) };
    eq_bwd(&AbsValue::Bool(e.not()), l, r)
}

macro_rules! interval_binop {
    ($fwd_name:ident, $bwd_name:ident, $fwd_call:ident, $bwd_call:path) => {
        pub fn $fwd_name(l: &AbsValue, r: &AbsValue) -> AbsValue {
            match (l, r) {
                (AbsValue::Interval(a), AbsValue::Interval(b)) => AbsValue::Interval(a.$fwd_call(b)),
                _ => AbsValue::Universe,
            }
        }

        pub fn $bwd_name(expected: &AbsValue, l: &AbsValue, r: &AbsValue) -> Option<(AbsValue, AbsValue)> {
            match (expected, l, r) {
                (AbsValue::Interval(e), AbsValue::Interval(a), AbsValue::Interval(b)) => {
                    $bwd_call(e, a, b).map(|(a, b)| (AbsValue::Interval(a), AbsValue::Interval(b)))
                }
                _ => Some((l.clone(), r.clone())),
            }
        }
    };
}

interval_binop!(add_fwd, add_bwd, add, Interval::inv_add);
interval_binop!(sub_fwd, sub_bwd, sub, Interval::inv_sub);

pub fn neg_fwd(x: &AbsValue) -> AbsValue {
    match x {
        AbsValue::Interval(v) => AbsValue::Interval(v.neg()),
        _ => AbsValue::Universe,
    }
}

pub fn neg_bwd(expected: &AbsValue, x: &AbsValue) -> Option<AbsValue> {
    match (expected, x) {
        (AbsValue::Interval(e), AbsValue::Interval(v)) => Interval::inv_neg(e, v).map(AbsValue::Interval),
        _ => Some(x.clone()),
    }
}

macro_rules! interval_cmp {
    ($fwd_name:ident, $bwd_name:ident, $fwd_call:ident, $bwd_call:path) => {
        pub fn $fwd_name(l: &AbsValue, r: &AbsValue) -> AbsValue {
            match (l, r) {
                (AbsValue::Interval(a), AbsValue::Interval(b)) => AbsValue::Bool(a.$fwd_call(b)),
                _ => AbsValue::Universe,
            }
        }

        pub fn $bwd_name(expected: &AbsValue, l: &AbsValue, r: &AbsValue) -> Option<(AbsValue, AbsValue)> {
            match (expected, l, r) {
                (AbsValue::Bool(e), AbsValue::Interval(a), AbsValue::Interval(b)) => {
                    $bwd_call(e, a, b).map(|(a, b)| (AbsValue::Interval(a), AbsValue::Interval(b)))
                }
                _ => Some((l.clone(), r.clone())),
            }
        }
    };
}

interval_cmp!(lt_fwd, lt_bwd, lt, Interval::inv_lt);
interval_cmp!(le_fwd, le_bwd, le_op, Interval::inv_le);
interval_cmp!(gt_fwd, gt_bwd, gt, Interval::inv_gt);
interval_cmp!(ge_fwd, ge_bwd, ge, Interval::inv_ge);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_is_monotone_on_enclosing_ranges() {
        let a = AbsValue::Interval(Interval::Range(0, 5));
        let b = AbsValue::Interval(Interval::Range(0, 10));
        let wide = add_fwd(&b, &b);
        let narrow = add_fwd(&a, &a);
        assert!(narrow.le(&wide));
    }

    #[test]
    fn inv_and_infeasible_propagates_as_none() {
        assert_eq!(and_bwd(&AbsValue::Bool(BoolLattice::Bottom), &AbsValue::Bool(BoolLattice::Top), &AbsValue::Bool(BoolLattice::Top)), None);
    }

    #[test]
    fn eq_fwd_then_eq_bwd_refines_intervals() {
        let l = AbsValue::Interval(Interval::Range(0, 10));
        let r = AbsValue::Interval(Interval::Range(5, 20));
        let out = eq_fwd(&l, &r);
        let (l2, r2) = eq_bwd(&out, &l, &r).unwrap();
        assert!(l2.le(&l));
        assert!(r2.le(&r));
    }

    #[test]
    fn memory_eq_backward_is_left_unrefined() {
        use adastat_domains::Memory;
        let m = AbsValue::Memory(Memory::bottom());
        let (m1, m2) = eq_bwd(&AbsValue::Bool(BoolLattice::True), &m, &m).unwrap();
        assert_eq!(m1, m);
        assert_eq!(m2, m);
    }
}
