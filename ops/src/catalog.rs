// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! A flat `Operator -> (forward, backward)` dispatch table over fixed-arity
//! `AbsValue` argument slices. This is the base case `adastat-providers`'
//! signature resolution bottoms out in for every operator except `Call`
//! and `Cast` (which have no domain-level semantics to give — a call's
//! result depends on a subprogram's own analysis, out of this crate's
//! scope, and a cast is left to the provider-miss path) and `AddressOf`
//! (which needs the raw variable index off an `Identifier` node rather
//! than an evaluated `AbsValue`, so `adastat-eval` special-cases it before
//! ever consulting a provider).

use crate::{composite, scalar};
use adastat_domains::AbsValue;
use adastat_ir::Operator;

/// Forward transfer function for `op` given its already-evaluated
/// arguments. `None` only when the arity doesn't match what `op` expects,
/// which never happens for well-typed IR, or for the three operators this
/// catalog doesn't cover.
pub fn apply_forward(op: &Operator, args: &[AbsValue]) -> Option<AbsValue> {
    use Operator::*;
    Some(match (op, args) {
        (Not, [x]) => scalar::not_fwd(x),
        (And, [l, r]) => scalar::and_fwd(l, r),
        (Or, [l, r]) => scalar::or_fwd(l, r),
        (Eq, [l, r]) => scalar::eq_fwd(l, r),
        (Neq, [l, r]) => scalar::neq_fwd(l, r),
        (Add, [l, r]) => scalar::add_fwd(l, r),
        (Sub, [l, r]) => scalar::sub_fwd(l, r),
        (Neg, [x]) => scalar::neg_fwd(x),
        (Lt, [l, r]) => scalar::lt_fwd(l, r),
        (Le, [l, r]) => scalar::le_fwd(l, r),
        (Gt, [l, r]) => scalar::gt_fwd(l, r),
        (Ge, [l, r]) => scalar::ge_fwd(l, r),
        (GetField(i), [p]) => composite::get_field_fwd(*i, p),
        (UpdateField(i), [p, v]) => composite::update_field_fwd(*i, p, v),
        (Get, [arr, idx]) => composite::array_get_fwd(arr, idx),
        (Update, [arr, idx, v]) => composite::array_updated_fwd(arr, idx, v),
        (IndexRange, [arr]) => composite::array_index_range_fwd(arr),
        (InValuesOf, [v, arr]) => composite::array_in_values_of_fwd(v, arr),
        (Offset(var), [mem, delta]) => composite::offset_fwd(*var, mem, delta),
        (CopyOffset(var), [mem]) => composite::copy_offset_fwd(*var, mem),
        (InRange(dim), [idx, arr]) => composite::in_range_fwd(*dim, idx, arr),
        (Deref, [ptr, mem]) => composite::deref_fwd(ptr, mem),
        _ => return None,
    })
}

/// Backward refinement for `op`: given the expected output and the
/// arguments' current bounds, returns the refined arguments in the same
/// order, or `None` for an infeasible combination. An arity mismatch also
/// reports `None`, which never happens for well-typed IR. `Offset`/
/// `CopyOffset`/`InRange` have no refinement to give but are not
/// infeasible, so they report `Some` of their arguments unchanged —
/// treating a missing backward function the same as an infeasible one
/// would be wrong (it would drop a reachable trace), so every operator
/// this catalog forwards also answers backward with at least the identity
/// refinement; see `adastat_eval::backward_eval`.
pub fn apply_backward(op: &Operator, expected: &AbsValue, args: &[AbsValue]) -> Option<Vec<AbsValue>> {
    use Operator::*;
    match (op, args) {
        (Not, [x]) => scalar::not_bwd(expected, x).map(|x| vec![x]),
        (And, [l, r]) => scalar::and_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Or, [l, r]) => scalar::or_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Eq, [l, r]) => scalar::eq_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Neq, [l, r]) => scalar::neq_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Add, [l, r]) => scalar::add_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Sub, [l, r]) => scalar::sub_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Neg, [x]) => scalar::neg_bwd(expected, x).map(|x| vec![x]),
        (Lt, [l, r]) => scalar::lt_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Le, [l, r]) => scalar::le_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Gt, [l, r]) => scalar::gt_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (Ge, [l, r]) => scalar::ge_bwd(expected, l, r).map(|(l, r)| vec![l, r]),
        (GetField(i), [p]) => composite::get_field_bwd(*i, expected, p).map(|p| vec![p]),
        (UpdateField(i), [p, v]) => composite::update_field_bwd(*i, expected, p, v).map(|(p, v)| vec![p, v]),
        (Get, [arr, idx]) => composite::array_get_bwd(expected, arr, idx).map(|(a, i)| vec![a, i]),
        (Update, [arr, idx, v]) => composite::array_updated_bwd(expected, arr, idx, v).map(|(a, i, v)| vec![a, i, v]),
        (IndexRange, [arr]) => composite::array_index_range_bwd(expected, arr).map(|a| vec![a]),
        (InValuesOf, [v, arr]) => composite::array_in_values_of_bwd(expected, v, arr).map(|(v, a)| vec![v, a]),
        (Deref, [ptr, mem]) => composite::deref_bwd(expected, ptr, mem).map(|(p, m)| vec![p, m]),
        // No refinement is derivable for these three yet (`Offset`/
        // `CopyOffset` shuffle a memory region rather than constrain a
        // value; `InRange` is an existence check whose interesting
        // direction is the forward one). Returning the arguments
        // unrefined is correct and distinct from `None`, which this
        // catalog reserves for genuine infeasibility — an uncovered arm
        // here must not be read as "this branch is unreachable".
        (Offset(_), [mem, delta]) => Some(vec![mem.clone(), delta.clone()]),
        (CopyOffset(_), [mem]) => Some(vec![mem.clone()]),
        (InRange(_), [idx, arr]) => Some(vec![idx.clone(), arr.clone()]),
        _ => None,
    }
}
