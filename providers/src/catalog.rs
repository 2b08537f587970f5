// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The base provider: wraps `adastat_ops::catalog`'s flat operator dispatch
//! as a `Provider`. Answers every signature whose operator the catalog
//! covers and whose arity matches, except `Eq`/`Neq` over a `Product`
//! input, which it explicitly declines — that shape belongs to
//! `Lifted`, which asks this same provider for the per-component scalar
//! signature instead of trying to resolve the composite one directly.

use crate::{
    provider::{Bwd, Fwd},
    Provider, Signature,
};
use adastat_domains::{AbsValue, DomainKind};
use adastat_ir::Operator;
use std::rc::Rc;

/// Fixed input arity per operator, used only to reject an obviously
/// mis-shaped signature before ever constructing closures for it.
fn arity(op: &Operator) -> usize {
    use Operator::*;
    match op {
        Not | Neg | GetField(_) | IndexRange | CopyOffset(_) => 1,
        And | Or | Eq | Neq | Add | Sub | Lt | Le | Gt | Ge | Get | InValuesOf | Offset(_) | InRange(_) | Deref => 2,
        UpdateField(_) | Update => 3,
        AddressOf | Call | Cast => 0,
    }
}

fn is_covered(op: &Operator) -> bool {
    !matches!(op, Operator::AddressOf | Operator::Call | Operator::Cast)
}

pub struct BaseProvider;

impl Provider for BaseProvider {
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)> {
        if !is_covered(&sig.name) || sig.inputs.len() != arity(&sig.name) {
            return None;
        }
        // `Eq`/`Neq` over a product belongs to `Lifted`; this provider only
        // answers the scalar per-domain case.
        if matches!(sig.name, Operator::Eq | Operator::Neq) && sig.inputs.iter().any(|k| matches!(k, DomainKind::Product(_))) {
            return None;
        }
        let fwd_op = sig.name.clone();
        let bwd_op = sig.name.clone();
        let fwd: Fwd = Rc::new(move |args: &[AbsValue]| adastat_ops::apply_forward(&fwd_op, args));
        let bwd: Bwd = Rc::new(move |expected: &AbsValue, args: &[AbsValue]| adastat_ops::apply_backward(&bwd_op, expected, args));
        Some((fwd, bwd))
    }
}

/// The default provider chain an evaluator builds once per analysis run:
/// the scalar/composite catalog, with product-shaped `eq`/`neq` answered by
/// sequencing into per-component catalog lookups, memoized so the same
/// `Signature` is only ever resolved once.
pub fn base_provider() -> impl Provider {
    BaseProvider.or(crate::Lifted::new(BaseProvider)).memoized()
}
