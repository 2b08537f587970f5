// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The sequencing combinator: decomposes a signature over a `Product`
//! domain into one signature per component, resolves each against an inner
//! provider, and recombines the per-component results into the composite
//! answer. Grounded on `lalcheck.ai.interpretations.Transformer.__rshift__`
//! (`>>` in the original), which pipes one transformer's output through
//! another; here the "pipe" is always the same shape — split on components,
//! re-run the same operator on each, fold back together — so it is exposed
//! as a single `.lifted()` combinator rather than a general-purpose `>>`
//! operator overload.
//!
//! The canonical use: `eq : (P, P) -> Bool` over a product
//! domain `P = (D1, ..., Dn)` has no direct entry in the base catalog (which
//! only knows scalar `Eq`), so it is answered by asking the inner provider
//! for `eq : (D1, D1) -> Bool`, ..., `eq : (Dn, Dn) -> Bool` and folding the
//! per-component booleans with `BoolLattice::and`/`or`.

use crate::{
    provider::{Bwd, Fwd},
    Provider, Signature,
};
use adastat_domains::{AbsValue, BoolLattice, DomainKind};
use adastat_ir::Operator;
use std::rc::Rc;

pub struct Lifted<P> {
    inner: P,
}

impl<P: Provider> Lifted<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

/// Extracts the product's component kinds from a signature whose two inputs
/// are both the same `Product` kind — the only shape this combinator
/// answers.
fn product_components(sig: &Signature) -> Option<&[DomainKind]> {
    let DomainKind::Product(ks) = sig.inputs.first()? else { return None };
    if sig.inputs.iter().all(|k| matches!(k, DomainKind::Product(other) if other == ks)) {
        Some(ks)
    } else {
        None
    }
}

impl<P: Provider> Provider for Lifted<P> {
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)> {
        if !matches!(sig.name, Operator::Eq | Operator::Neq) || sig.inputs.len() != 2 {
            return None;
        }
        let components = product_components(sig)?.to_vec();
        let is_eq = matches!(sig.name, Operator::Eq);
        let n = components.len();

        let mut component_fwds = Vec::with_capacity(n);
        let mut component_bwds = Vec::with_capacity(n);
        for k in &components {
            let component_sig = Signature::new(Operator::Eq, vec![k.clone(), k.clone()], Some(DomainKind::Bool));
            let (fwd, bwd) = self.inner.get(&component_sig)?;
            component_fwds.push(fwd);
            component_bwds.push(bwd);
        }

        let fwd: Fwd = Rc::new(move |args: &[AbsValue]| -> Option<AbsValue> {
            let (AbsValue::Product(l), AbsValue::Product(r)) = (&args[0], &args[1]) else { return None };
            if l.len() != n || r.len() != n {
                return None;
            }
            let mut acc = BoolLattice::True;
            for i in 0..n {
                let component = component_fwds[i](&[l[i].clone(), r[i].clone()])?;
                let AbsValue::Bool(b) = component else { return None };
                acc = acc.and(&b);
            }
            // `eq` on the product is the conjunction of per-component
            // equalities; `neq` is its negation, not an independent fold.
            Some(AbsValue::Bool(if is_eq { acc } else { acc.not() }))
        });

        let bwd: Bwd = Rc::new(move |expected: &AbsValue, args: &[AbsValue]| -> Option<Vec<AbsValue>> {
            let (AbsValue::Product(l), AbsValue::Product(r)) = (&args[0], &args[1]) else { return None };
            if l.len() != n || r.len() != n {
                return None;
            }
            let expect_componentwise_true = match expected {
                AbsValue::Bool(BoolLattice::True) if is_eq => true,
                AbsValue::Bool(BoolLattice::False) if !is_eq => true,
                _ => false,
            };
            // Only the "every component matches" case is precise to push
            // down; `{false}`/`⊤` (for eq) or the dual (for neq) leaves
            // every component unrefined, matching `scalar::eq_bwd`'s policy
            // for the scalar case.
            if !expect_componentwise_true {
                return Some(args.to_vec());
            }
            let mut new_l = l.clone();
            let mut new_r = r.clone();
            for i in 0..n {
                let refined = component_bwds[i](&AbsValue::Bool(BoolLattice::True), &[l[i].clone(), r[i].clone()])?;
                new_l[i] = refined[0].clone();
                new_r[i] = refined[1].clone();
            }
            Some(vec![AbsValue::Product(new_l), AbsValue::Product(new_r)])
        });

        Some((fwd, bwd))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::base_provider;
    use adastat_domains::Interval;

    #[test]
    fn lifted_eq_is_the_conjunction_of_component_equalities() {
        let lifted = Lifted::new(base_provider());
        let sig = Signature::new(
            Operator::Eq,
            vec![DomainKind::Product(vec![DomainKind::Interval, DomainKind::Bool]); 2],
            Some(DomainKind::Bool),
        );
        let (fwd, _) = lifted.get(&sig).expect("product eq should resolve");
        let l = AbsValue::Product(vec![AbsValue::Interval(Interval::point(1)), AbsValue::Bool(BoolLattice::True)]);
        let r = l.clone();
        assert_eq!(fwd(&[l, r]), Some(AbsValue::Bool(BoolLattice::True)));
    }

    #[test]
    fn lifted_eq_bwd_refines_every_component_on_a_true_expectation() {
        let lifted = Lifted::new(base_provider());
        let sig = Signature::new(Operator::Eq, vec![DomainKind::Product(vec![DomainKind::Interval]); 2], Some(DomainKind::Bool));
        let (_, bwd) = lifted.get(&sig).expect("product eq should resolve");
        let l = AbsValue::Product(vec![AbsValue::Interval(Interval::Range(0, 10))]);
        let r = AbsValue::Product(vec![AbsValue::Interval(Interval::Range(5, 20))]);
        let refined = bwd(&AbsValue::Bool(BoolLattice::True), &[l, r]).unwrap();
        let AbsValue::Product(components) = &refined[0] else { panic!() };
        assert_eq!(components[0], AbsValue::Interval(Interval::Range(5, 10)));
    }
}
