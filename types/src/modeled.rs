// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The modeled (ghost-augmented) type interpreter: a product of the actual
//! and model domain that auto-promotes operations on the actual domain.
//! A modeled value is `(actual, ghost)`; every provider
//! request against its domain is answered by stripping the ghost component,
//! asking the actual type's own provider, and padding the ghost back on
//! (with its current value passed through unrefined, since ghost refinement
//! is not attempted any more than memory eq/neq backward is — see
//! DESIGN.md).

use crate::{Interpreter, TypeInterpretation};
use adastat_domains::{AbsValue, DomainKind};
use adastat_providers::{Bwd, Fwd, Provider, Signature};
use adastat_ir::SourceType;
use std::rc::Rc;

pub struct ModeledInterpreter;

impl Interpreter for ModeledInterpreter {
    fn interpret(&self, top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation> {
        let SourceType::Modeled { actual, ghost } = ty else { return None };
        let actual_interp = top.interpret(top, actual)?;
        let ghost_interp = top.interpret(top, ghost)?;
        let domain = DomainKind::Product(vec![actual_interp.domain.clone(), ghost_interp.domain.clone()]);

        let provider: Rc<dyn Provider> = Rc::new(ModeledProvider {
            modeled_domain: domain.clone(),
            actual_domain: actual_interp.domain.clone(),
            ghost_top: ghost_interp.default_top.clone(),
            inner: actual_interp.provider.clone(),
        });

        let literal_actual = actual_interp.literal.clone();
        let ghost_top_for_literal = ghost_interp.default_top.clone();
        let literal: Rc<dyn Fn(&adastat_ir::ConstValue) -> AbsValue> =
            Rc::new(move |v| AbsValue::Product(vec![literal_actual(v), ghost_top_for_literal.clone()]));

        let default_top = AbsValue::Product(vec![actual_interp.default_top.clone(), ghost_interp.default_top.clone()]);

        Some(TypeInterpretation { domain, provider, literal, default_top })
    }
}

struct ModeledProvider {
    modeled_domain: DomainKind,
    actual_domain: DomainKind,
    ghost_top: AbsValue,
    inner: Rc<dyn Provider>,
}

impl Provider for ModeledProvider {
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)> {
        if !sig.contains(&self.modeled_domain) {
            return None;
        }
        let substituted = sig.substitute(&self.modeled_domain, &self.actual_domain);
        let (inner_fwd, inner_bwd) = self.inner.get(&substituted)?;

        let modeled_positions: Vec<bool> = sig.inputs.iter().map(|k| *k == self.modeled_domain).collect();
        let modeled_output = sig.output.as_ref() == Some(&self.modeled_domain);
        let ghost_top = self.ghost_top.clone();

        let fwd_positions = modeled_positions.clone();
        let fwd_ghost_top = ghost_top.clone();
        let fwd: Fwd = Rc::new(move |args: &[AbsValue]| -> Option<AbsValue> {
            let mut actual_args = Vec::with_capacity(args.len());
            for (i, a) in args.iter().enumerate() {
                if fwd_positions[i] {
                    let AbsValue::Product(parts) = a else { return None };
                    actual_args.push(parts.first()?.clone());
                } else {
                    actual_args.push(a.clone());
                }
            }
            let result = inner_fwd(&actual_args)?;
            Some(if modeled_output { AbsValue::Product(vec![result, fwd_ghost_top.clone()]) } else { result })
        });

        let bwd_positions = modeled_positions;
        let bwd: Bwd = Rc::new(move |expected: &AbsValue, args: &[AbsValue]| -> Option<Vec<AbsValue>> {
            let mut actual_args = Vec::with_capacity(args.len());
            let mut ghosts: Vec<Option<AbsValue>> = Vec::with_capacity(args.len());
            for (i, a) in args.iter().enumerate() {
                if bwd_positions[i] {
                    let AbsValue::Product(parts) = a else { return None };
                    actual_args.push(parts.first()?.clone());
                    ghosts.push(Some(parts.get(1)?.clone()));
                } else {
                    actual_args.push(a.clone());
                    ghosts.push(None);
                }
            }
            let actual_expected = if modeled_output {
                let AbsValue::Product(parts) = expected else { return None };
                parts.first()?.clone()
            } else {
                expected.clone()
            };
            let refined = inner_bwd(&actual_expected, &actual_args)?;
            let mut out = Vec::with_capacity(refined.len());
            for (i, r) in refined.into_iter().enumerate() {
                out.push(match &ghosts[i] {
                    Some(g) => AbsValue::Product(vec![r, g.clone()]),
                    None => r,
                });
            }
            Some(out)
        });

        Some((fwd, bwd))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{resolve, DefaultInterpreter, Interpreter};
    use adastat_domains::{BoolLattice, Interval};
    use adastat_ir::Operator;

    fn chain() -> Rc<dyn Interpreter> {
        Rc::new(DefaultInterpreter.or(ModeledInterpreter).memoized())
    }

    fn modeled_type() -> SourceType {
        SourceType::Modeled { actual: Box::new(SourceType::IntegerRange { lo: 0, hi: 10 }), ghost: Box::new(SourceType::Boolean) }
    }

    #[test]
    fn modeled_domain_is_a_product_of_actual_and_ghost() {
        let top = chain();
        let interp = resolve(&top, &modeled_type()).unwrap();
        assert_eq!(interp.domain, DomainKind::Product(vec![DomainKind::Interval, DomainKind::Bool]));
    }

    #[test]
    fn add_on_a_modeled_value_promotes_through_the_actual_domain_and_pads_the_ghost() {
        let top = chain();
        let interp = resolve(&top, &modeled_type()).unwrap();
        let sig = Signature::new(Operator::Add, vec![interp.domain.clone(), interp.domain.clone()], Some(interp.domain.clone()));
        let (fwd, _) = interp.provider.get(&sig).expect("add should promote to the actual domain");
        let l = AbsValue::Product(vec![AbsValue::Interval(Interval::Range(0, 5)), AbsValue::Bool(BoolLattice::True)]);
        let r = AbsValue::Product(vec![AbsValue::Interval(Interval::Range(1, 1)), AbsValue::Bool(BoolLattice::False)]);
        let result = fwd(&[l, r]).unwrap();
        assert_eq!(result, AbsValue::Product(vec![AbsValue::Interval(Interval::Range(1, 6)), AbsValue::Bool(BoolLattice::Top)]));
    }
}
