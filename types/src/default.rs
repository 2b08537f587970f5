// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The primitive/product/array/pointer/memory interpreter, minus the
//! modeled-type case (`crate::modeled::ModeledInterpreter`, composed on top
//! of this one).

use crate::{Interpreter, TypeInterpretation};
use adastat_domains::{AbsValue, DomainKind, FiniteSet, Interval};
use adastat_ir::SourceType;
use adastat_providers::base_provider;
use std::rc::Rc;

pub struct DefaultInterpreter;

impl Interpreter for DefaultInterpreter {
    fn interpret(&self, top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation> {
        match ty {
            SourceType::Boolean => Some(TypeInterpretation::new(DomainKind::Bool, Rc::new(base_provider()))),

            // Reinterpreted as the interval `0..127`; literal builds via the
            // character's ordinal (`DomainKind::literal`'s `Character` arm).
            SourceType::Character => Some(
                TypeInterpretation::new(DomainKind::Interval, Rc::new(base_provider()))
                    .with_default_top(AbsValue::Interval(Interval::Range(0, 127))),
            ),

            SourceType::IntegerRange { lo, hi } => Some(
                TypeInterpretation::new(DomainKind::Interval, Rc::new(base_provider()))
                    .with_default_top(AbsValue::Interval(Interval::Range(*lo, *hi))),
            ),

            // No precise real abstraction; everything about a real-range
            // variable is `⊤` from the start.
            SourceType::RealRange { .. } => Some(TypeInterpretation::new(DomainKind::Universe, Rc::new(base_provider()))),

            // `FiniteSet` already represents both the ≤4-literal power-set
            // case and the >4-literal subset case identically (see
            // `adastat_domains::FiniteSet`'s own doc comment); no need for
            // two different Rust types here.
            SourceType::Enumeration(lits) => {
                let carrier = std::sync::Arc::new(lits.clone());
                Some(TypeInterpretation::new(DomainKind::Finite(carrier), Rc::new(base_provider())))
            }

            SourceType::Product(fields) => {
                let mut component_kinds = Vec::with_capacity(fields.len());
                for (_, field_ty) in fields {
                    component_kinds.push(top.interpret(top, field_ty)?.domain);
                }
                Some(TypeInterpretation::new(DomainKind::Product(component_kinds), Rc::new(base_provider())))
            }

            // Field get/update and eq/neq on the pointee don't belong to the
            // pointer's own interpretation (they're the pointee's), so this
            // only has to resolve to the access-path domain; `adastat-eval`
            // pairs a `Pointer` with its pointee's interpretation when it
            // needs to deref.
            SourceType::Pointer(_) => Some(TypeInterpretation::new(DomainKind::AccessPath, Rc::new(base_provider()))),

            SourceType::Array { element, .. } => {
                let elem_kind = top.interpret(top, element)?.domain;
                Some(TypeInterpretation::new(DomainKind::SparseArray(Box::new(elem_kind)), Rc::new(base_provider())))
            }

            SourceType::Memory => Some(TypeInterpretation::new(DomainKind::Memory, Rc::new(base_provider()))),

            // Rewritten away by the universal-type pass before the evaluator
            // runs; answering `Universe` here keeps `adastat-eval` total for
            // a node the rewrite failed to reach.
            SourceType::UniversalInteger | SourceType::UniversalReal => {
                Some(TypeInterpretation::new(DomainKind::Universe, Rc::new(base_provider())))
            }

            SourceType::Unknown => Some(TypeInterpretation::new(DomainKind::Universe, Rc::new(base_provider()))),

            // Handled by `ModeledInterpreter`, composed in front of this one.
            SourceType::Modeled { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resolve;

    fn default_top() -> Rc<dyn Interpreter> {
        Rc::new(DefaultInterpreter.memoized())
    }

    #[test]
    fn boolean_resolves_to_the_boolean_domain() {
        let top = default_top();
        let interp = resolve(&top, &SourceType::Boolean).unwrap();
        assert_eq!(interp.domain, DomainKind::Bool);
    }

    #[test]
    fn integer_range_havocs_to_its_declared_bounds_not_full_width() {
        let top = default_top();
        let interp = resolve(&top, &SourceType::IntegerRange { lo: 0, hi: 10 }).unwrap();
        assert_eq!(interp.default_top, AbsValue::Interval(Interval::Range(0, 10)));
    }

    #[test]
    fn product_interprets_every_field_recursively() {
        let top = default_top();
        let ty = SourceType::Product(vec![
            (adastat_span::Symbol::intern("a"), SourceType::Boolean),
            (adastat_span::Symbol::intern("b"), SourceType::IntegerRange { lo: 0, hi: 1 }),
        ]);
        let interp = resolve(&top, &ty).unwrap();
        assert_eq!(interp.domain, DomainKind::Product(vec![DomainKind::Bool, DomainKind::Interval]));
    }

    #[test]
    fn unknown_resolves_to_universe() {
        let top = default_top();
        let interp = resolve(&top, &SourceType::Unknown).unwrap();
        assert_eq!(interp.domain, DomainKind::Universe);
    }

    #[test]
    fn memoized_interpreter_returns_pointer_equal_domains_for_repeat_types() {
        let top = default_top();
        let a = resolve(&top, &SourceType::Boolean).unwrap();
        let b = resolve(&top, &SourceType::Boolean).unwrap();
        assert!(Rc::ptr_eq(&a.provider, &b.provider));
    }

    #[test]
    fn enumeration_uses_the_same_finite_set_domain_regardless_of_size() {
        let top = default_top();
        let small = std::sync::Arc::new(vec![adastat_span::Symbol::intern("a"), adastat_span::Symbol::intern("b")]);
        let small_interp = resolve(&top, &SourceType::Enumeration((*small).clone())).unwrap();
        assert!(matches!(small_interp.domain, DomainKind::Finite(_)));
        let _ = FiniteSet::bottom(small);
    }
}
