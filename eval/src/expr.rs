// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Forward and backward expression evaluation. Forward
//! evaluation resolves a `FunCall`'s signature through its arguments' (and,
//! failing that, its own) type interpretation and applies the matched
//! provider's forward function; backward evaluation walks the same tree
//! applying the matched backward function, refining every `Identifier` leaf
//! it reaches.

use crate::Env;
use adastat_domains::{AbsValue, DomainKind};
use adastat_errors::{Handler, Warning};
use adastat_ir::{Expression, FunCallExpr, Operator};
use adastat_providers::{Provider, Signature};
use adastat_types::{resolve, Interpreter, TypeInterpretation};
use std::rc::Rc;

pub fn eval_expr(interp: &Rc<dyn Interpreter>, expr: &Expression, env: &Env, handler: &Handler) -> AbsValue {
    match expr {
        Expression::Identifier(id) => env.get(id.var),
        Expression::Lit(lit) => match resolve(interp, &lit.type_hint) {
            Some(ty) => (ty.literal)(&lit.value),
            None => {
                handler.emit_warning(Warning::UnsupportedType { span: lit.span.clone(), type_name: lit.type_hint.to_string() });
                AbsValue::Universe
            }
        },
        Expression::FunCall(call) => eval_call(interp, call, env, handler),
    }
}

/// The providers willing to answer a call's signature: every argument's own
/// interpretation first (so a modeled operand's `ModeledProvider` gets a
/// chance), then the call's own result-type interpretation as a fallback.
/// Every non-modeled `TypeInterpretation` in this codebase shares the same
/// `base_provider()` instance in practice, so the order only matters when a
/// `Modeled` type is among the operands.
fn candidate_providers(arg_interps: &[Option<TypeInterpretation>], out_interp: &Option<TypeInterpretation>) -> Vec<Rc<dyn Provider>> {
    let mut providers: Vec<Rc<dyn Provider>> = arg_interps.iter().flatten().map(|i| i.provider.clone()).collect();
    if let Some(out) = out_interp {
        providers.push(out.provider.clone());
    }
    providers
}

fn domain_or_universe(interp: &Option<TypeInterpretation>) -> DomainKind {
    interp.as_ref().map(|i| i.domain.clone()).unwrap_or(DomainKind::Universe)
}

fn eval_call(interp: &Rc<dyn Interpreter>, call: &FunCallExpr, env: &Env, handler: &Handler) -> AbsValue {
    if call.operator == Operator::AddressOf {
        if let Some(Expression::Identifier(id)) = call.args.first() {
            return adastat_ops::address_of(id.var.0);
        }
        return AbsValue::Universe;
    }

    let arg_vals: Vec<AbsValue> = call.args.iter().map(|a| eval_expr(interp, a, env, handler)).collect();
    let arg_interps: Vec<Option<TypeInterpretation>> = call.args.iter().map(|a| resolve(interp, a.type_hint())).collect();
    let out_interp = resolve(interp, &call.type_hint);

    let inputs: Vec<DomainKind> = arg_interps.iter().map(domain_or_universe).collect();
    let output = out_interp.as_ref().map(|i| i.domain.clone());
    let sig = Signature::new(call.operator.clone(), inputs, output);

    for provider in candidate_providers(&arg_interps, &out_interp) {
        if let Some((fwd, _bwd)) = provider.get(&sig) {
            if let Some(v) = fwd(&arg_vals) {
                return v;
            }
        }
    }

    handler.emit_warning(Warning::UnsupportedOp { span: call.span.clone(), operator: call.operator.to_string() });
    out_interp.map(|i| i.default_top).unwrap_or(AbsValue::Universe)
}

/// Refines `env` so that `expr` evaluates to (at least) `expected`, walking
/// down to every free `Identifier`. Returns `false` when the constraint is
/// infeasible (the trace should be dropped), `true` otherwise — `env` is
/// only meaningfully mutated when this returns `true`.
pub fn backward_eval(interp: &Rc<dyn Interpreter>, expr: &Expression, expected: &AbsValue, env: &mut Env, handler: &Handler) -> bool {
    match expr {
        Expression::Identifier(id) => {
            let refined = env.get(id.var).meet(expected);
            if refined.is_empty() {
                return false;
            }
            env.set(id.var, refined);
            true
        }
        Expression::Lit(_) => true,
        Expression::FunCall(call) if call.operator == Operator::AddressOf => {
            let _ = (call, env);
            true
        }
        Expression::FunCall(call) => {
            let arg_vals: Vec<AbsValue> = call.args.iter().map(|a| eval_expr(interp, a, env, handler)).collect();
            let arg_interps: Vec<Option<TypeInterpretation>> = call.args.iter().map(|a| resolve(interp, a.type_hint())).collect();
            let out_interp = resolve(interp, &call.type_hint);
            let inputs: Vec<DomainKind> = arg_interps.iter().map(domain_or_universe).collect();
            let output = out_interp.as_ref().map(|i| i.domain.clone());
            let sig = Signature::new(call.operator.clone(), inputs, output);

            for provider in candidate_providers(&arg_interps, &out_interp) {
                if let Some((_fwd, bwd)) = provider.get(&sig) {
                    return match bwd(expected, &arg_vals) {
                        None => false,
                        Some(refined_args) => {
                            for (arg_expr, refined) in call.args.iter().zip(refined_args) {
                                if !backward_eval(interp, arg_expr, &refined, env, handler) {
                                    return false;
                                }
                            }
                            true
                        }
                    };
                }
            }
            // No provider covers this shape: leave the arguments unrefined
            // rather than treat the constraint as infeasible.
            true
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_domains::{BoolLattice, Interval};
    use adastat_ir::{ConstValue, IdentifierExpr, LitExpr, SourceType, VarId};
    use adastat_span::Span;

    fn chain() -> Rc<dyn Interpreter> {
        adastat_types::default_interpreter()
    }

    fn var(id: usize, lo: i128, hi: i128) -> Expression {
        Expression::Identifier(IdentifierExpr { id: 1000 + id, span: Span::dummy(), var: VarId(id), type_hint: SourceType::IntegerRange { lo, hi } })
    }

    fn int_lit(n: i128) -> Expression {
        Expression::Lit(LitExpr { id: 2000 + n as usize, span: Span::dummy(), value: ConstValue::Integer(n), type_hint: SourceType::IntegerRange { lo: 0, hi: 100 } })
    }

    fn call(op: Operator, args: Vec<Expression>, ty: SourceType) -> Expression {
        Expression::FunCall(FunCallExpr { id: 3000, span: Span::dummy(), operator: op, args, type_hint: ty, param_types: None })
    }

    #[test]
    fn forward_eval_computes_add_through_the_interval_domain() {
        let interp = chain();
        let mut env = Env::new();
        env.set(VarId(0), AbsValue::Interval(Interval::Range(0, 5)));
        let expr = call(Operator::Add, vec![var(0, 0, 10), int_lit(1)], SourceType::IntegerRange { lo: 0, hi: 11 });
        let handler = Handler::new();
        let result = eval_expr(&interp, &expr, &env, &handler);
        assert_eq!(result, AbsValue::Interval(Interval::Range(1, 6)));
    }

    #[test]
    fn backward_eval_refines_a_free_variable_through_lt() {
        let interp = chain();
        let mut env = Env::new();
        env.set(VarId(0), AbsValue::Interval(Interval::Range(0, 100)));
        let expr = call(Operator::Lt, vec![var(0, 0, 100), int_lit(10)], SourceType::Boolean);
        let handler = Handler::new();
        let feasible = backward_eval(&interp, &expr, &AbsValue::Bool(BoolLattice::True), &mut env, &handler);
        assert!(feasible);
        assert_eq!(env.get(VarId(0)), AbsValue::Interval(Interval::Range(0, 9)));
    }

    #[test]
    fn backward_eval_reports_infeasible_for_a_contradictory_constraint() {
        let interp = chain();
        let mut env = Env::new();
        env.set(VarId(0), AbsValue::Interval(Interval::Range(20, 100)));
        let expr = call(Operator::Lt, vec![var(0, 0, 100), int_lit(10)], SourceType::Boolean);
        let handler = Handler::new();
        let feasible = backward_eval(&interp, &expr, &AbsValue::Bool(BoolLattice::True), &mut env, &handler);
        assert!(!feasible);
    }
}
