// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The universal-type rewrite. `UniversalInteger`/`UniversalReal` are
//! placeholder type hints a front end leaves on numeric literals whose
//! concrete type is only pinned down by the context they appear in (`x + 1`
//! takes `1`'s type from `x`'s). This pass resolves every such hint in a
//! procedure's body to a concrete type before the evaluator (which has no
//! interpretation for a universal type, see `adastat_types::DefaultInterpreter`)
//! ever sees it, mutating `type_hint` fields in place rather than building a
//! parallel table.

use adastat_ir::{Block, Procedure, SourceType, Statement, Variable};

/// The type a universal integer falls back to absent any better context —
/// the language's default `Integer`, modelled as the full machine-width
/// range so it never spuriously narrows a call it's merely a participant
/// in.
pub fn default_integer_type() -> SourceType {
    SourceType::IntegerRange { lo: i128::MIN, hi: i128::MAX }
}

pub fn default_real_type() -> SourceType {
    SourceType::RealRange { lo: f64::MIN, hi: f64::MAX }
}

pub fn rewrite_universal_types(procedure: &mut Procedure) {
    let Procedure { variables, body, .. } = procedure;
    rewrite_block(body, variables);
}

fn rewrite_block(block: &mut Block, variables: &mut [Variable]) {
    for stmt in &mut block.statements {
        rewrite_stmt(stmt, variables);
    }
}

fn rewrite_stmt(stmt: &mut Statement, variables: &mut [Variable]) {
    match stmt {
        Statement::Assign(a) => {
            rewrite_expr(&mut a.value, None);
            if let Some(var) = variables.iter_mut().find(|v| v.index == a.target) {
                if var.type_hint.is_universal() {
                    var.type_hint = a.value.type_hint().clone();
                }
            }
        }
        Statement::Assume(a) => rewrite_expr(&mut a.condition, None),
        Statement::Split(s) => {
            for b in &mut s.branches {
                rewrite_block(b, variables);
            }
        }
        Statement::Loop(l) => rewrite_block(&mut l.body, variables),
        Statement::Label(_) | Statement::Read(_) | Statement::Goto(_) => {}
    }
}

fn rewrite_expr(expr: &mut adastat_ir::Expression, expected: Option<&SourceType>) {
    use adastat_ir::Expression;
    match expr {
        Expression::Identifier(_) => {}
        Expression::Lit(lit) => {
            if lit.type_hint.is_universal() {
                lit.type_hint = resolved_universal(&lit.type_hint, expected);
            }
        }
        Expression::FunCall(call) => {
            let param_types = call.param_types.clone();
            for (i, arg) in call.args.iter_mut().enumerate() {
                let expected_arg = param_types.as_ref().and_then(|p| p.get(i)).filter(|t| !t.is_universal());
                rewrite_expr(arg, expected_arg);
            }
            if call.type_hint.is_universal() {
                // Once its arguments are resolved, a call's own universal
                // result type takes the first non-universal argument type it
                // finds (this covers `Add`/`Sub`/`Neg`/comparisons, the only
                // operators whose result type can itself be universal).
                let from_arg = call.args.iter().map(|a| a.type_hint()).find(|t| !t.is_universal()).cloned();
                call.type_hint = resolved_universal(&call.type_hint, from_arg.as_ref().or(expected));
            }
        }
    }
}

fn resolved_universal(hint: &SourceType, expected: Option<&SourceType>) -> SourceType {
    match expected {
        Some(ty) if !ty.is_universal() => ty.clone(),
        _ => match hint {
            SourceType::UniversalInteger => default_integer_type(),
            SourceType::UniversalReal => default_real_type(),
            other => other.clone(),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_ir::{AssignStmt, ConstValue, Expression, LitExpr, VarId, VariableMode};
    use adastat_span::{Span, Symbol};

    fn universal_lit(n: i128) -> Expression {
        Expression::Lit(LitExpr { id: 1, span: Span::dummy(), value: ConstValue::Integer(n), type_hint: SourceType::UniversalInteger })
    }

    fn procedure_with(var_ty: SourceType, value: Expression) -> Procedure {
        Procedure {
            name: Symbol::intern("p"),
            span: Span::dummy(),
            variables: vec![Variable { name: Symbol::intern("x"), type_hint: var_ty, mode: VariableMode::Local, index: VarId(0), purpose: None }],
            body: Block::new(vec![Statement::Assign(AssignStmt { id: 2, span: Span::dummy(), target: VarId(0), value })]),
        }
    }

    #[test]
    fn a_universal_literal_with_no_context_falls_back_to_the_default_integer_type() {
        let mut proc = procedure_with(SourceType::IntegerRange { lo: 0, hi: 10 }, universal_lit(5));
        rewrite_universal_types(&mut proc);
        let Statement::Assign(a) = &proc.body.statements[0] else { unreachable!() };
        assert_eq!(*a.value.type_hint(), default_integer_type());
    }

    #[test]
    fn an_assignment_to_a_universal_target_adopts_the_resolved_rhs_type() {
        let mut proc = procedure_with(SourceType::UniversalInteger, universal_lit(5));
        rewrite_universal_types(&mut proc);
        assert_eq!(proc.variables[0].type_hint, default_integer_type());
    }
}
