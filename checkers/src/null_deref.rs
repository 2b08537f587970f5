// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The null-dereference checker: for every `Deref` call reachable from a
//! statement's expression, evaluates the pointer operand against the
//! environment that holds *before* that statement's own effect. A checker
//! queries whether a predicate holds in every trace (a must-property) or
//! in some trace (a may-property); a dereference is flagged as soon as
//! *some*
//! trace may reach it with a null pointer; its gravity is `High` only when
//! *every* trace agrees the pointer is definitely null, `Low` when only
//! some traces do or when the pointer's domain degraded to the universe.

use crate::visit::{collect_calls, statement_exprs, walk_block};
use crate::Checker;
use adastat_domains::{AbsValue, BoolLattice};
use adastat_errors::{Diagnostic, DiagnosticKind, Gravity, Handler};
use adastat_eval::{eval_expr, AnalysisResult};
use adastat_ir::{Operator, Procedure};

pub struct NullDerefChecker;

impl Checker for NullDerefChecker {
    fn name(&self) -> &'static str {
        "null-dereference"
    }

    fn check(&self, procedure: &Procedure, result: &AnalysisResult, handler: &Handler) {
        let interp = adastat_types::default_interpreter();
        walk_block(&procedure.body, &mut |stmt| {
            let Some(traces) = result.before.get(&stmt.id()) else { return };
            for expr in statement_exprs(stmt) {
                let mut derefs = Vec::new();
                collect_calls(expr, &Operator::Deref, &mut derefs);
                for deref_call in &derefs {
                    let Some(ptr_expr) = deref_call.args.first() else { continue };
                    if traces.is_empty() {
                        continue;
                    }

                    let mut any_may_be_null = false;
                    let mut all_must_be_null = true;
                    for env in traces.values() {
                        let ptr_val = eval_expr(&interp, ptr_expr, env, handler);
                        match &ptr_val {
                            AbsValue::AccessPath(set) => match set.must_be_null() {
                                BoolLattice::True => {
                                    any_may_be_null = true;
                                }
                                BoolLattice::Top => {
                                    any_may_be_null = true;
                                    all_must_be_null = false;
                                }
                                BoolLattice::False | BoolLattice::Bottom => {
                                    all_must_be_null = false;
                                }
                            },
                            AbsValue::Universe => {
                                any_may_be_null = true;
                                all_must_be_null = false;
                            }
                            _ => {
                                all_must_be_null = false;
                            }
                        }
                    }
                    if any_may_be_null || all_must_be_null {
                        let gravity = if all_must_be_null { Gravity::High } else { Gravity::Low };
                        handler.emit_diagnostic(Diagnostic::new(
                            deref_call.span.clone(),
                            procedure.name.to_string(),
                            procedure.span.clone(),
                            format!("dereference of `{ptr_expr}` may be null here"),
                            DiagnosticKind::NullDereference,
                            gravity,
                        ));
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_errors::Handler;
    use adastat_eval::{Budget, Evaluator, EvaluatorConfig};
    use adastat_ir::{
        AssumeStmt, Block, ConstValue, Expression, FunCallExpr, IdentifierExpr, LitExpr, SourceType, Statement, VarId, Variable, VariableMode,
    };
    use adastat_span::{Span, Symbol};

    fn pointer_var(idx: usize) -> Variable {
        Variable {
            name: Symbol::intern("p"),
            type_hint: SourceType::Pointer(Box::new(SourceType::IntegerRange { lo: 0, hi: 10 })),
            mode: VariableMode::In,
            index: VarId(idx),
            purpose: None,
        }
    }

    fn deref_of(idx: usize) -> Expression {
        let ptr = Expression::Identifier(IdentifierExpr {
            id: 1,
            span: Span::dummy(),
            var: VarId(idx),
            type_hint: SourceType::Pointer(Box::new(SourceType::IntegerRange { lo: 0, hi: 10 })),
        });
        Expression::FunCall(FunCallExpr {
            id: 2,
            span: Span::dummy(),
            operator: Operator::Deref,
            args: vec![ptr],
            type_hint: SourceType::IntegerRange { lo: 0, hi: 10 },
            param_types: None,
        })
    }

    #[test]
    fn flags_a_dereference_of_a_pointer_assumed_null() {
        let var = pointer_var(0);
        let assume_null = Statement::Assume(AssumeStmt {
            id: 1,
            span: Span::dummy(),
            condition: Expression::FunCall(FunCallExpr {
                id: 10,
                span: Span::dummy(),
                operator: Operator::Eq,
                args: vec![
                    Expression::Identifier(IdentifierExpr { id: 11, span: Span::dummy(), var: VarId(0), type_hint: var.type_hint.clone() }),
                    Expression::Lit(LitExpr { id: 12, span: Span::dummy(), value: ConstValue::Null, type_hint: var.type_hint.clone() }),
                ],
                type_hint: SourceType::Boolean,
                param_types: None,
            }),
            purpose: None,
        });
        let use_deref = Statement::Assume(AssumeStmt { id: 2, span: Span::dummy(), condition: deref_of_as_bool(0), purpose: None });
        let proc = Procedure { name: Symbol::intern("f"), span: Span::dummy(), variables: vec![var], body: Block::new(vec![assume_null, use_deref]) };

        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);

        let checker_handler = Handler::new();
        NullDerefChecker.check(&proc, &result, &checker_handler);
        let diags = checker_handler.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::NullDereference);
    }

    /// Wraps `deref_of` in an `eq`-with-itself so it type-checks as boolean
    /// for use directly as an `AssumeStmt` condition in the test above.
    fn deref_of_as_bool(idx: usize) -> Expression {
        Expression::FunCall(FunCallExpr {
            id: 20,
            span: Span::dummy(),
            operator: Operator::Eq,
            args: vec![deref_of(idx), Expression::Lit(LitExpr { id: 21, span: Span::dummy(), value: ConstValue::Integer(0), type_hint: SourceType::IntegerRange { lo: 0, hi: 10 } })],
            type_hint: SourceType::Boolean,
            param_types: None,
        })
    }

    /// A `Split` that leaves one branch definitely null and the other a
    /// definite valid address, kept in separate trace buckets (`Bounded(1)`
    /// so the two branches don't collapse into one joined env before
    /// reaching the checker). A `True`-bucket trace must still count toward
    /// `any_may_be_null` (a must-be-null trace is also a may-be-null one),
    /// while the other, non-null bucket keeps `all_must_be_null` false, so
    /// the deref is flagged at `Low` gravity rather than not at all.
    #[test]
    fn flags_a_dereference_when_one_of_several_traces_is_definitely_null() {
        let p = pointer_var(0);
        let q = Variable { name: Symbol::intern("q"), type_hint: SourceType::IntegerRange { lo: 0, hi: 10 }, mode: VariableMode::In, index: VarId(1), purpose: None };
        let assign_null = Statement::Assign(adastat_ir::AssignStmt {
            id: 1,
            span: Span::dummy(),
            target: VarId(0),
            value: Expression::Lit(LitExpr { id: 5, span: Span::dummy(), value: ConstValue::Null, type_hint: p.type_hint.clone() }),
        });
        let assign_address = Statement::Assign(adastat_ir::AssignStmt {
            id: 2,
            span: Span::dummy(),
            target: VarId(0),
            value: Expression::FunCall(FunCallExpr {
                id: 10,
                span: Span::dummy(),
                operator: Operator::AddressOf,
                args: vec![Expression::Identifier(IdentifierExpr { id: 11, span: Span::dummy(), var: VarId(1), type_hint: q.type_hint.clone() })],
                type_hint: p.type_hint.clone(),
                param_types: None,
            }),
        });
        let split = Statement::Split(adastat_ir::SplitStmt {
            id: 3,
            span: Span::dummy(),
            branches: vec![Block::new(vec![assign_null]), Block::new(vec![assign_address])],
        });
        let use_deref = Statement::Assume(AssumeStmt { id: 4, span: Span::dummy(), condition: deref_of_as_bool(0), purpose: None });
        let proc = Procedure { name: Symbol::intern("f"), span: Span::dummy(), variables: vec![p, q], body: Block::new(vec![split, use_deref]) };

        let evaluator = Evaluator::new(EvaluatorConfig { merge_predicate: adastat_eval::MergePredicate::Bounded(1), ..EvaluatorConfig::default() });
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);

        let checker_handler = Handler::new();
        NullDerefChecker.check(&proc, &result, &checker_handler);
        let diags = checker_handler.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].gravity, Gravity::Low);
    }

    #[test]
    fn does_not_flag_a_dereference_of_a_pointer_known_to_be_a_variables_address() {
        let p = pointer_var(0);
        let q = Variable { name: Symbol::intern("q"), type_hint: SourceType::IntegerRange { lo: 0, hi: 10 }, mode: VariableMode::In, index: VarId(1), purpose: None };
        let take_address = Statement::Assign(adastat_ir::AssignStmt {
            id: 1,
            span: Span::dummy(),
            target: VarId(0),
            value: Expression::FunCall(FunCallExpr {
                id: 10,
                span: Span::dummy(),
                operator: Operator::AddressOf,
                args: vec![Expression::Identifier(IdentifierExpr { id: 11, span: Span::dummy(), var: VarId(1), type_hint: q.type_hint.clone() })],
                type_hint: p.type_hint.clone(),
                param_types: None,
            }),
        });
        let use_deref = Statement::Assume(AssumeStmt { id: 2, span: Span::dummy(), condition: deref_of_as_bool(0), purpose: None });
        let proc = Procedure { name: Symbol::intern("f"), span: Span::dummy(), variables: vec![p, q], body: Block::new(vec![take_address, use_deref]) };

        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);

        let checker_handler = Handler::new();
        NullDerefChecker.check(&proc, &result, &checker_handler);
        assert!(checker_handler.diagnostics().is_empty());
    }
}
