// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Two purely-syntactic checkers. Neither looks at `adastat-eval`'s computed
//! environments at all — both are a plain structural walk over the IR, so
//! their findings are always `Gravity::High`: nothing about them depends on
//! how precise the abstract interpretation turned out to be.

use crate::visit::{expr_structurally_eq, statement_exprs, walk_block};
use crate::Checker;
use adastat_errors::{Diagnostic, DiagnosticKind, Gravity, Handler};
use adastat_eval::AnalysisResult;
use adastat_ir::{Expression, Operator, Procedure, Statement};

/// Flags a binary operator call whose two operands are syntactically
/// identical, e.g. `x < x`, `a and a` — always degenerate regardless of
/// what `x`/`a` turn out to denote.
pub struct SameOperandsChecker;

const DUPLICABLE_OPERATORS: &[Operator] = &[Operator::And, Operator::Or, Operator::Eq, Operator::Neq, Operator::Lt, Operator::Le, Operator::Gt, Operator::Ge];

impl Checker for SameOperandsChecker {
    fn name(&self) -> &'static str {
        "same-operands"
    }

    fn check(&self, procedure: &Procedure, _result: &AnalysisResult, handler: &Handler) {
        walk_block(&procedure.body, &mut |stmt| {
            for expr in statement_exprs(stmt) {
                find_same_operands(expr, procedure, handler);
            }
        });
    }
}

fn find_same_operands(expr: &Expression, procedure: &Procedure, handler: &Handler) {
    if let Expression::FunCall(call) = expr {
        if DUPLICABLE_OPERATORS.contains(&call.operator) {
            if let [l, r] = call.args.as_slice() {
                if expr_structurally_eq(l, r) {
                    handler.emit_diagnostic(Diagnostic::new(
                        call.span.clone(),
                        procedure.name.to_string(),
                        procedure.span.clone(),
                        format!("both operands of `{}` are `{l}`", call.operator),
                        DiagnosticKind::SameOperands,
                        Gravity::High,
                    ));
                }
            }
        }
        for arg in &call.args {
            find_same_operands(arg, procedure, handler);
        }
    }
}

/// Flags a `SplitStmt` branch whose guard is syntactically identical to an
/// earlier sibling branch's guard (an `if C ... elsif C ...` where the
/// second `C` can never be reached). A branch's guard is its first
/// statement, an `AssumeStmt` the front end inserts to encode that branch's
/// condition; a branch not shaped that way (e.g. an unconditional `else`)
/// is skipped rather than guessed at.
pub struct DuplicateTestChecker;

impl Checker for DuplicateTestChecker {
    fn name(&self) -> &'static str {
        "duplicate-test"
    }

    fn check(&self, procedure: &Procedure, _result: &AnalysisResult, handler: &Handler) {
        walk_block(&procedure.body, &mut |stmt| {
            let Statement::Split(split) = stmt else { return };
            let guards: Vec<Option<&Expression>> = split.branches.iter().map(branch_guard).collect();
            for i in 0..guards.len() {
                let Some(guard_i) = guards[i] else { continue };
                for guard_j in guards.iter().take(i).flatten() {
                    if expr_structurally_eq(guard_i, guard_j) {
                        handler.emit_diagnostic(Diagnostic::new(
                            guard_i.span().clone(),
                            procedure.name.to_string(),
                            procedure.span.clone(),
                            format!("test `{guard_i}` duplicates an earlier branch of this split"),
                            DiagnosticKind::DuplicateTest,
                            Gravity::High,
                        ));
                        break;
                    }
                }
            }
        });
    }
}

fn branch_guard(branch: &adastat_ir::Block) -> Option<&Expression> {
    match branch.statements.first()? {
        Statement::Assume(a) => Some(&a.condition),
        _ => None,
    }
}
