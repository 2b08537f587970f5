// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! A small recursive statement/expression walker shared by every checker:
//! flattens `SplitStmt` branches and `LoopStmt` bodies into one
//! visitation, and recurses into a `FunCall`'s arguments to reach nested
//! operator applications (a dereference buried inside a field access, a
//! duplicated operand inside a longer boolean chain).

use adastat_ir::{Block, Expression, FunCallExpr, Operator, Statement};

pub fn walk_block<'a>(block: &'a Block, visit: &mut impl FnMut(&'a Statement)) {
    for stmt in &block.statements {
        visit(stmt);
        match stmt {
            Statement::Split(s) => {
                for branch in &s.branches {
                    walk_block(branch, visit);
                }
            }
            Statement::Loop(l) => walk_block(&l.body, visit),
            _ => {}
        }
    }
}

/// Every expression a statement directly evaluates, in the order they
/// appear — `AssignStmt`'s RHS, `AssumeStmt`'s condition. Statements with
/// no expression of their own (`Label`, `Read`, `Split`, `Loop`, `Goto`)
/// contribute nothing: `Read` havocs without evaluating anything, and a
/// `SplitStmt`'s branch conditions live as `AssumeStmt`s inside the
/// branches themselves (walked separately by `walk_block`).
pub fn statement_exprs(stmt: &Statement) -> Vec<&Expression> {
    match stmt {
        Statement::Assign(a) => vec![&a.value],
        Statement::Assume(a) => vec![&a.condition],
        _ => vec![],
    }
}

/// Collects every `FunCall` node matching `operator` reachable from `expr`,
/// recursing into arguments (a call can nest another call of the same
/// operator, e.g. `p.next.next`'s two `Deref`s).
pub fn collect_calls<'a>(expr: &'a Expression, operator: &Operator, out: &mut Vec<&'a FunCallExpr>) {
    if let Expression::FunCall(call) = expr {
        if &call.operator == operator {
            out.push(call);
        }
        for arg in &call.args {
            collect_calls(arg, operator, out);
        }
    }
}

/// Structural equality of two expression trees, ignoring node identity and
/// span (two syntactically identical operands of a boolean chain get
/// distinct `NodeId`s from the front end but are the same expression for
/// the purposes of the same-operands/duplicate-test checks).
pub fn expr_structurally_eq(a: &Expression, b: &Expression) -> bool {
    match (a, b) {
        (Expression::Identifier(x), Expression::Identifier(y)) => x.var == y.var,
        (Expression::Lit(x), Expression::Lit(y)) => x.value == y.value,
        (Expression::FunCall(x), Expression::FunCall(y)) => {
            x.operator == y.operator && x.args.len() == y.args.len() && x.args.iter().zip(&y.args).all(|(p, q)| expr_structurally_eq(p, q))
        }
        _ => false,
    }
}
