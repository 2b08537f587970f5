// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The contract checker: flags an `AssumeStmt` whose condition may not
//! hold, classified by the `Purpose` tag the front end attached to it.
//! `ContractPre`/`ContractPost` map to `Precondition`/`Postcondition`;
//! `ExistenceCheck` maps to `FieldExistence`; an untagged assume is a
//! user-written assertion. `DerefCheck`-tagged assumes are left to
//! [`crate::NullDerefChecker`], and `SyntheticTemporary` ones carry no
//! contract meaning at all.

use crate::visit::walk_block;
use crate::Checker;
use adastat_domains::{AbsValue, BoolLattice};
use adastat_errors::{Diagnostic, DiagnosticKind, Gravity, Handler};
use adastat_eval::{eval_expr, AnalysisResult};
use adastat_ir::{Purpose, Procedure, Statement};

pub struct ContractChecker;

impl Checker for ContractChecker {
    fn name(&self) -> &'static str {
        "contract"
    }

    fn check(&self, procedure: &Procedure, result: &AnalysisResult, handler: &Handler) {
        let interp = adastat_types::default_interpreter();
        walk_block(&procedure.body, &mut |stmt| {
            let Statement::Assume(assume) = stmt else { return };
            let kind = match assume.purpose {
                Some(Purpose::ContractPre) => DiagnosticKind::Precondition,
                Some(Purpose::ContractPost) => DiagnosticKind::Postcondition,
                Some(Purpose::ExistenceCheck) => DiagnosticKind::FieldExistence,
                None => DiagnosticKind::Assertion,
                Some(Purpose::DerefCheck) | Some(Purpose::SyntheticTemporary) => return,
            };
            let Some(traces) = result.before.get(&assume.id) else { return };
            if traces.is_empty() {
                return;
            }

            let mut may_be_false = false;
            let mut always_false = true;
            let mut any_top_input = false;
            for env in traces.values() {
                let value = eval_expr(&interp, &assume.condition, env, handler);
                match value {
                    AbsValue::Bool(BoolLattice::True) => always_false = false,
                    AbsValue::Bool(BoolLattice::False) => may_be_false = true,
                    AbsValue::Bool(BoolLattice::Top) => {
                        may_be_false = true;
                        always_false = false;
                    }
                    AbsValue::Bool(BoolLattice::Bottom) => {}
                    AbsValue::Universe => {
                        may_be_false = true;
                        always_false = false;
                        any_top_input = true;
                    }
                    _ => always_false = false,
                }
            }

            if may_be_false || always_false {
                let gravity = if always_false && !any_top_input { Gravity::High } else { Gravity::Low };
                handler.emit_diagnostic(Diagnostic::new(
                    assume.span.clone(),
                    procedure.name.to_string(),
                    procedure.span.clone(),
                    format!("{} `{}` may not hold here", kind_description(kind), assume.condition),
                    kind,
                    gravity,
                ));
            }
        });
    }
}

fn kind_description(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::Precondition => "precondition",
        DiagnosticKind::Postcondition => "postcondition",
        DiagnosticKind::Assertion => "assertion",
        DiagnosticKind::FieldExistence => "field-existence check",
        _ => "condition",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_errors::Handler;
    use adastat_eval::{Budget, Evaluator, EvaluatorConfig};
    use adastat_ir::{
        AssumeStmt, Block, ConstValue, Expression, FunCallExpr, IdentifierExpr, LitExpr, Operator, SourceType, VarId, Variable, VariableMode,
    };
    use adastat_span::{Span, Symbol};

    fn int_var(idx: usize, lo: i128, hi: i128) -> Variable {
        Variable { name: Symbol::intern("x"), type_hint: SourceType::IntegerRange { lo, hi }, mode: VariableMode::In, index: VarId(idx), purpose: None }
    }

    fn lt(var_idx: usize, bound: i128, lo: i128, hi: i128) -> Expression {
        Expression::FunCall(FunCallExpr {
            id: 1,
            span: Span::dummy(),
            operator: Operator::Lt,
            args: vec![
                Expression::Identifier(IdentifierExpr { id: 2, span: Span::dummy(), var: VarId(var_idx), type_hint: SourceType::IntegerRange { lo, hi } }),
                Expression::Lit(LitExpr { id: 3, span: Span::dummy(), value: ConstValue::Integer(bound), type_hint: SourceType::IntegerRange { lo, hi } }),
            ],
            type_hint: SourceType::Boolean,
            param_types: None,
        })
    }

    #[test]
    fn flags_a_precondition_that_may_be_violated() {
        let x = int_var(0, 0, 100);
        let pre = Statement::Assume(AssumeStmt { id: 1, span: Span::dummy(), condition: lt(0, 10, 0, 100), purpose: Some(Purpose::ContractPre) });
        let proc = Procedure { name: Symbol::intern("f"), span: Span::dummy(), variables: vec![x], body: Block::new(vec![pre]) };

        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);

        let checker_handler = Handler::new();
        ContractChecker.check(&proc, &result, &checker_handler);
        let diags = checker_handler.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::Precondition);
    }

    #[test]
    fn does_not_flag_a_precondition_already_guaranteed_by_an_earlier_assignment() {
        let x = int_var(0, 0, 100);
        let narrow = Statement::Assign(adastat_ir::AssignStmt {
            id: 1,
            span: Span::dummy(),
            target: VarId(0),
            value: Expression::Lit(LitExpr { id: 9, span: Span::dummy(), value: ConstValue::Integer(3), type_hint: SourceType::IntegerRange { lo: 0, hi: 100 } }),
        });
        let pre = Statement::Assume(AssumeStmt { id: 2, span: Span::dummy(), condition: lt(0, 10, 0, 100), purpose: Some(Purpose::ContractPre) });
        let proc = Procedure { name: Symbol::intern("f"), span: Span::dummy(), variables: vec![x], body: Block::new(vec![narrow, pre]) };

        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);

        let checker_handler = Handler::new();
        ContractChecker.check(&proc, &result, &checker_handler);
        assert!(checker_handler.diagnostics().is_empty());
    }

    #[test]
    fn deref_check_purpose_is_left_to_the_null_deref_checker() {
        let x = int_var(0, 0, 100);
        let tagged = Statement::Assume(AssumeStmt { id: 1, span: Span::dummy(), condition: lt(0, 10, 0, 100), purpose: Some(Purpose::DerefCheck) });
        let proc = Procedure { name: Symbol::intern("f"), span: Span::dummy(), variables: vec![x], body: Block::new(vec![tagged]) };

        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);

        let checker_handler = Handler::new();
        ContractChecker.check(&proc, &result, &checker_handler);
        assert!(checker_handler.diagnostics().is_empty());
    }
}
