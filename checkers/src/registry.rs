// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_errors::Handler;
use adastat_eval::AnalysisResult;
use adastat_ir::Procedure;

/// One property check over a procedure's computed semantics. Checkers push
/// findings into `handler` rather than returning them, matching the
/// evaluator's own buffering style: checker diagnostics survive even when
/// parts of the analysis were `⊤`.
pub trait Checker {
    fn name(&self) -> &'static str;
    fn check(&self, procedure: &Procedure, result: &AnalysisResult, handler: &Handler);
}

/// An ordered list of checkers run over one procedure's analysis result.
/// Plain `Vec`-backed rather than name-keyed: the CLI's `--checker <name>`
/// flag selects by name at construction time, not at run time, so there's
/// no need for the registry itself to support lookup.
#[derive(Default)]
pub struct Registry {
    checkers: Vec<Box<dyn Checker>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, checker: Box<dyn Checker>) -> &mut Self {
        self.checkers.push(checker);
        self
    }

    /// The full complement the CLI registers by default, syntactic checkers
    /// included alongside the semantic ones.
    pub fn full() -> Self {
        let mut registry = Self::new();
        registry
            .register(Box::new(crate::NullDerefChecker))
            .register(Box::new(crate::ContractChecker))
            .register(Box::new(crate::SameOperandsChecker))
            .register(Box::new(crate::DuplicateTestChecker));
        registry
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    pub fn run_all(&self, procedure: &Procedure, result: &AnalysisResult, handler: &Handler) {
        for checker in &self.checkers {
            checker.check(procedure, result, handler);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_registers_every_checker_by_name() {
        let registry = Registry::full();
        assert_eq!(registry.names(), vec!["null-dereference", "contract", "same-operands", "duplicate-test"]);
    }
}
