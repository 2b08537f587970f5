// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::{Diagnostic, ToolError, Warning};
use std::cell::RefCell;

/// Buffers diagnostics and warnings produced while analyzing a single file.
/// Passes and checkers take `&Handler` and push findings rather than
/// threading `Result` through every visitor callback.
///
/// `RefCell` is used so the handler can be shared by shared reference,
/// avoiding `&mut` on every visitor in the evaluator and checkers.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    warnings: RefCell<Vec<Warning>>,
    invariant_breach: RefCell<Option<ToolError>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn emit_warning(&self, warning: Warning) {
        self.warnings.borrow_mut().push(warning);
    }

    /// Records an invariant breach. In debug builds the caller should additionally assert;
    /// in release builds this flag is what causes the tool to exit non-zero.
    pub fn record_invariant_breach(&self, error: ToolError) {
        *self.invariant_breach.borrow_mut() = Some(error);
    }

    pub fn has_invariant_breach(&self) -> bool {
        self.invariant_breach.borrow().is_some()
    }

    pub fn take_invariant_breach(&self) -> Option<ToolError> {
        self.invariant_breach.borrow_mut().take()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_span::Span;
    use crate::{DiagnosticKind, Gravity};

    #[test]
    fn buffers_diagnostics_without_aborting() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::new(
            Span::dummy(),
            "proc",
            Span::dummy(),
            "x may be null here",
            DiagnosticKind::NullDereference,
            Gravity::High,
        ));
        assert_eq!(handler.diagnostics().len(), 1);
        assert!(!handler.has_invariant_breach());
    }

    #[test]
    fn invariant_breach_is_recorded_separately_from_diagnostics() {
        let handler = Handler::new();
        handler.record_invariant_breach(ToolError::InvariantBreach { span: Span::dummy(), detail: "non-monotone join".into() });
        assert!(handler.has_invariant_breach());
        assert!(handler.diagnostics().is_empty());
    }
}
