// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_span::Span;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of diagnostic kinds a checker can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    NullDereference,
    SameOperands,
    DuplicateTest,
    Precondition,
    Postcondition,
    Assertion,
    FieldExistence,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::NullDereference => "null-dereference",
            DiagnosticKind::SameOperands => "same-operands",
            DiagnosticKind::DuplicateTest => "duplicate-test",
            DiagnosticKind::Precondition => "precondition",
            DiagnosticKind::Postcondition => "postcondition",
            DiagnosticKind::Assertion => "assertion",
            DiagnosticKind::FieldExistence => "field-existence",
        };
        write!(f, "{s}")
    }
}

/// Whether a diagnostic is backed by a precise proof, or merely suspected
/// because some transitive input to the analysis was `⊤`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    High,
    Low,
}

impl Gravity {
    /// Gravity never improves once any input degrades to `⊤`; only `High`
    /// can become `Low`.
    pub fn downgrade(self) -> Gravity {
        Gravity::Low
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gravity::High => write!(f, "high"),
            Gravity::Low => write!(f, "low"),
        }
    }
}

/// One finding reported by a checker: where it was found, the procedure it
/// was found in, a message, its closed-set kind, and its gravity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub enclosing_procedure: String,
    pub enclosing_procedure_span: Span,
    pub message: String,
    pub kind: DiagnosticKind,
    pub gravity: Gravity,
}

impl Diagnostic {
    pub fn new(
        span: Span,
        enclosing_procedure: impl Into<String>,
        enclosing_procedure_span: Span,
        message: impl Into<String>,
        kind: DiagnosticKind,
        gravity: Gravity,
    ) -> Self {
        Self {
            span,
            enclosing_procedure: enclosing_procedure.into(),
            enclosing_procedure_span,
            message: message.into(),
            kind,
            gravity,
        }
    }

    /// Renders one line of human-readable output, colored red for
    /// high-gravity findings and yellow for suspected ones.
    pub fn render_line(&self) -> String {
        let tag = format!("[{}]", self.kind);
        let tag = match self.gravity {
            Gravity::High => tag.red().bold(),
            Gravity::Low => tag.yellow(),
        };
        format!("{}: {} {} ({})", self.span, tag, self.message, self.gravity)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_matches_closed_kind_set() {
        assert_eq!(DiagnosticKind::NullDereference.to_string(), "null-dereference");
        assert_eq!(DiagnosticKind::FieldExistence.to_string(), "field-existence");
    }

    #[test]
    fn gravity_only_ever_downgrades() {
        assert_eq!(Gravity::High.downgrade(), Gravity::Low);
        assert_eq!(Gravity::Low.downgrade(), Gravity::Low);
    }
}
