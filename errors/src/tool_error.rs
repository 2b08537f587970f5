// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_span::Span;
use thiserror::Error;

/// Errors that stop the whole tool, as opposed to [`crate::Diagnostic`]s and
/// [`Warning`]s, which are local recoveries the analysis survives.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("could not read input file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed IR handed to the analyzer: {0}")]
    MalformedIr(String),

    #[error("domain invariant breach at {span}: {detail}")]
    InvariantBreach { span: Span, detail: String },

    #[error("invalid CLI invocation: {0}")]
    InvalidArgs(String),
}

/// Recoverable conditions the analyzer logs and continues past. Every
/// warning degrades the gravity of diagnostics that transitively depend on
/// the affected node to [`crate::Gravity::Low`].
#[derive(Clone, Debug)]
pub enum Warning {
    UnsupportedType { span: Span, type_name: String },
    UnsupportedOp { span: Span, operator: String },
    IrGenFailure { span: Span, detail: String },
    BudgetExhausted { span: Span, iterations: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnsupportedType { span, type_name } => {
                write!(f, "{span}: no interpretation for type `{type_name}`, using the universe domain")
            }
            Warning::UnsupportedOp { span, operator } => {
                write!(f, "{span}: no provider matched operator `{operator}`, result is ⊤")
            }
            Warning::IrGenFailure { span, detail } => {
                write!(f, "{span}: upstream IR generation failed ({detail}), node replaced by ⊤")
            }
            Warning::BudgetExhausted { span, iterations } => {
                write!(f, "{span}: analysis budget exhausted after {iterations} iterations, results are incomplete")
            }
        }
    }
}
