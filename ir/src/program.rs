// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::{Block, Purpose, SourceType, VarId};
use adastat_span::{Span, Symbol};
use serde::{Deserialize, Serialize};

/// The parameter-passing mode of a variable, mirroring Ada's `in`/`out`/
/// `in out` modes; `Local` is anything declared inside the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableMode {
    In,
    Out,
    InOut,
    Local,
}

/// `Variable(name, type_hint, mode, index, purpose?)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variable {
    pub name: Symbol,
    pub type_hint: SourceType,
    pub mode: VariableMode,
    pub index: VarId,
    pub purpose: Option<Purpose>,
}

/// One analyzed procedure: its declared variables (the environment's
/// domain) and its body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Procedure {
    pub name: Symbol,
    pub span: Span,
    pub variables: Vec<Variable>,
    pub body: Block,
}

impl Procedure {
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.iter().find(|v| v.index == id)
    }
}

/// The top-level unit the evaluator runs over: one or more procedures
/// produced by the (out-of-scope) lowering pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Program {
    pub procedures: Vec<Procedure>,
}

impl Program {
    pub fn procedure(&self, name: Symbol) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }
}
