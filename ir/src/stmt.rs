// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::{Expression, NodeId, Purpose, VarId};
use crate::simple_node_impl;
use adastat_span::Span;
use serde::{Deserialize, Serialize};

/// A label identifying a `GotoStmt`'s target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(pub usize);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelStmt {
    pub id: NodeId,
    pub span: Span,
    pub label: Label,
}
simple_node_impl!(LabelStmt);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignStmt {
    pub id: NodeId,
    pub span: Span,
    pub target: VarId,
    pub value: Expression,
}
simple_node_impl!(AssignStmt);

/// Havocs `var`: the evaluator sets it to `⊤` of its domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReadStmt {
    pub id: NodeId,
    pub span: Span,
    pub var: VarId,
}
simple_node_impl!(ReadStmt);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssumeStmt {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expression,
    pub purpose: Option<Purpose>,
}
simple_node_impl!(AssumeStmt);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitStmt {
    pub id: NodeId,
    pub span: Span,
    pub branches: Vec<Block>,
}
simple_node_impl!(SplitStmt);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoopStmt {
    pub id: NodeId,
    pub span: Span,
    pub body: Block,
}
simple_node_impl!(LoopStmt);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GotoStmt {
    pub id: NodeId,
    pub span: Span,
    pub target: Label,
}
simple_node_impl!(GotoStmt);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Statement {
    Label(LabelStmt),
    Assign(AssignStmt),
    Read(ReadStmt),
    Assume(AssumeStmt),
    Split(SplitStmt),
    Loop(LoopStmt),
    Goto(GotoStmt),
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Statement::Label(s) => s.id,
            Statement::Assign(s) => s.id,
            Statement::Read(s) => s.id,
            Statement::Assume(s) => s.id,
            Statement::Split(s) => s.id,
            Statement::Loop(s) => s.id,
            Statement::Goto(s) => s.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Statement::Label(s) => &s.span,
            Statement::Assign(s) => &s.span,
            Statement::Read(s) => &s.span,
            Statement::Assume(s) => &s.span,
            Statement::Split(s) => &s.span,
            Statement::Loop(s) => &s.span,
            Statement::Goto(s) => &s.span,
        }
    }
}

/// A straight-line sequence of statements, the unit `SplitStmt` branches and
/// `LoopStmt` bodies are built from.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}
