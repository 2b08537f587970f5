// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::{NodeId, SourceType};
use crate::simple_node_impl;
use adastat_span::{Span, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete constant carried by a literal node: the front end has already
/// resolved it to one of these kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Boolean(bool),
    Integer(i128),
    Real(f64),
    Character(char),
    /// A tag of an enumeration type, by declaration index.
    EnumTag(Symbol),
    Null,
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Boolean(b) => write!(f, "{b}"),
            ConstValue::Integer(i) => write!(f, "{i}"),
            ConstValue::Real(r) => write!(f, "{r}"),
            ConstValue::Character(c) => write!(f, "'{c}'"),
            ConstValue::EnumTag(sym) => write!(f, "{sym}"),
            ConstValue::Null => write!(f, "null"),
        }
    }
}

/// The closed set of primitive operators, including parameterized variants
/// (`GetField(index)`, `UpdateField(index)`, `Offset(index)`,
/// `InRange(dim)`) that carry the index or dimension they act on. A
/// `Signature` (in `adastat-providers`) pairs one of these with input/output
/// domains.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Not,
    And,
    Or,
    Eq,
    Neq,
    Add,
    Sub,
    Neg,
    Lt,
    Le,
    Gt,
    Ge,
    GetField(usize),
    UpdateField(usize),
    Get,
    Update,
    IndexRange,
    InValuesOf,
    Offset(usize),
    CopyOffset(usize),
    InRange(usize),
    Deref,
    AddressOf,
    Call,
    Cast,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A variable reference in the IR, identified by a stable index the
/// evaluator uses as an environment key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// An expression node. Every variant carries a `type_hint`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Expression {
    Identifier(IdentifierExpr),
    Lit(LitExpr),
    FunCall(FunCallExpr),
}

impl Expression {
    pub fn type_hint(&self) -> &SourceType {
        match self {
            Expression::Identifier(e) => &e.type_hint,
            Expression::Lit(e) => &e.type_hint,
            Expression::FunCall(e) => &e.type_hint,
        }
    }

    pub fn type_hint_mut(&mut self) -> &mut SourceType {
        match self {
            Expression::Identifier(e) => &mut e.type_hint,
            Expression::Lit(e) => &mut e.type_hint,
            Expression::FunCall(e) => &mut e.type_hint,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Expression::Identifier(e) => e.id,
            Expression::Lit(e) => e.id,
            Expression::FunCall(e) => e.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expression::Identifier(e) => &e.span,
            Expression::Lit(e) => &e.span,
            Expression::FunCall(e) => &e.span,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{}", e.var),
            Expression::Lit(e) => write!(f, "{}", e.value),
            Expression::FunCall(e) => {
                write!(f, "{}(", e.operator)?;
                for (i, arg) in e.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifierExpr {
    pub id: NodeId,
    pub span: Span,
    pub var: VarId,
    pub type_hint: SourceType,
}
simple_node_impl!(IdentifierExpr);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LitExpr {
    pub id: NodeId,
    pub span: Span,
    pub value: ConstValue,
    pub type_hint: SourceType,
}
simple_node_impl!(LitExpr);

/// A call to a primitive or subprogram operator: an operator tag, argument
/// expressions, a `type_hint` for the result, and optionally `param_types`
/// (required when an argument has a universal type that needs resolving).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunCallExpr {
    pub id: NodeId,
    pub span: Span,
    pub operator: Operator,
    pub args: Vec<Expression>,
    pub type_hint: SourceType,
    /// Mandatory when any argument is of universal type.
    pub param_types: Option<Vec<SourceType>>,
}
simple_node_impl!(FunCallExpr);
