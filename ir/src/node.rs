// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_span::Span;

/// Identifies an IR node. Assigned once by the external lowering pass;
/// stable across the universal-type rewrite, which only mutates type-hint
/// fields, never identity.
pub type NodeId = usize;

/// A node in the IR. Every expression and statement implements this.
pub trait Node: std::fmt::Debug {
    fn span(&self) -> &Span;
    fn id(&self) -> NodeId;
}

#[macro_export]
macro_rules! simple_node_impl {
    ($ty:ty) => {
        impl $crate::Node for $ty {
            fn span(&self) -> &adastat_span::Span {
                &self.span
            }

            fn id(&self) -> $crate::NodeId {
                self.id
            }
        }
    };
}

/// Tags the source construct an IR node originates from, driving checker
/// filtering. A closed tagged variant rather than a free-form string, so
/// checkers can exhaustively match on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Purpose {
    /// An implicit check inserted before a dereference.
    DerefCheck,
    /// A subprogram's precondition.
    ContractPre,
    /// A subprogram's postcondition.
    ContractPost,
    /// An `exists`/membership check synthesized by the front end.
    ExistenceCheck,
    /// A temporary introduced by the lowering pass, not written by the user.
    SyntheticTemporary,
}
