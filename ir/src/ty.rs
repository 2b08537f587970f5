// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_span::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A source-language type, as handed down by the front end in every IR
/// node's `type_hint`. This is *not* the abstract domain itself —
/// `adastat-types` interprets a `SourceType` into a `TypeInterpretation`
/// that names the domain to use.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    Boolean,
    /// An ASCII character type; interpreted as the interval `0..127`.
    Character,
    /// A bounded integer range `lo..=hi`, as declared by the source type.
    IntegerRange { lo: i128, hi: i128 },
    /// A real (floating) range; no precise abstraction is attempted for
    /// it, it is interpreted via the universe domain.
    RealRange { lo: f64, hi: f64 },
    /// An enumeration type with the given literal tags, in declaration
    /// order. Interpreted as a power-set lattice when `len() <= 4`, else a
    /// finite-subset lattice.
    Enumeration(Vec<Symbol>),
    /// A product/record type with named, typed fields.
    Product(Vec<(Symbol, SourceType)>),
    /// A pointer/access type to the pointee type.
    Pointer(Box<SourceType>),
    /// A fixed-size array of `element` indexed over `index`.
    Array { index: Box<SourceType>, element: Box<SourceType> },
    /// The random-access memory backing spilled, address-taken locals.
    Memory,
    /// A modeled (ghost-augmented) type: an actual value of `actual` paired
    /// with a model of `ghost`, used for contract reasoning.
    Modeled { actual: Box<SourceType>, ghost: Box<SourceType> },
    /// Placeholder universal integer/real type, rewritten away by
    /// `adastat_eval::universal` before the evaluator ever sees it.
    UniversalInteger,
    UniversalReal,
    /// No interpretation is known; the universe (top-only) domain is used.
    Unknown,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Boolean => write!(f, "boolean"),
            SourceType::Character => write!(f, "character"),
            SourceType::IntegerRange { lo, hi } => write!(f, "{lo}..{hi}"),
            SourceType::RealRange { lo, hi } => write!(f, "{lo}..{hi} (real)"),
            SourceType::Enumeration(lits) => {
                write!(f, "(")?;
                for (i, lit) in lits.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{lit}")?;
                }
                write!(f, ")")
            }
            SourceType::Product(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, "}}")
            }
            SourceType::Pointer(inner) => write!(f, "access {inner}"),
            SourceType::Array { index, element } => write!(f, "array ({index}) of {element}"),
            SourceType::Memory => write!(f, "memory"),
            SourceType::Modeled { actual, ghost } => write!(f, "{actual} with model {ghost}"),
            SourceType::UniversalInteger => write!(f, "universal_integer"),
            SourceType::UniversalReal => write!(f, "universal_real"),
            SourceType::Unknown => write!(f, "<unknown>"),
        }
    }
}

impl SourceType {
    pub fn is_universal(&self) -> bool {
        matches!(self, SourceType::UniversalInteger | SourceType::UniversalReal)
    }
}
