// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use adastat_ir::ConstValue;
use adastat_span::Symbol;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::{
    AbsValue, AccessAtom, AccessPathSet, BoolLattice, FiniteSet, Interval, Lattice, Memory, Size, SparseArray,
    Splittable,
};

/// A domain descriptor: "the lattice instance" a value belongs to, as
/// opposed to `AbsValue` which is an element of it. Shaped parametrically
/// (a `Finite` kind carries its carrier, a `Product`/`SparseArray` kind
/// carries its component kinds) so that `bottom`/`top`/`literal` can build
/// a value from nothing but the kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainKind {
    Bool,
    Finite(Arc<Vec<Symbol>>),
    Interval,
    Product(Vec<DomainKind>),
    SparseArray(Box<DomainKind>),
    AccessPath,
    Memory,
    Universe,
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainKind::Bool => write!(f, "bool"),
            DomainKind::Finite(c) => write!(f, "finite({})", c.len()),
            DomainKind::Interval => write!(f, "interval"),
            DomainKind::Product(ks) => {
                write!(f, "(")?;
                for (i, k) in ks.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}")?;
                }
                write!(f, ")")
            }
            DomainKind::SparseArray(elem) => write!(f, "array[{elem}]"),
            DomainKind::AccessPath => write!(f, "access-path"),
            DomainKind::Memory => write!(f, "memory"),
            DomainKind::Universe => write!(f, "universe"),
        }
    }
}

impl DomainKind {
    /// Whether this kind supports `Splittable::split` (directly, or because
    /// every component does).
    pub fn has_split(&self) -> bool {
        match self {
            DomainKind::Interval => true,
            DomainKind::Product(ks) => ks.iter().all(DomainKind::has_split),
            DomainKind::SparseArray(elem) => elem.has_split(),
            _ => false,
        }
    }

    /// Builds the abstract value denoting exactly one literal, per this
    /// kind's representation. Falls back to `top()` for a literal this kind
    /// cannot represent precisely (e.g. a real literal against a kind with
    /// no real lattice) rather than failing.
    pub fn literal(&self, value: &ConstValue) -> AbsValue {
        match (self, value) {
            (DomainKind::Bool, ConstValue::Boolean(b)) => AbsValue::Bool(BoolLattice::from_concrete(*b)),
            (DomainKind::Finite(carrier), ConstValue::EnumTag(tag)) => {
                AbsValue::Finite(FiniteSet::singleton(carrier.clone(), *tag))
            }
            (DomainKind::Interval, ConstValue::Integer(n)) => AbsValue::Interval(Interval::point(*n)),
            (DomainKind::Interval, ConstValue::Character(c)) => AbsValue::Interval(Interval::point(*c as i128)),
            (DomainKind::AccessPath, ConstValue::Null) => AbsValue::AccessPath(AccessPathSet::singleton(AccessAtom::Null)),
            (DomainKind::Memory, ConstValue::Null) => AbsValue::Memory(Memory::bottom()),
            _ => Lattice::top(self),
        }
    }

    /// Whether a value of kind `other` is always acceptable wherever a
    /// value of kind `self` is expected — used by signature resolution to
    /// decide if a provider registered for `self` also answers for `other`.
    pub fn contains(&self, other: &DomainKind) -> bool {
        match (self, other) {
            (DomainKind::Product(a), DomainKind::Product(b)) if a.len() == b.len() => {
                a.iter().zip(b).all(|(x, y)| x.contains(y))
            }
            (DomainKind::SparseArray(a), DomainKind::SparseArray(b)) => a.contains(b),
            _ => self == other,
        }
    }

    /// Recursively replaces every occurrence of `from` in this kind's shape
    /// with `to` (used when a universal-integer/-real placeholder inside a
    /// product or array element is rewritten to a concrete kind).
    pub fn substitute(&self, from: &DomainKind, to: &DomainKind) -> DomainKind {
        if self == from {
            return to.clone();
        }
        match self {
            DomainKind::Product(ks) => DomainKind::Product(ks.iter().map(|k| k.substitute(from, to)).collect()),
            DomainKind::SparseArray(elem) => DomainKind::SparseArray(Box::new(elem.substitute(from, to))),
            other => other.clone(),
        }
    }
}

impl Lattice for DomainKind {
    fn bottom(&self) -> AbsValue {
        match self {
            DomainKind::Bool => AbsValue::Bool(BoolLattice::Bottom),
            DomainKind::Finite(c) => AbsValue::Finite(FiniteSet::bottom(c.clone())),
            DomainKind::Interval => AbsValue::Interval(Interval::Bottom),
            DomainKind::Product(ks) => AbsValue::Product(ks.iter().map(Lattice::bottom).collect()),
            DomainKind::SparseArray(_) => AbsValue::SparseArray(SparseArray::bottom()),
            DomainKind::AccessPath => AbsValue::AccessPath(AccessPathSet::bottom()),
            DomainKind::Memory => AbsValue::Memory(Memory::bottom()),
            DomainKind::Universe => AbsValue::Universe,
        }
    }

    fn top(&self) -> AbsValue {
        match self {
            DomainKind::Bool => AbsValue::Bool(BoolLattice::Top),
            DomainKind::Finite(c) => AbsValue::Finite(FiniteSet::top(c.clone())),
            DomainKind::Interval => AbsValue::Interval(Interval::Range(i128::MIN, i128::MAX)),
            DomainKind::Product(ks) => AbsValue::Product(ks.iter().map(Lattice::top).collect()),
            DomainKind::SparseArray(elem) => AbsValue::SparseArray(SparseArray::top(elem.top())),
            DomainKind::AccessPath => AbsValue::AccessPath(AccessPathSet::top()),
            // An empty frame already answers every `get` with `Universe`
            // (see `Memory::get`), so it doubles as this kind's top.
            DomainKind::Memory => AbsValue::Memory(Memory::bottom()),
            DomainKind::Universe => AbsValue::Universe,
        }
    }

    fn is_empty(&self, x: &AbsValue) -> bool {
        x.is_empty()
    }

    fn le(&self, x: &AbsValue, y: &AbsValue) -> bool {
        x.le(y)
    }

    fn join(&self, x: &AbsValue, y: &AbsValue) -> AbsValue {
        x.join(y)
    }

    fn meet(&self, x: &AbsValue, y: &AbsValue) -> AbsValue {
        x.meet(y)
    }

    fn size(&self, x: &AbsValue) -> Size {
        x.size()
    }
}

impl Splittable for DomainKind {
    fn split(&self, x: &AbsValue, y: &AbsValue) -> Vec<AbsValue> {
        match (self, x, y) {
            (DomainKind::Interval, AbsValue::Interval(a), AbsValue::Interval(b)) => {
                a.split(b).into_iter().map(AbsValue::Interval).collect()
            }
            (DomainKind::Product(ks), AbsValue::Product(a), AbsValue::Product(b)) if a.len() == b.len() => {
                // One split per component, holding the rest fixed at `a`'s value.
                let mut pieces = Vec::new();
                for (i, k) in ks.iter().enumerate() {
                    for piece in k.split(&a[i], &b[i]) {
                        let mut prod = a.clone();
                        prod[i] = piece;
                        pieces.push(AbsValue::Product(prod));
                    }
                }
                pieces
            }
            _ => vec![x.clone()],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn literal_builds_a_point_interval() {
        let k = DomainKind::Interval;
        assert_eq!(k.literal(&ConstValue::Integer(5)), AbsValue::Interval(Interval::point(5)));
    }

    #[test]
    fn bottom_le_anything_le_top() {
        let k = DomainKind::Interval;
        let mid = AbsValue::Interval(Interval::Range(0, 10));
        assert!(Lattice::bottom(&k).le(&mid));
        assert!(mid.le(&Lattice::top(&k)));
    }

    #[test]
    fn substitute_rewrites_nested_product_components() {
        let k = DomainKind::Product(vec![DomainKind::Bool, DomainKind::Universe]);
        let rewritten = k.substitute(&DomainKind::Universe, &DomainKind::Interval);
        assert_eq!(rewritten, DomainKind::Product(vec![DomainKind::Bool, DomainKind::Interval]));
    }
}
