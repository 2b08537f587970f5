// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AccessPathSet, BoolLattice, FiniteSet, Interval, Memory, Size, SparseArray, Universe};

/// An element of some abstract domain. Every concrete lattice from this
/// crate has a variant here; each variant carries enough of its own
/// representation (a `FiniteSet`'s carrier, a `SparseArray`'s element
/// values) to answer lattice questions about itself without outside
/// context, which is what lets `join`/`meet`/`le` below be plain structural
/// recursion instead of needing a `DomainKind` passed alongside every
/// value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbsValue {
    Bool(BoolLattice),
    Finite(FiniteSet),
    Interval(Interval),
    Product(Vec<AbsValue>),
    SparseArray(SparseArray),
    AccessPath(AccessPathSet),
    Memory(Memory),
    Universe,
}

impl fmt::Display for AbsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsValue::Bool(v) => write!(f, "{v}"),
            AbsValue::Finite(v) => write!(f, "{v}"),
            AbsValue::Interval(v) => write!(f, "{v}"),
            AbsValue::Product(vs) => {
                write!(f, "(")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ")")
            }
            AbsValue::SparseArray(v) => write!(f, "{v}"),
            AbsValue::AccessPath(v) => write!(f, "{v}"),
            AbsValue::Memory(v) => write!(f, "{v}"),
            AbsValue::Universe => write!(f, "⊤"),
        }
    }
}

impl AbsValue {
    /// Whether this value denotes no concrete value at all. Mismatched
    /// variant pairs never arise for well-typed IR; treated as non-empty
    /// (the conservative choice) rather than panicking.
    pub fn is_empty(&self) -> bool {
        match self {
            AbsValue::Bool(v) => matches!(v, BoolLattice::Bottom),
            AbsValue::Finite(v) => v.is_empty(),
            AbsValue::Interval(v) => v.is_bottom(),
            AbsValue::Product(vs) => vs.iter().any(AbsValue::is_empty),
            AbsValue::SparseArray(v) => v.is_bottom(),
            AbsValue::AccessPath(v) => v.is_empty(),
            AbsValue::Memory(v) => v.is_bottom(),
            AbsValue::Universe => false,
        }
    }

    pub fn le(&self, other: &AbsValue) -> bool {
        match (self, other) {
            (AbsValue::Bool(a), AbsValue::Bool(b)) => a.le(b),
            (AbsValue::Finite(a), AbsValue::Finite(b)) => a.le(b),
            (AbsValue::Interval(a), AbsValue::Interval(b)) => a.le(b),
            (AbsValue::Product(a), AbsValue::Product(b)) if a.len() == b.len() => {
                a.iter().zip(b).all(|(x, y)| x.le(y))
            }
            (AbsValue::SparseArray(a), AbsValue::SparseArray(b)) => a.le(b),
            (AbsValue::AccessPath(a), AbsValue::AccessPath(b)) => a.le(b),
            (AbsValue::Memory(a), AbsValue::Memory(b)) => a.le(b),
            (_, AbsValue::Universe) => true,
            (AbsValue::Universe, _) => false,
            _ => self.is_empty(),
        }
    }

    pub fn join(&self, other: &AbsValue) -> AbsValue {
        match (self, other) {
            (AbsValue::Bool(a), AbsValue::Bool(b)) => AbsValue::Bool(a.join(b)),
            (AbsValue::Finite(a), AbsValue::Finite(b)) => AbsValue::Finite(a.join(b)),
            (AbsValue::Interval(a), AbsValue::Interval(b)) => AbsValue::Interval(a.join(b)),
            (AbsValue::Product(a), AbsValue::Product(b)) if a.len() == b.len() => {
                AbsValue::Product(a.iter().zip(b).map(|(x, y)| x.join(y)).collect())
            }
            (AbsValue::SparseArray(a), AbsValue::SparseArray(b)) => AbsValue::SparseArray(a.join(b)),
            (AbsValue::AccessPath(a), AbsValue::AccessPath(b)) => AbsValue::AccessPath(a.join(b)),
            (AbsValue::Memory(a), AbsValue::Memory(b)) => AbsValue::Memory(a.join(b)),
            (AbsValue::Universe, _) | (_, AbsValue::Universe) => AbsValue::Universe,
            _ if self.is_empty() => other.clone(),
            _ if other.is_empty() => self.clone(),
            _ => AbsValue::Universe,
        }
    }

    pub fn meet(&self, other: &AbsValue) -> AbsValue {
        match (self, other) {
            (AbsValue::Bool(a), AbsValue::Bool(b)) => AbsValue::Bool(a.meet(b)),
            (AbsValue::Finite(a), AbsValue::Finite(b)) => AbsValue::Finite(a.meet(b)),
            (AbsValue::Interval(a), AbsValue::Interval(b)) => AbsValue::Interval(a.meet(b)),
            (AbsValue::Product(a), AbsValue::Product(b)) if a.len() == b.len() => {
                AbsValue::Product(a.iter().zip(b).map(|(x, y)| x.meet(y)).collect())
            }
            (AbsValue::SparseArray(a), AbsValue::SparseArray(b)) => AbsValue::SparseArray(a.meet(b)),
            (AbsValue::AccessPath(a), AbsValue::AccessPath(b)) => AbsValue::AccessPath(a.meet(b)),
            (AbsValue::Memory(a), AbsValue::Memory(b)) => AbsValue::Memory(a.meet(b)),
            (AbsValue::Universe, x) | (x, AbsValue::Universe) => x.clone(),
            _ => self.clone(),
        }
    }

    pub fn size(&self) -> Size {
        match self {
            AbsValue::Bool(BoolLattice::Bottom) => Size::Finite(0),
            AbsValue::Bool(BoolLattice::False) | AbsValue::Bool(BoolLattice::True) => Size::Finite(1),
            AbsValue::Bool(BoolLattice::Top) => Size::Finite(2),
            AbsValue::Finite(v) => Size::Finite(v.members.len() as u64),
            AbsValue::Interval(Interval::Bottom) => Size::Finite(0),
            AbsValue::Interval(Interval::Range(lo, hi)) => {
                match u64::try_from((hi - lo).saturating_add(1)) {
                    Ok(n) => Size::Finite(n),
                    Err(_) => Size::Infinite,
                }
            }
            AbsValue::Product(vs) => {
                let mut total: u64 = 1;
                for v in vs {
                    match v.size() {
                        Size::Finite(n) => total = total.saturating_mul(n),
                        Size::Infinite => return Size::Infinite,
                    }
                }
                Size::Finite(total)
            }
            _ => Size::Infinite,
        }
    }

    /// A generic `eq`, lifted structurally the same way `join`/`meet` are:
    /// used by callers (such as `SparseArray::in_values_of`) that need to
    /// compare two values of possibly-heterogeneous domains without first
    /// resolving a domain-specific provider.
    pub fn eq_abs(&self, other: &AbsValue) -> BoolLattice {
        match (self, other) {
            (AbsValue::Bool(a), AbsValue::Bool(b)) => a.eq_op(b),
            (AbsValue::Finite(a), AbsValue::Finite(b)) => a.eq_op(b),
            (AbsValue::Interval(a), AbsValue::Interval(b)) => a.eq_op(b),
            (AbsValue::AccessPath(a), AbsValue::AccessPath(b)) => a.eq_op(b),
            (AbsValue::Memory(a), AbsValue::Memory(b)) => a.eq_op(b),
            (AbsValue::Product(a), AbsValue::Product(b)) if a.len() == b.len() => {
                a.iter().zip(b).fold(BoolLattice::True, |acc, (x, y)| acc.and(&x.eq_abs(y)))
            }
            _ => BoolLattice::Top,
        }
    }

    pub fn neq_abs(&self, other: &AbsValue) -> BoolLattice {
        self.eq_abs(other).not()
    }

    /// Loop-header widening: only `Interval` has unbounded
    /// height, so it is the only variant that needs a dedicated widen — a
    /// `Product`'s height is the sum of its components', so it widens
    /// component-wise; every other domain (`Bool`, `Finite`, `SparseArray`
    /// via its `MAX_ELEMS` cap, `AccessPath`, `Memory`) already has bounded
    /// height and widening degenerates to `join` for them.
    pub fn widen(&self, other: &AbsValue) -> AbsValue {
        match (self, other) {
            (AbsValue::Interval(a), AbsValue::Interval(b)) => AbsValue::Interval(a.widen(b)),
            (AbsValue::Product(a), AbsValue::Product(b)) if a.len() == b.len() => {
                AbsValue::Product(a.iter().zip(b).map(|(x, y)| x.widen(y)).collect())
            }
            _ => self.join(other),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn product_join_is_componentwise() {
        let a = AbsValue::Product(vec![AbsValue::Interval(Interval::point(1)), AbsValue::Bool(BoolLattice::True)]);
        let b = AbsValue::Product(vec![AbsValue::Interval(Interval::point(2)), AbsValue::Bool(BoolLattice::True)]);
        let joined = a.join(&b);
        assert_eq!(joined, AbsValue::Product(vec![AbsValue::Interval(Interval::Range(1, 2)), AbsValue::Bool(BoolLattice::True)]));
    }

    #[test]
    fn universe_absorbs_join() {
        let a = AbsValue::Interval(Interval::point(1));
        assert_eq!(a.join(&AbsValue::Universe), AbsValue::Universe);
    }

    #[test]
    fn widen_extrapolates_a_growing_interval_to_infinity() {
        let a = AbsValue::Interval(Interval::Range(0, 5));
        let b = AbsValue::Interval(Interval::Range(0, 10));
        assert_eq!(a.widen(&b), AbsValue::Interval(Interval::Range(0, i128::MAX)));
    }

    #[test]
    fn product_eq_is_the_conjunction_of_component_eq() {
        let a = AbsValue::Product(vec![AbsValue::Interval(Interval::point(1))]);
        let b = AbsValue::Product(vec![AbsValue::Interval(Interval::point(1))]);
        assert_eq!(a.eq_abs(&b), BoolLattice::True);
    }
}
