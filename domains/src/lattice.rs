// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::AbsValue;

/// How many concrete values a domain element denotes, when that is
/// meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    Finite(u64),
    Infinite,
}

/// The contract every abstract domain obeys: a lattice `(A, ⊥, ⊤, ≤, ⊔, ⊓)`.
/// Implemented by `DomainKind`, which plays the role of "the lattice
/// instance" (e.g. "intervals over i128", or "the subset lattice over {Red,
/// Green, Blue}"); `AbsValue` plays the role of an element `x` of that
/// lattice.
///
/// All operations are total: degenerate inputs (mismatched domain kinds,
/// already-bottom arguments) return `⊥` or `⊤` rather than panicking.
pub trait Lattice {
    fn bottom(&self) -> AbsValue;
    fn top(&self) -> AbsValue;
    fn is_empty(&self, x: &AbsValue) -> bool;
    fn le(&self, x: &AbsValue, y: &AbsValue) -> bool;
    fn join(&self, x: &AbsValue, y: &AbsValue) -> AbsValue;
    fn meet(&self, x: &AbsValue, y: &AbsValue) -> AbsValue;
    fn size(&self, x: &AbsValue) -> Size;
}

/// Capability: a finite cover of `x \ y` within the domain, used by
/// operations (such as a sparse-array strong update) that need to carve an
/// exact piece out of an abstract value rather than only join or meet it.
/// `DomainKind::has_split` reports which domains support it — a plain
/// method is enough since `DomainKind` is a closed enum, no reflection
/// needed.
pub trait Splittable: Lattice {
    fn split(&self, x: &AbsValue, y: &AbsValue) -> Vec<AbsValue>;
}
