// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::Signature;
use adastat_domains::AbsValue;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// The forward half of what a provider hands back for a matched signature:
/// computes the operation's result from its already-evaluated arguments.
pub type Fwd = Rc<dyn Fn(&[AbsValue]) -> Option<AbsValue>>;

/// The backward half: given the expected result and the arguments' current
/// bounds, refines each argument in place, or reports the combination
/// infeasible.
pub type Bwd = Rc<dyn Fn(&AbsValue, &[AbsValue]) -> Option<Vec<AbsValue>>>;

/// Resolves a `Signature` to the pair of transfer functions that implement
/// it, or reports it has nothing to offer for that exact shape. Grounded on
/// `lalcheck.ai.interpretations.Transformer`: the Python original wraps a
/// `(def_provider, builder)` pair behind `as_transformer`, memoizes by
/// identity, and composes transformers with `>>`; this trait is the same
/// shape, rebuilt around Rust closures instead of a builder callback taking
/// an evaluation context.
pub trait Provider {
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)>;

    /// Tries `self` first, falling through to `other` on a miss — the
    /// alternation combinator (`lalcheck`'s provider chaining via
    /// `def_provider_builder`).
    fn or<P: Provider + 'static>(self, other: P) -> Alternation<Self, P>
    where
        Self: Sized,
    {
        Alternation { first: self, second: other }
    }

    /// Wraps `self` so repeated lookups of the same signature hit a cache
    /// instead of rebuilding the closures — `Transformer.make_memoizing` in
    /// the original.
    fn memoized(self) -> Memoized<Self>
    where
        Self: Sized,
    {
        Memoized { inner: self, cache: RefCell::new(HashMap::new()) }
    }
}

/// `a.or(b)`: `a` wins on a match; `b` is only consulted if `a` misses.
pub struct Alternation<A, B> {
    first: A,
    second: B,
}

impl<A: Provider, B: Provider> Provider for Alternation<A, B> {
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)> {
        self.first.get(sig).or_else(|| self.second.get(sig))
    }
}

/// Caches resolved signatures behind a `RefCell`-guarded map so a provider
/// built once and shared across many call sites (the common case — the base
/// catalog provider is constructed exactly once per analysis run) only pays
/// closure-construction cost the first time each distinct signature is
/// seen.
pub struct Memoized<P> {
    inner: P,
    cache: RefCell<HashMap<Signature, Option<(Fwd, Bwd)>>>,
}

impl<P: Provider> Provider for Memoized<P> {
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)> {
        if let Some(hit) = self.cache.borrow().get(sig) {
            return hit.clone();
        }
        let resolved = self.inner.get(sig);
        self.cache.borrow_mut().insert(sig.clone(), resolved.clone());
        resolved
    }
}

/// A provider built directly from a closure — the escape hatch every other
/// combinator and the base catalog bottom out in.
pub struct FromFn<F>(pub F);

impl<F> Provider for FromFn<F>
where
    F: Fn(&Signature) -> Option<(Fwd, Bwd)>,
{
    fn get(&self, sig: &Signature) -> Option<(Fwd, Bwd)> {
        (self.0)(sig)
    }
}
