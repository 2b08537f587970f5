// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use crate::TypeInterpretation;
use adastat_ir::SourceType;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Interprets one `SourceType` into a `TypeInterpretation`, or declines to.
/// `top` is the whole composed interpreter (after every `.or()` in the
/// chain) — recursive types (`Product`, `Array`, `Pointer`, `Modeled`) call
/// back into it for their components instead of recursing on `self`, so a
/// field of an enumeration type is interpreted by the *same* alternation
/// chain as a top-level one would be. Passing `top` explicitly like this
/// avoids a global registry or a `RefCell<Option<Weak<Self>>>` self-knot —
/// the caller constructs the chain once behind an `Rc` (per-analysis, never
/// shared across the `rayon` per-file workers) and hands it to every
/// recursive call from there on.
pub trait Interpreter {
    fn interpret(&self, top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation>;

    fn or<I: Interpreter + 'static>(self, other: I) -> Alternation<Self, I>
    where
        Self: Sized,
    {
        Alternation { first: self, second: other }
    }

    fn memoized(self) -> Memoized<Self>
    where
        Self: Sized,
    {
        Memoized { inner: self, cache: RefCell::new(HashMap::new()) }
    }
}

pub struct Alternation<A, B> {
    first: A,
    second: B,
}

impl<A: Interpreter, B: Interpreter> Interpreter for Alternation<A, B> {
    fn interpret(&self, top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation> {
        self.first.interpret(top, ty).or_else(|| self.second.interpret(top, ty))
    }
}

/// Memoizes by `SourceType`: identical types yield identical domain objects.
/// `TypeInterpretation` holds only `Rc`-backed fields, so
/// a cache hit is a cheap clone, not a rebuild.
pub struct Memoized<I> {
    inner: I,
    cache: RefCell<HashMap<SourceType, Option<TypeInterpretation>>>,
}

impl<I: Interpreter> Interpreter for Memoized<I> {
    fn interpret(&self, top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation> {
        if let Some(hit) = self.cache.borrow().get(ty) {
            return hit.clone();
        }
        let resolved = self.inner.interpret(top, ty);
        self.cache.borrow_mut().insert(ty.clone(), resolved.clone());
        resolved
    }
}

pub struct FromFn<F>(pub F);

impl<F> Interpreter for FromFn<F>
where
    F: Fn(&Rc<dyn Interpreter>, &SourceType) -> Option<TypeInterpretation>,
{
    fn interpret(&self, top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation> {
        (self.0)(top, ty)
    }
}

/// Resolves `ty` through `top` itself — the entry point callers use once
/// the composed interpreter is behind an `Rc<dyn Interpreter>`.
pub fn resolve(top: &Rc<dyn Interpreter>, ty: &SourceType) -> Option<TypeInterpretation> {
    top.interpret(top, ty)
}
