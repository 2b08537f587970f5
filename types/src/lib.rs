// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Interprets a `SourceType` into a `TypeInterpretation` — domain, provider,
//! literal builder, havoc value. `default_interpreter()`
//! is the composed alternation chain (`DefaultInterpreter | ModeledInterpreter`,
//! memoized) that `adastat-eval` asks for every IR node's `type_hint`.

mod default;
mod interpretation;
mod interpreter;
mod modeled;

pub use default::DefaultInterpreter;
pub use interpretation::TypeInterpretation;
pub use interpreter::{resolve, Alternation, FromFn, Interpreter, Memoized};
pub use modeled::ModeledInterpreter;

use std::rc::Rc;

/// The full interpreter chain a fresh analysis builds once and shares
/// (read-only) across every node's type lookup.
pub fn default_interpreter() -> Rc<dyn Interpreter> {
    Rc::new(DefaultInterpreter.or(ModeledInterpreter).memoized())
}
