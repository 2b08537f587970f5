// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Signature-keyed resolution of operators to forward/backward transfer
//! functions. `adastat-ops` gives the raw functions;
//! this crate gives the algebra that picks among them — alternation,
//! memoization, and the sequencing/lifting combinator that answers a
//! product-typed `eq`/`neq` from per-component scalar equalities.

mod catalog;
mod lift;
mod provider;
mod signature;

pub use catalog::{base_provider, BaseProvider};
pub use lift::Lifted;
pub use provider::{Alternation, Bwd, FromFn, Fwd, Memoized, Provider};
pub use signature::Signature;
