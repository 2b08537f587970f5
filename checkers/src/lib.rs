// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The checkers that consume `adastat-eval`'s per-point environments and
//! report [`adastat_errors::Diagnostic`]s: null dereference, contract
//! (precondition/postcondition/assertion/field-existence), and the two
//! purely-syntactic pattern checks (same-operands, duplicate-test) whose
//! rule content is intentionally trivial.

mod contract;
mod null_deref;
mod registry;
mod syntactic;

pub use contract::ContractChecker;
pub use null_deref::NullDerefChecker;
pub use registry::{Checker, Registry};
pub use syntactic::{DuplicateTestChecker, SameOperandsChecker};
