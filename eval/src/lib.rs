// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

// adastat is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// adastat is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with adastat. If not, see <https://www.gnu.org/licenses/>.

//! The fixpoint evaluator: a worklist-style abstract interpreter over one
//! procedure's IR, plus the universal-type rewrite that runs on the IR just
//! before it.

mod budget;
mod cfg;
mod env;
mod evaluator;
mod expr;
mod trace;
pub mod universal;

pub use budget::Budget;
pub use cfg::Cfg;
pub use env::Env;
pub use evaluator::{AnalysisResult, Evaluator, EvaluatorConfig, Semantics};
pub use expr::{backward_eval, eval_expr};
pub use trace::{MergePredicate, Trace};
