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

//! The operator library: for every `adastat_ir::Operator` this crate
//! supplies a forward evaluator and, where refinement is possible, a
//! backward one. Scalar operators (`not`/`and`/`add`/`lt`/...) dispatch
//! straight to the owning domain's own method; composite operators
//! (`get`/`updated`/`index_range`/field access/`deref`) live here because
//! they need more than one domain's worth of context to make sense.

mod scalar;
pub use scalar::*;

mod composite;
pub use composite::*;

mod catalog;
pub use catalog::*;
