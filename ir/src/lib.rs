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

//! The IR model: variables, literals, calls,
//! assignments, reads, assumes, splits, loops, gotos and labels. This is the
//! contract the external front end/lowering pass hands the evaluator; the
//! front end itself is out of scope.

mod node;
pub use node::*;

mod ty;
pub use ty::*;

mod expr;
pub use expr::*;

mod stmt;
pub use stmt::*;

mod program;
pub use program::*;
