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

//! Diagnostics, the closed catalog of internal error kinds, and
//! a buffering [`Handler`] that checkers and passes push findings into.

mod diagnostic;
mod handler;
mod tool_error;

pub use diagnostic::*;
pub use handler::*;
pub use tool_error::*;

pub type Result<T> = std::result::Result<T, ToolError>;
