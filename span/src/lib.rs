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

//! Source positions (`Span`) and interned identifiers (`Symbol`) shared by
//! every other adastat crate.

mod symbol;
pub use symbol::*;

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A single line/column position in a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source positions, plus the path of the file it
/// belongs to. Two spans compare equal when their positions and file match.
/// No source text is retained here, since the analyzer never needs to
/// re-render source (diagnostics quote abstract values instead).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Span {
    pub file: String,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn dummy() -> Self {
        Self { file: String::new(), start: Position::new(0, 0), end: Position::new(0, 0) }
    }

    pub fn new(file: impl Into<String>, start: Position, end: Position) -> Self {
        Self { file: file.into(), start, end }
    }

    /// Returns the smallest span enclosing both `self` and `other`, provided
    /// they share a file; otherwise keeps `self`.
    pub fn merge(&self, other: &Span) -> Span {
        if self.file != other.file {
            return self.clone();
        }
        Span { file: self.file.clone(), start: self.start.min(other.start), end: self.end.max(other.end) }
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.start == other.start && self.end == other.end
    }
}

impl Eq for Span {}

impl Hash for Span {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.start)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_takes_the_enclosing_range() {
        let a = Span::new("f.ada", Position::new(1, 1), Position::new(1, 5));
        let b = Span::new("f.ada", Position::new(1, 3), Position::new(2, 1));
        let m = a.merge(&b);
        assert_eq!(m.start, Position::new(1, 1));
        assert_eq!(m.end, Position::new(2, 1));
    }

    #[test]
    fn merge_across_files_keeps_self() {
        let a = Span::new("a.ada", Position::new(1, 1), Position::new(1, 5));
        let b = Span::new("b.ada", Position::new(1, 3), Position::new(2, 1));
        assert_eq!(a.merge(&b), a);
    }
}
