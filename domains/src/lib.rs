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

//! The abstract-domain algebra:
//! the `Lattice`/`Splittable` contract every domain obeys, and the concrete
//! lattices themselves (boolean, finite subset, interval, product, sparse
//! array, access path, random-access memory, universe).

mod lattice;
pub use lattice::*;

mod boolean;
pub use boolean::*;

mod finite;
pub use finite::*;

mod interval;
pub use interval::*;

mod sparse_array;
pub use sparse_array::*;

mod access_path;
pub use access_path::*;

mod memory;
pub use memory::*;

mod kind;
pub use kind::*;

mod value;
pub use value::*;
