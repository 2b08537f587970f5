// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Forward and backward implementations for the operators that need more
//! than one domain's worth of context to make sense: sparse-array
//! `get`/`updated`/`index_range`/`in_values_of`, product field
//! `get`/`update`, pointer `deref`/`address_of`, and random-access memory
//! `offset`/`copy_offset`.

use adastat_domains::{AbsValue, AccessAtom, AccessPathSet, BoolLattice, Interval, Memory, SparseArray};

/// `get(arr, idx)`: the join of every slice overlapping `idx`. An `idx`
/// falling outside every slice reads back `AbsValue::Universe` — the
/// domain-agnostic top sentinel already absorbed by `join`/`meet` exactly
/// like a native `⊤` would be, without this function needing to know which
/// concrete element domain `Elem` is.
pub fn array_get_fwd(arr: &AbsValue, idx: &AbsValue) -> AbsValue {
    match (arr, idx) {
        (AbsValue::SparseArray(a), AbsValue::Interval(i)) => a.get(i, &AbsValue::Universe),
        _ => AbsValue::Universe,
    }
}

/// Backward `get`: constructs the biggest array consistent with `expected`
/// at `idx` and `⊤` elsewhere, meets it with the current array; if the
/// index is a single concrete point the meet is folded back in by
/// `updated`, otherwise the array is left unrefined.
pub fn array_get_bwd(expected: &AbsValue, arr: &AbsValue, idx: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    let (AbsValue::SparseArray(a), AbsValue::Interval(i)) = (arr, idx) else {
        return Some((arr.clone(), idx.clone()));
    };
    if i.is_bottom() {
        return None;
    }
    let current = a.get(i, &AbsValue::Universe);
    let refined_elem = current.meet(expected);
    if refined_elem.is_empty() && !current.is_empty() {
        return None;
    }
    let refined_arr = if i.lo() == i.hi() { a.updated(i, &refined_elem) } else { a.clone() };
    Some((AbsValue::SparseArray(refined_arr), idx.clone()))
}

/// `updated(arr, idx, val)`.
pub fn array_updated_fwd(arr: &AbsValue, idx: &AbsValue, val: &AbsValue) -> AbsValue {
    match (arr, idx) {
        (AbsValue::SparseArray(a), AbsValue::Interval(i)) => AbsValue::SparseArray(a.updated(i, val)),
        _ => AbsValue::Universe,
    }
}

/// Backward `updated` is intentionally left unrefined — `array[i] := v`
/// patterns used inside assertions lose precision here rather than being
/// refined, which is sound (it never narrows past what's actually true).
pub fn array_updated_bwd(_expected: &AbsValue, arr: &AbsValue, idx: &AbsValue, val: &AbsValue) -> Option<(AbsValue, AbsValue, AbsValue)> {
    Some((arr.clone(), idx.clone(), val.clone()))
}

pub fn array_index_range_fwd(arr: &AbsValue) -> AbsValue {
    match arr {
        AbsValue::SparseArray(a) => {
            let range = a.slices.iter().fold(Interval::Bottom, |acc, s| acc.join(&s.index));
            AbsValue::Interval(range)
        }
        _ => AbsValue::Universe,
    }
}

/// Backward `index_range`: refines the array by dropping slices whose
/// index falls entirely outside the expected range.
pub fn array_index_range_bwd(expected: &AbsValue, arr: &AbsValue) -> Option<AbsValue> {
    let (AbsValue::Interval(expected), AbsValue::SparseArray(a)) = (expected, arr) else { return Some(arr.clone()) };
    if expected.is_bottom() {
        return None;
    }
    Some(AbsValue::SparseArray(a.index_range(expected)))
}

pub fn array_in_values_of_fwd(value: &AbsValue, arr: &AbsValue) -> AbsValue {
    match arr {
        AbsValue::SparseArray(a) => AbsValue::Bool(a.in_values_of(value)),
        _ => AbsValue::Universe,
    }
}

/// Backward `in_values_of`: when `expected = {true}`, the element domain of
/// every slice is refined to include at least `value`'s image is not
/// precisely invertible slice-by-slice, so (per the same non-refinable
/// class as `inv_updated`) the array is left unrefined; `value` is refined
/// to the join of every slice's element (it can only equal something
/// actually stored).
pub fn array_in_values_of_bwd(expected: &AbsValue, value: &AbsValue, arr: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    let (AbsValue::Bool(e), AbsValue::SparseArray(a)) = (expected, arr) else {
        return Some((value.clone(), arr.clone()));
    };
    match e {
        BoolLattice::Bottom => None,
        BoolLattice::True => {
            let possible = a.slices.iter().fold(None, |acc: Option<AbsValue>, s| {
                Some(match acc {
                    Some(v) => v.join(&s.elem),
                    None => s.elem.clone(),
                })
            });
            match possible {
                Some(p) => {
                    let refined = value.meet(&p);
                    if refined.is_empty() { None } else { Some((refined, arr.clone())) }
                }
                None => None,
            }
        }
        _ => Some((value.clone(), arr.clone())),
    }
}

/// `get_field(i, product)`.
pub fn get_field_fwd(index: usize, product: &AbsValue) -> AbsValue {
    match product {
        AbsValue::Product(fields) => fields.get(index).cloned().unwrap_or(AbsValue::Universe),
        _ => AbsValue::Universe,
    }
}

/// Backward `get_field`: refines component `i` to `⊓ expected`, leaves the
/// rest of the product unchanged.
pub fn get_field_bwd(index: usize, expected: &AbsValue, product: &AbsValue) -> Option<AbsValue> {
    match product {
        AbsValue::Product(fields) => {
            let mut fields = fields.clone();
            let Some(slot) = fields.get_mut(index) else { return Some(product.clone()) };
            let refined = slot.meet(expected);
            if refined.is_empty() && !slot.is_empty() {
                return None;
            }
            *slot = refined;
            Some(AbsValue::Product(fields))
        }
        _ => Some(product.clone()),
    }
}

/// `update_field(i, product, value)`.
pub fn update_field_fwd(index: usize, product: &AbsValue, value: &AbsValue) -> AbsValue {
    match product {
        AbsValue::Product(fields) => {
            let mut fields = fields.clone();
            if let Some(slot) = fields.get_mut(index) {
                *slot = value.clone();
            }
            AbsValue::Product(fields)
        }
        _ => AbsValue::Universe,
    }
}

/// Backward `update_field`: reverses the update — the refined product
/// keeps every other component, and component `i` reverts to whatever
/// value is consistent with the untouched remainder (`⊤`, since the old
/// value at `i` before the update isn't recoverable from the output
/// alone); the written value is refined to `⊓ expected`'s `i`-th
/// component.
pub fn update_field_bwd(index: usize, expected: &AbsValue, product: &AbsValue, value: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    let AbsValue::Product(expected_fields) = expected else { return Some((product.clone(), value.clone())) };
    let Some(expected_slot) = expected_fields.get(index) else { return Some((product.clone(), value.clone())) };
    let refined_value = value.meet(expected_slot);
    if refined_value.is_empty() && !value.is_empty() {
        return None;
    }
    Some((product.clone(), refined_value))
}

/// `deref(ptr, memory)`: joins the contents of every variable slot the
/// pointer may denote. A `Null`/`Top` member contributes nothing precise
/// (the null-dereference checker flags `Null` members separately, before
/// this operator ever runs on a sound program).
pub fn deref_fwd(ptr: &AbsValue, memory: &AbsValue) -> AbsValue {
    let (AbsValue::AccessPath(paths), AbsValue::Memory(mem)) = (ptr, memory) else { return AbsValue::Universe };
    let mut acc: Option<AbsValue> = None;
    for atom in &paths.members {
        let contribution = match atom {
            AccessAtom::Var(id) => mem.get(*id),
            AccessAtom::Top => AbsValue::Universe,
            AccessAtom::Null | AccessAtom::Field(..) | AccessAtom::Subprogram(_) => continue,
        };
        acc = Some(match acc {
            Some(v) => v.join(&contribution),
            None => contribution,
        });
    }
    acc.unwrap_or(AbsValue::Universe)
}

/// Backward `deref`: refines `memory` by narrowing every variable slot the
/// pointer may alias to `⊓ expected` (a strong update is only sound when
/// the pointer set is an exact singleton `Var`).
pub fn deref_bwd(expected: &AbsValue, ptr: &AbsValue, memory: &AbsValue) -> Option<(AbsValue, AbsValue)> {
    let (AbsValue::AccessPath(paths), AbsValue::Memory(mem)) = (ptr, memory) else {
        return Some((ptr.clone(), memory.clone()));
    };
    if paths.members.len() == 1 {
        if let Some(AccessAtom::Var(id)) = paths.members.iter().next() {
            return Some((ptr.clone(), AbsValue::Memory(mem.inv_get(*id, expected))));
        }
    }
    Some((ptr.clone(), memory.clone()))
}

/// `address_of(var)`: the access path set denoting exactly that variable.
pub fn address_of(var: usize) -> AbsValue {
    AbsValue::AccessPath(AccessPathSet::singleton(AccessAtom::Var(var)))
}

/// `offset(var, delta, memory)`: pointer arithmetic relative to `var`'s
/// frame, modelled as an opaque relabelling.
pub fn offset_fwd(var: usize, memory: &AbsValue, delta: &AbsValue) -> AbsValue {
    match memory {
        AbsValue::Memory(m) => m.offset(var, delta),
        _ => AbsValue::Universe,
    }
}

pub fn copy_offset_fwd(var: usize, memory: &AbsValue) -> AbsValue {
    match memory {
        AbsValue::Memory(m) => m.copy_offset(var),
        _ => AbsValue::Universe,
    }
}

/// `in_range(dim, idx, arr)`: whether `idx` falls within `arr`'s declared
/// index range along dimension `dim`. Arrays are modelled as single
/// dimension sparse arrays here, so `dim` is accepted but unused beyond
/// validating it is `0` — multi-dimensional arrays are out of this
/// analyzer's scope (they flatten to `Product(indices) x elem`, and each
/// dimension is checked independently by the caller).
pub fn in_range_fwd(_dim: usize, idx: &AbsValue, arr: &AbsValue) -> AbsValue {
    let (AbsValue::Interval(i), AbsValue::SparseArray(a)) = (idx, arr) else { return AbsValue::Universe };
    let range = a.slices.iter().fold(Interval::Bottom, |acc, s| acc.join(&s.index));
    if i.is_bottom() {
        AbsValue::Bool(BoolLattice::Bottom)
    } else if i.le(&range) {
        AbsValue::Bool(BoolLattice::True)
    } else if i.meet(&range).is_bottom() {
        AbsValue::Bool(BoolLattice::False)
    } else {
        AbsValue::Bool(BoolLattice::Top)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_domains::Slice;

    fn iv(lo: i128, hi: i128) -> AbsValue {
        AbsValue::Interval(Interval::Range(lo, hi))
    }

    #[test]
    fn array_get_then_bwd_refines_a_point_update() {
        let arr = AbsValue::SparseArray(SparseArray::single(Interval::Range(-10, 10), iv(0, 0)));
        let idx = iv(3, 3);
        let expected = iv(5, 5);
        let (arr2, _) = array_get_bwd(&expected, &arr, &idx).unwrap();
        assert_eq!(array_get_fwd(&arr2, &idx), expected);
    }

    #[test]
    fn get_field_bwd_narrows_only_the_targeted_component() {
        let product = AbsValue::Product(vec![iv(1, 5), iv(0, 1)]);
        let refined = get_field_bwd(0, &iv(3, 4), &product).unwrap();
        assert_eq!(get_field_fwd(0, &refined), iv(3, 4));
        assert_eq!(get_field_fwd(1, &refined), iv(0, 1));
    }

    #[test]
    fn deref_joins_every_aliased_slot() {
        let mem = AbsValue::Memory(Memory::bottom().update(1, iv(1, 1)).update(2, iv(2, 2)));
        let ptr = AbsValue::AccessPath(AccessPathSet::singleton(AccessAtom::Var(1)).join(&AccessPathSet::singleton(AccessAtom::Var(2))));
        let value = deref_fwd(&ptr, &mem);
        assert!(iv(1, 1).le(&value));
        assert!(iv(2, 2).le(&value));
    }

    #[test]
    fn deref_bwd_strong_updates_a_singleton_pointer() {
        let mem = AbsValue::Memory(Memory::bottom().update(1, iv(0, 10)));
        let ptr = AbsValue::AccessPath(AccessPathSet::singleton(AccessAtom::Var(1)));
        let (_, mem2) = deref_bwd(&iv(0, 3), &ptr, &mem).unwrap();
        let AbsValue::Memory(m2) = mem2 else { panic!() };
        assert_eq!(m2.get(1), iv(0, 3));
    }

    #[test]
    fn in_range_true_when_idx_within_declared_bounds() {
        let arr = AbsValue::SparseArray(SparseArray {
            slices: vec![Slice { index: Interval::Range(0, 10), elem: iv(0, 0) }],
        });
        assert_eq!(in_range_fwd(0, &iv(3, 3), &arr), AbsValue::Bool(BoolLattice::True));
    }
}
