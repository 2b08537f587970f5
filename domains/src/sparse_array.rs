// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AbsValue, Interval};

/// One contiguous run of indices mapped to the same element value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub index: Interval,
    pub elem: AbsValue,
}

/// A sparse array: a list of disjoint, index-ordered slices covering every
/// index the array is defined at, normalized so adjacent slices never carry
/// an equal element value and the slice count never exceeds `MAX_ELEMS` —
/// above that bound slices are joined pairwise (nearest index first) until
/// it fits again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SparseArray {
    pub slices: Vec<Slice>,
}

pub const MAX_ELEMS: usize = 15;

/// Bounds of a non-bottom interval; only ever called on slice indices,
/// which are filtered to non-bottom before this is reached.
fn bounds(i: &Interval) -> (i128, i128) {
    match i {
        Interval::Range(lo, hi) => (*lo, *hi),
        Interval::Bottom => (i128::MAX, i128::MIN),
    }
}

impl fmt::Display for SparseArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.slices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", s.index, s.elem)?;
        }
        write!(f, "]")
    }
}

impl SparseArray {
    pub fn bottom() -> Self {
        Self { slices: Vec::new() }
    }

    pub fn is_bottom(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn top(elem_top: AbsValue) -> Self {
        Self { slices: vec![Slice { index: Interval::Range(i128::MIN, i128::MAX), elem: elem_top }] }
    }

    pub fn single(index: Interval, elem: AbsValue) -> Self {
        if index.is_bottom() { Self::bottom() } else { Self { slices: vec![Slice { index, elem }] } }
    }

    /// Sorts by index, merges adjacent slices with equal element values, and
    /// collapses the slice list down to `MAX_ELEMS` by joining whichever two
    /// neighbouring slices are closest together until the bound is met.
    pub fn normalize(mut slices: Vec<Slice>) -> Self {
        slices.retain(|s| !s.index.is_bottom());
        slices.sort_by_key(|s| s.index.lo());
        let mut merged: Vec<Slice> = Vec::with_capacity(slices.len());
        for s in slices {
            if let Some(last) = merged.last_mut() {
                let (_, last_hi) = bounds(&last.index);
                let (s_lo, _) = bounds(&s.index);
                if last.elem == s.elem && last_hi.saturating_add(1) >= s_lo {
                    last.index = last.index.join(&s.index);
                    continue;
                }
            }
            merged.push(s);
        }
        while merged.len() > MAX_ELEMS {
            let mut best = 0usize;
            let mut best_gap = i128::MAX;
            for i in 0..merged.len() - 1 {
                let (next_lo, _) = bounds(&merged[i + 1].index);
                let (_, cur_hi) = bounds(&merged[i].index);
                let gap = next_lo.saturating_sub(cur_hi);
                if gap < best_gap {
                    best_gap = gap;
                    best = i;
                }
            }
            let right = merged.remove(best + 1);
            let left = &mut merged[best];
            left.index = left.index.join(&right.index);
            left.elem = left.elem.join(&right.elem);
        }
        Self { slices: merged }
    }

    pub fn le(&self, other: &SparseArray) -> bool {
        self.slices.iter().all(|s| {
            other.slices.iter().any(|o| s.index.le(&o.index) && s.elem.le(&o.elem))
                || other.slices.iter().filter(|o| !o.index.meet(&s.index).is_bottom()).all(|o| s.elem.le(&o.elem))
        })
    }

    pub fn join(&self, other: &SparseArray) -> SparseArray {
        let mut slices = self.slices.clone();
        slices.extend(other.slices.iter().cloned());
        Self::normalize(slices)
    }

    pub fn meet(&self, other: &SparseArray) -> SparseArray {
        let mut slices = Vec::new();
        for a in &self.slices {
            for b in &other.slices {
                let index = a.index.meet(&b.index);
                if !index.is_bottom() {
                    slices.push(Slice { index, elem: a.elem.meet(&b.elem) });
                }
            }
        }
        Self::normalize(slices)
    }

    /// Forward `get`: the join of every slice whose index range overlaps
    /// `at`.
    /// `outside` is the element domain's `⊤`, returned when `at` falls
    /// entirely outside every slice — the caller is the only one who knows
    /// what the element domain actually is, so it supplies that fallback
    /// rather than this method guessing at it.
    pub fn get(&self, at: &Interval, outside: &AbsValue) -> AbsValue {
        let mut acc: Option<AbsValue> = None;
        for s in &self.slices {
            if !s.index.meet(at).is_bottom() {
                acc = Some(match acc {
                    Some(v) => v.join(&s.elem),
                    None => s.elem.clone(),
                });
            }
        }
        acc.unwrap_or_else(|| outside.clone())
    }

    /// Forward `updated`: overlapping slices are weakened to the join of
    /// their old element and the new one (a strong update is only sound
    /// when `at` denotes a single concrete index, i.e. `at.lo() == at.hi()`
    /// and it exactly matches an existing slice's range).
    pub fn updated(&self, at: &Interval, value: &AbsValue) -> SparseArray {
        let mut slices = Vec::new();
        let strong = at.lo() == at.hi();
        for s in &self.slices {
            let overlap = s.index.meet(at);
            if overlap.is_bottom() {
                slices.push(s.clone());
                continue;
            }
            for piece in s.index.split(at) {
                slices.push(Slice { index: piece, elem: s.elem.clone() });
            }
            if !strong {
                slices.push(Slice { index: overlap.clone(), elem: s.elem.join(value) });
            }
        }
        if strong {
            slices.push(Slice { index: at.clone(), elem: value.clone() });
        }
        Self::normalize(slices)
    }

    /// Forward `index_range`: the sub-array restricted to `range`.
    pub fn index_range(&self, range: &Interval) -> SparseArray {
        let mut slices = Vec::new();
        for s in &self.slices {
            let overlap = s.index.meet(range);
            if !overlap.is_bottom() {
                slices.push(Slice { index: overlap, elem: s.elem.clone() });
            }
        }
        Self::normalize(slices)
    }

    /// Forward `in_values_of`: true if `value` could equal some element
    /// stored anywhere in the array.
    pub fn in_values_of(&self, value: &AbsValue) -> crate::BoolLattice {
        use crate::BoolLattice;
        let mut acc = BoolLattice::Bottom;
        for s in &self.slices {
            acc = acc.join(&value.eq_abs(&s.elem));
        }
        acc
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::BoolLattice;

    fn iv(lo: i128, hi: i128) -> Interval {
        Interval::Range(lo, hi)
    }

    #[test]
    fn normalize_merges_adjacent_equal_slices() {
        let slices = vec![
            Slice { index: iv(0, 2), elem: AbsValue::Bool(BoolLattice::True) },
            Slice { index: iv(3, 5), elem: AbsValue::Bool(BoolLattice::True) },
        ];
        let arr = SparseArray::normalize(slices);
        assert_eq!(arr.slices.len(), 1);
        assert_eq!(arr.slices[0].index, iv(0, 5));
    }

    #[test]
    fn normalize_caps_slice_count_at_max_elems() {
        let slices: Vec<Slice> = (0..20)
            .map(|i| Slice { index: iv(i * 10, i * 10), elem: AbsValue::Interval(Interval::point(i)) })
            .collect();
        let arr = SparseArray::normalize(slices);
        assert!(arr.slices.len() <= MAX_ELEMS);
    }

    #[test]
    fn strong_update_replaces_a_single_point() {
        let arr = SparseArray::single(iv(0, 10), AbsValue::Interval(Interval::point(1)));
        let updated = arr.updated(&iv(3, 3), &AbsValue::Interval(Interval::point(99)));
        let at3 = updated.get(&iv(3, 3), &AbsValue::Universe);
        assert_eq!(at3, AbsValue::Interval(Interval::point(99)));
    }

    #[test]
    fn strong_update_splits_around_a_point_without_duplicating_slices() {
        let arr = SparseArray::single(iv(-10, 10), AbsValue::Interval(Interval::point(0)));
        let updated = arr.updated(&iv(3, 3), &AbsValue::Interval(Interval::point(5)));
        assert_eq!(
            updated.slices,
            vec![
                Slice { index: iv(-10, 2), elem: AbsValue::Interval(Interval::point(0)) },
                Slice { index: iv(3, 3), elem: AbsValue::Interval(Interval::point(5)) },
                Slice { index: iv(4, 10), elem: AbsValue::Interval(Interval::point(0)) },
            ]
        );
    }

    #[test]
    fn weak_update_joins_instead_of_replacing() {
        let arr = SparseArray::single(iv(0, 10), AbsValue::Interval(Interval::point(1)));
        let updated = arr.updated(&iv(3, 5), &AbsValue::Interval(Interval::point(99)));
        let at4 = updated.get(&iv(4, 4), &AbsValue::Universe);
        assert!(at4.le(&AbsValue::Interval(Interval::Range(1, 99))));
    }
}
