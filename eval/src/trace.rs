// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Per-node path sensitivity: `semantics[node]` is keyed by a
//! bounded history of predecessor node identifiers rather than by a single
//! flat environment, so two paths reaching the same node are kept apart
//! just long enough to avoid merging away information a checker cares
//! about. How much history is kept is the merge predicate's call.

use adastat_ir::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePredicate {
    /// Every trace reaching a node is considered equivalent — a single,
    /// fully path-insensitive environment per node. The default; cheapest
    /// and what most of this crate's tests exercise.
    Always,
    /// Traces are distinguished by their last `n` predecessor identifiers;
    /// traces agreeing on that window are merged, others are kept apart.
    Bounded(usize),
}

/// A bounded sequence of predecessor node identifiers leading to a point in
/// the analysis. `Trace(vec![])` under `MergePredicate::Always` is the only
/// trace that ever exists; under `Bounded(n)` it is truncated to the last
/// `n` entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Trace(pub Vec<NodeId>);

impl Trace {
    pub fn root() -> Self {
        Trace(Vec::new())
    }

    /// The trace recorded when control passes through `node` on its way to
    /// whatever comes next, per `predicate`'s window.
    pub fn extended(&self, node: NodeId, predicate: MergePredicate) -> Trace {
        match predicate {
            MergePredicate::Always => Trace::root(),
            MergePredicate::Bounded(n) => {
                let mut v = self.0.clone();
                v.push(node);
                if v.len() > n {
                    let drop = v.len() - n;
                    v.drain(0..drop);
                }
                Trace(v)
            }
        }
    }
}
