// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Cooperative cancellation and iteration/wall-time limits for a single
//! analysis run. The evaluator checks a budget between worklist rounds, not
//! inside one — mid-round cancellation would leave a node's environment
//! half-updated.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Budget {
    max_iterations: usize,
    deadline: Option<Instant>,
    cancel: Arc<AtomicBool>,
    iterations: AtomicUsize,
}

impl Budget {
    pub fn new(max_iterations: usize, timeout: Option<Duration>) -> Self {
        Self {
            max_iterations,
            deadline: timeout.map(|d| Instant::now() + d),
            cancel: Arc::new(AtomicBool::new(false)),
            iterations: AtomicUsize::new(0),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(usize::MAX, None)
    }

    /// A handle the CLI's `--timeout-ms` wall clock (or a `Ctrl-C` handler)
    /// can flip to stop an in-flight analysis at the next round boundary.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Call once per worklist round. `false` means: stop, the budget is
    /// exhausted.
    pub fn tick(&self) -> bool {
        let n = self.iterations.fetch_add(1, Ordering::Relaxed) + 1;
        if self.cancel.load(Ordering::Relaxed) {
            return false;
        }
        if n > self.max_iterations {
            return false;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                return false;
            }
        }
        true
    }

    pub fn iterations(&self) -> usize {
        self.iterations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exhausts_after_max_iterations() {
        let budget = Budget::new(2, None);
        assert!(budget.tick());
        assert!(budget.tick());
        assert!(!budget.tick());
    }

    #[test]
    fn cancellation_flag_stops_future_ticks() {
        let budget = Budget::unbounded();
        let flag = budget.cancellation_flag();
        assert!(budget.tick());
        flag.store(true, Ordering::Relaxed);
        assert!(!budget.tick());
    }
}
