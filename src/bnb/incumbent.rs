//! Incumbent management.
//!
//! [`IncumbentStore`] abstracts over the record owned by a single traversal
//! ([`SolutionRecord`]) and the record shared by parallel subtree searches
//! ([`SharedIncumbent`] through [`SubtreeHandle`]).

use crate::num::Value;

/// Read and update access to the best selection found so far.
pub(crate) trait IncumbentStore<V: Value> {
    /// Whether a subtree with this bound may still improve the incumbent.
    fn admits(&mut self, bound: V, eps: f64) -> bool;

    /// Offers a complete selection. `chosen` is called only when the
    /// selection is installed. Returns whether it was installed.
    fn offer<F>(&mut self, profit: V, chosen: F, eps: f64) -> bool
    where
        F: FnOnce() -> Vec<usize>;
}

/// Best selection of one traversal: profit and sorted positions.
///
/// Starts at profit zero with the empty selection and changes only on a
/// strict improvement, so among equally good selections the first one
/// found is kept.
#[derive(Debug, Clone)]
pub(crate) struct SolutionRecord<V> {
    pub profit: V,
    pub positions: Vec<usize>,
}

impl<V: Value> SolutionRecord<V> {
    pub fn new() -> Self {
        Self {
            profit: V::ZERO,
            positions: Vec::new(),
        }
    }
}

impl<V: Value> IncumbentStore<V> for SolutionRecord<V> {
    #[inline]
    fn admits(&mut self, bound: V, eps: f64) -> bool {
        V::exceeds(bound, self.profit, eps)
    }

    #[inline]
    fn offer<F>(&mut self, profit: V, chosen: F, eps: f64) -> bool
    where
        F: FnOnce() -> Vec<usize>,
    {
        if V::exceeds(profit, self.profit, eps) {
            self.profit = profit;
            self.positions = chosen();
            true
        } else {
            false
        }
    }
}

#[cfg(feature = "parallel")]
pub(crate) use shared::{SharedIncumbent, SubtreeHandle};

#[cfg(feature = "parallel")]
mod shared {
    use std::sync::Mutex;

    use super::IncumbentStore;
    use crate::num::Value;

    /// Interval between refreshes of a worker's cached incumbent.
    const REFRESH_INTERVAL: u32 = 256;

    #[derive(Debug, Clone)]
    struct Entry<V> {
        profit: V,
        positions: Vec<usize>,
        /// DFS rank of the subtree that produced it; `None` for the
        /// initial empty selection.
        rank: Option<usize>,
    }

    /// Incumbent shared by parallel subtree searches.
    ///
    /// Read-compare-update happens under one mutex. Entries are ordered by
    /// profit, then by subtree rank (lower rank first in include-first DFS
    /// order), which makes the final selection identical to a sequential
    /// search regardless of thread scheduling.
    #[derive(Debug)]
    pub(crate) struct SharedIncumbent<V> {
        inner: Mutex<Entry<V>>,
    }

    impl<V: Value> SharedIncumbent<V> {
        pub fn new() -> Self {
            Self {
                inner: Mutex::new(Entry {
                    profit: V::ZERO,
                    positions: Vec::new(),
                    rank: None,
                }),
            }
        }

        fn peek(&self) -> (V, Option<usize>) {
            let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            (guard.profit, guard.rank)
        }

        /// Consumes the store and returns profit and positions.
        pub fn into_record(self) -> (V, Vec<usize>) {
            let entry = self.inner.into_inner().unwrap_or_else(|e| e.into_inner());
            (entry.profit, entry.positions)
        }
    }

    /// One worker's view of a [`SharedIncumbent`] for the subtree of `rank`.
    ///
    /// Bound checks use a cached copy refreshed every few hundred calls. A
    /// stale copy is never better than the shared one, so it can only cost
    /// prunes.
    pub(crate) struct SubtreeHandle<'a, V> {
        shared: &'a SharedIncumbent<V>,
        rank: usize,
        cached: (V, Option<usize>),
        calls: u32,
    }

    impl<'a, V: Value> SubtreeHandle<'a, V> {
        pub fn new(shared: &'a SharedIncumbent<V>, rank: usize) -> Self {
            Self {
                shared,
                rank,
                cached: shared.peek(),
                calls: 0,
            }
        }

        fn ties_prunable(&self, rank: Option<usize>) -> bool {
            rank.map_or(true, |r| r <= self.rank)
        }
    }

    impl<V: Value> IncumbentStore<V> for SubtreeHandle<'_, V> {
        fn admits(&mut self, bound: V, eps: f64) -> bool {
            self.calls += 1;
            if self.calls >= REFRESH_INTERVAL {
                self.calls = 0;
                self.cached = self.shared.peek();
            }
            let (best, rank) = self.cached;
            if V::exceeds(bound, best, eps) {
                return true;
            }
            !V::exceeds(best, bound, eps) && !self.ties_prunable(rank)
        }

        fn offer<F>(&mut self, profit: V, chosen: F, eps: f64) -> bool
        where
            F: FnOnce() -> Vec<usize>,
        {
            let mut guard = self.shared.inner.lock().unwrap_or_else(|e| e.into_inner());
            let better = V::exceeds(profit, guard.profit, eps);
            let earlier_tie = !V::exceeds(guard.profit, profit, eps)
                && guard.rank.is_some_and(|r| self.rank < r);
            if better || earlier_tie {
                guard.profit = profit;
                guard.positions = chosen();
                guard.rank = Some(self.rank);
                self.cached = (guard.profit, guard.rank);
                true
            } else {
                self.cached = (guard.profit, guard.rank);
                false
            }
        }
    }

}
