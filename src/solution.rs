//! Solver output: selection, status, and statistics.

use std::fmt;
use std::time::Duration;

use crate::error::{KnapsackError, Result};
use crate::solver::Strategy;

/// Whether the returned selection is proven optimal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// The search space was exhausted; no feasible selection is better.
    Optimal,
    /// A node or time limit stopped the search. The selection is feasible
    /// but may be suboptimal.
    LimitReached {
        /// Which limit fired.
        reason: String,
    },
}

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveStats {
    /// Search nodes (or DP rows) processed.
    pub nodes_explored: u64,
    /// Subtrees cut because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Include branches skipped because the item did not fit.
    pub prunings_infeasible: u64,
    /// Complete selections reached.
    pub leaves: u64,
    /// Times the incumbent was replaced.
    pub incumbent_updates: u64,
    /// Deepest level reached.
    pub max_depth: usize,
    /// Wall-clock time of the solve.
    pub elapsed: Duration,
}

impl SolveStats {
    #[inline]
    pub(crate) fn on_node_explored(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub(crate) fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub(crate) fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub(crate) fn on_leaf(&mut self) {
        self.leaves = self.leaves.saturating_add(1);
    }

    #[inline]
    pub(crate) fn on_incumbent_update(&mut self) {
        self.incumbent_updates = self.incumbent_updates.saturating_add(1);
    }

    /// Adds the counters of another (sub)search.
    pub(crate) fn absorb(&mut self, other: &SolveStats) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.prunings_infeasible = self
            .prunings_infeasible
            .saturating_add(other.prunings_infeasible);
        self.leaves = self.leaves.saturating_add(other.leaves);
        self.incumbent_updates = self
            .incumbent_updates
            .saturating_add(other.incumbent_updates);
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

impl fmt::Display for SolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} bound_prunes={} infeasible={} leaves={} updates={} max_depth={} time={:.3}s",
            self.nodes_explored,
            self.prunings_bound,
            self.prunings_infeasible,
            self.leaves,
            self.incumbent_updates,
            self.max_depth,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Result of solving a knapsack instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnapsackSolution {
    /// Total profit of the selection.
    pub profit: f64,
    /// Selected items as 1-based original indices, ascending.
    pub selected: Vec<usize>,
    /// Total weight of the selection.
    pub total_weight: f64,
    /// Optimality status.
    pub status: SolveStatus,
    /// Strategy that produced the selection.
    pub strategy: Strategy,
    /// Search statistics.
    pub stats: SolveStats,
}

impl KnapsackSolution {
    /// Whether optimality was proven.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Returns the solution only if it is proven optimal.
    ///
    /// # Errors
    ///
    /// [`KnapsackError::NotCertified`] when a limit stopped the search.
    pub fn into_certified(self) -> Result<Self> {
        match &self.status {
            SolveStatus::Optimal => Ok(self),
            SolveStatus::LimitReached { reason } => {
                Err(KnapsackError::NotCertified(reason.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(status: SolveStatus) -> KnapsackSolution {
        KnapsackSolution {
            profit: 10.0,
            selected: vec![1],
            total_weight: 3.0,
            status,
            strategy: Strategy::BranchAndBound,
            stats: SolveStats::default(),
        }
    }

    #[test]
    fn test_certified_passes_optimal() {
        let s = solution(SolveStatus::Optimal);
        assert!(s.is_optimal());
        assert!(s.into_certified().is_ok());
    }

    #[test]
    fn test_certified_rejects_limit() {
        let s = solution(SolveStatus::LimitReached {
            reason: "node limit 5 reached".into(),
        });
        assert!(!s.is_optimal());
        let err = s.into_certified().unwrap_err();
        assert!(matches!(err, KnapsackError::NotCertified(_)));
    }

    #[test]
    fn test_absorb() {
        let mut a = SolveStats {
            nodes_explored: 3,
            max_depth: 2,
            ..Default::default()
        };
        let b = SolveStats {
            nodes_explored: 4,
            leaves: 1,
            max_depth: 5,
            ..Default::default()
        };
        a.absorb(&b);
        assert_eq!(a.nodes_explored, 7);
        assert_eq!(a.leaves, 1);
        assert_eq!(a.max_depth, 5);
    }
}
