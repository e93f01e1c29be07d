//! Parallel subtree search.
//!
//! The decision tree is cut at `split_depth`. The states at that depth are
//! enumerated in include-first order, so their rank equals their position
//! in a sequential traversal, and each is searched by a rayon task. All
//! tasks share one [`SharedIncumbent`]; its rank-aware tie handling makes
//! the result the same as the sequential one.

use log::debug;
use rayon::prelude::*;

use super::budget::{Budget, StopSignal};
use super::config::BnbConfig;
use super::incumbent::{SharedIncumbent, SubtreeHandle};
use super::runner::{depth_first, SearchOutcome};
use super::state::{SearchState, Trail};
use crate::num::{SortedTable, Value};
use crate::solution::SolveStats;
use std::time::Instant;

#[derive(Debug, Clone)]
struct Subtree<V> {
    rank: usize,
    depth: usize,
    remaining: V,
    profit: V,
    positions: Vec<usize>,
}

/// Feasible states at `split` in include-first order.
fn frontier<V: Value>(table: &SortedTable<V>, split: usize, eps: f64) -> Vec<Subtree<V>> {
    let mut out = Vec::new();
    let mut stack = vec![(0usize, table.capacity, V::ZERO, Vec::new())];

    while let Some((depth, remaining, profit, positions)) = stack.pop() {
        if depth == split {
            out.push(Subtree {
                rank: out.len(),
                depth,
                remaining,
                profit,
                positions,
            });
            continue;
        }
        stack.push((depth + 1, remaining, profit, positions.clone()));
        if let Some(left) = V::pack(remaining, table.weights[depth], eps) {
            let mut taken = positions;
            taken.push(depth);
            stack.push((depth + 1, left, profit.plus(table.profits[depth]), taken));
        }
    }
    out
}

pub(crate) fn search<V: Value>(
    table: &SortedTable<V>,
    config: &BnbConfig,
    started: Instant,
    signal: &StopSignal,
) -> SearchOutcome {
    let split = config.split_depth.min(table.len());
    let subtrees = frontier(table, split, config.epsilon);
    debug!(
        "parallel branch-and-bound: {} subtrees at depth {split}",
        subtrees.len()
    );

    let shared = SharedIncumbent::<V>::new();
    let results: Vec<(bool, SolveStats)> = subtrees
        .par_iter()
        .map(|sub| {
            let (mut trail, head) = Trail::from_positions(&sub.positions);
            let root = SearchState {
                depth: sub.depth,
                remaining: sub.remaining,
                profit: sub.profit,
                chosen: head,
                mark: trail.len(),
            };
            let mut handle = SubtreeHandle::new(&shared, sub.rank);
            let mut budget =
                Budget::new(config.node_limit, config.time_limit, started, signal, true);
            let mut stats = SolveStats::default();
            if budget.past_deadline() {
                return (false, stats);
            }
            let completed = depth_first(
                table,
                root,
                &mut trail,
                &mut handle,
                &mut budget,
                config.epsilon,
                &mut stats,
            );
            (completed, stats)
        })
        .collect();

    let completed = results.iter().all(|(done, _)| *done);
    let mut stats = SolveStats::default();
    for (_, sub) in &results {
        stats.absorb(sub);
    }
    let (_, positions) = shared.into_record();
    (positions, completed, stats)
}
