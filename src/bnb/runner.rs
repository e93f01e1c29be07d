//! Branch-and-bound execution engine.
//!
//! # Algorithm
//!
//! Depth-first search over the include/exclude decision tree, one decision
//! per item in ratio order:
//!
//! 1. Pop a state. At a leaf, offer its selection to the incumbent.
//! 2. Compute the fractional relaxation bound; prune if it cannot beat the
//!    incumbent.
//! 3. Push the exclude child, then the include child (if the item fits),
//!    so the include branch is explored first.
//!
//! The incumbent changes only on strict improvement, so the result is the
//! first optimal selection in include-first order. The stack is explicit;
//! the depth of the tree is limited by memory rather than the call stack.
//!
//! # Reference
//!
//! Horowitz, E. & Sahni, S. (1974). "Computing partitions with applications
//! to the knapsack problem", *Journal of the ACM* 21(2), 277-292.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace, warn};

use super::budget::{Budget, StopSignal};
use super::config::{BnbConfig, NumericPolicy};
use super::incumbent::{IncumbentStore, SolutionRecord};
use super::state::{SearchState, Trail};
use crate::bound::upper_bound;
use crate::error::{KnapsackError, Result};
use crate::instance::Instance;
use crate::num::{SortedTable, Value};
use crate::solution::{KnapsackSolution, SolveStats, SolveStatus};
use crate::solver::Strategy;

/// Positions of the best selection, whether the search completed, stats.
pub(crate) type SearchOutcome = (Vec<usize>, bool, SolveStats);

/// Branch-and-bound runner.
pub struct BnbRunner;

impl BnbRunner {
    /// Solves the instance to optimality (or until a limit fires).
    ///
    /// # Errors
    ///
    /// - [`KnapsackError::InvalidConfig`] if `config` does not validate.
    /// - [`KnapsackError::ResourceExhausted`] if the instance has more than
    ///   `config.max_items` items.
    /// - [`KnapsackError::InfeasibleInput`] if exact arithmetic is forced on
    ///   a non-integral instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_knapsack::Instance;
    /// use u_knapsack::bnb::{BnbConfig, BnbRunner};
    ///
    /// let inst = Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap();
    /// let solution = BnbRunner::run(&inst, &BnbConfig::default()).unwrap();
    /// assert_eq!(solution.profit, 220.0);
    /// assert_eq!(solution.selected, vec![2, 3]);
    /// assert!(solution.is_optimal());
    /// ```
    pub fn run(instance: &Instance, config: &BnbConfig) -> Result<KnapsackSolution> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs branch-and-bound with an optional cancellation token.
    ///
    /// Setting the token stops the search at the next node; the returned
    /// solution is the best one found so far with status
    /// [`SolveStatus::LimitReached`] and reason `"cancelled"`.
    pub fn run_with_cancel(
        instance: &Instance,
        config: &BnbConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<KnapsackSolution> {
        config.validate().map_err(KnapsackError::InvalidConfig)?;

        if instance.item_count() > config.max_items {
            return Err(KnapsackError::ResourceExhausted(format!(
                "{} items exceed the branch-and-bound limit of {}",
                instance.item_count(),
                config.max_items
            )));
        }

        let exact = match config.numeric {
            NumericPolicy::Auto => instance.is_integral(),
            NumericPolicy::Tolerant => false,
            NumericPolicy::Exact if instance.is_integral() => true,
            NumericPolicy::Exact => {
                return Err(KnapsackError::InfeasibleInput(
                    "exact arithmetic requires whole-number values below 2^53".into(),
                ))
            }
        };

        debug!(
            "branch-and-bound: {} items, capacity {}, {} arithmetic",
            instance.item_count(),
            instance.capacity(),
            if exact { "exact" } else { "tolerant" }
        );

        let started = Instant::now();
        #[cfg(not(feature = "parallel"))]
        {
            if config.parallel {
                warn!("parallel search requested without the `parallel` feature; searching sequentially");
            }
        }

        let signal = StopSignal::new(cancel);
        let (positions, original, completed, mut stats) = if exact {
            search::<i64>(instance, config, started, &signal)
        } else {
            search::<f64>(instance, config, started, &signal)
        };
        stats.elapsed = started.elapsed();

        let mut selected: Vec<usize> = positions.iter().map(|&p| original[p]).collect();
        selected.sort_unstable();

        let status = if completed {
            SolveStatus::Optimal
        } else {
            let reason = signal
                .reason()
                .unwrap_or_else(|| "search interrupted".to_string());
            warn!("branch-and-bound stopped early: {reason}");
            SolveStatus::LimitReached { reason }
        };

        debug!("branch-and-bound finished: {stats}");

        Ok(KnapsackSolution {
            profit: instance.profit_of(&selected),
            total_weight: instance.weight_of(&selected),
            selected,
            status,
            strategy: Strategy::BranchAndBound,
            stats,
        })
    }
}

fn search<V: Value>(
    instance: &Instance,
    config: &BnbConfig,
    started: Instant,
    signal: &StopSignal,
) -> (Vec<usize>, Vec<usize>, bool, SolveStats) {
    let table = SortedTable::<V>::new(instance);

    #[cfg(feature = "parallel")]
    {
        if config.parallel && table.len() > 0 {
            let (positions, completed, stats) =
                super::parallel::search(&table, config, started, signal);
            return (positions, table.original, completed, stats);
        }
    }

    let (positions, completed, stats) = sequential(&table, config, started, signal);
    (positions, table.original, completed, stats)
}

fn sequential<V: Value>(
    table: &SortedTable<V>,
    config: &BnbConfig,
    started: Instant,
    signal: &StopSignal,
) -> SearchOutcome {
    let mut record = SolutionRecord::<V>::new();
    let mut trail = Trail::with_capacity(table.len());
    let mut budget = Budget::new(config.node_limit, config.time_limit, started, signal, false);
    let mut stats = SolveStats::default();

    let completed = depth_first(
        table,
        SearchState::root(table.capacity),
        &mut trail,
        &mut record,
        &mut budget,
        config.epsilon,
        &mut stats,
    );
    (record.positions, completed, stats)
}

/// Explores the subtree below `root`. Returns `false` if a limit stopped
/// the search before the subtree was exhausted.
pub(crate) fn depth_first<V: Value, S: IncumbentStore<V>>(
    table: &SortedTable<V>,
    root: SearchState<V>,
    trail: &mut Trail,
    store: &mut S,
    budget: &mut Budget<'_>,
    eps: f64,
    stats: &mut SolveStats,
) -> bool {
    let n = table.len();
    let mut stack: Vec<SearchState<V>> = Vec::with_capacity(n + 2);
    stack.push(root);

    while let Some(state) = stack.pop() {
        if budget.exhausted() {
            budget.flush();
            return false;
        }
        trail.truncate(state.mark);
        stats.on_node_explored(state.depth);

        if state.depth == n {
            stats.on_leaf();
            let chain = state.chosen;
            if store.offer(state.profit, || trail.positions(chain), eps) {
                stats.on_incumbent_update();
                trace!("incumbent improved to {}", state.profit.to_f64());
            }
            continue;
        }

        let bound = upper_bound(table, state.depth, state.remaining, state.profit, eps);
        if !store.admits(bound, eps) {
            stats.on_pruning_bound();
            continue;
        }

        let k = state.depth;
        stack.push(state.exclude(trail));
        match V::pack(state.remaining, table.weights[k], eps) {
            Some(left) => stack.push(state.include(left, table.profits[k], trail)),
            None => stats.on_pruning_infeasible(),
        }
    }

    budget.flush();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn run(capacity: f64, items: Vec<(f64, f64)>) -> KnapsackSolution {
        let inst = Instance::new(capacity, items).unwrap();
        BnbRunner::run(&inst, &BnbConfig::default()).unwrap()
    }

    #[test]
    fn test_single_item_fits_exactly() {
        let s = run(10.0, vec![(60.0, 10.0)]);
        assert_eq!(s.profit, 60.0);
        assert_eq!(s.selected, vec![1]);
    }

    #[test]
    fn test_classic_three_items() {
        let s = run(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]);
        assert_eq!(s.profit, 220.0);
        assert_eq!(s.selected, vec![2, 3]);
        assert_eq!(s.total_weight, 50.0);
        assert!(s.is_optimal());
        assert_eq!(s.strategy, Strategy::BranchAndBound);
    }

    #[test]
    fn test_zero_capacity() {
        let s = run(0.0, vec![(10.0, 5.0)]);
        assert_eq!(s.profit, 0.0);
        assert!(s.selected.is_empty());
    }

    #[test]
    fn test_nothing_fits() {
        let s = run(5.0, vec![(10.0, 6.0)]);
        assert_eq!(s.profit, 0.0);
        assert!(s.selected.is_empty());
    }

    #[test]
    fn test_empty_instance() {
        let s = run(10.0, vec![]);
        assert_eq!(s.profit, 0.0);
        assert!(s.selected.is_empty());
        assert!(s.is_optimal());
    }

    #[test]
    fn test_equal_ratio_tie_prefers_lower_indices() {
        // all ratio 2; {1,2} and {3} both reach 10, {1,2} comes first
        let s = run(5.0, vec![(4.0, 2.0), (6.0, 3.0), (10.0, 5.0)]);
        assert_eq!(s.profit, 10.0);
        assert_eq!(s.selected, vec![1, 2]);
    }

    #[test]
    fn test_weightless_items_selected() {
        let s = run(0.0, vec![(10.0, 5.0), (3.0, 0.0)]);
        assert_eq!(s.profit, 3.0);
        assert_eq!(s.selected, vec![2]);
    }

    #[test]
    fn test_real_valued_instance() {
        // 0.1 + 0.2 slightly exceeds 0.3 in binary; tolerance still packs both
        let s = run(0.3, vec![(1.5, 0.1), (2.5, 0.2), (3.0, 0.3)]);
        assert!((s.profit - 4.0).abs() < 1e-9);
        assert_eq!(s.selected, vec![1, 2]);
    }

    #[test]
    fn test_tolerant_policy_matches_exact() {
        let inst = Instance::new(
            26.0,
            vec![(24.0, 12.0), (13.0, 7.0), (23.0, 11.0), (15.0, 8.0), (16.0, 9.0)],
        )
        .unwrap();
        let exact = BnbRunner::run(&inst, &BnbConfig::default()).unwrap();
        let tolerant = BnbRunner::run(
            &inst,
            &BnbConfig::default().with_numeric(NumericPolicy::Tolerant),
        )
        .unwrap();
        assert_eq!(exact.profit, 51.0);
        assert_eq!(exact.selected, vec![2, 3, 4]);
        assert_eq!(exact.selected, tolerant.selected);
    }

    #[test]
    fn test_exact_policy_rejects_real_values() {
        let inst = Instance::new(1.5, vec![(1.0, 1.0)]).unwrap();
        let err = BnbRunner::run(&inst, &BnbConfig::default().with_numeric(NumericPolicy::Exact))
            .unwrap_err();
        assert!(matches!(err, KnapsackError::InfeasibleInput(_)));
    }

    #[test]
    fn test_max_items_is_resource_error() {
        let inst = Instance::new(10.0, vec![(1.0, 1.0); 5]).unwrap();
        let err = BnbRunner::run(&inst, &BnbConfig::default().with_max_items(4)).unwrap_err();
        assert!(matches!(err, KnapsackError::ResourceExhausted(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_invalid_config() {
        let inst = Instance::new(10.0, vec![]).unwrap();
        let err = BnbRunner::run(&inst, &BnbConfig::default().with_epsilon(-1.0)).unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidConfig(_)));
    }

    #[test]
    fn test_node_limit_reports_not_certified() {
        let inst = crate::InstanceGenerator::new(60)
            .with_correlation(10)
            .with_seed(3)
            .generate()
            .unwrap();
        let s = BnbRunner::run(&inst, &BnbConfig::default().with_node_limit(10)).unwrap();
        assert!(!s.is_optimal());
        assert_eq!(s.stats.nodes_explored, 10);
        assert!(s.total_weight <= inst.capacity());
        assert!(matches!(
            s.into_certified(),
            Err(KnapsackError::NotCertified(_))
        ));
    }

    #[test]
    fn test_preset_cancel_token_reports_not_certified() {
        let inst = crate::InstanceGenerator::new(30).with_seed(5).generate().unwrap();
        let cancel = Arc::new(AtomicBool::new(true));
        let s = BnbRunner::run_with_cancel(&inst, &BnbConfig::default(), Some(cancel)).unwrap();
        assert!(!s.is_optimal());
        assert_eq!(
            s.status,
            SolveStatus::LimitReached {
                reason: "cancelled".into()
            }
        );
        assert!(s.selected.is_empty());
        assert!(matches!(
            s.into_certified(),
            Err(KnapsackError::NotCertified(_))
        ));
    }

    #[test]
    fn test_unset_cancel_token_runs_to_optimality() {
        let inst = Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap();
        let cancel = Arc::new(AtomicBool::new(false));
        let s = BnbRunner::run_with_cancel(&inst, &BnbConfig::default(), Some(cancel)).unwrap();
        assert!(s.is_optimal());
        assert_eq!(s.selected, vec![2, 3]);
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_parallel_flag_without_feature_searches_sequentially() {
        let s = BnbRunner::run(
            &Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap(),
            &BnbConfig::default().with_parallel(true),
        )
        .unwrap();
        assert!(s.is_optimal());
        assert_eq!(s.selected, vec![2, 3]);
    }

    #[test]
    fn test_generous_time_limit_still_optimal() {
        let s = BnbRunner::run(
            &Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap(),
            &BnbConfig::default().with_time_limit(Duration::from_secs(60)),
        )
        .unwrap();
        assert!(s.is_optimal());
        assert_eq!(s.profit, 220.0);
    }

    #[test]
    fn test_stats_counted() {
        let s = run(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]);
        assert!(s.stats.nodes_explored > 0);
        assert!(s.stats.leaves >= 1);
        assert!(s.stats.incumbent_updates >= 1);
        assert!(s.stats.max_depth <= 3);
    }

    #[test]
    fn test_idempotent() {
        let inst = crate::InstanceGenerator::new(40).with_seed(11).generate().unwrap();
        let a = BnbRunner::run(&inst, &BnbConfig::default()).unwrap();
        let b = BnbRunner::run(&inst, &BnbConfig::default()).unwrap();
        assert_eq!(a.profit, b.profit);
        assert_eq!(a.selected, b.selected);
    }
}
