//! Strategy selection and the top-level `solve` entry points.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;

use crate::bnb::{BnbConfig, BnbRunner};
use crate::dp::{DpConfig, DpRunner};
use crate::error::{KnapsackError, Result};
use crate::instance::Instance;
use crate::solution::KnapsackSolution;

/// Exact algorithm used to solve an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Depth-first branch-and-bound with fractional bounds.
    #[default]
    BranchAndBound,
    /// Table dynamic programming; integral instances only.
    DynamicProgramming,
    /// Dynamic programming when the instance is integral and its table fits
    /// [`DpConfig::max_cells`], branch-and-bound otherwise. When several
    /// selections share the optimal profit, the one returned may differ
    /// from what branch-and-bound alone would pick.
    Auto,
}

/// Configuration for [`solve_with`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_knapsack::{SolverConfig, Strategy};
///
/// let config = SolverConfig::default()
///     .with_strategy(Strategy::Auto)
///     .with_time_limit(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Which algorithm to run.
    pub strategy: Strategy,
    /// Branch-and-bound settings.
    pub bnb: BnbConfig,
    /// Dynamic programming settings.
    pub dp: DpConfig,
}

impl SolverConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_bnb(mut self, bnb: BnbConfig) -> Self {
        self.bnb = bnb;
        self
    }

    pub fn with_dp(mut self, dp: DpConfig) -> Self {
        self.dp = dp;
        self
    }

    /// Shorthand for setting the branch-and-bound node limit.
    pub fn with_node_limit(mut self, n: u64) -> Self {
        self.bnb.node_limit = n;
        self
    }

    /// Shorthand for setting the branch-and-bound time limit.
    pub fn with_time_limit(mut self, limit: std::time::Duration) -> Self {
        self.bnb.time_limit = Some(limit);
        self
    }

    /// Validates both sub-configurations.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.bnb.validate()?;
        self.dp.validate()
    }

    /// The strategy that will actually run on `instance`.
    pub fn resolve(&self, instance: &Instance) -> Strategy {
        match self.strategy {
            Strategy::Auto if DpRunner::applicable(instance, &self.dp) => {
                Strategy::DynamicProgramming
            }
            Strategy::Auto => Strategy::BranchAndBound,
            other => other,
        }
    }
}

/// Solves `instance` with the default configuration.
///
/// # Examples
///
/// ```
/// use u_knapsack::{solve, Instance};
///
/// let inst = Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap();
/// let solution = solve(&inst).unwrap();
/// assert_eq!(solution.profit, 220.0);
/// assert_eq!(solution.selected, vec![2, 3]);
/// ```
pub fn solve(instance: &Instance) -> Result<KnapsackSolution> {
    solve_with(instance, &SolverConfig::default())
}

/// Solves `instance` with an explicit configuration.
///
/// # Errors
///
/// Propagates the errors of the selected runner, plus
/// [`KnapsackError::InvalidConfig`] if `config` does not validate.
pub fn solve_with(instance: &Instance, config: &SolverConfig) -> Result<KnapsackSolution> {
    solve_with_cancel(instance, config, None)
}

/// [`solve_with`] with an optional cancellation token.
///
/// The token stops branch-and-bound early (status
/// [`LimitReached`](crate::SolveStatus::LimitReached), reason
/// `"cancelled"`). Dynamic programming is bounded by its table size and
/// does not observe it.
pub fn solve_with_cancel(
    instance: &Instance,
    config: &SolverConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<KnapsackSolution> {
    config.validate().map_err(KnapsackError::InvalidConfig)?;
    let strategy = config.resolve(instance);
    debug!("solving with {strategy:?} (requested {:?})", config.strategy);
    match strategy {
        Strategy::DynamicProgramming => DpRunner::run(instance, &config.dp),
        _ => BnbRunner::run_with_cancel(instance, &config.bnb, cancel),
    }
}
