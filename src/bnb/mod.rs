//! Branch-and-bound (BnB).
//!
//! Exact depth-first search over the include/exclude decision tree with
//! fractional relaxation bounds. Items are decided in profit/weight ratio
//! order and the include branch is explored first, which finds good
//! incumbents early and makes the bound prune most of the tree.
//!
//! # Key Components
//!
//! - [`BnbConfig`]: arithmetic policy, node/time limits, parallel split
//! - [`BnbRunner`]: runs the search and returns a
//!   [`KnapsackSolution`](crate::KnapsackSolution)
//!
//! With the `parallel` feature, [`BnbConfig::parallel`] splits the tree into
//! subtrees searched on the rayon thread pool with a shared incumbent.
//!
//! # References
//!
//! - Horowitz, E. & Sahni, S. (1974). "Computing partitions with
//!   applications to the knapsack problem", *JACM* 21(2), 277-292.
//! - Kellerer, Pferschy & Pisinger (2004), "Knapsack Problems", ch. 5.

mod budget;
mod config;
mod incumbent;
#[cfg(feature = "parallel")]
mod parallel;
mod runner;
mod state;

pub use config::{BnbConfig, NumericPolicy};
pub use runner::BnbRunner;
