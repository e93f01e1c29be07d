//! Exact 0/1 knapsack solver.
//!
//! Given a capacity and items with a profit and a weight each, selects the
//! subset of maximum total profit whose total weight fits the capacity.
//!
//! - **Branch-and-bound (BnB)**: depth-first search in profit/weight ratio
//!   order with fractional relaxation bounds, exact `i64` arithmetic on
//!   integral instances, node and time limits, and an optional rayon
//!   subtree split (`parallel` feature).
//! - **Dynamic programming (DP)**: table DP over integer capacities for
//!   small integral instances.
//! - **Driver**: loads instance files, solves them in batch, and reports the
//!   profit, the selected items, and the elapsed time.
//!
//! # Example
//!
//! ```
//! use u_knapsack::{solve, Instance, Report};
//!
//! let instance: Instance = "3 50\n60 10\n100 20\n120 30\n".parse().unwrap();
//! let solution = solve(&instance).unwrap();
//! assert_eq!(solution.selected, vec![2, 3]);
//! assert_eq!(
//!     Report::from(&solution).to_string(),
//!     "Total profit: 220\nSelected items: [2, 3]"
//! );
//! ```
//!
//! # Architecture
//!
//! The instance model and the bounding function are shared by both
//! strategies; [`solve_with`] picks one according to [`SolverConfig`]. The
//! library reports through the `log` facade and never installs a logger.

pub mod bnb;
mod bound;
pub mod dp;
pub mod driver;
mod error;
pub mod instance;
mod num;
mod report;
mod solution;
mod solver;

pub use bound::fractional_bound;
pub use error::{KnapsackError, Result};
pub use instance::{Instance, InstanceGenerator, Item};
pub use report::Report;
pub use solution::{KnapsackSolution, SolveStats, SolveStatus};
pub use solver::{solve, solve_with, solve_with_cancel, SolverConfig, Strategy};
