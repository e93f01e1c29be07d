//! Dynamic programming (DP) over integer capacities.
//!
//! An alternative exact strategy for instances whose values are whole
//! numbers and whose capacity is small enough for an `n * C` table. It
//! never stops early; the table size is bounded by [`DpConfig::max_cells`]
//! instead of node or time limits.
//!
//! On profit ties the DP may return a different optimal selection than
//! [`BnbRunner`](crate::bnb::BnbRunner); the total profit is the same.

mod config;
mod runner;

pub use config::DpConfig;
pub use runner::DpRunner;
