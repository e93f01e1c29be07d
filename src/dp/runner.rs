//! Table dynamic programming.
//!
//! # Algorithm
//!
//! `best[c]` holds the best profit of the items processed so far with
//! weight at most `c`. Items are processed in ratio order; for each item the
//! row is updated from high to low capacity and a bit records whether
//! taking the item strictly improved `best[c]`. The selection is rebuilt by
//! walking the bits backwards from the full capacity.
//!
//! Time `O(n * C)`, memory `C` profits plus `n * C` bits, where `C` is the
//! capacity clipped to the total weight.
//!
//! # Reference
//!
//! Bellman, R. (1957). "Dynamic Programming", Princeton University Press.

use std::time::Instant;

use log::debug;

use super::config::DpConfig;
use crate::error::{KnapsackError, Result};
use crate::instance::Instance;
use crate::solution::{KnapsackSolution, SolveStats, SolveStatus};
use crate::solver::Strategy;

/// Dynamic programming runner for integral instances.
pub struct DpRunner;

impl DpRunner {
    /// Whether the DP can run on this instance within `config`.
    pub fn applicable(instance: &Instance, config: &DpConfig) -> bool {
        instance.is_integral() && table_cells(instance).is_some_and(|c| c <= config.max_cells)
    }

    /// Solves an integral instance exactly.
    ///
    /// # Errors
    ///
    /// - [`KnapsackError::InfeasibleInput`] if the instance is not integral.
    /// - [`KnapsackError::ResourceExhausted`] if the table would exceed
    ///   `config.max_cells`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_knapsack::Instance;
    /// use u_knapsack::dp::{DpConfig, DpRunner};
    ///
    /// let inst = Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap();
    /// let solution = DpRunner::run(&inst, &DpConfig::default()).unwrap();
    /// assert_eq!(solution.profit, 220.0);
    /// ```
    pub fn run(instance: &Instance, config: &DpConfig) -> Result<KnapsackSolution> {
        config.validate().map_err(KnapsackError::InvalidConfig)?;
        if !instance.is_integral() {
            return Err(KnapsackError::InfeasibleInput(
                "dynamic programming requires whole-number values below 2^53".into(),
            ));
        }
        let cells = table_cells(instance).unwrap_or(usize::MAX);
        if cells > config.max_cells {
            return Err(KnapsackError::ResourceExhausted(format!(
                "dp table of {cells} cells exceeds the limit of {}",
                config.max_cells
            )));
        }

        let started = Instant::now();
        let cap = clipped_capacity(instance);
        let n = instance.item_count();
        let row = cap + 1;
        debug!("dynamic programming: {n} items, {row} capacity columns");

        let order = instance.ratio_order();
        let items = instance.items();
        let mut best = vec![0_i64; row];
        let mut keep = BitTable::new(n * row);
        let mut stats = SolveStats::default();

        for (k, &pos) in order.iter().enumerate() {
            stats.on_node_explored(k + 1);
            let w = items[pos].weight() as usize;
            let p = items[pos].profit() as i64;
            if w > cap {
                stats.on_pruning_infeasible();
                continue;
            }
            for c in (w..=cap).rev() {
                let candidate = best[c - w] + p;
                if candidate > best[c] {
                    best[c] = candidate;
                    keep.set(k * row + c);
                }
            }
        }

        let mut selected = Vec::new();
        let mut c = cap;
        for k in (0..n).rev() {
            if keep.get(k * row + c) {
                let pos = order[k];
                selected.push(items[pos].index());
                c -= items[pos].weight() as usize;
            }
        }
        selected.sort_unstable();
        stats.elapsed = started.elapsed();

        Ok(KnapsackSolution {
            profit: instance.profit_of(&selected),
            total_weight: instance.weight_of(&selected),
            selected,
            status: SolveStatus::Optimal,
            strategy: Strategy::DynamicProgramming,
            stats,
        })
    }
}

/// Capacity clipped to the total weight; larger capacities change nothing.
fn clipped_capacity(instance: &Instance) -> usize {
    instance.capacity().min(instance.total_weight()) as usize
}

fn table_cells(instance: &Instance) -> Option<usize> {
    let row = clipped_capacity(instance).checked_add(1)?;
    instance.item_count().checked_add(1)?.checked_mul(row)
}

/// Flat bit matrix.
struct BitTable {
    words: Vec<u64>,
}

impl BitTable {
    fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    #[inline]
    fn set(&mut self, i: usize) {
        self.words[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    fn get(&self, i: usize) -> bool {
        self.words[i / 64] >> (i % 64) & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(capacity: f64, items: Vec<(f64, f64)>) -> KnapsackSolution {
        let inst = Instance::new(capacity, items).unwrap();
        DpRunner::run(&inst, &DpConfig::default()).unwrap()
    }

    #[test]
    fn test_classic_three_items() {
        let s = run(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]);
        assert_eq!(s.profit, 220.0);
        assert_eq!(s.selected, vec![2, 3]);
        assert_eq!(s.strategy, Strategy::DynamicProgramming);
        assert!(s.is_optimal());
    }

    #[test]
    fn test_textbook_instance() {
        let s = run(10.0, vec![(10.0, 5.0), (40.0, 4.0), (30.0, 6.0), (50.0, 3.0)]);
        assert_eq!(s.profit, 90.0);
        assert_eq!(s.selected, vec![2, 4]);
    }

    #[test]
    fn test_nothing_fits() {
        let s = run(5.0, vec![(10.0, 6.0)]);
        assert_eq!(s.profit, 0.0);
        assert!(s.selected.is_empty());
    }

    #[test]
    fn test_empty_and_zero_capacity() {
        assert!(run(10.0, vec![]).selected.is_empty());
        assert!(run(0.0, vec![(10.0, 5.0)]).selected.is_empty());
    }

    #[test]
    fn test_weightless_item() {
        let s = run(0.0, vec![(10.0, 5.0), (3.0, 0.0)]);
        assert_eq!(s.profit, 3.0);
        assert_eq!(s.selected, vec![2]);
    }

    #[test]
    fn test_capacity_clipped_to_total_weight() {
        let inst = Instance::new(1e12, vec![(5.0, 2.0), (7.0, 3.0)]).unwrap();
        assert!(DpRunner::applicable(&inst, &DpConfig::default()));
        let s = DpRunner::run(&inst, &DpConfig::default()).unwrap();
        assert_eq!(s.selected, vec![1, 2]);
    }

    #[test]
    fn test_rejects_real_values() {
        let inst = Instance::new(2.5, vec![(1.0, 1.0)]).unwrap();
        let err = DpRunner::run(&inst, &DpConfig::default()).unwrap_err();
        assert!(matches!(err, KnapsackError::InfeasibleInput(_)));
        assert!(!DpRunner::applicable(&inst, &DpConfig::default()));
    }

    #[test]
    fn test_rejects_large_table() {
        let inst = Instance::new(1000.0, vec![(1.0, 600.0), (1.0, 600.0)]).unwrap();
        let config = DpConfig::default().with_max_cells(100);
        let err = DpRunner::run(&inst, &config).unwrap_err();
        assert!(matches!(err, KnapsackError::ResourceExhausted(_)));
    }

    #[test]
    fn test_bit_table() {
        let mut bits = BitTable::new(130);
        bits.set(0);
        bits.set(64);
        bits.set(129);
        assert!(bits.get(0) && bits.get(64) && bits.get(129));
        assert!(!bits.get(1) && !bits.get(128));
    }
}
