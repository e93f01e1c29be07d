//! Seeded random instance generation for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::Instance;
use crate::error::Result;

/// Generates integral random instances.
///
/// Weights and profits are drawn uniformly from inclusive ranges. The
/// capacity is `capacity_fraction` of the total weight, floored. When
/// `correlation` is set, each profit is its weight plus that offset, which
/// produces the strongly correlated instances that are hardest for
/// ratio-based bounds.
///
/// # Examples
///
/// ```
/// use u_knapsack::InstanceGenerator;
///
/// let instance = InstanceGenerator::new(20).with_seed(7).generate().unwrap();
/// assert_eq!(instance.item_count(), 20);
/// assert!(instance.is_integral());
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    /// Number of items.
    pub num_items: usize,
    /// Inclusive weight range.
    pub weight_range: (u32, u32),
    /// Inclusive profit range (ignored when `correlation` is set).
    pub profit_range: (u32, u32),
    /// Capacity as a fraction of the total weight.
    pub capacity_fraction: f64,
    /// Profit = weight + offset when set.
    pub correlation: Option<u32>,
    /// Random seed.
    pub seed: u64,
}

impl InstanceGenerator {
    pub fn new(num_items: usize) -> Self {
        Self {
            num_items,
            weight_range: (1, 50),
            profit_range: (1, 100),
            capacity_fraction: 0.5,
            correlation: None,
            seed: 42,
        }
    }

    pub fn with_weight_range(mut self, lo: u32, hi: u32) -> Self {
        self.weight_range = (lo.min(hi), lo.max(hi));
        self
    }

    pub fn with_profit_range(mut self, lo: u32, hi: u32) -> Self {
        self.profit_range = (lo.min(hi), lo.max(hi));
        self
    }

    pub fn with_capacity_fraction(mut self, fraction: f64) -> Self {
        self.capacity_fraction = fraction;
        self
    }

    pub fn with_correlation(mut self, offset: u32) -> Self {
        self.correlation = Some(offset);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws an instance.
    pub fn generate(&self) -> Result<Instance> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (wlo, whi) = self.weight_range;
        let (plo, phi) = self.profit_range;

        let items: Vec<(f64, f64)> = (0..self.num_items)
            .map(|_| {
                let weight = rng.random_range(wlo..=whi);
                let profit = match self.correlation {
                    Some(offset) => weight.saturating_add(offset),
                    None => rng.random_range(plo..=phi),
                };
                (profit as f64, weight as f64)
            })
            .collect();

        let total_weight: f64 = items.iter().map(|&(_, w)| w).sum();
        let capacity = (total_weight * self.capacity_fraction.max(0.0)).floor();
        Instance::new(capacity, items)
    }
}
