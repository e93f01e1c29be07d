//! Branch-and-bound configuration.

use std::time::Duration;

/// Arithmetic used during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericPolicy {
    /// Exact `i64` arithmetic when the instance is integral, tolerant
    /// `f64` arithmetic otherwise.
    #[default]
    Auto,
    /// Always exact. Non-integral instances are rejected.
    Exact,
    /// Always `f64` with the configured epsilon.
    Tolerant,
}

/// Configuration for [`BnbRunner`](super::BnbRunner).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_knapsack::bnb::BnbConfig;
///
/// let config = BnbConfig::default()
///     .with_node_limit(1_000_000)
///     .with_time_limit(Duration::from_secs(5));
/// assert_eq!(config.node_limit, 1_000_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BnbConfig {
    /// Tolerance for weight and profit comparisons in `f64` mode.
    pub epsilon: f64,

    /// Exact or tolerant arithmetic.
    pub numeric: NumericPolicy,

    /// Maximum number of search nodes to expand. 0 = no limit.
    pub node_limit: u64,

    /// Wall-clock budget for one search.
    pub time_limit: Option<Duration>,

    /// Instances with more items are rejected with
    /// [`KnapsackError::ResourceExhausted`](crate::KnapsackError::ResourceExhausted).
    pub max_items: usize,

    /// Whether to search frontier subtrees in parallel using rayon.
    ///
    /// Requires the `parallel` feature; without it the search runs
    /// sequentially and a warning is logged.
    pub parallel: bool,

    /// Depth at which the tree is split into parallel subtrees
    /// (at most `2^split_depth` subtrees).
    pub split_depth: usize,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            numeric: NumericPolicy::Auto,
            node_limit: 0,
            time_limit: None,
            max_items: 1_000_000,
            parallel: false,
            split_depth: 8,
        }
    }
}

impl BnbConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_numeric(mut self, policy: NumericPolicy) -> Self {
        self.numeric = policy;
        self
    }

    pub fn with_node_limit(mut self, n: u64) -> Self {
        self.node_limit = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_split_depth(mut self, depth: usize) -> Self {
        self.split_depth = depth;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            ));
        }
        if self.max_items == 0 {
            return Err("max_items must be positive".into());
        }
        if matches!(self.time_limit, Some(d) if d.is_zero()) {
            return Err("time_limit must be positive when set".into());
        }
        if self.split_depth > 20 {
            return Err(format!(
                "split_depth must be at most 20, got {}",
                self.split_depth
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BnbConfig::default();
        assert!((config.epsilon - 1e-9).abs() < 1e-20);
        assert_eq!(config.numeric, NumericPolicy::Auto);
        assert_eq!(config.node_limit, 0);
        assert!(config.time_limit.is_none());
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BnbConfig::default()
            .with_epsilon(1e-6)
            .with_numeric(NumericPolicy::Tolerant)
            .with_node_limit(10)
            .with_time_limit(Duration::from_millis(250))
            .with_max_items(64)
            .with_parallel(true)
            .with_split_depth(4);
        assert_eq!(config.numeric, NumericPolicy::Tolerant);
        assert_eq!(config.node_limit, 10);
        assert_eq!(config.time_limit, Some(Duration::from_millis(250)));
        assert_eq!(config.max_items, 64);
        assert!(config.parallel);
        assert_eq!(config.split_depth, 4);
    }

    #[test]
    fn test_validate_bad_epsilon() {
        assert!(BnbConfig::default().with_epsilon(-1.0).validate().is_err());
        assert!(BnbConfig::default().with_epsilon(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = BnbConfig::default().with_time_limit(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_split_depth() {
        assert!(BnbConfig::default().with_split_depth(21).validate().is_err());
    }

    #[test]
    fn test_validate_max_items() {
        assert!(BnbConfig::default().with_max_items(0).validate().is_err());
    }
}
