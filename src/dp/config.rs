//! DP configuration.

/// Configuration for [`DpRunner`](super::DpRunner).
///
/// # Examples
///
/// ```
/// use u_knapsack::dp::DpConfig;
///
/// let config = DpConfig::default().with_max_cells(1 << 20);
/// assert_eq!(config.max_cells, 1 << 20);
/// ```
#[derive(Debug, Clone)]
pub struct DpConfig {
    /// Largest table, in `(items + 1) * (capacity + 1)` cells, the DP may
    /// allocate. One bit is kept per cell for reconstruction.
    pub max_cells: usize,
}

impl Default for DpConfig {
    fn default() -> Self {
        Self {
            max_cells: 1 << 24,
        }
    }
}

impl DpConfig {
    pub fn with_max_cells(mut self, cells: usize) -> Self {
        self.max_cells = cells;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cells == 0 {
            return Err("max_cells must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(DpConfig::default().max_cells, 1 << 24);
        assert!(DpConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_cells() {
        assert!(DpConfig::default().with_max_cells(0).validate().is_err());
    }
}
