//! Human-readable projection of a solution.

use std::fmt;

use crate::solution::KnapsackSolution;

/// Printable summary of a solve: the profit and the selected item indices.
///
/// # Examples
///
/// ```
/// use u_knapsack::Report;
///
/// let report = Report::format(220.0, vec![3, 2]);
/// assert_eq!(report.total_profit_display, "220");
/// assert_eq!(report.selected_items, vec![2, 3]);
/// assert_eq!(report.to_string(), "Total profit: 220\nSelected items: [2, 3]");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub total_profit: f64,
    /// Profit rounded to 5 decimals without trailing zeros.
    pub total_profit_display: String,
    /// 1-based item indices, ascending.
    pub selected_items: Vec<usize>,
    /// Whether the solver proved the selection optimal.
    pub optimal: bool,
}

impl Report {
    /// Builds a report from a raw profit and selection; `optimal` is set.
    pub fn format(best_profit: f64, mut selected: Vec<usize>) -> Self {
        selected.sort_unstable();
        Self {
            total_profit: best_profit,
            total_profit_display: format_profit(best_profit),
            selected_items: selected,
            optimal: true,
        }
    }
}

impl From<&KnapsackSolution> for Report {
    fn from(solution: &KnapsackSolution) -> Self {
        Self {
            optimal: solution.is_optimal(),
            ..Self::format(solution.profit, solution.selected.clone())
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total profit: {}", self.total_profit_display)?;
        write!(f, "Selected items: {:?}", self.selected_items)
    }
}

/// `{:.5}` with trailing zeros and a trailing point removed.
pub(crate) fn format_profit(value: f64) -> String {
    let text = format!("{value:.5}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        t => t.to_string(),
    }
}
