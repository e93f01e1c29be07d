//! Fractional relaxation bound.
//!
//! Starting from a partial selection, items are added greedily in ratio
//! order while they fit entirely; the first item that does not fit
//! contributes the fraction of its profit proportional to the remaining
//! capacity. Because the items are already sorted by ratio, this is the
//! optimum of the continuous relaxation (Dantzig, 1957) and therefore never
//! below the best integral completion.
//!
//! # Reference
//!
//! Kellerer, Pferschy & Pisinger (2004), "Knapsack Problems", §2.2.

use crate::instance::Instance;
use crate::num::{SortedTable, Value};

/// Upper bound on the profit reachable from a search state.
///
/// Runs in time linear in `table.len() - depth`.
#[inline]
pub(crate) fn upper_bound<V: Value>(
    table: &SortedTable<V>,
    depth: usize,
    mut remaining: V,
    profit: V,
    eps: f64,
) -> V {
    let mut bound = profit;
    for k in depth..table.len() {
        match V::pack(remaining, table.weights[k], eps) {
            Some(left) => {
                bound = bound.plus(table.profits[k]);
                remaining = left;
            }
            None => {
                bound = bound.plus(V::partial(table.profits[k], table.weights[k], remaining));
                break;
            }
        }
    }
    bound
}

/// Fractional relaxation bound of an [`Instance`] from an arbitrary state.
///
/// `depth` counts the items of [`Instance::ratio_order`] already decided;
/// `remaining` and `profit` describe the partial selection. The result is
/// never smaller than `profit` plus the best profit of any subset of the
/// undecided items that fits in `remaining`.
///
/// # Examples
///
/// ```
/// use u_knapsack::{fractional_bound, Instance};
///
/// let inst = Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap();
/// // 60 + 100 + 20/30 * 120
/// assert_eq!(fractional_bound(&inst, 0, 50.0, 0.0), 240.0);
/// ```
pub fn fractional_bound(instance: &Instance, depth: usize, remaining: f64, profit: f64) -> f64 {
    let table = SortedTable::<f64>::new(instance);
    upper_bound(&table, depth, remaining.max(0.0), profit, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_b() -> Instance {
        Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap()
    }

    #[test]
    fn test_root_bound() {
        let table = SortedTable::<i64>::new(&scenario_b());
        assert_eq!(upper_bound(&table, 0, 50, 0, 0.0), 240);
    }

    #[test]
    fn test_bound_after_exclusion() {
        // item 1 excluded: 100 + 120 fit exactly
        let table = SortedTable::<i64>::new(&scenario_b());
        assert_eq!(upper_bound(&table, 1, 50, 0, 0.0), 220);
    }

    #[test]
    fn test_bound_floors_in_exact_mode() {
        let inst = Instance::new(10.0, vec![(10.0, 3.0), (10.0, 3.0), (10.0, 3.0), (10.0, 3.0)])
            .unwrap();
        let exact = SortedTable::<i64>::new(&inst);
        let tolerant = SortedTable::<f64>::new(&inst);
        assert_eq!(upper_bound(&exact, 0, 10, 0, 0.0), 33);
        let b = upper_bound(&tolerant, 0, 10.0, 0.0, 0.0);
        assert!((b - (30.0 + 10.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_bound_at_leaf_is_profit() {
        let table = SortedTable::<i64>::new(&scenario_b());
        assert_eq!(upper_bound(&table, 3, 7, 160, 0.0), 160);
    }

    #[test]
    fn test_zero_capacity_bound() {
        let inst = Instance::new(0.0, vec![(10.0, 5.0)]).unwrap();
        assert_eq!(fractional_bound(&inst, 0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_weightless_items_always_count() {
        let inst = Instance::new(0.0, vec![(10.0, 5.0), (3.0, 0.0)]).unwrap();
        assert_eq!(fractional_bound(&inst, 0, 0.0, 0.0), 3.0);
    }
}
