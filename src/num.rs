//! Numeric policy for the search.
//!
//! The engine is generic over [`Value`], implemented for `i64` (exact
//! arithmetic on integral instances) and `f64` (fixed-epsilon comparisons
//! on everything else). All tolerance handling lives here so the search
//! and bounding code read the same in both modes.

use std::fmt::Debug;

use crate::instance::Instance;

/// Arithmetic used by the search engine.
///
/// # Contract
///
/// - [`pack`](Value::pack) returns the remaining capacity after adding an
///   item, or `None` if it does not fit. The result is never below `-eps`,
///   and the overshoot is carried forward so that a chain of packs from
///   capacity `C` never exceeds `C + eps` in total weight.
/// - [`partial`](Value::partial) treats a negative `remaining` as zero.
/// - [`exceeds`](Value::exceeds) is a strict "greater than" that treats
///   values within the tolerance as equal.
/// - [`partial`](Value::partial) returns an upper estimate of the profit of
///   the fraction `remaining / weight` of an item. Exact mode floors it,
///   which stays sound because every achievable profit is integral.
pub(crate) trait Value: Copy + PartialOrd + Debug + Send + Sync + 'static {
    const ZERO: Self;

    fn from_f64(v: f64) -> Self;

    fn to_f64(self) -> f64;

    fn plus(self, other: Self) -> Self;

    fn pack(remaining: Self, weight: Self, eps: f64) -> Option<Self>;

    fn exceeds(a: Self, b: Self, eps: f64) -> bool;

    fn partial(profit: Self, weight: Self, remaining: Self) -> Self;
}

impl Value for i64 {
    const ZERO: Self = 0;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i64
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn pack(remaining: Self, weight: Self, _eps: f64) -> Option<Self> {
        (weight <= remaining).then(|| remaining - weight)
    }

    #[inline]
    fn exceeds(a: Self, b: Self, _eps: f64) -> bool {
        a > b
    }

    #[inline]
    fn partial(profit: Self, weight: Self, remaining: Self) -> Self {
        if weight <= 0 {
            return profit;
        }
        ((remaining as i128 * profit as i128) / weight as i128) as i64
    }
}

impl Value for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn pack(remaining: Self, weight: Self, eps: f64) -> Option<Self> {
        (weight <= remaining + eps).then(|| remaining - weight)
    }

    #[inline]
    fn exceeds(a: Self, b: Self, eps: f64) -> bool {
        a > b + eps
    }

    #[inline]
    fn partial(profit: Self, weight: Self, remaining: Self) -> Self {
        if weight <= 0.0 {
            return profit;
        }
        remaining.max(0.0) * profit / weight
    }
}

/// Item data in ratio order, converted to the search arithmetic.
#[derive(Debug, Clone)]
pub(crate) struct SortedTable<V> {
    pub capacity: V,
    pub profits: Vec<V>,
    pub weights: Vec<V>,
    /// 1-based original index of each sorted position.
    pub original: Vec<usize>,
}

impl<V: Value> SortedTable<V> {
    pub fn new(instance: &Instance) -> Self {
        let n = instance.item_count();
        let mut profits = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        let mut original = Vec::with_capacity(n);
        for item in instance.sorted_items() {
            profits.push(V::from_f64(item.profit()));
            weights.push(V::from_f64(item.weight()));
            original.push(item.index());
        }
        Self {
            capacity: V::from_f64(instance.capacity()),
            profits,
            weights,
            original,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pack() {
        assert_eq!(<i64 as Value>::pack(10, 10, 0.0), Some(0));
        assert_eq!(<i64 as Value>::pack(10, 11, 0.0), None);
    }

    #[test]
    fn test_tolerant_pack_absorbs_rounding() {
        let weight = 0.1 + 0.2; // 0.30000000000000004
        let left = <f64 as Value>::pack(0.3, weight, 1e-9).unwrap();
        assert!(left <= 0.0 && left >= -1e-9);
        assert_eq!(<f64 as Value>::pack(0.3, 0.31, 1e-9), None);
    }

    #[test]
    fn test_tolerant_pack_overshoot_does_not_accumulate() {
        let mut remaining = 0.0_f64;
        let mut packed = 0;
        while let Some(left) = <f64 as Value>::pack(remaining, 4e-10, 1e-9) {
            remaining = left;
            packed += 1;
            assert!(packed < 10, "packing never stops");
        }
        assert_eq!(packed, 2);
        assert!(remaining >= -1e-9);
    }

    #[test]
    fn test_partial_with_negative_remaining() {
        assert_eq!(<f64 as Value>::partial(10.0, 2.0, -1e-10), 0.0);
    }

    #[test]
    fn test_exceeds_is_strict() {
        assert!(!<f64 as Value>::exceeds(1.0 + 1e-12, 1.0, 1e-9));
        assert!(<f64 as Value>::exceeds(1.1, 1.0, 1e-9));
        assert!(!<i64 as Value>::exceeds(5, 5, 0.0));
        assert!(<i64 as Value>::exceeds(6, 5, 0.0));
    }

    #[test]
    fn test_exact_partial_floors() {
        // 7 * 10 / 3 = 23.33..
        assert_eq!(<i64 as Value>::partial(10, 3, 7), 23);
        assert!((<f64 as Value>::partial(10.0, 3.0, 7.0) - 70.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_partial_no_overflow() {
        let big = 1_i64 << 52;
        assert_eq!(<i64 as Value>::partial(big, big, big - 1), big - 1);
    }

    #[test]
    fn test_sorted_table_order() {
        let inst = Instance::new(10.0, vec![(1.0, 1.0), (6.0, 2.0), (4.0, 2.0)]).unwrap();
        let table = SortedTable::<i64>::new(&inst);
        assert_eq!(table.original, vec![2, 3, 1]);
        assert_eq!(table.profits, vec![6, 4, 1]);
        assert_eq!(table.capacity, 10);
        assert_eq!(table.len(), 3);
    }
}
