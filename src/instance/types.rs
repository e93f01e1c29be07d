//! Items and instances.

use crate::error::{KnapsackError, Result};

/// Largest magnitude at which every whole `f64` is exactly representable.
pub(crate) const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

/// A knapsack item.
///
/// `index` is the 1-based position of the item in the source instance and is
/// what every solution reports, regardless of the internal search order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    index: usize,
    profit: f64,
    weight: f64,
}

impl Item {
    /// 1-based original index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Profit per unit of weight.
    ///
    /// Weightless items with positive profit rank above everything else
    /// (`+inf`); weightless items without profit get ratio 0.
    pub fn ratio(&self) -> f64 {
        if self.weight > 0.0 {
            self.profit / self.weight
        } else if self.profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

/// An immutable 0/1 knapsack instance.
///
/// Items keep their original order; [`ratio_order`](Self::ratio_order)
/// holds the positions sorted by profit/weight ratio (descending, ties by
/// original index ascending), computed once at construction.
///
/// # Examples
///
/// ```
/// use u_knapsack::Instance;
///
/// let instance = Instance::new(50.0, vec![(60.0, 10.0), (100.0, 20.0), (120.0, 30.0)]).unwrap();
/// assert_eq!(instance.item_count(), 3);
/// assert_eq!(instance.item(2).unwrap().profit(), 100.0);
/// assert!(instance.is_integral());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    capacity: f64,
    items: Vec<Item>,
    order: Vec<usize>,
    integral: bool,
}

impl Instance {
    /// Builds an instance from a capacity and `(profit, weight)` pairs.
    ///
    /// # Errors
    ///
    /// - [`KnapsackError::Format`] if any value is NaN or infinite.
    /// - [`KnapsackError::InfeasibleInput`] if the capacity, a profit, or a
    ///   weight is negative.
    pub fn new(capacity: f64, items: Vec<(f64, f64)>) -> Result<Self> {
        if !capacity.is_finite() {
            return Err(KnapsackError::format(0, format!("capacity {capacity} is not finite")));
        }
        if capacity < 0.0 {
            return Err(KnapsackError::InfeasibleInput(format!(
                "capacity must be non-negative, got {capacity}"
            )));
        }

        let mut built = Vec::with_capacity(items.len());
        for (i, (profit, weight)) in items.into_iter().enumerate() {
            let index = i + 1;
            if !profit.is_finite() || !weight.is_finite() {
                return Err(KnapsackError::format(
                    0,
                    format!("item {index} has a non-finite value ({profit}, {weight})"),
                ));
            }
            if profit < 0.0 {
                return Err(KnapsackError::InfeasibleInput(format!(
                    "item {index} has negative profit {profit}"
                )));
            }
            if weight < 0.0 {
                return Err(KnapsackError::InfeasibleInput(format!(
                    "item {index} has negative weight {weight}"
                )));
            }
            built.push(Item {
                index,
                profit,
                weight,
            });
        }

        let mut order: Vec<usize> = (0..built.len()).collect();
        order.sort_by(|&a, &b| {
            built[b]
                .ratio()
                .total_cmp(&built[a].ratio())
                .then(a.cmp(&b))
        });

        let integral = is_whole(capacity)
            && built.iter().all(|it| is_whole(it.profit) && is_whole(it.weight))
            && built.iter().map(|it| it.profit).sum::<f64>() <= MAX_EXACT
            && built.iter().map(|it| it.weight).sum::<f64>() <= MAX_EXACT;

        Ok(Self {
            capacity,
            items: built,
            order,
            integral,
        })
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Item by 1-based original index.
    pub fn item(&self, index: usize) -> Option<&Item> {
        index.checked_sub(1).and_then(|i| self.items.get(i))
    }

    /// Items in original order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// 0-based positions into [`items`](Self::items), best ratio first.
    pub fn ratio_order(&self) -> &[usize] {
        &self.order
    }

    /// Items in ratio order.
    pub fn sorted_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.order.iter().map(move |&p| &self.items[p])
    }

    /// Whether every value is a whole number small enough for exact `i64`
    /// arithmetic (including all sums).
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(|it| it.weight).sum()
    }

    pub fn total_profit(&self) -> f64 {
        self.items.iter().map(|it| it.profit).sum()
    }

    /// Total weight of a selection given by 1-based indices.
    ///
    /// Unknown indices are ignored.
    pub fn weight_of(&self, selection: &[usize]) -> f64 {
        selection
            .iter()
            .filter_map(|&i| self.item(i))
            .map(|it| it.weight)
            .sum()
    }

    /// Total profit of a selection given by 1-based indices.
    pub fn profit_of(&self, selection: &[usize]) -> f64 {
        selection
            .iter()
            .filter_map(|&i| self.item(i))
            .map(|it| it.profit)
            .sum()
    }
}

fn is_whole(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() <= MAX_EXACT
}
