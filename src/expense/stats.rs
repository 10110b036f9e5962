//! Per-category totals over a user's expenses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{category::Category, expense::core::Expense};

/// The spending in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    /// The category the expenses were filed under.
    pub category: Category,
    /// The sum of the expense amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
}

/// Group `expenses` by category and sum each group.
///
/// Categories without expenses are left out. The result follows the
/// declaration order of [Category].
pub fn aggregate(expenses: &[Expense]) -> Vec<CategoryStat> {
    let mut groups: BTreeMap<Category, (CompensatedSum, usize)> = BTreeMap::new();

    for expense in expenses {
        let (total, count) = groups.entry(expense.category).or_default();
        total.add(expense.amount);
        *count += 1;
    }

    groups
        .into_iter()
        .map(|(category, (total, count))| CategoryStat {
            category,
            total: total.value(),
            count,
        })
        .collect()
}

/// Neumaier summation, so ten expenses of 0.1 add up to 1.0.
#[derive(Debug, Default, Clone, Copy)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, value: f64) {
        let total = self.sum + value;

        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }

        self.sum = total;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}
