//! Chart-ready series and the headline statistics shown above the dashboard table.

use crate::model::{Amount, ExpenseEntry, FinancialDataset, Margin, ProfitMarginEntry, RevenueEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Revenue per department per month, one value per entry of `months`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RevenueTrend {
    /// Sorted, unique months.
    pub months: Vec<String>,
    pub series: Vec<DepartmentSeries>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DepartmentSeries {
    pub department: String,
    /// Revenue for each month of the trend, zero where the department has no entry.
    pub values: Vec<Amount>,
}

/// Total spending in one category and its share of all spending.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Amount,
    pub share: Margin,
}

/// The headline numbers for the currently filtered data.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryStats {
    pub total_revenue: Amount,
    pub total_expenses: Amount,
    pub total_profit: Amount,
    /// The mean of the dataset's margin entries, zero when there are none.
    pub average_margin: Margin,
}

impl SummaryStats {
    pub fn from_dataset(dataset: &FinancialDataset) -> Self {
        let total_revenue: Amount = dataset.revenue.iter().map(|r| r.amount).sum();
        let total_expenses: Amount = dataset.expenses.iter().map(|e| e.amount).sum();
        let count = dataset.profit_margins.len();
        let average_margin = if count == 0 {
            Margin::ZERO
        } else {
            // Divide first so that large margins cannot overflow the sum.
            let count = Decimal::from(count);
            let mean = dataset
                .profit_margins
                .iter()
                .fold(Decimal::ZERO, |acc, m| acc.saturating_add(m.margin.value() / count));
            Margin::new(mean)
        };
        Self {
            total_revenue,
            total_expenses,
            total_profit: total_revenue - total_expenses,
            average_margin,
        }
    }
}

pub fn revenue_trend(revenue: &[RevenueEntry]) -> RevenueTrend {
    let mut months: Vec<String> = revenue.iter().map(|r| r.month.clone()).collect();
    months.sort();
    months.dedup();

    let mut departments: Vec<&str> = Vec::new();
    for entry in revenue {
        if !departments.contains(&entry.department.as_str()) {
            departments.push(&entry.department);
        }
    }

    let series = departments
        .into_iter()
        .map(|department| DepartmentSeries {
            department: department.to_string(),
            values: months
                .iter()
                .map(|month| {
                    revenue
                        .iter()
                        .filter(|r| r.department == department && &r.month == month)
                        .map(|r| r.amount)
                        .sum()
                })
                .collect(),
        })
        .collect();

    RevenueTrend { months, series }
}

/// Groups expenses by category, in first-seen order.
pub fn expense_breakdown(expenses: &[ExpenseEntry]) -> Vec<CategoryTotal> {
    let mut totals: Vec<(String, Amount)> = Vec::new();
    for entry in expenses {
        match totals.iter_mut().find(|(c, _)| c == &entry.category) {
            Some((_, amount)) => *amount += entry.amount,
            None => totals.push((entry.category.clone(), entry.amount)),
        }
    }

    let grand: Amount = totals.iter().map(|(_, a)| *a).sum();
    totals
        .into_iter()
        .map(|(category, amount)| {
            let share = amount
                .value()
                .checked_div(grand.value())
                .map_or(Margin::ZERO, Margin::new);
            CategoryTotal {
                category,
                amount,
                share,
            }
        })
        .collect()
}

/// Margins from highest to lowest. Ties keep their original order.
pub fn margin_ranking(margins: &[ProfitMarginEntry]) -> Vec<ProfitMarginEntry> {
    let mut ranked = margins.to_vec();
    ranked.sort_by(|a, b| b.margin.cmp(&a.margin));
    ranked
}
