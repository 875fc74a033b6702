use crate::model::{Amount, Margin};
use serde::{Deserialize, Serialize};

/// A month of revenue for one department. `month` is a zero-padded `YYYY-MM` string.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RevenueEntry {
    pub month: String,
    pub amount: Amount,
    pub department: String,
}

impl RevenueEntry {
    pub fn new(
        month: impl Into<String>,
        amount: impl Into<Amount>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            month: month.into(),
            amount: amount.into(),
            department: department.into(),
        }
    }
}

/// Spending in one category for one department. Expense entries carry no date.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseEntry {
    pub category: String,
    pub amount: Amount,
    pub department: String,
}

impl ExpenseEntry {
    pub fn new(
        category: impl Into<String>,
        amount: impl Into<Amount>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
            department: department.into(),
        }
    }
}

/// The stored profit margin of a department.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfitMarginEntry {
    pub department: String,
    pub margin: Margin,
}

impl ProfitMarginEntry {
    pub fn new(department: impl Into<String>, margin: impl Into<Margin>) -> Self {
        Self {
            department: department.into(),
            margin: margin.into(),
        }
    }
}

/// The three parallel collections that make up the dashboard's data.
///
/// Filters and the aggregator never modify a `FinancialDataset`; they produce new ones. The
/// mutation operator also returns a new value, leaving the original intact for callers that still
/// hold it.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FinancialDataset {
    pub revenue: Vec<RevenueEntry>,
    pub expenses: Vec<ExpenseEntry>,
    pub profit_margins: Vec<ProfitMarginEntry>,
}

impl FinancialDataset {
    pub fn new(
        revenue: Vec<RevenueEntry>,
        expenses: Vec<ExpenseEntry>,
        profit_margins: Vec<ProfitMarginEntry>,
    ) -> Self {
        Self {
            revenue,
            expenses,
            profit_margins,
        }
    }

    /// The earliest and latest months present in the revenue entries.
    pub fn month_span(&self) -> Option<(&str, &str)> {
        let min = self.revenue.iter().map(|r| r.month.as_str()).min()?;
        let max = self.revenue.iter().map(|r| r.month.as_str()).max()?;
        Some((min, max))
    }

    /// Every department named in any of the three collections, in first-seen order: revenue,
    /// then expenses, then margins.
    pub fn departments(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let all = self
            .revenue
            .iter()
            .map(|r| r.department.as_str())
            .chain(self.expenses.iter().map(|e| e.department.as_str()))
            .chain(self.profit_margins.iter().map(|m| m.department.as_str()));
        for department in all {
            if !seen.contains(&department) {
                seen.push(department);
            }
        }
        seen
    }

    /// The sum of revenue recorded for `department`. `None` when it does not fit in an `Amount`.
    pub fn department_revenue(&self, department: &str) -> Option<Amount> {
        Amount::checked_sum(
            self.revenue
                .iter()
                .filter(|r| r.department == department)
                .map(|r| r.amount),
        )
    }

    /// The sum of expenses recorded for `department`. `None` when it does not fit in an `Amount`.
    pub fn department_expenses(&self, department: &str) -> Option<Amount> {
        Amount::checked_sum(
            self.expenses
                .iter()
                .filter(|e| e.department == department)
                .map(|e| e.amount),
        )
    }

    /// The stored margin for `department`, if there is one.
    pub fn margin_of(&self, department: &str) -> Option<Margin> {
        self.profit_margins
            .iter()
            .find(|m| m.department == department)
            .map(|m| m.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dataset() -> FinancialDataset {
        FinancialDataset::new(
            vec![
                RevenueEntry::new("2023-02", 10, "Sales"),
                RevenueEntry::new("2023-01", 20, "HR"),
                RevenueEntry::new("2023-03", 5, "Sales"),
            ],
            vec![
                ExpenseEntry::new("Rent", 3, "Sales"),
                ExpenseEntry::new("Rent", 4, "Legal"),
            ],
            vec![ProfitMarginEntry::new("IT", Margin::ZERO)],
        )
    }

    #[test]
    fn test_month_span() {
        assert_eq!(dataset().month_span(), Some(("2023-01", "2023-03")));
        assert_eq!(FinancialDataset::default().month_span(), None);
    }

    #[test]
    fn test_departments_in_first_seen_order() {
        assert_eq!(dataset().departments(), vec!["Sales", "HR", "Legal", "IT"]);
    }

    #[test]
    fn test_department_totals() {
        let d = dataset();
        assert_eq!(d.department_revenue("Sales"), Some(Amount::from(15)));
        assert_eq!(d.department_expenses("Sales"), Some(Amount::from(3)));
        assert_eq!(d.department_revenue("Nobody"), Some(Amount::ZERO));
        assert_eq!(d.margin_of("IT"), Some(Margin::ZERO));
        assert_eq!(d.margin_of("Sales"), None);
    }

    #[test]
    fn test_department_total_overflow_is_none() {
        let d = FinancialDataset::new(
            vec![
                RevenueEntry::new("2023-01", Amount::new(Decimal::MAX), "Sales"),
                RevenueEntry::new("2023-02", 1, "Sales"),
            ],
            vec![ExpenseEntry::new("Rent", Amount::new(Decimal::MAX), "HR")],
            Vec::new(),
        );
        assert_eq!(d.department_revenue("Sales"), None);
        assert_eq!(
            d.department_expenses("HR"),
            Some(Amount::new(Decimal::MAX))
        );
    }
}
