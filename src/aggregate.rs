//! Per-department aggregation for the dashboard table.
//!
//! A `Summary` holds one `DepartmentRow` for each department found in a (usually filtered)
//! dataset, plus the grand `Totals`. `Summary::view` applies the table's search box and sort
//! order.

use crate::model::{Amount, FinancialDataset, Margin};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One line of the dashboard table.
///
/// `margin` is the department's stored margin, looked up rather than recomputed from `revenue`
/// and `expenses`, so it reflects the whole dataset even when the totals are filtered.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DepartmentRow {
    pub department: String,
    pub revenue: Amount,
    pub expenses: Amount,
    pub profit: Amount,
    pub margin: Margin,
}

/// Grand totals across every row of a `Summary`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Totals {
    pub revenue: Amount,
    pub expenses: Amount,
    pub profit: Amount,
}

impl Totals {
    /// Overall profit divided by overall revenue. `None` when there is no revenue.
    pub fn margin(&self) -> Option<Margin> {
        Margin::checked_from_totals(self.revenue, self.expenses)
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    rows: Vec<DepartmentRow>,
    totals: Totals,
}

impl Summary {
    /// Builds one row per department in the union of departments across revenue, expenses and
    /// margins, in first-seen order.
    ///
    /// Sums saturate at the bounds of `Amount`. Datasets only grown through
    /// `add_financial_data` never reach them.
    pub fn from_dataset(dataset: &FinancialDataset) -> Self {
        let rows: Vec<DepartmentRow> = dataset
            .departments()
            .into_iter()
            .map(|department| {
                let revenue: Amount = dataset
                    .revenue
                    .iter()
                    .filter(|r| r.department == department)
                    .map(|r| r.amount)
                    .sum();
                let expenses: Amount = dataset
                    .expenses
                    .iter()
                    .filter(|e| e.department == department)
                    .map(|e| e.amount)
                    .sum();
                DepartmentRow {
                    department: department.to_string(),
                    revenue,
                    expenses,
                    profit: revenue - expenses,
                    margin: dataset.margin_of(department).unwrap_or_default(),
                }
            })
            .collect();

        let totals = rows.iter().fold(Totals::default(), |mut acc, row| {
            acc.revenue += row.revenue;
            acc.expenses += row.expenses;
            acc.profit += row.profit;
            acc
        });

        Self { rows, totals }
    }

    /// All rows in first-seen order.
    pub fn rows(&self) -> &[DepartmentRow] {
        &self.rows
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Returns the rows matching `query.search`, sorted per `query`. The totals are not affected
    /// by the search.
    pub fn view(&self, query: &TableQuery) -> Vec<DepartmentRow> {
        let needle = query.search.to_lowercase();
        let mut rows: Vec<DepartmentRow> = self
            .rows
            .iter()
            .filter(|row| needle.is_empty() || row.department.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        // sort_by is stable, ties keep first-seen order in both directions
        rows.sort_by(|a, b| match query.direction {
            SortDirection::Asc => query.sort_field.compare(a, b),
            SortDirection::Desc => query.sort_field.compare(b, a),
        });
        rows
    }
}

/// The columns the table can be sorted by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Department,
    Revenue,
    Expenses,
    Profit,
    Margin,
}

serde_plain::derive_display_from_serialize!(SortField);
serde_plain::derive_fromstr_from_deserialize!(SortField);

impl SortField {
    fn compare(&self, a: &DepartmentRow, b: &DepartmentRow) -> Ordering {
        match self {
            SortField::Department => a.department.cmp(&b.department),
            SortField::Revenue => a.revenue.cmp(&b.revenue),
            SortField::Expenses => a.expenses.cmp(&b.expenses),
            SortField::Profit => a.profit.cmp(&b.profit),
            SortField::Margin => a.margin.cmp(&b.margin),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

serde_plain::derive_display_from_serialize!(SortDirection);
serde_plain::derive_fromstr_from_deserialize!(SortDirection);

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The table's search text and sort order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TableQuery {
    /// Case-insensitive substring of the department name. Empty matches every row.
    pub search: String,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl TableQuery {
    pub fn new(search: impl Into<String>, sort_field: SortField, direction: SortDirection) -> Self {
        Self {
            search: search.into(),
            sort_field,
            direction,
        }
    }

    /// Clicking a column header: the same column flips direction, a new column sorts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        if field == self.sort_field {
            self.direction = self.direction.toggled();
        } else {
            self.sort_field = field;
            self.direction = SortDirection::Asc;
        }
    }
}
