//! The filter pipeline: narrow a `FinancialDataset` by date range, then by department.
//!
//! Every function here is pure. The input dataset is never modified and an empty result is a
//! valid result.

use crate::model::{FinancialDataset, ALL_DEPARTMENTS};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Inclusive bounds on the `YYYY-MM` month of revenue entries. Bounds are compared as strings,
/// which orders correctly because the format is zero-padded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DateRangeFilter {
    pub start: String,
    pub end: String,
}

impl DateRangeFilter {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The window from `months` months before `today`'s month through `today`'s month.
    pub fn trailing(today: NaiveDate, months: u32) -> Self {
        let start = today
            .with_day(1)
            .and_then(|first| first.checked_sub_months(Months::new(months)))
            .unwrap_or(today);
        Self::new(year_month(start), year_month(today))
    }

    /// The smallest range that contains every revenue month in `dataset`. `None` when the dataset
    /// has no revenue.
    pub fn span(dataset: &FinancialDataset) -> Option<Self> {
        dataset
            .month_span()
            .map(|(start, end)| Self::new(start, end))
    }

    /// If `start` is after `end`, moves `end` up to `start`.
    pub fn normalized(self) -> Self {
        if self.start > self.end {
            Self {
                end: self.start.clone(),
                start: self.start,
            }
        } else {
            self
        }
    }

    pub fn contains(&self, month: &str) -> bool {
        self.start.as_str() <= month && month <= self.end.as_str()
    }
}

/// Selects a single department, or every department when set to `"All"`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DepartmentFilter {
    pub department: String,
}

impl DepartmentFilter {
    pub fn new(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
        }
    }

    pub fn all() -> Self {
        Self::new(ALL_DEPARTMENTS)
    }

    pub fn is_all(&self) -> bool {
        self.department == ALL_DEPARTMENTS
    }
}

impl Default for DepartmentFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// The filters currently applied to the dashboard.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Filters {
    pub date_range: DateRangeFilter,
    pub department: DepartmentFilter,
}

impl Filters {
    pub fn new(date_range: DateRangeFilter, department: DepartmentFilter) -> Self {
        Self {
            date_range,
            department,
        }
    }

    /// Applies the date range and then the department filter.
    pub fn apply(&self, dataset: &FinancialDataset) -> FinancialDataset {
        let by_date = filter_by_date_range(dataset, &self.date_range);
        filter_by_department(&by_date, &self.department)
    }
}

/// Keeps the revenue entries whose month lies within `filter`. Expenses and margins have no date
/// and pass through unchanged.
///
/// No correction is made when `start > end`; the result is simply empty.
pub fn filter_by_date_range(
    dataset: &FinancialDataset,
    filter: &DateRangeFilter,
) -> FinancialDataset {
    trace!("Filtering revenue to {}..={}", filter.start, filter.end);
    FinancialDataset {
        revenue: dataset
            .revenue
            .iter()
            .filter(|r| filter.contains(&r.month))
            .cloned()
            .collect(),
        expenses: dataset.expenses.clone(),
        profit_margins: dataset.profit_margins.clone(),
    }
}

/// Keeps the entries in all three collections that belong to the filter's department. Returns
/// the dataset unchanged for `"All"`.
pub fn filter_by_department(
    dataset: &FinancialDataset,
    filter: &DepartmentFilter,
) -> FinancialDataset {
    if filter.is_all() {
        return dataset.clone();
    }
    let department = filter.department.as_str();
    trace!("Filtering to department {department}");
    FinancialDataset {
        revenue: dataset
            .revenue
            .iter()
            .filter(|r| r.department == department)
            .cloned()
            .collect(),
        expenses: dataset
            .expenses
            .iter()
            .filter(|e| e.department == department)
            .cloned()
            .collect(),
        profit_margins: dataset
            .profit_margins
            .iter()
            .filter(|m| m.department == department)
            .cloned()
            .collect(),
    }
}

/// Formats the month of `date` as `YYYY-MM`.
pub fn year_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Returns true for zero-padded `YYYY-MM` strings naming a real month.
pub fn is_year_month(s: &str) -> bool {
    s.len() == 7 && NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").is_ok()
}
