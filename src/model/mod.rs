//! Types that represent the core data model, such as `RevenueEntry` and `FinancialDataset`.
mod amount;
mod dataset;
mod margin;

pub use amount::{Amount, AmountError};
pub use dataset::{ExpenseEntry, FinancialDataset, ProfitMarginEntry, RevenueEntry};
pub use margin::Margin;

/// The department filter value that disables department filtering.
pub const ALL_DEPARTMENTS: &str = "All";

/// The departments a new data point may be recorded against.
pub const DEPARTMENTS: &[&str] = &["Sales", "Marketing", "HR", "IT", "Operations"];

/// The expense categories offered when recording a new data point.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Salaries",
    "Rent",
    "Utilities",
    "Marketing",
    "Advertising",
    "Training",
    "Equipment",
    "Travel",
    "Other",
];
