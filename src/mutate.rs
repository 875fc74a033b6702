//! The mutation operator: record a new revenue amount and expense amount for a department.

use crate::error::{Error, ErrorType, Result};
use crate::model::{Amount, ExpenseEntry, FinancialDataset, Margin, ProfitMarginEntry, RevenueEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use tracing::debug;

const REVENUE_TOO_LARGE: &str = "Revenue is too large";
const EXPENSE_TOO_LARGE: &str = "Expense amount is too large";
const REVENUE_TOO_SMALL: &str = "Revenue is too small for a margin against these expenses";

/// The data submitted to record one month of revenue and one expense for a department.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FinancialInput {
    pub month: String,
    pub department: String,
    pub revenue: Amount,
    pub expense_category: String,
    pub expense_amount: Amount,
}

/// The fields of a `FinancialInput`, used to key validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Month,
    Department,
    Revenue,
    ExpenseCategory,
    ExpenseAmount,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

/// One message per invalid field, so that each can be shown next to its input.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }

    fn single(field: Field, message: &str) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::new(ErrorType::InvalidInput, errors)
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid form data")?;
        for (ix, (field, message)) in self.iter().enumerate() {
            let sep = if ix == 0 { ": " } else { "; " };
            write!(f, "{sep}{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl FinancialInput {
    /// Checks every field and reports all of the problems at once.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.month.is_empty() {
            errors.insert(Field::Month, "Month is required");
        }
        if self.department.is_empty() {
            errors.insert(Field::Department, "Department is required");
        }
        if !self.revenue.is_positive() {
            errors.insert(Field::Revenue, "Revenue must be greater than 0");
        }
        if self.expense_category.is_empty() {
            errors.insert(Field::ExpenseCategory, "Expense category is required");
        }
        if !self.expense_amount.is_positive() {
            errors.insert(Field::ExpenseAmount, "Expense amount must be greater than 0");
        }
        errors
    }

    /// Like `validate` but as an `ErrorType::InvalidInput` error carrying the `FieldErrors`.
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

/// Returns a copy of `dataset` with `input` recorded.
///
/// - The revenue entry for `(month, department)` is increased by `input.revenue`, or appended.
/// - The expense entry for `(expense_category, department)` is increased by
///   `input.expense_amount`, or appended.
/// - The department's margin is recomputed from its updated totals (zero when it has no revenue)
///   and overwritten, or appended.
///
/// # Errors
///
/// Returns an `ErrorType::InvalidInput` error, carrying `FieldErrors`, when any field is invalid
/// or when recording the amounts would overflow a total or the department's margin. `dataset` is
/// never modified.
pub fn add_financial_data(
    dataset: &FinancialDataset,
    input: &FinancialInput,
) -> Result<FinancialDataset> {
    input.ensure_valid()?;

    let department = input.department.as_str();
    let mut next = dataset.clone();

    match next
        .revenue
        .iter_mut()
        .find(|r| r.month == input.month && r.department == department)
    {
        Some(existing) => {
            existing.amount = existing
                .amount
                .checked_add(input.revenue)
                .ok_or_else(|| FieldErrors::single(Field::Revenue, REVENUE_TOO_LARGE))?
        }
        None => next.revenue.push(RevenueEntry::new(
            input.month.clone(),
            input.revenue,
            department,
        )),
    }

    match next
        .expenses
        .iter_mut()
        .find(|e| e.category == input.expense_category && e.department == department)
    {
        Some(existing) => {
            existing.amount = existing
                .amount
                .checked_add(input.expense_amount)
                .ok_or_else(|| FieldErrors::single(Field::ExpenseAmount, EXPENSE_TOO_LARGE))?
        }
        None => next.expenses.push(ExpenseEntry::new(
            input.expense_category.clone(),
            input.expense_amount,
            department,
        )),
    }

    // Every total the dashboard shows is a sum over a subset of these.
    if Amount::checked_sum(next.revenue.iter().map(|r| r.amount)).is_none() {
        return Err(FieldErrors::single(Field::Revenue, REVENUE_TOO_LARGE).into());
    }
    if Amount::checked_sum(next.expenses.iter().map(|e| e.amount)).is_none() {
        return Err(FieldErrors::single(Field::ExpenseAmount, EXPENSE_TOO_LARGE).into());
    }

    let revenue = next
        .department_revenue(department)
        .ok_or_else(|| FieldErrors::single(Field::Revenue, REVENUE_TOO_LARGE))?;
    let expenses = next
        .department_expenses(department)
        .ok_or_else(|| FieldErrors::single(Field::ExpenseAmount, EXPENSE_TOO_LARGE))?;
    let margin = Margin::from_totals(revenue, expenses)
        .ok_or_else(|| FieldErrors::single(Field::Revenue, REVENUE_TOO_SMALL))?;
    match next
        .profit_margins
        .iter_mut()
        .find(|m| m.department == department)
    {
        Some(existing) => existing.margin = margin,
        None => next
            .profit_margins
            .push(ProfitMarginEntry::new(department, margin)),
    }

    debug!(
        "Recorded {} revenue and {} {} expense for {department} in {}, margin is now {margin}",
        input.revenue, input.expense_amount, input.expense_category, input.month
    );
    Ok(next)
}
