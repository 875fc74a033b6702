//! Shared test utilities.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, FinancialDataset};
use crate::mutate::FinancialInput;
use crate::seed::seed_dataset;
use crate::source::DataSource;
use crate::Config;
use anyhow::bail;

/// The embedded seed dataset.
pub(crate) fn seed() -> FinancialDataset {
    seed_dataset().unwrap()
}

/// Default configuration without the simulated latency.
pub(crate) fn test_config() -> Config {
    Config::default().with_delays(0, 0)
}

/// Builds a `FinancialInput` from whole-dollar amounts.
pub(crate) fn input(
    month: &str,
    department: &str,
    revenue: i32,
    expense_category: &str,
    expense_amount: i32,
) -> FinancialInput {
    FinancialInput {
        month: month.to_string(),
        department: department.to_string(),
        revenue: Amount::from(revenue),
        expense_category: expense_category.to_string(),
        expense_amount: Amount::from(expense_amount),
    }
}

/// A `DataSource` whose backend is always down.
pub(crate) struct UnavailableSource;

#[async_trait::async_trait]
impl DataSource for UnavailableSource {
    async fn fetch(&mut self) -> anyhow::Result<FinancialDataset> {
        bail!("connection refused")
    }
}
