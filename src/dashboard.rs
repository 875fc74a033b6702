//! Session state for a dashboard.
//!
//! A `Dashboard` owns the full dataset and the current filters, and keeps a filtered view that is
//! re-derived after every change. Presentation code subscribes to be told when the view changes
//! instead of reaching into shared mutable state.

use crate::aggregate::Summary;
use crate::error::{ErrorType, IntoResult, Result};
use crate::filter::{DateRangeFilter, DepartmentFilter, Filters};
use crate::model::FinancialDataset;
use crate::mutate::{add_financial_data, FinancialInput};
use crate::series::SummaryStats;
use crate::source::DataSource;
use crate::Config;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::fmt::{Debug, Formatter};
use std::time::Duration;
use tracing::{debug, info};

/// Called with the freshly filtered data and the filters that produced it.
pub type Listener = Box<dyn FnMut(&FinancialDataset, &Filters) + Send>;

pub struct Dashboard {
    dataset: FinancialDataset,
    filters: Filters,
    initial_filters: Filters,
    filtered: FinancialDataset,
    submit_delay: Duration,
    listeners: Vec<Listener>,
}

impl Dashboard {
    /// Fetches the data from `source` and applies the configured initial filters, using today's
    /// date for a trailing initial range.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorType::DataUnavailable` error when the fetch fails.
    pub async fn load(source: &mut dyn DataSource, config: &Config) -> Result<Self> {
        Self::load_at(source, config, Local::now().date_naive()).await
    }

    /// Like `load` but with an explicit `today`.
    pub async fn load_at(
        source: &mut dyn DataSource,
        config: &Config,
        today: NaiveDate,
    ) -> Result<Self> {
        let dataset = source
            .fetch()
            .await
            .context("Unable to load financial data")
            .pub_result(ErrorType::DataUnavailable)?;
        let filters = config.initial_filters(today, &dataset);
        info!(
            "Loaded {} revenue, {} expense and {} margin entries",
            dataset.revenue.len(),
            dataset.expenses.len(),
            dataset.profit_margins.len()
        );
        Ok(Self::new(dataset, filters, config.submit_delay()))
    }

    /// Creates a dashboard over `dataset` without fetching.
    pub fn new(dataset: FinancialDataset, filters: Filters, submit_delay: Duration) -> Self {
        let filtered = filters.apply(&dataset);
        Self {
            dataset,
            initial_filters: filters.clone(),
            filters,
            filtered,
            submit_delay,
            listeners: Vec::new(),
        }
    }

    /// The full, unfiltered dataset.
    pub fn dataset(&self) -> &FinancialDataset {
        &self.dataset
    }

    /// The dataset narrowed by the current filters.
    pub fn filtered(&self) -> &FinancialDataset {
        &self.filtered
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// The department table for the filtered data.
    pub fn summary(&self) -> Summary {
        Summary::from_dataset(&self.filtered)
    }

    /// The headline statistics for the filtered data.
    pub fn stats(&self) -> SummaryStats {
        SummaryStats::from_dataset(&self.filtered)
    }

    /// Registers `listener` to be called every time the filtered view is re-derived.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Sets the date range. A range whose start is after its end is normalized first.
    pub fn set_date_range(&mut self, date_range: DateRangeFilter) {
        self.filters.date_range = date_range.normalized();
        self.refresh();
    }

    pub fn set_department(&mut self, department: DepartmentFilter) {
        self.filters.department = department;
        self.refresh();
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = Filters::new(filters.date_range.normalized(), filters.department);
        self.refresh();
    }

    /// Returns to the filters the dashboard was loaded with.
    pub fn reset_filters(&mut self) {
        self.filters = self.initial_filters.clone();
        self.refresh();
    }

    /// Validates `input`, waits the configured submit delay, records it, then re-derives the
    /// filtered view.
    ///
    /// # Errors
    ///
    /// Returns an `ErrorType::InvalidInput` error, without waiting, when `input` fails validation.
    /// The same error is returned after the delay when recording would overflow a total. The
    /// dataset is left untouched and no listener is called.
    pub async fn submit(&mut self, input: &FinancialInput) -> Result<()> {
        input.ensure_valid()?;
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        self.dataset = add_financial_data(&self.dataset, input)?;
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.filtered = self.filters.apply(&self.dataset);
        debug!(
            "Filtered to {} revenue entries for {} ({}..={})",
            self.filtered.revenue.len(),
            self.filters.department.department,
            self.filters.date_range.start,
            self.filters.date_range.end
        );
        for listener in self.listeners.iter_mut() {
            listener(&self.filtered, &self.filters);
        }
    }
}

impl Debug for Dashboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("filters", &self.filters)
            .field("revenue", &self.dataset.revenue.len())
            .field("expenses", &self.dataset.expenses.len())
            .field("profit_margins", &self.dataset.profit_margins.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
