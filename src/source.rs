//! Where the dashboard's data comes from.
//!
//! There is no real backend. `SeedSource` waits for a configured delay to simulate network
//! latency and then hands back the embedded seed dataset. The `DataSource` trait is the seam a
//! presentation layer (or a test) can use to supply something else.

use crate::model::FinancialDataset;
use crate::seed::seed_dataset;
use crate::Config;
use std::time::Duration;
use tracing::debug;

/// Fetches the full, unfiltered financial dataset.
#[async_trait::async_trait]
pub trait DataSource: Send {
    async fn fetch(&mut self) -> anyhow::Result<FinancialDataset>;
}

/// Serves the embedded seed dataset after an artificial delay.
#[derive(Debug, Clone, Default)]
pub struct SeedSource {
    delay: Duration,
}

impl SeedSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fetch_delay())
    }
}

#[async_trait::async_trait]
impl DataSource for SeedSource {
    async fn fetch(&mut self) -> anyhow::Result<FinancialDataset> {
        debug!("Fetching financial data ({}ms simulated latency)", self.delay.as_millis());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        seed_dataset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_source() {
        let mut source = SeedSource::default();
        let data = source.fetch().await.unwrap();
        assert_eq!(data, crate::test::seed());
    }

    #[tokio::test]
    async fn test_seed_source_waits() {
        let mut source = SeedSource::new(Duration::from_millis(20));
        let start = std::time::Instant::now();
        let _ = source.fetch().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
