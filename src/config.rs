//! Configuration file handling for findash.
//!
//! The configuration file is optional. When one is given (via `--config` or `FINDASH_CONFIG`) it
//! is a JSON file holding the simulated latency and the filters the dashboard starts with. Any
//! field left out takes its default.

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::filter::{DateRangeFilter, DepartmentFilter, Filters};
use crate::model::FinancialDataset;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "findash";
const CONFIG_VERSION: u8 = 1;
const FETCH_DELAY_MS: u64 = 500;
const SUBMIT_DELAY_MS: u64 = 500;
const TRAILING_MONTHS: u32 = 6;

/// The `Config` object represents the configuration of the app, either loaded from a file or
/// defaulted.
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: Option<PathBuf>,
    config_file: ConfigFile,
}

impl Config {
    /// Loads and validates the configuration file at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config_file = ConfigFile::load(&path)
            .await
            .pub_result(ErrorType::Config)?;
        Ok(Self {
            path: Some(path),
            config_file,
        })
    }

    /// Loads the file at `path` if one is given, otherwise returns the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p).await,
            None => Ok(Self::default()),
        }
    }

    /// The file this configuration was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The artificial latency of the initial data fetch.
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.config_file.fetch_delay_ms)
    }

    /// The artificial latency of submitting new data.
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.config_file.submit_delay_ms)
    }

    pub fn initial_range(&self) -> InitialRange {
        self.config_file.initial_range
    }

    pub fn default_department(&self) -> &str {
        &self.config_file.default_department
    }

    /// The filters a freshly loaded dashboard starts with.
    pub fn initial_filters(&self, today: NaiveDate, dataset: &FinancialDataset) -> Filters {
        Filters::new(
            self.initial_range().resolve(today, dataset),
            DepartmentFilter::new(self.default_department()),
        )
    }

    #[cfg(test)]
    pub(crate) fn with_delays(mut self, fetch_ms: u64, submit_ms: u64) -> Self {
        self.config_file.fetch_delay_ms = fetch_ms;
        self.config_file.submit_delay_ms = submit_ms;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_initial_range(mut self, initial_range: InitialRange) -> Self {
        self.config_file.initial_range = initial_range;
        self
    }
}

/// The date range the dashboard starts with.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialRange {
    /// From this many months before the current month through the current month.
    TrailingMonths(u32),
    /// Every month present in the data.
    All,
}

impl Default for InitialRange {
    fn default() -> Self {
        InitialRange::TrailingMonths(TRAILING_MONTHS)
    }
}

impl InitialRange {
    pub fn resolve(&self, today: NaiveDate, dataset: &FinancialDataset) -> DateRangeFilter {
        match self {
            InitialRange::TrailingMonths(months) => DateRangeFilter::trailing(today, *months),
            InitialRange::All => DateRangeFilter::span(dataset)
                .unwrap_or_else(|| DateRangeFilter::trailing(today, 0)),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "findash",
///   "config_version": 1,
///   "fetch_delay_ms": 500,
///   "submit_delay_ms": 500,
///   "initial_range": { "trailing_months": 6 },
///   "default_department": "All"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct ConfigFile {
    /// Application name, should always be "findash"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Simulated network latency of the initial fetch, in milliseconds
    fetch_delay_ms: u64,

    /// Simulated latency of a form submission, in milliseconds
    submit_delay_ms: u64,

    /// Either `{"trailing_months": N}` or `"all"`
    initial_range: InitialRange,

    /// The department selected at startup, `"All"` for no department filter
    default_department: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            fetch_delay_ms: FETCH_DELAY_MS,
            submit_delay_ms: SUBMIT_DELAY_MS,
            initial_range: InitialRange::default(),
            default_department: DepartmentFilter::all().department,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another app or an
    /// unsupported version.
    async fn load(path: &Path) -> Res<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Config file {} is not valid", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in {}, expected {}",
            config.config_version,
            path.display(),
            CONFIG_VERSION
        );
        anyhow::ensure!(
            !config.default_department.is_empty(),
            "default_department must not be empty, use \"All\" for every department"
        );

        Ok(config)
    }

    #[cfg(test)]
    async fn save(&self, path: &Path) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        tokio::fs::write(path, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::seed;
    use tempfile::TempDir;

    async fn write_config(json: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, json).await.unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch_delay(), Duration::from_millis(500));
        assert_eq!(config.submit_delay(), Duration::from_millis(500));
        assert_eq!(config.initial_range(), InitialRange::TrailingMonths(6));
        assert_eq!(config.default_department(), "All");
        assert!(config.path().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let original = ConfigFile {
            fetch_delay_ms: 0,
            initial_range: InitialRange::All,
            default_department: "Sales".to_string(),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.config_file, original);
        assert_eq!(config.path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_load_minimal() {
        let (_dir, path) = write_config(
            r#"{
            "app_name": "findash",
            "initial_range": "all"
        }"#,
        )
        .await;
        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.initial_range(), InitialRange::All);
        assert_eq!(config.fetch_delay(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_load_trailing() {
        let (_dir, path) = write_config(r#"{ "initial_range": { "trailing_months": 12 } }"#).await;
        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.initial_range(), InitialRange::TrailingMonths(12));
    }

    #[tokio::test]
    async fn test_invalid_app_name() {
        let (_dir, path) = write_config(r#"{ "app_name": "ledgerbook" }"#).await;
        let err = Config::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_unsupported_version() {
        let (_dir, path) = write_config(r#"{ "config_version": 9 }"#).await;
        let err = Config::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported config_version"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_or_default() {
        let config = Config::load_or_default(None).await.unwrap();
        assert_eq!(config.initial_range(), InitialRange::default());
    }

    #[test]
    fn test_initial_filters() {
        let today = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let seed = seed();

        let filters = Config::default().initial_filters(today, &seed);
        assert_eq!(filters.date_range, DateRangeFilter::new("2022-12", "2023-06"));
        assert!(filters.department.is_all());

        let filters = Config::default()
            .with_initial_range(InitialRange::All)
            .initial_filters(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), &seed);
        assert_eq!(filters.date_range, DateRangeFilter::new("2023-01", "2023-06"));
    }
}
