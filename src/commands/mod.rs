//! Command handlers for the findash CLI.
//!
//! Every handler loads a fresh `Dashboard` from the seed data, applies the filter flags, and
//! returns its rendered output together with the structured data it was rendered from.

mod add;
mod report;

use crate::args::FilterArgs;
use crate::dashboard::Dashboard;
use crate::filter::{DateRangeFilter, DepartmentFilter, Filters};
use crate::model::{ALL_DEPARTMENTS, DEPARTMENTS};
use crate::source::SeedSource;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, warn};

pub use add::add;
pub use report::{data, stats, table, StatsReport, TableReport};

/// The output type for a command: the text printed for the user and, optionally, the structured
/// data behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// The rendered output, printed to stdout.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        println!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads a dashboard from the seed data and narrows it by `args`.
async fn open_dashboard(config: &Config, args: &FilterArgs) -> Result<Dashboard> {
    let mut source = SeedSource::from_config(config);
    let mut dashboard = Dashboard::load(&mut source, config).await?;
    let filters = filters_from_args(dashboard.filters(), args);
    dashboard.set_filters(filters);
    Ok(dashboard)
}

/// Overrides whichever parts of `current` were given on the command line.
fn filters_from_args(current: &Filters, args: &FilterArgs) -> Filters {
    let start = args
        .start
        .clone()
        .unwrap_or_else(|| current.date_range.start.clone());
    let end = args
        .end
        .clone()
        .unwrap_or_else(|| current.date_range.end.clone());
    let department = match &args.department {
        Some(department) => {
            warn_unknown_department(department);
            DepartmentFilter::new(department)
        }
        None => current.department.clone(),
    };
    Filters::new(DateRangeFilter::new(start, end), department)
}

fn warn_unknown_department(department: &str) {
    if department != ALL_DEPARTMENTS && !DEPARTMENTS.contains(&department) {
        warn!(
            "'{department}' is not one of {}; names are case-sensitive",
            DEPARTMENTS.join(", ")
        );
    }
}
