//! These structs provide the CLI interface for the findash CLI.

use crate::aggregate::{SortDirection, SortField, TableQuery};
use crate::filter::is_year_month;
use crate::model::Amount;
use crate::mutate::FinancialInput;
use crate::render::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// findash: A command-line financial analytics dashboard.
///
/// Shows revenue, expenses, profit and margins per department for a mock dataset held in memory,
/// filtered by month range and department. New data points can be added for the duration of a
/// single run; nothing is saved.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the per-department table with grand totals.
    Table(TableArgs),
    /// Print the headline statistics and the chart series.
    Stats(StatsArgs),
    /// Print the filtered dataset as JSON.
    Data(DataArgs),
    /// Record a revenue amount and an expense for a department, then print the table.
    ///
    /// The change only lives for this run of the program.
    Add(Box<AddArgs>),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// An optional JSON configuration file.
    #[arg(long, env = "FINDASH_CONFIG")]
    config: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: Option<PathBuf>) -> Self {
        Self { log_level, config }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

/// Narrow the data before it is aggregated. Any bound left out comes from the configured initial
/// range.
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// The first month to include, as YYYY-MM.
    #[arg(long, value_parser = parse_month)]
    pub start: Option<String>,

    /// The last month to include, as YYYY-MM.
    #[arg(long, value_parser = parse_month)]
    pub end: Option<String>,

    /// Only show this department. "All" shows every department.
    #[arg(long)]
    pub department: Option<String>,
}

/// How the department table is searched, sorted and printed.
#[derive(Debug, Parser, Clone, Default)]
pub struct ViewArgs {
    /// Only show departments whose name contains this text (case-insensitive).
    #[arg(long, default_value = "")]
    pub search: String,

    /// The column to sort by.
    #[arg(long, value_enum, default_value_t = SortField::Department)]
    pub sort: SortField,

    /// Sort descending instead of ascending.
    #[arg(long)]
    pub desc: bool,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl ViewArgs {
    pub fn query(&self) -> TableQuery {
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        TableQuery::new(self.search.clone(), self.sort, direction)
    }
}

/// (Not shown): Args for the `findash table` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct TableArgs {
    #[clap(flatten)]
    pub filters: FilterArgs,

    #[clap(flatten)]
    pub view: ViewArgs,
}

/// (Not shown): Args for the `findash stats` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct StatsArgs {
    #[clap(flatten)]
    pub filters: FilterArgs,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// (Not shown): Args for the `findash data` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct DataArgs {
    #[clap(flatten)]
    pub filters: FilterArgs,
}

/// (Not shown): Args for the `findash add` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AddArgs {
    /// The month the revenue was earned in, as YYYY-MM.
    #[arg(long, value_parser = parse_month)]
    pub month: String,

    /// The department to record against, e.g. Sales, Marketing, HR, IT or Operations.
    #[arg(long)]
    pub department: String,

    /// The revenue amount, e.g. 1000 or $1,000.00. Must be greater than zero.
    #[arg(long, allow_hyphen_values = true)]
    pub revenue: Amount,

    /// The expense category, e.g. Salaries, Rent or Travel.
    #[arg(long)]
    pub expense_category: String,

    /// The expense amount. Must be greater than zero.
    #[arg(long, allow_hyphen_values = true)]
    pub expense_amount: Amount,

    /// The first month of the table printed afterwards, as YYYY-MM.
    #[arg(long, value_parser = parse_month)]
    pub start: Option<String>,

    /// The last month of the table printed afterwards, as YYYY-MM.
    #[arg(long, value_parser = parse_month)]
    pub end: Option<String>,

    #[clap(flatten)]
    pub view: ViewArgs,
}

impl AddArgs {
    /// The table printed after the change covers the configured default department.
    pub fn filters(&self) -> FilterArgs {
        FilterArgs {
            start: self.start.clone(),
            end: self.end.clone(),
            department: None,
        }
    }

    pub fn input(&self) -> FinancialInput {
        FinancialInput {
            month: self.month.clone(),
            department: self.department.clone(),
            revenue: self.revenue,
            expense_category: self.expense_category.clone(),
            expense_amount: self.expense_amount,
        }
    }
}

fn parse_month(s: &str) -> Result<String, String> {
    if is_year_month(s) {
        Ok(s.to_string())
    } else {
        Err(format!("'{s}' is not a month in YYYY-MM format"))
    }
}
