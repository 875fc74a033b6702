//! A financial analytics dashboard core: mock revenue, expense and margin data held in memory,
//! filtered by month range and department, aggregated per department, and extended with new data
//! points for the life of a session.

pub mod aggregate;
pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
mod error;
pub mod filter;
pub mod model;
pub mod mutate;
pub mod render;
mod seed;
pub mod series;
pub mod source;
#[cfg(test)]
mod test;

pub use config::{Config, InitialRange};
pub use dashboard::{Dashboard, Listener};
pub use error::{Error, ErrorType, Result};
pub use filter::{filter_by_date_range, filter_by_department};
pub use mutate::add_financial_data;
