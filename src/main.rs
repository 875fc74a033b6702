use clap::Parser;
use findash::args::{Args, Command};
use findash::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load_or_default(args.common().config()).await?;
    if let Some(path) = config.path() {
        debug!("Using configuration from {}", path.display());
    }

    let _: () = match args.command() {
        Command::Table(table_args) => commands::table(config, table_args.clone())
            .await?
            .print(),

        Command::Stats(stats_args) => commands::stats(config, stats_args.clone())
            .await?
            .print(),

        Command::Data(data_args) => commands::data(config, data_args.clone()).await?.print(),

        Command::Add(add_args) => commands::add(config, *add_args.clone()).await?.print(),
    };
    Ok(())
}

/// Sends logs to stderr so that stdout carries only the rendered report.
///
/// `RUST_LOG`, when set, takes precedence over `--log-level`. Otherwise only this crate's own
/// events are shown at `level`.
pub fn init_logger(level: LevelFilter) {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!(
            "{crate_name}={level},{bin_name}={level}",
            crate_name = env!("CARGO_CRATE_NAME"),
            bin_name = env!("CARGO_BIN_NAME"),
        ))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
