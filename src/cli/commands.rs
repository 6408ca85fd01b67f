use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};

use crate::config::{
    CatalogConfig, DEFAULT_CLIENT_ID, DEFAULT_LOOKBACK_DAYS, DEFAULT_PAGE_DELAY_MS,
    DEFAULT_PAGE_SIZE, DEFAULT_TENANT,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Largest `$top` the incidents endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Parser)]
#[command(
    name = "incident-catalog",
    version,
    long_version = LONG_VERSION,
    about = "Export recent security incidents with recommended actions to CSV"
)]
pub struct Cli {
    #[command(flatten)]
    pub export: ExportArgs,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Args, Clone, Debug)]
pub struct ExportArgs {
    /// Only include incidents created within this many days
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
    pub days: u32,

    /// Incidents requested per page (at most 50)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    pub page_size: u32,

    /// Pause between page requests, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS)]
    pub page_delay_ms: u64,

    /// Directory the CSV file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory tenant (id, domain, or "organizations")
    #[arg(long, default_value = DEFAULT_TENANT)]
    pub tenant: String,

    /// Application (client) id used for sign-in
    #[arg(long, default_value = DEFAULT_CLIENT_ID)]
    pub client_id: String,
}

impl ExportArgs {
    pub fn to_config(&self) -> CatalogConfig {
        CatalogConfig {
            tenant: self.tenant.clone(),
            client_id: self.client_id.clone(),
            lookback_days: self.days,
            page_size: self.page_size,
            page_delay: Duration::from_millis(self.page_delay_ms),
            output_dir: self.output_dir.clone(),
        }
    }
}
