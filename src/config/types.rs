use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Public client id of the Microsoft Graph command-line tools, which is
/// pre-consented for delegated device-code sign-in in most tenants.
pub const DEFAULT_CLIENT_ID: &str = "14d82eec-204b-4c2f-b7e8-296a70dab67e";
pub const DEFAULT_TENANT: &str = "organizations";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 100;

/// Settings for one catalog run.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub tenant: String,
    pub client_id: String,
    pub lookback_days: u32,
    pub page_size: u32,
    pub page_delay: Duration,
    pub output_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tenant: DEFAULT_TENANT.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            output_dir: PathBuf::from("."),
        }
    }
}

impl CatalogConfig {
    /// Lower bound on incident creation time for a run starting at `now`.
    pub fn created_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::days(self.lookback_days as i64)
    }
}
