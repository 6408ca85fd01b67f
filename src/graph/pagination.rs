use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use super::source::IncidentSource;
use crate::errors::CatalogError;
use crate::utils::formatting::TIMESTAMP_FORMAT;

pub const INCIDENTS_ENDPOINT: &str = "https://graph.microsoft.com/v1.0/security/incidents";

/// Build the first-page URL: page size, inline alerts, and a creation-time
/// lower bound. Later pages come from the server's next link.
pub fn first_page_url(endpoint: &str, created_after: DateTime<Utc>, page_size: u32) -> String {
    format!(
        "{}?$top={}&$expand=alerts&$filter=createdDateTime%20ge%20{}",
        endpoint,
        page_size,
        created_after.format(TIMESTAMP_FORMAT)
    )
}

/// Progress for one fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    pub page: usize,
    pub items: usize,
    pub total: usize,
}

/// Follow next links from `first_url` until the server stops returning one.
/// The fixed `page_delay` between requests is a throttle courtesy, not a
/// backoff. Any failed request aborts the whole fetch and drops what was
/// accumulated.
pub async fn fetch_all_incidents<S, F>(
    source: &S,
    first_url: String,
    page_delay: Duration,
    mut on_page: F,
) -> Result<Vec<Value>, CatalogError>
where
    S: IncidentSource + ?Sized,
    F: FnMut(PageProgress),
{
    let mut incidents = Vec::new();
    let mut next = Some(first_url);
    let mut page = 0usize;

    while let Some(url) = next.take() {
        if page > 0 {
            tokio::time::sleep(page_delay).await;
        }
        page += 1;

        let result = source.get_page(&url).await.map_err(|e| {
            error!(source = source.source_name(), page, error = %e, "Incident fetch failed");
            e
        })?;

        let items = result.value.len();
        incidents.extend(result.value);
        debug!(page, items, has_next = result.next_link.is_some(), "Fetched page");
        on_page(PageProgress {
            page,
            items,
            total: incidents.len(),
        });

        next = result.next_link;
    }

    info!(pages = page, incidents = incidents.len(), "Incident fetch complete");
    Ok(incidents)
}
