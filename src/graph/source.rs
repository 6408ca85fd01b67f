use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::CatalogError;

/// One page of the incidents collection. Items stay as raw JSON so that a
/// single malformed incident can be skipped later without failing the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentPage {
    pub value: Vec<Value>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Fetch the page at `url`. The URL is used verbatim.
    async fn get_page(&self, url: &str) -> Result<IncidentPage, CatalogError>;

    /// Source name for logging
    fn source_name(&self) -> &str;
}
