use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::source::{IncidentPage, IncidentSource};
use crate::auth::Session;
use crate::errors::CatalogError;

/// Incidents endpoint backed by an authenticated session. Borrows the
/// session so it cannot outlive it.
pub struct GraphClient<'s> {
    client: Client,
    session: &'s Session,
}

impl<'s> GraphClient<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            client: Client::new(),
            session,
        }
    }
}

/// Pull `error.message` out of an API error body, if present.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl IncidentSource for GraphClient<'_> {
    async fn get_page(&self, url: &str) -> Result<IncidentPage, CatalogError> {
        if self.session.is_expired() {
            return Err(CatalogError::Authentication("Access token expired during fetch".into()));
        }
        debug!(url = %url, "GET incidents page");
        let resp = self
            .client
            .get(url)
            .header("Authorization", self.session.bearer())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("Incidents request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CatalogError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Envelope(e.to_string()))
    }

    fn source_name(&self) -> &str {
        "graph"
    }
}
