#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use incident_catalog::errors::CatalogError;
use incident_catalog::graph::{IncidentPage, IncidentSource};
use serde_json::Value;

/// Serves canned pages in order and records every requested URL.
pub struct MockSource {
    responses: Vec<Result<IncidentPage, String>>,
    requests: Mutex<Vec<String>>,
}

impl MockSource {
    /// Chain `pages` together with synthetic next links; the last page has none.
    pub fn paged(pages: Vec<Vec<Value>>) -> Self {
        let count = pages.len();
        let responses = pages
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                Ok(IncidentPage {
                    value,
                    next_link: (i + 1 < count).then(|| next_link(i + 1)),
                })
            })
            .collect();
        Self::with_responses(responses)
    }

    pub fn with_responses(responses: Vec<Result<IncidentPage, String>>) -> Self {
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn next_link(page: usize) -> String {
    format!("https://graph.test/v1.0/security/incidents?$skiptoken=page{}", page)
}

#[async_trait]
impl IncidentSource for MockSource {
    async fn get_page(&self, url: &str) -> Result<IncidentPage, CatalogError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(url.to_string());
            requests.len() - 1
        };
        match self.responses.get(index) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(message)) => Err(CatalogError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Err(CatalogError::Internal(format!("unexpected request {}", url))),
        }
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}

/// Collects formatted log output so tests can assert on emitted events.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
