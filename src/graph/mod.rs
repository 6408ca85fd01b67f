pub mod client;
pub mod pagination;
pub mod source;

pub use client::GraphClient;
pub use pagination::{fetch_all_incidents, first_page_url, PageProgress, INCIDENTS_ENDPOINT};
pub use source::{IncidentPage, IncidentSource};
