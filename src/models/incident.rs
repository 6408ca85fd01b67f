use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incident severity as reported by the security API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
    /// Also absorbs values added to the API after this was written.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Informational => "informational",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Unknown => "unknown",
        }
    }
}

/// Triage status of an incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncidentStatus {
    Active,
    Resolved,
    InProgress,
    Redirected,
    AwaitingAction,
    #[default]
    #[serde(other)]
    Unknown,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Active => "active",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::InProgress => "inProgress",
            IncidentStatus::Redirected => "redirected",
            IncidentStatus::AwaitingAction => "awaitingAction",
            IncidentStatus::Unknown => "unknown",
        }
    }
}

/// A detection nested under an incident. Only the fields the catalog
/// flattens are kept; everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub title: Option<String>,
    pub recommended_actions: Option<String>,
    pub mitre_techniques: Option<Vec<String>>,
}

/// An incident as returned by the incidents endpoint with `$expand=alerts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub tenant_id: Option<String>,
    pub display_name: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<IncidentStatus>,
    pub classification: Option<String>,
    pub determination: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_update_date_time: Option<DateTime<Utc>>,
    pub incident_web_url: Option<String>,
    #[serde(default)]
    pub alerts: Option<Vec<Alert>>,
}
