use serde::{Deserialize, Serialize};

/// Separator between distinct alert titles.
pub const ALERT_TYPE_SEPARATOR: &str = "; ";

/// Separator between distinct MITRE technique identifiers.
pub const MITRE_SEPARATOR: &str = ", ";

/// Separator between distinct recommended-action blocks. Spans lines so each
/// block stays readable inside a single spreadsheet cell.
pub const RECOMMENDED_ACTIONS_SEPARATOR: &str = "\n\n---\n\n";

/// One denormalized catalog row, derived once from an incident and never
/// mutated afterwards. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlatRecord {
    pub incident_id: String,
    pub incident_name: String,
    pub tenant_id: String,
    pub severity: String,
    pub status: String,
    pub classification: String,
    pub determination: String,
    pub created_date_time: String,
    pub last_update_date_time: String,
    pub incident_web_url: String,
    pub alert_count: usize,
    pub alert_types: String,
    pub mitre_techniques: String,
    pub mitre_technique_count: usize,
    pub has_recommended_actions: bool,
    pub recommended_actions_count: usize,
    pub recommended_actions: String,
}

impl FlatRecord {
    pub const COLUMNS: [&'static str; 17] = [
        "IncidentId",
        "IncidentName",
        "TenantId",
        "Severity",
        "Status",
        "Classification",
        "Determination",
        "CreatedDateTime",
        "LastUpdateDateTime",
        "IncidentWebUrl",
        "AlertCount",
        "AlertTypes",
        "MitreTechniques",
        "MitreTechniqueCount",
        "HasRecommendedActions",
        "RecommendedActionsCount",
        "RecommendedActions",
    ];

    pub fn has_mitre_techniques(&self) -> bool {
        self.mitre_technique_count > 0
    }
}
