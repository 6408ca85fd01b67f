use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::CatalogError;
use crate::models::incident::{Alert, Incident};
use crate::models::record::{
    FlatRecord, ALERT_TYPE_SEPARATOR, MITRE_SEPARATOR, RECOMMENDED_ACTIONS_SEPARATOR,
};
use crate::utils::formatting::format_timestamp;

/// How often the progress callback fires while building the catalog.
pub const PROGRESS_INTERVAL: usize = 10;

/// An incident that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedIncident {
    pub incident_id: String,
    pub reason: String,
}

/// Outcome of flattening a batch: records in received order, plus the
/// incidents that were skipped.
#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub records: Vec<FlatRecord>,
    pub skipped: Vec<SkippedIncident>,
}

/// Collect distinct non-empty values in order of first occurrence.
fn distinct_non_empty<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .collect()
}

/// Derive the flat record for one incident.
pub fn flatten_incident(incident: &Incident) -> FlatRecord {
    let alerts: &[Alert] = incident.alerts.as_deref().unwrap_or_default();

    let alert_types = distinct_non_empty(alerts.iter().filter_map(|a| a.title.as_deref()));
    let techniques = distinct_non_empty(
        alerts
            .iter()
            .filter_map(|a| a.mitre_techniques.as_deref())
            .flatten()
            .map(String::as_str),
    );
    let actions = distinct_non_empty(
        alerts.iter().filter_map(|a| a.recommended_actions.as_deref()),
    );

    FlatRecord {
        incident_id: incident.id.clone(),
        incident_name: incident.display_name.clone().unwrap_or_default(),
        tenant_id: incident.tenant_id.clone().unwrap_or_default(),
        severity: incident.severity.unwrap_or_default().as_str().to_string(),
        status: incident.status.unwrap_or_default().as_str().to_string(),
        classification: incident.classification.clone().unwrap_or_default(),
        determination: incident.determination.clone().unwrap_or_default(),
        created_date_time: format_timestamp(incident.created_date_time),
        last_update_date_time: format_timestamp(incident.last_update_date_time),
        incident_web_url: incident.incident_web_url.clone().unwrap_or_default(),
        alert_count: alerts.len(),
        alert_types: alert_types.join(ALERT_TYPE_SEPARATOR),
        mitre_techniques: techniques.join(MITRE_SEPARATOR),
        mitre_technique_count: techniques.len(),
        has_recommended_actions: !actions.is_empty(),
        recommended_actions_count: actions.len(),
        recommended_actions: actions.join(RECOMMENDED_ACTIONS_SEPARATOR),
    }
}

/// Best-effort identifier for log lines, available even when the rest of
/// the payload does not parse.
pub fn raw_incident_id(value: &Value) -> String {
    match value.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "<unknown>".to_string(),
    }
}

/// Validate one raw incident payload into the typed model.
pub fn parse_incident(value: Value) -> Result<Incident, CatalogError> {
    let incident: Incident = serde_json::from_value(value)
        .map_err(|e| CatalogError::MalformedIncident(e.to_string()))?;
    if incident.id.trim().is_empty() {
        return Err(CatalogError::MalformedIncident("empty incident id".into()));
    }
    Ok(incident)
}

/// Flatten a batch of raw incident payloads. A payload that fails to parse
/// is logged and skipped; the rest of the batch is unaffected.
pub fn build_catalog<F>(items: Vec<Value>, mut on_progress: F) -> CatalogBuild
where
    F: FnMut(usize, usize),
{
    let total = items.len();
    let mut build = CatalogBuild {
        records: Vec::with_capacity(total),
        skipped: Vec::new(),
    };

    for (index, value) in items.into_iter().enumerate() {
        let incident_id = raw_incident_id(&value);
        match parse_incident(value) {
            Ok(incident) => {
                let record = flatten_incident(&incident);
                debug!(
                    incident_id = %record.incident_id,
                    alerts = record.alert_count,
                    actions = record.recommended_actions_count,
                    "Flattened incident"
                );
                build.records.push(record);
            }
            Err(e) => {
                warn!(incident_id = %incident_id, error = %e, "Skipping incident");
                build.skipped.push(SkippedIncident {
                    incident_id,
                    reason: e.to_string(),
                });
            }
        }

        let processed = index + 1;
        if processed % PROGRESS_INTERVAL == 0 || processed == total {
            on_progress(processed, total);
        }
    }

    build
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn incident_with_alerts(alerts: Value) -> Incident {
        parse_incident(json!({
            "id": "42",
            "displayName": "Ransomware activity",
            "severity": "medium",
            "status": "active",
            "alerts": alerts
        }))
        .unwrap()
    }

    #[test]
    fn test_zero_alerts_yields_empty_derived_fields() {
        for alerts in [json!([]), Value::Null] {
            let record = flatten_incident(&incident_with_alerts(alerts));
            assert_eq!(record.alert_count, 0);
            assert_eq!(record.alert_types, "");
            assert_eq!(record.mitre_techniques, "");
            assert_eq!(record.mitre_technique_count, 0);
            assert!(!record.has_recommended_actions);
            assert_eq!(record.recommended_actions_count, 0);
            assert_eq!(record.recommended_actions, "");
        }
    }

    #[test]
    fn test_distinct_values_keep_first_occurrence_order() {
        let record = flatten_incident(&incident_with_alerts(json!([
            {"title": "Lateral movement", "mitreTechniques": ["T1021", "T1078"]},
            {"title": "Credential access", "mitreTechniques": ["T1003", "T1021"]},
            {"title": "Lateral movement", "mitreTechniques": []}
        ])));
        assert_eq!(record.alert_count, 3);
        assert_eq!(record.alert_types, "Lateral movement; Credential access");
        assert_eq!(record.mitre_techniques, "T1021, T1078, T1003");
        assert_eq!(record.mitre_technique_count, 3);
    }

    #[test]
    fn test_empty_and_missing_values_are_not_counted() {
        let record = flatten_incident(&incident_with_alerts(json!([
            {"title": "", "recommendedActions": "", "mitreTechniques": [""]},
            {"title": null, "recommendedActions": null, "mitreTechniques": null},
            {}
        ])));
        assert_eq!(record.alert_count, 3);
        assert_eq!(record.alert_types, "");
        assert_eq!(record.mitre_technique_count, 0);
        assert!(!record.has_recommended_actions);
        assert_eq!(record.recommended_actions_count, 0);
    }

    #[test]
    fn test_recommended_actions_joined_with_block_separator() {
        let record = flatten_incident(&incident_with_alerts(json!([
            {"title": "A", "recommendedActions": "1. Isolate host\n2. Reset credentials"},
            {"title": "B", "recommendedActions": "Block the sender"}
        ])));
        assert!(record.has_recommended_actions);
        assert_eq!(record.recommended_actions_count, 2);
        assert_eq!(
            record.recommended_actions,
            "1. Isolate host\n2. Reset credentials\n\n---\n\nBlock the sender"
        );
    }

    #[test]
    fn test_duplicate_alert_values_do_not_change_record() {
        let alert = json!({
            "title": "Suspicious PowerShell",
            "recommendedActions": "Isolate host",
            "mitreTechniques": ["T1059", "T1059"]
        });
        let single = flatten_incident(&incident_with_alerts(json!([alert.clone()])));
        let doubled = flatten_incident(&incident_with_alerts(json!([alert.clone(), alert])));

        assert_eq!(single.alert_types, doubled.alert_types);
        assert_eq!(single.mitre_techniques, doubled.mitre_techniques);
        assert_eq!(single.mitre_technique_count, doubled.mitre_technique_count);
        assert_eq!(single.recommended_actions, doubled.recommended_actions);
        assert_eq!(single.recommended_actions_count, doubled.recommended_actions_count);
        assert_eq!(single.has_recommended_actions, doubled.has_recommended_actions);
    }

    #[test]
    fn test_mitre_count_matches_split_field() {
        let record = flatten_incident(&incident_with_alerts(json!([
            {"mitreTechniques": ["T1566.001", "T1204", "T1566.001"]},
            {"mitreTechniques": ["T1547"]}
        ])));
        let split: HashSet<&str> = record.mitre_techniques.split(MITRE_SEPARATOR).collect();
        assert_eq!(split.len(), record.mitre_technique_count);
        assert_eq!(record.mitre_technique_count, 3);
    }

    #[test]
    fn test_missing_incident_fields_default_to_empty() {
        let incident = parse_incident(json!({"id": "9"})).unwrap();
        let record = flatten_incident(&incident);
        assert_eq!(record.incident_name, "");
        assert_eq!(record.severity, "unknown");
        assert_eq!(record.status, "unknown");
        assert_eq!(record.created_date_time, "");
    }

    #[test]
    fn test_parse_rejects_missing_or_empty_id() {
        assert!(matches!(
            parse_incident(json!({"displayName": "no id"})),
            Err(CatalogError::MalformedIncident(_))
        ));
        assert!(matches!(
            parse_incident(json!({"id": "  "})),
            Err(CatalogError::MalformedIncident(_))
        ));
    }

    #[test]
    fn test_build_catalog_skips_malformed_incident() {
        let items = vec![
            json!({"id": "1", "alerts": []}),
            json!({"id": "2", "alerts": {"title": "not a list"}}),
            json!({"id": "3", "alerts": [{"title": "Phishing"}]}),
        ];
        let build = build_catalog(items, |_, _| {});

        let ids: Vec<&str> = build.records.iter().map(|r| r.incident_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(build.skipped.len(), 1);
        assert_eq!(build.skipped[0].incident_id, "2");
        assert!(build.skipped[0].reason.contains("Malformed incident"));
    }

    #[test]
    fn test_build_catalog_reports_progress_every_ten() {
        let items: Vec<Value> = (0..25).map(|i| json!({"id": i.to_string()})).collect();
        let mut ticks = Vec::new();
        let build = build_catalog(items, |done, total| ticks.push((done, total)));
        assert_eq!(build.records.len(), 25);
        assert_eq!(ticks, vec![(10, 25), (20, 25), (25, 25)]);
    }

    #[test]
    fn test_raw_incident_id_handles_numeric_and_missing() {
        assert_eq!(raw_incident_id(&json!({"id": 17})), "17");
        assert_eq!(raw_incident_id(&json!({"id": "abc"})), "abc");
        assert_eq!(raw_incident_id(&json!({})), "<unknown>");
    }
}
