use std::collections::BTreeMap;

use console::style;

use crate::models::record::FlatRecord;
use crate::utils::formatting::format_mean;

/// Read-only aggregate over the exported catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSummary {
    pub total: usize,
    pub with_actions: usize,
    pub without_actions: usize,
    /// Sorted by key.
    pub by_severity: Vec<(String, usize)>,
    /// Sorted by key.
    pub by_status: Vec<(String, usize)>,
    /// Non-empty classifications only, most frequent first.
    pub by_classification: Vec<(String, usize)>,
    pub total_alerts: usize,
    pub with_mitre: usize,
}

fn count_by<'a, I>(keys: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn owned(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

impl CatalogSummary {
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let with_actions = records.iter().filter(|r| r.has_recommended_actions).count();

        let mut by_classification = owned(count_by(
            records
                .iter()
                .map(|r| r.classification.as_str())
                .filter(|c| !c.is_empty()),
        ));
        // Stable sort keeps ties in key order
        by_classification.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            total: records.len(),
            with_actions,
            without_actions: records.len() - with_actions,
            by_severity: owned(count_by(records.iter().map(|r| r.severity.as_str()))),
            by_status: owned(count_by(records.iter().map(|r| r.status.as_str()))),
            by_classification,
            total_alerts: records.iter().map(|r| r.alert_count).sum(),
            with_mitre: records.iter().filter(|r| r.has_mitre_techniques()).count(),
        }
    }

    pub fn mean_alerts(&self) -> String {
        format_mean(self.total_alerts, self.total)
    }

    /// Console rendering. Only section headings carry styling so the
    /// label/value lines stay greppable.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let heading = |out: &mut String, title: &str| {
            out.push_str(&format!("\n{}\n", style(title).cyan().bold()));
        };

        heading(&mut out, "=== Incident Catalog Summary ===");
        out.push_str(&format!("Total Incidents: {}\n", self.total));
        out.push_str(&format!("Incidents with Recommended Actions: {}\n", self.with_actions));
        out.push_str(&format!("Incidents without Recommended Actions: {}\n", self.without_actions));

        for (title, rows) in [
            ("By Severity:", &self.by_severity),
            ("By Status:", &self.by_status),
            ("By Classification:", &self.by_classification),
        ] {
            heading(&mut out, title);
            if rows.is_empty() {
                out.push_str("  (none)\n");
            }
            for (key, count) in rows {
                out.push_str(&format!("  {}: {}\n", key, count));
            }
        }

        heading(&mut out, "Alerts:");
        out.push_str(&format!("Total Alerts: {}\n", self.total_alerts));
        out.push_str(&format!("Average Alerts per Incident: {}\n", self.mean_alerts()));
        out.push_str(&format!("Incidents with MITRE Techniques: {}\n", self.with_mitre));
        out
    }
}
