use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::catalog::{build_catalog, export_catalog, SkippedIncident};
use crate::config::CatalogConfig;
use crate::errors::{CatalogError, ErrorTier};
use crate::graph::{fetch_all_incidents, first_page_url, IncidentSource, INCIDENTS_ENDPOINT};
use crate::models::record::FlatRecord;
use crate::reporting::CatalogSummary;
use crate::utils::formatting::TIMESTAMP_FORMAT;

/// Everything a run produced, kept for the caller after the console output.
#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<FlatRecord>,
    pub skipped: Vec<SkippedIncident>,
    pub export_path: Option<PathBuf>,
    pub export_error: Option<String>,
    pub summary: CatalogSummary,
}

fn flatten_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:30.cyan/dark_gray} {pos}/{len} incidents processed")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    bar
}

/// Fetch, flatten, export, and summarize against `source`. `now` anchors the
/// lookback window; `export_clock` is read once the export stage starts and
/// names the file. Only fatal errors are returned; per-incident and
/// recoverable export failures are reported and the run carries on.
pub async fn run_catalog<S, C>(
    source: &S,
    config: &CatalogConfig,
    now: DateTime<Local>,
    export_clock: C,
    quiet: bool,
) -> Result<RunReport, CatalogError>
where
    S: IncidentSource + ?Sized,
    C: Fn() -> DateTime<Local>,
{
    let created_after = config.created_after(now.with_timezone(&Utc));
    let url = first_page_url(INCIDENTS_ENDPOINT, created_after, config.page_size);

    if !quiet {
        println!(
            "\n{} Fetching incidents created since {}",
            style("▶").green().bold(),
            style(created_after.format(TIMESTAMP_FORMAT)).cyan(),
        );
    }
    let items = fetch_all_incidents(source, url, config.page_delay, |p| {
        if !quiet {
            println!(
                "  {} Page {}: {} incidents (total {})",
                style("✓").green(),
                p.page,
                p.items,
                p.total,
            );
        }
    })
    .await?;

    if !quiet {
        println!(
            "\n{} Processing {} incidents",
            style("▶").green().bold(),
            items.len(),
        );
    }
    let bar = flatten_bar(items.len(), quiet);
    let build = build_catalog(items, |done, _| bar.set_position(done as u64));
    bar.finish_and_clear();
    info!(records = build.records.len(), skipped = build.skipped.len(), "Catalog built");

    let (export_path, export_error) =
        match export_catalog(&build.records, &config.output_dir, export_clock()) {
            Ok(path) => (Some(path), None),
            Err(e) => match e.classify().tier {
                ErrorTier::Recoverable => {
                    error!(error = %e, error_type = e.classify().error_type, "Export failed");
                    (None, Some(e.to_string()))
                }
                ErrorTier::Fatal => return Err(e),
            },
        };

    if !build.skipped.is_empty() {
        warn!(count = build.skipped.len(), "Some incidents were skipped");
    }

    let report = RunReport {
        summary: CatalogSummary::from_records(&build.records),
        records: build.records,
        skipped: build.skipped,
        export_path,
        export_error,
    };
    print!("{}", report.render());
    Ok(report)
}

impl RunReport {
    /// Closing console block: the summary, then where the catalog went, then
    /// any skipped incidents.
    pub fn render(&self) -> String {
        let mut out = self.summary.render();

        match (&self.export_path, &self.export_error) {
            (Some(path), _) => out.push_str(&format!(
                "\n{} Exported {} incidents to {}\n",
                style("✓").green(),
                self.records.len(),
                style(path.display()).white().bold(),
            )),
            (None, Some(e)) => out.push_str(&format!(
                "\n{} Export failed: {}\n",
                style("✗").red(),
                style(e).red(),
            )),
            (None, None) => {}
        }

        if !self.skipped.is_empty() {
            out.push_str(&format!("\n{} Skipped incidents:\n", style("⚠").yellow().bold()));
            for skipped in &self.skipped {
                out.push_str(&render_skipped(skipped));
                out.push('\n');
            }
        }
        out
    }
}

/// One console line for a skipped incident.
pub fn render_skipped(skipped: &SkippedIncident) -> String {
    format!(
        "  {} {}: {}",
        style("-").yellow(),
        style(&skipped.incident_id).yellow(),
        style(&skipped.reason).dim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(export_path: Option<PathBuf>, export_error: Option<String>) -> RunReport {
        RunReport {
            records: Vec::new(),
            skipped: vec![SkippedIncident {
                incident_id: "42".into(),
                reason: "Malformed incident: alerts: invalid type".into(),
            }],
            export_path,
            export_error,
            summary: CatalogSummary::from_records(&[]),
        }
    }

    #[test]
    fn test_render_orders_summary_export_then_skipped() {
        console::set_colors_enabled(false);
        let text = report(Some(PathBuf::from("out/catalog.csv")), None).render();

        let summary = text.find("Incidents with Recommended Actions").unwrap();
        let export = text.find("out/catalog.csv").unwrap();
        let skipped = text.find("Skipped incidents:").unwrap();
        assert!(summary < export);
        assert!(export < skipped);
        assert!(text.contains("  - 42: Malformed incident: alerts: invalid type"));
    }

    #[test]
    fn test_render_export_failure_after_summary() {
        console::set_colors_enabled(false);
        let text = report(None, Some("CSV error: read-only".into())).render();

        let summary = text.find("Incidents with Recommended Actions").unwrap();
        let failed = text.find("Export failed: CSV error: read-only").unwrap();
        assert!(summary < failed);
    }
}
