use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::errors::CatalogError;
use crate::models::record::FlatRecord;

pub const FILE_PREFIX: &str = "IncidentCatalog_WithActions_";

/// Build the export file name for a run started at `now`. Second resolution;
/// two runs within the same second produce the same name.
pub fn catalog_file_name(now: DateTime<Local>) -> String {
    format!("{}{}.csv", FILE_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// Write records to `path` as UTF-8 CSV with a header row. Multi-line cells
/// are quoted so a conformant reader gets the original text back.
pub fn write_catalog(records: &[FlatRecord], path: &Path) -> Result<(), CatalogError> {
    let mut writer = csv::Writer::from_path(path)?;

    if records.is_empty() {
        // serialize() only emits the header alongside the first row
        writer.write_record(FlatRecord::COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .flush()
        .map_err(|e| CatalogError::Export(format!("Failed to flush {}: {}", path.display(), e)))?;
    Ok(())
}

/// Export the catalog into `output_dir` under a timestamped name.
pub fn export_catalog(
    records: &[FlatRecord],
    output_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, CatalogError> {
    let path = output_dir.join(catalog_file_name(now));
    write_catalog(records, &path)?;
    info!(path = %path.display(), rows = records.len(), "Catalog exported");
    Ok(path)
}
