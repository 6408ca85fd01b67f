pub mod flatten;
pub mod export;

pub use flatten::{build_catalog, flatten_incident, CatalogBuild, SkippedIncident};
pub use export::{catalog_file_name, export_catalog, write_catalog};
