pub mod orchestrator;

pub use orchestrator::{render_skipped, run_catalog, RunReport};
