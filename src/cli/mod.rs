pub mod commands;
pub mod export;

pub use commands::{Cli, ExportArgs};
