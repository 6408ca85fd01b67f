pub mod incident;
pub mod record;

pub use incident::*;
pub use record::*;
