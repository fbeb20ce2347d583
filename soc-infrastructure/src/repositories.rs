pub mod risk_table_files;
pub mod snapshot_files;

pub use risk_table_files::*;
pub use snapshot_files::*;
