pub mod analysis_handlers;
pub mod detect_handlers;
pub mod ops_handlers;

pub use analysis_handlers::*;
pub use detect_handlers::*;
pub use ops_handlers::*;
