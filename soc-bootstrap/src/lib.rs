pub mod context;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::{analyze_once, run_standalone};
