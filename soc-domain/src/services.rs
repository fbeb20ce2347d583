// Domain services: pure analyses over a snapshot
pub mod anomaly_detector;
pub mod detection_config;
pub mod risk_scorer;
pub mod rule_patterns;

pub use anomaly_detector::*;
pub use detection_config::*;
pub use risk_scorer::*;
pub use rule_patterns::*;
