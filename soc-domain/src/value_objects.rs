// Domain value objects
pub mod anomaly_type;
pub mod identifiers;
pub mod risk_level;
pub mod severity;

pub use anomaly_type::*;
pub use identifiers::*;
pub use risk_level::*;
pub use severity::*;
