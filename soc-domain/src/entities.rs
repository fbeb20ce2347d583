// Domain entities
pub mod anomaly;
pub mod auth_event;
pub mod mailbox_rule;
pub mod model;
pub mod risk_score;
pub mod risk_tables;
pub mod risky_user;
pub mod rule_pattern;

pub use anomaly::*;
pub use auth_event::*;
pub use mailbox_rule::*;
pub use model::*;
pub use risk_score::*;
pub use risk_tables::*;
pub use risky_user::*;
pub use rule_pattern::*;
