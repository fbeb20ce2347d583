// Rule pattern entity
// A mailbox rule shape shared by two or more mailboxes

use serde::{Deserialize, Serialize};

use crate::value_objects::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    pub pattern: String,
    pub users: Vec<String>,
    pub severity: Severity,
}
