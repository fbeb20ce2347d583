// Risky user flag entity
// External identity-protection signal, zero or one per user

use serde::{Deserialize, Serialize};

use crate::value_objects::{RiskLevel, UserKey};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskyUserFlag {
    pub user_principal_name: String,
    pub risk_level: RiskLevel,
}

impl RiskyUserFlag {
    pub fn user_key(&self) -> UserKey {
        UserKey::new(&self.user_principal_name)
    }
}
