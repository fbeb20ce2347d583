// User risk score entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Severity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRiskScore {
    pub user_principal_name: String,
    pub display_name: String,
    pub score: u32,
    pub level: Severity,
    pub factors: Vec<RiskFactor>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub points: u32,
    pub description: String,
}
