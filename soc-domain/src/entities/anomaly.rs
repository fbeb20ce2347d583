// Anomaly entity
// Represents a detected anomaly/suspicious activity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{AnomalyType, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub id: String,
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub user_principal_name: String,
    pub timestamp: String,
    pub details: BTreeMap<String, serde_json::Value>,
}
