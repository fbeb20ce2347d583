// Mailbox rule entity
// One inbox rule, already classified upstream (forwarding / suspicious)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::UserKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxRule {
    pub user_principal_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_forwarding: bool,
    #[serde(default)]
    pub is_external_forwarding: bool,
    #[serde(default)]
    pub is_suspicious: bool,
    #[serde(default)]
    pub suspicious_reasons: Vec<String>,
    #[serde(default)]
    pub forwarding_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<RuleActions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_to_folder: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl MailboxRule {
    pub fn user_key(&self) -> UserKey {
        UserKey::new(&self.user_principal_name)
    }

    pub fn deletes_messages(&self) -> bool {
        self.actions
            .as_ref()
            .map(|actions| {
                actions.delete.unwrap_or(false) || actions.permanent_delete.unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// Forwarding destinations, trimmed and lower-cased, blanks dropped.
    pub fn normalized_destinations(&self) -> impl Iterator<Item = String> + '_ {
        self.forwarding_addresses
            .iter()
            .map(|address| address.trim().to_lowercase())
            .filter(|address| !address.is_empty())
    }
}
