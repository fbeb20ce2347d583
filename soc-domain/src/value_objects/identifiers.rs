// Identifier value objects

use serde::{Deserialize, Serialize};

/// Case-insensitive identity key derived from a user principal name.
///
/// Sign-in logs, inbox rules and identity-protection flags come from
/// different APIs and do not agree on casing, so every cross-collection
/// lookup goes through this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(user_principal_name: &str) -> Self {
        Self(user_principal_name.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
