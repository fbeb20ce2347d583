// Authentication event entity
// One sign-in attempt as normalized by the upstream sign-in log fetcher

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::parse_timestamp;
use crate::value_objects::{RiskLevel, UserKey};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEvent {
    pub user_principal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_display_name: Option<String>,
    pub created_date_time: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SignInLocation>,
    #[serde(default)]
    pub status_error_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level_during_sign_in: Option<RiskLevel>,
    #[serde(default)]
    pub app_display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_or_region: Option<String>,
}

impl AuthEvent {
    pub fn user_key(&self) -> UserKey {
        UserKey::new(&self.user_principal_name)
    }

    /// `None` when the upstream timestamp cannot be parsed; such events are
    /// left out of every time-dependent rule.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_date_time)
    }

    pub fn is_failure(&self) -> bool {
        self.status_error_code != 0
    }

    /// Upper-cased country code, `None` when absent or blank.
    pub fn country_code(&self) -> Option<String> {
        self.location
            .as_ref()
            .and_then(|location| location.country_or_region.as_deref())
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_ascii_uppercase)
    }

    pub fn city(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|location| location.city.as_deref())
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.user_display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
