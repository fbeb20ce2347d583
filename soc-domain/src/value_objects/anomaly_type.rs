// Anomaly type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    UnusualHour,
    RiskyCountry,
    FailedAttempts,
    MultipleCountries,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::UnusualHour => "unusual_hour",
            AnomalyType::RiskyCountry => "risky_country",
            AnomalyType::FailedAttempts => "failed_attempts",
            AnomalyType::MultipleCountries => "multiple_countries",
        }
    }
}
