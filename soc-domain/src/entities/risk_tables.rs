// Risk tables entity
// Country-code sets consulted by the anomaly detector and the risk scorer

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::Severity;

const DEFAULT_HIGH_RISK_COUNTRIES: [&str; 19] = [
    "AF", "BY", "CN", "CU", "ER", "IQ", "IR", "KP", "LY", "MM", "NI", "RU", "SD", "SO", "SS",
    "SY", "VE", "YE", "ZW",
];

const DEFAULT_MEDIUM_RISK_COUNTRIES: [&str; 16] = [
    "BD", "BR", "DZ", "EG", "ID", "IN", "KZ", "MA", "NG", "PH", "PK", "RO", "TH", "TR", "UA",
    "VN",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RiskTableError {
    #[error("invalid country code '{0}', expected two letters")]
    InvalidCode(String),
    #[error("country code '{0}' is listed as both high and medium risk")]
    Overlap(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskTables {
    pub high_risk_countries: BTreeSet<String>,
    pub medium_risk_countries: BTreeSet<String>,
}

impl Default for RiskTables {
    fn default() -> Self {
        Self {
            high_risk_countries: DEFAULT_HIGH_RISK_COUNTRIES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            medium_risk_countries: DEFAULT_MEDIUM_RISK_COUNTRIES
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }
}

impl RiskTables {
    pub fn new<H, M>(high: H, medium: M) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            high_risk_countries: high.into_iter().map(Into::into).collect(),
            medium_risk_countries: medium.into_iter().map(Into::into).collect(),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            high_risk_countries: normalize_codes(&self.high_risk_countries),
            medium_risk_countries: normalize_codes(&self.medium_risk_countries),
        }
    }

    pub fn validate(&self) -> Result<(), RiskTableError> {
        for code in self
            .high_risk_countries
            .iter()
            .chain(self.medium_risk_countries.iter())
        {
            if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_uppercase()) {
                return Err(RiskTableError::InvalidCode(code.clone()));
            }
        }
        if let Some(code) = self
            .high_risk_countries
            .intersection(&self.medium_risk_countries)
            .next()
        {
            return Err(RiskTableError::Overlap(code.clone()));
        }
        Ok(())
    }

    pub fn is_high_risk(&self, code: &str) -> bool {
        self.high_risk_countries.contains(code)
    }

    /// High wins over medium when a code is in both sets.
    pub fn tier(&self, code: &str) -> Option<Severity> {
        if self.high_risk_countries.contains(code) {
            Some(Severity::High)
        } else if self.medium_risk_countries.contains(code) {
            Some(Severity::Medium)
        } else {
            None
        }
    }
}

fn normalize_codes(codes: &BTreeSet<String>) -> BTreeSet<String> {
    codes
        .iter()
        .map(|code| code.trim().to_ascii_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}
