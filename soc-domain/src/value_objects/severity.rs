// Severity value object
// Shared by anomalies, risk score tiers and rule patterns

use serde::{Deserialize, Serialize};

pub const CRITICAL_SCORE_THRESHOLD: u32 = 70;
pub const HIGH_SCORE_THRESHOLD: u32 = 45;
pub const MEDIUM_SCORE_THRESHOLD: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Sort key, most severe first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn is_at_least(&self, other: Severity) -> bool {
        self.rank() <= other.rank()
    }

    pub fn from_risk_score(score: u32) -> Self {
        if score >= CRITICAL_SCORE_THRESHOLD {
            Severity::Critical
        } else if score >= HIGH_SCORE_THRESHOLD {
            Severity::High
        } else if score >= MEDIUM_SCORE_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }
}
