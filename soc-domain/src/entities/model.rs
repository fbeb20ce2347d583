use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Anomaly, AuthEvent, MailboxRule, RiskyUserFlag, RulePattern, UserRiskScore};
use crate::value_objects::Severity;

/// One snapshot of the upstream collections, analyzed as a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    #[serde(default)]
    pub auth_events: Vec<AuthEvent>,
    #[serde(default)]
    pub mailbox_rules: Vec<MailboxRule>,
    #[serde(default)]
    pub risky_users: Vec<RiskyUserFlag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub anomalies: Vec<Anomaly>,
    pub risk_scores: Vec<UserRiskScore>,
    pub rule_patterns: Vec<RulePattern>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub events_analyzed: usize,
    pub mailbox_rules_analyzed: usize,
    pub users_scored: usize,
    pub anomalies: SeverityCounts,
    pub risk_levels: SeverityCounts,
    pub rule_patterns: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.critical + self.high + self.medium + self.low
    }
}

impl FromIterator<Severity> for SeverityCounts {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        let mut counts = SeverityCounts::default();
        for severity in iter {
            counts.record(severity);
        }
        counts
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnomalyQuery {
    pub severity: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RiskScoreQuery {
    pub min_score: Option<u32>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RulePatternQuery {
    pub min_severity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub auth_events_path: String,
    pub mailbox_rules_path: String,
    pub risky_users_path: String,
    pub risk_tables_path: String,
    pub utc_offset_minutes: Option<i32>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}
