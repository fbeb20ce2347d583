use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, FixedOffset, Utc};

use crate::entities::{AuthEvent, MailboxRule, RiskFactor, RiskyUserFlag, UserRiskScore};
use crate::services::DetectionConfig;
use crate::utils::local_hour;
use crate::value_objects::{RiskLevel, Severity, UserKey};

pub const MAX_RISK_SCORE: u32 = 100;

const FAILED_LOGIN_POINTS: u32 = 2;
const FAILED_LOGIN_CAP: u32 = 25;
const RISKY_COUNTRY_POINTS: u32 = 10;
const RISKY_COUNTRY_CAP: u32 = 30;
const UNUSUAL_HOUR_POINTS: u32 = 5;
const UNUSUAL_HOUR_CAP: u32 = 15;
const COUNTRY_SPREAD_MIN: usize = 3;
const COUNTRY_SPREAD_POINTS: u32 = 5;
const COUNTRY_SPREAD_CAP: u32 = 20;
const FLAG_HIGH_POINTS: u32 = 25;
const FLAG_MEDIUM_POINTS: u32 = 15;
const FLAG_LOW_POINTS: u32 = 5;
const EXTERNAL_FORWARDING_POINTS: u32 = 15;
const EXTERNAL_FORWARDING_CAP: u32 = 25;
const SUSPICIOUS_RULE_POINTS: u32 = 5;
const SUSPICIOUS_RULE_CAP: u32 = 15;

/// Scores every user that appears in `events`, highest score first.
///
/// Each score is an additive, capped sum of named factors so an analyst can
/// trace every point. Mailbox rules and risky-user flags only enrich users
/// already present in the sign-in batch.
pub fn calculate_user_risk_scores(
    events: &[AuthEvent],
    mailbox_rules: &[MailboxRule],
    risky_flags: &[RiskyUserFlag],
    config: &DetectionConfig,
    now: DateTime<FixedOffset>,
) -> Vec<UserRiskScore> {
    let offset = *now.offset();
    let last_updated = now.with_timezone(&Utc);

    let mut profiles: Vec<SignInProfile> = Vec::new();
    let mut index: HashMap<UserKey, usize> = HashMap::new();
    for event in events {
        let key = event.user_key();
        let pos = *index.entry(key).or_insert_with(|| {
            profiles.push(SignInProfile::new(&event.user_principal_name));
            profiles.len() - 1
        });
        profiles[pos].record(event, config, &offset);
    }

    let flags = flag_levels(risky_flags);
    let mailboxes = mailbox_exposure(mailbox_rules);

    let mut scores: Vec<UserRiskScore> = profiles
        .into_iter()
        .map(|profile| {
            let key = UserKey::new(&profile.user_principal_name);
            let mut factors = profile.factors();
            if let Some(factor) = flags.get(&key).and_then(|level| flag_factor(*level)) {
                factors.push(factor);
            }
            if let Some(factor) = mailboxes.get(&key).and_then(MailboxExposure::factor) {
                factors.push(factor);
            }
            let total: u32 = factors.iter().map(|factor| factor.points).sum();
            let score = total.min(MAX_RISK_SCORE);
            UserRiskScore {
                display_name: profile
                    .display_name
                    .unwrap_or_else(|| profile.user_principal_name.clone()),
                user_principal_name: profile.user_principal_name,
                score,
                level: Severity::from_risk_score(score),
                factors,
                last_updated,
            }
        })
        .collect();
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

struct SignInProfile {
    user_principal_name: String,
    display_name: Option<String>,
    failed: usize,
    risky_countries: BTreeSet<String>,
    risky_country_logins: usize,
    unusual_hour_logins: usize,
    countries: BTreeSet<String>,
}

impl SignInProfile {
    fn new(user_principal_name: &str) -> Self {
        Self {
            user_principal_name: user_principal_name.to_string(),
            display_name: None,
            failed: 0,
            risky_countries: BTreeSet::new(),
            risky_country_logins: 0,
            unusual_hour_logins: 0,
            countries: BTreeSet::new(),
        }
    }

    fn record(&mut self, event: &AuthEvent, config: &DetectionConfig, offset: &FixedOffset) {
        if self.display_name.is_none() {
            self.display_name = event.display_name().map(ToString::to_string);
        }
        if event.is_failure() {
            self.failed += 1;
        }
        if let Some(country) = event.country_code() {
            if config.tables.is_high_risk(&country) {
                self.risky_country_logins += 1;
                self.risky_countries.insert(country.clone());
            }
            self.countries.insert(country);
        }
        if let Some(occurred_at) = event.occurred_at() {
            if config.is_suspicious_hour(local_hour(occurred_at, offset)) {
                self.unusual_hour_logins += 1;
            }
        }
    }

    fn factors(&self) -> Vec<RiskFactor> {
        let mut factors = Vec::new();
        push_factor(
            &mut factors,
            "Failed logins",
            capped(self.failed, FAILED_LOGIN_POINTS, FAILED_LOGIN_CAP),
            format!("{} failed sign-in attempts", self.failed),
        );
        push_factor(
            &mut factors,
            "Risky-country logins",
            capped(self.risky_country_logins, RISKY_COUNTRY_POINTS, RISKY_COUNTRY_CAP),
            format!(
                "{} sign-ins from high-risk countries ({})",
                self.risky_country_logins,
                join(&self.risky_countries)
            ),
        );
        push_factor(
            &mut factors,
            "Unusual-hour logins",
            capped(self.unusual_hour_logins, UNUSUAL_HOUR_POINTS, UNUSUAL_HOUR_CAP),
            format!(
                "{} sign-ins during off-hours local time",
                self.unusual_hour_logins
            ),
        );
        if self.countries.len() >= COUNTRY_SPREAD_MIN {
            push_factor(
                &mut factors,
                "Geographic spread",
                capped(
                    self.countries.len() - (COUNTRY_SPREAD_MIN - 1),
                    COUNTRY_SPREAD_POINTS,
                    COUNTRY_SPREAD_CAP,
                ),
                format!(
                    "Sign-ins from {} distinct countries ({})",
                    self.countries.len(),
                    join(&self.countries)
                ),
            );
        }
        factors
    }
}

#[derive(Default)]
struct MailboxExposure {
    external_forwarding: usize,
    suspicious: usize,
}

impl MailboxExposure {
    /// External forwarding outranks the generic suspicious-rule signal.
    fn factor(&self) -> Option<RiskFactor> {
        if self.external_forwarding > 0 {
            return Some(RiskFactor {
                name: "Mailbox exfiltration risk".to_string(),
                points: capped(
                    self.external_forwarding,
                    EXTERNAL_FORWARDING_POINTS,
                    EXTERNAL_FORWARDING_CAP,
                ),
                description: format!(
                    "{} inbox rules forward mail to external addresses",
                    self.external_forwarding
                ),
            });
        }
        if self.suspicious > 0 {
            return Some(RiskFactor {
                name: "Mailbox exfiltration risk".to_string(),
                points: capped(self.suspicious, SUSPICIOUS_RULE_POINTS, SUSPICIOUS_RULE_CAP),
                description: format!("{} inbox rules flagged as suspicious", self.suspicious),
            });
        }
        None
    }
}

fn mailbox_exposure(rules: &[MailboxRule]) -> HashMap<UserKey, MailboxExposure> {
    let mut exposure: HashMap<UserKey, MailboxExposure> = HashMap::new();
    for rule in rules {
        let entry = exposure.entry(rule.user_key()).or_default();
        if rule.is_external_forwarding {
            entry.external_forwarding += 1;
        }
        if rule.is_suspicious {
            entry.suspicious += 1;
        }
    }
    exposure
}

/// Keeps the strongest level when a user is flagged more than once.
fn flag_levels(flags: &[RiskyUserFlag]) -> HashMap<UserKey, RiskLevel> {
    let mut levels: HashMap<UserKey, RiskLevel> = HashMap::new();
    for flag in flags {
        let entry = levels.entry(flag.user_key()).or_insert(flag.risk_level);
        if flag_points(flag.risk_level) > flag_points(*entry) {
            *entry = flag.risk_level;
        }
    }
    levels
}

fn flag_points(level: RiskLevel) -> u32 {
    match level {
        RiskLevel::High => FLAG_HIGH_POINTS,
        RiskLevel::Medium => FLAG_MEDIUM_POINTS,
        RiskLevel::Low => FLAG_LOW_POINTS,
        RiskLevel::None | RiskLevel::Hidden | RiskLevel::Unknown => 0,
    }
}

fn flag_factor(level: RiskLevel) -> Option<RiskFactor> {
    let points = flag_points(level);
    if points == 0 {
        return None;
    }
    Some(RiskFactor {
        name: "External risk flag".to_string(),
        points,
        description: format!("Flagged as {} risk by identity protection", level.as_str()),
    })
}

fn push_factor(factors: &mut Vec<RiskFactor>, name: &str, points: u32, description: String) {
    if points > 0 {
        factors.push(RiskFactor {
            name: name.to_string(),
            points,
            description,
        });
    }
}

fn capped(count: usize, per_item: u32, cap: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_item)
        .min(cap)
}

fn join(codes: &BTreeSet<String>) -> String {
    codes.iter().cloned().collect::<Vec<_>>().join(", ")
}
