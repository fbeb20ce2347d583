use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde_json::json;

use crate::entities::{Anomaly, AuthEvent};
use crate::services::DetectionConfig;
use crate::utils::{format_timestamp, local_hour, local_midnight};
use crate::value_objects::{AnomalyType, Severity, UserKey};

/// Scans one batch of sign-in events and returns deduplicated findings,
/// most severe first and newest first within a severity.
///
/// `now` is the reference instant: its offset defines "local" time for the
/// hour rule and its calendar day bounds the multiple-countries rule.
pub fn detect_anomalies(
    events: &[AuthEvent],
    config: &DetectionConfig,
    now: DateTime<FixedOffset>,
) -> Vec<Anomaly> {
    let offset = *now.offset();
    let mut findings = Findings::default();

    for event in events {
        let occurred_at = event.occurred_at();
        if let Some(country) = event.country_code() {
            if let Some(tier) = config.tables.tier(&country) {
                findings.push(build_risky_country(event, &country, tier), occurred_at);
            }
        }
        let Some(occurred_at) = occurred_at else {
            continue;
        };
        if config.is_suspicious_hour(local_hour(occurred_at, &offset)) {
            findings.push(build_unusual_hour(event, occurred_at, &offset), Some(occurred_at));
        }
    }

    for (anomaly, anchored_at) in detect_failure_bursts(events, config) {
        findings.push(anomaly, Some(anchored_at));
    }

    let generated_at = now.with_timezone(&Utc);
    for anomaly in detect_multiple_countries(events, config, now) {
        findings.push(anomaly, Some(generated_at));
    }

    findings.into_sorted()
}

/// Failed-attempt rule. Events are visited newest first so that a burst is
/// anchored at its last (largest) count; anything within one window of an
/// existing anchor for the same user belongs to that burst and is skipped.
fn detect_failure_bursts(
    events: &[AuthEvent],
    config: &DetectionConfig,
) -> Vec<(Anomaly, DateTime<Utc>)> {
    let window = config.failed_attempt_window;
    let failures = failure_timeline(events);
    if failures.is_empty() {
        return Vec::new();
    }

    let mut timeline: Vec<(&AuthEvent, DateTime<Utc>)> = events
        .iter()
        .filter_map(|event| event.occurred_at().map(|at| (event, at)))
        .collect();
    timeline.sort_by(|a, b| b.1.cmp(&a.1));

    let mut anchors: HashMap<UserKey, Vec<DateTime<Utc>>> = HashMap::new();
    let mut bursts = Vec::new();
    for (event, occurred_at) in timeline {
        let key = event.user_key();
        let Some(times) = failures.get(&key) else {
            continue;
        };
        let start = occurred_at
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let failed = count_in_window(times, start, occurred_at);
        if failed < config.failed_attempt_threshold {
            continue;
        }
        let user_anchors = anchors.entry(key).or_default();
        if user_anchors
            .iter()
            .any(|anchor| within(*anchor, occurred_at, window))
        {
            continue;
        }
        user_anchors.push(occurred_at);
        let severity = if failed >= config.failed_attempt_critical_threshold {
            Severity::Critical
        } else {
            Severity::High
        };
        bursts.push((
            build_failed_attempts(event, failed, severity, window),
            occurred_at,
        ));
    }
    bursts
}

fn detect_multiple_countries(
    events: &[AuthEvent],
    config: &DetectionConfig,
    now: DateTime<FixedOffset>,
) -> Vec<Anomaly> {
    let midnight = local_midnight(now);
    let now_utc = now.with_timezone(&Utc);
    let day = now.date_naive().format("%Y-%m-%d").to_string();

    let mut order: Vec<UserKey> = Vec::new();
    let mut today: HashMap<UserKey, (String, BTreeSet<String>)> = HashMap::new();
    for event in events {
        let Some(occurred_at) = event.occurred_at() else {
            continue;
        };
        if occurred_at < midnight || occurred_at > now_utc {
            continue;
        }
        let Some(country) = event.country_code() else {
            continue;
        };
        let key = event.user_key();
        let entry = today.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (event.user_principal_name.clone(), BTreeSet::new())
        });
        entry.1.insert(country);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let (user_principal_name, countries) = today.remove(&key)?;
            if countries.len() < config.multi_country_threshold {
                return None;
            }
            let listed = countries.iter().cloned().collect::<Vec<_>>();
            let mut details = BTreeMap::new();
            details.insert("countries".to_string(), json!(listed));
            details.insert("countryCount".to_string(), json!(listed.len()));
            details.insert("date".to_string(), json!(day));
            Some(Anomaly {
                id: anomaly_id(AnomalyType::MultipleCountries, &key, &day),
                anomaly_type: AnomalyType::MultipleCountries,
                severity: Severity::High,
                title: "Sign-ins from multiple countries".to_string(),
                description: format!(
                    "{} signed in from {} countries today ({})",
                    user_principal_name,
                    listed.len(),
                    listed.join(", ")
                ),
                user_principal_name,
                timestamp: format_timestamp(now_utc),
                details,
            })
        })
        .collect()
}

fn build_risky_country(event: &AuthEvent, country: &str, tier: Severity) -> Anomaly {
    let label = if tier == Severity::High {
        "high-risk"
    } else {
        "elevated-risk"
    };
    let place = match event.city() {
        Some(city) => format!("{}, {}", city, country),
        None => country.to_string(),
    };
    let mut details = event_details(event);
    details.insert("country".to_string(), json!(country));
    details.insert("riskTier".to_string(), json!(tier.as_str()));
    Anomaly {
        id: anomaly_id(
            AnomalyType::RiskyCountry,
            &event.user_key(),
            &format!("{}-{}", event.created_date_time.trim(), country),
        ),
        anomaly_type: AnomalyType::RiskyCountry,
        severity: tier,
        title: format!("Sign-in from {} country", label),
        description: format!(
            "{} signed in from {}{}",
            event.user_principal_name,
            place,
            ip_suffix(event)
        ),
        user_principal_name: event.user_principal_name.clone(),
        timestamp: event.created_date_time.clone(),
        details,
    }
}

fn build_unusual_hour(
    event: &AuthEvent,
    occurred_at: DateTime<Utc>,
    offset: &FixedOffset,
) -> Anomaly {
    let local = occurred_at.with_timezone(offset);
    let mut details = event_details(event);
    details.insert("localTime".to_string(), json!(local.format("%H:%M").to_string()));
    details.insert("localHour".to_string(), json!(local_hour(occurred_at, offset)));
    if let Some(country) = event.country_code() {
        details.insert("country".to_string(), json!(country));
    }
    Anomaly {
        id: anomaly_id(
            AnomalyType::UnusualHour,
            &event.user_key(),
            &event.created_date_time,
        ),
        anomaly_type: AnomalyType::UnusualHour,
        severity: Severity::Medium,
        title: "Sign-in at unusual hour".to_string(),
        description: format!(
            "{} signed in at {} local time{}",
            event.user_principal_name,
            local.format("%H:%M"),
            ip_suffix(event)
        ),
        user_principal_name: event.user_principal_name.clone(),
        timestamp: event.created_date_time.clone(),
        details,
    }
}

fn build_failed_attempts(
    event: &AuthEvent,
    failed: usize,
    severity: Severity,
    window: Duration,
) -> Anomaly {
    let mut details = event_details(event);
    details.insert("failedAttempts".to_string(), json!(failed));
    details.insert("windowMinutes".to_string(), json!(window.num_minutes()));
    Anomaly {
        id: anomaly_id(
            AnomalyType::FailedAttempts,
            &event.user_key(),
            &event.created_date_time,
        ),
        anomaly_type: AnomalyType::FailedAttempts,
        severity,
        title: "Repeated failed sign-ins".to_string(),
        description: format!(
            "{} failed sign-in attempts for {} within {} minutes",
            failed,
            event.user_principal_name,
            window.num_minutes()
        ),
        user_principal_name: event.user_principal_name.clone(),
        timestamp: event.created_date_time.clone(),
        details,
    }
}

fn event_details(event: &AuthEvent) -> BTreeMap<String, serde_json::Value> {
    let mut details = BTreeMap::new();
    details.insert("ipAddress".to_string(), json!(event.ip_address));
    details.insert("appDisplayName".to_string(), json!(event.app_display_name));
    details.insert("statusErrorCode".to_string(), json!(event.status_error_code));
    if let Some(city) = event.city() {
        details.insert("city".to_string(), json!(city));
    }
    if let Some(level) = event.risk_level_during_sign_in {
        details.insert("riskLevelDuringSignIn".to_string(), json!(level.as_str()));
    }
    details
}

fn ip_suffix(event: &AuthEvent) -> String {
    let ip = event.ip_address.trim();
    if ip.is_empty() {
        String::new()
    } else {
        format!(" (IP {})", ip)
    }
}

fn anomaly_id(kind: AnomalyType, user: &UserKey, anchor: &str) -> String {
    format!("{}-{}-{}", kind.as_str(), user.as_str(), anchor.trim())
}

fn failure_timeline(events: &[AuthEvent]) -> HashMap<UserKey, Vec<DateTime<Utc>>> {
    let mut timeline: HashMap<UserKey, Vec<DateTime<Utc>>> = HashMap::new();
    for event in events.iter().filter(|event| event.is_failure()) {
        if let Some(occurred_at) = event.occurred_at() {
            timeline.entry(event.user_key()).or_default().push(occurred_at);
        }
    }
    for times in timeline.values_mut() {
        times.sort();
    }
    timeline
}

/// Number of sorted instants in `(start, end]`.
fn count_in_window(sorted: &[DateTime<Utc>], start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
    let upper = sorted.partition_point(|at| *at <= end);
    let lower = sorted.partition_point(|at| *at <= start);
    upper.saturating_sub(lower)
}

fn within(a: DateTime<Utc>, b: DateTime<Utc>, window: Duration) -> bool {
    a.signed_duration_since(b).num_milliseconds().abs() <= window.num_milliseconds()
}

#[derive(Default)]
struct Findings {
    entries: Vec<(Anomaly, Option<DateTime<Utc>>)>,
    index: HashMap<String, usize>,
}

impl Findings {
    /// Same id replaces the earlier finding in place.
    fn push(&mut self, anomaly: Anomaly, at: Option<DateTime<Utc>>) {
        match self.index.get(&anomaly.id) {
            Some(&pos) => self.entries[pos] = (anomaly, at),
            None => {
                self.index.insert(anomaly.id.clone(), self.entries.len());
                self.entries.push((anomaly, at));
            }
        }
    }

    fn into_sorted(mut self) -> Vec<Anomaly> {
        self.entries.sort_by(|(a, a_at), (b, b_at)| {
            a.severity
                .rank()
                .cmp(&b.severity.rank())
                .then_with(|| b_at.cmp(a_at))
        });
        self.entries.into_iter().map(|(anomaly, _)| anomaly).collect()
    }
}
