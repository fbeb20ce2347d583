use chrono::{DateTime, FixedOffset, Utc};
use tracing::{error, info};

use crate::{AppError, AppState};
use soc_domain::services::{
    calculate_user_risk_scores, detect_anomalies, detect_rule_patterns, DetectionConfig,
};
use soc_domain::{AnalysisInput, AnalysisReport, AnalysisSummary, SeverityCounts};

pub async fn analyze(state: &AppState, input: AnalysisInput) -> Result<AnalysisReport, AppError> {
    let config = state.detection_config().await;
    let now = state.clock.now();
    let report = build_report(&input, &config, now);

    state
        .metrics
        .record_analysis(input.auth_events.len(), report.anomalies.len());
    info!(
        "analysis completed: events={}, anomalies={}, users={}, patterns={}",
        report.summary.events_analyzed,
        report.anomalies.len(),
        report.summary.users_scored,
        report.summary.rule_patterns
    );
    Ok(report)
}

pub async fn analyze_stored_snapshot(state: &AppState) -> Result<AnalysisReport, AppError> {
    let input = load_snapshot(state).await?;
    analyze(state, input).await
}

/// Loads all three collections through the snapshot port.
pub async fn load_snapshot(state: &AppState) -> Result<AnalysisInput, AppError> {
    let repo = &state.snapshot_repo;
    let loaded = async {
        Ok::<_, anyhow::Error>(AnalysisInput {
            auth_events: repo.load_auth_events().await?,
            mailbox_rules: repo.load_mailbox_rules().await?,
            risky_users: repo.load_risky_users().await?,
        })
    }
    .await;
    loaded.map_err(|err| {
        state.metrics.record_analysis_failure();
        error!("failed to load snapshot: {:#}", err);
        AppError::Internal(err)
    })
}

pub fn build_report(
    input: &AnalysisInput,
    config: &DetectionConfig,
    now: DateTime<FixedOffset>,
) -> AnalysisReport {
    let anomalies = detect_anomalies(&input.auth_events, config, now);
    let risk_scores = calculate_user_risk_scores(
        &input.auth_events,
        &input.mailbox_rules,
        &input.risky_users,
        config,
        now,
    );
    let rule_patterns = detect_rule_patterns(&input.mailbox_rules);

    let summary = AnalysisSummary {
        events_analyzed: input.auth_events.len(),
        mailbox_rules_analyzed: input.mailbox_rules.len(),
        users_scored: risk_scores.len(),
        anomalies: anomalies.iter().map(|anomaly| anomaly.severity).collect(),
        risk_levels: risk_scores
            .iter()
            .map(|score| score.level)
            .collect::<SeverityCounts>(),
        rule_patterns: rule_patterns.len(),
    };

    AnalysisReport {
        generated_at: now.with_timezone(&Utc),
        anomalies,
        risk_scores,
        rule_patterns,
        summary,
    }
}
