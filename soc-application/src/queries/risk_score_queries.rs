use crate::commands::analysis_commands::load_snapshot;
use crate::queries::anomaly_queries::parse_severity;
use crate::{AppError, AppState};
use soc_domain::services::{calculate_user_risk_scores, MAX_RISK_SCORE};
use soc_domain::{RiskScoreQuery, UserRiskScore};

pub async fn list_risk_scores(
    state: &AppState,
    query: RiskScoreQuery,
) -> Result<Vec<UserRiskScore>, AppError> {
    let level = parse_severity(query.level.as_deref())?;
    let min_score = query.min_score.unwrap_or(0);
    if min_score > MAX_RISK_SCORE {
        return Err(AppError::BadRequest(format!(
            "min_score must be <= {}",
            MAX_RISK_SCORE
        )));
    }

    let snapshot = load_snapshot(state).await?;
    let config = state.detection_config().await;
    let scores = calculate_user_risk_scores(
        &snapshot.auth_events,
        &snapshot.mailbox_rules,
        &snapshot.risky_users,
        &config,
        state.clock.now(),
    );

    Ok(scores
        .into_iter()
        .filter(|score| score.score >= min_score)
        .filter(|score| level.map_or(true, |wanted| score.level == wanted))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{sample_input, state_with, MemoryRiskTables, MemorySnapshot};

    fn stored() -> AppState {
        let snapshot = MemorySnapshot {
            input: sample_input(),
            fail: false,
        };
        state_with(snapshot, Arc::new(MemoryRiskTables::default()))
    }

    #[tokio::test]
    async fn min_score_drops_quiet_users() {
        let all = list_risk_scores(&stored(), RiskScoreQuery::default())
            .await
            .expect("scores");
        assert_eq!(all.len(), 3);

        // alice: 6 failures (12) + external forwarding (15)
        let query = RiskScoreQuery {
            min_score: Some(26),
            level: None,
        };
        let busy = list_risk_scores(&stored(), query).await.expect("scores");
        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].user_principal_name, "alice@contoso.com");
        assert_eq!(busy[0].score, 27);
    }

    #[tokio::test]
    async fn level_filter_and_bounds() {
        let query = RiskScoreQuery {
            min_score: None,
            level: Some("medium".to_string()),
        };
        let medium = list_risk_scores(&stored(), query).await.expect("scores");
        assert!(medium.iter().all(|score| (20..45).contains(&score.score)));
        assert_eq!(medium.len(), 2);

        let query = RiskScoreQuery {
            min_score: Some(101),
            level: None,
        };
        let err = list_risk_scores(&stored(), query).await.expect_err("bounds");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
