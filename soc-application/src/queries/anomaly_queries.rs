use crate::commands::analysis_commands::load_snapshot;
use crate::{AppError, AppState};
use soc_domain::services::detect_anomalies;
use soc_domain::{Anomaly, AnomalyQuery, Severity, UserKey};

pub async fn list_anomalies(
    state: &AppState,
    query: AnomalyQuery,
) -> Result<Vec<Anomaly>, AppError> {
    let severity = parse_severity(query.severity.as_deref())?;
    let user = query
        .user
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserKey::new);

    let snapshot = load_snapshot(state).await?;
    let config = state.detection_config().await;
    let anomalies = detect_anomalies(&snapshot.auth_events, &config, state.clock.now());

    Ok(anomalies
        .into_iter()
        .filter(|anomaly| severity.map_or(true, |wanted| anomaly.severity == wanted))
        .filter(|anomaly| {
            user.as_ref()
                .map_or(true, |key| UserKey::new(&anomaly.user_principal_name) == *key)
        })
        .collect())
}

pub(crate) fn parse_severity(raw: Option<&str>) -> Result<Option<Severity>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => Severity::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("invalid severity '{}'", value))),
    }
}
