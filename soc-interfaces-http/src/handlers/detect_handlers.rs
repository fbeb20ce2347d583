use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use soc_application::commands::risk_table_commands;
use soc_application::queries::{
    anomaly_queries, risk_score_queries, risk_table_queries, rule_pattern_queries,
};
use soc_application::AppState;
use soc_domain::{
    Anomaly, AnomalyQuery, RiskScoreQuery, RiskTables, RulePattern, RulePatternQuery,
    UserRiskScore,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_anomalies(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AnomalyQuery>,
) -> Result<Json<Vec<Anomaly>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let rows = anomaly_queries::list_anomalies(&state, query).await?;
    Ok(Json(rows))
}

pub async fn list_risk_scores(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RiskScoreQuery>,
) -> Result<Json<Vec<UserRiskScore>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let scores = risk_score_queries::list_risk_scores(&state, query).await?;
    Ok(Json(scores))
}

pub async fn list_rule_patterns(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RulePatternQuery>,
) -> Result<Json<Vec<RulePattern>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let patterns = rule_pattern_queries::list_rule_patterns(&state, query).await?;
    Ok(Json(patterns))
}

pub async fn get_risk_tables(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RiskTables>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tables = risk_table_queries::get_risk_tables(&state).await?;
    Ok(Json(tables))
}

pub async fn update_risk_tables(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RiskTables>,
) -> Result<Json<RiskTables>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tables = risk_table_commands::update_risk_tables(&state, payload).await?;
    Ok(Json(tables))
}
