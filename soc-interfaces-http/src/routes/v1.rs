use axum::routing::{get, post};
use axum::Router;

use soc_application::AppState;

use crate::handlers::{analysis_handlers, detect_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/analyze", post(analysis_handlers::analyze))
        .route(
            "/v1/detect/anomalies",
            get(detect_handlers::list_anomalies),
        )
        .route(
            "/v1/detect/risk-scores",
            get(detect_handlers::list_risk_scores),
        )
        .route(
            "/v1/detect/rule-patterns",
            get(detect_handlers::list_rule_patterns),
        )
        .route(
            "/v1/detect/risk-tables",
            get(detect_handlers::get_risk_tables).put(detect_handlers::update_risk_tables),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
