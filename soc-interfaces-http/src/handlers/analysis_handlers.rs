use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::warn;

use soc_application::commands::analysis_commands;
use soc_application::AppState;
use soc_domain::AnalysisReport;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_analysis_input};

pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<AnalysisReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let input = parse_analysis_input(&headers, &body).map_err(|err| {
        warn!("failed to parse analysis body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let report = analysis_commands::analyze(&state, input).await?;
    Ok(Json(report))
}
