use tracing::info;

use crate::{AppError, AppState};
use soc_domain::RiskTables;

/// Normalizes and validates the incoming tables, persists them, then swaps
/// them in for subsequent analyses.
pub async fn update_risk_tables(
    state: &AppState,
    incoming: RiskTables,
) -> Result<RiskTables, AppError> {
    let tables = incoming.normalized();
    tables.validate()?;

    state
        .risk_table_repo
        .save_risk_tables(&state.config.risk_tables_path, &tables)
        .await
        .map_err(AppError::Internal)?;

    *state.risk_tables.write().await = tables.clone();
    info!(
        "risk tables updated: high={}, medium={}",
        tables.high_risk_countries.len(),
        tables.medium_risk_countries.len()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::analysis_commands::analyze;
    use crate::testing::{sign_in, state_with, MemoryRiskTables, MemorySnapshot};
    use soc_domain::{AnalysisInput, AnomalyType};

    #[tokio::test]
    async fn update_normalizes_saves_and_swaps() {
        let repo = Arc::new(MemoryRiskTables::default());
        let state = state_with(MemorySnapshot::default(), repo.clone());

        let saved = update_risk_tables(&state, RiskTables::new([" fr "], ["de"]))
            .await
            .expect("update");
        assert!(saved.high_risk_countries.contains("FR"));
        assert!(saved.medium_risk_countries.contains("DE"));

        let writes = repo.saved.lock().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "risk_tables.yaml");
        assert_eq!(writes[0].1, saved);
        drop(writes);

        assert_eq!(*state.risk_tables.read().await, saved);
    }

    #[tokio::test]
    async fn analyses_use_the_new_tables() {
        let state = state_with(MemorySnapshot::default(), Arc::new(MemoryRiskTables::default()));
        update_risk_tables(&state, RiskTables::new(["FR"], Vec::<String>::new()))
            .await
            .expect("update");

        let input = AnalysisInput {
            auth_events: vec![
                sign_in("a@contoso.com", "2026-03-02T10:00:00Z", Some("FR"), 0),
                sign_in("b@contoso.com", "2026-03-02T10:00:00Z", Some("RU"), 0),
            ],
            ..AnalysisInput::default()
        };
        let report = analyze(&state, input).await.expect("report");
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].anomaly_type, AnomalyType::RiskyCountry);
        assert_eq!(report.anomalies[0].user_principal_name, "a@contoso.com");
    }

    #[tokio::test]
    async fn invalid_tables_are_rejected_untouched() {
        let repo = Arc::new(MemoryRiskTables::default());
        let state = state_with(MemorySnapshot::default(), repo.clone());

        let err = update_risk_tables(&state, RiskTables::new(["RUS"], Vec::<String>::new()))
            .await
            .expect_err("invalid code");
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = update_risk_tables(&state, RiskTables::new(["RU"], ["ru"]))
            .await
            .expect_err("overlap");
        assert!(matches!(err, AppError::BadRequest(_)));

        assert!(repo.saved.lock().await.is_empty());
        assert_eq!(*state.risk_tables.read().await, RiskTables::default());
    }
}
