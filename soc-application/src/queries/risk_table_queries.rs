use crate::{AppError, AppState};
use soc_domain::RiskTables;

pub async fn get_risk_tables(state: &AppState) -> Result<RiskTables, AppError> {
    let tables = state.risk_tables.read().await;
    Ok(tables.clone())
}
