use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;

use soc_application::{AppState, Metrics};
use soc_domain::RiskTableRepository;
use soc_infrastructure::{
    AppConfig, JsonSnapshotRepository, RiskTableFileRepository, SystemClock,
};

pub struct AppContext {
    pub config: AppConfig,
    pub state: AppState,
}

impl AppContext {
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let risk_table_repo = Arc::new(RiskTableFileRepository::new());
        let risk_tables = risk_table_repo
            .load_risk_tables(&runtime_config.risk_tables_path)
            .await?;
        let clock = SystemClock::from_offset(config.utc_offset());
        info!(
            "risk tables loaded: high={}, medium={}, utc_offset={}",
            risk_tables.high_risk_countries.len(),
            risk_tables.medium_risk_countries.len(),
            clock.offset()
        );

        let state = AppState {
            snapshot_repo: Arc::new(JsonSnapshotRepository::from_config(&runtime_config)),
            config: runtime_config,
            risk_table_repo,
            risk_tables: Arc::new(RwLock::new(risk_tables)),
            clock: Arc::new(clock),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { config, state })
    }
}
