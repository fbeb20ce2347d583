use std::sync::Arc;

use soc_domain::ports::{Clock, RiskTableRepository, SnapshotRepository};
use soc_domain::services::DetectionConfig;
use soc_domain::{RiskTables, RuntimeConfig};
use tokio::sync::RwLock;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub snapshot_repo: Arc<dyn SnapshotRepository>,
    pub risk_table_repo: Arc<dyn RiskTableRepository>,
    pub risk_tables: Arc<RwLock<RiskTables>>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Detection settings built from the risk tables in effect right now.
    pub async fn detection_config(&self) -> DetectionConfig {
        let tables = { self.risk_tables.read().await.clone() };
        DetectionConfig::with_tables(tables)
    }
}
