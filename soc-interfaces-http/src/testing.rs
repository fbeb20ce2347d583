use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use chrono::DateTime;
use tokio::sync::RwLock;

use soc_application::{AppState, Metrics};
use soc_domain::{
    AuthEvent, FixedClock, MailboxRule, RiskTableRepository, RiskTables, RiskyUserFlag,
    RuntimeConfig, SnapshotRepository,
};

pub const TOKEN: &str = "analyst-token";

pub struct StaticSnapshot {
    pub auth_events: Vec<AuthEvent>,
    pub readable: bool,
}

#[async_trait]
impl SnapshotRepository for StaticSnapshot {
    async fn load_auth_events(&self) -> anyhow::Result<Vec<AuthEvent>> {
        if !self.readable {
            anyhow::bail!("permission denied");
        }
        Ok(self.auth_events.clone())
    }

    async fn load_mailbox_rules(&self) -> anyhow::Result<Vec<MailboxRule>> {
        Ok(Vec::new())
    }

    async fn load_risky_users(&self) -> anyhow::Result<Vec<RiskyUserFlag>> {
        Ok(Vec::new())
    }
}

pub struct DiscardTables;

#[async_trait]
impl RiskTableRepository for DiscardTables {
    async fn load_risk_tables(&self, _path: &str) -> anyhow::Result<RiskTables> {
        Ok(RiskTables::default())
    }

    async fn save_risk_tables(&self, _path: &str, _tables: &RiskTables) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn state(auth_events: Vec<AuthEvent>, readable: bool) -> AppState {
    let now = DateTime::parse_from_rfc3339("2026-03-02T18:00:00Z").expect("now");
    AppState {
        config: RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: Some(TOKEN.to_string()),
            auth_events_path: String::new(),
            mailbox_rules_path: String::new(),
            risky_users_path: String::new(),
            risk_tables_path: String::new(),
            utc_offset_minutes: Some(0),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 5,
        },
        snapshot_repo: Arc::new(StaticSnapshot {
            auth_events,
            readable,
        }),
        risk_table_repo: Arc::new(DiscardTables),
        risk_tables: Arc::new(RwLock::new(RiskTables::default())),
        clock: Arc::new(FixedClock(now)),
        metrics: Arc::new(Metrics::default()),
    }
}

pub fn authorized() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", TOKEN)).expect("header"),
    );
    headers
}

pub fn risky_sign_in(user: &str) -> AuthEvent {
    serde_json::from_value(serde_json::json!({
        "userPrincipalName": user,
        "createdDateTime": "2026-03-02T10:00:00Z",
        "location": {"countryOrRegion": "KP"}
    }))
    .expect("event")
}
