use async_trait::async_trait;

use crate::entities::{AuthEvent, MailboxRule, RiskTables, RiskyUserFlag};

/// Source of the three upstream collections analyzed together.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn load_auth_events(&self) -> anyhow::Result<Vec<AuthEvent>>;
    async fn load_mailbox_rules(&self) -> anyhow::Result<Vec<MailboxRule>>;
    async fn load_risky_users(&self) -> anyhow::Result<Vec<RiskyUserFlag>>;
}

#[async_trait]
pub trait RiskTableRepository: Send + Sync {
    async fn load_risk_tables(&self, path: &str) -> anyhow::Result<RiskTables>;
    async fn save_risk_tables(&self, path: &str, tables: &RiskTables) -> anyhow::Result<()>;
}
