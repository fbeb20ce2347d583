use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use soc_domain::{AuthEvent, MailboxRule, RiskyUserFlag, RuntimeConfig, SnapshotRepository};

/// Reads Graph-style JSON exports from disk on every load.
pub struct JsonSnapshotRepository {
    auth_events_path: String,
    mailbox_rules_path: String,
    risky_users_path: String,
}

impl JsonSnapshotRepository {
    pub fn new(
        auth_events_path: impl Into<String>,
        mailbox_rules_path: impl Into<String>,
        risky_users_path: impl Into<String>,
    ) -> Self {
        Self {
            auth_events_path: auth_events_path.into(),
            mailbox_rules_path: mailbox_rules_path.into(),
            risky_users_path: risky_users_path.into(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            config.auth_events_path.clone(),
            config.mailbox_rules_path.clone(),
            config.risky_users_path.clone(),
        )
    }
}

// Either a bare array or a Graph collection page.
#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    Bare(Vec<T>),
    Page { value: Vec<T> },
}

impl<T> Collection<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Collection::Bare(items) => items,
            Collection::Page { value } => value,
        }
    }
}

pub fn parse_collection<T: DeserializeOwned>(content: &str) -> anyhow::Result<Vec<T>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let collection: Collection<T> = serde_json::from_str(content)?;
    Ok(collection.into_items())
}

async fn read_collection<T: DeserializeOwned>(path: &str) -> anyhow::Result<Vec<T>> {
    if path.trim().is_empty() {
        return Ok(Vec::new());
    }
    if !Path::new(path).exists() {
        warn!("{} not found, treating as empty", path);
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    parse_collection(&content).with_context(|| format!("failed to parse {}", path))
}

#[async_trait]
impl SnapshotRepository for JsonSnapshotRepository {
    async fn load_auth_events(&self) -> anyhow::Result<Vec<AuthEvent>> {
        read_collection(&self.auth_events_path).await
    }

    async fn load_mailbox_rules(&self) -> anyhow::Result<Vec<MailboxRule>> {
        read_collection(&self.mailbox_rules_path).await
    }

    async fn load_risky_users(&self) -> anyhow::Result<Vec<RiskyUserFlag>> {
        read_collection(&self.risky_users_path).await
    }
}
