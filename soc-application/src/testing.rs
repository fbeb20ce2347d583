use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use soc_domain::ports::{FixedClock, RiskTableRepository, SnapshotRepository};
use soc_domain::{
    AnalysisInput, AuthEvent, MailboxRule, RiskTables, RiskyUserFlag, RuntimeConfig,
    SignInLocation,
};
use tokio::sync::{Mutex, RwLock};

use crate::{AppState, Metrics};

#[derive(Default)]
pub struct MemorySnapshot {
    pub input: AnalysisInput,
    pub fail: bool,
}

#[async_trait]
impl SnapshotRepository for MemorySnapshot {
    async fn load_auth_events(&self) -> anyhow::Result<Vec<AuthEvent>> {
        if self.fail {
            anyhow::bail!("sign-in export unavailable");
        }
        Ok(self.input.auth_events.clone())
    }

    async fn load_mailbox_rules(&self) -> anyhow::Result<Vec<MailboxRule>> {
        Ok(self.input.mailbox_rules.clone())
    }

    async fn load_risky_users(&self) -> anyhow::Result<Vec<RiskyUserFlag>> {
        Ok(self.input.risky_users.clone())
    }
}

#[derive(Default)]
pub struct MemoryRiskTables {
    pub saved: Mutex<Vec<(String, RiskTables)>>,
}

#[async_trait]
impl RiskTableRepository for MemoryRiskTables {
    async fn load_risk_tables(&self, _path: &str) -> anyhow::Result<RiskTables> {
        Ok(RiskTables::default())
    }

    async fn save_risk_tables(&self, path: &str, tables: &RiskTables) -> anyhow::Result<()> {
        self.saved
            .lock()
            .await
            .push((path.to_string(), tables.clone()));
        Ok(())
    }
}

pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        auth_events_path: "signins.json".to_string(),
        mailbox_rules_path: "mailbox_rules.json".to_string(),
        risky_users_path: "risky_users.json".to_string(),
        risk_tables_path: "risk_tables.yaml".to_string(),
        utc_offset_minutes: None,
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 30,
    }
}

pub fn state_with(snapshot: MemorySnapshot, tables: Arc<MemoryRiskTables>) -> AppState {
    let now = DateTime::parse_from_rfc3339("2026-03-02T18:00:00Z").expect("now");
    AppState {
        config: runtime_config(),
        snapshot_repo: Arc::new(snapshot),
        risk_table_repo: tables,
        risk_tables: Arc::new(RwLock::new(RiskTables::default())),
        clock: Arc::new(FixedClock(now)),
        metrics: Arc::new(Metrics::default()),
    }
}

pub fn sign_in(user: &str, at: &str, country: Option<&str>, status: i64) -> AuthEvent {
    AuthEvent {
        user_principal_name: user.to_string(),
        user_display_name: None,
        created_date_time: at.to_string(),
        ip_address: "203.0.113.5".to_string(),
        location: country.map(|code| SignInLocation {
            city: None,
            country_or_region: Some(code.to_string()),
        }),
        status_error_code: status,
        risk_level_during_sign_in: None,
        app_display_name: "Exchange Online".to_string(),
    }
}

pub fn forwarding_rule(user: &str, address: &str) -> MailboxRule {
    MailboxRule {
        user_principal_name: user.to_string(),
        user_id: String::new(),
        display_name: "fwd".to_string(),
        is_forwarding: true,
        is_external_forwarding: true,
        is_suspicious: true,
        suspicious_reasons: vec!["Forwards externally".to_string()],
        forwarding_addresses: vec![address.to_string()],
        actions: None,
    }
}

/// Alice brute-forced, Bob in a high-risk country, three mailboxes forwarding out.
pub fn sample_input() -> AnalysisInput {
    let mut auth_events: Vec<AuthEvent> = (0..6)
        .map(|i| {
            sign_in(
                "alice@contoso.com",
                &format!("2026-03-02T09:{:02}:00Z", i * 5),
                None,
                50126,
            )
        })
        .collect();
    auth_events.push(sign_in("bob@contoso.com", "2026-03-02T10:00:00Z", Some("RU"), 0));
    auth_events.push(sign_in("carol@contoso.com", "2026-03-02T11:00:00Z", Some("US"), 0));
    AnalysisInput {
        auth_events,
        mailbox_rules: vec![
            forwarding_rule("alice@contoso.com", "x@evil.com"),
            forwarding_rule("bob@contoso.com", "x@evil.com"),
            forwarding_rule("carol@contoso.com", "X@EVIL.COM"),
        ],
        risky_users: Vec::new(),
    }
}
