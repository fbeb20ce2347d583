use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use soc_domain::RuntimeConfig;

pub const CONFIG_ENV: &str = "SOC_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";
const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub auth_events_path: String,
    pub mailbox_rules_path: String,
    pub risky_users_path: String,
    pub risk_tables_path: String,
    /// Offset defining "local time" for hour and day rules; host offset when unset.
    pub utc_offset_minutes: Option<i32>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            auth_events_path: "./data/signins.json".to_string(),
            mailbox_rules_path: "./data/mailbox_rules.json".to_string(),
            risky_users_path: "./data/risky_users.json".to_string(),
            risk_tables_path: "./risk_tables.yaml".to_string(),
            utc_offset_minutes: None,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 15,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("failed to read {}", path))?;
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path))?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.auth_events_path = resolve_path(base, &self.auth_events_path);
        self.mailbox_rules_path = resolve_path(base, &self.mailbox_rules_path);
        self.risky_users_path = resolve_path(base, &self.risky_users_path);
        self.risk_tables_path = resolve_path(base, &self.risk_tables_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.auth_events_path.trim().is_empty() {
            return Err(anyhow!("auth_events_path must not be empty"));
        }
        if self.risk_tables_path.trim().is_empty() {
            return Err(anyhow!("risk_tables_path must not be empty"));
        }
        if let Some(minutes) = self.utc_offset_minutes {
            if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
                return Err(anyhow!("utc_offset_minutes out of range: {}", minutes));
            }
        }
        Ok(())
    }

    /// The configured offset, if any.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            auth_events_path: self.auth_events_path.clone(),
            mailbox_rules_path: self.mailbox_rules_path.clone(),
            risky_users_path: self.risky_users_path.clone(),
            risk_tables_path: self.risk_tables_path.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SOC_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("SOC_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("SOC_AUTH_EVENTS_PATH") {
            self.auth_events_path = value;
        }
        if let Some(value) = lookup("SOC_MAILBOX_RULES_PATH") {
            self.mailbox_rules_path = value;
        }
        if let Some(value) = lookup("SOC_RISKY_USERS_PATH") {
            self.risky_users_path = value;
        }
        if let Some(value) = lookup("SOC_RISK_TABLES_PATH") {
            self.risk_tables_path = value;
        }
        if let Some(value) = lookup("SOC_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes = value.trim().parse().ok().or(self.utc_offset_minutes);
        }
        if let Some(value) = lookup("SOC_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("SOC_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("SOC_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().expect("defaults");
    }

    #[test]
    fn parses_toml_with_partial_fields() {
        let config: AppConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:9000"
utc_offset_minutes = -300
"#,
        )
        .expect("toml");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.utc_offset_minutes, Some(-300));
        assert_eq!(config.risk_tables_path, "./risk_tables.yaml");
        assert_eq!(
            config.utc_offset(),
            FixedOffset::west_opt(5 * 3600)
        );
    }

    #[test]
    fn env_overrides_win_and_bad_numbers_are_ignored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SOC_BIND_ADDR", "127.0.0.1:8080"),
            ("SOC_API_TOKEN", "secret"),
            ("SOC_UTC_OFFSET_MINUTES", "540"),
            ("SOC_MAX_BODY_BYTES", "lots"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.utc_offset_minutes, Some(540));
        assert_eq!(config.max_body_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn blank_optionals_become_none() {
        let mut config = AppConfig {
            api_token: Some("  ".to_string()),
            log_dir: Some(String::new()),
            ..AppConfig::default()
        };
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut config = AppConfig {
            risky_users_path: "/abs/risky.json".to_string(),
            log_dir: Some("logs".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/soc")));
        assert_eq!(config.auth_events_path, "/etc/soc/./data/signins.json");
        assert_eq!(config.risky_users_path, "/abs/risky.json");
        assert_eq!(config.log_dir.as_deref(), Some("/etc/soc/logs"));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_addr = AppConfig {
            bind_addr: "not-an-addr".to_string(),
            ..AppConfig::default()
        };
        assert!(bad_addr.validate().is_err());

        let bad_offset = AppConfig {
            utc_offset_minutes: Some(15 * 60),
            ..AppConfig::default()
        };
        assert!(bad_offset.validate().is_err());

        let empty_body = AppConfig {
            max_body_bytes: 0,
            ..AppConfig::default()
        };
        assert!(empty_body.validate().is_err());

        let no_timeout = AppConfig {
            request_timeout_seconds: 0,
            ..AppConfig::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let path = env::temp_dir().join(format!("soc-missing-{}.toml", std::process::id()));
        let config = AppConfig::load_from(&path.to_string_lossy())
            .await
            .expect("defaults");
        assert_eq!(config.max_body_bytes, AppConfig::default().max_body_bytes);
        assert!(config.risk_tables_path.ends_with("risk_tables.yaml"));
    }
}
