use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use soc_domain::{RiskTableRepository, RiskTables};

/// Country risk tables kept in a YAML file next to the config.
pub struct RiskTableFileRepository;

impl RiskTableFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RiskTableFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RiskTableRepository for RiskTableFileRepository {
    async fn load_risk_tables(&self, path: &str) -> anyhow::Result<RiskTables> {
        if !Path::new(path).exists() {
            warn!("{} not found, using built-in risk tables", path);
            return Ok(RiskTables::default());
        }
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path))?;
        let tables: RiskTables =
            serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path))?;
        let tables = tables.normalized();
        tables
            .validate()
            .with_context(|| format!("invalid risk tables in {}", path))?;
        Ok(tables)
    }

    async fn save_risk_tables(&self, path: &str, tables: &RiskTables) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_yaml::to_string(tables)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn scratch(name: &str) -> String {
        env::temp_dir()
            .join(format!("soc-risk-{}-{}", std::process::id(), name))
            .to_string_lossy()
            .to_string()
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let repo = RiskTableFileRepository::new();
        let tables = repo
            .load_risk_tables(&scratch("absent.yaml"))
            .await
            .expect("defaults");
        assert_eq!(tables, RiskTables::default());
    }

    #[tokio::test]
    async fn save_then_load_keeps_the_tables() {
        let dir = scratch("nested");
        let path = format!("{}/tables/risk.yaml", dir);
        let repo = RiskTableFileRepository::new();
        let tables = RiskTables::new(["KP", "IR"], ["BR"]);
        repo.save_risk_tables(&path, &tables).await.expect("save");

        let loaded = repo.load_risk_tables(&path).await.expect("load");
        assert_eq!(loaded, tables);
        fs::remove_dir_all(&dir).await.expect("cleanup");
    }

    #[tokio::test]
    async fn hand_edited_codes_are_normalized_and_checked() {
        let path = scratch("edited.yaml");
        fs::write(&path, "high_risk_countries: [ kp , ir ]\n")
            .await
            .expect("write");
        let repo = RiskTableFileRepository::new();
        let loaded = repo.load_risk_tables(&path).await.expect("load");
        assert!(loaded.is_high_risk("KP"));
        assert_eq!(loaded.medium_risk_countries, RiskTables::default().medium_risk_countries);

        fs::write(&path, "high_risk_countries: [RU]\nmedium_risk_countries: [RU]\n")
            .await
            .expect("write");
        assert!(repo.load_risk_tables(&path).await.is_err());
        fs::remove_file(&path).await.expect("cleanup");
    }
}
