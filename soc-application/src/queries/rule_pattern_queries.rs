use crate::commands::analysis_commands::load_snapshot;
use crate::queries::anomaly_queries::parse_severity;
use crate::{AppError, AppState};
use soc_domain::services::detect_rule_patterns;
use soc_domain::{RulePattern, RulePatternQuery};

pub async fn list_rule_patterns(
    state: &AppState,
    query: RulePatternQuery,
) -> Result<Vec<RulePattern>, AppError> {
    let min_severity = parse_severity(query.min_severity.as_deref())?;
    let snapshot = load_snapshot(state).await?;
    Ok(detect_rule_patterns(&snapshot.mailbox_rules)
        .into_iter()
        .filter(|pattern| min_severity.map_or(true, |floor| pattern.severity.is_at_least(floor)))
        .collect())
}
