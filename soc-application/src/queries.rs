// Queries: read-only views over the stored snapshot
pub mod anomaly_queries;
pub mod risk_score_queries;
pub mod risk_table_queries;
pub mod rule_pattern_queries;
