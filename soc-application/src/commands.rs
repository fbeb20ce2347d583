// Commands: operations that run analyses or change state
pub mod analysis_commands;
pub mod risk_table_commands;
