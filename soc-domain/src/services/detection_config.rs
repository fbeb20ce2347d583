use chrono::Duration;

use crate::entities::RiskTables;

pub const DEFAULT_SUSPICIOUS_HOUR_START: u32 = 0;
pub const DEFAULT_SUSPICIOUS_HOUR_END: u32 = 5;
pub const DEFAULT_FAILED_ATTEMPT_WINDOW_MINUTES: i64 = 60;
pub const DEFAULT_FAILED_ATTEMPT_THRESHOLD: usize = 5;
pub const DEFAULT_FAILED_ATTEMPT_CRITICAL_THRESHOLD: usize = 10;
pub const DEFAULT_MULTI_COUNTRY_THRESHOLD: usize = 3;

/// Tables and thresholds shared by the anomaly detector and the risk scorer.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    pub tables: RiskTables,
    /// Local hour window `[start, end)`; wraps past midnight when start > end.
    pub suspicious_hour_start: u32,
    pub suspicious_hour_end: u32,
    pub failed_attempt_window: Duration,
    pub failed_attempt_threshold: usize,
    pub failed_attempt_critical_threshold: usize,
    pub multi_country_threshold: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::with_tables(RiskTables::default())
    }
}

impl DetectionConfig {
    pub fn with_tables(tables: RiskTables) -> Self {
        Self {
            tables,
            suspicious_hour_start: DEFAULT_SUSPICIOUS_HOUR_START,
            suspicious_hour_end: DEFAULT_SUSPICIOUS_HOUR_END,
            failed_attempt_window: Duration::minutes(DEFAULT_FAILED_ATTEMPT_WINDOW_MINUTES),
            failed_attempt_threshold: DEFAULT_FAILED_ATTEMPT_THRESHOLD,
            failed_attempt_critical_threshold: DEFAULT_FAILED_ATTEMPT_CRITICAL_THRESHOLD,
            multi_country_threshold: DEFAULT_MULTI_COUNTRY_THRESHOLD,
        }
    }

    pub fn is_suspicious_hour(&self, hour: u32) -> bool {
        let (start, end) = (self.suspicious_hour_start, self.suspicious_hour_end);
        if start <= end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_midnight_to_five() {
        let config = DetectionConfig::default();
        assert!(config.is_suspicious_hour(0));
        assert!(config.is_suspicious_hour(4));
        assert!(!config.is_suspicious_hour(5));
        assert!(!config.is_suspicious_hour(23));
    }

    #[test]
    fn window_can_wrap_midnight() {
        let config = DetectionConfig {
            suspicious_hour_start: 22,
            suspicious_hour_end: 3,
            ..DetectionConfig::default()
        };
        assert!(config.is_suspicious_hour(23));
        assert!(config.is_suspicious_hour(2));
        assert!(!config.is_suspicious_hour(3));
        assert!(!config.is_suspicious_hour(12));
    }
}
