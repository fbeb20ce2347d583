use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc};

/// Parses an upstream ISO-8601 instant. Offset-less values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn local_hour(ts: DateTime<Utc>, offset: &FixedOffset) -> u32 {
    ts.with_timezone(offset).hour()
}

/// Start of the reference instant's calendar day, in its own offset.
pub fn local_midnight(now: DateTime<FixedOffset>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let offset_secs = i64::from(now.offset().local_minus_utc());
    Utc.from_utc_datetime(&(midnight - Duration::seconds(offset_secs)))
}
