use std::io::Read;

use anyhow::Result;
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use soc_domain::{AnalysisInput, RuntimeConfig};

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Decodes an analysis request body, gunzipping it first when flagged.
pub fn parse_analysis_input(headers: &HeaderMap, body: &[u8]) -> Result<AnalysisInput> {
    let content = maybe_gunzip(headers, body)?;
    if content.trim().is_empty() {
        return Ok(AnalysisInput::default());
    }
    Ok(serde_json::from_str(&content)?)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("").eq_ignore_ascii_case("gzip") {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn config(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: token.map(ToString::to_string),
            auth_events_path: String::new(),
            mailbox_rules_path: String::new(),
            risky_users_path: String::new(),
            risk_tables_path: String::new(),
            utc_offset_minutes: None,
            max_body_bytes: 1024,
            request_timeout_seconds: 5,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("header"),
        );
        headers
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize(&config(None), &HeaderMap::new()));
    }

    #[test]
    fn token_must_match_exactly() {
        let config = config(Some("s3cret"));
        assert!(authorize(&config, &bearer("s3cret")));
        assert!(!authorize(&config, &bearer("other")));
        assert!(!authorize(&config, &HeaderMap::new()));

        let mut basic = HeaderMap::new();
        basic.insert("Authorization", HeaderValue::from_static("Basic s3cret"));
        assert!(!authorize(&config, &basic));
    }

    #[test]
    fn parses_plain_and_gzipped_bodies() {
        let body = br#"{"authEvents": [{"userPrincipalName": "a@contoso.com", "createdDateTime": "2026-03-02T10:00:00Z"}]}"#;
        let plain = parse_analysis_input(&HeaderMap::new(), body).expect("plain");
        assert_eq!(plain.auth_events.len(), 1);
        assert!(plain.mailbox_rules.is_empty());

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body).expect("gzip");
        let compressed = encoder.finish().expect("gzip");
        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        let gzipped = parse_analysis_input(&headers, &compressed).expect("gzipped");
        assert_eq!(gzipped.auth_events.len(), 1);
    }

    #[test]
    fn empty_body_is_an_empty_snapshot_and_junk_is_rejected() {
        let empty = parse_analysis_input(&HeaderMap::new(), b"").expect("empty");
        assert!(empty.auth_events.is_empty());
        assert!(parse_analysis_input(&HeaderMap::new(), b"[1, 2").is_err());
    }
}
