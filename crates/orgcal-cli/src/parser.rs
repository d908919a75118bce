use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses an RFC 3339 timestamp, falling back to natural language
/// ("next monday 7pm") relative to `now`.
pub fn parse_timestamp(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(parsed.with_timezone(&Utc));
    }
    parse_date_string(input, now, Dialect::Us)
        .map_err(|e| anyhow::anyhow!("Failed to parse time '{}': {}", input, e))
}
