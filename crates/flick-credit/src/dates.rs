//! Date parsing shared by the JSON payloads, the CSV importer and the CLI.
//!
//! The remote API serializes local date-times without an offset
//! (`2024-01-15T10:30:00`), while hand-maintained exports tend to carry plain
//! dates. Both are accepted, as is RFC 3339 with an offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        Some(value) if !value.trim().is_empty() => parse_datetime(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time '{value}'"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .expect("valid timestamp")
    }

    #[test]
    fn parses_api_local_datetimes() {
        assert_eq!(
            parse_datetime("2024-01-15T10:30:00"),
            Some(at(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parse_datetime("2024-01-15T10:30:00.123456"),
            Some(at(2024, 1, 15, 10, 30, 0) + chrono::Duration::microseconds(123_456))
        );
    }

    #[test]
    fn keeps_local_wall_clock_for_offsets() {
        assert_eq!(
            parse_datetime("2024-01-15T23:10:00-03:00"),
            Some(at(2024, 1, 15, 23, 10, 0))
        );
    }

    #[test]
    fn plain_dates_start_at_midnight() {
        assert_eq!(parse_datetime(" 2024-02-29 "), Some(at(2024, 2, 29, 0, 0, 0)));
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("15/01/2024"), None);
    }

    #[test]
    fn parse_date_reports_offending_value() {
        let err = parse_date("2024-13-01").expect_err("month 13 rejected");
        assert!(err.contains("2024-13-01"));
    }
}
