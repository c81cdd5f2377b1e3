use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{TrendsError, TrendsResult};

/// One reported count for one region on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEntry {
    pub region_id: u32,
    /// `NaN` when the feed value is not a readable integer.
    pub infected: f64,
}

/// All entries reported for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDailyRecord {
    pub day: NaiveDate,
    pub entries: Vec<RawEntry>,
}

impl RawDailyRecord {
    #[must_use]
    pub fn new(day: NaiveDate, entries: Vec<RawEntry>) -> Self {
        Self { day, entries }
    }

    /// Date label shown on the chart, `YYYY.MM.DD`.
    #[must_use]
    pub fn label(&self) -> String {
        self.day.format("%Y.%m.%d").to_string()
    }
}

#[derive(Debug, Deserialize)]
struct RawDatasetWire {
    days: Vec<RawDayWire>,
}

#[derive(Debug, Deserialize)]
struct RawDayWire {
    day: String,
    #[serde(default)]
    list: Vec<RawEntryWire>,
}

#[derive(Debug, Deserialize)]
struct RawEntryWire {
    #[serde(default)]
    id: Option<LooseInteger>,
    #[serde(default)]
    infected: Option<LooseInteger>,
}

/// Feed values arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseInteger {
    Number(serde_json::Number),
    Text(String),
}

impl LooseInteger {
    fn to_integer(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
            Self::Text(text) => parse_leading_integer(text),
        }
    }
}

/// Reads an optionally signed run of leading digits, ignoring leading whitespace.
fn parse_leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses the daily feed payload `{ "days": [ { "day", "list": [ { "id", "infected" } ] } ] }`.
///
/// Entries with an unreadable id are dropped; unreadable counts become `NaN`.
pub fn parse_raw_dataset(input: &str) -> TrendsResult<Vec<RawDailyRecord>> {
    let wire: RawDatasetWire =
        serde_json::from_str(input).map_err(|e| TrendsError::Parse(format!("{e}")))?;

    let mut records = Vec::with_capacity(wire.days.len());
    for day in wire.days {
        let date = NaiveDate::parse_from_str(day.day.trim(), "%Y-%m-%d").map_err(|e| {
            TrendsError::Parse(format!("invalid day label `{}`: {e}", day.day))
        })?;

        let mut entries = Vec::with_capacity(day.list.len());
        for entry in day.list {
            let Some(region_id) = entry
                .id
                .as_ref()
                .and_then(LooseInteger::to_integer)
                .and_then(|id| u32::try_from(id).ok())
            else {
                trace!(day = %date, "dropping feed entry with unreadable id");
                continue;
            };
            let infected = entry
                .infected
                .as_ref()
                .and_then(LooseInteger::to_integer)
                .map_or(f64::NAN, |v| v as f64);
            entries.push(RawEntry {
                region_id,
                infected,
            });
        }
        records.push(RawDailyRecord::new(date, entries));
    }

    debug!(days = records.len(), "parsed raw dataset");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_integer_follows_prefix_rules() {
        assert_eq!(parse_leading_integer("42"), Some(42));
        assert_eq!(parse_leading_integer("  7 cases"), Some(7));
        assert_eq!(parse_leading_integer("-3"), Some(-3));
        assert_eq!(parse_leading_integer("3.9"), Some(3));
        assert_eq!(parse_leading_integer("n/a"), None);
        assert_eq!(parse_leading_integer(""), None);
    }

    #[test]
    fn mixed_wire_types_are_accepted() {
        let payload = r#"{"days":[{"day":"2020-04-01","list":[
            {"id":"101","infected":"12"},
            {"id":102,"infected":5},
            {"id":"103","infected":"?"},
            {"id":"x","infected":"1"}
        ]}]}"#;
        let records = parse_raw_dataset(payload).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label(), "2020.04.01");
        let entries = &records[0].entries;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], RawEntry { region_id: 101, infected: 12.0 });
        assert_eq!(entries[1], RawEntry { region_id: 102, infected: 5.0 });
        assert!(entries[2].infected.is_nan());
    }

    #[test]
    fn malformed_day_is_a_parse_error() {
        let payload = r#"{"days":[{"day":"April 1st","list":[]}]}"#;
        let err = parse_raw_dataset(payload).expect_err("bad date");
        assert!(matches!(err, TrendsError::Parse(_)));
    }
}
