//! Duration normalization and aggregation.
//!
//! Every duration in the system funnels through [`parse_duration_value`]
//! before arithmetic; it is the single normalization point for the
//! inconsistent units the producers emit. The parser is total: for any input
//! it returns canonical seconds or `None`, and it never panics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::song::RawDuration;

static MS_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+)\s*ms\s*$").expect("valid regex"));
static COLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*$").expect("valid regex"));

/// Parse a duration field of unknown shape into canonical seconds.
///
/// Recognized forms, in precedence order:
/// 1. Numeric value >= 1000: milliseconds, `round(value / 1000)`.
/// 2. Numeric value < 1000: seconds.
/// 3. `"<digits> ms"` (case-insensitive): milliseconds, truncating division.
/// 4. `"mm:ss"` or `"hh:mm:ss"`.
/// 5. Digit-only string: seconds.
/// 6. Empty/whitespace string or `"unknown"` (any case): unparseable.
/// 7. Anything else (including negatives, booleans, arrays): unparseable.
///
/// The numeric millisecond path rounds while the string `"N ms"` path
/// truncates. The asymmetry is inherited behavior and deliberately kept;
/// do not unify the two paths.
pub fn parse_duration_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => parse_numeric(n.as_f64()?),
        Value::String(s) => parse_text(s),
        _ => None,
    }
}

/// Parse a typed wire duration. See [`parse_duration_value`].
pub fn parse_raw_duration(duration: &RawDuration) -> Option<i64> {
    match duration {
        RawDuration::Int(v) => parse_numeric(*v as f64),
        RawDuration::Float(v) => parse_numeric(*v),
        RawDuration::Text(s) => parse_text(s),
    }
}

fn parse_numeric(v: f64) -> Option<i64> {
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    // Heuristic: large numbers are milliseconds, small ones already seconds.
    if v >= 1000.0 {
        Some((v / 1000.0).round() as i64)
    } else {
        Some(v as i64)
    }
}

fn parse_text(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return None;
    }

    // "123456 ms" (truncating, unlike the numeric path)
    if let Some(caps) = MS_SUFFIX_RE.captures(trimmed) {
        let ms: i64 = caps[1].parse().ok()?;
        return Some(ms / 1000);
    }

    // "mm:ss" or "hh:mm:ss"
    if let Some(caps) = COLON_RE.captures(trimmed) {
        let first: i64 = caps[1].parse().ok()?;
        let second: i64 = caps[2].parse().ok()?;
        return match caps.get(3) {
            Some(sec) => {
                let sec: i64 = sec.as_str().parse().ok()?;
                Some(first * 3600 + second * 60 + sec)
            }
            None => Some(first * 60 + second),
        };
    }

    // Plain digit string: already seconds
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse().ok();
    }

    None
}

/// Render seconds as a human-readable summary.
///
/// Nonzero components among hours/minutes/seconds are rendered and joined by
/// spaces, each pluralized when its value is not 1. Zero-valued higher units
/// are omitted, except that seconds are always shown when nothing else is:
/// `0` is `"0 sec"`, `61` is `"1 min 1 sec"`, `7200` is `"2 hrs"`.
pub fn humanize_seconds(total: i64) -> String {
    if total <= 0 {
        return "0 sec".to_string();
    }
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(pluralize(hours, "hr"));
    }
    if minutes > 0 {
        parts.push(pluralize(minutes, "min"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(pluralize(seconds, "sec"));
    }
    parts.join(" ")
}

fn pluralize(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

/// Total-duration result for one collection of song records.
///
/// Invariant: `count_songs + skipped` equals the number of records examined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    /// Sum of all parseable durations, in canonical seconds
    pub total_seconds: i64,
    /// Human-readable rendering of `total_seconds`
    pub readable: String,
    /// Records whose duration parsed
    pub count_songs: usize,
    /// Records that were not object-shaped or whose duration did not parse
    pub skipped: usize,
    /// Set when the user has no stored collection at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DurationSummary {
    /// Zero-song summary, used when no stored collection exists.
    pub fn empty() -> Self {
        Self {
            total_seconds: 0,
            readable: humanize_seconds(0),
            count_songs: 0,
            skipped: 0,
            note: None,
        }
    }
}

/// Fold a collection of raw records into a [`DurationSummary`].
///
/// A record that is not object-shaped counts as skipped, as does one whose
/// `duration` field is missing or unparseable. The fold is pure,
/// deterministic, and order-independent.
pub fn summarize_records(records: &[Value]) -> DurationSummary {
    let mut total_seconds = 0i64;
    let mut count_songs = 0usize;
    let mut skipped = 0usize;

    for record in records {
        let Some(fields) = record.as_object() else {
            skipped += 1;
            continue;
        };
        let duration = fields.get("duration").unwrap_or(&Value::Null);
        match parse_duration_value(duration) {
            Some(seconds) => {
                // The parser accepts any i64-sized digit run; the fold must
                // stay total even for absurd inputs.
                total_seconds = total_seconds.saturating_add(seconds);
                count_songs += 1;
            }
            None => skipped += 1,
        }
    }

    DurationSummary {
        total_seconds,
        readable: humanize_seconds(total_seconds),
        count_songs,
        skipped,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Option<i64> {
        parse_duration_value(&value)
    }

    #[test]
    fn colon_forms() {
        assert_eq!(parse(json!("3:30")), Some(210));
        assert_eq!(parse(json!("01:02:03")), Some(3723));
        assert_eq!(parse(json!("0:59")), Some(59));
        assert_eq!(parse(json!("  10:00  ")), Some(600));
    }

    #[test]
    fn ms_suffix_truncates_but_numeric_rounds() {
        // 242667 ms is 242.667s: the string path truncates, the numeric
        // path rounds. Both behaviors are load-bearing.
        assert_eq!(parse(json!("242667 ms")), Some(242));
        assert_eq!(parse(json!(242667)), Some(243));
        assert_eq!(parse(json!("242667MS")), Some(242));
        assert_eq!(parse(json!("  999 ms ")), Some(0));
    }

    #[test]
    fn numeric_unit_heuristic() {
        assert_eq!(parse(json!(999)), Some(999));
        assert_eq!(parse(json!(1000)), Some(1));
        assert_eq!(parse(json!(210)), Some(210));
        assert_eq!(parse(json!(210.9)), Some(210)); // sub-1000 floats truncate
    }

    #[test]
    fn digit_strings_are_seconds() {
        assert_eq!(parse(json!("210")), Some(210));
        assert_eq!(parse(json!("5")), Some(5));
    }

    #[test]
    fn unparseable_inputs() {
        assert_eq!(parse(json!(null)), None);
        assert_eq!(parse(json!("")), None);
        assert_eq!(parse(json!("   ")), None);
        assert_eq!(parse(json!("unknown")), None);
        assert_eq!(parse(json!("UNKNOWN")), None);
        assert_eq!(parse(json!("three minutes")), None);
        assert_eq!(parse(json!("3:3")), None); // seconds must be two digits
        assert_eq!(parse(json!("-5")), None);
        assert_eq!(parse(json!(-5)), None);
        assert_eq!(parse(json!(true)), None);
        assert_eq!(parse(json!([210])), None);
        assert_eq!(parse(json!({"seconds": 210})), None);
    }

    #[test]
    fn totality_over_garbage() {
        // Every input produces a non-negative result or None; nothing panics.
        let inputs = vec![
            json!(0),
            json!(-0.5),
            json!(1e18),
            json!("99:99"),
            json!("1:00:00"),
            json!("ms"),
            json!(" ms "),
            json!("12 ms extra"),
            json!("00:00"),
            json!("999999999999999999999999"),
        ];
        for input in inputs {
            if let Some(seconds) = parse(input.clone()) {
                assert!(seconds >= 0, "negative seconds for {input}");
            }
        }
    }

    #[test]
    fn typed_durations_parse_like_raw_values() {
        assert_eq!(parse_raw_duration(&RawDuration::Int(242667)), Some(243));
        assert_eq!(
            parse_raw_duration(&RawDuration::Text("242667 ms".into())),
            Some(242)
        );
        assert_eq!(parse_raw_duration(&RawDuration::Float(210.0)), Some(210));
        assert_eq!(
            parse_raw_duration(&RawDuration::Text("unknown".into())),
            None
        );
    }

    #[test]
    fn humanize_formats() {
        assert_eq!(humanize_seconds(0), "0 sec");
        assert_eq!(humanize_seconds(-10), "0 sec");
        assert_eq!(humanize_seconds(1), "1 sec");
        assert_eq!(humanize_seconds(59), "59 secs");
        assert_eq!(humanize_seconds(60), "1 min");
        assert_eq!(humanize_seconds(61), "1 min 1 sec");
        assert_eq!(humanize_seconds(3661), "1 hr 1 min 1 sec");
        assert_eq!(humanize_seconds(7200), "2 hrs");
        assert_eq!(humanize_seconds(3600), "1 hr");
        assert_eq!(humanize_seconds(3720), "1 hr 2 mins");
    }

    fn mixed_collection() -> Vec<Value> {
        vec![
            json!({"title": "A", "artist": "x", "genre": "Pop", "duration": "3:30"}),
            json!({"title": "B", "artist": "y", "genre": "Rock", "duration": 242667}),
            json!({"title": "C", "artist": "z", "genre": "Jazz", "duration": "unknown"}),
            json!({"title": "D", "artist": "w", "genre": "Pop"}),
            json!("not a record"),
            json!({"title": "E", "artist": "v", "genre": "Pop", "duration": "90"}),
        ]
    }

    #[test]
    fn aggregator_counts_and_total() {
        let summary = summarize_records(&mixed_collection());
        assert_eq!(summary.total_seconds, 210 + 243 + 90);
        assert_eq!(summary.count_songs, 3);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.readable, humanize_seconds(summary.total_seconds));
    }

    #[test]
    fn aggregator_conservation() {
        let records = mixed_collection();
        let summary = summarize_records(&records);
        assert_eq!(summary.count_songs + summary.skipped, records.len());

        let empty = summarize_records(&[]);
        assert_eq!(empty.count_songs + empty.skipped, 0);
        assert_eq!(empty.readable, "0 sec");
    }

    #[test]
    fn aggregator_saturates_instead_of_overflowing() {
        // i64::MAX as a digit string; parses as seconds on the digit path
        let max_digits = "9223372036854775807";
        let records = vec![
            json!({"title": "A", "artist": "x", "genre": "Pop", "duration": max_digits}),
            json!({"title": "B", "artist": "y", "genre": "Pop", "duration": max_digits}),
            json!({"title": "C", "artist": "z", "genre": "Pop", "duration": "3:30"}),
        ];
        let summary = summarize_records(&records);
        assert_eq!(summary.total_seconds, i64::MAX);
        assert_eq!(summary.count_songs, 3);
        assert_eq!(summary.count_songs + summary.skipped, records.len());
    }

    #[test]
    fn aggregator_is_order_independent() {
        let records = mixed_collection();
        let forward = summarize_records(&records);
        let mut reversed = records.clone();
        reversed.reverse();
        let backward = summarize_records(&reversed);
        assert_eq!(forward.total_seconds, backward.total_seconds);
        assert_eq!(forward.count_songs, backward.count_songs);
        assert_eq!(forward.skipped, backward.skipped);
    }

    #[test]
    fn summary_note_round_trips_only_when_set() {
        let mut summary = DurationSummary::empty();
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("note").is_none());

        summary.note = Some("No liked songs file for user 'ana'.".into());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["note"], json!("No liked songs file for user 'ana'."));
    }
}
