// crates/core/src/types.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level envelope for vendor responses and persisted data files:
/// `{ "data": [ ... ], "next_token": ... }`.
///
/// Persisted files never carry `next_token`; API responses use it for
/// pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            next_token: None,
        }
    }
}

/// Intraday sample series attached to a sleep record (5-minute heart-rate
/// or HRV samples). `items` preserves interior nulls so sample positions
/// stay aligned with the recording interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    #[serde(default)]
    pub interval: Option<f64>,
    pub items: Vec<Option<f64>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One night from the `sleep` collection. Scalar summary fields are kept
/// for the base table; the nested sample series feed the time-series view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: String,
    pub day: NaiveDate,
    #[serde(default)]
    pub bedtime_start: Option<String>,
    #[serde(default)]
    pub bedtime_end: Option<String>,
    #[serde(default)]
    pub average_heart_rate: Option<f64>,
    #[serde(default)]
    pub average_hrv: Option<f64>,
    #[serde(default)]
    pub total_sleep_duration: Option<i64>,
    #[serde(default)]
    pub efficiency: Option<i64>,
    #[serde(default)]
    pub heart_rate: Option<SampleSeries>,
    #[serde(default)]
    pub hrv: Option<SampleSeries>,
}

/// One row from the `daily_sleep` collection: the nightly sleep score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepScoreRecord {
    pub id: String,
    pub day: NaiveDate,
    pub score: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One user-logged event from the `enhanced_tag` collection.
///
/// Every field except `id` and `start_day` is nullable in practice:
/// free-text tags have a `comment` and no `tag_type_code`, picker tags have
/// a `tag_type_code` and usually no comment, and only `custom` tags carry a
/// `custom_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: String,
    pub start_day: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_day: Option<NaiveDate>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub tag_type_code: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
}

impl TagRecord {
    /// Minimal constructor used by tests and fixtures.
    pub fn on_day(id: impl Into<String>, start_day: NaiveDate) -> Self {
        Self {
            id: id.into(),
            start_day,
            start_time: None,
            end_day: None,
            end_time: None,
            comment: None,
            tag_type_code: None,
            custom_name: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_type_code(mut self, code: impl Into<String>) -> Self {
        self.tag_type_code = Some(code.into());
        self
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn with_start_time(mut self, ts: impl Into<String>) -> Self {
        self.start_time = Some(ts.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    #[test]
    fn test_sleep_record_optional_series() {
        let json = r#"{
            "id": "sl-1",
            "day": "2024-01-02",
            "average_hrv": 52.0,
            "heart_rate": { "interval": 300.0, "items": [55.0, null, 54.0], "timestamp": "2024-01-01T23:00:00+02:00" }
        }"#;
        let rec: SleepRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.day, date("2024-01-02"));
        assert_eq!(rec.average_hrv, Some(52.0));
        let hr = rec.heart_rate.expect("heart_rate present");
        assert_eq!(hr.items, vec![Some(55.0), None, Some(54.0)]);
        assert!(rec.hrv.is_none());
    }

    #[test]
    fn test_tag_record_minimal_json() {
        // Picker tag: no comment, no custom name.
        let json = r#"{"id": "tag-1", "start_day": "2024-01-01", "tag_type_code": "tag_generic_coffee"}"#;
        let rec: TagRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.start_day, date("2024-01-01"));
        assert_eq!(rec.tag_type_code.as_deref(), Some("tag_generic_coffee"));
        assert!(rec.comment.is_none());
        assert!(rec.custom_name.is_none());
    }

    #[test]
    fn test_envelope_roundtrip_without_next_token() {
        let env = DataEnvelope::new(vec![SleepScoreRecord {
            id: "ds-1".into(),
            day: date("2024-01-02"),
            score: 80,
            timestamp: None,
        }]);
        let json = serde_json::to_string(&env).unwrap();
        assert!(!json.contains("next_token"));
        let back: DataEnvelope<SleepScoreRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data.len(), 1);
        assert_eq!(back.data[0].score, 80);
    }

    #[test]
    fn test_envelope_parses_next_token() {
        let json = r#"{"data": [], "next_token": "abc123"}"#;
        let env: DataEnvelope<TagRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(env.next_token.as_deref(), Some("abc123"));
    }
}
