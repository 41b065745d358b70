// crates/db/src/analysis.rs
//! The tag/sleep correlation pipeline.
//!
//! One SQL statement derives the per-sleep-date analysis table: tags are
//! grouped by start day, classified by the caffeine predicate, and
//! left-joined onto sleep scores via `previous_day`. Summary statistics
//! (min/max/mean/median/count partitions, hour-of-day histogram) are
//! computed on top of it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Database, DbResult};

/// Per-tag caffeine classification, shared by every query that needs it.
///
/// A tag qualifies when any one of the three conditions holds: the literal
/// 'Coffee' comment, one of the generic caffeine type codes, or the custom
/// 'Mate' tag. Evaluated per-tag, before grouping.
const CAFFEINE_PREDICATE: &str = "(
    comment = 'Coffee'
    OR tag_type_code IN ('tag_generic_coffee', 'tag_generic_caffeine')
    OR (tag_type_code = 'custom' AND custom_name = 'Mate')
)";

/// One row of the derived analysis table: a sleep date joined to the
/// previous calendar day's tag aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRow {
    pub sleep_date: NaiveDate,
    pub sleep_score: i64,
    /// Every comment logged on the previous day, in tag order (nulls kept).
    pub all_comments: Vec<Option<String>>,
    /// Every tag type code logged on the previous day, in tag order.
    pub all_tag_types: Vec<Option<String>>,
    pub previous_day_caffeine: bool,
    pub previous_day_caffeine_count: i64,
}

/// min/max/mean/median/count of sleep score over one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub count: usize,
}

impl ScoreStats {
    /// Compute the summary for one group. Returns `None` for an empty group.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("scores are finite"));

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            min: sorted[0],
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            median,
            count,
        })
    }
}

/// Sleep-score stats split by the binary caffeine flag. Either side is
/// `None` when no analysis row falls into it.
#[derive(Debug, Clone, Serialize)]
pub struct CaffeineSplitStats {
    pub caffeine: Option<ScoreStats>,
    pub no_caffeine: Option<ScoreStats>,
}

/// Sleep-score stats for one caffeine-count bucket. `bucket` is the exact
/// count rendered as text, or the synthetic `">0"` rollup.
#[derive(Debug, Clone, Serialize)]
pub struct CountBucketStats {
    pub bucket: String,
    #[serde(flatten)]
    pub stats: ScoreStats,
}

/// Caffeine-tag occurrences for one hour of day (0-23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u8,
    pub count: i64,
}

impl Database {
    /// Step 1 of the pipeline: the pure per-row date transform.
    /// Calendar-day subtraction with no timezone shift.
    pub async fn derive_previous_day(&self) -> DbResult<()> {
        sqlx::query("UPDATE sleep_score SET previous_day = date(day, '-1 day')")
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Steps 2-4: group tags by start day, classify, and left-join onto
    /// sleep scores. Drops and recreates the derived table; every run is a
    /// fresh batch.
    ///
    /// Unmatched sleep dates coalesce to `false`/`0`, never NULL, and the
    /// result is ordered by sleep date ascending (a correctness requirement
    /// for time-series charting downstream).
    pub async fn build_analysis_table(&self) -> DbResult<()> {
        sqlx::query("DROP TABLE IF EXISTS analysis")
            .execute(self.pool())
            .await?;

        let create = format!(
            r#"
            CREATE TABLE analysis AS
            WITH tag_days AS (
                SELECT
                    start_day,
                    SUM(CASE WHEN {p} THEN 1 ELSE 0 END) AS previous_day_caffeine_count,
                    MAX(CASE WHEN {p} THEN 1 ELSE 0 END) AS previous_day_caffeine,
                    json_group_array(comment) AS all_comments,
                    json_group_array(tag_type_code) AS all_tag_types
                FROM tags
                GROUP BY start_day
            )
            SELECT
                s.day AS sleep_date,
                s.score AS sleep_score,
                t.all_comments,
                t.all_tag_types,
                COALESCE(t.previous_day_caffeine, 0) AS previous_day_caffeine,
                COALESCE(t.previous_day_caffeine_count, 0) AS previous_day_caffeine_count
            FROM sleep_score s
            LEFT JOIN tag_days t
                ON s.previous_day = t.start_day
            ORDER BY s.day
            "#,
            p = CAFFEINE_PREDICATE
        );
        sqlx::query(&create).execute(self.pool()).await?;

        tracing::info!("Analysis table rebuilt");
        Ok(())
    }

    /// The derived table, ordered by sleep date ascending.
    pub async fn analysis_rows(&self) -> DbResult<Vec<AnalysisRow>> {
        let rows: Vec<(NaiveDate, i64, Option<String>, Option<String>, i64, i64)> =
            sqlx::query_as(
                r#"
                SELECT sleep_date, sleep_score, all_comments, all_tag_types,
                       previous_day_caffeine, previous_day_caffeine_count
                FROM analysis
                ORDER BY sleep_date
                "#,
            )
            .fetch_all(self.pool())
            .await?;

        rows.into_iter()
            .map(|(sleep_date, sleep_score, comments, tag_types, caffeine, count)| {
                Ok(AnalysisRow {
                    sleep_date,
                    sleep_score,
                    all_comments: parse_json_list(comments)?,
                    all_tag_types: parse_json_list(tag_types)?,
                    previous_day_caffeine: caffeine != 0,
                    previous_day_caffeine_count: count,
                })
            })
            .collect()
    }

    /// Sleep-score stats partitioned by the binary caffeine flag.
    pub async fn score_stats_by_caffeine(&self) -> DbResult<CaffeineSplitStats> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT previous_day_caffeine, sleep_score FROM analysis")
                .fetch_all(self.pool())
                .await?;

        let (caffeine, no_caffeine): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|(flag, _)| *flag != 0);
        let scores = |group: Vec<(i64, i64)>| -> Vec<f64> {
            group.into_iter().map(|(_, score)| score as f64).collect()
        };

        Ok(CaffeineSplitStats {
            caffeine: ScoreStats::from_scores(&scores(caffeine)),
            no_caffeine: ScoreStats::from_scores(&scores(no_caffeine)),
        })
    }

    /// Sleep-score stats per caffeine-count bucket, ascending, with the
    /// synthetic `">0"` rollup re-aggregating all nonzero-count rows
    /// appended last. The rollup is in addition to the per-count buckets,
    /// not a replacement.
    pub async fn score_stats_by_count(&self) -> DbResult<Vec<CountBucketStats>> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT previous_day_caffeine_count, sleep_score FROM analysis")
                .fetch_all(self.pool())
                .await?;

        let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        let mut nonzero: Vec<f64> = Vec::new();
        for (count, score) in rows {
            groups.entry(count).or_default().push(score as f64);
            if count > 0 {
                nonzero.push(score as f64);
            }
        }

        let mut buckets: Vec<CountBucketStats> = groups
            .into_iter()
            .filter_map(|(count, scores)| {
                ScoreStats::from_scores(&scores).map(|stats| CountBucketStats {
                    bucket: count.to_string(),
                    stats,
                })
            })
            .collect();

        if let Some(stats) = ScoreStats::from_scores(&nonzero) {
            buckets.push(CountBucketStats {
                bucket: ">0".to_string(),
                stats,
            });
        }

        Ok(buckets)
    }

    /// Caffeine-tag events bucketed by hour of day, zero-filled to all 24
    /// buckets. The hour comes from the literal time-of-day component of
    /// the tag's start timestamp; the date and UTC offset are discarded.
    pub async fn caffeine_hours(&self) -> DbResult<Vec<HourCount>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(&format!(
            r#"
            SELECT CAST(substr(start_time, 12, 2) AS INTEGER) AS hour, COUNT(*)
            FROM tags
            WHERE start_time IS NOT NULL
              AND length(start_time) >= 13
              AND {p}
            GROUP BY hour
            "#,
            p = CAFFEINE_PREDICATE
        ))
        .fetch_all(self.pool())
        .await?;

        let mut histogram: Vec<HourCount> =
            (0u8..24).map(|hour| HourCount { hour, count: 0 }).collect();
        for (hour, count) in rows {
            if (0..24).contains(&hour) {
                histogram[hour as usize].count = count;
            }
        }
        Ok(histogram)
    }
}

fn parse_json_list(value: Option<String>) -> DbResult<Vec<Option<String>>> {
    match value {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}
