// crates/db/src/ingest.rs
//! File-to-table ingest: read the persisted collection files and load them
//! into the three base tables, then run the per-row `previous_day`
//! transform on sleep_score.
//!
//! Ingest replaces table contents wholesale; each run is a fresh batch.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use oura_view_core::types::DataEnvelope;
use oura_view_core::{LoadError, OuraConfig, SleepRecord, SleepScoreRecord, TagRecord};

use crate::{Database, DbResult};

/// The three persisted collection files for one date range.
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub sleep: PathBuf,
    pub sleep_scores: PathBuf,
    pub tags: PathBuf,
}

impl DataFiles {
    /// Resolve the date-stamped file paths for the configured range and
    /// verify they exist.
    pub fn locate(config: &OuraConfig) -> Result<Self, LoadError> {
        let files = Self {
            sleep: config.data_file("sleep_data"),
            sleep_scores: config.data_file("sleep_score_data"),
            tags: config.data_file("tags_data"),
        };
        for path in [&files.sleep, &files.sleep_scores, &files.tags] {
            if !path.exists() {
                return Err(LoadError::not_found(path));
            }
        }
        Ok(files)
    }
}

/// Row counts loaded by one ingest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub sleep: usize,
    pub sleep_scores: usize,
    pub tags: usize,
}

/// Scalar columns of one sleep row (the nested sample series live in the
/// time-series view, not the relational store).
#[derive(Debug, Clone, serde::Serialize)]
pub struct SleepSummaryRow {
    pub id: String,
    pub day: chrono::NaiveDate,
    pub bedtime_start: Option<String>,
    pub bedtime_end: Option<String>,
    pub average_heart_rate: Option<f64>,
    pub average_hrv: Option<f64>,
    pub total_sleep_duration: Option<i64>,
    pub efficiency: Option<i64>,
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile { path: path.into() });
    }
    let envelope: DataEnvelope<T> =
        serde_json::from_slice(&bytes).map_err(|e| LoadError::malformed_json(path, &e))?;
    Ok(envelope.data)
}

impl Database {
    /// Load the three data files into the base tables.
    pub async fn ingest(&self, files: &DataFiles) -> DbResult<IngestSummary> {
        let sleep: Vec<SleepRecord> = read_envelope(&files.sleep)?;
        let sleep_scores: Vec<SleepScoreRecord> = read_envelope(&files.sleep_scores)?;
        let tags: Vec<TagRecord> = read_envelope(&files.tags)?;

        let summary = IngestSummary {
            sleep: sleep.len(),
            sleep_scores: sleep_scores.len(),
            tags: tags.len(),
        };

        let mut tx = self.pool().begin().await?;

        // Fresh batch: replace wholesale.
        for table in ["sleep", "sleep_score", "tags"] {
            sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
        }

        for record in &sleep {
            sqlx::query(
                r#"
                INSERT INTO sleep
                    (id, day, bedtime_start, bedtime_end, average_heart_rate,
                     average_hrv, total_sleep_duration, efficiency)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&record.id)
            .bind(record.day)
            .bind(&record.bedtime_start)
            .bind(&record.bedtime_end)
            .bind(record.average_heart_rate)
            .bind(record.average_hrv)
            .bind(record.total_sleep_duration)
            .bind(record.efficiency)
            .execute(&mut *tx)
            .await?;
        }

        for record in &sleep_scores {
            sqlx::query(
                "INSERT INTO sleep_score (id, day, score, timestamp) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&record.id)
            .bind(record.day)
            .bind(record.score)
            .bind(&record.timestamp)
            .execute(&mut *tx)
            .await?;
        }

        for record in &tags {
            sqlx::query(
                r#"
                INSERT INTO tags
                    (id, start_day, start_time, end_day, end_time,
                     comment, tag_type_code, custom_name)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&record.id)
            .bind(record.start_day)
            .bind(&record.start_time)
            .bind(record.end_day)
            .bind(&record.end_time)
            .bind(&record.comment)
            .bind(&record.tag_type_code)
            .bind(&record.custom_name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.derive_previous_day().await?;

        info!(
            sleep = summary.sleep,
            sleep_scores = summary.sleep_scores,
            tags = summary.tags,
            "Ingest complete"
        );
        Ok(summary)
    }

    /// All sleep summary rows, ordered by day (inspection view).
    pub async fn sleep_rows(&self) -> DbResult<Vec<SleepSummaryRow>> {
        let rows: Vec<(
            String,
            chrono::NaiveDate,
            Option<String>,
            Option<String>,
            Option<f64>,
            Option<f64>,
            Option<i64>,
            Option<i64>,
        )> = sqlx::query_as(
            r#"
            SELECT id, day, bedtime_start, bedtime_end, average_heart_rate,
                   average_hrv, total_sleep_duration, efficiency
            FROM sleep
            ORDER BY day
            "#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(id, day, bedtime_start, bedtime_end, average_heart_rate, average_hrv, total_sleep_duration, efficiency)| {
                    SleepSummaryRow {
                        id,
                        day,
                        bedtime_start,
                        bedtime_end,
                        average_heart_rate,
                        average_hrv,
                        total_sleep_duration,
                        efficiency,
                    }
                },
            )
            .collect())
    }

    /// All sleep-score rows, ordered by day (inspection view).
    pub async fn sleep_score_rows(&self) -> DbResult<Vec<SleepScoreRecord>> {
        let rows: Vec<(String, chrono::NaiveDate, i64, Option<String>)> =
            sqlx::query_as("SELECT id, day, score, timestamp FROM sleep_score ORDER BY day")
                .fetch_all(self.pool())
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, day, score, timestamp)| SleepScoreRecord {
                id,
                day,
                score,
                timestamp,
            })
            .collect())
    }

    /// All tag rows, ordered by start day (inspection view).
    pub async fn tag_rows(&self) -> DbResult<Vec<TagRecord>> {
        let rows: Vec<(
            String,
            chrono::NaiveDate,
            Option<String>,
            Option<chrono::NaiveDate>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
        )> = sqlx::query_as(
            r#"
            SELECT id, start_day, start_time, end_day, end_time,
                   comment, tag_type_code, custom_name
            FROM tags
            ORDER BY start_day
            "#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(id, start_day, start_time, end_day, end_time, comment, tag_type_code, custom_name)| {
                    TagRecord {
                        id,
                        start_day,
                        start_time,
                        end_day,
                        end_time,
                        comment,
                        tag_type_code,
                        custom_name,
                    }
                },
            )
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_data_files(dir: &Path, config: &OuraConfig) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            config.data_file("sleep_data"),
            r#"{"data": [{"id": "sl-1", "day": "2024-01-02", "average_hrv": 52.0}]}"#,
        )
        .unwrap();
        std::fs::write(
            config.data_file("sleep_score_data"),
            r#"{"data": [
                {"id": "ds-1", "day": "2024-01-02", "score": 80},
                {"id": "ds-2", "day": "2024-03-01", "score": 75}
            ]}"#,
        )
        .unwrap();
        std::fs::write(
            config.data_file("tags_data"),
            r#"{"data": [{"id": "t-1", "start_day": "2024-01-01", "comment": "Coffee"}]}"#,
        )
        .unwrap();
    }

    fn test_config(dir: &Path) -> OuraConfig {
        let dir = dir.to_string_lossy().into_owned();
        OuraConfig::from_lookup(move |key| match key {
            "OURA_DATA_DIR" => Some(dir.clone()),
            "OURA_START_DATE" => Some("2024-01-01".into()),
            "OURA_END_DATE" => Some("2024-03-31".into()),
            _ => None,
        })
    }

    #[tokio::test]
    async fn test_ingest_loads_all_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        write_data_files(tmp.path(), &config);

        let db = Database::new_in_memory().await.unwrap();
        let files = DataFiles::locate(&config).unwrap();
        let summary = db.ingest(&files).await.unwrap();

        assert_eq!(
            summary,
            IngestSummary {
                sleep: 1,
                sleep_scores: 2,
                tags: 1
            }
        );
        assert_eq!(db.sleep_score_rows().await.unwrap().len(), 2);
        assert_eq!(db.tag_rows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_previous_day_is_calendar_subtraction() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        write_data_files(tmp.path(), &config);

        let db = Database::new_in_memory().await.unwrap();
        db.ingest(&DataFiles::locate(&config).unwrap()).await.unwrap();

        let rows: Vec<(chrono::NaiveDate, chrono::NaiveDate)> =
            sqlx::query_as("SELECT day, previous_day FROM sleep_score ORDER BY day")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(rows[0].1.to_string(), "2024-01-01");
        // Leap-year month boundary: 2024-03-01 -> 2024-02-29.
        assert_eq!(rows[1].1.to_string(), "2024-02-29");
    }

    #[tokio::test]
    async fn test_ingest_replaces_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        write_data_files(tmp.path(), &config);

        let db = Database::new_in_memory().await.unwrap();
        let files = DataFiles::locate(&config).unwrap();
        db.ingest(&files).await.unwrap();
        db.ingest(&files).await.unwrap();

        assert_eq!(db.tag_rows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_locate_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        // No files written.
        let err = DataFiles::locate(&config).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }
}
