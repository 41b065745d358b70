// crates/api/src/download.rs
//! One-time download step: fetch the three collections and persist them as
//! date-stamped `{ "data": [ ... ] }` files in the data directory.
//!
//! Existing files for the same range are overwritten. Nothing else touches
//! the vendor API after this step; the rest of the pipeline runs from disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use oura_view_core::types::DataEnvelope;
use oura_view_core::OuraConfig;

use crate::client::{Collection, OuraClient};
use crate::error::FetchError;

/// Paths written by a completed download run.
#[derive(Debug, Clone)]
pub struct DownloadedFiles {
    pub sleep: PathBuf,
    pub sleep_scores: PathBuf,
    pub tags: PathBuf,
}

/// Fetch one collection and persist it. Returns the written path and the
/// record count.
pub async fn download_collection(
    client: &OuraClient,
    config: &OuraConfig,
    collection: Collection,
) -> Result<(PathBuf, usize), FetchError> {
    let path = config.data_file(collection.file_stem());

    let count = match collection {
        Collection::Sleep => {
            let records = client.fetch_sleep(config.start_date, config.end_date).await?;
            write_envelope(&path, records)?
        }
        Collection::DailySleep => {
            let records = client
                .fetch_sleep_scores(config.start_date, config.end_date)
                .await?;
            write_envelope(&path, records)?
        }
        Collection::EnhancedTag => {
            let records = client.fetch_tags(config.start_date, config.end_date).await?;
            write_envelope(&path, records)?
        }
    };

    tracing::info!(%collection, records = count, path = %path.display(), "Saved collection");
    Ok((path, count))
}

/// Download all three collections for the configured range.
pub async fn run_download(
    client: &OuraClient,
    config: &OuraConfig,
) -> Result<DownloadedFiles, FetchError> {
    std::fs::create_dir_all(&config.data_dir).map_err(|e| FetchError::Persist {
        path: config.data_dir.clone(),
        source: e,
    })?;

    let (sleep, _) = download_collection(client, config, Collection::Sleep).await?;
    let (sleep_scores, _) = download_collection(client, config, Collection::DailySleep).await?;
    let (tags, _) = download_collection(client, config, Collection::EnhancedTag).await?;

    Ok(DownloadedFiles {
        sleep,
        sleep_scores,
        tags,
    })
}

fn write_envelope<T: Serialize>(path: &Path, records: Vec<T>) -> Result<usize, FetchError> {
    let count = records.len();
    let envelope = DataEnvelope::new(records);
    let json = serde_json::to_vec_pretty(&envelope).expect("records serialize");
    std::fs::write(path, json).map_err(|e| FetchError::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_download_writes_three_envelope_files() {
        let mut server = mockito::Server::new_async().await;
        for (path, body) in [
            ("/v2/usercollection/sleep", r#"{"data": [{"id": "sl-1", "day": "2024-01-02"}]}"#),
            (
                "/v2/usercollection/daily_sleep",
                r#"{"data": [{"id": "ds-1", "day": "2024-01-02", "score": 80}]}"#,
            ),
            (
                "/v2/usercollection/enhanced_tag",
                r#"{"data": [{"id": "t-1", "start_day": "2024-01-01", "comment": "Coffee"}]}"#,
            ),
        ] {
            server
                .mock("GET", path)
                .match_query(mockito::Matcher::Any)
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;
        }

        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("data");
        let config = OuraConfig::from_lookup(|key| match key {
            "OURA_DATA_DIR" => Some(data_dir.to_string_lossy().into_owned()),
            "OURA_START_DATE" => Some("2024-01-01".into()),
            "OURA_END_DATE" => Some("2024-01-31".into()),
            _ => None,
        });

        let client = OuraClient::with_base_url(server.url(), "token-1");
        let files = run_download(&client, &config).await.unwrap();

        assert_eq!(
            files.sleep_scores,
            data_dir.join("sleep_score_data_2024-01-01_2024-01-31.json")
        );
        for path in [&files.sleep, &files.sleep_scores, &files.tags] {
            assert!(path.exists(), "{} should exist", path.display());
            let json: serde_json::Value =
                serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
            assert_eq!(json["data"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_remote_failure_propagates_without_files() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/usercollection/sleep")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("server error")
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let config = OuraConfig::from_lookup(|key| match key {
            "OURA_DATA_DIR" => Some(tmp.path().join("data").to_string_lossy().into_owned()),
            _ => None,
        });

        let client = OuraClient::with_base_url(server.url(), "token-1");
        let err = run_download(&client, &config).await.unwrap_err();
        assert!(matches!(err, FetchError::Remote { .. }));
        assert!(!config.data_file("sleep_data").exists());
    }
}
