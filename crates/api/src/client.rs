// crates/api/src/client.rs
//! Bearer-token fetcher for the three vendor collections.
//!
//! Every query is an inclusive `start_date`/`end_date` range. The vendor
//! paginates large ranges with `next_token`; the fetcher follows the cursor
//! until it is absent and returns the concatenated record set.

use serde::de::DeserializeOwned;

use oura_view_core::{OuraConfig, SleepRecord, SleepScoreRecord, TagRecord};
use oura_view_core::types::DataEnvelope;

use crate::error::FetchError;

/// A named remote resource category exposed by the vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Sleep,
    DailySleep,
    EnhancedTag,
}

impl Collection {
    /// Path segment under `/v2/usercollection/`.
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Sleep => "sleep",
            Collection::DailySleep => "daily_sleep",
            Collection::EnhancedTag => "enhanced_tag",
        }
    }

    /// Stem of the date-stamped data file this collection persists to.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Collection::Sleep => "sleep_data",
            Collection::DailySleep => "sleep_score_data",
            Collection::EnhancedTag => "tags_data",
        }
    }

    pub const ALL: [Collection; 3] =
        [Collection::Sleep, Collection::DailySleep, Collection::EnhancedTag];
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// HTTP client for one authenticated user session.
#[derive(Debug, Clone)]
pub struct OuraClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl OuraClient {
    pub fn new(config: &OuraConfig, access_token: impl Into<String>) -> Self {
        Self::with_base_url(format!("https://{}", config.api_host), access_token)
    }

    /// Construct against an explicit base URL (sandbox host, mock server).
    pub fn with_base_url(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Fetch every record of a collection within the inclusive date range,
    /// following `next_token` pagination.
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/v2/usercollection/{}", self.base_url, collection.path());
        let start = start_date.to_string();
        let end = end_date.to_string();

        let mut records = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("start_date", start.as_str()), ("end_date", end.as_str())]);
            if let Some(token) = &next_token {
                request = request.query(&[("next_token", token.as_str())]);
            }

            let resp = request.send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(FetchError::Remote {
                    collection,
                    status: status.as_u16(),
                    body,
                });
            }

            let page: DataEnvelope<T> =
                resp.json().await.map_err(|e| FetchError::Malformed {
                    collection,
                    message: e.to_string(),
                })?;

            records.extend(page.data);
            pages += 1;

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(%collection, pages, records = records.len(), "Fetched collection");
        Ok(records)
    }

    pub async fn fetch_sleep(
        &self,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> Result<Vec<SleepRecord>, FetchError> {
        self.fetch_collection(Collection::Sleep, start_date, end_date).await
    }

    pub async fn fetch_sleep_scores(
        &self,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> Result<Vec<SleepScoreRecord>, FetchError> {
        self.fetch_collection(Collection::DailySleep, start_date, end_date).await
    }

    pub async fn fetch_tags(
        &self,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> Result<Vec<TagRecord>, FetchError> {
        self.fetch_collection(Collection::EnhancedTag, start_date, end_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_date_range() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/usercollection/daily_sleep")
            .match_header("authorization", "Bearer token-1")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("start_date".into(), "2024-01-01".into()),
                mockito::Matcher::UrlEncoded("end_date".into(), "2024-01-31".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data": [{"id": "ds-1", "day": "2024-01-02", "score": 80}]}"#)
            .create_async()
            .await;

        let client = OuraClient::with_base_url(server.url(), "token-1");
        let scores = client
            .fetch_sleep_scores(date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 80);
        assert_eq!(scores[0].day, date("2024-01-02"));
    }

    #[tokio::test]
    async fn test_fetch_follows_next_token() {
        let mut server = mockito::Server::new_async().await;
        let page1 = server
            .mock("GET", "/v2/usercollection/enhanced_tag")
            .match_query(mockito::Matcher::Exact(
                "start_date=2024-01-01&end_date=2024-01-31".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"data": [{"id": "t-1", "start_day": "2024-01-01", "comment": "Coffee"}], "next_token": "page-2"}"#,
            )
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/v2/usercollection/enhanced_tag")
            .match_query(mockito::Matcher::Exact(
                "start_date=2024-01-01&end_date=2024-01-31&next_token=page-2".into(),
            ))
            .with_status(200)
            .with_body(r#"{"data": [{"id": "t-2", "start_day": "2024-01-02"}]}"#)
            .create_async()
            .await;

        let client = OuraClient::with_base_url(server.url(), "token-1");
        let tags = client
            .fetch_tags(date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();

        page1.assert_async().await;
        page2.assert_async().await;
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].id, "t-1");
        assert_eq!(tags[1].id, "t-2");
    }

    #[tokio::test]
    async fn test_non_success_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/usercollection/sleep")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = OuraClient::with_base_url(server.url(), "token-1");
        let err = client
            .fetch_sleep(date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap_err();

        match err {
            FetchError::Remote { collection, status, body } => {
                assert_eq!(collection, Collection::Sleep);
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_malformed_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/usercollection/daily_sleep")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let client = OuraClient::with_base_url(server.url(), "token-1");
        let err = client
            .fetch_sleep_scores(date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { collection: Collection::DailySleep, .. }));
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::Sleep.path(), "sleep");
        assert_eq!(Collection::DailySleep.path(), "daily_sleep");
        assert_eq!(Collection::EnhancedTag.path(), "enhanced_tag");
        assert_eq!(Collection::DailySleep.file_stem(), "sleep_score_data");
    }
}
