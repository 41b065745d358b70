// crates/core/src/config.rs
//! Explicit configuration for all components.
//!
//! Loaded once at process start from environment variables and passed into
//! each component at construction, never read from ambient globals. Invalid
//! values fall back to the documented defaults rather than aborting.

use std::path::PathBuf;

use chrono::NaiveDate;

/// OAuth application placeholders, matching the documented setup flow.
pub const PLACEHOLDER_CLIENT_ID: &str = "YOUR_CLIENT_ID";
pub const PLACEHOLDER_CLIENT_SECRET: &str = "YOUR_CLIENT_SECRET";
pub const PLACEHOLDER_REDIRECT_URI: &str = "YOUR_REDIRECT_URI";

const DEFAULT_API_HOST: &str = "api.ouraring.com";
const DEFAULT_DATA_DIR: &str = "data";
// First known coffee tag is 2020-05-02, so the range starts one day earlier.
const DEFAULT_START_DATE: &str = "2020-05-01";
const DEFAULT_END_DATE: &str = "2026-01-01";

/// Runtime configuration shared by the fetch and server binaries.
#[derive(Debug, Clone)]
pub struct OuraConfig {
    /// OAuth application credentials.
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Vendor API host (no scheme).
    pub api_host: String,
    /// Personal access token fallback for bearer auth without the OAuth flow.
    pub personal_access_token: String,
    /// Directory holding downloaded data files and the database artifact.
    pub data_dir: PathBuf,
    /// Inclusive calendar range for fetch and analysis.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Optional semicolon-delimited trends export to serve alongside.
    pub trends_file: Option<PathBuf>,
    /// Delete and recreate the database file on startup.
    pub fresh_rebuild: bool,
}

impl OuraConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (injectable for tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_date = |key: &str, default: &str| -> NaiveDate {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| default.parse().expect("default date literal parses"))
        };

        Self {
            client_id: lookup("OURA_CLIENT_ID").unwrap_or_else(|| PLACEHOLDER_CLIENT_ID.into()),
            client_secret: lookup("OURA_CLIENT_SECRET")
                .unwrap_or_else(|| PLACEHOLDER_CLIENT_SECRET.into()),
            redirect_uri: lookup("OURA_REDIRECT_URI")
                .unwrap_or_else(|| PLACEHOLDER_REDIRECT_URI.into()),
            api_host: lookup("OURA_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.into()),
            personal_access_token: lookup("OURA_PERSONAL_ACCESS_TOKEN").unwrap_or_default(),
            data_dir: lookup("OURA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            start_date: parse_date("OURA_START_DATE", DEFAULT_START_DATE),
            end_date: parse_date("OURA_END_DATE", DEFAULT_END_DATE),
            trends_file: lookup("OURA_TRENDS_FILE").map(PathBuf::from),
            fresh_rebuild: lookup("OURA_VIEW_FRESH_REBUILD")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Path of a date-stamped data file for this range, e.g.
    /// `data/sleep_score_data_2020-05-01_2026-01-01.json`.
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}_{}.json", name, self.start_date, self.end_date))
    }

    /// Path of the database artifact for this range. Recreated on every run
    /// when `fresh_rebuild` is set.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("sleep_analysis_{}_{}.db", self.start_date, self.end_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        let config = OuraConfig::from_lookup(|_| None);
        assert_eq!(config.client_id, "YOUR_CLIENT_ID");
        assert_eq!(config.api_host, "api.ouraring.com");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.fresh_rebuild);
        assert!(config.trends_file.is_none());
        assert_eq!(config.start_date.to_string(), "2020-05-01");
    }

    #[test]
    fn test_env_overrides() {
        let config = OuraConfig::from_lookup(|key| match key {
            "OURA_CLIENT_ID" => Some("real-id".into()),
            "OURA_START_DATE" => Some("2023-11-01".into()),
            "OURA_END_DATE" => Some("2024-01-01".into()),
            "OURA_VIEW_FRESH_REBUILD" => Some("false".into()),
            _ => None,
        });
        assert_eq!(config.client_id, "real-id");
        assert_eq!(config.start_date.to_string(), "2023-11-01");
        assert!(!config.fresh_rebuild);
    }

    #[test]
    fn test_invalid_date_falls_back() {
        let config = OuraConfig::from_lookup(|key| match key {
            "OURA_START_DATE" => Some("not-a-date".into()),
            _ => None,
        });
        assert_eq!(config.start_date.to_string(), "2020-05-01");
    }

    #[test]
    fn test_data_file_and_db_path_naming() {
        let config = OuraConfig::from_lookup(|key| match key {
            "OURA_DATA_DIR" => Some("/tmp/oura".into()),
            "OURA_START_DATE" => Some("2023-11-01".into()),
            "OURA_END_DATE" => Some("2024-01-01".into()),
            _ => None,
        });
        assert_eq!(
            config.data_file("tags_data"),
            PathBuf::from("/tmp/oura/tags_data_2023-11-01_2024-01-01.json")
        );
        assert_eq!(
            config.db_path(),
            PathBuf::from("/tmp/oura/sleep_analysis_2023-11-01_2024-01-01.db")
        );
    }
}
