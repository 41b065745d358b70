// crates/api/src/lib.rs
//! Oura cloud API access: OAuth token exchange, collection fetching, and
//! the download-to-disk persistence step.
//!
//! Vendor docs: https://cloud.ouraring.com/v2/docs

pub mod auth;
pub mod client;
pub mod download;
pub mod error;

pub use auth::{AuthFlow, TokenPair};
pub use client::{Collection, OuraClient};
pub use download::{download_collection, run_download, DownloadedFiles};
pub use error::FetchError;
