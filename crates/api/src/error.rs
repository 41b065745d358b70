// crates/api/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::client::Collection;

/// Errors from the token provider, the remote fetcher, and the download
/// persistence step. None of these are retried; all abort the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No credentials configured: set OURA_PERSONAL_ACCESS_TOKEN or the OURA_CLIENT_ID / OURA_CLIENT_SECRET / OURA_REDIRECT_URI application credentials")]
    MissingCredentials,

    #[error("Token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetching {collection} failed with status {status}: {body}")]
    Remote {
        collection: Collection,
        status: u16,
        body: String,
    },

    #[error("Malformed {collection} response: {message}")]
    Malformed {
        collection: Collection,
        message: String,
    },

    #[error("Failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
