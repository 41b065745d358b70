// crates/api/src/auth.rs
//! OAuth2 authorization-code flow against the vendor's token endpoint.
//!
//! The flow is the standard three-step: direct the user to the authorize
//! page, exchange the returned code for a token pair, refresh on expiry.
//! Token requests use `grant_type`-keyed form bodies.

use serde::Deserialize;

use oura_view_core::config::{
    OuraConfig, PLACEHOLDER_CLIENT_ID, PLACEHOLDER_CLIENT_SECRET, PLACEHOLDER_REDIRECT_URI,
};

use crate::error::FetchError;

pub const AUTHORIZE_URL: &str = "https://cloud.ouraring.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.ouraring.com/oauth/token";
pub const DEFAULT_SCOPE: &str = "daily heartrate personal sleep activity tag";

/// Access/refresh token pair returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until expiry.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// OAuth application credentials plus the endpoints they talk to.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    token_url: String,
}

impl AuthFlow {
    pub fn new(config: &OuraConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: DEFAULT_SCOPE.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Override the token endpoint (vendor sandbox, mock server).
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Whether real application credentials are configured (not the
    /// documented placeholders).
    pub fn has_credentials(&self) -> bool {
        self.client_id != PLACEHOLDER_CLIENT_ID
            && self.client_secret != PLACEHOLDER_CLIENT_SECRET
            && self.redirect_uri != PLACEHOLDER_REDIRECT_URI
    }

    /// The authorization page URL the user must visit.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scope),
        )
    }

    /// Exchange an authorization code for a token pair.
    pub async fn exchange_code(
        &self,
        client: &reqwest::Client,
        code: &str,
    ) -> Result<TokenPair, FetchError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ];
        self.token_request(client, &form).await
    }

    /// Obtain a fresh token pair from a refresh token.
    pub async fn refresh(
        &self,
        client: &reqwest::Client,
        refresh_token: &str,
    ) -> Result<TokenPair, FetchError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];
        self.token_request(client, &form).await
    }

    async fn token_request(
        &self,
        client: &reqwest::Client,
        form: &[(&str, &str)],
    ) -> Result<TokenPair, FetchError> {
        let resp = client.post(&self.token_url).form(form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<TokenPair>().await?)
    }
}
