// crates/api/src/bin/fetch.rs
//! Oura-view fetch binary.
//!
//! Runs the OAuth authorization flow (or uses a personal access token when
//! one is configured), downloads the three collections for the configured
//! date range, and persists them as date-stamped JSON files. No CLI flags;
//! behavior comes from the `OURA_*` environment variables.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oura_view_api::{AuthFlow, Collection, FetchError, OuraClient};
use oura_view_core::OuraConfig;

/// Run the interactive authorization-code flow and return an access token.
async fn authorize(config: &OuraConfig) -> Result<String> {
    let flow = AuthFlow::new(config);
    if !flow.has_credentials() {
        return Err(FetchError::MissingCredentials.into());
    }

    let url = flow.authorize_url();
    eprintln!("Please visit this URL to authorize:\n  {url}\n");
    // Best-effort; the URL is printed either way.
    let _ = open::that(&url);

    eprint!("Enter the authorization code from the redirect URL: ");
    std::io::stderr().flush()?;
    let mut code = String::new();
    std::io::stdin().read_line(&mut code)?;

    let tokens = flow
        .exchange_code(&reqwest::Client::new(), code.trim())
        .await?;
    Ok(tokens.access_token)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    eprintln!("\n\u{1f319} oura-view-fetch v{}\n", env!("CARGO_PKG_VERSION"));

    let config = OuraConfig::from_env();

    let access_token = if config.personal_access_token.is_empty() {
        authorize(&config).await?
    } else {
        tracing::info!("Using personal access token from environment");
        config.personal_access_token.clone()
    };

    let client = OuraClient::new(&config, access_token);
    std::fs::create_dir_all(&config.data_dir)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} Downloading {msg}")
            .expect("valid spinner template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    for collection in Collection::ALL {
        pb.set_message(format!(
            "{} ({} to {})...",
            collection, config.start_date, config.end_date
        ));
        let (path, count) =
            oura_view_api::download_collection(&client, &config, collection).await?;
        pb.println(format!(
            "  \u{2713} {} \u{2014} {} records \u{2192} {}",
            collection,
            count,
            path.display()
        ));
    }
    pb.finish_and_clear();

    eprintln!("\n  \u{2713} Download complete \u{2014} data in {}\n", config.data_dir.display());
    Ok(())
}
