// crates/server/src/main.rs
//! Oura-view server binary.
//!
//! Runs the batch pipeline (locate persisted data files, rebuild the
//! database, ingest, derive the analysis table), then serves the dashboard
//! API. Strictly sequential: either the full pipeline completes and the
//! server starts, or the run fails outright.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oura_view_core::{DelimitedTable, NightlySeries, OuraConfig};
use oura_view_db::{Database, DataFiles};
use oura_view_server::{create_app, AppState};

/// Default port for the server.
const DEFAULT_PORT: u16 = 47912;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("OURA_VIEW_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Get the static directory for serving frontend files.
///
/// Priority:
/// 1. STATIC_DIR environment variable (explicit override)
/// 2. ./dist directory (if it exists)
/// 3. None (API-only mode)
fn get_static_dir() -> Option<PathBuf> {
    std::env::var("STATIC_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            let dist = PathBuf::from("dist");
            dist.exists().then_some(dist)
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Quiet tracing; startup UX uses eprintln
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let startup_start = Instant::now();

    eprintln!("\n\u{1f319} oura-view v{}\n", env!("CARGO_PKG_VERSION"));

    let config = OuraConfig::from_env();

    // Step 1: Locate the persisted collection files for the configured range
    let files = DataFiles::locate(&config)?;

    // Step 2: Load the time-series view and the optional trends export
    let series = NightlySeries::from_path(&files.sleep)?;
    let trends = match &config.trends_file {
        Some(path) => Some(DelimitedTable::from_path(path, ';')?),
        None => None,
    };

    // Step 3: Rebuild the database and run the batch pipeline
    let db = Database::create(&config.db_path(), config.fresh_rebuild).await?;
    let summary = db.ingest(&files).await?;
    db.build_analysis_table().await?;

    // Step 4: Build the app and serve
    let static_dir = get_static_dir();
    let state = AppState::new(config, db, series, trends);
    let app = create_app(state, static_dir);

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!(
        "  \u{2713} Ready in {:.2}s \u{2014} {} sleep scores, {} tags, {} sleep records",
        startup_start.elapsed().as_secs_f64(),
        summary.sleep_scores,
        summary.tags,
        summary.sleep,
    );
    eprintln!("  \u{2192} http://localhost:{}\n", port);

    axum::serve(listener, app).await?;

    Ok(())
}
