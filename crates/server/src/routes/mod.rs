//! API route handlers for the oura-view server.

pub mod analysis;
pub mod health;
pub mod tables;
pub mod timeseries;
pub mod trends;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/tables/sleep - Sleep summary rows (inspection)
/// - GET /api/tables/sleep-score - Raw sleep_score rows (inspection)
/// - GET /api/tables/tags - Raw tag rows (inspection)
/// - GET /api/analysis - Derived analysis rows, ordered by sleep date
/// - GET /api/stats/caffeine - Score stats split by the caffeine flag
/// - GET /api/stats/caffeine-count - Score stats per count bucket + ">0"
/// - GET /api/stats/caffeine-hours - Caffeine tags per hour of day
/// - GET /api/timeseries/heart-rate - Per-date intraday heart-rate samples
/// - GET /api/timeseries/hrv - Per-date intraday HRV samples
/// - GET /api/trends - Trends export table, when configured
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", tables::router())
        .nest("/api", analysis::router())
        .nest("/api", timeseries::router())
        .nest("/api", trends::router())
        .with_state(state)
}
