//! Derived analysis table and its summary statistics.
//!
//! Handlers only relay query results; all computation happened in the
//! batch phase or lives in the db crate.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use oura_view_db::{AnalysisRow, CaffeineSplitStats, CountBucketStats, HourCount};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/analysis
///
/// Rows come back ordered by sleep date ascending, ready for time-series
/// charting (scatter of score over time colored by count bucket).
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AnalysisRow>>> {
    Ok(Json(state.db.analysis_rows().await?))
}

/// GET /api/stats/caffeine: histogram source, split by the binary flag.
pub async fn get_caffeine_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CaffeineSplitStats>> {
    Ok(Json(state.db.score_stats_by_caffeine().await?))
}

/// GET /api/stats/caffeine-count: per-count buckets plus the ">0" rollup.
pub async fn get_caffeine_count_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CountBucketStats>>> {
    Ok(Json(state.db.score_stats_by_count().await?))
}

/// GET /api/stats/caffeine-hours: bar chart of tag count by hour of day.
pub async fn get_caffeine_hours(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HourCount>>> {
    Ok(Json(state.db.caffeine_hours().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analysis", get(get_analysis))
        .route("/stats/caffeine", get(get_caffeine_stats))
        .route("/stats/caffeine-count", get(get_caffeine_count_stats))
        .route("/stats/caffeine-hours", get(get_caffeine_hours))
}
