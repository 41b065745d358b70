//! Inspection views over the raw base tables.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use oura_view_core::{SleepScoreRecord, TagRecord};
use oura_view_db::SleepSummaryRow;

use crate::error::ApiResult;
use crate::state::AppState;

/// Row listing with its total, mirroring the dashboard's table header.
#[derive(Debug, Serialize)]
pub struct TableResponse<T> {
    pub count: usize,
    pub rows: Vec<T>,
}

impl<T> From<Vec<T>> for TableResponse<T> {
    fn from(rows: Vec<T>) -> Self {
        Self {
            count: rows.len(),
            rows,
        }
    }
}

/// GET /api/tables/sleep
pub async fn get_sleep_table(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TableResponse<SleepSummaryRow>>> {
    let rows = state.db.sleep_rows().await?;
    Ok(Json(rows.into()))
}

/// GET /api/tables/sleep-score
pub async fn get_sleep_score_table(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TableResponse<SleepScoreRecord>>> {
    let rows = state.db.sleep_score_rows().await?;
    Ok(Json(rows.into()))
}

/// GET /api/tables/tags
pub async fn get_tags_table(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TableResponse<TagRecord>>> {
    let rows = state.db.tag_rows().await?;
    Ok(Json(rows.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tables/sleep", get(get_sleep_table))
        .route("/tables/sleep-score", get(get_sleep_score_table))
        .route("/tables/tags", get(get_tags_table))
}
