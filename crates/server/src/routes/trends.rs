//! Trends export table (optional, configured via OURA_TRENDS_FILE).

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use oura_view_core::DelimitedTable;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/trends
pub async fn get_trends(State(state): State<Arc<AppState>>) -> ApiResult<Json<DelimitedTable>> {
    match &state.trends {
        Some(table) => Ok(Json(table.clone())),
        None => Err(ApiError::NotFound("no trends file configured".into())),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/trends", get(get_trends))
}
