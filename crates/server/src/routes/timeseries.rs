//! Per-date intraday sample series (heart rate, HRV).

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;

use crate::state::AppState;

type SeriesMap = BTreeMap<NaiveDate, Vec<Option<f64>>>;

/// GET /api/timeseries/heart-rate
pub async fn get_heart_rate(State(state): State<Arc<AppState>>) -> Json<SeriesMap> {
    Json(state.series.heart_rate.clone())
}

/// GET /api/timeseries/hrv
pub async fn get_hrv(State(state): State<Arc<AppState>>) -> Json<SeriesMap> {
    Json(state.series.hrv.clone())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/timeseries/heart-rate", get(get_heart_rate))
        .route("/timeseries/hrv", get(get_hrv))
}
