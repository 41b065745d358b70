// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use oura_view_core::{DelimitedTable, NightlySeries, OuraConfig};
use oura_view_db::Database;

/// Shared application state accessible from all route handlers.
///
/// Everything is loaded once during the batch phase at startup; handlers
/// only read. Query results live in memory for the duration of the
/// dashboard session and nowhere else.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Runtime configuration the batch ran with.
    pub config: OuraConfig,
    /// Database handle for analysis/table queries.
    pub db: Database,
    /// Per-date heart-rate/HRV sample series from the persisted sleep file.
    pub series: NightlySeries,
    /// Optional trends export table (semicolon-delimited vendor file).
    pub trends: Option<DelimitedTable>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(
        config: OuraConfig,
        db: Database,
        series: NightlySeries,
        trends: Option<DelimitedTable>,
    ) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            config,
            db,
            series,
            trends,
        })
    }
}
