// crates/core/src/timeseries.rs
//! Time-series view over persisted sleep records.
//!
//! Reads a `{ "data": [ ... ] }` document and produces two independent
//! date-to-samples mappings, one for heart rate and one for HRV. A date is
//! present in a mapping only when the record carries the corresponding
//! series, so the two key sets need not match.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::LoadError;
use crate::types::{DataEnvelope, SleepRecord};

/// Per-date intraday sample sequences. Sample vectors preserve their file
/// length, interior nulls included, so positions stay aligned with the
/// recording interval.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NightlySeries {
    pub heart_rate: BTreeMap<NaiveDate, Vec<Option<f64>>>,
    pub hrv: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl NightlySeries {
    /// Load and index a persisted sleep document.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
        if bytes.is_empty() {
            return Err(LoadError::EmptyFile { path: path.into() });
        }
        let doc: DataEnvelope<SleepRecord> =
            serde_json::from_slice(&bytes).map_err(|e| LoadError::malformed_json(path, &e))?;
        Ok(Self::from_records(&doc.data))
    }

    /// Index already-parsed records.
    pub fn from_records(records: &[SleepRecord]) -> Self {
        let mut series = Self::default();
        for record in records {
            if let Some(hr) = &record.heart_rate {
                series.heart_rate.insert(record.day, hr.items.clone());
            }
            if let Some(hrv) = &record.hrv {
                series.hrv.insert(record.day, hrv.items.clone());
            }
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_empty() && self.hrv.is_empty()
    }
}
