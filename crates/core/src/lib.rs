// crates/core/src/lib.rs
//! Core domain types and file loaders for oura-view.
//!
//! Everything here is synchronous and dependency-light: typed records for
//! the three Oura collections, the configuration struct, and the two
//! flat-file loaders (nightly time-series JSON, delimited trends export).

pub mod config;
pub mod error;
pub mod table;
pub mod timeseries;
pub mod types;

pub use config::OuraConfig;
pub use error::LoadError;
pub use table::DelimitedTable;
pub use timeseries::NightlySeries;
pub use types::{DataEnvelope, SampleSeries, SleepRecord, SleepScoreRecord, TagRecord};
