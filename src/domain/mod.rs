//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the uploaded table (`Dataset` of `RawRecord`s) and the cleaned `Table`
//! - column and month enums (`NumericColumn`, `Month`)
//! - engine outputs (metrics, forecasts, intervals, policy simulation)
//! - the resolved run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
