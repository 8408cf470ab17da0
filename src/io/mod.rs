//! Input/output helpers.
//!
//! - CSV ingest + header validation (`ingest`)
//! - CSV exports of forecasts and policy rows (`export`)
//! - full-run JSON export (`json`)

pub mod export;
pub mod ingest;
pub mod json;

pub use export::*;
pub use ingest::*;
pub use json::*;
