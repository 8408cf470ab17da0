//! The statistical core.
//!
//! Responsibilities:
//!
//! - coerce and filter rows per computation (`clean`)
//! - headline totals and ratios (`metrics`)
//! - weighted-moving-average forecasts per (store, item) (`forecast`)
//! - percentile bootstrap intervals (`confidence`)
//! - reorder-policy simulation (`policy`)
//!
//! Every function here is a pure read of the dataset snapshot it is given.

pub mod clean;
pub mod confidence;
pub mod forecast;
pub mod metrics;
pub mod policy;

pub use clean::{clean, coerce_cell};
pub use confidence::compute_confidence_intervals;
pub use forecast::{compute_wma, compute_wma_with_weights};
pub use metrics::{compute_metrics, turnover_by_month};
pub use policy::simulate;
