//! `inventory-insights` library crate.
//!
//! The binary (`insights`) is a thin wrapper around this library so that:
//!
//! - the statistics core is testable without spawning processes
//! - the engines can be driven by other front-ends over the same dataset
//!   snapshot

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
pub mod stats;
