//! Command-line parsing for the inventory insights tool.
//!
//! Argument parsing lives here, dispatch lives in `app`, and the statistics
//! code never sees clap types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_RESAMPLES, DEFAULT_SEED};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "insights",
    version,
    about = "Inventory & sales insights: metrics, forecasts, intervals and reorder simulation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every engine, print the full dashboard and optionally export results.
    Report(ReportArgs),
    /// Headline metrics and monthly turnover.
    Metrics(DataArgs),
    /// Weighted-moving-average forecast per (store, item).
    Forecast(DataArgs),
    /// Bootstrap confidence intervals.
    Confidence(ConfidenceCmdArgs),
    /// Reorder-policy simulation.
    Simulate(SimulateCmdArgs),
}

/// Input data selection shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Sales/inventory CSV. Falls back to `INSIGHTS_DATA` when omitted.
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ConfidenceArgs {
    /// Bootstrap resamples per statistic.
    #[arg(long, default_value_t = DEFAULT_RESAMPLES)]
    pub resamples: usize,

    /// Seed for the bootstrap generators.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct PolicyArgs {
    /// Inventory level that triggers a reorder.
    #[arg(long, default_value_t = 150.0)]
    pub reorder_point: f64,

    /// Supplier lead time in days (reported only).
    #[arg(long, default_value_t = 7.0)]
    pub lead_time: f64,

    /// Extra units held on top of the reorder point.
    #[arg(long, default_value_t = 50.0)]
    pub safety_stock: f64,
}

#[derive(Debug, Args, Clone)]
pub struct ConfidenceCmdArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub confidence: ConfidenceArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateCmdArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub confidence: ConfidenceArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Export the whole analysis to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export per-group forecasts to CSV.
    #[arg(long = "export-forecasts", value_name = "CSV")]
    pub export_forecasts: Option<PathBuf>,

    /// Export per-row policy results to CSV.
    #[arg(long = "export-policy", value_name = "CSV")]
    pub export_policy: Option<PathBuf>,
}
