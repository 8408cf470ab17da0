//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the CSV into the session
//! - runs the requested engine(s)
//! - prints reports and writes optional exports

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use crate::cli::{
    Command, ConfidenceArgs, ConfidenceCmdArgs, DataArgs, PolicyArgs, ReportArgs, SimulateCmdArgs,
};
use crate::domain::{AnalysisConfig, ConfidenceSettings, Dataset, PolicyParams};
use crate::error::AppError;

pub mod pipeline;
pub mod session;

use session::Session;

/// Environment variable holding the default CSV path.
pub const DATA_ENV_VAR: &str = "INSIGHTS_DATA";

/// Entry point for the `insights` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    crate::logging::init();

    let cli = crate::cli::Cli::parse();
    let mut session = Session::new();

    match cli.command {
        Command::Report(args) => handle_report(&mut session, args),
        Command::Metrics(args) => handle_metrics(&mut session, args),
        Command::Forecast(args) => handle_forecast(&mut session, args),
        Command::Confidence(args) => handle_confidence(&mut session, args),
        Command::Simulate(args) => handle_simulate(&mut session, args),
    }
}

fn handle_report(session: &mut Session, args: ReportArgs) -> Result<(), AppError> {
    let path = resolve_data_path(args.data.data.clone())?;
    let config = analysis_config_from_args(&args, path);
    load_into_session(session, &config.data_path)?;

    let run = pipeline::analyze_session(session, &config)?;
    println!(
        "{}",
        crate::report::format_report(&run.output, &config.confidence)
    );

    if !session.is_current(run.generation) {
        return Err(AppError::new(
            4,
            format!("Dataset '{}' was replaced during analysis; nothing exported.", run.source),
        ));
    }
    if let Some(path) = &config.export_json {
        crate::io::json::write_analysis_json(path, &run.output, &run.source)?;
    }
    if let Some(path) = &config.export_forecasts {
        crate::io::export::write_forecasts_csv(path, &run.output.forecast)?;
    }
    if let Some(path) = &config.export_policy {
        crate::io::export::write_policy_csv(path, &run.output.simulation)?;
    }

    Ok(())
}

fn handle_metrics(session: &mut Session, args: DataArgs) -> Result<(), AppError> {
    let dataset = load_into_session(session, &resolve_data_path(args.data)?)?;
    let metrics = crate::stats::compute_metrics(&dataset);
    let by_month = crate::stats::turnover_by_month(&dataset);
    println!("{}", crate::report::format_metrics(&metrics.summary, &by_month));
    Ok(())
}

fn handle_forecast(session: &mut Session, args: DataArgs) -> Result<(), AppError> {
    let dataset = load_into_session(session, &resolve_data_path(args.data)?)?;
    let forecast = crate::stats::compute_wma(&dataset);
    println!("{}", crate::report::format_forecast(&forecast));
    Ok(())
}

fn handle_confidence(session: &mut Session, args: ConfidenceCmdArgs) -> Result<(), AppError> {
    let dataset = load_into_session(session, &resolve_data_path(args.data.data)?)?;
    let settings = confidence_settings(&args.confidence);
    let intervals = crate::stats::compute_confidence_intervals(&dataset, &settings)?;
    println!("{}", crate::report::format_confidence(&intervals, &settings));
    Ok(())
}

fn handle_simulate(session: &mut Session, args: SimulateCmdArgs) -> Result<(), AppError> {
    let dataset = load_into_session(session, &resolve_data_path(args.data.data)?)?;
    let simulation = crate::stats::simulate(&dataset, &policy_params(&args.policy));
    println!("{}", crate::report::format_simulation(&simulation));
    Ok(())
}

/// Load the CSV, print the ingest summary and replace the session dataset.
fn load_into_session(session: &mut Session, path: &Path) -> Result<Arc<Dataset>, AppError> {
    let ingested = crate::io::ingest::load_dataset(path)?;
    let source = path.display().to_string();
    println!(
        "{}",
        crate::report::format_ingest_summary(&ingested, &source)
    );
    Ok(session.replace(ingested.dataset, source))
}

/// `--data` wins; otherwise `INSIGHTS_DATA` (possibly from `.env`).
pub fn resolve_data_path(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match std::env::var(DATA_ENV_VAR) {
        Ok(v) if !v.trim().is_empty() => Ok(PathBuf::from(v.trim())),
        _ => Err(AppError::new(
            3,
            format!("No data to analyse: pass --data <CSV> or set {DATA_ENV_VAR}."),
        )),
    }
}

pub fn analysis_config_from_args(args: &ReportArgs, data_path: PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        confidence: confidence_settings(&args.confidence),
        policy: policy_params(&args.policy),
        export_json: args.export_json.clone(),
        export_forecasts: args.export_forecasts.clone(),
        export_policy: args.export_policy.clone(),
        ..AnalysisConfig::new(data_path)
    }
}

fn confidence_settings(args: &ConfidenceArgs) -> ConfidenceSettings {
    ConfidenceSettings {
        resamples: args.resamples,
        seed: args.seed,
        ..ConfidenceSettings::default()
    }
}

fn policy_params(args: &PolicyArgs) -> PolicyParams {
    PolicyParams {
        reorder_point: args.reorder_point,
        lead_time_days: args.lead_time,
        safety_stock: args.safety_stock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn data_flag_takes_precedence() {
        let path = resolve_data_path(Some(PathBuf::from("flag.csv"))).unwrap();
        assert_eq!(path, PathBuf::from("flag.csv"));
    }

    #[test]
    fn report_flags_flow_into_config() {
        let cli = Cli::parse_from([
            "insights",
            "report",
            "--seed",
            "7",
            "--safety-stock",
            "10",
            "--lead-time",
            "3",
            "--export-policy",
            "policy.csv",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        let config = analysis_config_from_args(&args, PathBuf::from("sales.csv"));

        assert_eq!(config.data_path, PathBuf::from("sales.csv"));
        assert_eq!(config.confidence.seed, 7);
        assert_eq!(config.confidence.level, 0.95);
        assert_eq!(config.policy.safety_stock, 10.0);
        assert_eq!(config.policy.lead_time_days, 3.0);
        assert_eq!(config.policy.reorder_point, 150.0);
        assert_eq!(config.wma_weights, vec![0.6, 0.3, 0.1]);
        assert_eq!(config.export_policy, Some(PathBuf::from("policy.csv")));
        assert!(config.export_json.is_none());
    }
}
