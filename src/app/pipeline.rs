//! Shared analysis pipeline used by every front-end command.
//!
//! One immutable dataset snapshot in, every engine result out:
//! metrics -> monthly turnover -> forecast -> intervals -> policy simulation.
//!
//! The engines are independent of each other, so they run side by side on the
//! rayon pool. Each one cleans the snapshot for its own columns.

use serde::Serialize;
use tracing::info;

use crate::domain::{
    AnalysisConfig, ConfidenceIntervals, Dataset, ForecastOutput, MetricsSummary, MonthTurnover,
    SimulationOutput,
};
use crate::app::session::Session;
use crate::error::AppError;
use crate::stats::{
    compute_confidence_intervals, compute_metrics, compute_wma_with_weights, simulate,
    turnover_by_month,
};

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub metrics: MetricsSummary,
    pub turnover_by_month: Vec<MonthTurnover>,
    pub forecast: ForecastOutput,
    pub confidence: ConfidenceIntervals,
    pub simulation: SimulationOutput,
}

/// An analysis tied to the session state it was computed from.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub generation: u64,
    pub source: String,
    pub output: AnalysisOutput,
}

/// Run every engine against the session's current snapshot.
///
/// Fails with exit code 3 when nothing has been loaded.
pub fn analyze_session(session: &Session, config: &AnalysisConfig) -> Result<SessionRun, AppError> {
    let generation = session.generation();
    let (Some(dataset), Some(source)) = (session.snapshot(), session.source()) else {
        return Err(AppError::new(3, "No dataset loaded."));
    };
    let source = source.to_string();

    let output = run_analysis(&dataset, config)?;
    Ok(SessionRun {
        generation,
        source,
        output,
    })
}

/// Run every engine against `dataset`.
pub fn run_analysis(dataset: &Dataset, config: &AnalysisConfig) -> Result<AnalysisOutput, AppError> {
    info!(rows = dataset.len(), "analysis started");

    let ((metrics, turnover), (forecast, (confidence, simulation))) = rayon::join(
        || {
            (
                compute_metrics(dataset).summary,
                turnover_by_month(dataset),
            )
        },
        || {
            rayon::join(
                || compute_wma_with_weights(dataset, &config.wma_weights),
                || {
                    rayon::join(
                        || compute_confidence_intervals(dataset, &config.confidence),
                        || simulate(dataset, &config.policy),
                    )
                },
            )
        },
    );

    let output = AnalysisOutput {
        metrics,
        turnover_by_month: turnover,
        forecast: forecast?,
        confidence: confidence?,
        simulation,
    };

    info!(
        groups = output.forecast.forecasts.len(),
        stockouts = output.simulation.summary.potential_stockouts,
        "analysis finished"
    );
    Ok(output)
}
