//! JSON export of a full analysis run.
//!
//! The file is the portable snapshot of everything the dashboard displays:
//! headline metrics, monthly turnover, forecasts, intervals and the policy
//! simulation. Undefined values (NaN) are written as `null`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::app::pipeline::AnalysisOutput;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct AnalysisFile<'a> {
    pub tool: &'static str,
    pub source: &'a str,
    pub generated_at: DateTime<Local>,
    #[serde(flatten)]
    pub output: &'a AnalysisOutput,
}

/// Write the analysis JSON file.
pub fn write_analysis_json(path: &Path, output: &AnalysisOutput, source: &str) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(4, format!("Failed to create analysis JSON '{}': {e}", path.display()))
    })?;

    let doc = AnalysisFile {
        tool: "insights",
        source,
        generated_at: Local::now(),
        output,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(4, format!("Failed to write analysis JSON: {e}")))?;

    tracing::info!(path = %path.display(), "analysis json written");
    Ok(())
}
