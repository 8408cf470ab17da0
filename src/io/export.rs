//! CSV exports of per-group forecasts and per-row policy results.
//!
//! Meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;

use crate::domain::{ForecastOutput, SimulationOutput};
use crate::error::AppError;

/// Write one row per (store, item) group: `store,item,forecast`.
pub fn write_forecasts_csv(path: &Path, forecast: &ForecastOutput) -> Result<(), AppError> {
    write_rows(path, &forecast.forecasts)
}

/// Write per-row reorder-policy results.
pub fn write_policy_csv(path: &Path, simulation: &SimulationOutput) -> Result<(), AppError> {
    write_rows(path, &simulation.rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "csv export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, Month, PolicyParams, RawRecord};
    use crate::stats::{compute_wma, simulate};

    fn dataset() -> Dataset {
        let rows = [("A", "X", "Jan", "200", "650"), ("B", "Y", "Jan", "100", "100")]
            .into_iter()
            .map(|(store, item, month, inv, sold)| RawRecord {
                store: store.to_string(),
                item: item.to_string(),
                month: Month::parse(month),
                month_raw: month.to_string(),
                inventory_on_hand: inv.to_string(),
                units_sold: sold.to_string(),
                cost: "1".to_string(),
                revenue: "2".to_string(),
            })
            .collect();
        Dataset::new(rows)
    }

    #[test]
    fn forecasts_csv_has_header_and_one_row_per_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecasts.csv");
        write_forecasts_csv(&path, &compute_wma(&dataset())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "store,item,forecast");
        assert_eq!(lines.len(), 3);
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(&fields[..2], &["A", "X"]);
        let forecast: f64 = fields[2].parse().unwrap();
        assert!((forecast - 65.0).abs() < 1e-9);
    }

    #[test]
    fn policy_csv_has_one_row_per_cleaned_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.csv");
        write_policy_csv(&path, &simulate(&dataset(), &PolicyParams::default())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("store,item,month,inventory_on_hand,units_sold"));
        assert_eq!(lines.count(), 2);
    }
}
