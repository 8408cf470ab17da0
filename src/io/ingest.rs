//! CSV ingest.
//!
//! Turns an uploaded sales/inventory CSV into a `Dataset` of raw rows.
//!
//! Design goals:
//! - **Strict schema**: every required header must be present, spelled exactly
//!   (clear error + exit code 2 otherwise)
//! - **No numeric validation**: numeric cells stay as text; the cleaner
//!   decides per computation what is usable
//! - **Row-level CSV errors are reported, not fatal**

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{
    Dataset, Month, RawRecord, HEADER_COST, HEADER_INVENTORY, HEADER_ITEM, HEADER_MONTH,
    HEADER_REVENUE, HEADER_SOLD, HEADER_STORE, REQUIRED_HEADERS,
};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedDataset {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows whose month text is not one of the 12 abbreviations.
    pub unrecognized_months: usize,
}

/// Load a dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<IngestedDataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_dataset(file)?;

    info!(
        path = %path.display(),
        rows_read = ingested.rows_read,
        rows_kept = ingested.dataset.len(),
        row_errors = ingested.row_errors.len(),
        "dataset loaded"
    );
    Ok(ingested)
}

/// Read a dataset from any CSV source (header row required).
pub fn read_dataset<R: Read>(source: R) -> Result<IngestedDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut unrecognized_months = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unparseable CSV row");
                row_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let row = parse_row(&record, &header_map);
        if row.month.is_none() {
            unrecognized_months += 1;
        }
        rows.push(row);
    }

    if unrecognized_months > 0 {
        warn!(
            unrecognized_months,
            "rows with unrecognized month are excluded from month-ordered results"
        );
    }

    Ok(IngestedDataset {
        dataset: Dataset::new(rows),
        row_errors,
        rows_read,
        unrecognized_months,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|h| !header_map.contains_key(*h))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let list = missing
        .iter()
        .map(|h| format!("`{h}`"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::input(format!("Missing required column(s): {list}")))
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> RawRecord {
    let month_raw = get_cell(record, header_map, HEADER_MONTH);
    RawRecord {
        store: get_cell(record, header_map, HEADER_STORE),
        item: get_cell(record, header_map, HEADER_ITEM),
        month: Month::parse(&month_raw),
        month_raw,
        inventory_on_hand: get_cell(record, header_map, HEADER_INVENTORY),
        units_sold: get_cell(record, header_map, HEADER_SOLD),
        cost: get_cell(record, header_map, HEADER_COST),
        revenue: get_cell(record, header_map, HEADER_REVENUE),
    }
}

/// Cell text, or an empty string when the row is shorter than the header.
fn get_cell(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> String {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "Store,Item Name,Month,Number Stored in Inventory,Number Sold,Cost (PHP),Revenue (PHP)";

    #[test]
    fn reads_rows_and_keeps_cells_as_text() {
        let csv = format!("{HEADER}\nStore A,Item X,Jan,200,650,1000,2000\nStore A,Item X,Foo,abc,660,,2000\n");
        let ingested = read_dataset(csv.as_bytes()).unwrap();

        assert_eq!(ingested.rows_read, 2);
        assert_eq!(ingested.dataset.len(), 2);
        assert_eq!(ingested.unrecognized_months, 1);

        let first = &ingested.dataset.rows[0];
        assert_eq!(first.store, "Store A");
        assert_eq!(first.item, "Item X");
        assert_eq!(first.month, Some(Month::Jan));
        assert_eq!(first.units_sold, "650");

        let second = &ingested.dataset.rows[1];
        assert_eq!(second.month, None);
        assert_eq!(second.month_raw, "Foo");
        assert_eq!(second.inventory_on_hand, "abc");
        assert_eq!(second.cost, "");
    }

    #[test]
    fn column_order_does_not_matter() {
        let csv = "Revenue (PHP),Cost (PHP),Number Sold,Number Stored in Inventory,Month,Item Name,Store\n9,8,7,6,Feb,Widget,North\n";
        let ingested = read_dataset(csv.as_bytes()).unwrap();
        let row = &ingested.dataset.rows[0];
        assert_eq!(row.store, "North");
        assert_eq!(row.month, Some(Month::Feb));
        assert_eq!(row.inventory_on_hand, "6");
        assert_eq!(row.revenue, "9");
    }

    #[test]
    fn missing_columns_are_structural_errors() {
        let csv = "Store,Item Name,Month,Number Sold\nA,X,Jan,1\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Number Stored in Inventory"));
        assert!(err.message().contains("Revenue (PHP)"));
    }

    #[test]
    fn headers_are_case_sensitive() {
        let csv = HEADER.replace("Store", "store");
        assert!(read_dataset(csv.as_bytes()).is_err());
    }

    #[test]
    fn bom_and_short_rows_are_tolerated() {
        let csv = format!("\u{feff}{HEADER}\nStore A,Item X,Mar,10\n");
        let ingested = read_dataset(csv.as_bytes()).unwrap();
        let row = &ingested.dataset.rows[0];
        assert_eq!(row.store, "Store A");
        assert_eq!(row.inventory_on_hand, "10");
        assert_eq!(row.units_sold, "");
    }

    #[test]
    fn unparseable_rows_are_skipped_and_reported() {
        let mut bytes = format!("{HEADER}\nStore A,Item X,Jan,1,2,3,4\n").into_bytes();
        bytes.extend_from_slice(b"Store \xff,Item X,Feb,1,2,3,4\n");
        bytes.extend_from_slice(b"Store C,Item Z,Mar,5,6,7,8\n");

        let ingested = read_dataset(bytes.as_slice()).unwrap();

        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.dataset.len(), 2);
        assert_eq!(ingested.dataset.rows[0].store, "Store A");
        assert_eq!(ingested.dataset.rows[1].store, "Store C");

        assert_eq!(ingested.row_errors.len(), 1);
        let error = &ingested.row_errors[0];
        assert_eq!(error.line, 3);
        assert_eq!(error.message.matches("CSV parse error").count(), 1, "{}", error.message);
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let ingested = read_dataset(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(ingested.dataset.is_empty());
        assert_eq!(ingested.rows_read, 0);
    }

    #[test]
    fn load_dataset_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Store B,Item Y,Jan,100,100,50,80").unwrap();
        let ingested = load_dataset(file.path()).unwrap();
        assert_eq!(ingested.dataset.len(), 1);
    }

    #[test]
    fn load_dataset_reports_unreadable_file() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
