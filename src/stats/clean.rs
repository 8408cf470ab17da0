//! Table cleaning: numeric coercion plus a finiteness filter.
//!
//! `clean` is deliberately lossy. A cell that does not parse becomes NaN (the
//! missing marker) and any row with a non-finite value in one of the
//! *requested* columns is dropped. Nothing is reported; the row is simply not
//! part of that computation's input.
//!
//! Every engine cleans on its own column set. Two engines reading the same
//! dataset can therefore see different rows, and that difference is part of
//! the expected output.

use crate::domain::{Dataset, NumericColumn, RawRecord, Record, Table};

/// Coerce one cell to a number. Empty or unparseable text becomes NaN.
pub fn coerce_cell(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Coerce every numeric cell of a raw row without filtering.
pub fn coerce_record(raw: &RawRecord) -> Record {
    Record {
        store: raw.store.clone(),
        item: raw.item.clone(),
        month: raw.month,
        inventory_on_hand: coerce_cell(&raw.inventory_on_hand),
        units_sold: coerce_cell(&raw.units_sold),
        cost: coerce_cell(&raw.cost),
        revenue: coerce_cell(&raw.revenue),
    }
}

/// Coerce and keep only rows whose `columns` are all finite.
///
/// Never mutates the dataset; always returns a fresh table.
pub fn clean(dataset: &Dataset, columns: &[NumericColumn]) -> Table {
    let rows = dataset
        .rows
        .iter()
        .map(coerce_record)
        .filter(|record| columns.iter().all(|&c| record.value(c).is_finite()))
        .collect();
    Table { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Month;

    fn raw(inv: &str, sold: &str, cost: &str, revenue: &str) -> RawRecord {
        RawRecord {
            store: "S".to_string(),
            item: "I".to_string(),
            month: Some(Month::Jan),
            month_raw: "Jan".to_string(),
            inventory_on_hand: inv.to_string(),
            units_sold: sold.to_string(),
            cost: cost.to_string(),
            revenue: revenue.to_string(),
        }
    }

    #[test]
    fn coerce_cell_handles_malformed_text() {
        assert_eq!(coerce_cell(" 12.5 "), 12.5);
        assert!(coerce_cell("").is_nan());
        assert!(coerce_cell("n/a").is_nan());
        assert!(coerce_cell("1,000").is_nan());
        assert!(coerce_cell("inf").is_infinite());
    }

    #[test]
    fn valid_rows_pass_through_unchanged() {
        let dataset = Dataset::new(vec![
            raw("200", "10", "5", "9"),
            raw("150", "20", "6", "8"),
            raw("0", "0", "0", "0"),
        ]);
        let table = clean(
            &dataset,
            &[NumericColumn::InventoryOnHand, NumericColumn::UnitsSold],
        );
        assert_eq!(table.len(), 3);
        let inv: Vec<f64> = table.column(NumericColumn::InventoryOnHand).collect();
        let sold: Vec<f64> = table.column(NumericColumn::UnitsSold).collect();
        assert_eq!(inv, vec![200.0, 150.0, 0.0]);
        assert_eq!(sold, vec![10.0, 20.0, 0.0]);
    }

    #[test]
    fn drops_rows_with_non_finite_requested_columns() {
        let dataset = Dataset::new(vec![
            raw("200", "10", "5", "9"),
            raw("abc", "10", "5", "9"),
            raw("200", "", "5", "9"),
            raw("inf", "10", "5", "9"),
        ]);
        let table = clean(
            &dataset,
            &[NumericColumn::InventoryOnHand, NumericColumn::UnitsSold],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].inventory_on_hand, 200.0);
    }

    #[test]
    fn unrequested_columns_do_not_filter() {
        let dataset = Dataset::new(vec![raw("200", "10", "bad", "bad")]);
        let table = clean(&dataset, &[NumericColumn::UnitsSold]);
        assert_eq!(table.len(), 1);
        assert!(table.rows[0].cost.is_nan());
    }

    #[test]
    fn row_count_never_grows_with_more_columns() {
        let dataset = Dataset::new(vec![
            raw("1", "2", "3", "4"),
            raw("x", "2", "3", "4"),
            raw("1", "x", "3", "4"),
            raw("1", "2", "x", "4"),
            raw("1", "2", "3", "x"),
            raw("", "", "", ""),
        ]);

        let mut previous = dataset.len();
        for n in 0..=NumericColumn::ALL.len() {
            let kept = clean(&dataset, &NumericColumn::ALL[..n]).len();
            assert!(kept <= previous, "{n} columns kept {kept} > {previous}");
            previous = kept;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn input_is_not_mutated() {
        let dataset = Dataset::new(vec![raw("x", "1", "1", "1")]);
        let before = dataset.clone();
        let _ = clean(&dataset, &NumericColumn::ALL);
        assert_eq!(dataset, before);
    }
}
