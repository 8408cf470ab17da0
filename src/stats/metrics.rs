//! Headline inventory and sales metrics.
//!
//! All ratios follow the same rule: a zero (or undefined) denominator yields
//! NaN instead of an error, and NaN flows through to anything derived from it.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Dataset, MetricsOutput, MetricsSummary, Month, MonthTurnover, NumericColumn};
use crate::math::{mean, ratio_if_positive, sum};
use crate::stats::clean::clean;

/// Days used to convert turnover into a holding period.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Compute totals, margin, turnover and holding period.
pub fn compute_metrics(dataset: &Dataset) -> MetricsOutput {
    let cleaned = clean(dataset, &NumericColumn::ALL);

    let total_inventory = sum(cleaned.column(NumericColumn::InventoryOnHand));
    let total_sold = sum(cleaned.column(NumericColumn::UnitsSold));
    let total_cost = sum(cleaned.column(NumericColumn::Cost));
    let total_revenue = sum(cleaned.column(NumericColumn::Revenue));

    let sales_volume = total_sold;
    let gross_profit_margin = ratio_if_positive(total_revenue - total_cost, total_revenue);
    let avg_inventory = mean(cleaned.column(NumericColumn::InventoryOnHand));
    let inv_turnover = ratio_if_positive(sales_volume, avg_inventory);
    let holding_period = if sales_volume > 0.0 && avg_inventory > 0.0 {
        DAYS_PER_YEAR / inv_turnover
    } else {
        f64::NAN
    };

    debug!(
        rows_used = cleaned.len(),
        rows_total = dataset.len(),
        sales_volume,
        avg_inventory,
        "metrics computed"
    );

    MetricsOutput {
        summary: MetricsSummary {
            rows_used: cleaned.len(),
            total_inventory,
            total_sold,
            total_cost,
            total_revenue,
            sales_volume,
            gross_profit_margin,
            avg_inventory,
            inv_turnover,
            holding_period,
        },
        cleaned,
    }
}

/// Turnover per calendar month (`sum(sold) / mean(inventory)`).
///
/// Rows without a recognized month are left out. Only months present in the
/// cleaned data appear, in calendar order.
pub fn turnover_by_month(dataset: &Dataset) -> Vec<MonthTurnover> {
    let cleaned = clean(
        dataset,
        &[NumericColumn::InventoryOnHand, NumericColumn::UnitsSold],
    );

    let mut by_month: BTreeMap<Month, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in &cleaned.rows {
        let Some(month) = record.month else { continue };
        let entry = by_month.entry(month).or_default();
        entry.0.push(record.units_sold);
        entry.1.push(record.inventory_on_hand);
    }

    by_month
        .into_iter()
        .map(|(month, (sold, inventory))| {
            let units_sold = sum(sold);
            let avg_inventory = mean(inventory);
            MonthTurnover {
                month,
                units_sold,
                avg_inventory,
                turnover: ratio_if_positive(units_sold, avg_inventory),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;

    fn raw(month: &str, inv: &str, sold: &str, cost: &str, revenue: &str) -> RawRecord {
        RawRecord {
            store: "Store A".to_string(),
            item: "Item X".to_string(),
            month: Month::parse(month),
            month_raw: month.to_string(),
            inventory_on_hand: inv.to_string(),
            units_sold: sold.to_string(),
            cost: cost.to_string(),
            revenue: revenue.to_string(),
        }
    }

    #[test]
    fn basic_metrics() {
        let dataset = Dataset::new(vec![
            raw("Jan", "100", "50", "400", "1000"),
            raw("Feb", "300", "150", "600", "1000"),
        ]);
        let s = compute_metrics(&dataset).summary;

        assert_eq!(s.rows_used, 2);
        assert!((s.sales_volume - 200.0).abs() < 1e-12);
        assert!((s.total_inventory - 400.0).abs() < 1e-12);
        assert!((s.gross_profit_margin - 0.5).abs() < 1e-12);
        assert!((s.avg_inventory - 200.0).abs() < 1e-12);
        assert!((s.inv_turnover - 1.0).abs() < 1e-12);
        assert!((s.holding_period - 365.0).abs() < 1e-12);
    }

    #[test]
    fn zero_inventory_gives_undefined_ratios() {
        let dataset = Dataset::new(vec![
            raw("Jan", "0", "50", "10", "20"),
            raw("Feb", "0", "70", "10", "20"),
        ]);
        let s = compute_metrics(&dataset).summary;
        assert!(s.inv_turnover.is_nan());
        assert!(s.holding_period.is_nan());
        assert!((s.sales_volume - 120.0).abs() < 1e-12);
    }

    #[test]
    fn zero_revenue_gives_undefined_margin() {
        let dataset = Dataset::new(vec![raw("Jan", "10", "5", "10", "0")]);
        let s = compute_metrics(&dataset).summary;
        assert!(s.gross_profit_margin.is_nan());
    }

    #[test]
    fn zero_sales_gives_undefined_holding_period() {
        let dataset = Dataset::new(vec![raw("Jan", "10", "0", "1", "2")]);
        let s = compute_metrics(&dataset).summary;
        assert_eq!(s.inv_turnover, 0.0);
        assert!(s.holding_period.is_nan());
    }

    #[test]
    fn empty_dataset_degrades_to_sentinels() {
        let out = compute_metrics(&Dataset::default());
        assert_eq!(out.summary.rows_used, 0);
        assert_eq!(out.summary.sales_volume, 0.0);
        assert!(out.summary.avg_inventory.is_nan());
        assert!(out.summary.inv_turnover.is_nan());
        assert!(out.summary.gross_profit_margin.is_nan());
        assert!(out.cleaned.is_empty());
    }

    #[test]
    fn malformed_rows_are_excluded_from_all_totals() {
        let dataset = Dataset::new(vec![
            raw("Jan", "100", "50", "400", "1000"),
            raw("Jan", "100", "50", "oops", "1000"),
        ]);
        let s = compute_metrics(&dataset).summary;
        assert_eq!(s.rows_used, 1);
        assert!((s.total_revenue - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn turnover_by_month_in_calendar_order() {
        let dataset = Dataset::new(vec![
            raw("Mar", "100", "30", "", ""),
            raw("Jan", "100", "10", "", ""),
            raw("Jan", "300", "30", "", ""),
            raw("January", "100", "999", "", ""),
            raw("Feb", "0", "5", "", ""),
        ]);
        let rows = turnover_by_month(&dataset);
        let months: Vec<Month> = rows.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![Month::Jan, Month::Feb, Month::Mar]);

        // Jan: sold 40, mean inventory 200.
        assert!((rows[0].turnover - 0.2).abs() < 1e-12);
        assert!(rows[1].turnover.is_nan());
        assert!((rows[2].turnover - 0.3).abs() < 1e-12);
    }
}
