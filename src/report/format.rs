//! Formatted terminal output.
//!
//! Formatting stays in one place so the statistics code stays clean and
//! output changes are localized. Undefined values print as `NaN` (and
//! `NaN%`); callers never have to special-case them.

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{
    ConfidenceIntervals, ConfidenceSettings, ForecastOutput, Interval, MetricsSummary,
    MonthTurnover, SimulationOutput,
};
use crate::io::ingest::IngestedDataset;

/// Rows shown in the forecast table before it is cut off.
const MAX_FORECAST_ROWS: usize = 25;

pub fn format_ingest_summary(ingested: &IngestedDataset, source: &str) -> String {
    let mut out = String::new();
    out.push_str("=== insights - Inventory & Sales ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} kept={} skipped={}",
        ingested.rows_read,
        ingested.dataset.len(),
        ingested.row_errors.len(),
    ));
    if ingested.unrecognized_months > 0 {
        out.push_str(&format!(
            " | unrecognized months={}",
            ingested.unrecognized_months
        ));
    }
    out.push('\n');
    out
}

pub fn format_metrics(summary: &MetricsSummary, by_month: &[MonthTurnover]) -> String {
    let mut out = String::new();

    out.push_str("Key metrics:\n");
    out.push_str(&format!("- rows used          : {}\n", summary.rows_used));
    out.push_str(&format!("- sales volume       : {}\n", fmt_num(summary.sales_volume, 0)));
    out.push_str(&format!("- total revenue      : {}\n", fmt_num(summary.total_revenue, 2)));
    out.push_str(&format!("- total cost         : {}\n", fmt_num(summary.total_cost, 2)));
    out.push_str(&format!(
        "- gross profit margin: {}\n",
        fmt_pct(summary.gross_profit_margin * 100.0)
    ));
    out.push_str(&format!("- avg inventory      : {}\n", fmt_num(summary.avg_inventory, 2)));
    out.push_str(&format!("- inventory turnover : {}\n", fmt_num(summary.inv_turnover, 2)));
    out.push_str(&format!(
        "- holding period     : {} days\n",
        fmt_num(summary.holding_period, 1)
    ));

    if !by_month.is_empty() {
        out.push_str("\nTurnover by month:\n");
        out.push_str(&format!(
            "{:<6} {:>12} {:>14} {:>10}\n",
            "month", "units_sold", "avg_inventory", "turnover"
        ));
        out.push_str(&format!("{:-<6} {:-<12} {:-<14} {:-<10}\n", "", "", "", ""));
        for m in by_month {
            out.push_str(&format!(
                "{:<6} {:>12} {:>14} {:>10}\n",
                m.month,
                fmt_num(m.units_sold, 0),
                fmt_num(m.avg_inventory, 2),
                fmt_num(m.turnover, 3),
            ));
        }
    }

    out
}

pub fn format_forecast(forecast: &ForecastOutput) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Forecast (WMA, weights newest first: {}):\n",
        fmt_vec(&forecast.weights)
    ));
    out.push_str(&format!("{:<20} {:<28} {:>12}\n", "store", "item", "forecast"));
    out.push_str(&format!("{:-<20} {:-<28} {:-<12}\n", "", "", ""));
    for f in forecast.forecasts.iter().take(MAX_FORECAST_ROWS) {
        out.push_str(&format!(
            "{:<20} {:<28} {:>12}\n",
            truncate(&f.store, 20),
            truncate(&f.item, 28),
            fmt_num(f.forecast, 1),
        ));
    }
    let hidden = forecast.forecasts.len().saturating_sub(MAX_FORECAST_ROWS);
    if hidden > 0 {
        out.push_str(&format!("... {hidden} more group(s)\n"));
    }

    out.push_str(&format!(
        "Total actual: {} | total forecast: {}\n",
        fmt_num(forecast.total_actual, 0),
        fmt_num(forecast.total_forecast, 1),
    ));
    out
}

pub fn format_confidence(ci: &ConfidenceIntervals, settings: &ConfidenceSettings) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Confidence intervals ({:.0}%, {} resamples, seed {}):\n",
        settings.level * 100.0,
        settings.resamples,
        settings.seed,
    ));
    out.push_str(&format!("- inventory turnover : {}\n", fmt_interval(&ci.turnover, 3)));
    out.push_str(&format!("- mean units sold    : {}\n", fmt_interval(&ci.sales, 2)));
    out.push_str(&format!("- financial savings  : {}\n", fmt_interval(&ci.financial, 2)));
    out
}

pub fn format_simulation(sim: &SimulationOutput) -> String {
    let s = &sim.summary;
    let mut out = String::new();

    out.push_str(&format!(
        "Reorder policy (reorder point={}, lead time={} days, safety stock={}):\n",
        fmt_num(s.params.reorder_point, 0),
        fmt_num(s.params.lead_time_days, 0),
        fmt_num(s.params.safety_stock, 0),
    ));
    out.push_str(&format!("- rows evaluated     : {}\n", s.rows));
    out.push_str(&format!("- potential stockouts: {}\n", s.potential_stockouts));
    out.push_str(&format!("- stockout risk      : {}\n", fmt_pct(s.stockout_risk_pct)));
    out.push_str(&format!("- mean holding cost  : {}\n", fmt_num(s.mean_holding_cost, 2)));
    out.push_str(&format!("- total holding cost : {}\n", fmt_num(s.total_holding_cost, 2)));

    if !sim.per_item_holding_cost.is_empty() {
        out.push_str("\nHighest mean holding cost by item:\n");
        for (rank, item) in sim.per_item_holding_cost.iter().enumerate() {
            out.push_str(&format!(
                "{:>2}. {:<28} {:>10}\n",
                rank + 1,
                truncate(&item.item, 28),
                fmt_num(item.mean_holding_cost, 2),
            ));
        }
    }

    out
}

/// Every section of a full run, in dashboard order.
pub fn format_report(output: &AnalysisOutput, settings: &ConfidenceSettings) -> String {
    [
        format_metrics(&output.metrics, &output.turnover_by_month),
        format_forecast(&output.forecast),
        format_confidence(&output.confidence, settings),
        format_simulation(&output.simulation),
    ]
    .join("\n")
}

fn fmt_num(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    format!("{v:.decimals$}")
}

fn fmt_pct(v: f64) -> String {
    format!("{}%", fmt_num(v, 1))
}

fn fmt_interval(i: &Interval, decimals: usize) -> String {
    format!(
        "[{}, {}]",
        fmt_num(i.low, decimals),
        fmt_num(i.high, decimals)
    )
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
