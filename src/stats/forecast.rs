//! Weighted-moving-average demand forecast per (store, item).
//!
//! The rolling window is right-aligned with partial windows at the start of
//! each series. For `k` weights (`weights[0]` applies to the newest point of a
//! full window) and a window of `j <= k` available points, the last `j`
//! weights are used, reversed, so that:
//!
//! ```text
//! wma = Σ_{i=0}^{j-1} x[newest - i] * weights[k - j + i]
//! ```
//!
//! Short windows are *not* renormalized: a single point `x` gives
//! `x * weights[k - 1]`.
//!
//! The group forecast is the peak finite WMA over the whole series, not the
//! latest one. A group with no finite WMA forecasts `0.0`.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::{
    Dataset, ForecastOutput, GroupForecast, Month, NumericColumn, Record, WmaRow,
    DEFAULT_WMA_WEIGHTS,
};
use crate::error::AppError;
use crate::math::sum;
use crate::stats::clean::clean;

/// Forecast with the default `[0.6, 0.3, 0.1]` weights.
pub fn compute_wma(dataset: &Dataset) -> ForecastOutput {
    forecast_with(dataset, &DEFAULT_WMA_WEIGHTS)
}

/// Forecast with caller-supplied weights (newest first).
pub fn compute_wma_with_weights(
    dataset: &Dataset,
    weights: &[f64],
) -> Result<ForecastOutput, AppError> {
    validate_weights(weights)?;
    Ok(forecast_with(dataset, weights))
}

pub fn validate_weights(weights: &[f64]) -> Result<(), AppError> {
    if weights.is_empty() {
        return Err(AppError::input("WMA weights must not be empty."));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
        return Err(AppError::input(format!(
            "WMA weights must be finite (got {bad})."
        )));
    }
    Ok(())
}

fn forecast_with(dataset: &Dataset, weights: &[f64]) -> ForecastOutput {
    let cleaned = clean(dataset, &[NumericColumn::UnitsSold]);

    // Rows without a calendar month cannot be placed in a series.
    let mut rows: Vec<(Month, Record)> = cleaned
        .rows
        .into_iter()
        .filter_map(|r| r.month.map(|m| (m, r)))
        .collect();
    // Stable sort: duplicate (store, item, month) rows keep upload order.
    rows.sort_by(|(ma, a), (mb, b)| {
        (a.store.as_str(), a.item.as_str(), ma).cmp(&(b.store.as_str(), b.item.as_str(), mb))
    });

    let mut series = Vec::with_capacity(rows.len());
    let mut forecasts = Vec::new();

    for group in rows.chunk_by(|(_, a), (_, b)| a.store == b.store && a.item == b.item) {
        let values: Vec<f64> = group.iter().map(|(_, r)| r.units_sold).collect();
        let wma = rolling_wma(&values, weights);

        let (_, first) = &group[0];
        forecasts.push(GroupForecast {
            store: first.store.clone(),
            item: first.item.clone(),
            forecast: peak_or_zero(&wma),
        });

        for ((month, record), value) in group.iter().zip(wma) {
            series.push(WmaRow {
                store: record.store.clone(),
                item: record.item.clone(),
                month: *month,
                units_sold: record.units_sold,
                wma: value,
            });
        }
    }

    let total_actual = sum(series.iter().map(|r| r.units_sold));
    let total_forecast = sum(forecasts.iter().map(|f| f.forecast));

    debug!(
        groups = forecasts.len(),
        rows = series.len(),
        total_actual,
        total_forecast,
        "wma forecast computed"
    );

    ForecastOutput {
        weights: weights.to_vec(),
        series,
        forecasts,
        total_actual,
        total_forecast,
    }
}

/// Trailing weighted average over `values` (oldest first), one output per input.
pub fn rolling_wma(values: &[f64], weights: &[f64]) -> Vec<f64> {
    let k = weights.len();
    let mut window: VecDeque<f64> = VecDeque::with_capacity(k);
    let mut out = Vec::with_capacity(values.len());

    for &x in values {
        window.push_back(x);
        if window.len() > k {
            window.pop_front();
        }
        let j = window.len();
        let tail = &weights[k - j..];
        // window.iter().rev() walks newest -> oldest; tail walks weights[k-j] -> weights[k-1].
        let value: f64 = window.iter().rev().zip(tail).map(|(x, w)| x * w).sum();
        out.push(value);
    }

    out
}

/// Maximum finite value, or `0.0` if there is none.
fn peak_or_zero(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}
