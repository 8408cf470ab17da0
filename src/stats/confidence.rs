//! Percentile bootstrap confidence intervals.
//!
//! - turnover: resample rows, clean on inventory + sold, `sum(sold) / mean(inventory)`
//! - sales: resample rows, mean of units sold (missing cells skipped)
//! - financial: synthetic savings draws from `Normal(6030, 0.2 * 6030)`
//!   clipped at zero; independent of the dataset
//!
//! Cells are coerced once per statistic; resamples draw from the coerced
//! values, so a resample never re-parses text.
//!
//! Reproducibility: each statistic gets its own `StdRng` stream derived from
//! the configured seed. The stream first draws one seed per resample; the
//! resamples are then evaluated in parallel, each with its own generator. The
//! bounds are therefore identical for identical inputs and seed, whatever the
//! thread count.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{ConfidenceIntervals, ConfidenceSettings, Dataset, Interval};
use crate::error::AppError;
use crate::math::{mean, mean_skip_nan, ratio_if_positive, sum, two_sided_bounds};
use crate::stats::clean::coerce_cell;

/// Mean of the synthetic savings distribution (PHP).
pub const FINANCIAL_SAVINGS_MEAN: f64 = 6030.0;

/// Standard deviation of the savings distribution, relative to its mean.
pub const FINANCIAL_SAVINGS_REL_SD: f64 = 0.2;

const TURNOVER_STREAM: u64 = 1;
const SALES_STREAM: u64 = 2;
const FINANCIAL_STREAM: u64 = 3;

/// Compute all three intervals.
pub fn compute_confidence_intervals(
    dataset: &Dataset,
    settings: &ConfidenceSettings,
) -> Result<ConfidenceIntervals, AppError> {
    validate_settings(settings)?;

    info!(
        rows = dataset.len(),
        resamples = settings.resamples,
        seed = settings.seed,
        "bootstrapping confidence intervals"
    );

    let ((turnover, sales), financial) = rayon::join(
        || {
            rayon::join(
                || turnover_interval(dataset, settings),
                || sales_interval(dataset, settings),
            )
        },
        || financial_interval(settings),
    );

    Ok(ConfidenceIntervals {
        turnover,
        sales,
        financial: financial?,
    })
}

fn validate_settings(settings: &ConfidenceSettings) -> Result<(), AppError> {
    if settings.resamples == 0 {
        return Err(AppError::input("Bootstrap resample count must be > 0."));
    }
    if !(settings.level.is_finite() && settings.level > 0.0 && settings.level < 1.0) {
        return Err(AppError::input(format!(
            "Confidence level must be in (0, 1) (got {}).",
            settings.level
        )));
    }
    Ok(())
}

/// Interval for inventory turnover. Non-finite resample results are discarded.
pub fn turnover_interval(dataset: &Dataset, settings: &ConfidenceSettings) -> Interval {
    let cells: Vec<StockCells> = dataset
        .rows
        .iter()
        .map(|r| StockCells {
            inventory_on_hand: coerce_cell(&r.inventory_on_hand),
            units_sold: coerce_cell(&r.units_sold),
        })
        .collect();
    let stats = bootstrap(&cells, settings, TURNOVER_STREAM, turnover_statistic);
    let mut finite: Vec<f64> = stats.into_iter().filter(|v| v.is_finite()).collect();
    debug!(kept = finite.len(), "turnover resamples with finite result");
    to_interval(two_sided_bounds(&mut finite, settings.level))
}

/// Interval for mean units sold per row.
pub fn sales_interval(dataset: &Dataset, settings: &ConfidenceSettings) -> Interval {
    let sold: Vec<f64> = dataset.rows.iter().map(|r| coerce_cell(&r.units_sold)).collect();
    let mut stats = bootstrap(&sold, settings, SALES_STREAM, sales_statistic);
    to_interval(two_sided_bounds(&mut stats, settings.level))
}

/// Interval for the synthetic savings figure.
pub fn financial_interval(settings: &ConfidenceSettings) -> Result<Interval, AppError> {
    let normal = Normal::new(
        FINANCIAL_SAVINGS_MEAN,
        FINANCIAL_SAVINGS_MEAN * FINANCIAL_SAVINGS_REL_SD,
    )
    .map_err(|e| AppError::new(4, format!("Savings distribution error: {e}")))?;

    let mut rng = stream_rng(settings.seed, FINANCIAL_STREAM);
    let mut draws: Vec<f64> = (0..settings.resamples)
        .map(|_| normal.sample(&mut rng).max(0.0))
        .collect();

    Ok(to_interval(two_sided_bounds(&mut draws, settings.level)))
}

/// The two cells turnover needs, already coerced.
#[derive(Debug, Clone, Copy)]
struct StockCells {
    inventory_on_hand: f64,
    units_sold: f64,
}

/// `sum(sold) / mean(inventory)` over the rows where both cells are finite.
fn turnover_statistic(sample: &[&StockCells]) -> f64 {
    let kept = sample
        .iter()
        .filter(|c| c.inventory_on_hand.is_finite() && c.units_sold.is_finite());
    let total_sold = sum(kept.clone().map(|c| c.units_sold));
    let avg_inventory = mean(kept.map(|c| c.inventory_on_hand));
    ratio_if_positive(total_sold, avg_inventory)
}

fn sales_statistic(sample: &[&f64]) -> f64 {
    mean_skip_nan(sample.iter().map(|&&v| v))
}

/// Evaluate `statistic` on `settings.resamples` resamples (with replacement).
///
/// Returns NaN for every resample when there are no rows to draw from.
fn bootstrap<T, F>(rows: &[T], settings: &ConfidenceSettings, stream: u64, statistic: F) -> Vec<f64>
where
    T: Sync,
    F: Fn(&[&T]) -> f64 + Sync,
{
    if rows.is_empty() {
        return vec![f64::NAN; settings.resamples];
    }

    let mut rng = stream_rng(settings.seed, stream);
    let seeds: Vec<u64> = (0..settings.resamples).map(|_| rng.r#gen()).collect();
    let n = rows.len();

    seeds
        .par_iter()
        .map_init(
            || Vec::<&T>::with_capacity(n),
            |sample, &seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                sample.clear();
                sample.extend((0..n).map(|_| &rows[rng.gen_range(0..n)]));
                statistic(sample.as_slice())
            },
        )
        .collect()
}

fn stream_rng(seed: u64, stream: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn to_interval((low, high): (f64, f64)) -> Interval {
    if low.is_nan() || high.is_nan() {
        return Interval::UNDEFINED;
    }
    Interval { low, high }
}
