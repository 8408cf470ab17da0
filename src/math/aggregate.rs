//! Column aggregates with the dashboard's missing-value conventions.
//!
//! - `sum` of nothing is `0.0`
//! - `mean` of nothing is NaN (callers treat NaN as "undefined")
//! - `mean_skip_nan` excludes NaN cells but keeps infinities

/// Plain sum; empty input sums to zero.
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().sum()
}

/// Arithmetic mean; NaN for empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (total, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, n), v| (total + v, n + 1));
    if n == 0 { f64::NAN } else { total / n as f64 }
}

/// Mean over the non-NaN values; NaN when none remain.
pub fn mean_skip_nan<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    mean(values.into_iter().filter(|v| !v.is_nan()))
}

/// `numerator / denominator` when the denominator is strictly positive, else NaN.
pub fn ratio_if_positive(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::NAN
    }
}
