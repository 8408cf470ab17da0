//! Percentiles with linear interpolation between order statistics.
//!
//! For `n` sorted values and a percentile `p ∈ [0, 100]` the rank is
//! `r = p/100 * (n - 1)`; the result interpolates between the values at
//! `floor(r)` and `ceil(r)`. This is the usual "linear" definition used by
//! spreadsheet and dataframe tools.

/// Both tails of a two-sided `level` interval, e.g. `0.95` → (2.5, 97.5).
///
/// Sorts `values` in place. Returns NaN bounds for empty input, or when any
/// value is NaN.
pub fn two_sided_bounds(values: &mut [f64], level: f64) -> (f64, f64) {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return (f64::NAN, f64::NAN);
    }
    let tail = (1.0 - level) / 2.0 * 100.0;
    values.sort_by(f64::total_cmp);
    (
        interpolate_sorted(values, tail),
        interpolate_sorted(values, 100.0 - tail),
    )
}

fn interpolate_sorted(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly() {
        let mut v = [4.0, 1.0, 3.0, 2.0];
        // rank = 0.025 * 3 = 0.075 and 0.975 * 3 = 2.925
        let (lo, hi) = two_sided_bounds(&mut v, 0.95);
        assert!((lo - 1.075).abs() < 1e-12);
        assert!((hi - 3.925).abs() < 1e-12);
        assert_eq!(v, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn level_near_zero_collapses_to_median() {
        let mut v = [5.0, 1.0, 3.0];
        let (lo, hi) = two_sided_bounds(&mut v, 1e-12);
        assert!((lo - 3.0).abs() < 1e-9);
        assert!((hi - 3.0).abs() < 1e-9);
    }

    #[test]
    fn nan_and_empty_yield_nan() {
        let (lo, hi) = two_sided_bounds(&mut [], 0.95);
        assert!(lo.is_nan() && hi.is_nan());
        let (lo, hi) = two_sided_bounds(&mut [1.0, f64::NAN], 0.95);
        assert!(lo.is_nan() && hi.is_nan());
    }

    #[test]
    fn percentile_bounds_on_a_uniform_grid() {
        let mut v: Vec<f64> = (0..=100).map(f64::from).collect();
        let (lo, hi) = two_sided_bounds(&mut v, 0.95);
        assert!((lo - 2.5).abs() < 1e-12);
        assert!((hi - 97.5).abs() < 1e-12);
    }
}
