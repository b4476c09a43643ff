//! Technical indicators implementation
//!
//! Every indicator returns a vector aligned with its input, padded with NaN
//! where the window is not yet full.

/// Percentage change from the previous value
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        result[i] = values[i] / values[i - 1] - 1.0;
    }
    result
}

/// Apply `f` over each full window of `period` values.
///
/// A window containing NaN yields NaN.
fn rolling<F>(values: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut result = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    for i in (period - 1)..values.len() {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().all(|v| !v.is_nan()) {
            result[i] = f(window);
        }
    }

    result
}

/// Simple Moving Average
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling sample standard deviation (n - 1 denominator)
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| {
        if w.len() < 2 {
            return f64::NAN;
        }
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let variance = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (w.len() - 1) as f64;
        variance.sqrt()
    })
}

/// Intraday range relative to the open
pub fn range_pct(open: f64, high: f64, low: f64) -> f64 {
    if open == 0.0 {
        return f64::NAN;
    }
    (high - low) / open
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_change() {
        let result = pct_change(&[10.0, 11.0, 9.9]);
        assert!(result[0].is_nan());
        assert!((result[1] - 0.1).abs() < 1e-12);
        assert!((result[2] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_sma() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10);
        assert!((result[3] - 3.0).abs() < 1e-10);
        assert!((result[4] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_sma_short_input() {
        let result = sma(&[1.0, 2.0], 5);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_std_skips_nan_windows() {
        let values = vec![f64::NAN, 1.0, 2.0, 3.0, 4.0];
        let result = rolling_std(&values, 3);

        assert!(result[2].is_nan());
        assert!((result[3] - 1.0).abs() < 1e-12);
        assert!((result[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_range_pct() {
        assert!((range_pct(10.0, 11.0, 9.0) - 0.2).abs() < 1e-12);
        assert!(range_pct(0.0, 1.0, 0.5).is_nan());
    }
}
