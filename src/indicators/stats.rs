// =============================================================================
// Sample statistics shared by the windowed indicators and the summarizer
// =============================================================================

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); NaN below two observations.
///
/// Identical observations give exactly 0 rather than the rounding residue of
/// the summed mean.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    if values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Trailing sample standard deviation over `window` observations.
///
/// The first `window - 1` positions are NaN, as is every window that contains
/// a NaN.
pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }
    for i in (window - 1)..values.len() {
        result[i] = sample_std(&values[i + 1 - window..=i]);
    }
    result
}
