// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = p_0
//   EMA_t  = alpha * p_t + (1 - alpha) * EMA_{t-1}
//
// Unlike the SMA there is no warm-up gap: the first value is the first price.
//
// Gaps: a missing input holds the previous average, and the old average keeps
// decaying by (1 - alpha) per missing step, so the next real observation is
// weighted against (1 - alpha)^(k+1) after k gaps.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The output has the same length as the input.
///
/// # Edge cases
/// - `span == 0` => all NaN
/// - Leading NaN inputs produce NaN; the average is seeded at the first
///   defined value.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    exponential_smoothing(values, 2.0 / (span as f64 + 1.0))
}

/// Recursive exponential smoothing with an explicit smoothing factor.
///
/// Seeded with the first non-NaN value. A NaN met after seeding repeats the
/// current average instead of poisoning the rest of the series.
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut avg = f64::NAN;
    let mut old_weight = 1.0;

    for &value in values {
        if avg.is_nan() {
            avg = value;
        } else {
            old_weight *= 1.0 - alpha;
            if !value.is_nan() {
                if avg != value {
                    avg = (old_weight * avg + alpha * value) / (old_weight + alpha);
                }
                old_weight = 1.0;
            }
        }
        result.push(avg);
    }

    result
}
