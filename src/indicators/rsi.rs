// =============================================================================
// Relative Strength Index (RSI) - exponential smoothing with alpha = 1/period
// =============================================================================
//
// Step 1 - Compute price changes (deltas) from consecutive prices. The first
//          position has no delta.
// Step 2 - Split into gains max(delta, 0) and losses max(-delta, 0).
// Step 3 - Smooth both with an EMA of alpha = 1/period, seeded at the first
//          defined delta.
// Step 4 - RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A zero average loss leaves RS undefined and the RSI is NaN for that date.
// It is not clamped to 100.
// =============================================================================

use super::ema::exponential_smoothing;

/// Compute the RSI series for `prices` with look-back `period`.
///
/// The output has the same length as the input; index 0 is always NaN.
///
/// # Edge cases
/// - `period == 0` => all NaN
/// - Average loss of exactly zero => NaN (degenerate ratio)
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    if period == 0 || n == 0 {
        return vec![f64::NAN; n];
    }

    // --- Gains and losses ----------------------------------------------------
    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for t in 1..n {
        let delta = prices[t] - prices[t - 1];
        if delta.is_nan() {
            continue;
        }
        gains[t] = delta.max(0.0);
        losses[t] = (-delta).max(0.0);
    }

    // --- Smoothed averages ---------------------------------------------------
    let alpha = 1.0 / period as f64;
    let avg_gain = exponential_smoothing(&gains, alpha);
    let avg_loss = exponential_smoothing(&losses, alpha);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&gain, &loss)| rsi_from_averages(gain, loss))
        .collect()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return f64::NAN;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
