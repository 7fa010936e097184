// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (p_{t-w+1} + ... + p_t) / w
//
// Undefined (NaN) for the first `w - 1` positions.
// =============================================================================

/// Compute the SMA series for `prices` over a trailing `window`.
///
/// # Edge cases
/// - `window == 0` => all NaN
/// - `prices.len() < window` => all NaN
pub fn calculate_sma(prices: &[f64], window: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; prices.len()];
    if window == 0 || prices.len() < window {
        return result;
    }

    let w = window as f64;
    for i in (window - 1)..prices.len() {
        result[i] = prices[i + 1 - window..=i].iter().sum::<f64>() / w;
    }
    result
}
