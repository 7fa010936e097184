// =============================================================================
// Daily and cumulative returns
// =============================================================================
//
//   RET_DAILY_t = p_t / p_{t-1} - 1         (undefined at t = 0)
//   RET_CUM_t   = Π (1 + RET_DAILY) - 1     (over defined daily returns)

/// Simple day-over-day returns. Index 0 is NaN.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    let mut result = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return result;
    }
    result.push(f64::NAN);
    result.extend(prices.windows(2).map(|w| w[1] / w[0] - 1.0));
    result
}

/// Compounded returns from a daily-return series.
///
/// Undefined daily returns are skipped by the running product and reported as
/// NaN at their own position.
pub fn cumulative_returns(daily: &[f64]) -> Vec<f64> {
    let mut growth = 1.0;
    daily
        .iter()
        .map(|&r| {
            if r.is_nan() {
                f64::NAN
            } else {
                growth *= 1.0 + r;
                growth - 1.0
            }
        })
        .collect()
}
