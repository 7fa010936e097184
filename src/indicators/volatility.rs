// =============================================================================
// Rolling volatility
// =============================================================================
//
// Trailing sample standard deviation of daily returns. Not annualised; scale
// by sqrt(252) at the call site if needed.

use super::stats::rolling_sample_std;

/// Rolling volatility of a daily-return series (as produced by
/// [`daily_returns`](super::returns::daily_returns)).
///
/// Because the return at index 0 is undefined, the first defined value sits at
/// index `window`.
pub fn rolling_volatility(daily_returns: &[f64], window: usize) -> Vec<f64> {
    rolling_sample_std(daily_returns, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::returns::daily_returns;

    #[test]
    fn volatility_warm_up_covers_return_gap() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 7) % 5) as f64).collect();
        let vol = rolling_volatility(&daily_returns(&prices), 21);
        assert_eq!(vol.len(), 40);
        assert!(vol[..21].iter().all(|v| v.is_nan()));
        assert!(vol[21..].iter().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn volatility_of_constant_growth_is_near_zero() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let vol = rolling_volatility(&daily_returns(&prices), 5);
        assert!(vol[5..].iter().all(|v| v.abs() < 1e-9));
    }
}
