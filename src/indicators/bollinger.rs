// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the sample standard deviation of
// the same trailing window. All three share the SMA's warm-up gap.

use super::sma::calculate_sma;
use super::stats::rolling_sample_std;

/// Middle, upper and lower bands aligned with the input prices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub mid: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands for `prices`.
///
/// - `mid`   = SMA(`window`)
/// - `upper` = mid + `num_std` * σ
/// - `lower` = mid - `num_std` * σ
///
/// A `window` of 1 has no sample deviation, so its bands are NaN while `mid`
/// equals the price.
pub fn calculate_bollinger(prices: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let mid = calculate_sma(prices, window);
    let std = rolling_sample_std(prices, window);

    let upper = mid
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m + num_std * s)
        .collect();
    let lower = mid
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m - num_std * s)
        .collect();

    BollingerBands { mid, upper, lower }
}
