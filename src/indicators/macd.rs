// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
//   MACD      = EMA(fast) - EMA(slow)
//   Signal    = EMA(MACD, signal)
//   Histogram = MACD - Signal
//
// All three lines inherit the EMA's lack of a warm-up gap.
// =============================================================================

use super::ema::calculate_ema;

/// The three MACD lines, each aligned with the input prices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD for `prices` with the given fast, slow and signal spans
/// (usually 12, 26, 9).
pub fn calculate_macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(prices, fast);
    let slow_ema = calculate_ema(prices, slow);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = calculate_ema(&macd, signal);
    let histogram = macd
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}
