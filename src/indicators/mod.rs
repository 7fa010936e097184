// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions over a price slice (oldest first).
// Every function returns a vector with exactly one value per input element;
// positions whose trailing window reaches before the start of the input hold
// `f64::NAN`, never zero. A NaN input makes every trailing window that
// contains it NaN; the exponential averages hold their last value across it.

pub mod bollinger;
pub mod drawdown;
pub mod ema;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod stats;
pub mod volatility;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use drawdown::{drawdown_curve, max_drawdown};
pub use ema::{calculate_ema, exponential_smoothing};
pub use macd::{calculate_macd, MacdSeries};
pub use returns::{cumulative_returns, daily_returns};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use volatility::rolling_volatility;
