// =============================================================================
// price-insight: technical indicators and performance statistics for daily
// price series
// =============================================================================
//
// The analytics core (`indicators`, `engine`, `performance`) is pure and
// synchronous. `market_data` and `report` are the file plumbing used by the
// batch runner binary.

pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod performance;
pub mod report;
pub mod runtime_config;
pub mod types;

pub use engine::{compute_indicators, IndicatorRow, IndicatorSeries, INDICATOR_COLUMNS};
pub use error::{AnalyticsError, Result};
pub use performance::{performance_summary, PerformanceSummary};
pub use runtime_config::{IndicatorParams, RuntimeConfig};
pub use types::{PriceBar, PriceSeries};
