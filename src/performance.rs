// =============================================================================
// Performance Summarizer - PriceSeries -> PerformanceSummary
// =============================================================================
//
// Classic statistics from the adjusted close:
//   total return   = p_last / p_first - 1
//   CAGR           = (1 + total)^(1 / years) - 1,  years = max(days / 365.25, 1e-9)
//   Sharpe         = mean(excess) / std(excess) * sqrt(252)
//                    excess = daily return - ((1 + rf)^(1/252) - 1)
//   max drawdown   = min of the drawdown curve
//
// Degenerate statistics are NaN. A total wipeout reports CAGR = -1.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::indicators::stats::{mean, sample_std};
use crate::indicators::{daily_returns, max_drawdown};
use crate::types::PriceSeries;

/// Trading days per year used to convert the risk-free rate and annualise the
/// Sharpe ratio.
pub const TRADING_DAYS: f64 = 252.0;

const DAYS_PER_YEAR: f64 = 365.25;
const MIN_YEARS: f64 = 1e-9;

/// Aggregate statistics for one price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Calendar days between `start` and `end`.
    pub days: i64,
    pub cagr: f64,
    pub total_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub avg_daily_return: f64,
    pub std_daily_return: f64,
}

/// Summarise `series` against an annual risk-free rate (decimal).
///
/// Fails with `InvalidInput` when the series is empty or lacks adjusted
/// closes.
pub fn performance_summary(series: &PriceSeries, risk_free_rate_annual: f64) -> Result<PerformanceSummary> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AnalyticsError::InvalidInput("price series is empty".into())),
    };
    let prices = series.adjusted_closes()?;

    let ret: Vec<f64> = daily_returns(&prices)
        .into_iter()
        .filter(|r| !r.is_nan())
        .collect();

    let total_return = prices[prices.len() - 1] / prices[0] - 1.0;
    let days = (last.date - first.date).num_days();
    let years = (days as f64 / DAYS_PER_YEAR).max(MIN_YEARS);
    let cagr = compound_annual_growth(total_return, years);

    let sharpe = sharpe_ratio(&ret, risk_free_rate_annual);
    if sharpe.is_nan() {
        debug!(observations = ret.len(), "sharpe ratio undefined");
    }

    Ok(PerformanceSummary {
        start: first.date,
        end: last.date,
        days,
        cagr,
        total_return,
        sharpe,
        max_drawdown: max_drawdown(&prices),
        avg_daily_return: mean(&ret),
        std_daily_return: sample_std(&ret),
    })
}

/// CAGR implied by `total_return` over `years`.
///
/// A wipeout (`total_return <= -1`) is -1 rather than a fractional power of a
/// non-positive base.
fn compound_annual_growth(total_return: f64, years: f64) -> f64 {
    if total_return.is_nan() {
        f64::NAN
    } else if total_return > -1.0 {
        (1.0 + total_return).powf(1.0 / years) - 1.0
    } else {
        -1.0
    }
}

/// Annualised Sharpe ratio of daily returns over a daily-converted risk-free
/// rate.
///
/// NaN with two or fewer observations or when the excess returns have no
/// dispersion.
pub fn sharpe_ratio(daily: &[f64], risk_free_rate_annual: f64) -> f64 {
    if daily.len() <= 2 {
        return f64::NAN;
    }
    let rf_daily = (1.0 + risk_free_rate_annual).powf(1.0 / TRADING_DAYS) - 1.0;
    let excess: Vec<f64> = daily.iter().map(|r| r - rf_daily).collect();

    let std = sample_std(&excess);
    if std.is_nan() || std <= 0.0 {
        return f64::NAN;
    }
    mean(&excess) / std * TRADING_DAYS.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::series_from_prices;
    use crate::types::PriceBar;

    #[test]
    fn empty_series_is_invalid_input() {
        let err = performance_summary(&PriceSeries::default(), 0.0).unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidInput("price series is empty".into()));
    }

    #[test]
    fn missing_adjusted_close_is_invalid_input() {
        let mut bars = series_from_prices(&[10.0, 11.0]).bars().to_vec();
        bars[0].adjusted_close = None;
        let series = PriceSeries::new(bars).unwrap();
        assert!(matches!(
            performance_summary(&series, 0.0),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn wipeout_reports_cagr_minus_one() {
        let summary = performance_summary(&series_from_prices(&[100.0, 0.0]), 0.0).unwrap();
        assert_eq!(summary.total_return, -1.0);
        assert_eq!(summary.cagr, -1.0);
        assert_eq!(summary.max_drawdown, -1.0);
    }

    #[test]
    fn two_observations_have_no_sharpe() {
        let summary = performance_summary(&series_from_prices(&[100.0, 105.0, 99.0]), 0.0).unwrap();
        assert!(summary.sharpe.is_nan());
        assert!(!summary.std_daily_return.is_nan());
    }

    #[test]
    fn constant_returns_have_no_sharpe() {
        assert!(sharpe_ratio(&[0.01; 10], 0.0).is_nan());
        assert!(sharpe_ratio(&[0.0; 10], 0.05).is_nan());
        assert!(sharpe_ratio(&[0.0123; 40], 0.03).is_nan());
    }

    #[test]
    fn flat_prices_have_zero_dispersion_and_no_sharpe() {
        let summary = performance_summary(&series_from_prices(&[100.0; 12]), 0.02).unwrap();
        assert_eq!(summary.std_daily_return, 0.0);
        assert!(summary.sharpe.is_nan());
    }

    #[test]
    fn sharpe_known_value() {
        let daily = [0.01, 0.02, -0.01, 0.03];
        let m = 0.0125;
        let sd = sample_std(&daily);
        let expected = m / sd * 252.0_f64.sqrt();
        assert!((sharpe_ratio(&daily, 0.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn risk_free_rate_lowers_sharpe() {
        let daily = [0.01, 0.02, -0.01, 0.03, 0.0];
        assert!(sharpe_ratio(&daily, 0.05) < sharpe_ratio(&daily, 0.0));
    }

    #[test]
    fn single_bar_summary() {
        let summary = performance_summary(&series_from_prices(&[50.0]), 0.0).unwrap();
        assert_eq!(summary.days, 0);
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.cagr, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert!(summary.sharpe.is_nan());
        assert!(summary.avg_daily_return.is_nan());
        assert!(summary.std_daily_return.is_nan());
    }

    #[test]
    fn one_year_cagr_equals_total_return() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bar = |date: NaiveDate, p: f64| PriceBar {
            date,
            open: p,
            high: p,
            low: p,
            close: p,
            adjusted_close: Some(p),
            volume: 0.0,
        };
        // 365.25 days cannot be hit exactly, so compare against the formula.
        let end = start + chrono::Duration::days(730);
        let series = PriceSeries::new(vec![bar(start, 100.0), bar(end, 121.0)]).unwrap();
        let summary = performance_summary(&series, 0.0).unwrap();
        let years = 730.0 / 365.25;
        assert!((summary.total_return - 0.21).abs() < 1e-12);
        assert!((summary.cagr - (1.21_f64.powf(1.0 / years) - 1.0)).abs() < 1e-12);
        assert_eq!(summary.days, 730);
    }

    #[test]
    fn rising_one_percent_a_day_for_thirty_days() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let summary = performance_summary(&series_from_prices(&prices), 0.0).unwrap();

        assert_eq!(summary.days, 29);
        assert!((summary.total_return - (1.01_f64.powi(29) - 1.0)).abs() < 1e-9);
        assert_eq!(summary.max_drawdown, 0.0);
        assert!((summary.avg_daily_return - 0.01).abs() < 1e-9);
        // Daily returns only differ by rounding noise, so the Sharpe ratio is
        // either NaN or very large; its magnitude is not meaningful.
        assert!(summary.sharpe.is_nan() || summary.sharpe > 1_000.0);
    }

    #[test]
    fn drawdown_and_dates_reported() {
        let summary =
            performance_summary(&series_from_prices(&[100.0, 120.0, 90.0, 130.0]), 0.0).unwrap();
        assert_eq!(summary.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(summary.end, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert!((summary.max_drawdown + 0.25).abs() < 1e-12);
    }

    #[test]
    fn summary_json_field_names() {
        let summary = performance_summary(&series_from_prices(&[100.0, 110.0]), 0.0).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        for key in [
            "start",
            "end",
            "days",
            "cagr",
            "totalReturn",
            "sharpe",
            "maxDrawdown",
            "avgDailyReturn",
            "stdDailyReturn",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["start"], "2024-01-01");
        assert!(json["sharpe"].is_null());
        assert!(json["stdDailyReturn"].is_null());
    }
}
