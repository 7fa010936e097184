// =============================================================================
// Indicator Engine - PriceSeries -> IndicatorSeries
// =============================================================================
//
// Runs every indicator over the adjusted-close column and zips the results
// back onto the bars. The input series is only read; the output has exactly
// one row per input bar, with NaN wherever a window lacks history.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::indicators::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    cumulative_returns, daily_returns, drawdown_curve, rolling_volatility,
};
use crate::runtime_config::IndicatorParams;
use crate::types::{PriceBar, PriceSeries};

/// Column names of the indicator fields, in export order.
pub const INDICATOR_COLUMNS: [&str; 15] = [
    "SMA20",
    "SMA50",
    "EMA12",
    "EMA26",
    "RSI14",
    "MACD",
    "MACD_SIGNAL",
    "MACD_HIST",
    "BB_MID",
    "BB_UPPER",
    "BB_LOWER",
    "RET_DAILY",
    "RET_CUM",
    "VOL21",
    "DRAWDOWN",
];

/// One bar together with every indicator value for its date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: PriceBar,
    #[serde(rename = "SMA20")]
    pub sma_short: f64,
    #[serde(rename = "SMA50")]
    pub sma_long: f64,
    #[serde(rename = "EMA12")]
    pub ema_fast: f64,
    #[serde(rename = "EMA26")]
    pub ema_slow: f64,
    #[serde(rename = "RSI14")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "MACD_SIGNAL")]
    pub macd_signal: f64,
    #[serde(rename = "MACD_HIST")]
    pub macd_hist: f64,
    #[serde(rename = "BB_MID")]
    pub bb_mid: f64,
    #[serde(rename = "BB_UPPER")]
    pub bb_upper: f64,
    #[serde(rename = "BB_LOWER")]
    pub bb_lower: f64,
    #[serde(rename = "RET_DAILY")]
    pub ret_daily: f64,
    #[serde(rename = "RET_CUM")]
    pub ret_cum: f64,
    #[serde(rename = "VOL21")]
    pub vol: f64,
    #[serde(rename = "DRAWDOWN")]
    pub drawdown: f64,
}

impl IndicatorRow {
    /// Indicator values in the order of [`INDICATOR_COLUMNS`].
    pub fn values(&self) -> [f64; 15] {
        [
            self.sma_short,
            self.sma_long,
            self.ema_fast,
            self.ema_slow,
            self.rsi,
            self.macd,
            self.macd_signal,
            self.macd_hist,
            self.bb_mid,
            self.bb_upper,
            self.bb_lower,
            self.ret_daily,
            self.ret_cum,
            self.vol,
            self.drawdown,
        ]
    }
}

/// The price series enlarged with indicator columns, aligned by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSeries {
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the row for `date`.
    pub fn get(&self, date: NaiveDate) -> Option<&IndicatorRow> {
        self.rows
            .binary_search_by(|row| row.bar.date.cmp(&date))
            .ok()
            .map(|idx| &self.rows[idx])
    }
}

/// Compute every indicator for `series`.
///
/// Fails with `InvalidParameter` for unusable `params` and with
/// `InvalidInput` when any bar lacks an adjusted close. An empty series
/// yields an empty result.
pub fn compute_indicators(series: &PriceSeries, params: &IndicatorParams) -> Result<IndicatorSeries> {
    params.validate()?;
    let prices = series.adjusted_closes()?;

    let sma_short = calculate_sma(&prices, params.sma_short);
    let sma_long = calculate_sma(&prices, params.sma_long);
    let ema_fast = calculate_ema(&prices, params.ema_fast);
    let ema_slow = calculate_ema(&prices, params.ema_slow);
    let rsi = calculate_rsi(&prices, params.rsi_period);
    let macd = calculate_macd(&prices, params.macd_fast, params.macd_slow, params.macd_signal);
    let bands = calculate_bollinger(&prices, params.bollinger_window, params.bollinger_k);
    let ret_daily = daily_returns(&prices);
    let ret_cum = cumulative_returns(&ret_daily);
    let vol = rolling_volatility(&ret_daily, params.volatility_window);
    let drawdown = drawdown_curve(&prices);

    let rows: Vec<IndicatorRow> = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            bar: bar.clone(),
            sma_short: sma_short[i],
            sma_long: sma_long[i],
            ema_fast: ema_fast[i],
            ema_slow: ema_slow[i],
            rsi: rsi[i],
            macd: macd.macd[i],
            macd_signal: macd.signal[i],
            macd_hist: macd.histogram[i],
            bb_mid: bands.mid[i],
            bb_upper: bands.upper[i],
            bb_lower: bands.lower[i],
            ret_daily: ret_daily[i],
            ret_cum: ret_cum[i],
            vol: vol[i],
            drawdown: drawdown[i],
        })
        .collect();

    debug!(rows = rows.len(), "indicators computed");
    Ok(IndicatorSeries { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::types::test_support::series_from_prices;

    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.3).sin() + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn row_count_matches_input() {
        let series = series_from_prices(&wavy(80));
        let out = compute_indicators(&series, &IndicatorParams::default()).unwrap();
        assert_eq!(out.len(), 80);
        for (row, bar) in out.rows().iter().zip(series.bars()) {
            assert_eq!(row.bar.date, bar.date);
        }
    }

    #[test]
    fn warm_up_gaps_follow_windows() {
        let series = series_from_prices(&wavy(80));
        let out = compute_indicators(&series, &IndicatorParams::default()).unwrap();
        let rows = out.rows();

        assert!(rows[18].sma_short.is_nan());
        assert!(!rows[19].sma_short.is_nan());
        assert!(rows[48].sma_long.is_nan());
        assert!(!rows[49].sma_long.is_nan());
        assert!(rows[18].bb_upper.is_nan() && rows[18].bb_lower.is_nan());
        assert!(!rows[19].bb_upper.is_nan());
        assert!(rows[20].vol.is_nan());
        assert!(!rows[21].vol.is_nan());
        assert!(rows[0].ret_daily.is_nan() && rows[0].ret_cum.is_nan());
        assert!(rows[0].rsi.is_nan());
    }

    #[test]
    fn always_defined_columns_start_at_first_row() {
        let series = series_from_prices(&[100.0, 101.0, 99.0]);
        let out = compute_indicators(&series, &IndicatorParams::default()).unwrap();
        let first = &out.rows()[0];
        assert_eq!(first.ema_fast, 100.0);
        assert_eq!(first.ema_slow, 100.0);
        assert_eq!(first.macd, 0.0);
        assert_eq!(first.drawdown, 0.0);
    }

    #[test]
    fn custom_params_are_honoured() {
        let series = series_from_prices(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let params = IndicatorParams {
            sma_short: 3,
            ..IndicatorParams::default()
        };
        let out = compute_indicators(&series, &params).unwrap();
        let sma: Vec<f64> = out.rows().iter().map(|r| r.sma_short).collect();
        assert!(sma[0].is_nan() && sma[1].is_nan());
        assert_eq!(&sma[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn lookup_by_date() {
        let series = series_from_prices(&[10.0, 11.0]);
        let out = compute_indicators(&series, &IndicatorParams::default()).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!((out.get(day).unwrap().ret_daily - 0.1).abs() < 1e-12);
    }

    #[test]
    fn missing_adjusted_close_aborts() {
        let mut bars = series_from_prices(&[10.0, 11.0]).bars().to_vec();
        bars[1].adjusted_close = None;
        let series = PriceSeries::new(bars).unwrap();
        let err = compute_indicators(&series, &IndicatorParams::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn invalid_params_abort() {
        let series = series_from_prices(&[10.0, 11.0]);
        let params = IndicatorParams {
            sma_long: 0,
            ..IndicatorParams::default()
        };
        assert!(matches!(
            compute_indicators(&series, &params),
            Err(AnalyticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn empty_series_yields_empty_result() {
        let out = compute_indicators(&PriceSeries::default(), &IndicatorParams::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn json_uses_column_names_and_null_for_nan() {
        let series = series_from_prices(&[10.0, 11.0]);
        let out = compute_indicators(&series, &IndicatorParams::default()).unwrap();
        let json = serde_json::to_value(&out.rows()[0]).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["adjustedClose"], 10.0);
        assert!(json["SMA20"].is_null());
        assert_eq!(json["DRAWDOWN"], 0.0);
        for column in INDICATOR_COLUMNS {
            assert!(json.get(column).is_some(), "missing {column}");
        }
    }
}
