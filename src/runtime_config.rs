// =============================================================================
// Runtime Configuration - analysis parameters and batch settings
// =============================================================================
//
// Every tunable window, span and multiplier of the indicator engine lives in
// `IndicatorParams` and is passed explicitly into each computation. The batch
// runner settings (inputs, output directory, risk-free rate) sit next to it in
// `RuntimeConfig`, loaded from JSON.
//
// All fields carry `#[serde(default)]` so that a partial config file only
// overrides what it names.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AnalyticsError;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma_short() -> usize {
    20
}

fn default_sma_long() -> usize {
    50
}

fn default_ema_fast() -> usize {
    12
}

fn default_ema_slow() -> usize {
    26
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_k() -> f64 {
    2.0
}

fn default_volatility_window() -> usize {
    21
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Windows, spans and band width used by the indicator engine.
///
/// The exported column names (`SMA20`, `EMA12`, ...) stay fixed whatever these
/// are set to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Window of the short simple moving average (`SMA20`).
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,

    /// Window of the long simple moving average (`SMA50`).
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,

    /// Span of the fast exponential moving average (`EMA12`).
    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,

    /// Span of the slow exponential moving average (`EMA26`).
    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,

    /// RSI look-back (`RSI14`).
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Number of sample standard deviations between the mid and outer bands.
    #[serde(default = "default_bollinger_k")]
    pub bollinger_k: f64,

    /// Window of the rolling daily-return volatility (`VOL21`).
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_window: default_bollinger_window(),
            bollinger_k: default_bollinger_k(),
            volatility_window: default_volatility_window(),
        }
    }
}

impl IndicatorParams {
    /// Reject zero windows/spans and a non-finite band multiplier.
    pub fn validate(&self) -> std::result::Result<(), AnalyticsError> {
        let windows = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_window", self.bollinger_window),
            ("volatility_window", self.volatility_window),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(AnalyticsError::parameter(name, "must be at least 1"));
        }
        if !self.bollinger_k.is_finite() {
            return Err(AnalyticsError::parameter("bollinger_k", "must be finite"));
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Daily OHLCV CSV files, one instrument each. The file stem is used as
    /// the ticker.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving per-ticker artifacts and `performance.json`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Annual risk-free rate as a decimal (0.04 = 4 %).
    #[serde(default)]
    pub risk_free_rate_annual: f64,

    /// Mirror `Close` into the adjusted close when a file has no `Adj Close`
    /// column (auto-adjusted downloads).
    #[serde(default = "default_true")]
    pub close_as_adjusted: bool,

    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: default_output_dir(),
            risk_free_rate_annual: 0.0,
            close_as_adjusted: true,
            indicators: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            inputs = config.inputs.len(),
            rf = config.risk_free_rate_annual,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `PRICE_INSIGHT_INPUTS`, `PRICE_INSIGHT_OUT` and
    /// `PRICE_INSIGHT_RF` on top of the loaded values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(inputs) = std::env::var("PRICE_INSIGHT_INPUTS") {
            self.inputs = parse_input_list(&inputs);
        }
        if let Ok(out) = std::env::var("PRICE_INSIGHT_OUT") {
            self.output_dir = PathBuf::from(out);
        }
        if let Ok(rf) = std::env::var("PRICE_INSIGHT_RF") {
            self.risk_free_rate_annual = rf
                .trim()
                .parse()
                .with_context(|| format!("PRICE_INSIGHT_RF is not a number: {rf:?}"))?;
        }
        Ok(())
    }
}

fn parse_input_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
