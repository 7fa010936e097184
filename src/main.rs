// =============================================================================
// price-insight: batch runner
// =============================================================================
//
// Loads each configured price CSV, computes indicators and the performance
// summary, and writes per-ticker artifacts plus an aggregate
// `performance.json`. Instruments are independent, so each one runs on the
// blocking pool without any shared state.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use price_insight::market_data::load_price_csv;
use price_insight::report::{self, TickerPerformance, PERFORMANCE_TABLE};
use price_insight::{compute_indicators, performance_summary, IndicatorParams, RuntimeConfig};

const DEFAULT_CONFIG_PATH: &str = "price_insight.json";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("PRICE_INSIGHT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides()?;
    config.indicators.validate()?;

    if config.inputs.is_empty() {
        bail!("no input files configured (set PRICE_INSIGHT_INPUTS or `inputs` in {config_path})");
    }

    info!(
        inputs = config.inputs.len(),
        out = %config.output_dir.display(),
        rf = config.risk_free_rate_annual,
        "Starting analysis"
    );

    // ── 2. One blocking task per instrument ──────────────────────────────
    let mut tasks = JoinSet::new();
    for input in config.inputs.clone() {
        let out_dir = config.output_dir.clone();
        let params = config.indicators.clone();
        let rf = config.risk_free_rate_annual;
        let close_as_adjusted = config.close_as_adjusted;
        tasks.spawn_blocking(move || {
            analyse_instrument(&input, &out_dir, &params, rf, close_as_adjusted)
        });
    }

    // ── 3. Collect results ───────────────────────────────────────────────
    let total = config.inputs.len();
    let mut rows: Vec<TickerPerformance> = Vec::with_capacity(total);
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(row)) => rows.push(row),
            Ok(Err(e)) => {
                failures += 1;
                error!(error = %format!("{e:#}"), "Instrument analysis failed");
            }
            Err(e) => {
                failures += 1;
                error!(error = %e, "Analysis task aborted");
            }
        }
    }
    rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("failed to create output dir {}", config.output_dir.display())
    })?;
    let table_path = config.output_dir.join(PERFORMANCE_TABLE);
    report::write_json(&table_path, &rows)?;

    info!(
        succeeded = rows.len(),
        failed = failures,
        table = %table_path.display(),
        "Analysis complete"
    );

    if failures > 0 {
        bail!("{failures} of {total} instruments failed");
    }
    Ok(())
}

/// Full pipeline for one CSV file: load, analyse, write artifacts.
fn analyse_instrument(
    input: &Path,
    out_dir: &Path,
    params: &IndicatorParams,
    risk_free_rate_annual: f64,
    close_as_adjusted: bool,
) -> Result<TickerPerformance> {
    let ticker = ticker_from_path(input);
    let series = load_price_csv(input, close_as_adjusted)?;

    let indicators = compute_indicators(&series, params)
        .with_context(|| format!("indicator computation failed for {ticker}"))?;
    let summary = performance_summary(&series, risk_free_rate_annual)
        .with_context(|| format!("performance summary failed for {ticker}"))?;

    let label = format!("{ticker}_{}_to_{}", summary.start, summary.end);
    let report_path =
        report::write_report(out_dir.join(&ticker), &label, &series, &indicators, &summary)?;

    info!(
        ticker = %ticker,
        total_return = summary.total_return,
        sharpe = summary.sharpe,
        max_drawdown = summary.max_drawdown,
        report = %report_path.display(),
        "Instrument analysed"
    );

    Ok(TickerPerformance { ticker, summary })
}

/// Upper-cased file stem, e.g. `data/aapl.csv` -> `AAPL`.
fn ticker_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_upper_cased_stem() {
        assert_eq!(ticker_from_path(Path::new("data/aapl.csv")), "AAPL");
        assert_eq!(ticker_from_path(Path::new("/")), "UNKNOWN");
    }

    #[test]
    fn analyse_instrument_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("spy.csv");
        let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
        for day in 1..=28 {
            let p = 100.0 + day as f64;
            csv.push_str(&format!("2024-02-{day:02},{p},{p},{p},{p},1000\n"));
        }
        std::fs::write(&input, csv).unwrap();

        let out = dir.path().join("out");
        let row = analyse_instrument(&input, &out, &IndicatorParams::default(), 0.0, true).unwrap();
        assert_eq!(row.ticker, "SPY");
        assert_eq!(row.summary.days, 27);
        assert_eq!(row.summary.max_drawdown, 0.0);
        for file in [report::REPORT_MD, report::RAW_PRICES_CSV, report::SUMMARY_CSV] {
            assert!(out.join("SPY").join(file).exists(), "missing {file}");
        }
    }

    #[test]
    fn analyse_instrument_rejects_missing_adjusted_close() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        std::fs::write(&input, "Date,Open,High,Low,Close\n2024-01-02,1,1,1,1\n").unwrap();

        let err = analyse_instrument(&input, dir.path(), &IndicatorParams::default(), 0.0, false)
            .unwrap_err();
        assert!(format!("{err:#}").contains("adjusted close missing"));
    }
}
