// =============================================================================
// Report writer - per-instrument artifacts and the batch performance table
// =============================================================================
//
// Layout for one instrument:
//   <dir>/raw_prices.csv                   the input bars
//   <dir>/timeseries_with_indicators.csv   bars + every indicator column
//   <dir>/performance_summary.csv          one-row PerformanceSummary
//   <dir>/performance_summary.json         the same summary as JSON
//   <dir>/report.md                        human-readable summary
//
// NaN is written as an empty CSV cell and as JSON `null`.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::engine::{IndicatorSeries, INDICATOR_COLUMNS};
use crate::performance::PerformanceSummary;
use crate::types::{PriceBar, PriceSeries};

pub const RAW_PRICES_CSV: &str = "raw_prices.csv";
pub const INDICATOR_CSV: &str = "timeseries_with_indicators.csv";
pub const SUMMARY_CSV: &str = "performance_summary.csv";
pub const SUMMARY_JSON: &str = "performance_summary.json";
pub const REPORT_MD: &str = "report.md";
pub const PERFORMANCE_TABLE: &str = "performance.json";

const BAR_COLUMNS: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

const SUMMARY_COLUMNS: [&str; 9] = [
    "start",
    "end",
    "days",
    "cagr",
    "totalReturn",
    "sharpe",
    "maxDrawdown",
    "avgDailyReturn",
    "stdDailyReturn",
];

/// One row of the batch `performance.json` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerPerformance {
    pub ticker: String,
    #[serde(flatten)]
    pub summary: PerformanceSummary,
}

/// Write all artifacts for one instrument into `dir`, returning the path of
/// the Markdown report.
pub fn write_report(
    dir: impl AsRef<Path>,
    dataset_name: &str,
    prices: &PriceSeries,
    indicators: &IndicatorSeries,
    summary: &PerformanceSummary,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    write_price_csv(dir.join(RAW_PRICES_CSV), prices)?;
    write_indicator_csv(dir.join(INDICATOR_CSV), indicators)?;
    write_summary_csv(dir.join(SUMMARY_CSV), summary)?;
    write_json(dir.join(SUMMARY_JSON), summary)?;

    let report_path = dir.join(REPORT_MD);
    std::fs::write(&report_path, render_markdown(dataset_name, summary))
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    info!(dir = %dir.display(), rows = indicators.len(), "report written");
    Ok(report_path)
}

/// Write the bars of `prices` as an OHLCV CSV.
pub fn write_price_csv(path: impl AsRef<Path>, prices: &PriceSeries) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    wtr.write_record(BAR_COLUMNS)
        .context("failed to write CSV header")?;
    for bar in prices.bars() {
        wtr.write_record(bar_record(bar))
            .with_context(|| format!("failed to write row for {}", bar.date))?;
    }

    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Write the indicator series as CSV.
pub fn write_indicator_csv(path: impl AsRef<Path>, indicators: &IndicatorSeries) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    wtr.write_record(BAR_COLUMNS.iter().chain(INDICATOR_COLUMNS.iter()))
        .context("failed to write CSV header")?;

    for row in indicators.rows() {
        let mut record = bar_record(&row.bar);
        record.extend(row.values().into_iter().map(format_cell));
        wtr.write_record(&record)
            .with_context(|| format!("failed to write row for {}", row.bar.date))?;
    }

    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Write `summary` as a header plus a single CSV row.
pub fn write_summary_csv(path: impl AsRef<Path>, summary: &PerformanceSummary) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    wtr.write_record(SUMMARY_COLUMNS)
        .context("failed to write CSV header")?;
    wtr.write_record([
        summary.start.to_string(),
        summary.end.to_string(),
        summary.days.to_string(),
        format_cell(summary.cagr),
        format_cell(summary.total_return),
        format_cell(summary.sharpe),
        format_cell(summary.max_drawdown),
        format_cell(summary.avg_daily_return),
        format_cell(summary.std_daily_return),
    ])
    .context("failed to write summary row")?;

    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Serialize `value` as pretty JSON at `path`.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(value).context("failed to serialise JSON")?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Markdown summary; ratio fields are rendered as percentages.
pub fn render_markdown(dataset_name: &str, summary: &PerformanceSummary) -> String {
    let lines = [
        format!("# Price Analysis: {dataset_name}\n"),
        "## Performance Summary".to_string(),
        format!("- **start**: {}", summary.start),
        format!("- **end**: {}", summary.end),
        format!("- **days**: {}", summary.days),
        format!("- **cagr**: {}", format_pct(summary.cagr)),
        format!("- **totalReturn**: {}", format_pct(summary.total_return)),
        format!("- **sharpe**: {}", format_plain(summary.sharpe)),
        format!("- **maxDrawdown**: {}", format_pct(summary.max_drawdown)),
        format!("- **avgDailyReturn**: {}", format_pct(summary.avg_daily_return)),
        format!("- **stdDailyReturn**: {}", format_pct(summary.std_daily_return)),
        "\n## Files".to_string(),
        format!("- `{RAW_PRICES_CSV}`: original OHLCV"),
        format!("- `{INDICATOR_CSV}`: prices + indicators"),
        format!("- `{SUMMARY_CSV}`: one-row metrics"),
        format!("- `{SUMMARY_JSON}`: the same metrics as JSON"),
    ];
    let mut md = lines.join("\n");
    md.push('\n');
    md
}

fn bar_record(bar: &PriceBar) -> Vec<String> {
    vec![
        bar.date.format("%Y-%m-%d").to_string(),
        format_cell(bar.open),
        format_cell(bar.high),
        format_cell(bar.low),
        format_cell(bar.close),
        bar.adjusted_close.map(format_cell).unwrap_or_default(),
        format_cell(bar.volume),
    ]
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn format_pct(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.4}%", value * 100.0)
    }
}

fn format_plain(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.4}")
    }
}
