// ---------------------------------------------------------------------------
// Daily OHLCV CSV source
// ---------------------------------------------------------------------------
//
// Reads files shaped like a provider download:
//
//   Date,Open,High,Low,Close,Adj Close,Volume
//   2024-01-02,187.15,188.44,183.89,185.64,184.94,82488700
//
// Header names are matched case-insensitively; column order is free. Empty or
// non-numeric cells are forward-filled from the previous row. Only cells with
// nothing before them (first row) stay NaN.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::types::{PriceBar, PriceSeries};

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adjusted_close: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        Ok(Self {
            date: required_column(headers, &["date", "time", "datetime"])?,
            open: required_column(headers, &["open"])?,
            high: required_column(headers, &["high"])?,
            low: required_column(headers, &["low"])?,
            close: required_column(headers, &["close"])?,
            adjusted_close: find_column(
                headers,
                &["adj close", "adj_close", "adjclose", "adjusted_close"],
            ),
            volume: find_column(headers, &["volume"]),
        })
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_ascii_lowercase();
        names.iter().any(|n| *n == h)
    })
}

fn required_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    find_column(headers, names)
        .with_context(|| format!("missing required column {:?}", names[0]))
}

/// Load a price series from the CSV file at `path`.
///
/// When the file has no adjusted-close column and `close_as_adjusted` is set,
/// `Close` is mirrored into the adjusted close; otherwise the bars carry none
/// and the analytics will reject the series.
pub fn load_price_csv(path: impl AsRef<Path>, close_as_adjusted: bool) -> Result<PriceSeries> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open price file {}", path.display()))?;
    let series = read_price_csv(file, close_as_adjusted)
        .with_context(|| format!("failed to load prices from {}", path.display()))?;

    info!(path = %path.display(), bars = series.len(), "price series loaded");
    Ok(series)
}

/// Parse a price series from any CSV reader.
pub fn read_price_csv<R: Read>(reader: R, close_as_adjusted: bool) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let columns = Columns::resolve(rdr.headers().context("failed to read CSV header")?)?;

    if columns.adjusted_close.is_none() {
        if close_as_adjusted {
            debug!("no adjusted close column, mirroring close");
        } else {
            warn!("no adjusted close column; series cannot be analysed");
        }
    }

    let mut bars: Vec<PriceBar> = Vec::new();
    let mut filled = 0usize;
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record {}", line + 1))?;
        let mut bar = parse_bar(&record, &columns, close_as_adjusted)?;
        if let Some(prev) = bars.last() {
            filled += forward_fill(&mut bar, prev);
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        bail!("price file contains no rows");
    }
    if filled > 0 {
        debug!(cells = filled, "forward-filled missing price cells");
    }

    Ok(PriceSeries::new(bars)?)
}

fn parse_bar(record: &csv::StringRecord, columns: &Columns, close_as_adjusted: bool) -> Result<PriceBar> {
    let raw_date = record.get(columns.date).unwrap_or("");
    let date = parse_date(raw_date)?;

    let close = cell_f64(record, columns.close);
    let adjusted_close = match columns.adjusted_close {
        Some(idx) => Some(cell_f64(record, idx)),
        None if close_as_adjusted => Some(close),
        None => None,
    };

    Ok(PriceBar {
        date,
        open: cell_f64(record, columns.open),
        high: cell_f64(record, columns.high),
        low: cell_f64(record, columns.low),
        close,
        adjusted_close,
        volume: columns.volume.map_or(f64::NAN, |idx| cell_f64(record, idx)),
    })
}

/// Copy the previous bar's value into every missing numeric cell of `bar`.
/// Returns the number of cells filled.
fn forward_fill(bar: &mut PriceBar, prev: &PriceBar) -> usize {
    let mut filled = 0;
    for (cell, prev_cell) in [
        (&mut bar.open, prev.open),
        (&mut bar.high, prev.high),
        (&mut bar.low, prev.low),
        (&mut bar.close, prev.close),
        (&mut bar.volume, prev.volume),
    ] {
        if cell.is_nan() && !prev_cell.is_nan() {
            *cell = prev_cell;
            filled += 1;
        }
    }
    if let (Some(adj), Some(prev_adj)) = (bar.adjusted_close.as_mut(), prev.adjusted_close) {
        if adj.is_nan() && !prev_adj.is_nan() {
            *adj = prev_adj;
            filled += 1;
        }
    }
    filled
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").with_context(|| format!("invalid date {raw:?}"))
}

fn cell_f64(record: &csv::StringRecord, idx: usize) -> f64 {
    record
        .get(idx)
        .and_then(|cell| cell.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
