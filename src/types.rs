// =============================================================================
// Price data types shared by the indicator engine and the summarizer
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// One trading day of OHLCV data.
///
/// `adjusted_close` is the canonical price for every derived calculation. It
/// is optional because some sources only deliver raw closes; the analytics
/// refuse such a series instead of silently substituting `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub adjusted_close: Option<f64>,
    #[serde(default)]
    pub volume: f64,
}

/// An ascending, duplicate-free sequence of daily bars for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, rejecting dates that are not strictly increasing.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            let reason = if w[1].date == w[0].date {
                "duplicate"
            } else {
                "out-of-order"
            };
            return Err(AnalyticsError::InvalidInput(format!(
                "{reason} date {} after {}",
                w[1].date, w[0].date
            )));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Look up the bar for `date`.
    pub fn get(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by(|bar| bar.date.cmp(&date))
            .ok()
            .map(|idx| &self.bars[idx])
    }

    /// The adjusted-close column, in date order.
    ///
    /// Fails with `InvalidInput` naming the first bar that has no adjusted
    /// close.
    pub fn adjusted_closes(&self) -> Result<Vec<f64>> {
        self.bars
            .iter()
            .map(|bar| {
                bar.adjusted_close.ok_or_else(|| {
                    AnalyticsError::InvalidInput(format!(
                        "adjusted close missing for {}",
                        bar.date
                    ))
                })
            })
            .collect()
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = AnalyticsError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Self::new(bars)
    }
}
