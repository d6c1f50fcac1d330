#![deny(warnings)]

//! Render models for the crisis dashboard.
//!
//! This crate turns a [`HistoricalRecord`] into the numbers the chart
//! primitives draw:
//! - Line series filtered by asset class, with per-series scales
//! - Pie slice angles for the factor breakdown
//! - The user-editable factor mix that always sums to 100
//! - Display text for page content and year comparisons

use crisis_core::{AssetClass, HistoricalRecord, UnknownName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod comparison;
pub mod factors;
pub mod page;
pub mod pie;

pub use comparison::{ComparisonPreset, ComparisonRow, ComparisonSet};
pub use factors::FactorMix;
pub use page::{build_page, format_change, PageContent};
pub use pie::{build_pie_slices, PieSlice};

/// Errors produced while building render models or parsing user input.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("unknown chart filter: {0:?}")]
    UnknownFilter(String),
    #[error(transparent)]
    UnknownName(#[from] UnknownName),
    /// Factor settings look like `economic=85`.
    #[error("invalid factor setting: {0:?}")]
    InvalidFactorSetting(String),
    #[error("at most {0} years can be compared")]
    ComparisonFull(usize),
    #[error("no more years available to compare")]
    NoMoreYears,
    #[error("a comparison needs at least {0} years")]
    TooFewYears(usize),
    #[error("comparison slot {0} does not exist")]
    SlotOutOfRange(usize),
    #[error("unknown comparison preset: {0:?}")]
    UnknownPreset(String),
}

/// Which asset series the price chart shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineFilter {
    #[default]
    All,
    Housing,
    Stock,
    Gold,
}

impl LineFilter {
    /// Cycling order used by next/previous.
    pub const ORDER: [LineFilter; 4] = [
        LineFilter::All,
        LineFilter::Housing,
        LineFilter::Stock,
        LineFilter::Gold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineFilter::All => "all",
            LineFilter::Housing => "housing",
            LineFilter::Stock => "stock",
            LineFilter::Gold => "gold",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineFilter::All => "All data",
            LineFilter::Housing => "Housing data",
            LineFilter::Stock => "Stock data",
            LineFilter::Gold => "Gold data",
        }
    }

    pub fn includes(&self, asset: AssetClass) -> bool {
        match self {
            LineFilter::All => true,
            LineFilter::Housing => asset == AssetClass::Housing,
            LineFilter::Stock => asset == AssetClass::Stock,
            LineFilter::Gold => asset == AssetClass::Gold,
        }
    }

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> LineFilter {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> LineFilter {
        let n = Self::ORDER.len();
        Self::ORDER[(self.position() + n - 1) % n]
    }
}

impl fmt::Display for LineFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineFilter {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownFilter(s.to_string()))
    }
}

/// Period labels plus one value sequence per included asset class. All
/// sequences share the label count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: BTreeMap<AssetClass, Vec<f64>>,
}

impl ChartSeries {
    pub fn get(&self, asset: AssetClass) -> Option<&[f64]> {
        self.series.get(&asset).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Legend entries in chart order. Stocks are listed only when they have
    /// market data; housing and gold are always listed when present.
    pub fn legend(&self) -> Vec<AssetClass> {
        AssetClass::ALL
            .into_iter()
            .filter(|a| match self.get(*a) {
                Some(values) => *a != AssetClass::Stock || has_market_data(values),
                None => false,
            })
            .collect()
    }
}

/// Line series for `record`; asset classes excluded by `filter` are omitted.
pub fn build_line_series(record: &HistoricalRecord, filter: LineFilter) -> ChartSeries {
    let history = &record.price_history;
    let series = AssetClass::ALL
        .into_iter()
        .filter(|a| filter.includes(*a))
        .map(|a| (a, history.values(a).to_vec()))
        .collect();
    ChartSeries {
        labels: history.labels.clone(),
        series,
    }
}

/// True when the series has any positive sample. Pre-modern stock series
/// are all zeros.
pub fn has_market_data(values: &[f64]) -> bool {
    values.iter().any(|v| *v > 0.0)
}

/// Vertical value domain of one series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    /// Domain for the main price chart: the series' own range widened to
    /// include 0 and 100.
    pub fn for_line(values: &[f64]) -> Self {
        Self {
            min: values.iter().copied().fold(0.0, f64::min),
            max: values.iter().copied().fold(100.0, f64::max),
        }
    }

    /// Domain for a sparkline: the series' own min and max.
    pub fn for_sparkline(values: &[f64]) -> Self {
        let Some(first) = values.first().copied() else {
            return Self { min: 0.0, max: 0.0 };
        };
        Self {
            min: values.iter().copied().fold(first, f64::min),
            max: values.iter().copied().fold(first, f64::max),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Span used for projection; 1 when min equals max.
    pub fn range(&self) -> f64 {
        if self.is_degenerate() {
            1.0
        } else {
            self.max - self.min
        }
    }

    /// Distance from the top of a band of `height` at which `value` sits.
    pub fn project(&self, value: f64, height: f64) -> f64 {
        height - (value - self.min) / self.range() * height
    }
}

/// Horizontal position of sample `index` of `count` across `width`.
pub fn x_at(index: usize, count: usize, width: f64) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    index as f64 * width / (count - 1) as f64
}
