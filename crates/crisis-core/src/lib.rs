#![deny(warnings)]

//! Core domain models and invariants for the crisis dashboard.
//!
//! This crate defines the serializable historical records shown by the
//! dashboard, validation helpers that guarantee their invariants, the
//! compiled-in [`store::Store`] and nearest-year resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod resolver;
pub mod store;

pub use resolver::resolve;
pub use store::{Store, StoreError};

/// One of the three tracked price series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Residential property prices.
    Housing,
    /// Equity market index.
    Stock,
    /// Gold price.
    Gold,
}

impl AssetClass {
    /// All asset classes in display order.
    pub const ALL: [AssetClass; 3] = [AssetClass::Housing, AssetClass::Stock, AssetClass::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Housing => "housing",
            AssetClass::Stock => "stock",
            AssetClass::Gold => "gold",
        }
    }

    /// Human-readable legend label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Housing => "Housing",
            AssetClass::Stock => "Stocks",
            AssetClass::Gold => "Gold",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetClass::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownName::new("asset class", s))
    }
}

/// A cause category in the four-way factor breakdown of a crisis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Economic,
    Political,
    Disaster,
    Gdp,
}

impl Factor {
    /// Declaration order of the weight mapping.
    pub const ALL: [Factor; 4] = [
        Factor::Economic,
        Factor::Political,
        Factor::Disaster,
        Factor::Gdp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Economic => "economic",
            Factor::Political => "political",
            Factor::Disaster => "disaster",
            Factor::Gdp => "gdp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Economic => "Economic",
            Factor::Political => "Political",
            Factor::Disaster => "Disaster",
            Factor::Gdp => "GDP",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Factor {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Factor::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownName::new("factor", s))
    }
}

/// Error for names that do not match any known variant.
#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind}: {name:?}")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

impl UnknownName {
    pub fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

/// Percentage attributed to each cause category. Sums to 100 at rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub economic: Decimal,
    pub political: Decimal,
    pub disaster: Decimal,
    pub gdp: Decimal,
}

impl FactorWeights {
    pub fn new(economic: Decimal, political: Decimal, disaster: Decimal, gdp: Decimal) -> Self {
        Self {
            economic,
            political,
            disaster,
            gdp,
        }
    }

    pub fn get(&self, factor: Factor) -> Decimal {
        match factor {
            Factor::Economic => self.economic,
            Factor::Political => self.political,
            Factor::Disaster => self.disaster,
            Factor::Gdp => self.gdp,
        }
    }

    pub fn set(&mut self, factor: Factor, value: Decimal) {
        match factor {
            Factor::Economic => self.economic = value,
            Factor::Political => self.political = value,
            Factor::Disaster => self.disaster = value,
            Factor::Gdp => self.gdp = value,
        }
    }

    pub fn total(&self) -> Decimal {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, Decimal)> + '_ {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

/// Kind of a historical event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Economic,
    Political,
    Disaster,
    Technology,
}

impl EventCategory {
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Economic => "Economic",
            EventCategory::Political => "Political",
            EventCategory::Disaster => "Disaster",
            EventCategory::Technology => "Technology",
        }
    }
}

/// Impact level of a historical event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A dated event within a crisis. Records keep these in chronological order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// Free-form date text, e.g. "October 1347".
    pub date: String,
    pub name: String,
    pub category: EventCategory,
    pub severity: Severity,
    pub description: String,
}

/// Labeled facts summarizing a crisis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub duration: String,
    pub scope: String,
    /// Headline economic impact.
    pub economic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unemployment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold_influx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<String>,
}

/// Price movement of one asset class across a crisis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Change relative to the pre-crisis level, in percent. For `stock`, 0
    /// means no market existed.
    pub percent_change: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trough_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<f64>,
    pub reason: String,
    #[serde(default)]
    pub note: String,
}

/// Asset movements keyed by class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    pub housing: AssetRecord,
    pub stock: AssetRecord,
    pub gold: AssetRecord,
}

impl Assets {
    pub fn get(&self, asset: AssetClass) -> &AssetRecord {
        match asset {
            AssetClass::Housing => &self.housing,
            AssetClass::Stock => &self.stock,
            AssetClass::Gold => &self.gold,
        }
    }
}

/// A display-formatted metric, e.g. `unemployment_rate = "25%"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub key: String,
    pub value: String,
}

/// Sampled price indices (pre-crisis level = 100) around a crisis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Period labels, one per sample.
    pub labels: Vec<String>,
    pub housing: Vec<f64>,
    /// All zeros when no stock market existed.
    pub stock: Vec<f64>,
    pub gold: Vec<f64>,
}

impl PriceHistory {
    pub fn values(&self, asset: AssetClass) -> &[f64] {
        match asset {
            AssetClass::Housing => &self.housing,
            AssetClass::Stock => &self.stock,
            AssetClass::Gold => &self.gold,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// One crisis year with everything the dashboard shows about it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Unique key.
    pub year: i32,
    pub name: String,
    pub period: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub basic_info: BasicInfo,
    pub events: Vec<HistoricalEvent>,
    pub factor_weights: FactorWeights,
    pub assets: Assets,
    pub key_metrics: Vec<KeyMetric>,
    pub long_term_impacts: Vec<String>,
    pub price_history: PriceHistory,
}

/// Validation errors for dataset invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The dataset has no records at all.
    #[error("dataset contains no records")]
    EmptyDataset,
    /// Two records share a year.
    #[error("duplicate record for year {0}")]
    DuplicateYear(i32),
    /// Name must not be blank.
    #[error("record {0} has an empty name")]
    EmptyName(i32),
    /// Factor weights must sum to exactly 100.
    #[error("factor weights of {year} sum to {total}, expected 100")]
    WeightsDoNotSum { year: i32, total: Decimal },
    /// Factor weights must be non-negative.
    #[error("factor {factor} of {year} is negative")]
    NegativeWeight { year: i32, factor: Factor },
    /// Every record needs at least one event.
    #[error("record {0} has no events")]
    NoEvents(i32),
    /// Price history needs at least one sample.
    #[error("record {0} has an empty price history")]
    EmptyPriceHistory(i32),
    /// All price series must match the label count.
    #[error("{asset} series of {year} has {found} samples, expected {expected}")]
    SeriesLengthMismatch {
        year: i32,
        asset: AssetClass,
        expected: usize,
        found: usize,
    },
    /// Numeric field must be finite.
    #[error("non-finite numeric value in record {0}")]
    NonFinite(i32),
}

/// Validate that weights are non-negative and sum to exactly 100.
pub fn validate_factor_weights(year: i32, w: &FactorWeights) -> Result<(), ValidationError> {
    for (factor, value) in w.iter() {
        if value < Decimal::ZERO {
            return Err(ValidationError::NegativeWeight { year, factor });
        }
    }
    let total = w.total();
    if total != Decimal::ONE_HUNDRED {
        return Err(ValidationError::WeightsDoNotSum { year, total });
    }
    Ok(())
}

/// Validate that every series has one finite sample per label.
pub fn validate_price_history(year: i32, h: &PriceHistory) -> Result<(), ValidationError> {
    if h.is_empty() {
        return Err(ValidationError::EmptyPriceHistory(year));
    }
    for asset in AssetClass::ALL {
        let values = h.values(asset);
        if values.len() != h.len() {
            return Err(ValidationError::SeriesLengthMismatch {
                year,
                asset,
                expected: h.len(),
                found: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite(year));
        }
    }
    Ok(())
}

/// Validate asset movements.
pub fn validate_assets(year: i32, a: &Assets) -> Result<(), ValidationError> {
    for asset in AssetClass::ALL {
        let r = a.get(asset);
        let finite = r.percent_change.is_finite()
            && [r.peak_value, r.trough_value, r.start_value]
                .iter()
                .flatten()
                .all(|v| v.is_finite());
        if !finite {
            return Err(ValidationError::NonFinite(year));
        }
    }
    Ok(())
}

/// Validate a single record.
pub fn validate_record(r: &HistoricalRecord) -> Result<(), ValidationError> {
    if r.name.trim().is_empty() {
        return Err(ValidationError::EmptyName(r.year));
    }
    if r.events.is_empty() {
        return Err(ValidationError::NoEvents(r.year));
    }
    validate_factor_weights(r.year, &r.factor_weights)?;
    validate_assets(r.year, &r.assets)?;
    validate_price_history(r.year, &r.price_history)?;
    Ok(())
}
