//! Immutable, year-keyed table of crisis records.

use crate::{resolver, validate_record, HistoricalRecord, ValidationError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Dataset compiled into the binary.
pub const BUILTIN_DATASET: &str = include_str!("data/crises.json");

/// Errors from loading or querying the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record for the requested year and no nearest-year fallback.
    #[error("no record for year {0}")]
    NotFound(i32),
    #[error("dataset parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Read-only collection of records, iterated in ascending year order.
#[derive(Clone, Debug)]
pub struct Store {
    records: BTreeMap<i32, HistoricalRecord>,
}

impl Store {
    /// Build a store, validating every record up front.
    pub fn from_records(records: Vec<HistoricalRecord>) -> Result<Self, ValidationError> {
        if records.is_empty() {
            return Err(ValidationError::EmptyDataset);
        }
        let mut map = BTreeMap::new();
        for record in records {
            validate_record(&record)?;
            let year = record.year;
            if map.insert(year, record).is_some() {
                return Err(ValidationError::DuplicateYear(year));
            }
        }
        debug!(records = map.len(), "historical store loaded");
        Ok(Self { records: map })
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let records: Vec<HistoricalRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records)?)
    }

    /// The compiled-in dataset. A broken dataset is a build defect, so this
    /// panics rather than returning an error.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_DATASET).expect("builtin crisis dataset should be valid")
    }

    pub fn get(&self, year: i32) -> Result<&HistoricalRecord, StoreError> {
        self.records.get(&year).ok_or(StoreError::NotFound(year))
    }

    pub fn contains(&self, year: i32) -> bool {
        self.records.contains_key(&year)
    }

    /// Years in ascending order.
    pub fn available_years(&self) -> Vec<i32> {
        self.records.keys().copied().collect()
    }

    /// Year actually shown for a request: exact or nearest.
    pub fn resolve_year(&self, requested: i32) -> Result<i32, StoreError> {
        resolver::resolve(requested, &self.available_years()).ok_or(StoreError::NotFound(requested))
    }

    /// Record for the exact or nearest year.
    pub fn resolve(&self, requested: i32) -> Result<&HistoricalRecord, StoreError> {
        let year = self.resolve_year(requested)?;
        self.get(year)
    }

    /// Records for the given years in request order; unknown years are dropped.
    pub fn comparison(&self, years: &[i32]) -> Vec<&HistoricalRecord> {
        years.iter().filter_map(|y| self.records.get(y)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoricalRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
