//! Side-by-side comparison of crisis years.

use crate::page::format_change;
use crate::ModelError;
use crisis_core::{AssetClass, HistoricalRecord, Store};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_COMPARISON: [i32; 2] = [1348, 2008];
pub const MAX_COMPARISONS: usize = 4;
pub const MIN_COMPARISONS: usize = 2;

/// Named year pairs offered as quick comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonPreset {
    DepressionVsFinancialCrisis,
    BlackDeathVsFinancialCrisis,
}

impl ComparisonPreset {
    pub const ALL: [ComparisonPreset; 2] = [
        ComparisonPreset::DepressionVsFinancialCrisis,
        ComparisonPreset::BlackDeathVsFinancialCrisis,
    ];

    pub fn years(&self) -> [i32; 2] {
        match self {
            ComparisonPreset::DepressionVsFinancialCrisis => [1929, 2008],
            ComparisonPreset::BlackDeathVsFinancialCrisis => [1348, 2008],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonPreset::DepressionVsFinancialCrisis => "1929-vs-2008",
            ComparisonPreset::BlackDeathVsFinancialCrisis => "1348-vs-2008",
        }
    }
}

impl fmt::Display for ComparisonPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonPreset {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownPreset(s.to_string()))
    }
}

/// Years selected for comparison, in slot order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonSet {
    years: Vec<i32>,
}

impl Default for ComparisonSet {
    fn default() -> Self {
        Self {
            years: DEFAULT_COMPARISON.to_vec(),
        }
    }
}

impl ComparisonSet {
    pub fn new(years: Vec<i32>) -> Result<Self, ModelError> {
        if years.len() < MIN_COMPARISONS {
            return Err(ModelError::TooFewYears(MIN_COMPARISONS));
        }
        if years.len() > MAX_COMPARISONS {
            return Err(ModelError::ComparisonFull(MAX_COMPARISONS));
        }
        Ok(Self { years })
    }

    /// Replace the selection with a preset pair.
    pub fn preset(preset: ComparisonPreset) -> Self {
        Self {
            years: preset.years().to_vec(),
        }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Append the first available year not already selected.
    pub fn add_next(&mut self, available: &[i32]) -> Result<i32, ModelError> {
        if self.years.len() >= MAX_COMPARISONS {
            return Err(ModelError::ComparisonFull(MAX_COMPARISONS));
        }
        let year = available
            .iter()
            .copied()
            .find(|y| !self.years.contains(y))
            .ok_or(ModelError::NoMoreYears)?;
        self.years.push(year);
        Ok(year)
    }

    /// Remove the year in `slot`; at least two years always remain.
    pub fn remove(&mut self, slot: usize) -> Result<i32, ModelError> {
        if slot >= self.years.len() {
            return Err(ModelError::SlotOutOfRange(slot));
        }
        if self.years.len() <= MIN_COMPARISONS {
            return Err(ModelError::TooFewYears(MIN_COMPARISONS));
        }
        Ok(self.years.remove(slot))
    }

    pub fn set(&mut self, slot: usize, year: i32) -> Result<(), ModelError> {
        let entry = self
            .years
            .get_mut(slot)
            .ok_or(ModelError::SlotOutOfRange(slot))?;
        *entry = year;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Heading naming the first two selected crises.
    pub fn title(&self, store: &Store) -> Option<String> {
        let records = store.comparison(&self.years);
        match records.as_slice() {
            [a, b, ..] => Some(format!("{} {} vs {} {}", a.year, a.name, b.year, b.name)),
            _ => None,
        }
    }

    /// One row per selected year that exists in `store`.
    pub fn rows(&self, store: &Store) -> Vec<ComparisonRow> {
        store
            .comparison(&self.years)
            .into_iter()
            .map(ComparisonRow::from_record)
            .collect()
    }
}

/// Comparison table row for one crisis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub year: i32,
    pub name: String,
    pub kind: String,
    pub duration: String,
    pub scope: String,
    /// Population or unemployment headline.
    pub impact: String,
    pub economic: String,
    pub housing: String,
    pub stock: String,
    pub gold: String,
}

impl ComparisonRow {
    pub fn from_record(r: &HistoricalRecord) -> Self {
        let info = &r.basic_info;
        let impact = info
            .population
            .as_ref()
            .or(info.unemployment.as_ref())
            .cloned()
            .unwrap_or_else(|| "Major impact".to_string());
        Self {
            year: r.year,
            name: r.name.clone(),
            kind: r.kind.clone(),
            duration: info.duration.clone(),
            scope: info.scope.clone(),
            impact,
            economic: info.economic.clone(),
            housing: format_change(AssetClass::Housing, r),
            stock: format_change(AssetClass::Stock, r),
            gold: format_change(AssetClass::Gold, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_compares_black_death_with_2008() {
        let store = Store::builtin();
        let set = ComparisonSet::default();
        assert_eq!(
            set.title(&store).unwrap(),
            "1348 The Black Death vs 2008 The Global Financial Crisis"
        );
        let rows = set.rows(&store);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stock, "N/A");
        assert_eq!(rows[0].impact, "European population fell 30-60%");
        assert_eq!(rows[1].stock, "-57%");
        assert_eq!(rows[1].impact, "US unemployment reached 10.1%");
    }

    #[test]
    fn add_until_full() {
        let store = Store::builtin();
        let years = store.available_years();
        let mut set = ComparisonSet::default();
        assert_eq!(set.add_next(&years), Ok(1492));
        assert_eq!(set.add_next(&years), Ok(1929));
        assert_eq!(set.add_next(&years), Err(ModelError::ComparisonFull(4)));
        assert_eq!(set.years(), &[1348, 2008, 1492, 1929]);
    }

    #[test]
    fn add_without_candidates() {
        let mut set = ComparisonSet::default();
        assert_eq!(set.add_next(&[1348, 2008]), Err(ModelError::NoMoreYears));
    }

    #[test]
    fn remove_keeps_minimum() {
        let mut set = ComparisonSet::new(vec![1348, 1492, 2008]).unwrap();
        assert_eq!(set.remove(1), Ok(1492));
        assert_eq!(set.remove(0), Err(ModelError::TooFewYears(2)));
        assert_eq!(set.remove(7), Err(ModelError::SlotOutOfRange(7)));
    }

    #[test]
    fn set_and_reset() {
        let mut set = ComparisonSet::default();
        set.set(1, 1929).unwrap();
        assert_eq!(set.years(), &[1348, 1929]);
        assert_eq!(set.set(5, 1929), Err(ModelError::SlotOutOfRange(5)));
        set.reset();
        assert_eq!(set, ComparisonSet::default());
    }

    #[test]
    fn unknown_years_are_skipped() {
        let store = Store::builtin();
        let set = ComparisonSet::new(vec![1700, 1929]).unwrap();
        assert_eq!(set.rows(&store).len(), 1);
        assert!(set.title(&store).is_none());
    }

    #[test]
    fn presets_select_their_pairs() {
        let store = Store::builtin();
        let set = ComparisonSet::preset(ComparisonPreset::DepressionVsFinancialCrisis);
        assert_eq!(set.years(), &[1929, 2008]);
        assert_eq!(
            set.title(&store).unwrap(),
            "1929 The Great Depression vs 2008 The Global Financial Crisis"
        );
        assert_eq!(
            ComparisonSet::preset(ComparisonPreset::BlackDeathVsFinancialCrisis),
            ComparisonSet::default()
        );
    }

    #[test]
    fn presets_parse_by_name() {
        assert_eq!(
            "1929-vs-2008".parse::<ComparisonPreset>(),
            Ok(ComparisonPreset::DepressionVsFinancialCrisis)
        );
        assert_eq!(
            " 1348-VS-2008".parse::<ComparisonPreset>(),
            Ok(ComparisonPreset::BlackDeathVsFinancialCrisis)
        );
        assert_eq!(
            "1492-vs-2008".parse::<ComparisonPreset>(),
            Err(ModelError::UnknownPreset("1492-vs-2008".to_string()))
        );
    }

    #[test]
    fn construction_bounds() {
        assert!(ComparisonSet::new(vec![1348]).is_err());
        assert!(ComparisonSet::new(vec![1, 2, 3, 4, 5]).is_err());
    }
}
