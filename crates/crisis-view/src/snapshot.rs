//! Read-only export of what the dashboard currently shows.

use chrono::{DateTime, Utc};
use crisis_core::{FactorWeights, HistoricalRecord};
use crisis_model::{ChartSeries, LineFilter};
use serde::Serialize;

/// Export payload. `chart` always carries all three asset series, whatever
/// the active filter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportSnapshot {
    pub timestamp: DateTime<Utc>,
    pub year: i32,
    pub filter: LineFilter,
    pub chart: ChartSeries,
    pub record: HistoricalRecord,
    pub factors: FactorWeights,
}

impl ExportSnapshot {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
