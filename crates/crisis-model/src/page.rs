//! Text content of the analysis pages for one crisis year.

use crisis_core::{AssetClass, EventCategory, HistoricalEvent, HistoricalRecord};
use serde::Serialize;

/// Events listed in the overview panel.
pub const EVENT_LIST_LIMIT: usize = 5;
/// Events shown on the vertical timeline.
pub const TIMELINE_LIMIT: usize = 3;
/// Metric cards on the overview page.
pub const METRIC_CARD_LIMIT: usize = 3;

const TIMELINE_ACCENTS: [&str; 3] = ["#dc2626", "#1e40af", "#059669"];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventItem {
    pub name: String,
    pub date: String,
    pub description: String,
    pub category: EventCategory,
    pub accent: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineItem {
    pub date: String,
    pub category_label: &'static str,
    pub description: String,
    pub accent: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

/// Summary card for one asset class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetCard {
    pub asset: AssetClass,
    /// Signed percentage, or `N/A` for a market that did not exist.
    pub change: String,
    pub details: Vec<String>,
}

/// Everything the pages display for one year besides the charts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageContent {
    pub year: i32,
    pub title: String,
    pub factor_title: String,
    pub results_title: String,
    pub background: String,
    pub events: Vec<EventItem>,
    pub timeline: Vec<TimelineItem>,
    pub metrics: Vec<MetricCard>,
    pub asset_cards: Vec<AssetCard>,
}

/// Accent color of an event category.
pub fn category_accent(category: EventCategory) -> &'static str {
    match category {
        EventCategory::Economic => "#1e40af",
        EventCategory::Political => "#dc2626",
        EventCategory::Disaster => "#f59e0b",
        EventCategory::Technology => "#059669",
    }
}

/// Human label for a key metric, falling back to the key itself.
pub fn metric_label(key: &str) -> String {
    let known = match key {
        "population_loss" => Some("Population loss"),
        "economic_contraction" => Some("Economic contraction"),
        "unemployment_rate" => Some("Unemployment rate"),
        "gdp_contraction" => Some("GDP contraction"),
        "trade_growth" => Some("Trade growth"),
        "gold_influx" => Some("Gold influx"),
        "inflation_rate" => Some("Inflation rate"),
        _ => None,
    };
    match known {
        Some(label) => label.to_string(),
        None => {
            let spaced = key.replace('_', " ");
            let mut chars = spaced.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn signed_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{value}%")
    } else {
        format!("{value}%")
    }
}

/// Display text for an asset's percentage change. A stock change of 0 marks
/// a year without a stock market and renders as `N/A`.
pub fn format_change(asset: AssetClass, record: &HistoricalRecord) -> String {
    let change = record.assets.get(asset).percent_change;
    if asset == AssetClass::Stock && change == 0.0 {
        return "N/A".to_string();
    }
    signed_percent(change)
}

fn asset_card(asset: AssetClass, record: &HistoricalRecord) -> AssetCard {
    let a = record.assets.get(asset);
    let currency = if asset == AssetClass::Gold { "$" } else { "" };
    let mut details = Vec::new();
    if let Some(v) = a.start_value {
        details.push(format!("Start: {currency}{v}"));
    }
    if let Some(v) = a.peak_value {
        details.push(format!("Peak: {currency}{v}"));
    }
    if let Some(v) = a.trough_value {
        details.push(format!("Trough: {currency}{v}"));
    }
    AssetCard {
        asset,
        change: format_change(asset, record),
        details,
    }
}

fn event_item(e: &HistoricalEvent) -> EventItem {
    EventItem {
        name: e.name.clone(),
        date: e.date.clone(),
        description: e.description.clone(),
        category: e.category,
        accent: category_accent(e.category),
    }
}

/// Build the page content for `record`.
pub fn build_page(record: &HistoricalRecord) -> PageContent {
    let year = record.year;
    let info = &record.basic_info;
    PageContent {
        year,
        title: format!("{year}: Historical Overview"),
        factor_title: format!("{year}: Economic Factor Analysis"),
        results_title: format!("{year}: Asset Price Analysis"),
        background: format!(
            "{year} falls within {}. Major changes unfolded across {} over {}. \
             The period is characterized as {}, with far-reaching consequences.",
            record.name,
            info.scope,
            info.duration,
            record.kind.to_lowercase()
        ),
        events: record
            .events
            .iter()
            .take(EVENT_LIST_LIMIT)
            .map(event_item)
            .collect(),
        timeline: record
            .events
            .iter()
            .take(TIMELINE_LIMIT)
            .enumerate()
            .map(|(i, e)| TimelineItem {
                date: e.date.clone(),
                category_label: e.category.label(),
                description: e.description.clone(),
                accent: TIMELINE_ACCENTS[i % TIMELINE_ACCENTS.len()],
            })
            .collect(),
        metrics: record
            .key_metrics
            .iter()
            .take(METRIC_CARD_LIMIT)
            .map(|m| MetricCard {
                label: metric_label(&m.key),
                value: m.value.clone(),
            })
            .collect(),
        asset_cards: AssetClass::ALL
            .into_iter()
            .map(|a| asset_card(a, record))
            .collect(),
    }
}
