#![deny(warnings)]

//! View controller for the crisis dashboard.
//!
//! The controller owns the current year, chart filter and factor mix. Each
//! [`Signal`] updates that state and redraws into the surfaces handed in at
//! construction. Nothing is cached between redraws: render models are rebuilt
//! from the store every time.

use chrono::{DateTime, Utc};
use crisis_charts::{
    draw_line_chart, draw_pie_chart, draw_sparkline, require, Canvas2d, ChartError,
    LineChartStyle, LineChartSummary, PieStyle, SparklineOutcome, SparklineStyle, VectorSurface,
};
use crisis_core::{AssetClass, Factor, FactorWeights, HistoricalRecord, Store, StoreError};
use crisis_model::{
    build_line_series, build_page, build_pie_slices, ChartSeries, FactorMix, LineFilter,
    PageContent,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod config;
pub mod snapshot;

pub use config::{ChartSize, ConfigError, DashboardConfig, DEFAULT_YEAR};
pub use snapshot::ExportSnapshot;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input delivered to [`ViewController::handle`].
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    YearChanged { year: i32 },
    FilterChanged { filter: LineFilter },
    /// Step to the next filter, or the previous one when `reverse` is set.
    CycleFilter { reverse: bool },
    /// Only the factor pie is redrawn.
    FactorChanged { factor: Factor, percentage: Decimal },
    ResetFactors,
}

/// Emitted to observers after a signal has been handled.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    YearShown { requested: i32, year: i32 },
    FilterChanged { filter: LineFilter },
    FactorsChanged { weights: FactorWeights },
}

pub trait ViewObserver {
    fn on_event(&mut self, event: &ViewEvent);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Short user-facing messages, e.g. a toast.
pub trait Notifier {
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Notifier that writes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => warn!(notice = message, "notification"),
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(?level, notice = message, "notification")
            }
        }
    }
}

/// Drawing surfaces the controller renders into. Any of them may be absent;
/// the corresponding chart is then skipped with a warning.
#[derive(Default)]
pub struct Surfaces {
    pub line_chart: Option<Box<dyn Canvas2d>>,
    pub factor_pie: Option<Box<dyn VectorSurface>>,
    pub sparklines: BTreeMap<AssetClass, Box<dyn VectorSurface>>,
}

/// What one redraw produced. `None` means the chart was skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOutcome {
    pub year: i32,
    pub line_chart: Option<LineChartSummary>,
    pub pie_slices: Option<usize>,
    pub sparklines: BTreeMap<AssetClass, SparklineOutcome>,
}

/// Chart styles used by the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewStyles {
    pub line: LineChartStyle,
    pub pie: PieStyle,
    pub sparkline: SparklineStyle,
}

pub struct ViewController {
    store: Store,
    surfaces: Surfaces,
    styles: ViewStyles,
    year: i32,
    filter: LineFilter,
    factors: FactorMix,
    /// Year whose weights were last loaded into `factors`.
    loaded_year: Option<i32>,
    notifier: Box<dyn Notifier>,
    observers: Vec<Box<dyn ViewObserver>>,
}

impl ViewController {
    /// A controller showing [`DEFAULT_YEAR`] with every series. Nothing is
    /// drawn until the first [`update`](Self::update) or [`handle`](Self::handle).
    pub fn new(store: Store, surfaces: Surfaces) -> Self {
        Self {
            store,
            surfaces,
            styles: ViewStyles::default(),
            year: DEFAULT_YEAR,
            filter: LineFilter::default(),
            factors: FactorMix::default(),
            loaded_year: None,
            notifier: Box::new(LogNotifier),
            observers: Vec::new(),
        }
    }

    pub fn with_styles(mut self, styles: ViewStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn ViewObserver>) {
        self.observers.push(observer);
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn filter(&self) -> LineFilter {
        self.filter
    }

    pub fn factors(&self) -> &FactorWeights {
        self.factors.weights()
    }

    fn record(&self) -> Result<&HistoricalRecord, ViewError> {
        Ok(self.store.resolve(self.year)?)
    }

    /// Resolve `year`, switch to it and `filter`, and redraw every surface.
    ///
    /// The record's factor weights replace the factor mix when the resolved
    /// year differs from the one last loaded, so repeated calls with the same
    /// arguments leave identical draw calls behind.
    pub fn update(&mut self, year: i32, filter: LineFilter) -> Result<RenderOutcome, ViewError> {
        let resolved = self.store.resolve_year(year)?;
        if resolved != year {
            debug!(requested = year, year = resolved, "nearest year substituted");
        }
        self.year = resolved;
        self.filter = filter;
        if self.loaded_year != Some(resolved) {
            let weights = self.store.get(resolved)?.factor_weights.clone();
            self.factors = FactorMix::new(weights);
            self.loaded_year = Some(resolved);
        }
        info!(year = resolved, %filter, "dashboard update");
        self.redraw_all()
    }

    /// Apply one input signal, redraw what it affects and notify observers.
    pub fn handle(&mut self, signal: Signal) -> Result<RenderOutcome, ViewError> {
        let (outcome, event) = match signal {
            Signal::YearChanged { year } => {
                let outcome = self.update(year, self.filter)?;
                let event = ViewEvent::YearShown {
                    requested: year,
                    year: outcome.year,
                };
                (outcome, event)
            }
            Signal::FilterChanged { filter } => {
                let outcome = self.update(self.year, filter)?;
                (outcome, ViewEvent::FilterChanged { filter })
            }
            Signal::CycleFilter { reverse } => {
                let filter = if reverse {
                    self.filter.previous()
                } else {
                    self.filter.next()
                };
                let outcome = self.update(self.year, filter)?;
                self.notifier
                    .notify(NoticeLevel::Info, &format!("Switched to: {}", filter.label()));
                (outcome, ViewEvent::FilterChanged { filter })
            }
            Signal::FactorChanged { factor, percentage } => {
                let applied = self.factors.set(factor, percentage);
                debug!(%factor, %percentage, %applied, "factor changed");
                self.notifier.notify(
                    NoticeLevel::Success,
                    &format!("{} adjusted to {applied}%", factor.label()),
                );
                let outcome = self.redraw_factors();
                let weights = self.factors.weights().clone();
                (outcome, ViewEvent::FactorsChanged { weights })
            }
            Signal::ResetFactors => {
                self.factors.reset();
                let outcome = self.redraw_factors();
                let weights = self.factors.weights().clone();
                (outcome, ViewEvent::FactorsChanged { weights })
            }
        };
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        Ok(outcome)
    }

    fn redraw_all(&mut self) -> Result<RenderOutcome, ViewError> {
        let record = self.store.resolve(self.year)?;
        let mut outcome = RenderOutcome {
            year: record.year,
            ..RenderOutcome::default()
        };

        match render_line_chart(&mut self.surfaces, record, self.filter, &self.styles.line) {
            Ok(summary) => outcome.line_chart = Some(summary),
            Err(err) => warn!(error = %err, "price chart skipped"),
        }
        match render_pie(&mut self.surfaces, self.factors.weights(), &self.styles.pie) {
            Ok(n) => outcome.pie_slices = Some(n),
            Err(err) => warn!(error = %err, "factor pie skipped"),
        }
        for asset in AssetClass::ALL {
            match render_sparkline(&mut self.surfaces, record, asset, &self.styles.sparkline) {
                Ok(drawn) => {
                    outcome.sparklines.insert(asset, drawn);
                }
                Err(err) => warn!(error = %err, %asset, "sparkline skipped"),
            }
        }
        Ok(outcome)
    }

    fn redraw_factors(&mut self) -> RenderOutcome {
        let mut outcome = RenderOutcome {
            year: self.year,
            ..RenderOutcome::default()
        };
        match render_pie(&mut self.surfaces, self.factors.weights(), &self.styles.pie) {
            Ok(n) => outcome.pie_slices = Some(n),
            Err(err) => warn!(error = %err, "factor pie skipped"),
        }
        outcome
    }

    /// Series for the current year and filter.
    pub fn series(&self) -> Result<ChartSeries, ViewError> {
        Ok(build_line_series(self.record()?, self.filter))
    }

    pub fn page(&self) -> Result<PageContent, ViewError> {
        Ok(build_page(self.record()?))
    }

    /// Export of the current view, stamped with the current time.
    pub fn snapshot(&self) -> Result<ExportSnapshot, ViewError> {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, timestamp: DateTime<Utc>) -> Result<ExportSnapshot, ViewError> {
        let record = self.record()?;
        Ok(ExportSnapshot {
            timestamp,
            year: record.year,
            filter: self.filter,
            chart: build_line_series(record, LineFilter::All),
            record: record.clone(),
            factors: self.factors.weights().clone(),
        })
    }
}

fn render_line_chart(
    surfaces: &mut Surfaces,
    record: &HistoricalRecord,
    filter: LineFilter,
    style: &LineChartStyle,
) -> Result<LineChartSummary, ChartError> {
    let canvas = require(surfaces.line_chart.as_deref_mut(), "price chart")?;
    let series = build_line_series(record, LineFilter::All);
    Ok(draw_line_chart(canvas, &series, filter, style))
}

fn render_pie(
    surfaces: &mut Surfaces,
    weights: &FactorWeights,
    style: &PieStyle,
) -> Result<usize, ChartError> {
    let surface = require(surfaces.factor_pie.as_deref_mut(), "factor pie")?;
    let slices = build_pie_slices(weights);
    draw_pie_chart(surface, &slices, style);
    Ok(slices.len())
}

fn render_sparkline(
    surfaces: &mut Surfaces,
    record: &HistoricalRecord,
    asset: AssetClass,
    style: &SparklineStyle,
) -> Result<SparklineOutcome, ChartError> {
    let surface = require(
        surfaces.sparklines.get_mut(&asset).map(|s| &mut **s),
        sparkline_name(asset),
    )?;
    Ok(draw_sparkline(
        surface,
        record.price_history.values(asset),
        style,
    ))
}

fn sparkline_name(asset: AssetClass) -> &'static str {
    match asset {
        AssetClass::Housing => "housing sparkline",
        AssetClass::Stock => "stock sparkline",
        AssetClass::Gold => "gold sparkline",
    }
}
