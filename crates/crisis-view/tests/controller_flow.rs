use crisis_charts::{CanvasOp, RecordingCanvas, SparklineOutcome, SvgDocument, SvgNode};
use crisis_core::{AssetClass, Factor, Store};
use crisis_model::LineFilter;
use crisis_view::{Signal, Surfaces, ViewController, ViewEvent, ViewObserver};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::rc::Rc;

struct Harness {
    view: ViewController,
    canvas: Rc<RefCell<RecordingCanvas>>,
    pie: Rc<RefCell<SvgDocument>>,
    sparks: BTreeMap<AssetClass, Rc<RefCell<SvgDocument>>>,
}

fn harness() -> Harness {
    let canvas = Rc::new(RefCell::new(RecordingCanvas::new(800.0, 400.0)));
    let pie = Rc::new(RefCell::new(SvgDocument::new(100.0, 100.0)));
    let sparks: BTreeMap<AssetClass, Rc<RefCell<SvgDocument>>> = AssetClass::ALL
        .into_iter()
        .map(|a| (a, Rc::new(RefCell::new(SvgDocument::new(200.0, 64.0)))))
        .collect();

    let mut surfaces = Surfaces {
        line_chart: Some(Box::new(Rc::clone(&canvas))),
        factor_pie: Some(Box::new(Rc::clone(&pie))),
        ..Surfaces::default()
    };
    for (asset, doc) in &sparks {
        surfaces.sparklines.insert(*asset, Box::new(Rc::clone(doc)));
    }
    Harness {
        view: ViewController::new(Store::builtin(), surfaces),
        canvas,
        pie,
        sparks,
    }
}

fn legend(canvas: &RecordingCanvas) -> Vec<String> {
    canvas
        .ops()
        .iter()
        .filter_map(|op| match op {
            CanvasOp::FillText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn polyline_count(canvas: &RecordingCanvas) -> usize {
    canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, CanvasOp::StrokePolyline { .. }))
        .count()
}

#[derive(Clone, Default)]
struct EventLog(Rc<RefCell<Vec<ViewEvent>>>);

impl ViewObserver for EventLog {
    fn on_event(&mut self, event: &ViewEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

#[test]
fn update_is_idempotent() {
    let mut h = harness();
    h.view.update(1929, LineFilter::All).unwrap();
    let canvas = h.canvas.borrow().ops().to_vec();
    let pie = h.pie.borrow().nodes().to_vec();
    let gold = h.sparks[&AssetClass::Gold].borrow().nodes().to_vec();

    h.view.update(1929, LineFilter::All).unwrap();
    assert_eq!(h.canvas.borrow().ops(), canvas.as_slice());
    assert_eq!(h.pie.borrow().nodes(), pie.as_slice());
    assert_eq!(h.sparks[&AssetClass::Gold].borrow().nodes(), gold.as_slice());
}

#[test]
fn black_death_stock_view_shows_nothing_to_plot() {
    let mut h = harness();
    let outcome = h.view.update(1348, LineFilter::Stock).unwrap();
    assert_eq!(outcome.year, 1348);
    let line = outcome.line_chart.unwrap();
    assert!(line.drawn.is_empty());
    assert_eq!(legend(&h.canvas.borrow()), vec!["Housing", "Gold"]);
    assert_eq!(polyline_count(&h.canvas.borrow()), 0);

    assert_eq!(outcome.sparklines[&AssetClass::Stock], SparklineOutcome::Placeholder);
    assert_eq!(outcome.sparklines[&AssetClass::Housing], SparklineOutcome::Drawn);
    let stock = h.sparks[&AssetClass::Stock].borrow();
    assert!(matches!(
        &stock.nodes()[0],
        SvgNode::Text { content, .. } if content == "No data"
    ));
}

#[test]
fn financial_crisis_shows_three_series() {
    let mut h = harness();
    let outcome = h.view.update(2008, LineFilter::All).unwrap();
    assert_eq!(outcome.line_chart.unwrap().legend.len(), 3);
    assert_eq!(legend(&h.canvas.borrow()), vec!["Housing", "Stocks", "Gold"]);
    assert_eq!(polyline_count(&h.canvas.borrow()), 3);
    // 2008 has no disaster weight, so the pie has three slices.
    assert_eq!(outcome.pie_slices, Some(3));
    assert_eq!(h.pie.borrow().nodes().len(), 3);
}

#[test]
fn single_series_filter_keeps_full_legend() {
    let mut h = harness();
    let outcome = h.view.update(2008, LineFilter::Housing).unwrap();
    let line = outcome.line_chart.unwrap();
    assert_eq!(line.drawn, vec![AssetClass::Housing]);
    assert_eq!(line.legend, AssetClass::ALL.to_vec());
    assert_eq!(legend(&h.canvas.borrow()), vec!["Housing", "Stocks", "Gold"]);
    assert_eq!(polyline_count(&h.canvas.borrow()), 1);
}

#[test]
fn unknown_year_falls_back_to_nearest() {
    let mut h = harness();
    let log = EventLog::default();
    h.view.add_observer(Box::new(log.clone()));
    let outcome = h.view.handle(Signal::YearChanged { year: 1700 }).unwrap();
    assert_eq!(outcome.year, 1492);
    assert_eq!(h.view.year(), 1492);
    assert_eq!(
        log.0.borrow().as_slice(),
        &[ViewEvent::YearShown {
            requested: 1700,
            year: 1492
        }]
    );
}

#[test]
fn factor_change_redraws_only_the_pie() {
    let mut h = harness();
    h.view.update(1929, LineFilter::All).unwrap();
    let canvas = h.canvas.borrow().ops().to_vec();
    let housing = h.sparks[&AssetClass::Housing].borrow().nodes().to_vec();
    let pie_before = h.pie.borrow().nodes().to_vec();

    let outcome = h
        .view
        .handle(Signal::FactorChanged {
            factor: Factor::Economic,
            percentage: Decimal::new(85, 0),
        })
        .unwrap();
    assert!(outcome.line_chart.is_none());
    assert!(outcome.sparklines.is_empty());
    // Disaster is driven to zero and drops out of the pie.
    assert_eq!(outcome.pie_slices, Some(3));

    assert_eq!(h.canvas.borrow().ops(), canvas.as_slice());
    assert_eq!(h.sparks[&AssetClass::Housing].borrow().nodes(), housing.as_slice());
    assert_ne!(h.pie.borrow().nodes(), pie_before.as_slice());

    let w = h.view.factors();
    assert_eq!(w.economic, Decimal::new(85, 0));
    assert_eq!(w.political, Decimal::new(1251, 2));
    assert_eq!(w.disaster, Decimal::ZERO);
    assert_eq!(w.gdp, Decimal::new(249, 2));

    h.view.handle(Signal::ResetFactors).unwrap();
    assert_eq!(h.view.factors().economic, Decimal::new(65, 0));
    assert_eq!(h.pie.borrow().nodes().len(), 4);
}

#[test]
fn missing_pie_surface_does_not_block_other_charts() {
    let canvas = Rc::new(RefCell::new(RecordingCanvas::new(800.0, 400.0)));
    let surfaces = Surfaces {
        line_chart: Some(Box::new(Rc::clone(&canvas))),
        ..Surfaces::default()
    };
    let mut view = ViewController::new(Store::builtin(), surfaces);
    let outcome = view.update(2008, LineFilter::Gold).unwrap();
    assert!(outcome.pie_slices.is_none());
    assert_eq!(outcome.line_chart.unwrap().drawn, vec![AssetClass::Gold]);
    assert_eq!(legend(&canvas.borrow()), vec!["Housing", "Stocks", "Gold"]);
}

#[test]
fn filter_signals_reach_observers() {
    let mut h = harness();
    let log = EventLog::default();
    h.view.add_observer(Box::new(log.clone()));
    h.view
        .handle(Signal::FilterChanged {
            filter: LineFilter::Housing,
        })
        .unwrap();
    h.view.handle(Signal::CycleFilter { reverse: false }).unwrap();
    assert_eq!(h.view.filter(), LineFilter::Stock);
    assert_eq!(
        log.0.borrow().as_slice(),
        &[
            ViewEvent::FilterChanged {
                filter: LineFilter::Housing
            },
            ViewEvent::FilterChanged {
                filter: LineFilter::Stock
            },
        ]
    );
}

fn signal() -> impl Strategy<Value = Signal> {
    prop_oneof![
        (1200i32..2100).prop_map(|year| Signal::YearChanged { year }),
        prop::sample::select(LineFilter::ORDER.to_vec())
            .prop_map(|filter| Signal::FilterChanged { filter }),
        any::<bool>().prop_map(|reverse| Signal::CycleFilter { reverse }),
        (0usize..4, -2000i64..12000).prop_map(|(i, cents)| Signal::FactorChanged {
            factor: Factor::ALL[i],
            percentage: Decimal::new(cents, 2),
        }),
        Just(Signal::ResetFactors),
    ]
}

proptest! {
    #[test]
    fn factor_mix_and_pie_stay_whole(signals in prop::collection::vec(signal(), 1..20)) {
        let mut h = harness();
        h.view.update(1492, LineFilter::All).unwrap();
        for s in signals {
            h.view.handle(s).unwrap();
            prop_assert_eq!(h.view.factors().total(), Decimal::ONE_HUNDRED);
            let slices = crisis_model::build_pie_slices(h.view.factors());
            let span: f64 = slices.iter().map(|s| s.span()).sum();
            prop_assert!((span - TAU).abs() < 1e-9);
            prop_assert_eq!(h.pie.borrow().nodes().len(), slices.len());
        }
    }
}
