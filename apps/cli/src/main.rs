#![deny(warnings)]

//! Headless dashboard: renders one crisis year to SVG files and optionally
//! exports the view as JSON.

use anyhow::{bail, Context, Result};
use crisis_charts::{RecordingCanvas, SvgDocument};
use crisis_core::{AssetClass, Factor, Store};
use crisis_model::factors::parse_factor_setting;
use crisis_model::{ComparisonPreset, ComparisonSet, LineFilter};
use crisis_view::{DashboardConfig, RenderOutcome, Signal, Surfaces, ViewController};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    year: Option<i32>,
    filter: Option<LineFilter>,
    factors: Vec<(Factor, Decimal)>,
    out: Option<PathBuf>,
    export: Option<PathBuf>,
    compare: Option<ComparisonSet>,
    version: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{arg} expects a value"));
        match arg.as_str() {
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--year" => args.year = Some(value()?.parse::<i32>().context("--year expects a number")?),
            "--filter" => args.filter = Some(value()?.parse::<LineFilter>()?),
            "--factor" => args.factors.push(parse_factor_setting(&value()?)?),
            "--out" => args.out = Some(PathBuf::from(value()?)),
            "--export" => args.export = Some(PathBuf::from(value()?)),
            "--compare" => {
                let years = value()?
                    .split(',')
                    .map(|y| y.trim().parse::<i32>())
                    .collect::<Result<Vec<_>, _>>()
                    .context("--compare expects comma separated years")?;
                args.compare = Some(ComparisonSet::new(years)?);
            }
            "--preset" => {
                let preset = value()?.parse::<ComparisonPreset>()?;
                args.compare = Some(ComparisonSet::preset(preset));
            }
            "--version" => args.version = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

/// Surfaces the controller draws into, kept shared so they can be written
/// out afterwards.
struct Outputs {
    line_chart: Rc<RefCell<RecordingCanvas>>,
    factor_pie: Rc<RefCell<SvgDocument>>,
    sparklines: BTreeMap<AssetClass, Rc<RefCell<SvgDocument>>>,
}

impl Outputs {
    fn new(cfg: &DashboardConfig) -> Self {
        Self {
            line_chart: Rc::new(RefCell::new(RecordingCanvas::new(
                cfg.line_chart.width,
                cfg.line_chart.height,
            ))),
            factor_pie: Rc::new(RefCell::new(SvgDocument::new(100.0, 100.0))),
            sparklines: AssetClass::ALL
                .into_iter()
                .map(|a| (a, Rc::new(RefCell::new(SvgDocument::new(200.0, 64.0)))))
                .collect(),
        }
    }

    fn surfaces(&self) -> Surfaces {
        let mut surfaces = Surfaces {
            line_chart: Some(Box::new(Rc::clone(&self.line_chart))),
            factor_pie: Some(Box::new(Rc::clone(&self.factor_pie))),
            ..Surfaces::default()
        };
        for (asset, doc) in &self.sparklines {
            surfaces.sparklines.insert(*asset, Box::new(Rc::clone(doc)));
        }
        surfaces
    }

    fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut files = vec![
            (dir.join("price_chart.svg"), self.line_chart.borrow().to_svg()),
            (dir.join("factor_pie.svg"), self.factor_pie.borrow().to_svg()),
        ];
        for (asset, doc) in &self.sparklines {
            files.push((dir.join(format!("sparkline_{asset}.svg")), doc.borrow().to_svg()));
        }
        let mut written = Vec::with_capacity(files.len());
        for (path, svg) in files {
            fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

fn print_comparison(store: &Store, set: &ComparisonSet) -> Result<()> {
    if let Some(title) = set.title(store) {
        println!("{title}");
    }
    for row in set.rows(store) {
        println!(
            "{} {} | {} | {} | {} | housing {} | stock {} | gold {}",
            row.year, row.name, row.duration, row.scope, row.impact, row.housing, row.stock, row.gold
        );
    }
    Ok(())
}

fn print_summary(view: &ViewController, outcome: &RenderOutcome) -> Result<()> {
    let page = view.page()?;
    println!("{}", page.title);
    println!("{}", page.background);
    let drawn: Vec<String> = outcome
        .line_chart
        .iter()
        .flat_map(|s| s.drawn.iter().map(|a| a.label().to_string()))
        .collect();
    println!("Filter: {} | series: {}", view.filter().label(), drawn.join(", "));
    let w = view.factors();
    println!(
        "Factors | economic {}% | political {}% | disaster {}% | gdp {}%",
        w.economic, w.political, w.disaster, w.gdp
    );
    for card in &page.asset_cards {
        println!("{}: {}", card.asset.label(), card.change);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args()?;
    if args.version {
        println!(
            "crisis-dashboard {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(?args, "starting CLI");

    let cfg = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let store = Store::builtin();

    if let Some(set) = &args.compare {
        return print_comparison(&store, set);
    }

    let outputs = Outputs::new(&cfg);
    let mut view = ViewController::new(store, outputs.surfaces());
    let mut outcome = view.update(
        args.year.unwrap_or(cfg.default_year),
        args.filter.unwrap_or(cfg.default_filter),
    )?;
    for (factor, percentage) in args.factors {
        let pie = view.handle(Signal::FactorChanged { factor, percentage })?;
        outcome.pie_slices = pie.pie_slices;
    }

    let dir = args.out.unwrap_or_else(|| cfg.output_dir.clone());
    let written = outputs.write(&dir)?;
    info!(files = written.len(), dir = %dir.display(), "charts written");

    if let Some(path) = &args.export {
        let json = view.snapshot()?.to_json_pretty()?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "snapshot exported");
    }

    print_summary(&view, &outcome)
}
