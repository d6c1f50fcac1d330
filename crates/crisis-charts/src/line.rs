//! Multi-series price chart.

use crate::surface::{Canvas2d, CanvasOp, Point};
use crisis_core::AssetClass;
use crisis_model::{has_market_data, x_at, ChartSeries, LineFilter, Scale};
use tracing::debug;

/// Layout and colors of the price chart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineChartStyle {
    /// Inset of the plot area from every edge.
    pub padding: f64,
    pub vertical_divisions: u32,
    pub horizontal_divisions: u32,
    pub background: String,
    pub grid_color: String,
    pub line_width: f64,
    pub marker_radius: f64,
    pub legend_x: f64,
    /// Distance of the legend row from the bottom edge.
    pub legend_bottom_offset: f64,
    pub legend_spacing: f64,
    pub legend_swatch: f64,
    pub legend_text_color: String,
    pub legend_font: String,
}

impl Default for LineChartStyle {
    fn default() -> Self {
        Self {
            padding: 40.0,
            vertical_divisions: 6,
            horizontal_divisions: 5,
            background: "#f9fafb".to_string(),
            grid_color: "#e5e7eb".to_string(),
            line_width: 3.0,
            marker_radius: 4.0,
            legend_x: 60.0,
            legend_bottom_offset: 20.0,
            legend_spacing: 80.0,
            legend_swatch: 12.0,
            legend_text_color: "#374151".to_string(),
            legend_font: "12px sans-serif".to_string(),
        }
    }
}

/// Line and legend color of an asset series.
pub fn series_color(asset: AssetClass) -> &'static str {
    match asset {
        AssetClass::Housing => "#1e40af",
        AssetClass::Stock => "#dc2626",
        AssetClass::Gold => "#f59e0b",
    }
}

/// What a line chart call ended up drawing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineChartSummary {
    pub drawn: Vec<AssetClass>,
    pub legend: Vec<AssetClass>,
}

/// Plot rectangle inside the padding.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// Clear `canvas` and draw the grid, every series of `series` selected by
/// `filter` and the legend.
///
/// `series` should carry every asset of the record: the legend comes from
/// [`ChartSeries::legend`] whatever the filter. Each series is scaled on its
/// own [`Scale::for_line`] domain. A stock series with no positive value (a
/// market that did not exist yet) is not drawn.
pub fn draw_line_chart(
    canvas: &mut dyn Canvas2d,
    series: &ChartSeries,
    filter: LineFilter,
    style: &LineChartStyle,
) -> LineChartSummary {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.apply(CanvasOp::ClearRect {
        x: 0.0,
        y: 0.0,
        width: w,
        height: h,
    });
    canvas.apply(CanvasOp::FillRect {
        x: 0.0,
        y: 0.0,
        width: w,
        height: h,
        color: style.background.clone(),
    });

    let area = PlotArea {
        left: style.padding,
        top: style.padding,
        width: (w - 2.0 * style.padding).max(0.0),
        height: (h - 2.0 * style.padding).max(0.0),
    };
    draw_grid(canvas, area, style);

    let mut summary = LineChartSummary::default();
    for asset in AssetClass::ALL {
        if !filter.includes(asset) {
            continue;
        }
        let Some(values) = series.get(asset) else {
            continue;
        };
        if values.is_empty() || (asset == AssetClass::Stock && !has_market_data(values)) {
            continue;
        }
        draw_series(canvas, values, series_color(asset), area, style);
        summary.drawn.push(asset);
    }

    summary.legend = series.legend();
    draw_legend(canvas, &summary.legend, h, style);
    debug!(?filter, drawn = ?summary.drawn, "price chart drawn");
    summary
}

fn draw_grid(canvas: &mut dyn Canvas2d, area: PlotArea, style: &LineChartStyle) {
    let v = style.vertical_divisions.max(1);
    for i in 0..=v {
        let x = area.left + f64::from(i) * area.width / f64::from(v);
        canvas.apply(CanvasOp::StrokeLine {
            from: (x, area.top),
            to: (x, area.top + area.height),
            color: style.grid_color.clone(),
            width: 1.0,
        });
    }
    let hd = style.horizontal_divisions.max(1);
    for i in 0..=hd {
        let y = area.top + f64::from(i) * area.height / f64::from(hd);
        canvas.apply(CanvasOp::StrokeLine {
            from: (area.left, y),
            to: (area.left + area.width, y),
            color: style.grid_color.clone(),
            width: 1.0,
        });
    }
}

fn draw_series(
    canvas: &mut dyn Canvas2d,
    values: &[f64],
    color: &str,
    area: PlotArea,
    style: &LineChartStyle,
) {
    let scale = Scale::for_line(values);
    let points: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            (
                area.left + x_at(i, values.len(), area.width),
                area.top + scale.project(*v, area.height),
            )
        })
        .collect();

    canvas.apply(CanvasOp::StrokePolyline {
        points: points.clone(),
        color: color.to_string(),
        width: style.line_width,
    });
    for (cx, cy) in points {
        canvas.apply(CanvasOp::FillCircle {
            cx,
            cy,
            r: style.marker_radius,
            color: color.to_string(),
        });
    }
}

fn draw_legend(canvas: &mut dyn Canvas2d, entries: &[AssetClass], height: f64, style: &LineChartStyle) {
    let y = height - style.legend_bottom_offset;
    let mut x = style.legend_x;
    for asset in entries {
        canvas.apply(CanvasOp::FillRect {
            x,
            y,
            width: style.legend_swatch,
            height: style.legend_swatch,
            color: series_color(*asset).to_string(),
        });
        canvas.apply(CanvasOp::FillText {
            text: asset.label().to_string(),
            x: x + 20.0,
            y: y + 10.0,
            color: style.legend_text_color.clone(),
            font: style.legend_font.clone(),
        });
        x += style.legend_spacing;
    }
}
