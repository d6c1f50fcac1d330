//! Axis-free mini charts on the asset cards.

use crate::surface::{SvgNode, VectorSurface};
use crisis_model::{has_market_data, x_at, Scale};

#[derive(Clone, Debug, PartialEq)]
pub struct SparklineStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub marker_radius: f64,
    pub marker_fill: String,
    pub placeholder: String,
    pub placeholder_fill: String,
    pub placeholder_font_size: f64,
}

impl Default for SparklineStyle {
    fn default() -> Self {
        Self {
            stroke: "rgba(255,255,255,0.8)".to_string(),
            stroke_width: 2.0,
            marker_radius: 2.0,
            marker_fill: "white".to_string(),
            placeholder: "No data".to_string(),
            placeholder_fill: "rgba(255,255,255,0.7)".to_string(),
            placeholder_font_size: 12.0,
        }
    }
}

/// Whether a sparkline had data to plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SparklineOutcome {
    Drawn,
    Placeholder,
}

/// Clear `surface` and draw `values` scaled to their own min and max across
/// the surface's view box. When no value is positive, a centered placeholder
/// label is drawn instead.
pub fn draw_sparkline(
    surface: &mut dyn VectorSurface,
    values: &[f64],
    style: &SparklineStyle,
) -> SparklineOutcome {
    surface.clear();
    let vb = surface.view_box();

    if !has_market_data(values) {
        surface.append(SvgNode::Text {
            x: vb.width / 2.0,
            y: vb.height / 2.0,
            anchor: "middle".to_string(),
            fill: style.placeholder_fill.clone(),
            font_size: style.placeholder_font_size,
            content: style.placeholder.clone(),
        });
        return SparklineOutcome::Placeholder;
    }

    let scale = Scale::for_sparkline(values);
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (x_at(i, values.len(), vb.width), scale.project(*v, vb.height)))
        .collect();

    let d = points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { "M" } else { "L" };
            format!("{cmd} {x} {y}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    surface.append(SvgNode::Path {
        d,
        fill: None,
        stroke: Some(style.stroke.clone()),
        stroke_width: Some(style.stroke_width),
    });
    for (cx, cy) in points {
        surface.append(SvgNode::Circle {
            cx,
            cy,
            r: style.marker_radius,
            fill: style.marker_fill.clone(),
        });
    }
    SparklineOutcome::Drawn
}
