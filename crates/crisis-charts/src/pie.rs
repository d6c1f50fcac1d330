//! Factor pie chart.

use crate::surface::{SvgNode, VectorSurface};
use crisis_model::PieSlice;
use std::f64::consts::{PI, TAU};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct PieStyle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for PieStyle {
    fn default() -> Self {
        Self {
            cx: 50.0,
            cy: 50.0,
            radius: 40.0,
            stroke: "white".to_string(),
            stroke_width: 2.0,
        }
    }
}

fn point_at(style: &PieStyle, angle: f64) -> (f64, f64) {
    (
        style.cx + style.radius * angle.cos(),
        style.cy + style.radius * angle.sin(),
    )
}

/// SVG path of one slice, drawn from the center.
///
/// The large-arc flag is derived from this slice's own span. A slice that
/// covers the whole circle is split into two half arcs, since an arc whose
/// endpoints coincide renders nothing.
pub fn slice_path(slice: &PieSlice, style: &PieStyle) -> String {
    let (cx, cy, r) = (style.cx, style.cy, style.radius);
    let (x1, y1) = point_at(style, slice.start_angle);
    if slice.span() >= TAU {
        let (xm, ym) = point_at(style, slice.start_angle + PI);
        return format!(
            "M {cx} {cy} L {x1} {y1} A {r} {r} 0 1 1 {xm} {ym} A {r} {r} 0 1 1 {x1} {y1} Z"
        );
    }
    let (x2, y2) = point_at(style, slice.end_angle);
    let large_arc = u8::from(slice.is_large_arc());
    format!("M {cx} {cy} L {x1} {y1} A {r} {r} 0 {large_arc} 1 {x2} {y2} Z")
}

/// Clear `surface` and draw one path per slice.
pub fn draw_pie_chart(surface: &mut dyn VectorSurface, slices: &[PieSlice], style: &PieStyle) {
    surface.clear();
    for slice in slices {
        surface.append(SvgNode::Path {
            d: slice_path(slice, style),
            fill: Some(slice.color.to_string()),
            stroke: Some(style.stroke.clone()),
            stroke_width: Some(style.stroke_width),
        });
    }
    debug!(slices = slices.len(), "factor pie drawn");
}
