#![deny(warnings)]

//! Chart primitives for the crisis dashboard.
//!
//! Every primitive is a pure function of its render model and the surface it
//! is handed: it clears the surface and redraws from scratch, so calling it
//! twice with the same input leaves the same draw calls behind.

use thiserror::Error;

pub mod line;
pub mod pie;
pub mod sparkline;
pub mod surface;

pub use line::{draw_line_chart, series_color, LineChartStyle, LineChartSummary};
pub use pie::{draw_pie_chart, slice_path, PieStyle};
pub use sparkline::{draw_sparkline, SparklineOutcome, SparklineStyle};
pub use surface::{
    Canvas2d, CanvasOp, Point, RecordingCanvas, SvgDocument, SvgNode, VectorSurface, ViewBox,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("no drawing surface attached for {0}")]
    MissingSurface(&'static str),
}

/// Borrow an optional surface, naming it in the error when it is absent.
///
/// Example: `require(surfaces.pie.as_deref_mut(), "factor pie")?`
pub fn require<'a, S: ?Sized>(
    surface: Option<&'a mut S>,
    name: &'static str,
) -> Result<&'a mut S, ChartError> {
    surface.ok_or(ChartError::MissingSurface(name))
}
