//! Drawing surfaces the chart primitives render into.
//!
//! Two kinds exist: a raster-style [`Canvas2d`] for the price chart and a
//! path-based [`VectorSurface`] for the pie chart and sparklines. The
//! recording implementations keep the draw calls and can emit SVG markup.

use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

pub type Point = (f64, f64);

/// One immediate-mode canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    StrokePolyline {
        points: Vec<Point>,
        color: String,
        width: f64,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        r: f64,
        color: String,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        color: String,
        font: String,
    },
}

/// A 2D raster drawing surface.
pub trait Canvas2d {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn apply(&mut self, op: CanvasOp);
}

/// Canvas that records every call. A full-surface `ClearRect` discards what
/// was drawn before it, as clearing a real canvas erases its pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Render the recorded calls as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(256 + self.ops.len() * 96);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for op in &self.ops {
            match op {
                CanvasOp::ClearRect { .. } => {}
                CanvasOp::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    let _ = write!(
                        out,
                        r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"/>"#,
                        esc(color)
                    );
                }
                CanvasOp::StrokeLine {
                    from,
                    to,
                    color,
                    width,
                } => {
                    let _ = write!(
                        out,
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{width}"/>"#,
                        from.0,
                        from.1,
                        to.0,
                        to.1,
                        esc(color)
                    );
                }
                CanvasOp::StrokePolyline {
                    points,
                    color,
                    width,
                } => {
                    let pts: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
                    let _ = write!(
                        out,
                        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{width}"/>"#,
                        pts.join(" "),
                        esc(color)
                    );
                }
                CanvasOp::FillCircle { cx, cy, r, color } => {
                    let _ = write!(
                        out,
                        r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#,
                        esc(color)
                    );
                }
                CanvasOp::FillText {
                    text,
                    x,
                    y,
                    color,
                    font,
                } => {
                    let _ = write!(
                        out,
                        r#"<text x="{x}" y="{y}" fill="{}" style="font: {}">{}</text>"#,
                        esc(color),
                        esc(font),
                        esc(text)
                    );
                }
            }
        }
        out.push_str("</svg>");
        out
    }
}

impl Canvas2d for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn apply(&mut self, op: CanvasOp) {
        if let CanvasOp::ClearRect {
            x,
            y,
            width,
            height,
        } = op
        {
            if x <= 0.0 && y <= 0.0 && x + width >= self.width && y + height >= self.height {
                self.ops.clear();
            }
        }
        self.ops.push(op);
    }
}

/// A shared canvas lets its owner read back what a chart drew after handing
/// the surface to someone else.
impl<C: Canvas2d + ?Sized> Canvas2d for Rc<RefCell<C>> {
    fn width(&self) -> f64 {
        self.borrow().width()
    }

    fn height(&self) -> f64 {
        self.borrow().height()
    }

    fn apply(&mut self, op: CanvasOp) {
        self.borrow_mut().apply(op);
    }
}

/// One retained vector element.
#[derive(Clone, Debug, PartialEq)]
pub enum SvgNode {
    Path {
        d: String,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
    },
    Text {
        x: f64,
        y: f64,
        anchor: String,
        fill: String,
        font_size: f64,
        content: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

/// A retained-mode vector surface, like an inline SVG element.
pub trait VectorSurface {
    fn view_box(&self) -> ViewBox;
    fn clear(&mut self);
    fn append(&mut self, node: SvgNode);
}

/// In-memory SVG element.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgDocument {
    view_box: ViewBox,
    nodes: Vec<SvgNode>,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            view_box: ViewBox { width, height },
            nodes: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[SvgNode] {
        &self.nodes
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(128 + self.nodes.len() * 96);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 {} {}">"#,
            self.view_box.width, self.view_box.height
        );
        for node in &self.nodes {
            match node {
                SvgNode::Path {
                    d,
                    fill,
                    stroke,
                    stroke_width,
                } => {
                    let _ = write!(
                        out,
                        r#"<path d="{}" fill="{}""#,
                        esc(d),
                        esc(fill.as_deref().unwrap_or("none"))
                    );
                    if let Some(stroke) = stroke {
                        let _ = write!(out, r#" stroke="{}""#, esc(stroke));
                    }
                    if let Some(w) = stroke_width {
                        let _ = write!(out, r#" stroke-width="{w}""#);
                    }
                    out.push_str("/>");
                }
                SvgNode::Circle { cx, cy, r, fill } => {
                    let _ = write!(
                        out,
                        r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#,
                        esc(fill)
                    );
                }
                SvgNode::Text {
                    x,
                    y,
                    anchor,
                    fill,
                    font_size,
                    content,
                } => {
                    let _ = write!(
                        out,
                        r#"<text x="{x}" y="{y}" text-anchor="{}" fill="{}" font-size="{font_size}">{}</text>"#,
                        esc(anchor),
                        esc(fill),
                        esc(content)
                    );
                }
            }
        }
        out.push_str("</svg>");
        out
    }
}

impl VectorSurface for SvgDocument {
    fn view_box(&self) -> ViewBox {
        self.view_box
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn append(&mut self, node: SvgNode) {
        self.nodes.push(node);
    }
}

impl<V: VectorSurface + ?Sized> VectorSurface for Rc<RefCell<V>> {
    fn view_box(&self) -> ViewBox {
        self.borrow().view_box()
    }

    fn clear(&mut self) {
        self.borrow_mut().clear();
    }

    fn append(&mut self, node: SvgNode) {
        self.borrow_mut().append(node);
    }
}

/// Minimal XML escaping for attribute values and text.
fn esc<S: AsRef<str>>(s: S) -> String {
    let mut out = String::with_capacity(s.as_ref().len() + 8);
    for ch in s.as_ref().chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
