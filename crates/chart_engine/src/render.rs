//! Chart rendering
//!
//! The engine paints through a small drawing interface so the same
//! geometry can be drawn to SVG, a canvas, or recorded as primitives for a
//! front end.

use crate::arc::Wedge;
use crate::geometry::{LayoutPoint, LayoutRect};
use crate::model::Color;
use crate::path::Path;
use serde::{Deserialize, Serialize};

/// Text anchor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Text baseline position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
    Alphabetic,
}

/// Fill and stroke for a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl PaintStyle {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }
}

/// A run of text to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    pub position: LayoutPoint,
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
    /// Rotation in degrees around `position`
    pub rotation: f64,
}

/// Measures rendered text width
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font_size: f64) -> f64;
}

/// Width estimate from character count, for targets without font metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasurer;

impl TextMeasurer for ApproximateTextMeasurer {
    fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * 0.6
    }
}

/// A drawing surface the chart paints into
pub trait RenderTarget: TextMeasurer {
    fn paint_path(&mut self, path: &Path, style: &PaintStyle);

    fn paint_rect(&mut self, rect: &LayoutRect, style: &PaintStyle);

    fn paint_point(&mut self, center: LayoutPoint, radius: f64, style: &PaintStyle);

    fn paint_text(&mut self, text: &TextSpec);

    fn paint_wedge(&mut self, wedge: &Wedge, style: &PaintStyle) {
        self.paint_path(&wedge.path(), style);
    }
}

/// A render primitive for chart elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChartRenderPrimitive {
    /// A rectangle
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    /// A circle
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    /// A path (SVG path data)
    Path {
        d: String,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    /// Text
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: String,
        anchor: TextAnchor,
        baseline: TextBaseline,
        rotation: f64,
    },
}

fn css(color: Option<Color>) -> Option<String> {
    color.map(|c| c.to_css())
}

fn stroke_width(style: &PaintStyle) -> Option<f64> {
    style.stroke.map(|_| style.stroke_width)
}

/// Collects primitives for a front end to draw
#[derive(Debug, Default)]
pub struct PrimitiveRecorder<M = ApproximateTextMeasurer> {
    measurer: M,
    pub primitives: Vec<ChartRenderPrimitive>,
}

impl PrimitiveRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasurer> PrimitiveRecorder<M> {
    pub fn with_measurer(measurer: M) -> Self {
        Self {
            measurer,
            primitives: Vec::new(),
        }
    }

    /// Primitives as a JSON array
    pub fn to_json(&self) -> crate::ChartResult<String> {
        Ok(serde_json::to_string(&self.primitives)?)
    }
}

impl<M: TextMeasurer> TextMeasurer for PrimitiveRecorder<M> {
    fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        self.measurer.measure_text(text, font_size)
    }
}

impl<M: TextMeasurer> RenderTarget for PrimitiveRecorder<M> {
    fn paint_path(&mut self, path: &Path, style: &PaintStyle) {
        self.primitives.push(ChartRenderPrimitive::Path {
            d: path.to_svg_data(),
            fill: css(style.fill),
            stroke: css(style.stroke),
            stroke_width: stroke_width(style),
        });
    }

    fn paint_rect(&mut self, rect: &LayoutRect, style: &PaintStyle) {
        self.primitives.push(ChartRenderPrimitive::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: css(style.fill),
            stroke: css(style.stroke),
            stroke_width: stroke_width(style),
        });
    }

    fn paint_point(&mut self, center: LayoutPoint, radius: f64, style: &PaintStyle) {
        self.primitives.push(ChartRenderPrimitive::Circle {
            cx: center.x,
            cy: center.y,
            r: radius,
            fill: css(style.fill),
            stroke: css(style.stroke),
            stroke_width: stroke_width(style),
        });
    }

    fn paint_text(&mut self, text: &TextSpec) {
        self.primitives.push(ChartRenderPrimitive::Text {
            x: text.position.x,
            y: text.position.y,
            text: text.text.clone(),
            font_size: text.font_size,
            fill: text.color.to_css(),
            anchor: text.anchor,
            baseline: text.baseline,
            rotation: text.rotation,
        });
    }
}

/// Writes an SVG document
#[derive(Debug)]
pub struct SvgTarget<M = ApproximateTextMeasurer> {
    width: f64,
    height: f64,
    font_family: String,
    measurer: M,
    body: String,
}

impl SvgTarget {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_measurer(width, height, ApproximateTextMeasurer)
    }
}

impl<M: TextMeasurer> SvgTarget<M> {
    pub fn with_measurer(width: f64, height: f64, measurer: M) -> Self {
        Self {
            width,
            height,
            font_family: "sans-serif".to_string(),
            measurer,
            body: String::new(),
        }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Close the document and return it
    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        ) + "\n"
            + &self.body
            + "</svg>"
    }

    fn push_style(&mut self, style: &PaintStyle) {
        let fill = style.fill.map(|c| c.to_css());
        self.body
            .push_str(&format!(r#" fill="{}""#, fill.as_deref().unwrap_or("none")));
        if let Some(stroke) = style.stroke {
            self.body.push_str(&format!(
                r#" stroke="{}" stroke-width="{}""#,
                stroke.to_css(),
                style.stroke_width
            ));
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl<M: TextMeasurer> TextMeasurer for SvgTarget<M> {
    fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        self.measurer.measure_text(text, font_size)
    }
}

impl<M: TextMeasurer> RenderTarget for SvgTarget<M> {
    fn paint_path(&mut self, path: &Path, style: &PaintStyle) {
        self.body
            .push_str(&format!(r#"<path d="{}""#, path.to_svg_data()));
        self.push_style(style);
        if path.is_point() {
            self.body.push_str(r#" stroke-linecap="round""#);
        }
        self.body.push_str("/>\n");
    }

    fn paint_rect(&mut self, rect: &LayoutRect, style: &PaintStyle) {
        self.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            rect.x, rect.y, rect.width, rect.height
        ));
        self.push_style(style);
        self.body.push_str("/>\n");
    }

    fn paint_point(&mut self, center: LayoutPoint, radius: f64, style: &PaintStyle) {
        self.body.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}""#,
            center.x, center.y, radius
        ));
        self.push_style(style);
        self.body.push_str("/>\n");
    }

    fn paint_text(&mut self, text: &TextSpec) {
        let anchor = match text.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let baseline = match text.baseline {
            TextBaseline::Top => "hanging",
            TextBaseline::Middle => "middle",
            TextBaseline::Bottom => "text-bottom",
            TextBaseline::Alphabetic => "alphabetic",
        };
        self.body.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="{}" font-family="{}" fill="{}" text-anchor="{}" dominant-baseline="{}""#,
            text.position.x,
            text.position.y,
            text.font_size,
            escape_xml(&self.font_family),
            text.color.to_css(),
            anchor,
            baseline
        ));
        if text.rotation != 0.0 {
            self.body.push_str(&format!(
                r#" transform="rotate({} {} {})""#,
                text.rotation, text.position.x, text.position.y
            ));
        }
        self.body
            .push_str(&format!(">{}</text>\n", escape_xml(&text.text)));
    }
}
