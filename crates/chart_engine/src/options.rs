//! Chart configuration
//!
//! Options are a flat, serde-backed set of named values. Every field has a
//! default, so a partial JSON object is enough to configure a chart.

use crate::error::{ChartError, ChartResult};
use crate::model::{default_color_palette, ChartKind, Color};
use serde::{Deserialize, Serialize};

/// Reading direction of the category axis
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Smoothing algorithm used for curved lines
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CurveStyle {
    /// Two quadratic curves per segment meeting at the segment midpoint
    #[default]
    Quadratic,
    /// Uniform Catmull-Rom spline emitted as cubic curves
    CatmullRom,
}

/// Space around the plot area, in pixels
///
/// `start` and `end` follow the reading direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Padding {
    pub start: f64,
    pub end: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub const fn new(start: f64, end: f64, top: f64, bottom: f64) -> Self {
        Self {
            start,
            end,
            top,
            bottom,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Padding on the left edge for the given direction
    pub fn left(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Ltr => self.start,
            Direction::Rtl => self.end,
        }
    }

    /// Padding on the right edge for the given direction
    pub fn right(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Ltr => self.end,
            Direction::Rtl => self.start,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(50.0, 20.0, 20.0, 40.0)
    }
}

/// Options governing layout and styling of a chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub padding: Padding,
    /// Lower bound of the value axis; derived from data when absent
    pub min_value: Option<f64>,
    /// Upper bound of the value axis; derived from data when absent
    pub max_value: Option<f64>,
    /// Draw a category gridline every n columns
    pub x_axis_step: usize,
    /// Draw a category label every n columns
    pub x_axis_label_step: usize,
    /// Value distance between gridlines; a rounded fifth of the range when absent
    pub y_axis_step: Option<f64>,
    /// Value distance between labels; follows `y_axis_step` when absent
    pub y_axis_label_step: Option<f64>,
    /// Gap between bars and at both slot edges
    pub bar_spacing: f64,
    pub bar_stacked: bool,
    pub line_curved: bool,
    pub curve_style: CurveStyle,
    pub line_chart_filled: bool,
    pub connect_null_values: bool,
    pub show_points: bool,
    pub point_radius: f64,
    pub line_width: f64,
    /// Opacity of the area under filled lines
    pub fill_opacity: f64,
    pub pie_fill_opacity: f64,
    /// Radius of pie/donut charts; fits the plot area when absent
    pub pie_radius: Option<f64>,
    /// Ring thickness of donut wedges
    pub donut_width: f64,
    pub direction: Direction,
    /// Treat columns as equal-width slots instead of points
    pub grid_columns: bool,
    pub show_legend: bool,
    pub legend_font_size: f64,
    pub show_x_axis_gridlines: bool,
    pub show_x_axis_labels: bool,
    pub show_y_axis_gridlines: bool,
    pub show_y_axis_labels: bool,
    /// Category label rotation in degrees
    pub x_axis_label_rotation: f64,
    pub label_font_size: f64,
    pub colors: Vec<Color>,
    pub gridline_color: Color,
    pub text_color: Color,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            min_value: None,
            max_value: None,
            x_axis_step: 1,
            x_axis_label_step: 1,
            y_axis_step: None,
            y_axis_label_step: None,
            bar_spacing: 4.0,
            bar_stacked: false,
            line_curved: false,
            curve_style: CurveStyle::Quadratic,
            line_chart_filled: false,
            connect_null_values: false,
            show_points: true,
            point_radius: 3.0,
            line_width: 2.0,
            fill_opacity: 0.3,
            pie_fill_opacity: 1.0,
            pie_radius: None,
            donut_width: 40.0,
            direction: Direction::Ltr,
            grid_columns: false,
            show_legend: true,
            legend_font_size: 12.0,
            show_x_axis_gridlines: true,
            show_x_axis_labels: true,
            show_y_axis_gridlines: true,
            show_y_axis_labels: true,
            x_axis_label_rotation: 0.0,
            label_font_size: 12.0,
            colors: default_color_palette(),
            gridline_color: Color::rgb(230, 230, 230),
            text_color: Color::rgb(50, 50, 50),
        }
    }
}

impl ChartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a (possibly partial) JSON object
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy of these options with chart-kind requirements applied
    pub fn normalized(&self, kind: ChartKind) -> Self {
        let mut options = self.clone();
        if kind.requires_grid_columns() && !options.grid_columns {
            tracing::warn!(
                chart = %kind,
                "grid column mode is required for bar charts, overriding gridColumns=false"
            );
            options.grid_columns = true;
        }
        options
    }

    /// Check the option invariants that do not depend on data
    pub fn validate(&self) -> ChartResult<()> {
        if self.x_axis_step < 1 {
            return Err(ChartError::InvalidConfig("xAxisStep must be at least 1".into()));
        }
        if self.x_axis_label_step < 1 {
            return Err(ChartError::InvalidConfig(
                "xAxisLabelStep must be at least 1".into(),
            ));
        }
        for (name, step) in [
            ("yAxisStep", self.y_axis_step),
            ("yAxisLabelStep", self.y_axis_label_step),
        ] {
            if let Some(step) = step {
                if !(step.is_finite() && step > 0.0) {
                    return Err(ChartError::InvalidConfig(format!(
                        "{name} must be a positive number, got {step}"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(ChartError::InvalidConfig(format!(
                    "minValue {min} is greater than maxValue {max}"
                )));
            }
        }
        for (name, value) in [
            ("barSpacing", self.bar_spacing),
            ("pointRadius", self.point_radius),
            ("lineWidth", self.line_width),
            ("donutWidth", self.donut_width),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        for (name, opacity) in [
            ("pieFillOpacity", self.pie_fill_opacity),
            ("fillOpacity", self.fill_opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be between 0 and 1, got {opacity}"
                )));
            }
        }
        if let Some(radius) = self.pie_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ChartError::InvalidConfig(format!(
                    "pieRadius must be positive, got {radius}"
                )));
            }
        }
        if self.colors.is_empty() {
            return Err(ChartError::InvalidConfig("colors must not be empty".into()));
        }
        Ok(())
    }

    /// Palette color for the series at `index`
    pub fn palette_color(&self, index: usize) -> Color {
        self.colors
            .get(index % self.colors.len().max(1))
            .copied()
            .unwrap_or(Color::GRAY)
    }
}

/// A chart kind together with its options
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub options: ChartOptions,
}

#[derive(Deserialize)]
struct RawChartConfig {
    kind: String,
    #[serde(default)]
    options: ChartOptions,
}

impl ChartConfig {
    pub fn new(kind: ChartKind, options: ChartOptions) -> Self {
        Self { kind, options }
    }

    /// Parse `{"kind": "...", "options": {...}}`
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let raw: RawChartConfig = serde_json::from_str(json)?;
        Ok(Self {
            kind: raw.kind.parse()?,
            options: raw.options,
        })
    }
}
