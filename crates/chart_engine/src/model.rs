//! Chart model types
//!
//! This module defines the data handed to the engine: chart kinds, named
//! series, the shared category columns, and colors.

use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Kinds of chart the engine can lay out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    /// Lines through category points
    Line,
    /// Bars in category slots
    Bar,
    /// Lines and bars sharing one set of axes
    LineAndBar,
    /// Pie wedges from scalar series
    Pie,
    /// Annulus wedges from scalar series
    Donut,
}

impl ChartKind {
    /// Whether this chart has value and category axes
    pub fn has_axes(self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Bar | ChartKind::LineAndBar)
    }

    /// Whether this chart is drawn as wedges
    pub fn is_radial(self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Donut)
    }

    /// Bar-bearing charts treat columns as slots, never as points
    pub fn requires_grid_columns(self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::LineAndBar)
    }

    /// Series kind used when a series does not name one
    pub fn default_series_kind(self) -> SeriesKind {
        match self {
            ChartKind::Line | ChartKind::LineAndBar => SeriesKind::Line,
            ChartKind::Bar => SeriesKind::Bar,
            ChartKind::Pie => SeriesKind::Pie,
            ChartKind::Donut => SeriesKind::Donut,
        }
    }

    /// Whether a series of the given kind can be drawn on this chart
    pub fn accepts(self, series: SeriesKind) -> bool {
        match self {
            ChartKind::Line => series == SeriesKind::Line,
            ChartKind::Bar => series == SeriesKind::Bar,
            ChartKind::LineAndBar => matches!(series, SeriesKind::Line | SeriesKind::Bar),
            ChartKind::Pie => series == SeriesKind::Pie,
            ChartKind::Donut => series == SeriesKind::Donut,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::LineAndBar => "lineAndBar",
            ChartKind::Pie => "pie",
            ChartKind::Donut => "donut",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "lineAndBar" | "line-and-bar" | "line_and_bar" => Ok(ChartKind::LineAndBar),
            "pie" => Ok(ChartKind::Pie),
            "donut" | "doughnut" => Ok(ChartKind::Donut),
            other => Err(ChartError::InvalidChartType(other.to_string())),
        }
    }
}

/// How a single series is drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKind {
    Line,
    Bar,
    Pie,
    Donut,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesKind::Line => "line",
            SeriesKind::Bar => "bar",
            SeriesKind::Pie => "pie",
            SeriesKind::Donut => "donut",
        };
        f.write_str(name)
    }
}

/// Values carried by a series
///
/// Line and bar series hold one optional value per column (`None` is a gap);
/// pie and donut series hold a single magnitude.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SeriesValues {
    Sequence(Vec<Option<f64>>),
    Scalar(f64),
}

impl SeriesValues {
    /// Non-null values in column order
    pub fn present(&self) -> Vec<f64> {
        match self {
            SeriesValues::Sequence(values) => values.iter().flatten().copied().collect(),
            SeriesValues::Scalar(value) => vec![*value],
        }
    }
}

/// Per-series style overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesOverrides {
    pub color: Option<Color>,
    /// Fill the area under a line
    pub fill: Option<bool>,
    pub stroke_width: Option<f64>,
    /// Smooth the line
    pub curved: Option<bool>,
}

/// A single named data series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Unique key of the series
    pub id: String,
    /// Display title (legend text)
    #[serde(default)]
    pub title: String,
    /// Series kind; falls back to the chart's default when absent
    #[serde(default)]
    pub kind: Option<SeriesKind>,
    pub values: SeriesValues,
    #[serde(default)]
    pub overrides: SeriesOverrides,
}

impl Series {
    /// Create a line/bar series from optional values
    pub fn new(id: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            kind: None,
            values: SeriesValues::Sequence(values),
            overrides: SeriesOverrides::default(),
        }
    }

    /// Create a line/bar series without gaps
    pub fn from_values(id: impl Into<String>, values: &[f64]) -> Self {
        Self::new(id, values.iter().copied().map(Some).collect())
    }

    /// Create a pie/donut series
    pub fn scalar(id: impl Into<String>, value: f64) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            kind: None,
            values: SeriesValues::Scalar(value),
            overrides: SeriesOverrides::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.overrides.color = Some(color);
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.overrides.fill = Some(fill);
        self
    }

    pub fn with_curved(mut self, curved: bool) -> Self {
        self.overrides.curved = Some(curved);
        self
    }

    /// The kind this series is drawn as on a chart of `chart` kind
    pub fn effective_kind(&self, chart: ChartKind) -> SeriesKind {
        self.kind.unwrap_or_else(|| chart.default_series_kind())
    }
}

/// Category labels plus the series drawn against them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    /// Category labels shared by every line/bar series
    #[serde(default)]
    pub columns: Vec<String>,
    /// Series in declaration (and drawing) order
    #[serde(default)]
    pub series: Vec<Series>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            series: Vec::new(),
        }
    }

    /// Parse a dataset from JSON
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.id == id)
    }

    /// Reject repeated series identifiers
    pub fn check_unique_ids(&self) -> ChartResult<()> {
        let mut seen = HashSet::new();
        for series in &self.series {
            if !seen.insert(series.id.as_str()) {
                return Err(ChartError::DuplicateSeries(series.id.clone()));
            }
        }
        Ok(())
    }
}

/// RGBA color representation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (fully opaque)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Same color at the given opacity (0.0..=1.0)
    pub fn with_opacity(&self, opacity: f64) -> Self {
        Self::rgba(self.r, self.g, self.b, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Convert to CSS color string
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Default series palette
pub fn default_color_palette() -> Vec<Color> {
    vec![
        Color::rgb(79, 129, 189),
        Color::rgb(192, 80, 77),
        Color::rgb(155, 187, 89),
        Color::rgb(128, 100, 162),
        Color::rgb(75, 172, 198),
        Color::rgb(247, 150, 70),
        Color::rgb(119, 146, 60),
        Color::rgb(166, 166, 166),
    ]
}
