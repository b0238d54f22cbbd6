//! Chart layout calculations
//!
//! A layout pass validates the chart and its data, builds the scale, then
//! dispatches on the chart kind to produce per-series geometry. Nothing is
//! returned unless every step succeeds.

use crate::arc::{ArcLayoutEngine, Wedge};
use crate::axis::{category_axis, nice_step, value_axis, CategoryAxisLayout, ValueAxisLayout};
use crate::bar::{bar_count_per_column, BarAccumulator, BarLayoutEngine, BarRect};
use crate::error::{ChartError, ChartResult};
use crate::geometry::{LayoutPoint, LayoutRect};
use crate::interaction::{ChartState, FocusInfo};
use crate::legend::{layout_legend, LegendItem, LegendLayout};
use crate::model::*;
use crate::path::{Path, PathBuilder, PathRun, PlotPoint, Smoothing};
use crate::options::{ChartConfig, ChartOptions, CurveStyle, Direction};
use crate::render::{PaintStyle, RenderTarget, TextAnchor, TextBaseline, TextMeasurer, TextSpec};
use crate::scale::{category_order, ColumnMode, ScaleMapper};
use serde::{Deserialize, Serialize};

/// Resolved drawing style of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: Color,
    pub stroke_width: f64,
    /// Area or wedge fill
    pub fill: Option<Color>,
}

/// Geometry of a line series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    /// Gap-free runs with resolved curve controls
    pub runs: Vec<PathRun>,
    /// One stroke per run
    pub strokes: Vec<Path>,
    /// One closed region per run when the line is filled
    pub fills: Vec<Path>,
    /// Points drawn as markers
    pub markers: Vec<PlotPoint>,
    pub point_radius: f64,
}

/// Shapes produced for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesShapes {
    Line(LineGeometry),
    Bars(Vec<BarRect>),
    Wedge(Wedge),
}

/// Geometry for one visible series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGeometry {
    pub id: String,
    pub title: String,
    /// Declaration index in the dataset
    pub index: usize,
    pub kind: SeriesKind,
    pub style: SeriesStyle,
    pub shapes: SeriesShapes,
}

/// Complete geometry of one render pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub kind: ChartKind,
    pub width: f64,
    pub height: f64,
    pub plot_area: LayoutRect,
    /// Present for charts with axes
    pub scale: Option<ScaleMapper>,
    /// Column index at each display position
    pub order: Vec<usize>,
    pub value_axis: Option<ValueAxisLayout>,
    pub category_axis: Option<CategoryAxisLayout>,
    /// Visible series in declaration order
    pub series: Vec<SeriesGeometry>,
    pub legend: Option<LegendLayout>,
    pub selected_column: Option<usize>,
    pub focus: Option<FocusInfo>,
    pub direction: Direction,
    pub label_font_size: f64,
    pub text_color: Color,
    pub gridline_color: Color,
}

/// Measures text through a render target
struct TargetMeasurer<'a>(&'a dyn RenderTarget);

impl TextMeasurer for TargetMeasurer<'_> {
    fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        self.0.measure_text(text, font_size)
    }
}

/// Lays out charts of one kind with one set of options
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEngine {
    kind: ChartKind,
    options: ChartOptions,
}

impl ChartEngine {
    /// Normalize and validate `options` for `kind`
    pub fn new(kind: ChartKind, options: ChartOptions) -> ChartResult<Self> {
        let options = options.normalized(kind);
        options.validate()?;
        Ok(Self { kind, options })
    }

    pub fn from_config(config: ChartConfig) -> ChartResult<Self> {
        Self::new(config.kind, config.options)
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Options after normalization
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Lay out `data` on a `width` x `height` surface
    pub fn layout(
        &self,
        data: &Dataset,
        width: f64,
        height: f64,
        state: &ChartState,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<ChartGeometry> {
        tracing::debug!(
            chart = %self.kind,
            series = data.series.len(),
            columns = data.column_count(),
            width,
            height,
            "chart layout started"
        );
        self.validate(data, width, height)?;

        let mut geometry = self.layout_start(data, width, height, state, measurer)?;
        self.layout_series(data, state, &mut geometry)?;
        self.layout_end(data, state, &mut geometry);

        tracing::debug!(
            chart = %self.kind,
            visible = geometry.series.len(),
            "chart layout finished"
        );
        Ok(geometry)
    }

    /// Lay out and paint onto `target`
    pub fn render(
        &self,
        data: &Dataset,
        width: f64,
        height: f64,
        state: &ChartState,
        target: &mut dyn RenderTarget,
    ) -> ChartResult<ChartGeometry> {
        let geometry = self.layout(data, width, height, state, &TargetMeasurer(&*target))?;
        geometry.paint(target);
        Ok(geometry)
    }

    fn validate(&self, data: &Dataset, width: f64, height: f64) -> ChartResult<()> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "surface size must be positive, got {width}x{height}"
            )));
        }
        data.check_unique_ids()?;

        let columns = data.column_count();
        for series in &data.series {
            let kind = series.effective_kind(self.kind);
            if !self.kind.accepts(kind) {
                return Err(ChartError::SeriesTypeMismatch {
                    series: series.id.clone(),
                    chart: self.kind.to_string(),
                });
            }

            match (&series.values, self.kind.is_radial()) {
                (SeriesValues::Sequence(values), false) => {
                    if values.len() != columns {
                        return Err(ChartError::DataShape {
                            series: series.id.clone(),
                            expected: columns,
                            actual: values.len(),
                        });
                    }
                    if values.iter().flatten().any(|v| !v.is_finite()) {
                        return Err(ChartError::InvalidData(format!(
                            "series '{}' contains a non-finite value",
                            series.id
                        )));
                    }
                }
                (SeriesValues::Scalar(_), true) => {}
                (SeriesValues::Scalar(_), false) => {
                    return Err(ChartError::InvalidData(format!(
                        "series '{}' needs one value per column",
                        series.id
                    )));
                }
                (SeriesValues::Sequence(_), true) => {
                    return Err(ChartError::InvalidData(format!(
                        "series '{}' needs a single value on a {} chart",
                        series.id, self.kind
                    )));
                }
            }
        }
        Ok(())
    }

    /// Axis bounds from options, falling back to the data
    ///
    /// Stacked bars contribute their stack extents, measured from the value
    /// the stacks grow from.
    pub fn value_range(&self, data: &Dataset) -> (f64, f64) {
        let options = &self.options;
        let present: Vec<f64> = data.series.iter().flat_map(|s| s.values.present()).collect();
        let mut data_min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let mut data_max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut stack_extent = None;
        if options.bar_stacked {
            let columns = data.column_count();
            let (mut above, mut below) = (vec![0.0; columns], vec![0.0; columns]);
            for series in &data.series {
                if series.effective_kind(self.kind) != SeriesKind::Bar {
                    continue;
                }
                if let SeriesValues::Sequence(values) = &series.values {
                    for (column, value) in values.iter().enumerate().take(columns) {
                        match value {
                            Some(v) if *v < 0.0 => below[column] += v,
                            Some(v) => above[column] += v,
                            None => {}
                        }
                    }
                }
            }
            let highest = above.into_iter().fold(0.0, f64::max);
            let lowest = below.into_iter().fold(0.0, f64::min);
            data_min = data_min.min(lowest);
            stack_extent = Some(highest);
        }

        let min = options
            .min_value
            .unwrap_or(if data_min.is_finite() { data_min.min(0.0) } else { 0.0 });
        if let Some(highest) = stack_extent {
            let base = match options.max_value {
                Some(max) if max >= min => 0.0_f64.clamp(min, max),
                _ => min.max(0.0),
            };
            data_max = data_max.max(base + highest);
        }
        let max = options
            .max_value
            .unwrap_or(if data_max.is_finite() { data_max } else { min });
        (min, max)
    }

    fn style_for(&self, series: &Series, index: usize, kind: SeriesKind) -> SeriesStyle {
        let options = &self.options;
        let color = series
            .overrides
            .color
            .unwrap_or_else(|| options.palette_color(index));
        let fill = match kind {
            SeriesKind::Line => series
                .overrides
                .fill
                .unwrap_or(options.line_chart_filled)
                .then(|| color.with_opacity(options.fill_opacity)),
            SeriesKind::Bar => Some(color),
            SeriesKind::Pie | SeriesKind::Donut => Some(color.with_opacity(options.pie_fill_opacity)),
        };
        SeriesStyle {
            color,
            stroke_width: series.overrides.stroke_width.unwrap_or(options.line_width),
            fill,
        }
    }

    fn layout_start(
        &self,
        data: &Dataset,
        width: f64,
        height: f64,
        state: &ChartState,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<ChartGeometry> {
        let options = &self.options;
        let mut plot_area =
            ScaleMapper::plot_area(width, height, &options.padding, options.direction);

        let legend = options.show_legend.then(|| {
            let items: Vec<LegendItem> = data
                .series
                .iter()
                .enumerate()
                .map(|(index, series)| LegendItem {
                    series_id: series.id.clone(),
                    title: series.title.clone(),
                    color: self.style_for(series, index, series.effective_kind(self.kind)).color,
                    hidden: state.is_hidden(&series.id),
                })
                .collect();
            layout_legend(
                &items,
                width,
                plot_area.y,
                options.legend_font_size,
                options.direction,
                measurer,
            )
        });
        if let Some(ref legend) = legend {
            let row = LegendLayout::row_height(legend.font_size);
            plot_area = plot_area.inset_sides(row, 0.0, 0.0, 0.0);
        }
        if plot_area.width <= 0.0 || plot_area.height <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "padding leaves no plot area on a {width}x{height} surface"
            )));
        }

        let mut geometry = ChartGeometry {
            kind: self.kind,
            width,
            height,
            plot_area,
            scale: None,
            order: Vec::new(),
            value_axis: None,
            category_axis: None,
            series: Vec::new(),
            legend,
            selected_column: None,
            focus: None,
            direction: options.direction,
            label_font_size: options.label_font_size,
            text_color: options.text_color,
            gridline_color: options.gridline_color,
        };

        if self.kind.has_axes() {
            let (min, max) = self.value_range(data);
            let mode = if options.grid_columns {
                ColumnMode::Slots
            } else {
                ColumnMode::Points
            };
            let scale = ScaleMapper::new(plot_area, min, max, data.column_count(), mode)?;
            let order = category_order(data.column_count(), options.direction);

            let grid_step = options.y_axis_step.unwrap_or_else(|| nice_step(max - min));
            let label_step = options.y_axis_label_step.unwrap_or(grid_step);
            geometry.value_axis = Some(value_axis(&scale, grid_step, label_step, options)?);
            geometry.category_axis = Some(category_axis(&scale, &order, &data.columns, options));
            geometry.scale = Some(scale);
            geometry.order = order;
        }
        Ok(geometry)
    }

    fn layout_series(
        &self,
        data: &Dataset,
        state: &ChartState,
        geometry: &mut ChartGeometry,
    ) -> ChartResult<()> {
        let visible: Vec<(usize, &Series)> = data
            .series
            .iter()
            .enumerate()
            .filter(|(_, s)| !state.is_hidden(&s.id))
            .collect();

        match self.kind {
            ChartKind::Line | ChartKind::Bar | ChartKind::LineAndBar => {
                let Some(scale) = geometry.scale else {
                    return Err(ChartError::InvalidConfig(format!(
                        "{} chart has no scale",
                        self.kind
                    )));
                };
                self.layout_cartesian(&scale, &visible, geometry)
            }
            ChartKind::Pie | ChartKind::Donut => {
                if visible.is_empty() && !data.series.is_empty() {
                    tracing::debug!(chart = %self.kind, "every series hidden, no wedges to lay out");
                    return Ok(());
                }
                self.layout_radial(&visible, geometry)
            }
        }
    }

    fn layout_cartesian(
        &self,
        scale: &ScaleMapper,
        visible: &[(usize, &Series)],
        geometry: &mut ChartGeometry,
    ) -> ChartResult<()> {
        let options = &self.options;
        let order = geometry.order.clone();

        let bar_count = bar_count_per_column(
            visible.iter().map(|(_, s)| s.effective_kind(self.kind)),
            options.bar_stacked,
        );
        let bars = BarLayoutEngine::new(scale, &order, options.bar_spacing, options.bar_stacked);
        if bar_count > 0 {
            bars.check_fits(bar_count)?;
        }
        let mut acc = BarAccumulator::new(scale.column_count, bar_count, scale.baseline_value());

        for &(index, series) in visible {
            let SeriesValues::Sequence(values) = &series.values else {
                continue;
            };
            let kind = series.effective_kind(self.kind);
            let style = self.style_for(series, index, kind);

            let shapes = match kind {
                SeriesKind::Bar => {
                    let (placed, next) = bars.layout_series(values, acc);
                    acc = next;
                    SeriesShapes::Bars(placed)
                }
                _ => SeriesShapes::Line(self.line_geometry(scale, &order, series, values, &style)),
            };
            tracing::trace!(series = %series.id, kind = %kind, "series geometry built");

            geometry.series.push(SeriesGeometry {
                id: series.id.clone(),
                title: series.title.clone(),
                index,
                kind,
                style,
                shapes,
            });
        }
        Ok(())
    }

    fn line_geometry(
        &self,
        scale: &ScaleMapper,
        order: &[usize],
        series: &Series,
        values: &[Option<f64>],
        style: &SeriesStyle,
    ) -> LineGeometry {
        let options = &self.options;
        let smoothing = if series.overrides.curved.unwrap_or(options.line_curved) {
            match options.curve_style {
                CurveStyle::Quadratic => Smoothing::Quadratic,
                CurveStyle::CatmullRom => Smoothing::CatmullRom,
            }
        } else {
            Smoothing::Straight
        };

        let points: Vec<Option<PlotPoint>> = order
            .iter()
            .enumerate()
            .map(|(slot, &column)| {
                values
                    .get(column)
                    .copied()
                    .flatten()
                    .map(|value| PlotPoint::new(scale.x(slot), scale.y(value), value, column))
            })
            .collect();

        let runs = PathBuilder::new(smoothing, options.connect_null_values).build(&points);
        let strokes = runs.iter().map(PathRun::stroke_path).collect();
        let fills = if style.fill.is_some() {
            let baseline = scale.zero_line();
            runs.iter().map(|run| run.fill_path(baseline)).collect()
        } else {
            Vec::new()
        };
        let markers = runs
            .iter()
            .filter(|run| options.show_points || run.is_single_point())
            .flat_map(|run| run.points.iter().copied())
            .collect();

        LineGeometry {
            runs,
            strokes,
            fills,
            markers,
            point_radius: options.point_radius,
        }
    }

    fn layout_radial(
        &self,
        visible: &[(usize, &Series)],
        geometry: &mut ChartGeometry,
    ) -> ChartResult<()> {
        let options = &self.options;
        let plot = geometry.plot_area;
        let center = LayoutPoint::new(plot.center_x(), plot.center_y());
        let radius = options
            .pie_radius
            .unwrap_or_else(|| plot.width.min(plot.height) / 2.0);
        let engine = match self.kind {
            ChartKind::Donut => ArcLayoutEngine::donut(center, radius, options.donut_width),
            _ => ArcLayoutEngine::pie(center, radius),
        };

        let values: Vec<f64> = visible
            .iter()
            .map(|(_, s)| match s.values {
                SeriesValues::Scalar(value) => value,
                SeriesValues::Sequence(_) => 0.0,
            })
            .collect();
        let wedges = engine.layout(&values)?;

        for (&(index, series), wedge) in visible.iter().zip(wedges) {
            let kind = series.effective_kind(self.kind);
            geometry.series.push(SeriesGeometry {
                id: series.id.clone(),
                title: series.title.clone(),
                index,
                kind,
                style: self.style_for(series, index, kind),
                shapes: SeriesShapes::Wedge(wedge),
            });
        }
        Ok(())
    }

    fn layout_end(&self, data: &Dataset, state: &ChartState, geometry: &mut ChartGeometry) {
        if !self.kind.has_axes() {
            return;
        }
        let columns = data.column_count();
        geometry.selected_column = state.selected_column.filter(|&c| c < columns);
        geometry.focus = state
            .focused_column
            .filter(|&c| c < columns)
            .and_then(|column| geometry.focus_column(column));
    }
}

impl ChartGeometry {
    /// Paint gridlines, axis labels, series, then the legend
    pub fn paint(&self, target: &mut dyn RenderTarget) {
        let plot = self.plot_area;
        let grid = PaintStyle::stroke(self.gridline_color, 1.0);

        if let Some(ref axis) = self.value_axis {
            for line in &axis.gridlines {
                let mut path = Path::new();
                path.move_to(LayoutPoint::new(plot.x, line.y))
                    .line_to(LayoutPoint::new(plot.right(), line.y));
                target.paint_path(&path, &grid);
            }
        }
        if let Some(ref axis) = self.category_axis {
            for line in &axis.gridlines {
                let mut path = Path::new();
                path.move_to(LayoutPoint::new(line.x, plot.y))
                    .line_to(LayoutPoint::new(line.x, plot.bottom()));
                target.paint_path(&path, &grid);
            }
        }

        if let Some(ref axis) = self.value_axis {
            for label in &axis.labels {
                target.paint_text(&TextSpec {
                    position: LayoutPoint::new(label.x, label.y),
                    text: label.text.clone(),
                    font_size: self.label_font_size,
                    color: self.text_color,
                    anchor: label.anchor,
                    baseline: TextBaseline::Middle,
                    rotation: 0.0,
                });
            }
        }
        if let Some(ref axis) = self.category_axis {
            for label in &axis.labels {
                target.paint_text(&TextSpec {
                    position: LayoutPoint::new(label.x, label.y),
                    text: label.text.clone(),
                    font_size: self.label_font_size,
                    color: self.text_color,
                    anchor: label.anchor,
                    baseline: TextBaseline::Alphabetic,
                    rotation: label.rotation,
                });
            }
        }

        if let Some(column) = self.selected_column {
            if let Some(region) = self
                .category_axis
                .as_ref()
                .and_then(|axis| axis.hit_regions.iter().find(|r| r.column == column))
            {
                let highlight = PaintStyle::fill(self.gridline_color.with_opacity(0.5));
                target.paint_rect(&region.bounds, &highlight);
            }
        }

        for series in &self.series {
            paint_series(series, target);
        }

        if let Some(ref legend) = self.legend {
            for entry in &legend.entries {
                let (swatch, text) = if entry.hidden {
                    (Color::GRAY, Color::GRAY)
                } else {
                    (entry.color, self.text_color)
                };
                target.paint_rect(&entry.swatch, &PaintStyle::fill(swatch));
                target.paint_text(&TextSpec {
                    position: entry.text_position,
                    text: entry.text.clone(),
                    font_size: legend.font_size,
                    color: text,
                    anchor: match self.direction {
                        Direction::Ltr => TextAnchor::Start,
                        Direction::Rtl => TextAnchor::End,
                    },
                    baseline: TextBaseline::Middle,
                    rotation: 0.0,
                });
            }
        }
    }
}

fn paint_series(series: &SeriesGeometry, target: &mut dyn RenderTarget) {
    let style = &series.style;
    match &series.shapes {
        SeriesShapes::Line(line) => {
            if let Some(fill) = style.fill {
                for path in &line.fills {
                    target.paint_path(path, &PaintStyle::fill(fill));
                }
            }
            let stroke = PaintStyle::stroke(style.color, style.stroke_width);
            for path in line.strokes.iter().filter(|p| !p.is_point()) {
                target.paint_path(path, &stroke);
            }
            for point in &line.markers {
                let marker = PaintStyle::fill(style.color);
                target.paint_point(point.position(), line.point_radius, &marker);
            }
        }
        SeriesShapes::Bars(bars) => {
            let fill = PaintStyle::fill(style.fill.unwrap_or(style.color));
            for bar in bars {
                target.paint_rect(&bar.bounds, &fill);
            }
        }
        SeriesShapes::Wedge(wedge) => {
            let fill = PaintStyle::fill(style.fill.unwrap_or(style.color));
            target.paint_wedge(wedge, &fill);
        }
    }
}
