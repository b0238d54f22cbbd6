//! Axis gridlines, labels and column hit regions

use crate::error::{ChartError, ChartResult};
use crate::geometry::LayoutRect;
use crate::options::{ChartOptions, Direction};
use crate::render::TextAnchor;
use crate::scale::ScaleMapper;
use serde::{Deserialize, Serialize};

/// Upper bound on ticks per axis
const MAX_TICKS: usize = 10_000;

/// Gap between the plot edge and axis labels
const LABEL_GAP: f64 = 8.0;

/// Rounded step giving roughly five intervals over `range`
pub fn nice_step(range: f64) -> f64 {
    let raw_step = range / 5.0;
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    (raw_step / magnitude).ceil() * magnitude
}

/// Axis label text for a value: integers without decimals, others trimmed
pub fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        let rounded = value.round();
        // avoid "-0"
        if rounded == 0.0 {
            "0".to_string()
        } else {
            format!("{}", rounded)
        }
    } else {
        let text = format!("{:.6}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// A horizontal gridline on the value axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGridline {
    pub value: f64,
    pub y: f64,
}

/// A label on the value axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueLabel {
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: TextAnchor,
}

/// Value axis gridlines and labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueAxisLayout {
    pub gridlines: Vec<ValueGridline>,
    pub labels: Vec<ValueLabel>,
}

/// Walk the value axis with independent gridline and label steps
///
/// Both sequences start at the axis minimum and stop once past the maximum.
/// Each advances whether or not it is shown; the walk ends when both are done.
pub fn value_axis(
    scale: &ScaleMapper,
    grid_step: f64,
    label_step: f64,
    options: &ChartOptions,
) -> ChartResult<ValueAxisLayout> {
    let (min, max) = (scale.min_value, scale.max_value);
    let range = max - min;
    for (name, step) in [("yAxisStep", grid_step), ("yAxisLabelStep", label_step)] {
        if !(step.is_finite() && step > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "{name} must be a positive number, got {step}"
            )));
        }
        if range / step > MAX_TICKS as f64 {
            return Err(ChartError::InvalidConfig(format!(
                "{name} {step} produces more than {MAX_TICKS} ticks"
            )));
        }
    }

    let (label_x, anchor) = match options.direction {
        Direction::Ltr => (scale.plot.x - LABEL_GAP, TextAnchor::End),
        Direction::Rtl => (scale.plot.right() + LABEL_GAP, TextAnchor::Start),
    };
    let epsilon = range * 1e-9;
    let mut layout = ValueAxisLayout::default();
    let (mut grid_index, mut label_index) = (0usize, 0usize);

    loop {
        let grid_value = min + grid_index as f64 * grid_step;
        let label_value = min + label_index as f64 * label_step;
        let grid_live = grid_value <= max + epsilon;
        let label_live = label_value <= max + epsilon;
        if !grid_live && !label_live {
            break;
        }

        if grid_live {
            if options.show_y_axis_gridlines {
                layout.gridlines.push(ValueGridline {
                    value: grid_value,
                    y: scale.y(grid_value),
                });
            }
            grid_index += 1;
        }
        if label_live {
            if options.show_y_axis_labels {
                layout.labels.push(ValueLabel {
                    value: label_value,
                    x: label_x,
                    y: scale.y(label_value),
                    text: format_value(label_value),
                    anchor,
                });
            }
            label_index += 1;
        }
    }

    Ok(layout)
}

/// A vertical gridline at a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGridline {
    pub column: usize,
    pub x: f64,
}

/// A category label below the plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Rotation in degrees
    pub rotation: f64,
    pub anchor: TextAnchor,
}

/// Selectable region covering one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHitRegion {
    pub column: usize,
    pub bounds: LayoutRect,
}

/// Category axis gridlines, labels and hit regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxisLayout {
    pub gridlines: Vec<CategoryGridline>,
    pub labels: Vec<CategoryLabel>,
    pub hit_regions: Vec<ColumnHitRegion>,
}

/// Lay out the category axis in display order
pub fn category_axis(
    scale: &ScaleMapper,
    order: &[usize],
    columns: &[String],
    options: &ChartOptions,
) -> CategoryAxisLayout {
    let plot = scale.plot;
    let rotation = options.x_axis_label_rotation;
    let anchor = if rotation == 0.0 {
        TextAnchor::Middle
    } else {
        match options.direction {
            Direction::Ltr => TextAnchor::End,
            Direction::Rtl => TextAnchor::Start,
        }
    };
    let label_y = plot.bottom() + LABEL_GAP + options.label_font_size;

    let mut layout = CategoryAxisLayout::default();
    for (slot, &column) in order.iter().enumerate() {
        let x = scale.x(slot);

        if options.show_x_axis_gridlines && slot % options.x_axis_step.max(1) == 0 {
            layout.gridlines.push(CategoryGridline { column, x });
        }

        if options.show_x_axis_labels && slot % options.x_axis_label_step.max(1) == 0 {
            if let Some(text) = columns.get(column) {
                layout.labels.push(CategoryLabel {
                    column,
                    x,
                    y: label_y,
                    text: text.clone(),
                    rotation,
                    anchor,
                });
            }
        }

        let start = scale.column_start(slot).max(plot.x);
        let end = (scale.column_start(slot) + scale.column_width).min(plot.right());
        layout.hit_regions.push(ColumnHitRegion {
            column,
            bounds: LayoutRect::new(start, plot.y, (end - start).max(0.0), plot.height),
        });
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{category_order, ColumnMode};

    fn scale(min: f64, max: f64, columns: usize, mode: ColumnMode) -> ScaleMapper {
        ScaleMapper::new(LayoutRect::new(50.0, 20.0, 300.0, 200.0), min, max, columns, mode).unwrap()
    }

    fn labels(columns: usize) -> Vec<String> {
        (0..columns).map(|i| format!("C{i}")).collect()
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(100.0), 20.0);
        assert_eq!(nice_step(7.0), 2.0);
        assert_eq!(nice_step(50.0), 10.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(20.0), "20");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_independent_steps() {
        let scale = scale(0.0, 100.0, 2, ColumnMode::Points);
        let layout = value_axis(&scale, 10.0, 25.0, &ChartOptions::default()).unwrap();
        assert_eq!(layout.gridlines.len(), 11);
        let label_values: Vec<f64> = layout.labels.iter().map(|l| l.value).collect();
        assert_eq!(label_values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(layout.gridlines[0].y, 220.0);
        assert_eq!(layout.gridlines[10].y, 20.0);
        assert_eq!(layout.labels[1].text, "25");
    }

    #[test]
    fn test_hidden_gridlines_still_label() {
        let options = ChartOptions {
            show_y_axis_gridlines: false,
            ..Default::default()
        };
        let scale = scale(-10.0, 10.0, 2, ColumnMode::Points);
        let layout = value_axis(&scale, 5.0, 10.0, &options).unwrap();
        assert!(layout.gridlines.is_empty());
        let label_values: Vec<f64> = layout.labels.iter().map(|l| l.value).collect();
        assert_eq!(label_values, vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_step_not_dividing_range() {
        let scale = scale(0.0, 10.0, 2, ColumnMode::Points);
        let layout = value_axis(&scale, 3.0, 3.0, &ChartOptions::default()).unwrap();
        let values: Vec<f64> = layout.gridlines.iter().map(|g| g.value).collect();
        assert_eq!(values, vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_rtl_value_labels_on_right() {
        let options = ChartOptions {
            direction: Direction::Rtl,
            ..Default::default()
        };
        let scale = scale(0.0, 10.0, 2, ColumnMode::Points);
        let layout = value_axis(&scale, 5.0, 5.0, &options).unwrap();
        assert_eq!(layout.labels[0].x, 358.0);
        assert_eq!(layout.labels[0].anchor, TextAnchor::Start);
    }

    #[test]
    fn test_too_many_ticks_rejected() {
        let scale = scale(0.0, 1e9, 2, ColumnMode::Points);
        assert!(value_axis(&scale, 1.0, 1e8, &ChartOptions::default()).is_err());
    }

    #[test]
    fn test_category_steps() {
        let options = ChartOptions {
            x_axis_step: 2,
            x_axis_label_step: 3,
            ..Default::default()
        };
        let scale = scale(0.0, 1.0, 6, ColumnMode::Slots);
        let order = category_order(6, Direction::Ltr);
        let layout = category_axis(&scale, &order, &labels(6), &options);
        let grid: Vec<usize> = layout.gridlines.iter().map(|g| g.column).collect();
        let text: Vec<&str> = layout.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(grid, vec![0, 2, 4]);
        assert_eq!(text, vec!["C0", "C3"]);
        assert_eq!(layout.hit_regions.len(), 6);
        assert_eq!(layout.hit_regions[1].bounds, LayoutRect::new(100.0, 20.0, 50.0, 200.0));
    }

    #[test]
    fn test_point_mode_hit_regions_clamped() {
        let scale = scale(0.0, 1.0, 3, ColumnMode::Points);
        let order = category_order(3, Direction::Ltr);
        let layout = category_axis(&scale, &order, &labels(3), &ChartOptions::default());
        assert_eq!(layout.hit_regions[0].bounds.x, 50.0);
        assert_eq!(layout.hit_regions[0].bounds.width, 75.0);
        assert_eq!(layout.hit_regions[1].bounds.width, 150.0);
        assert_eq!(layout.hit_regions[2].bounds.right(), 350.0);
    }

    #[test]
    fn test_rotated_labels_rtl() {
        let options = ChartOptions {
            x_axis_label_rotation: -45.0,
            direction: Direction::Rtl,
            ..Default::default()
        };
        let scale = scale(0.0, 1.0, 3, ColumnMode::Slots);
        let order = category_order(3, Direction::Rtl);
        let layout = category_axis(&scale, &order, &labels(3), &options);
        assert_eq!(layout.labels[0].text, "C2");
        assert_eq!(layout.labels[0].anchor, TextAnchor::Start);
        assert_eq!(layout.labels[0].rotation, -45.0);
    }
}
