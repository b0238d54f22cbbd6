//! Value and category scale
//!
//! Maps a data value and a column position to pixel coordinates. Both line
//! and bar geometry are computed through the same mapper.

use crate::error::{ChartError, ChartResult};
use crate::geometry::LayoutRect;
use crate::options::{Direction, Padding};
use serde::{Deserialize, Serialize};

/// How categories occupy the horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnMode {
    /// Equal-width slots; a category sits at the slot center
    Slots,
    /// Zero-width positions; the first and last category touch the plot edges
    Points,
}

/// Pixel transform for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMapper {
    /// Plot area inside the padding
    pub plot: LayoutRect,
    pub min_value: f64,
    pub max_value: f64,
    pub column_count: usize,
    pub mode: ColumnMode,
    /// Horizontal distance between neighbouring categories
    pub column_width: f64,
    /// Pixels per value unit
    pub value_to_pixel_height: f64,
}

impl ScaleMapper {
    /// Plot area left after removing padding from a `width` x `height` surface
    pub fn plot_area(width: f64, height: f64, padding: &Padding, direction: Direction) -> LayoutRect {
        LayoutRect::new(0.0, 0.0, width, height).inset_sides(
            padding.top,
            padding.right(direction),
            padding.bottom,
            padding.left(direction),
        )
    }

    /// Build a mapper, rejecting inputs that would divide by zero
    pub fn new(
        plot: LayoutRect,
        min_value: f64,
        max_value: f64,
        column_count: usize,
        mode: ColumnMode,
    ) -> ChartResult<Self> {
        if !(min_value.is_finite() && max_value.is_finite()) || max_value <= min_value {
            return Err(ChartError::DegenerateRange {
                min: min_value,
                max: max_value,
            });
        }

        let column_width = match mode {
            ColumnMode::Slots => {
                if column_count == 0 {
                    return Err(ChartError::TooFewColumns {
                        required: 1,
                        actual: 0,
                    });
                }
                plot.width / column_count as f64
            }
            ColumnMode::Points => {
                if column_count < 2 {
                    return Err(ChartError::TooFewColumns {
                        required: 2,
                        actual: column_count,
                    });
                }
                plot.width / (column_count - 1) as f64
            }
        };

        Ok(Self {
            plot,
            min_value,
            max_value,
            column_count,
            mode,
            column_width,
            value_to_pixel_height: plot.height / (max_value - min_value),
        })
    }

    /// Pixel X of the category drawn at display position `slot`
    pub fn x(&self, slot: usize) -> f64 {
        let x = self.plot.x + slot as f64 * self.column_width;
        match self.mode {
            ColumnMode::Slots => x + self.column_width / 2.0,
            ColumnMode::Points => x,
        }
    }

    /// Left edge of the column region around display position `slot`
    pub fn column_start(&self, slot: usize) -> f64 {
        match self.mode {
            ColumnMode::Slots => self.plot.x + slot as f64 * self.column_width,
            ColumnMode::Points => self.x(slot) - self.column_width / 2.0,
        }
    }

    /// Pixel Y of `value`
    pub fn y(&self, value: f64) -> f64 {
        self.plot.y + self.plot.height - (value - self.min_value) * self.value_to_pixel_height
    }

    /// Value the bars grow from: zero clamped into the axis range
    pub fn baseline_value(&self) -> f64 {
        0.0_f64.clamp(self.min_value, self.max_value)
    }

    /// Pixel Y of the baseline
    pub fn zero_line(&self) -> f64 {
        self.y(self.baseline_value())
    }

    /// Pixel length of a value distance
    pub fn pixel_span(&self, delta: f64) -> f64 {
        delta * self.value_to_pixel_height
    }

    /// Nearest display position to a pixel X, clamped to the column range
    pub fn nearest_slot(&self, x: f64) -> usize {
        let offset = match self.mode {
            ColumnMode::Slots => (x - self.plot.x) / self.column_width - 0.5,
            ColumnMode::Points => (x - self.plot.x) / self.column_width,
        };
        let last = self.column_count.saturating_sub(1);
        if offset.is_nan() || offset <= 0.0 {
            0
        } else {
            (offset.round() as usize).min(last)
        }
    }
}

/// Display order of `count` categories: column index at each display position
pub fn category_order(count: usize, direction: Direction) -> Vec<usize> {
    match direction {
        Direction::Ltr => (0..count).collect(),
        Direction::Rtl => (0..count).rev().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plot() -> LayoutRect {
        LayoutRect::new(40.0, 10.0, 300.0, 200.0)
    }

    #[test]
    fn test_point_mode_endpoints() {
        let scale = ScaleMapper::new(plot(), 0.0, 100.0, 4, ColumnMode::Points).unwrap();
        assert_eq!(scale.x(0), 40.0);
        assert_eq!(scale.x(3), 340.0);
        assert_eq!(scale.column_width, 100.0);
    }

    #[test]
    fn test_slot_mode_centers() {
        let scale = ScaleMapper::new(plot(), 0.0, 100.0, 3, ColumnMode::Slots).unwrap();
        assert_eq!(scale.column_width, 100.0);
        assert_eq!(scale.x(0), 90.0);
        assert_eq!(scale.x(2), 290.0);
        assert_eq!(scale.column_start(1), 140.0);
    }

    #[test]
    fn test_y_bounds() {
        let scale = ScaleMapper::new(plot(), -50.0, 150.0, 2, ColumnMode::Points).unwrap();
        assert_eq!(scale.y(-50.0), 210.0);
        assert_eq!(scale.y(150.0), 10.0);
        assert_eq!(scale.zero_line(), 160.0);
    }

    #[test]
    fn test_baseline_clamped_into_range() {
        let scale = ScaleMapper::new(plot(), 20.0, 120.0, 2, ColumnMode::Points).unwrap();
        assert_eq!(scale.baseline_value(), 20.0);
        assert_eq!(scale.zero_line(), 210.0);
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let err = ScaleMapper::new(plot(), 5.0, 5.0, 3, ColumnMode::Slots).unwrap_err();
        assert!(matches!(err, ChartError::DegenerateRange { .. }));
    }

    #[test]
    fn test_point_mode_needs_two_columns() {
        let err = ScaleMapper::new(plot(), 0.0, 1.0, 1, ColumnMode::Points).unwrap_err();
        assert!(matches!(
            err,
            ChartError::TooFewColumns {
                required: 2,
                actual: 1
            }
        ));
        assert!(ScaleMapper::new(plot(), 0.0, 1.0, 1, ColumnMode::Slots).is_ok());
        assert!(ScaleMapper::new(plot(), 0.0, 1.0, 0, ColumnMode::Slots).is_err());
    }

    #[test]
    fn test_plot_area_rtl_swaps_padding() {
        let padding = Padding::new(50.0, 10.0, 20.0, 30.0);
        let ltr = ScaleMapper::plot_area(400.0, 300.0, &padding, Direction::Ltr);
        let rtl = ScaleMapper::plot_area(400.0, 300.0, &padding, Direction::Rtl);
        assert_eq!(ltr, LayoutRect::new(50.0, 20.0, 340.0, 250.0));
        assert_eq!(rtl, LayoutRect::new(10.0, 20.0, 340.0, 250.0));
    }

    #[test]
    fn test_nearest_slot() {
        let scale = ScaleMapper::new(plot(), 0.0, 1.0, 3, ColumnMode::Slots).unwrap();
        assert_eq!(scale.nearest_slot(0.0), 0);
        assert_eq!(scale.nearest_slot(200.0), 1);
        assert_eq!(scale.nearest_slot(1000.0), 2);
    }

    #[test]
    fn test_category_order() {
        assert_eq!(category_order(3, Direction::Ltr), vec![0, 1, 2]);
        assert_eq!(category_order(3, Direction::Rtl), vec![2, 1, 0]);
    }

    proptest! {
        #[test]
        fn prop_y_strictly_decreasing(
            min in -1000.0f64..1000.0,
            span in 0.5f64..1000.0,
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            prop_assume!((a - b).abs() > 1e-6);
            let max = min + span;
            let scale = ScaleMapper::new(plot(), min, max, 2, ColumnMode::Points).unwrap();
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(scale.y(min + lo * span) > scale.y(min + hi * span));
            prop_assert!((scale.y(min) - 210.0).abs() < 1e-6);
            prop_assert!((scale.y(max) - 10.0).abs() < 1e-6);
        }

        #[test]
        fn prop_point_mode_spans_plot(count in 2usize..200) {
            let scale = ScaleMapper::new(plot(), 0.0, 1.0, count, ColumnMode::Points).unwrap();
            prop_assert_eq!(scale.x(0), 40.0);
            prop_assert!((scale.x(count - 1) - 340.0).abs() < 1e-9);
        }
    }
}
