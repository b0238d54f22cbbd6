//! Bar placement
//!
//! Computes grouped (side-by-side) and stacked bar rectangles. State that
//! spans series within one render travels in a `BarAccumulator` value that
//! each call consumes and hands back.
//!
//! Stacks start at the baseline value. Non-negative values stack upward from
//! it and negative values stack downward, each side keeping its own running
//! edge per column.

use crate::error::{ChartError, ChartResult};
use crate::geometry::LayoutRect;
use crate::model::SeriesKind;
use crate::scale::ScaleMapper;
use serde::{Deserialize, Serialize};

/// Number of bars that share one column
///
/// Stacked bars always occupy a single bar position.
pub fn bar_count_per_column(kinds: impl IntoIterator<Item = SeriesKind>, stacked: bool) -> usize {
    let count = kinds.into_iter().filter(|k| *k == SeriesKind::Bar).count();
    if stacked {
        count.min(1)
    } else {
        count
    }
}

/// Per-render bar state threaded through successive series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarAccumulator {
    /// Top of the non-negative stack per column, in value units
    pub stack_tops: Vec<f64>,
    /// Bottom of the negative stack per column, in value units
    pub stack_bottoms: Vec<f64>,
    /// Position of the next bar within its column group
    pub current_bar_index: usize,
    pub bar_count_per_column: usize,
}

impl BarAccumulator {
    pub fn new(column_count: usize, bar_count_per_column: usize, stack_base: f64) -> Self {
        Self {
            stack_tops: vec![stack_base; column_count],
            stack_bottoms: vec![stack_base; column_count],
            current_bar_index: 0,
            bar_count_per_column,
        }
    }
}

/// A placed bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRect {
    pub bounds: LayoutRect,
    /// Column index in the dataset
    pub column: usize,
    pub value: f64,
    /// Value the bar starts from (baseline or stack top below it)
    pub base: f64,
}

/// Places bars for one render pass
#[derive(Debug, Clone, Copy)]
pub struct BarLayoutEngine<'a> {
    scale: &'a ScaleMapper,
    /// Column index at each display position
    order: &'a [usize],
    spacing: f64,
    stacked: bool,
}

impl<'a> BarLayoutEngine<'a> {
    pub fn new(scale: &'a ScaleMapper, order: &'a [usize], spacing: f64, stacked: bool) -> Self {
        Self {
            scale,
            order,
            spacing,
            stacked,
        }
    }

    /// Width of one bar when `bar_count` bars share a column
    pub fn bar_width(&self, bar_count: usize) -> f64 {
        let count = bar_count.max(1) as f64;
        (self.scale.column_width - self.spacing * (count + 1.0)) / count
    }

    /// Reject spacing that leaves no room for the bars
    pub fn check_fits(&self, bar_count: usize) -> ChartResult<()> {
        let width = self.bar_width(bar_count);
        if width < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "barSpacing {} leaves no room for {} bars in a {:.2}px column",
                self.spacing, bar_count, self.scale.column_width
            )));
        }
        Ok(())
    }

    /// Place the bars of one series, returning them with the advanced state
    pub fn layout_series(
        &self,
        values: &[Option<f64>],
        mut acc: BarAccumulator,
    ) -> (Vec<BarRect>, BarAccumulator) {
        let bar_width = self.bar_width(acc.bar_count_per_column);
        let index = if self.stacked { 0 } else { acc.current_bar_index };
        let offset = self.spacing * (index as f64 + 1.0) + bar_width * index as f64;

        let mut bars = Vec::with_capacity(values.len());
        for (slot, &column) in self.order.iter().enumerate() {
            let Some(value) = values.get(column).copied().flatten() else {
                continue;
            };
            let x = self.scale.column_start(slot) + offset;

            let bar = if self.stacked {
                let edge = if value < 0.0 {
                    &mut acc.stack_bottoms[column]
                } else {
                    &mut acc.stack_tops[column]
                };
                let base = *edge;
                let top = base + value;
                *edge = top;
                BarRect {
                    bounds: LayoutRect::from_vertical_span(
                        x,
                        bar_width,
                        self.scale.y(base),
                        self.scale.y(top),
                    ),
                    column,
                    value,
                    base,
                }
            } else {
                BarRect {
                    bounds: LayoutRect::from_vertical_span(
                        x,
                        bar_width,
                        self.scale.zero_line(),
                        self.scale.y(value),
                    ),
                    column,
                    value,
                    base: self.scale.baseline_value(),
                }
            };
            bars.push(bar);
        }

        if !self.stacked {
            acc.current_bar_index += 1;
        }
        (bars, acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ColumnMode;
    use proptest::prelude::*;

    fn scale(min: f64, max: f64, columns: usize) -> ScaleMapper {
        ScaleMapper::new(
            LayoutRect::new(0.0, 0.0, 300.0, 100.0),
            min,
            max,
            columns,
            ColumnMode::Slots,
        )
        .unwrap()
    }

    #[test]
    fn test_bar_count_prepass() {
        let kinds = [SeriesKind::Bar, SeriesKind::Line, SeriesKind::Bar];
        assert_eq!(bar_count_per_column(kinds, false), 2);
        assert_eq!(bar_count_per_column(kinds, true), 1);
        assert_eq!(bar_count_per_column([SeriesKind::Line], true), 0);
    }

    #[test]
    fn test_grouped_bars_side_by_side() {
        let scale = scale(0.0, 10.0, 3);
        let order = [0, 1, 2];
        let engine = BarLayoutEngine::new(&scale, &order, 4.0, false);
        let acc = BarAccumulator::new(3, 2, 0.0);

        let (first, acc) = engine.layout_series(&[Some(5.0), Some(10.0), Some(0.0)], acc);
        let (second, acc) = engine.layout_series(&[Some(2.0), None, Some(1.0)], acc);

        assert_eq!(acc.current_bar_index, 2);
        // column width 100, bar width (100 - 12) / 2 = 44
        assert_eq!(first[0].bounds, LayoutRect::new(4.0, 50.0, 44.0, 50.0));
        assert_eq!(second[0].bounds.x, 52.0);
        assert_eq!(first[1].bounds.x, 104.0);
        // zero value draws a zero-height bar at the baseline
        assert_eq!(first[2].bounds.height, 0.0);
        assert_eq!(first[2].bounds.y, 100.0);
        // null value is skipped
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].column, 2);
    }

    #[test]
    fn test_negative_bar_hangs_below_zero() {
        let scale = scale(-10.0, 10.0, 1);
        let order = [0];
        let engine = BarLayoutEngine::new(&scale, &order, 0.0, false);
        let (bars, _) = engine.layout_series(&[Some(-5.0)], BarAccumulator::new(1, 1, -10.0));
        assert_eq!(bars[0].bounds.y, 50.0);
        assert_eq!(bars[0].bounds.height, 25.0);
    }

    #[test]
    fn test_stacked_bars_cover_total() {
        let scale = scale(0.0, 10.0, 1);
        let order = [0];
        let engine = BarLayoutEngine::new(&scale, &order, 2.0, true);
        let mut acc = BarAccumulator::new(1, 1, 0.0);
        let mut bars = Vec::new();
        for value in [3.0, 5.0, 2.0] {
            let (placed, next) = engine.layout_series(&[Some(value)], acc);
            bars.extend(placed);
            acc = next;
        }

        assert_eq!(acc.stack_tops, vec![10.0]);
        assert_eq!(acc.stack_bottoms, vec![0.0]);
        assert_eq!(acc.current_bar_index, 0);
        // each bar sits directly on the one below it
        assert!((bars[0].bounds.bottom() - 100.0).abs() < 1e-9);
        assert!((bars[1].bounds.bottom() - bars[0].bounds.y).abs() < 1e-9);
        assert!((bars[2].bounds.bottom() - bars[1].bounds.y).abs() < 1e-9);
        assert!(bars[2].bounds.y.abs() < 1e-9);
        let total: f64 = bars.iter().map(|b| b.bounds.height).sum();
        assert!((total - scale.pixel_span(10.0)).abs() < 1e-9);
        assert!(bars.iter().all(|b| b.bounds.x == 2.0 && b.bounds.width == 296.0));
    }

    #[test]
    fn test_stacked_negative_values_grow_downward() {
        let scale = scale(-10.0, 10.0, 1);
        let order = [0];
        let engine = BarLayoutEngine::new(&scale, &order, 0.0, true);
        let mut acc = BarAccumulator::new(1, 1, scale.baseline_value());
        let mut bars = Vec::new();
        for value in [4.0, -5.0, 3.0, -2.0] {
            let (placed, next) = engine.layout_series(&[Some(value)], acc);
            bars.extend(placed);
            acc = next;
        }

        assert_eq!(acc.stack_tops, vec![7.0]);
        assert_eq!(acc.stack_bottoms, vec![-7.0]);
        let bases: Vec<f64> = bars.iter().map(|b| b.base).collect();
        assert_eq!(bases, vec![0.0, 0.0, 4.0, -5.0]);
        // zero line at y = 50, 5 px per unit
        assert_eq!(bars[1].bounds, LayoutRect::new(0.0, 50.0, 300.0, 25.0));
        assert_eq!(bars[3].bounds, LayoutRect::new(0.0, 75.0, 300.0, 10.0));
        assert_eq!(bars[2].bounds, LayoutRect::new(0.0, 15.0, 300.0, 15.0));
    }

    #[test]
    fn test_rtl_order_places_first_column_last() {
        let scale = scale(0.0, 10.0, 3);
        let order = [2, 1, 0];
        let engine = BarLayoutEngine::new(&scale, &order, 0.0, false);
        let (bars, _) =
            engine.layout_series(&[Some(1.0), Some(2.0), Some(3.0)], BarAccumulator::new(3, 1, 0.0));
        let column0 = bars.iter().find(|b| b.column == 0).unwrap();
        assert_eq!(column0.bounds.x, 200.0);
    }

    #[test]
    fn test_check_fits() {
        let scale = scale(0.0, 10.0, 3);
        let order = [0, 1, 2];
        assert!(BarLayoutEngine::new(&scale, &order, 10.0, false).check_fits(3).is_ok());
        assert!(BarLayoutEngine::new(&scale, &order, 30.0, false).check_fits(3).is_err());
    }

    proptest! {
        #[test]
        fn prop_grouped_widths_fill_column(
            columns in 1usize..20,
            bars in 1usize..8,
            spacing in 0.0f64..4.0,
        ) {
            let scale = scale(0.0, 1.0, columns);
            let order: Vec<usize> = (0..columns).collect();
            let engine = BarLayoutEngine::new(&scale, &order, spacing, false);
            prop_assume!(engine.bar_width(bars) >= 0.0);
            let filled = bars as f64 * (engine.bar_width(bars) + spacing) + spacing;
            prop_assert!((filled - scale.column_width).abs() < 1e-9);
        }
    }
}
