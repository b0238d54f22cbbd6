//! Interaction state and hit testing
//!
//! The engine never handles input events itself. A host keeps a
//! `ChartState`, feeds it into each layout pass, and uses the hit-test
//! helpers on the resulting geometry to decide what to change.

use crate::geometry::{gradient, LayoutPoint};
use crate::layout::{ChartGeometry, SeriesShapes};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User-driven view state carried between renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartState {
    /// Ids of series toggled off through the legend
    pub hidden: BTreeSet<String>,
    pub selected_column: Option<usize>,
    pub focused_column: Option<usize>,
}

impl ChartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a series between shown and hidden, returning whether it is now hidden
    pub fn toggle_series(&mut self, id: &str) -> bool {
        if self.hidden.remove(id) {
            tracing::trace!(series = id, "series shown");
            false
        } else {
            self.hidden.insert(id.to_string());
            tracing::trace!(series = id, "series hidden");
            true
        }
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn select_column(&mut self, column: usize) {
        self.selected_column = Some(column);
    }

    pub fn clear_selection(&mut self) {
        self.selected_column = None;
    }

    pub fn focus_column(&mut self, column: Option<usize>) {
        self.focused_column = column;
    }
}

/// Value of one series at a focused column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusValue {
    pub series_id: String,
    pub value: f64,
    /// Pixel Y of the point or bar top
    pub y: f64,
}

/// Everything a focus display needs for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusInfo {
    pub column: usize,
    pub x: f64,
    /// Visible series with a value at this column, in declaration order
    pub values: Vec<FocusValue>,
}

impl ChartGeometry {
    /// Column whose hit region contains the point
    pub fn column_at(&self, x: f64, y: f64) -> Option<usize> {
        self.category_axis
            .as_ref()?
            .hit_regions
            .iter()
            .find(|region| region.bounds.contains(x, y))
            .map(|region| region.column)
    }

    /// Focus details for the column nearest to pixel X
    pub fn focus_at(&self, x: f64) -> Option<FocusInfo> {
        let scale = self.scale.as_ref()?;
        let slot = scale.nearest_slot(x);
        let column = *self.order.get(slot)?;
        self.focus_column(column)
    }

    /// Focus details for a column index
    pub fn focus_column(&self, column: usize) -> Option<FocusInfo> {
        let scale = self.scale.as_ref()?;
        let slot = self.order.iter().position(|&c| c == column)?;

        let values = self
            .series
            .iter()
            .filter_map(|series| {
                let (value, y) = match &series.shapes {
                    SeriesShapes::Line(line) => line
                        .runs
                        .iter()
                        .flat_map(|run| run.points.iter())
                        .find(|p| p.column == column)
                        .map(|p| (p.value, p.y))?,
                    SeriesShapes::Bars(bars) => bars
                        .iter()
                        .find(|b| b.column == column)
                        .map(|b| (b.value, b.bounds.y))?,
                    SeriesShapes::Wedge(_) => return None,
                };
                Some(FocusValue {
                    series_id: series.id.clone(),
                    value,
                    y,
                })
            })
            .collect();

        Some(FocusInfo {
            column,
            x: scale.x(slot),
            values,
        })
    }

    /// Pixel Y of a line series at pixel X, following its straight segments
    ///
    /// Returns `None` outside the series' runs or inside a gap.
    pub fn interpolate_y(&self, series_id: &str, x: f64) -> Option<f64> {
        let series = self.series.iter().find(|s| s.id == series_id)?;
        let SeriesShapes::Line(line) = &series.shapes else {
            return None;
        };

        for run in &line.runs {
            let positions: Vec<LayoutPoint> = run.points.iter().map(|p| p.position()).collect();
            if let [only] = positions.as_slice() {
                if only.x == x {
                    return Some(only.y);
                }
                continue;
            }
            for pair in positions.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let (lo, hi) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
                if x < lo || x > hi {
                    continue;
                }
                return Some(match gradient(a, b) {
                    Some(slope) => a.y + slope * (x - a.x),
                    None => a.y,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ChartEngine;
    use crate::model::{ChartKind, Dataset, Series, SeriesKind};
    use crate::options::{ChartOptions, Direction, Padding};
    use crate::render::ApproximateTextMeasurer;

    fn columns(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("C{i}")).collect()
    }

    fn options() -> ChartOptions {
        ChartOptions {
            padding: Padding::uniform(0.0),
            show_legend: false,
            ..Default::default()
        }
    }

    fn geometry(kind: ChartKind, options: ChartOptions, data: &Dataset, state: &ChartState) -> ChartGeometry {
        ChartEngine::new(kind, options)
            .unwrap()
            .layout(data, 400.0, 200.0, state, &ApproximateTextMeasurer)
            .unwrap()
    }

    #[test]
    fn test_toggle_series() {
        let mut state = ChartState::new();
        assert!(state.toggle_series("a"));
        assert!(state.is_hidden("a"));
        assert!(!state.toggle_series("a"));
        assert!(!state.is_hidden("a"));
    }

    #[test]
    fn test_selection() {
        let mut state = ChartState::new();
        state.select_column(2);
        assert_eq!(state.selected_column, Some(2));
        state.clear_selection();
        assert_eq!(state.selected_column, None);
    }

    #[test]
    fn test_column_at_slots() {
        let data = Dataset::new(columns(4)).with_series(Series::from_values("a", &[1.0, 2.0, 3.0, 4.0]));
        let g = geometry(ChartKind::Bar, options(), &data, &ChartState::new());
        assert_eq!(g.column_at(10.0, 100.0), Some(0));
        assert_eq!(g.column_at(350.0, 100.0), Some(3));
        assert_eq!(g.column_at(350.0, 250.0), None);
    }

    #[test]
    fn test_column_at_rtl() {
        let data = Dataset::new(columns(4)).with_series(Series::from_values("a", &[1.0, 2.0, 3.0, 4.0]));
        let options = ChartOptions {
            direction: Direction::Rtl,
            ..options()
        };
        let g = geometry(ChartKind::Bar, options, &data, &ChartState::new());
        assert_eq!(g.column_at(10.0, 100.0), Some(3));
        assert_eq!(g.column_at(350.0, 100.0), Some(0));
    }

    #[test]
    fn test_focus_at_collects_values() {
        let data = Dataset::new(columns(3))
            .with_series(Series::from_values("bars", &[2.0, 4.0, 6.0]).with_kind(SeriesKind::Bar))
            .with_series(Series::new("line", vec![Some(1.0), None, Some(3.0)]));
        let g = geometry(ChartKind::LineAndBar, options(), &data, &ChartState::new());

        let focus = g.focus_at(200.0).unwrap();
        assert_eq!(focus.column, 1);
        assert!((focus.x - 200.0).abs() < 1e-9);
        // the line has a gap at column 1
        assert_eq!(focus.values.len(), 1);
        assert_eq!(focus.values[0].series_id, "bars");
        assert_eq!(focus.values[0].value, 4.0);

        let focus = g.focus_at(0.0).unwrap();
        assert_eq!(focus.column, 0);
        assert_eq!(focus.values.len(), 2);
    }

    #[test]
    fn test_focused_column_from_state() {
        let data = Dataset::new(columns(2)).with_series(Series::from_values("a", &[1.0, 2.0]));
        let mut state = ChartState::new();
        state.focus_column(Some(1));
        state.select_column(7);
        let g = geometry(ChartKind::Line, options(), &data, &state);
        assert_eq!(g.focus.as_ref().map(|f| f.column), Some(1));
        // out-of-range selection is dropped
        assert_eq!(g.selected_column, None);
    }

    #[test]
    fn test_interpolate_y() {
        let data = Dataset::new(columns(3)).with_series(Series::from_values("a", &[0.0, 10.0, 0.0]));
        let g = geometry(ChartKind::Line, options(), &data, &ChartState::new());
        // points at x = 0, 200, 400; y = 200, 0, 200
        assert_eq!(g.interpolate_y("a", 100.0), Some(100.0));
        assert_eq!(g.interpolate_y("a", 300.0), Some(100.0));
        assert_eq!(g.interpolate_y("a", 500.0), None);
        assert_eq!(g.interpolate_y("missing", 100.0), None);
    }

    #[test]
    fn test_interpolate_y_in_gap() {
        let data = Dataset::new(columns(3)).with_series(Series::new("a", vec![Some(1.0), None, Some(2.0)]));
        let g = geometry(ChartKind::Line, options(), &data, &ChartState::new());
        assert_eq!(g.interpolate_y("a", 100.0), None);
        assert!(g.interpolate_y("a", 0.0).is_some());
    }
}
