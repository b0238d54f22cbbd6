//! Pie and donut wedges
//!
//! Angles are in degrees, measured clockwise from 12 o'clock. Wedges are
//! placed one after another in series order.

use crate::error::{ChartError, ChartResult};
use crate::geometry::{polar_to_cartesian, LayoutPoint};
use crate::path::Path;
use serde::{Deserialize, Serialize};

/// Sweeps at least this close to a full turn are drawn as a ring
const FULL_TURN_EPSILON: f64 = 1e-9;

/// Start/end angle of each wedge for the given magnitudes
pub fn wedge_angles(values: &[f64]) -> ChartResult<Vec<(f64, f64)>> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(ChartError::InvalidData(format!(
            "pie values must be finite and non-negative, got {bad}"
        )));
    }
    let total: f64 = values.iter().sum();
    if total == 0.0 {
        return Err(ChartError::EmptyPieTotal);
    }

    let mut cumulative = 0.0;
    let angles = values
        .iter()
        .map(|value| {
            let start = cumulative / total * 360.0;
            cumulative += value;
            (start, cumulative / total * 360.0)
        })
        .collect();
    Ok(angles)
}

/// One pie or donut slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    pub center: LayoutPoint,
    pub outer_radius: f64,
    /// Zero for pie wedges
    pub inner_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
    /// Share of the total, 0..=1
    pub percentage: f64,
}

impl Wedge {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// SVG large-arc flag: the wedge spans more than half a turn
    pub fn large_arc(&self) -> bool {
        self.sweep() > 180.0
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn is_donut(&self) -> bool {
        self.inner_radius > 0.0
    }

    fn outer(&self, degrees: f64) -> LayoutPoint {
        polar_to_cartesian(self.center, self.outer_radius, degrees)
    }

    fn inner(&self, degrees: f64) -> LayoutPoint {
        polar_to_cartesian(self.center, self.inner_radius, degrees)
    }

    /// Outline of the wedge
    ///
    /// Outer arcs sweep clockwise and inner arcs counter-clockwise so the
    /// annulus segment closes without crossing itself.
    pub fn path(&self) -> Path {
        let full = self.sweep() >= 360.0 - FULL_TURN_EPSILON;
        let large = self.large_arc();
        let (start, end, mid) = (self.start_angle, self.end_angle, self.mid_angle());
        let mut path = Path::new();

        if self.is_donut() {
            path.move_to(self.outer(start));
            if full {
                path.arc_to(self.outer_radius, false, true, self.outer(mid))
                    .arc_to(self.outer_radius, false, true, self.outer(end))
                    .line_to(self.inner(end))
                    .arc_to(self.inner_radius, false, false, self.inner(mid))
                    .arc_to(self.inner_radius, false, false, self.inner(start));
            } else {
                path.arc_to(self.outer_radius, large, true, self.outer(end))
                    .line_to(self.inner(end))
                    .arc_to(self.inner_radius, large, false, self.inner(start));
            }
        } else {
            path.move_to(self.center).line_to(self.outer(start));
            if full {
                path.arc_to(self.outer_radius, false, true, self.outer(mid))
                    .arc_to(self.outer_radius, false, true, self.outer(end));
            } else {
                path.arc_to(self.outer_radius, large, true, self.outer(end));
            }
        }
        path.close();
        path
    }
}

/// Lays out wedges around a common center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayoutEngine {
    pub center: LayoutPoint,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl ArcLayoutEngine {
    pub fn pie(center: LayoutPoint, radius: f64) -> Self {
        Self {
            center,
            outer_radius: radius,
            inner_radius: 0.0,
        }
    }

    /// Ring of thickness `donut_width`; a width at or beyond the radius degenerates to a pie
    pub fn donut(center: LayoutPoint, radius: f64, donut_width: f64) -> Self {
        Self {
            center,
            outer_radius: radius,
            inner_radius: (radius - donut_width).max(0.0),
        }
    }

    /// Wedges for `values` in order
    pub fn layout(&self, values: &[f64]) -> ChartResult<Vec<Wedge>> {
        let total: f64 = values.iter().sum();
        let wedges = wedge_angles(values)?
            .into_iter()
            .zip(values)
            .map(|((start_angle, end_angle), &value)| Wedge {
                center: self.center,
                outer_radius: self.outer_radius,
                inner_radius: self.inner_radius,
                start_angle,
                end_angle,
                value,
                percentage: value / total,
            })
            .collect();
        Ok(wedges)
    }
}
