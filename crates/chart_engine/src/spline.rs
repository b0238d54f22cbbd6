//! Uniform Catmull-Rom splines
//!
//! Evaluates the spline basis, converts segments to cubic Bezier control
//! points, and keeps an arclength table so a position can be looked up by
//! the fraction of total length travelled.

use crate::geometry::{distance, LayoutPoint};

/// Sub-steps per segment in the arclength table
pub const ARC_LENGTH_STEPS: usize = 50;

/// Point at parameter `t` (0..=1) on the segment from `p1` to `p2`
pub fn catmull_rom_point(
    p0: LayoutPoint,
    p1: LayoutPoint,
    p2: LayoutPoint,
    p3: LayoutPoint,
    t: f64,
) -> LayoutPoint {
    let t2 = t * t;
    let t3 = t2 * t;
    let basis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    LayoutPoint::new(
        basis(p0.x, p1.x, p2.x, p3.x),
        basis(p0.y, p1.y, p2.y, p3.y),
    )
}

/// Cubic Bezier control points equivalent to the segment from `p1` to `p2`
pub fn catmull_rom_controls(
    p0: LayoutPoint,
    p1: LayoutPoint,
    p2: LayoutPoint,
    p3: LayoutPoint,
) -> (LayoutPoint, LayoutPoint) {
    let c1 = LayoutPoint::new(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0);
    let c2 = LayoutPoint::new(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0);
    (c1, c2)
}

/// The four points governing segment `i` (endpoints are duplicated)
pub fn segment_points(points: &[LayoutPoint], i: usize) -> [LayoutPoint; 4] {
    let last = points.len() - 1;
    [
        points[i.saturating_sub(1)],
        points[i],
        points[(i + 1).min(last)],
        points[(i + 2).min(last)],
    ]
}

/// A spline through a run of points with a cumulative arclength table
#[derive(Debug, Clone)]
pub struct CatmullRomSpline {
    points: Vec<LayoutPoint>,
    /// Cumulative length at every sub-step, starting at 0
    lengths: Vec<f64>,
}

impl CatmullRomSpline {
    pub fn new(points: Vec<LayoutPoint>) -> Self {
        let mut lengths = vec![0.0];
        if points.len() >= 2 {
            let mut previous = points[0];
            let mut total = 0.0;
            for segment in 0..points.len() - 1 {
                let [p0, p1, p2, p3] = segment_points(&points, segment);
                for step in 1..=ARC_LENGTH_STEPS {
                    let t = step as f64 / ARC_LENGTH_STEPS as f64;
                    let point = catmull_rom_point(p0, p1, p2, p3, t);
                    total += distance(previous, point);
                    lengths.push(total);
                    previous = point;
                }
            }
        }
        Self { points, lengths }
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at parameter `t` on segment `segment`
    pub fn point_at(&self, segment: usize, t: f64) -> Option<LayoutPoint> {
        if segment >= self.segment_count() {
            return None;
        }
        let [p0, p1, p2, p3] = segment_points(&self.points, segment);
        Some(catmull_rom_point(p0, p1, p2, p3, t.clamp(0.0, 1.0)))
    }

    /// Point reached after travelling `percent` (0..=1) of the total length
    pub fn point_at_percent(&self, percent: f64) -> Option<LayoutPoint> {
        let first = *self.points.first()?;
        if self.segment_count() == 0 {
            return Some(first);
        }
        let total = self.total_length();
        if total == 0.0 {
            return Some(first);
        }

        let target = percent.clamp(0.0, 1.0) * total;
        // First table entry at or beyond the target length
        let index = self
            .lengths
            .partition_point(|&length| length < target)
            .clamp(1, self.lengths.len() - 1);
        let before = self.lengths[index - 1];
        let span = self.lengths[index] - before;
        let fraction = if span > 0.0 { (target - before) / span } else { 0.0 };

        let step = (index - 1) as f64 + fraction;
        let segment = ((index - 1) / ARC_LENGTH_STEPS).min(self.segment_count() - 1);
        let t = step / ARC_LENGTH_STEPS as f64 - segment as f64;
        self.point_at(segment, t)
    }
}
