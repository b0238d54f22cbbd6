//! Path building
//!
//! Turns a column-ordered sequence of plotted points (with gaps) into
//! back-end independent paths: straight polylines, smoothed curves, and
//! closed regions for area fills.

use crate::geometry::{distance, LayoutPoint};
use crate::spline::{catmull_rom_controls, segment_points, CatmullRomSpline};
use serde::{Deserialize, Serialize};

/// A single drawing command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadTo {
        cx: f64,
        cy: f64,
        x: f64,
        y: f64,
    },
    CubicTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
}

/// Ordered list of drawing commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: LayoutPoint) -> &mut Self {
        self.commands.push(PathCommand::MoveTo { x: p.x, y: p.y });
        self
    }

    pub fn line_to(&mut self, p: LayoutPoint) -> &mut Self {
        self.commands.push(PathCommand::LineTo { x: p.x, y: p.y });
        self
    }

    pub fn quad_to(&mut self, c: LayoutPoint, p: LayoutPoint) -> &mut Self {
        self.commands.push(PathCommand::QuadTo {
            cx: c.x,
            cy: c.y,
            x: p.x,
            y: p.y,
        });
        self
    }

    pub fn cubic_to(&mut self, c1: LayoutPoint, c2: LayoutPoint, p: LayoutPoint) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            c1x: c1.x,
            c1y: c1.y,
            c2x: c2.x,
            c2y: c2.y,
            x: p.x,
            y: p.y,
        });
        self
    }

    /// Circular arc to `p`
    pub fn arc_to(&mut self, radius: f64, large_arc: bool, sweep: bool, p: LayoutPoint) -> &mut Self {
        self.commands.push(PathCommand::ArcTo {
            rx: radius,
            ry: radius,
            rotation: 0.0,
            large_arc,
            sweep,
            x: p.x,
            y: p.y,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// A path that only positions the pen, drawn as a point
    pub fn is_point(&self) -> bool {
        matches!(self.commands.as_slice(), [PathCommand::MoveTo { .. }])
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// SVG `d` attribute for this path
    pub fn to_svg_data(&self) -> String {
        self.commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo { x, y } => format!("M {} {}", x, y),
                PathCommand::LineTo { x, y } => format!("L {} {}", x, y),
                PathCommand::QuadTo { cx, cy, x, y } => format!("Q {} {} {} {}", cx, cy, x, y),
                PathCommand::CubicTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => format!("C {} {} {} {} {} {}", c1x, c1y, c2x, c2y, x, y),
                PathCommand::ArcTo {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => format!(
                    "A {} {} {} {} {} {} {}",
                    rx,
                    ry,
                    rotation,
                    u8::from(large_arc),
                    u8::from(sweep),
                    x,
                    y
                ),
                PathCommand::Close => "Z".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Control points of the curve segment ending at a point
///
/// Quadratic segments use `c1` before the segment midpoint and `c2` after it;
/// Catmull-Rom segments use both as cubic controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveControls {
    pub c1: LayoutPoint,
    pub c2: LayoutPoint,
}

/// A plotted data point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    /// Column index in the dataset
    pub column: usize,
    /// Curve controls of the segment arriving at this point
    pub controls: Option<CurveControls>,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64, value: f64, column: usize) -> Self {
        Self {
            x,
            y,
            value,
            column,
            controls: None,
        }
    }

    pub fn position(&self) -> LayoutPoint {
        LayoutPoint::new(self.x, self.y)
    }
}

/// How consecutive points are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Smoothing {
    Straight,
    Quadratic,
    CatmullRom,
}

/// Split points into runs of consecutive non-null points
///
/// With `connect_null_values` every non-null point lands in one run.
pub fn split_runs(points: &[Option<PlotPoint>], connect_null_values: bool) -> Vec<Vec<PlotPoint>> {
    if connect_null_values {
        let run: Vec<PlotPoint> = points.iter().flatten().copied().collect();
        return if run.is_empty() { Vec::new() } else { vec![run] };
    }

    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in points {
        match point {
            Some(point) => current.push(*point),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// One contiguous run of points with its curve controls resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRun {
    pub points: Vec<PlotPoint>,
    pub smoothing: Smoothing,
}

impl PathRun {
    /// Resolve curve controls for every segment of `points`
    pub fn new(mut points: Vec<PlotPoint>, smoothing: Smoothing) -> Self {
        match smoothing {
            Smoothing::Straight => {
                for point in &mut points {
                    point.controls = None;
                }
            }
            Smoothing::Quadratic => {
                for i in 1..points.len() {
                    let from = points[i - 1];
                    let to = points[i];
                    let dx = to.x - from.x;
                    points[i].controls = Some(CurveControls {
                        c1: LayoutPoint::new(from.x + dx / 4.0, from.y),
                        c2: LayoutPoint::new(from.x + dx * 3.0 / 4.0, to.y),
                    });
                }
            }
            Smoothing::CatmullRom => {
                let positions: Vec<LayoutPoint> = points.iter().map(PlotPoint::position).collect();
                for i in 1..points.len() {
                    let [p0, p1, p2, p3] = segment_points(&positions, i - 1);
                    let (c1, c2) = catmull_rom_controls(p0, p1, p2, p3);
                    points[i].controls = Some(CurveControls { c1, c2 });
                }
            }
        }
        Self { points, smoothing }
    }

    pub fn is_single_point(&self) -> bool {
        self.points.len() == 1
    }

    /// Append the segments after the first point, replaying stored controls
    fn trace(&self, path: &mut Path) {
        for pair in self.points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            match (self.smoothing, to.controls) {
                (Smoothing::Quadratic, Some(controls)) => {
                    let mid = from.position().midpoint(to.position());
                    path.quad_to(controls.c1, mid).quad_to(controls.c2, to.position());
                }
                (Smoothing::CatmullRom, Some(controls)) => {
                    path.cubic_to(controls.c1, controls.c2, to.position());
                }
                _ => {
                    path.line_to(to.position());
                }
            }
        }
    }

    /// Open path along the run
    pub fn stroke_path(&self) -> Path {
        let mut path = Path::new();
        if let Some(first) = self.points.first() {
            path.move_to(first.position());
            self.trace(&mut path);
        }
        path
    }

    /// Closed region between the run and the horizontal line at `baseline_y`
    ///
    /// The top edge repeats the stroke's curve exactly.
    pub fn fill_path(&self, baseline_y: f64) -> Path {
        let mut path = Path::new();
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return path;
        };
        path.move_to(first.position());
        self.trace(&mut path);
        path.line_to(LayoutPoint::new(last.x, baseline_y))
            .line_to(LayoutPoint::new(first.x, baseline_y))
            .close();
        path
    }

    /// Position after travelling `percent` (0..=1) of the run's length
    pub fn point_at_percent(&self, percent: f64) -> Option<LayoutPoint> {
        let positions: Vec<LayoutPoint> = self.points.iter().map(PlotPoint::position).collect();
        if self.smoothing == Smoothing::CatmullRom {
            return CatmullRomSpline::new(positions).point_at_percent(percent);
        }

        let first = *positions.first()?;
        let total: f64 = positions.windows(2).map(|w| distance(w[0], w[1])).sum();
        if total == 0.0 {
            return Some(first);
        }
        let mut remaining = percent.clamp(0.0, 1.0) * total;
        for pair in positions.windows(2) {
            let length = distance(pair[0], pair[1]);
            if remaining <= length {
                let t = if length > 0.0 { remaining / length } else { 0.0 };
                return Some(pair[0].lerp(pair[1], t));
            }
            remaining -= length;
        }
        positions.last().copied()
    }
}

/// Builds path runs from plotted points according to line policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathBuilder {
    pub smoothing: Smoothing,
    pub connect_null_values: bool,
}

impl PathBuilder {
    pub fn new(smoothing: Smoothing, connect_null_values: bool) -> Self {
        Self {
            smoothing,
            connect_null_values,
        }
    }

    /// Independent runs for `points`, one per gap-free stretch
    pub fn build(&self, points: &[Option<PlotPoint>]) -> Vec<PathRun> {
        split_runs(points, self.connect_null_values)
            .into_iter()
            .map(|run| PathRun::new(run, self.smoothing))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_points(values: &[Option<f64>]) -> Vec<Option<PlotPoint>> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| v.map(|v| PlotPoint::new(i as f64 * 10.0, 100.0 - v, v, i)))
            .collect()
    }

    fn columns(run: &PathRun) -> Vec<usize> {
        run.points.iter().map(|p| p.column).collect()
    }

    #[test]
    fn test_null_gaps_split_runs() {
        let points = column_points(&[Some(1.0), None, Some(3.0), Some(4.0), None, Some(5.0)]);
        let runs = PathBuilder::new(Smoothing::Straight, false).build(&points);
        assert_eq!(runs.len(), 3);
        assert_eq!(columns(&runs[0]), vec![0]);
        assert_eq!(columns(&runs[1]), vec![2, 3]);
        assert_eq!(columns(&runs[2]), vec![5]);
        assert!(runs[2].stroke_path().is_point());
    }

    #[test]
    fn test_leading_null_gap() {
        let points = column_points(&[None, None, Some(3.0), Some(4.0), None, Some(5.0)]);
        let runs = PathBuilder::new(Smoothing::Straight, false).build(&points);
        assert_eq!(runs.len(), 2);
        assert_eq!(columns(&runs[0]), vec![2, 3]);
        assert_eq!(columns(&runs[1]), vec![5]);
    }

    #[test]
    fn test_connect_null_values_flattens() {
        let points = column_points(&[Some(1.0), None, Some(3.0), None, Some(5.0)]);
        let runs = PathBuilder::new(Smoothing::Straight, true).build(&points);
        assert_eq!(runs.len(), 1);
        assert_eq!(columns(&runs[0]), vec![0, 2, 4]);
    }

    #[test]
    fn test_all_null_yields_nothing() {
        let points = column_points(&[None, None]);
        assert!(PathBuilder::new(Smoothing::Straight, false).build(&points).is_empty());
        assert!(PathBuilder::new(Smoothing::Straight, true).build(&points).is_empty());
    }

    #[test]
    fn test_straight_stroke_commands() {
        let points = column_points(&[Some(0.0), Some(10.0), Some(5.0)]);
        let run = &PathBuilder::new(Smoothing::Straight, false).build(&points)[0];
        assert_eq!(
            run.stroke_path().commands,
            vec![
                PathCommand::MoveTo { x: 0.0, y: 100.0 },
                PathCommand::LineTo { x: 10.0, y: 90.0 },
                PathCommand::LineTo { x: 20.0, y: 95.0 },
            ]
        );
    }

    #[test]
    fn test_quadratic_stroke_commands() {
        let points = column_points(&[Some(0.0), Some(40.0)]);
        let run = &PathBuilder::new(Smoothing::Quadratic, false).build(&points)[0];
        assert_eq!(
            run.stroke_path().commands,
            vec![
                PathCommand::MoveTo { x: 0.0, y: 100.0 },
                PathCommand::QuadTo {
                    cx: 2.5,
                    cy: 100.0,
                    x: 5.0,
                    y: 80.0
                },
                PathCommand::QuadTo {
                    cx: 7.5,
                    cy: 60.0,
                    x: 10.0,
                    y: 60.0
                },
            ]
        );
    }

    #[test]
    fn test_fill_reuses_curve_shape() {
        let points = column_points(&[Some(0.0), Some(40.0), Some(10.0)]);
        for smoothing in [Smoothing::Straight, Smoothing::Quadratic, Smoothing::CatmullRom] {
            let run = &PathBuilder::new(smoothing, false).build(&points)[0];
            let stroke = run.stroke_path();
            let fill = run.fill_path(100.0);
            assert!(fill.is_closed());
            assert_eq!(&fill.commands[..stroke.commands.len()], stroke.commands.as_slice());
            let tail = &fill.commands[stroke.commands.len()..];
            assert_eq!(
                tail,
                &[
                    PathCommand::LineTo { x: 20.0, y: 100.0 },
                    PathCommand::LineTo { x: 0.0, y: 100.0 },
                    PathCommand::Close,
                ]
            );
        }
    }

    #[test]
    fn test_catmull_rom_emits_cubics() {
        let points = column_points(&[Some(0.0), Some(40.0), Some(10.0)]);
        let run = &PathBuilder::new(Smoothing::CatmullRom, false).build(&points)[0];
        let stroke = run.stroke_path();
        assert_eq!(stroke.commands.len(), 3);
        assert!(stroke.commands[1..]
            .iter()
            .all(|c| matches!(c, PathCommand::CubicTo { .. })));
    }

    #[test]
    fn test_svg_data() {
        let mut path = Path::new();
        path.move_to(LayoutPoint::new(0.0, 1.0))
            .line_to(LayoutPoint::new(2.0, 3.5))
            .arc_to(5.0, true, false, LayoutPoint::new(4.0, 4.0))
            .close();
        assert_eq!(path.to_svg_data(), "M 0 1 L 2 3.5 A 5 5 0 1 0 4 4 Z");
    }

    #[test]
    fn test_point_at_percent_straight() {
        let points = column_points(&[Some(0.0), Some(0.0), Some(0.0)]);
        let run = &PathBuilder::new(Smoothing::Straight, false).build(&points)[0];
        let half = run.point_at_percent(0.5).unwrap();
        assert!((half.x - 10.0).abs() < 1e-9);
        assert_eq!(run.point_at_percent(1.0), Some(LayoutPoint::new(20.0, 100.0)));
    }
}
