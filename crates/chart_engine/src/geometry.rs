//! Geometry helpers
//!
//! Rectangles and points in pixel space plus the small amount of
//! trigonometry the layout engines share.

use serde::{Deserialize, Serialize};

/// A rectangle in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    /// Create a new rectangle
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two y coordinates in either order
    pub fn from_vertical_span(x: f64, width: f64, y1: f64, y2: f64) -> Self {
        Self::new(x, y1.min(y2), width, (y1 - y2).abs())
    }

    /// Get the right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the center X coordinate
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Get the center Y coordinate
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether the point lies inside (edges inclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Shrink by different amounts on each side
    pub fn inset_sides(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

/// A point in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point a fraction `t` of the way towards `other`
    pub fn lerp(&self, other: LayoutPoint, t: f64) -> LayoutPoint {
        LayoutPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(&self, other: LayoutPoint) -> LayoutPoint {
        self.lerp(other, 0.5)
    }
}

/// Convert an angle in degrees (0 at 12 o'clock, clockwise) to a point on a circle
pub fn polar_to_cartesian(center: LayoutPoint, radius: f64, degrees: f64) -> LayoutPoint {
    let radians = (degrees - 90.0).to_radians();
    LayoutPoint::new(
        center.x + radius * radians.cos(),
        center.y + radius * radians.sin(),
    )
}

/// Slope between two points, `None` for a vertical pair
pub fn gradient(a: LayoutPoint, b: LayoutPoint) -> Option<f64> {
    let dx = b.x - a.x;
    if dx == 0.0 {
        None
    } else {
        Some((b.y - a.y) / dx)
    }
}

/// Euclidean distance between two points
pub fn distance(a: LayoutPoint, b: LayoutPoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}
