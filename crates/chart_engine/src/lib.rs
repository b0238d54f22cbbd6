//! Chart Engine - Layout and path generation for 2D charts
//!
//! This crate provides support for:
//! - Mapping data values and categories to pixel coordinates
//! - Building line paths with null gaps, curve smoothing and area fills
//! - Placing grouped and stacked bars
//! - Laying out pie and donut wedges
//! - Value and category axis gridlines and labels
//! - A legend row with series toggling, column selection and focus
//! - Painting the result to SVG or recorded render primitives
//!
//! Every layout pass is validated up front and either yields complete
//! geometry or a [`ChartError`].

mod error;
mod model;
mod options;
mod geometry;
mod scale;
mod spline;
mod path;
mod bar;
mod arc;
mod axis;
mod legend;
mod render;
mod layout;
mod interaction;

pub use error::*;
pub use model::*;
pub use options::*;
pub use geometry::*;
pub use scale::*;
pub use spline::*;
pub use path::*;
pub use bar::*;
pub use arc::*;
pub use axis::*;
pub use legend::*;
pub use render::*;
pub use layout::*;
pub use interaction::*;
