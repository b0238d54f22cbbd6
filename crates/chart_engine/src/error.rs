//! Error types for the chart engine

use thiserror::Error;

/// Errors that can occur while laying out a chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// An option is outside its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The value axis spans no distance
    #[error("Degenerate value range: min {min} equals or exceeds max {max}")]
    DegenerateRange { min: f64, max: f64 },

    /// Point-mode charts need at least two categories
    #[error("Too few columns: need at least {required}, got {actual}")]
    TooFewColumns { required: usize, actual: usize },

    /// A series does not have one value per column
    #[error("Series '{series}' has {actual} values but the dataset has {expected} columns")]
    DataShape {
        series: String,
        expected: usize,
        actual: usize,
    },

    /// Pie/donut values add up to zero
    #[error("Pie total is zero")]
    EmptyPieTotal,

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid chart type
    #[error("Invalid chart type: {0}")]
    InvalidChartType(String),

    /// A series type cannot be drawn on this chart kind
    #[error("Series '{series}' cannot be drawn on a {chart} chart")]
    SeriesTypeMismatch { series: String, chart: String },

    /// Two series share an identifier
    #[error("Duplicate series identifier: {0}")]
    DuplicateSeries(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
