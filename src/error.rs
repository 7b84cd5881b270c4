use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems while turning a listing file into a [`ProductTable`].
///
/// Individual rows that fail to clean are never reported here; they are
/// dropped by the loader.
///
/// [`ProductTable`]: crate::data::model::ProductTable
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column '{column}' has unsupported type {found}")]
    ColumnType { column: String, found: String },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a top-level JSON array of objects")]
    JsonShape,

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Rejected filter bounds.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CriteriaError {
    #[error("price bounds must be finite (got {min}..{max})")]
    NonFiniteBounds { min: f64, max: f64 },

    #[error("price minimum {min} exceeds maximum {max}")]
    InvertedBounds { min: f64, max: f64 },

    #[error("minimum rating must be a finite value >= 0 (got {0})")]
    InvalidRating(f64),
}
