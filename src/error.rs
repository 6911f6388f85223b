use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building or querying a spectral cube.
#[derive(Error, Debug)]
pub enum CubeError {
    #[error("Band source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("No band images found in {}", path.display())]
    Empty { path: PathBuf },

    #[error("Failed to decode band image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Band {} is {actual_height}x{actual_width}, expected {expected_height}x{expected_width}",
        path.display()
    )]
    DimensionMismatch {
        path: PathBuf,
        expected_height: usize,
        expected_width: usize,
        actual_height: usize,
        actual_width: usize,
    },

    #[error("Window size {size} does not fit a {height}x{width} cube")]
    InvalidWindowSize {
        size: usize,
        height: usize,
        width: usize,
    },

    #[error(
        "Window index {index} (row {row}, col {col}) exceeds the {height}x{width} cube \
         for size {size}"
    )]
    InvalidIndex {
        index: usize,
        row: usize,
        col: usize,
        size: usize,
        height: usize,
        width: usize,
    },

    #[error("Band {band} out of range (cube has {band_count} bands)")]
    InvalidBand { band: usize, band_count: usize },

    #[error("Unsupported manifest extension: .{0}")]
    UnsupportedManifest(String),

    #[error("IO error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON manifest {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid CSV manifest {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T> = std::result::Result<T, CubeError>;
