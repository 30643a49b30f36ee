//! Centralized error handling for pr_climatology
//!
//! Every stage of the pipeline reports failures through [`ClimError`]. Errors
//! are never retried; they propagate to the binary, which prints the chain and
//! exits non-zero.

use thiserror::Error;

/// Main error type for pr_climatology operations
#[derive(Debug, Error)]
pub enum ClimError {
    /// NetCDF file operation errors
    #[error("NetCDF error: {0}")]
    NetCDFError(#[from] netcdf::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image encoding or output errors
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// PNG encoding errors
    #[error("PNG error: {0}")]
    PngError(#[from] png::EncodingError),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    ArrayError(#[from] ndarray::ShapeError),

    /// Malformed GeoJSON input
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Variable not found in the dataset
    #[error("Variable '{var}' not found in file")]
    VariableNotFound { var: String },

    /// Attribute missing from a variable or from the global attributes
    #[error("Attribute '{attr}' not found on {owner}")]
    AttributeNotFound { attr: String, owner: String },

    /// Dimension not found in variable
    #[error("Dimension '{dim}' not found in variable '{var}'")]
    DimensionNotFound { var: String, dim: String },

    /// No coordinate values available for a dimension
    #[error("No coordinate variable for dimension '{dim}'")]
    CoordinateNotFound { dim: String },

    /// Dimension names and data shape disagree
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Season label outside DJF, MAM, JJA, SON
    #[error("Invalid season '{0}': expected one of DJF, MAM, JJA, SON")]
    InvalidSeason(String),

    /// Season has no data in the climatology
    #[error("Season '{season}' not present in climatology")]
    SeasonNotFound { season: String },

    /// CF time coordinate could not be decoded
    #[error("Time decoding error: {0}")]
    TimeDecode(String),

    /// Colorbar levels rejected by the renderer
    #[error("Invalid contour levels: {0}")]
    InvalidLevels(String),

    /// Coastline geometry could not be interpreted
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Font could not be loaded
    #[error("Font error: {0}")]
    Font(String),

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Result type alias for pr_climatology operations
pub type Result<T> = std::result::Result<T, ClimError>;
