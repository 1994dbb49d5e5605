//! Error types for geometry handling.

use thiserror::Error;

/// Geometry errors.
#[derive(Error, Debug)]
pub enum GeoError {
    /// WKT parsing error.
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// Literal datatype is not a supported geometry encoding.
    #[error("Geospatial datatype not supported (only WKT): {0}")]
    UnsupportedDatatype(String),

    /// Term is not a literal at all.
    #[error("Expected a geometry literal, found {0}")]
    NotALiteral(String),

    /// Geometry kind the operation cannot handle.
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Zoom level outside the slippy-map range.
    #[error("Invalid zoom level {0} (expected 0..=30)")]
    InvalidZoom(u8),
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeoError>;
