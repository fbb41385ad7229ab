//! Error types for columnar file inspection.

/// Errors from reading a columnar file.
///
/// At the C boundary every variant is reported the same way: a null result
/// and the `Display` text stored in the last-error slot.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The path does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parquet footer or page decoding failed
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow IPC decoding or batch assembly failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Batch could not be rendered as JSON
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither the leading bytes nor the extension identify a supported format
    #[error("Unrecognized columnar file format: {0}")]
    UnrecognizedFormat(String),

    /// Projection names a column the file does not have
    #[error("Column index {index} out of range for schema with {num_fields} fields")]
    ColumnOutOfRange {
        /// Requested column position.
        index: usize,
        /// Number of top-level fields in the file schema.
        num_fields: usize,
    },

    /// Projection is malformed (for example, empty)
    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    /// Bad argument passed across the C boundary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected failure inside the reader (for example, a caught panic)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
