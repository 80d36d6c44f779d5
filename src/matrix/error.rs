//! Errors raised by matrix operations.

/// Errors that can occur when querying or mutating a matrix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// A row or column index is outside `[0, size)`.
    #[error("Index {index} out of bounds for matrix of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// The requested ordering is not one the matrix knows how to apply.
    #[error("Ordering '{0}' is not supported")]
    UnsupportedOrdering(String),

    /// Row data would break the square shape of the matrix.
    #[error("Row has {cells} cells but the matrix has {size} rows")]
    NotSquare { cells: usize, size: usize },
}

/// Result type alias for matrix operations.
pub type MatrixResult<T> = Result<T, MatrixError>;
