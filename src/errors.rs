//! Error types that are reported by array operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reasons why an index or storage position is invalid.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexError {
    /// The number of index components does not match the array's rank.
    ArityMismatch { expected: usize, actual: usize },

    /// An index component is out of range for its dimension, or a view
    /// would reference positions beyond the end of the buffer.
    OutOfBounds,

    /// The start offset of a view lies outside its buffer.
    InvalidOffset { offset: usize, len: usize },

    /// Attempted to take a slice of a rank-0 array.
    SliceOfScalar,
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexError::ArityMismatch { expected, actual } => write!(
                f,
                "index has {} components but array has rank {}",
                actual, expected
            ),
            IndexError::OutOfBounds => write!(f, "index out of bounds"),
            IndexError::InvalidOffset { offset, len } => {
                write!(f, "offset {} is invalid for buffer of length {}", offset, len)
            }
            IndexError::SliceOfScalar => write!(f, "cannot slice a rank-0 array"),
        }
    }
}

impl Error for IndexError {}

/// Errors that can occur when constructing, deriving, reading or reducing
/// arrays.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayError {
    /// Operand shapes are incompatible.
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// An index or offset does not map to a valid buffer position.
    InvalidIndex(IndexError),

    /// A dimension is out of range for the array's rank, or a list of axes is
    /// not a valid permutation.
    InvalidDimension { dim: usize, ndim: usize },

    /// The requested operation is not supported for this array.
    UnsupportedOperation(String),

    /// The source of a slice assignment has a different number of slices than
    /// the destination.
    SliceCountMismatch { expected: usize, actual: usize },
}

impl Display for ArrayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayError::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, actual)
            }
            ArrayError::InvalidIndex(err) => write!(f, "invalid index: {}", err),
            ArrayError::InvalidDimension { dim, ndim } => {
                write!(f, "dimension {} is invalid for array of rank {}", dim, ndim)
            }
            ArrayError::UnsupportedOperation(op) => write!(f, "unsupported operation: {}", op),
            ArrayError::SliceCountMismatch { expected, actual } => write!(
                f,
                "slice count mismatch: destination has {} slices, source has {}",
                expected, actual
            ),
        }
    }
}

impl Error for ArrayError {}

impl From<IndexError> for ArrayError {
    fn from(err: IndexError) -> ArrayError {
        ArrayError::InvalidIndex(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayError, IndexError};

    #[test]
    fn test_display() {
        let err = ArrayError::from(IndexError::ArityMismatch {
            expected: 2,
            actual: 3,
        });
        assert_eq!(
            err.to_string(),
            "invalid index: index has 3 components but array has rank 2"
        );

        let err = ArrayError::InvalidDimension { dim: 4, ndim: 2 };
        assert_eq!(err.to_string(), "dimension 4 is invalid for array of rank 2");
    }
}
