use thiserror::Error;

use crate::view::SliceRange;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaxError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Invalid axis: {0} for array of dimension {1}")]
    InvalidAxis(usize, usize),
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    #[error("Index out of bounds: {0} for dimension of size {1} at axis {2}")]
    IndexOutOfBounds(usize, usize, usize),
    #[error("Invalid slice: {0:?} for dimension of size {1}")]
    InvalidSlice(SliceRange, usize),
    #[error("Invalid permutation: {0:?}")]
    InvalidPermutation(Vec<usize>),
}

impl MaxError {
    pub fn shape_mismatch(expected: impl Into<Vec<usize>>, actual: impl Into<Vec<usize>>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_axis(axis: usize, ndim: usize) -> Self {
        Self::InvalidAxis(axis, ndim)
    }

    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    pub fn index_out_of_bounds(index: usize, size: usize, axis: usize) -> Self {
        Self::IndexOutOfBounds(index, size, axis)
    }

    pub fn invalid_slice(range: SliceRange, size: usize) -> Self {
        Self::InvalidSlice(range, size)
    }

    pub fn invalid_permutation(perm: impl Into<Vec<usize>>) -> Self {
        Self::InvalidPermutation(perm.into())
    }
}

pub type Result<T> = std::result::Result<T, MaxError>;
