//! Stride handling for dense arrays.
//!
//! Strides are the number of buffer slots to skip to move to the next
//! element along each axis. Dense arrays in this crate use column-major
//! strides: the first axis has a stride of 1, the second a stride equal to
//! the size of the first, and so on.

use crate::error::{MaxError, Result};

/// Represents the strides of a dense array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stride {
    strides: Vec<usize>,
}

impl Stride {
    /// Returns the stride values as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.strides
    }

    /// Computes the buffer offset for the given indices.
    pub fn offset<I: AsRef<[usize]>>(&self, indices: I) -> Result<usize> {
        let indices = indices.as_ref();
        if indices.len() != self.strides.len() {
            return Err(MaxError::invalid_shape(
                "Number of indices must match number of dimensions",
            ));
        }

        Ok(self
            .strides
            .iter()
            .zip(indices)
            .map(|(&stride, &index)| stride * index)
            .sum())
    }

    /// Computes the canonical column-major strides for a given shape.
    pub fn column_major(shape: &[usize]) -> Self {
        let mut strides = Vec::with_capacity(shape.len());
        let mut acc = 1usize;
        for &size in shape {
            strides.push(acc);
            acc = acc.wrapping_mul(size);
        }
        Self { strides }
    }

    /// Computes row-major strides for a given shape.
    pub fn row_major(shape: &[usize]) -> Self {
        let ndim = shape.len();
        let mut strides = vec![0usize; ndim];

        if ndim > 0 {
            strides[ndim - 1] = 1;
            for i in (0..ndim - 1).rev() {
                strides[i] = strides[i + 1].wrapping_mul(shape[i + 1]);
            }
        }

        Self { strides }
    }
}
