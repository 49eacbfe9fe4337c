//! Dimension system for arrays.
//!
//! A [`Dimension`] is the immutable list of axis sizes of an array. It answers
//! the size queries the traversal engines use to pick a strategy: total
//! element count, the first non-singleton axis, and the canonical distance
//! between consecutive elements along an axis.

use std::fmt;

use crate::error::{MaxError, Result};

pub mod stride;

pub use stride::Stride;

/// The extents of an array, one entry per axis.
///
/// Axes beyond the stored rank are treated as singleton axes, so `[3]` and
/// `[3, 1]` describe the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
    sizes: Vec<usize>,
}

impl Dimension {
    /// Creates a new dimension from the given sizes.
    pub fn new(sizes: impl Into<Vec<usize>>) -> Self {
        Self {
            sizes: sizes.into(),
        }
    }

    /// The dimension of a single value.
    pub fn scalar() -> Self {
        Self::new(vec![1])
    }

    /// Returns the sizes as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    /// Returns the number of axes.
    pub fn ndim(&self) -> usize {
        self.sizes.len()
    }

    /// Returns the size of `axis`. Axes beyond the rank have size 1.
    #[inline]
    pub fn size(&self, axis: usize) -> usize {
        self.sizes.get(axis).copied().unwrap_or(1)
    }

    /// Returns the total number of elements.
    pub fn total_elements(&self) -> usize {
        self.sizes.iter().product()
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.total_elements() == 0
    }

    /// Returns `true` if the array holds exactly one element.
    pub fn is_scalar(&self) -> bool {
        self.total_elements() == 1
    }

    /// The lowest axis with more than one element, or the last axis if every
    /// axis is a singleton.
    pub fn first_non_singleton_axis(&self) -> usize {
        self.sizes
            .iter()
            .position(|&s| s != 1)
            .unwrap_or_else(|| self.ndim().saturating_sub(1))
    }

    /// Number of buffer slots between consecutive elements along `axis` in
    /// canonical dense storage.
    pub fn sequential_index_distance(&self, axis: usize) -> usize {
        self.sizes.iter().take(axis).product()
    }

    /// Exact comparison of every axis size, ignoring trailing singletons.
    pub fn is_same_shape(&self, other: &Dimension) -> bool {
        let rank = self.ndim().max(other.ndim());
        (0..rank).all(|axis| self.size(axis) == other.size(axis))
    }

    /// Index of the axis with the largest extent (the lowest one on ties).
    pub fn longest_axis(&self) -> usize {
        let mut best = 0;
        for (axis, &size) in self.sizes.iter().enumerate() {
            if size > self.size(best) {
                best = axis;
            }
        }
        best
    }

    /// Returns a copy with the size of `axis` set to 1.
    pub fn with_axis_collapsed(&self, axis: usize) -> Self {
        let mut sizes = self.sizes.clone();
        if let Some(size) = sizes.get_mut(axis) {
            *size = 1;
        }
        Self { sizes }
    }

    /// Canonical (column-major) strides of this dimension.
    pub fn strides(&self) -> Stride {
        Stride::column_major(&self.sizes)
    }

    /// Canonical buffer position of a multi-index.
    pub fn linear_index(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.ndim() {
            return Err(MaxError::invalid_shape(format!(
                "index of rank {} for array of rank {}",
                index.len(),
                self.ndim()
            )));
        }
        for (axis, (&i, &size)) in index.iter().zip(&self.sizes).enumerate() {
            if i >= size {
                return Err(MaxError::index_out_of_bounds(i, size, axis));
            }
        }
        self.strides().offset(index)
    }

    /// Inverse of [`Dimension::linear_index`].
    pub fn unravel(&self, mut linear: usize) -> Vec<usize> {
        self.sizes
            .iter()
            .map(|&size| {
                let size = size.max(1);
                let i = linear % size;
                linear /= size;
                i
            })
            .collect()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.sizes.iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", parts.join("x"))
    }
}

impl From<Vec<usize>> for Dimension {
    fn from(sizes: Vec<usize>) -> Self {
        Self::new(sizes)
    }
}

impl From<&[usize]> for Dimension {
    fn from(sizes: &[usize]) -> Self {
        Self::new(sizes.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Dimension {
    fn from(sizes: [usize; N]) -> Self {
        Self::new(sizes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_sizes() {
        let dim = Dimension::new(vec![2, 3, 4]);
        assert_eq!(dim.ndim(), 3);
        assert_eq!(dim.total_elements(), 24);
        assert_eq!(dim.size(1), 3);
        assert_eq!(dim.size(7), 1);
        assert!(!dim.is_scalar());
    }

    #[test]
    fn test_first_non_singleton_axis() {
        assert_eq!(Dimension::from([1, 1, 5]).first_non_singleton_axis(), 2);
        assert_eq!(Dimension::from([4, 1]).first_non_singleton_axis(), 0);
        assert_eq!(Dimension::from([1, 1]).first_non_singleton_axis(), 1);
        assert_eq!(Dimension::from([0, 3]).first_non_singleton_axis(), 0);
    }

    #[test]
    fn test_sequential_index_distance() {
        let dim = Dimension::from([2, 3, 4]);
        assert_eq!(dim.sequential_index_distance(0), 1);
        assert_eq!(dim.sequential_index_distance(1), 2);
        assert_eq!(dim.sequential_index_distance(2), 6);
        assert_eq!(dim.sequential_index_distance(3), 24);
    }

    #[test]
    fn test_same_shape_ignores_trailing_singletons() {
        assert!(Dimension::from([3]).is_same_shape(&Dimension::from([3, 1])));
        assert!(!Dimension::from([2, 3]).is_same_shape(&Dimension::from([3, 2])));
    }

    #[test]
    fn test_longest_axis() {
        assert_eq!(Dimension::from([2, 5, 5]).longest_axis(), 1);
        assert_eq!(Dimension::from([7, 2]).longest_axis(), 0);
    }

    #[test]
    fn test_linear_index_roundtrip_at_corner() {
        let dim = Dimension::from([2, 3, 4]);
        assert_eq!(dim.linear_index(&[1, 2, 3]).unwrap(), 23);
        assert_eq!(dim.unravel(23), vec![1, 2, 3]);
        assert!(dim.linear_index(&[2, 0, 0]).is_err());
    }
}
