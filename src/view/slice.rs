//! Slice ranges for building views.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{MaxError, Result};

/// A range along one axis, with an optional step.
///
/// This is similar to `std::ops::Range` but supports open bounds and a step
/// size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SliceRange {
    start: Option<usize>,
    end: Option<usize>,
    step: usize,
}

impl SliceRange {
    /// Creates a new slice range with the given bounds and step size.
    ///
    /// # Arguments
    ///
    /// * `start` - The starting index (inclusive). If `None`, defaults to 0.
    /// * `end` - The ending index (exclusive). If `None`, defaults to the length of the axis.
    /// * `step` - The step size. A step of 0 is rejected when the range is resolved.
    pub fn new(start: Option<usize>, end: Option<usize>, step: usize) -> Self {
        Self { start, end, step }
    }

    /// Creates a new slice range that selects a single index.
    pub fn single(index: usize) -> Self {
        Self {
            start: Some(index),
            end: Some(index + 1),
            step: 1,
        }
    }

    /// Creates a new slice range that selects all elements.
    pub fn all() -> Self {
        Self {
            start: None,
            end: None,
            step: 1,
        }
    }

    /// Returns a copy of this range with the given step.
    pub fn step_by(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Returns the start index, if specified.
    pub fn start(&self) -> Option<usize> {
        self.start
    }

    /// Returns the end index, if specified.
    pub fn end(&self) -> Option<usize> {
        self.end
    }

    /// Returns the step size.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Resolves this range against an axis of `size` elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds or the step is zero.
    pub fn to_range(&self, size: usize) -> Result<Range<usize>> {
        let start = self.start.unwrap_or(0);
        let end = self.end.unwrap_or(size);

        if self.step == 0 || start > size || end > size || start > end {
            return Err(MaxError::invalid_slice(self.clone(), size));
        }

        Ok(start..end)
    }

    /// The positions this range selects along an axis of `size` elements.
    pub fn positions(&self, size: usize) -> Result<Vec<usize>> {
        let range = self.to_range(size)?;
        Ok(range.step_by(self.step).collect())
    }
}

impl Default for SliceRange {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Range<usize>> for SliceRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(Some(range.start), Some(range.end), 1)
    }
}

impl From<RangeTo<usize>> for SliceRange {
    fn from(range: RangeTo<usize>) -> Self {
        Self::new(None, Some(range.end), 1)
    }
}

impl From<RangeFrom<usize>> for SliceRange {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::new(Some(range.start), None, 1)
    }
}

impl From<RangeFull> for SliceRange {
    fn from(_: RangeFull) -> Self {
        Self::all()
    }
}
