//! Zero-copy views.
//!
//! Every method here returns a [`Storage::Viewed`] array that shares the
//! source buffer. Offset tables are rebuilt for each new view; the source
//! array is never modified.

use crate::array::NumArray;
use crate::element::Element;
use crate::error::{MaxError, Result};
use crate::storage::{IndexOffset, Storage};

mod slice;

pub use slice::SliceRange;

impl<T: Element> NumArray<T> {
    /// Offset tables describing this array, whatever its storage.
    pub fn index_offset(&self) -> IndexOffset {
        match &self.storage {
            Storage::Dense => IndexOffset::dense(&self.dim),
            Storage::Viewed(offsets) => offsets.clone(),
        }
    }

    fn with_offsets(&self, offsets: IndexOffset) -> NumArray<T> {
        NumArray {
            data: self.data.clone(),
            dim: offsets.dimension(),
            storage: Storage::Viewed(offsets),
        }
    }

    /// The same elements addressed through offset tables.
    pub fn as_view(&self) -> NumArray<T> {
        self.with_offsets(self.index_offset())
    }

    /// Reorders the axes: axis `i` of the view is axis `perm[i]` of `self`.
    pub fn permute(&self, perm: &[usize]) -> Result<NumArray<T>> {
        Ok(self.with_offsets(self.index_offset().permute(perm)?))
    }

    /// Reverses the order of the axes. For a matrix this is the transpose.
    pub fn transpose(&self) -> NumArray<T> {
        self.with_offsets(self.index_offset().reversed())
    }

    /// Restricts `axis` to the positions selected by `range`.
    pub fn slice_axis(&self, axis: usize, range: impl Into<SliceRange>) -> Result<NumArray<T>> {
        if axis >= self.ndim() {
            return Err(MaxError::invalid_axis(axis, self.ndim()));
        }
        let positions = range.into().positions(self.dim.size(axis))?;
        Ok(self.with_offsets(self.index_offset().select(axis, &positions)?))
    }

    /// Stretches the singleton `axis` to `count` copies of itself.
    pub fn repeat_axis(&self, axis: usize, count: usize) -> Result<NumArray<T>> {
        Ok(self.with_offsets(self.index_offset().repeat(axis, count)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::NumArray;

    use super::SliceRange;

    #[test]
    fn test_transpose_shares_buffer() {
        let a = numarray![[1, 2, 3], [4, 5, 6]];
        let t = a.transpose();
        assert_eq!(t.shape(), &[3, 2]);
        assert!(t.shares_buffer(&a));
        assert!(!t.storage().is_dense());
        assert_eq!(t.get(&[2, 1]).unwrap(), 6);
        assert_eq!(t, numarray![[1, 4], [2, 5], [3, 6]]);
    }

    #[test]
    fn test_slice_axis() {
        let a = numarray![[1, 2, 3], [4, 5, 6]];

        let row = a.slice_axis(0, SliceRange::single(1)).unwrap();
        assert_eq!(row.shape(), &[1, 3]);
        assert_eq!(row.to_vec(), vec![4, 5, 6]);

        let cols = a.slice_axis(1, SliceRange::all().step_by(2)).unwrap();
        assert_eq!(cols, numarray![[1, 3], [4, 6]]);

        assert!(a.slice_axis(2, ..).is_err());
        assert!(a.slice_axis(1, 1usize..9).is_err());
    }

    #[test]
    fn test_permute_three_axes() {
        let a = NumArray::from_shape_fn([2, 3, 4], |i| (i[0] * 100 + i[1] * 10 + i[2]) as i32);
        let p = a.permute(&[2, 0, 1]).unwrap();
        assert_eq!(p.shape(), &[4, 2, 3]);
        assert_eq!(p.get(&[3, 1, 2]).unwrap(), 123);
        assert!(a.permute(&[0, 1]).is_err());
    }

    #[test]
    fn test_repeat_axis() {
        let col = numarray![[1], [2]];
        let wide = col.repeat_axis(1, 3).unwrap();
        assert_eq!(wide, numarray![[1, 1, 1], [2, 2, 2]]);
    }
}
