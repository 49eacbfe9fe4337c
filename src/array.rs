//! The array handle consumed and produced by the max kernels.

use std::fmt;
use std::sync::Arc;

use crate::dimension::{Dimension, Stride};
use crate::element::Element;
use crate::error::{MaxError, Result};
use crate::storage::{BufferPool, Storage};

/// An n-dimensional array of `T`.
///
/// A `NumArray` is a cheap, value-like handle: a [`Dimension`], a shared
/// backing buffer and a [`Storage`] tag saying how the buffer is addressed.
/// Cloning shares the buffer. Views built from an array share its buffer
/// and never write through it.
#[derive(Clone)]
pub struct NumArray<T: Element> {
    pub(crate) data: Arc<Vec<T>>,
    pub(crate) dim: Dimension,
    pub(crate) storage: Storage,
}

impl<T: Element> NumArray<T> {
    /// Creates a vector from the given values.
    pub fn from_vec(data: Vec<T>) -> Self {
        let dim = Dimension::new(vec![data.len()]);
        Self {
            data: Arc::new(data),
            dim,
            storage: Storage::Dense,
        }
    }

    /// Creates a dense array from values in canonical (column-major) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length does not match the shape.
    pub fn from_shape_vec(shape: impl Into<Dimension>, data: Vec<T>) -> Result<Self> {
        let dim = shape.into();
        if data.len() != dim.total_elements() {
            return Err(MaxError::shape_mismatch(
                vec![dim.total_elements()],
                vec![data.len()],
            ));
        }
        Ok(Self::dense(dim, data))
    }

    /// Creates a dense array by evaluating `f` at every multi-index.
    pub fn from_shape_fn<F>(shape: impl Into<Dimension>, mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let dim = shape.into();
        let data = (0..dim.total_elements())
            .map(|linear| f(&dim.unravel(linear)))
            .collect();
        Self::dense(dim, data)
    }

    /// Creates a matrix from rows written in reading order.
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(MaxError::shape_mismatch(vec![ncols], vec![bad.len()]));
        }
        Ok(Self::from_shape_fn([nrows, ncols], |idx| rows[idx[0]][idx[1]]))
    }

    /// Creates a dense array from row-major ordered values.
    pub fn from_row_major(shape: impl Into<Dimension>, data: Vec<T>) -> Result<Self> {
        let dim = shape.into();
        if data.len() != dim.total_elements() {
            return Err(MaxError::shape_mismatch(
                vec![dim.total_elements()],
                vec![data.len()],
            ));
        }
        let strides = Stride::row_major(dim.as_slice());
        Ok(Self::from_shape_fn(dim, |idx| {
            let offset: usize = idx.iter().zip(strides.as_slice()).map(|(i, s)| i * s).sum();
            data[offset]
        }))
    }

    /// A single value.
    pub fn scalar(value: T) -> Self {
        Self::dense(Dimension::scalar(), vec![value])
    }

    /// An array without elements.
    pub fn empty(shape: impl Into<Dimension>) -> Self {
        let dim = shape.into();
        debug_assert_eq!(dim.total_elements(), 0);
        Self::dense(dim, Vec::new())
    }

    /// Wraps an already ordered buffer; `data.len()` must equal the element
    /// count of `dim`.
    pub(crate) fn dense(dim: Dimension, data: Vec<T>) -> Self {
        Self {
            data: Arc::new(data),
            dim,
            storage: Storage::Dense,
        }
    }

    /// Assembles an array from a shared buffer and its addressing.
    ///
    /// # Errors
    ///
    /// Returns an error if the addressing does not fit the buffer.
    pub fn from_parts(data: Arc<Vec<T>>, dim: Dimension, storage: Storage) -> Result<Self> {
        match &storage {
            Storage::Dense => {
                if data.len() != dim.total_elements() {
                    return Err(MaxError::shape_mismatch(
                        vec![dim.total_elements()],
                        vec![data.len()],
                    ));
                }
            }
            Storage::Viewed(offsets) => {
                if offsets.dimension() != dim {
                    return Err(MaxError::shape_mismatch(
                        dim.as_slice().to_vec(),
                        offsets.dimension().as_slice().to_vec(),
                    ));
                }
                if !dim.is_empty() && offsets.max_offset() >= data.len() {
                    return Err(MaxError::invalid_shape(format!(
                        "view reaches slot {} of a buffer of length {}",
                        offsets.max_offset(),
                        data.len()
                    )));
                }
            }
        }
        Ok(Self { data, dim, storage })
    }

    /// Returns the dimension.
    pub fn dim(&self) -> &Dimension {
        &self.dim
    }

    /// Returns the axis sizes.
    pub fn shape(&self) -> &[usize] {
        self.dim.as_slice()
    }

    /// Returns the number of axes.
    pub fn ndim(&self) -> usize {
        self.dim.ndim()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.dim.total_elements()
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.dim.is_empty()
    }

    /// Returns `true` if the array holds exactly one element.
    pub fn is_scalar(&self) -> bool {
        self.dim.is_scalar()
    }

    /// Returns the storage addressing.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Returns the shared backing buffer.
    pub fn buffer(&self) -> &[T] {
        &self.data
    }

    /// Returns `true` if both arrays address the same buffer.
    pub fn shares_buffer(&self, other: &NumArray<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Returns the element at the given multi-index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let slot = match &self.storage {
            Storage::Dense => self.dim.linear_index(index)?,
            Storage::Viewed(offsets) => offsets.offset(index)?,
        };
        Ok(self.data[slot])
    }

    /// Returns the element at canonical position `linear`.
    pub fn get_linear(&self, linear: usize) -> Option<T> {
        if linear >= self.len() {
            return None;
        }
        Some(self.at_linear(linear))
    }

    /// Returns the first element, the value of a scalar array.
    pub fn first(&self) -> Option<T> {
        self.get_linear(0)
    }

    #[inline]
    pub(crate) fn at_linear(&self, linear: usize) -> T {
        match &self.storage {
            Storage::Dense => self.data[linear],
            Storage::Viewed(offsets) => self.data[offsets.offset_of_linear(linear)],
        }
    }

    /// Copies the elements out in canonical order.
    pub fn to_vec(&self) -> Vec<T> {
        match &self.storage {
            Storage::Dense => self.data.as_ref().clone(),
            Storage::Viewed(_) => (0..self.len()).map(|i| self.at_linear(i)).collect(),
        }
    }

    /// Returns a dense array with the same values; dense arrays are shared,
    /// views are copied.
    pub fn to_dense(&self) -> NumArray<T> {
        match &self.storage {
            Storage::Dense => self.clone(),
            Storage::Viewed(_) => Self::dense(self.dim.clone(), self.to_vec()),
        }
    }

    /// Copies the values into a buffer taken from `pool`.
    pub(crate) fn copy_with(&self, pool: &BufferPool) -> NumArray<T> {
        let mut out = pool.acquire::<T>(self.len());
        match &self.storage {
            Storage::Dense => out.copy_from_slice(&self.data),
            Storage::Viewed(_) => {
                for (linear, slot) in out.iter_mut().enumerate() {
                    *slot = self.at_linear(linear);
                }
            }
        }
        Self::dense(self.dim.clone(), out)
    }

    /// Hands the backing buffer back to `pool` if this is its last owner.
    pub fn recycle(self, pool: &BufferPool) {
        if let Ok(buffer) = Arc::try_unwrap(self.data) {
            pool.release(buffer);
        }
    }
}

impl<T: Element> PartialEq for NumArray<T> {
    /// Value equality: same shape and same elements in canonical order,
    /// regardless of addressing.
    fn eq(&self, other: &Self) -> bool {
        self.dim.is_same_shape(&other.dim)
            && (0..self.len()).all(|i| self.at_linear(i) == other.at_linear(i))
    }
}

impl<T: Element> fmt::Debug for NumArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumArray")
            .field("dim", &self.dim)
            .field("storage", &self.storage.kind())
            .field("values", &self.to_vec())
            .finish()
    }
}

impl<T: Element> From<Vec<T>> for NumArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
