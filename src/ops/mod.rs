//! Maximum operations on arrays.
//!
//! [`reduce_max`] and [`max_elementwise`] are the engines: they take an
//! explicit [`BufferPool`] and trust their arguments. The free functions
//! [`max`], [`max_with_indices`], [`maximum`] and [`maximum_scalar`] are the
//! checked front end over the global pool.

mod elementwise;
mod reduction;
mod traverse;

pub use elementwise::{broadcast_shape, max_elementwise};
pub use reduction::{max_all, reduce_max, ReductionResult};

use crate::array::NumArray;
use crate::element::Element;
use crate::error::{MaxError, Result};
use crate::storage::BufferPool;

/// Trait for binary array operations.
pub trait BinaryOp<T: Element> {
    /// Perform the binary operation and return a new array.
    fn run(&self, lhs: &NumArray<T>, rhs: &NumArray<T>) -> Result<NumArray<T>>;
}

/// Trait for reduction operations.
pub trait ReduceOp<T: Element> {
    /// Reduce along `axis`, or along the first non-singleton axis.
    fn run(&self, array: &NumArray<T>, axis: Option<usize>) -> Result<ReductionResult<T>>;
}

/// The maximum, bound to a buffer pool.
#[derive(Debug, Clone, Copy)]
pub struct MaxOp<'p> {
    pool: &'p BufferPool,
    with_indices: bool,
}

impl<'p> MaxOp<'p> {
    /// A maximum drawing its buffers from `pool`.
    pub fn new(pool: &'p BufferPool) -> Self {
        Self {
            pool,
            with_indices: false,
        }
    }

    /// Also report argmax indices from reductions.
    pub fn with_indices(mut self) -> Self {
        self.with_indices = true;
        self
    }
}

impl MaxOp<'static> {
    /// A maximum over the global pool.
    pub fn global() -> Self {
        Self::new(BufferPool::global())
    }
}

impl<T: Element> BinaryOp<T> for MaxOp<'_> {
    fn run(&self, lhs: &NumArray<T>, rhs: &NumArray<T>) -> Result<NumArray<T>> {
        max_elementwise(lhs, rhs, self.pool)
    }
}

impl<T: Element> ReduceOp<T> for MaxOp<'_> {
    fn run(&self, array: &NumArray<T>, axis: Option<usize>) -> Result<ReductionResult<T>> {
        if let Some(axis) = axis {
            if axis > array.ndim() {
                return Err(MaxError::invalid_axis(axis, array.ndim()));
            }
        }
        Ok(reduce_max(array, self.with_indices, axis, self.pool))
    }
}

/// Maximum along `axis` (the first non-singleton axis when `None`).
///
/// # Errors
///
/// Returns [`MaxError::InvalidAxis`] if `axis` exceeds the rank.
pub fn max<T: Element>(array: &NumArray<T>, axis: Option<usize>) -> Result<NumArray<T>> {
    ReduceOp::run(&MaxOp::global(), array, axis).map(|r| r.values)
}

/// Maximum along `axis` together with the position of each maximum.
///
/// # Errors
///
/// Returns [`MaxError::InvalidAxis`] if `axis` exceeds the rank.
pub fn max_with_indices<T: Element>(
    array: &NumArray<T>,
    axis: Option<usize>,
) -> Result<(NumArray<T>, NumArray<usize>)> {
    let result = ReduceOp::run(&MaxOp::global().with_indices(), array, axis)?;
    let indices = result
        .indices
        .unwrap_or_else(|| NumArray::empty(vec![0]));
    Ok((result.values, indices))
}

/// Element-wise maximum with scalar broadcasting.
///
/// # Errors
///
/// Returns [`MaxError::ShapeMismatch`] if neither operand is a scalar and the
/// shapes differ.
pub fn maximum<T: Element>(a: &NumArray<T>, b: &NumArray<T>) -> Result<NumArray<T>> {
    BinaryOp::run(&MaxOp::global(), a, b)
}

/// Element-wise maximum of an array and a single value.
pub fn maximum_scalar<T: Element>(a: &NumArray<T>, value: T) -> Result<NumArray<T>> {
    maximum(a, &NumArray::scalar(value))
}
