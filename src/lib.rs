//! Maximum kernels for n-dimensional arrays.
//!
//! `ndmax` computes element-wise maxima (with scalar broadcasting) and
//! maxima along an axis (with optional argmax) over arrays that are either
//! dense column-major buffers or zero-copy views addressed through per-axis
//! offset tables. Result buffers are drawn from a reusable [`BufferPool`].
//!
//! ```
//! use ndmax::{numarray, ops};
//!
//! let a = numarray![[1, 5, 3], [4, 2, 6]];
//! let (values, indices) = ops::max_with_indices(&a, Some(0)).unwrap();
//! assert_eq!(values.to_vec(), vec![4, 5, 6]);
//! assert_eq!(indices.to_vec(), vec![1, 0, 1]);
//! ```

#[macro_use]
mod macros;

pub mod array;
pub mod dimension;
pub mod element;
pub mod error;
pub mod ops;
pub mod storage;
pub mod view;

pub use array::NumArray;
pub use dimension::{Dimension, Stride};
pub use element::Element;
pub use error::{MaxError, Result};
pub use ops::{max, max_elementwise, max_with_indices, maximum, maximum_scalar, reduce_max, ReductionResult};
pub use storage::{BufferPool, IndexOffset, PoolConfig, PoolStats, Storage};
pub use view::SliceRange;
