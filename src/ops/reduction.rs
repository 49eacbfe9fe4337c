//! Maximum along one axis, with optional argmax.
//!
//! The traversal is picked from the storage kind and rank of the input:
//! dense arrays are walked as runs (contiguous for axis 0, strided
//! otherwise), views are walked through their offset tables with a
//! dedicated loop for vectors and matrices and an odometer above that.

use crate::array::NumArray;
use crate::element::Element;
use crate::storage::{BufferPool, IndexOffset, Storage};

use super::traverse::Odometer;

/// Output of [`reduce_max`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionResult<T: Element> {
    /// Maxima, with the reduced axis collapsed to size 1.
    pub values: NumArray<T>,
    /// Zero-based position of each maximum along the reduced axis, when
    /// requested.
    pub indices: Option<NumArray<usize>>,
}

impl<T: Element> ReductionResult<T> {
    /// The index array converted to another numeric kind.
    ///
    /// Positions that do not fit a narrow integer kind saturate at its
    /// maximum.
    pub fn indices_as<I: Element>(&self) -> Option<NumArray<I>> {
        self.indices.as_ref().map(|indices| {
            let converted = indices.to_vec().into_iter().map(I::from_index).collect();
            NumArray::dense(indices.dim().clone(), converted)
        })
    }
}

/// Best value seen so far in one reduction run.
///
/// Starts at the minimum key with the first element of the run as its value,
/// and only moves on a strictly greater key, so the first maximum wins.
struct Running<T: Element> {
    key: T::Key,
    value: T,
    index: usize,
}

impl<T: Element> Running<T> {
    #[inline]
    fn start(first: T) -> Self {
        Self {
            key: T::min_key(),
            value: first,
            index: 0,
        }
    }

    #[inline]
    fn offer(&mut self, value: T, index: usize) {
        let key = value.key();
        if key > self.key {
            self.key = key;
            self.value = value;
            self.index = index;
        }
    }
}

/// Output buffers of one reduction.
struct Sink<'a, T: Element> {
    values: &'a mut [T],
    indices: Option<&'a mut [usize]>,
}

impl<T: Element> Sink<'_, T> {
    #[inline]
    fn put(&mut self, slot: usize, best: Running<T>) {
        self.values[slot] = best.value;
        if let Some(indices) = self.indices.as_deref_mut() {
            indices[slot] = best.index;
        }
    }
}

/// Scans one run whose elements sit at `base + table[j]`.
#[inline]
fn scan_table<T: Element>(data: &[T], base: usize, table: &[usize]) -> Running<T> {
    let mut best = Running::start(data[base + table[0]]);
    for (j, &offset) in table.iter().enumerate() {
        best.offer(data[base + offset], j);
    }
    best
}

/// Computes the maximum of `array` along `axis`.
///
/// `axis` defaults to the first non-singleton axis. An axis at or past the
/// rank, or of size 1, reduces nothing and yields a copy of the input. The
/// axis must not exceed the rank; [`super::max`] checks this for callers.
///
/// Output buffers come from `pool`; an empty input returns empty arrays
/// without touching it.
pub fn reduce_max<T: Element>(
    array: &NumArray<T>,
    want_indices: bool,
    axis: Option<usize>,
    pool: &BufferPool,
) -> ReductionResult<T> {
    let dim = array.dim();
    let axis = axis.unwrap_or_else(|| dim.first_non_singleton_axis());

    if array.is_empty() {
        return ReductionResult {
            values: NumArray::empty(dim.clone()),
            indices: want_indices.then(|| NumArray::empty(dim.clone())),
        };
    }

    let axis_len = dim.size(axis);
    if array.is_scalar() || axis_len == 1 {
        log::trace!("reduce_max: identity copy of {} along axis {}", dim, axis);
        let indices = want_indices.then(|| NumArray::dense(dim.clone(), pool.acquire(array.len())));
        return ReductionResult {
            values: array.copy_with(pool),
            indices,
        };
    }

    let out_dim = dim.with_axis_collapsed(axis);
    let out_len = dim.total_elements() / axis_len;
    let mut values = pool.acquire::<T>(out_len);
    let mut indices = want_indices.then(|| pool.acquire::<usize>(out_len));

    {
        let mut sink = Sink {
            values: &mut values,
            indices: indices.as_deref_mut(),
        };
        let data = array.buffer();
        log::trace!(
            "reduce_max: {} {} along axis {} into {} runs",
            array.storage().kind(),
            dim,
            axis,
            out_len
        );
        match array.storage() {
            Storage::Dense if axis == 0 => dense_leading(data, axis_len, &mut sink),
            Storage::Dense => {
                dense_strided(data, axis_len, dim.sequential_index_distance(axis), &mut sink)
            }
            Storage::Viewed(offsets) => match offsets.ndim() {
                1 => {
                    let best = scan_table(data, 0, offsets.table(0));
                    sink.put(0, best);
                }
                2 => viewed_matrix(data, offsets, axis, &mut sink),
                _ => viewed_general(data, offsets, axis, &out_dim, &mut sink),
            },
        }
    }

    ReductionResult {
        values: NumArray::dense(out_dim.clone(), values),
        indices: indices.map(|indices| NumArray::dense(out_dim, indices)),
    }
}

/// Dense input reduced along axis 0: every run is contiguous.
fn dense_leading<T: Element>(data: &[T], axis_len: usize, sink: &mut Sink<'_, T>) {
    for (slot, run) in data.chunks_exact(axis_len).enumerate() {
        let mut best = Running::start(run[0]);
        for (j, &value) in run.iter().enumerate() {
            best.offer(value, j);
        }
        sink.put(slot, best);
    }
}

/// Dense input reduced along a higher axis.
///
/// Runs are interleaved with `stride` slots between consecutive elements.
/// Each block of `axis_len * stride` input slots feeds `stride` outputs; the
/// block is read row by row so input access stays sequential.
fn dense_strided<T: Element>(data: &[T], axis_len: usize, stride: usize, sink: &mut Sink<'_, T>) {
    let block_len = axis_len * stride;
    let mut keys = vec![T::min_key(); stride];

    for (block_index, block) in data.chunks_exact(block_len).enumerate() {
        let out_base = block_index * stride;
        keys.fill(T::min_key());
        for (l, &value) in block[..stride].iter().enumerate() {
            sink.values[out_base + l] = value;
            if let Some(indices) = sink.indices.as_deref_mut() {
                indices[out_base + l] = 0;
            }
        }

        for (j, row) in block.chunks_exact(stride).enumerate() {
            for (l, &value) in row.iter().enumerate() {
                let key = value.key();
                if key > keys[l] {
                    keys[l] = key;
                    sink.values[out_base + l] = value;
                    if let Some(indices) = sink.indices.as_deref_mut() {
                        indices[out_base + l] = j;
                    }
                }
            }
        }
    }
}

/// Viewed matrix: the other axis drives the outer loop, the reduced axis's
/// table the inner scan.
fn viewed_matrix<T: Element>(
    data: &[T],
    offsets: &IndexOffset,
    axis: usize,
    sink: &mut Sink<'_, T>,
) {
    let inner = offsets.table(axis);
    let outer = offsets.table(1 - axis);
    for (slot, &base) in outer.iter().enumerate() {
        let best = scan_table(data, base, inner);
        sink.put(slot, best);
    }
}

/// Viewed array of any rank: an odometer over the remaining axes moves the
/// input and output cursors together.
fn viewed_general<T: Element>(
    data: &[T],
    offsets: &IndexOffset,
    axis: usize,
    out_dim: &crate::dimension::Dimension,
    sink: &mut Sink<'_, T>,
) {
    let out_offsets = IndexOffset::dense(out_dim);
    let inner = offsets.table(axis);
    let axes = (0..offsets.ndim())
        .filter(|&k| k != axis)
        .map(|k| [offsets.table(k), out_offsets.table(k)])
        .collect();
    let mut odometer = Odometer::new(axes);
    loop {
        let [base, slot] = odometer.cursors();
        let best = scan_table(data, base, inner);
        sink.put(slot, best);
        if !odometer.advance() {
            break;
        }
    }
}

/// Maximum over every element, with its canonical position.
pub fn max_all<T: Element>(array: &NumArray<T>) -> Option<(T, usize)> {
    let first = array.first()?;
    let mut best = Running::start(first);
    match array.storage() {
        Storage::Dense => {
            for (i, &value) in array.buffer().iter().enumerate() {
                best.offer(value, i);
            }
        }
        Storage::Viewed(_) => {
            for i in 0..array.len() {
                best.offer(array.at_linear(i), i);
            }
        }
    }
    Some((best.value, best.index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PoolConfig;
    use num_complex::Complex64;

    fn pool() -> BufferPool {
        BufferPool::new(PoolConfig::default())
    }

    #[test]
    fn test_matrix_along_rows() {
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        let r = reduce_max(&a, true, Some(0), &pool());
        assert_eq!(r.values.shape(), &[1, 3]);
        assert_eq!(r.values.to_vec(), vec![4, 5, 6]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![1, 0, 1]);
    }

    #[test]
    fn test_matrix_along_columns() {
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        let r = reduce_max(&a, true, Some(1), &pool());
        assert_eq!(r.values.shape(), &[2, 1]);
        assert_eq!(r.values.to_vec(), vec![5, 6]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_default_axis_is_first_non_singleton() {
        let row = numarray![[3.0, 9.0, 1.0]];
        let r = reduce_max(&row, true, None, &pool());
        assert_eq!(r.values.shape(), &[1, 1]);
        assert_eq!(r.values.first(), Some(9.0));
        assert_eq!(r.indices.unwrap().first(), Some(1));
    }

    #[test]
    fn test_viewed_matrix_matches_dense() {
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        let t = a.transpose();
        let r = reduce_max(&t, true, Some(1), &pool());
        assert_eq!(r.values.to_vec(), vec![4, 5, 6]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![1, 0, 1]);

        let r = reduce_max(&t, false, Some(0), &pool());
        assert_eq!(r.values.to_vec(), vec![5, 6]);
        assert!(r.indices.is_none());
    }

    #[test]
    fn test_viewed_vector() {
        let a = numarray![2, 8, 8, 1].slice_axis(0, 1usize..).unwrap();
        let r = reduce_max(&a, true, Some(0), &pool());
        assert_eq!(r.values.to_vec(), vec![8]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![0]);
    }

    #[test]
    fn test_three_axes_dense_and_viewed_agree() {
        let a = NumArray::from_shape_fn([3, 4, 2], |i| ((i[0] * 7 + i[1] * 5 + i[2] * 3) % 11) as i32);
        let view = a.as_view();
        for axis in 0..3 {
            let dense = reduce_max(&a, true, Some(axis), &pool());
            let viewed = reduce_max(&view, true, Some(axis), &pool());
            assert_eq!(dense, viewed, "axis {}", axis);
        }
    }

    #[test]
    fn test_dense_strided_three_axes_by_hand() {
        // a[i, j, k] = i + 10 j + 100 k, largest along axis 1 is j = 2.
        let a = NumArray::from_shape_fn([2, 3, 2], |i| (i[0] + 10 * i[1] + 100 * i[2]) as i64);
        let r = reduce_max(&a, true, Some(1), &pool());
        assert_eq!(r.values.shape(), &[2, 1, 2]);
        assert_eq!(r.values.to_vec(), vec![20, 21, 120, 121]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_ties_keep_first_index() {
        let a = numarray![[7, 1], [7, 9], [2, 9]];
        let r = reduce_max(&a, true, Some(0), &pool());
        assert_eq!(r.values.to_vec(), vec![7, 9]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_integer_minimum_values() {
        let a = numarray![i32::MIN, i32::MIN];
        let r = reduce_max(&a, true, None, &pool());
        assert_eq!(r.values.to_vec(), vec![i32::MIN]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![0]);
    }

    #[test]
    fn test_complex_reduction_uses_magnitude() {
        let a = numarray![
            Complex64::new(3.0, 0.0),
            Complex64::new(0.0, -4.0),
            Complex64::new(1.0, 1.0)
        ];
        let r = reduce_max(&a, true, None, &pool());
        assert_eq!(r.values.to_vec(), vec![Complex64::new(0.0, -4.0)]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![1]);
    }

    #[test]
    fn test_singleton_axis_is_identity_copy() {
        let a = numarray![[1, 2, 3]];
        let r = reduce_max(&a, true, Some(0), &pool());
        assert_eq!(r.values, a);
        assert!(!r.values.shares_buffer(&a));
        assert_eq!(r.indices.unwrap().to_vec(), vec![0, 0, 0]);

        let r = reduce_max(&a, false, Some(2), &pool());
        assert_eq!(r.values, a);
    }

    #[test]
    fn test_scalar_is_identity() {
        let s = NumArray::scalar(4.5f32);
        let r = reduce_max(&s, true, None, &pool());
        assert_eq!(r.values.to_vec(), vec![4.5]);
        assert_eq!(r.indices.unwrap().to_vec(), vec![0]);
    }

    #[test]
    fn test_empty_input_skips_pool() {
        let pool = pool();
        let a = NumArray::<f64>::empty([0, 3]);
        let r = reduce_max(&a, true, Some(1), &pool);
        assert!(r.values.is_empty());
        assert!(r.indices.unwrap().is_empty());
        assert_eq!(pool.stats().acquired, 0);
    }

    #[test]
    fn test_output_buffers_come_from_pool() {
        let pool = pool();
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        let r = reduce_max(&a, true, Some(0), &pool);
        assert_eq!(pool.stats().acquired, 2);
        r.values.recycle(&pool);
        let _ = reduce_max(&a, false, Some(0), &pool);
        assert_eq!(pool.stats().reused, 1);
    }

    #[test]
    fn test_indices_as_float() {
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        let r = reduce_max(&a, true, Some(0), &pool());
        let idx = r.indices_as::<f64>().unwrap();
        assert_eq!(idx.to_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_indices_as_narrow_kind_saturates() {
        let a = NumArray::from_shape_fn([300], |i| i[0] as i32);
        let r = reduce_max(&a, true, None, &pool());
        assert_eq!(r.indices_as::<u8>().unwrap().to_vec(), vec![u8::MAX]);
        assert_eq!(r.indices_as::<i16>().unwrap().to_vec(), vec![299]);
    }

    #[test]
    fn test_max_all() {
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        assert_eq!(max_all(&a), Some((6, 5)));
        assert_eq!(max_all(&a.transpose()), Some((6, 5)));
        assert_eq!(max_all(&NumArray::<u8>::empty([0])), None);
    }
}
