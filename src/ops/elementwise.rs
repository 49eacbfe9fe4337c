//! Element-wise maximum of two arrays, or of an array and a scalar.

use crate::array::NumArray;
use crate::dimension::Dimension;
use crate::element::Element;
use crate::error::{MaxError, Result};
use crate::storage::{BufferPool, IndexOffset, Storage};

use super::traverse::{axis_table, lead_axis_order, Odometer};

/// The greater of `a` and `b`, `b` on ties.
#[inline]
fn pick<T: Element>(a: T, b: T) -> T {
    if a.greater(&b) {
        a
    } else {
        b
    }
}

/// Computes the element-wise maximum of `a` and `b`.
///
/// A one-element operand is broadcast against the other; otherwise the
/// shapes must match exactly. An empty operand gives an empty result. The
/// output is always dense and its buffer comes from `pool`, except when
/// both operands are scalars.
///
/// # Errors
///
/// Returns [`MaxError::ShapeMismatch`] if neither operand is a scalar and
/// their shapes differ.
pub fn max_elementwise<T: Element>(
    a: &NumArray<T>,
    b: &NumArray<T>,
    pool: &BufferPool,
) -> Result<NumArray<T>> {
    if a.is_empty() {
        return Ok(NumArray::empty(a.dim().clone()));
    }
    if b.is_empty() {
        return Ok(NumArray::empty(b.dim().clone()));
    }

    match (a.first(), b.first()) {
        (Some(x), Some(y)) if a.is_scalar() && b.is_scalar() => {
            Ok(NumArray::dense(a.dim().clone(), vec![pick(x, y)]))
        }
        (Some(x), _) if a.is_scalar() => Ok(broadcast_scalar(b, pool, |y| pick(x, y))),
        (_, Some(y)) if b.is_scalar() => Ok(broadcast_scalar(a, pool, |x| pick(x, y))),
        _ => {
            let dim = broadcast_shape(a.dim(), b.dim())?;
            Ok(broadcast_pair(a, b, &dim, pool))
        }
    }
}

/// Applies `f` to every element of `array`.
fn broadcast_scalar<T, F>(array: &NumArray<T>, pool: &BufferPool, f: F) -> NumArray<T>
where
    T: Element,
    F: Fn(T) -> T,
{
    let dim = array.dim();
    let data = array.buffer();
    let mut out = pool.acquire::<T>(array.len());
    log::trace!(
        "max_elementwise: scalar against {} {}",
        array.storage().kind(),
        dim
    );

    match array.storage() {
        Storage::Dense => {
            for (slot, &value) in out.iter_mut().zip(data) {
                *slot = f(value);
            }
        }
        Storage::Viewed(offsets) => {
            let out_offsets = IndexOffset::dense(dim);
            let order = lead_axis_order(dim);
            if order.len() <= 2 {
                let lead = order[0];
                let other = order.get(1).copied().unwrap_or(lead + 1);
                let (src_lead, dst_lead) = (axis_table(offsets, lead), axis_table(&out_offsets, lead));
                let (src_other, dst_other) =
                    (axis_table(offsets, other), axis_table(&out_offsets, other));
                for (&src_base, &dst_base) in src_other.iter().zip(dst_other) {
                    for (&src, &dst) in src_lead.iter().zip(dst_lead) {
                        out[dst_base + dst] = f(data[src_base + src]);
                    }
                }
            } else {
                let axes = order
                    .iter()
                    .map(|&k| [offsets.table(k), out_offsets.table(k)])
                    .collect();
                let mut odometer = Odometer::new(axes);
                loop {
                    let [src, dst] = odometer.cursors();
                    out[dst] = f(data[src]);
                    if !odometer.advance() {
                        break;
                    }
                }
            }
        }
    }

    NumArray::dense(dim.clone(), out)
}

/// Element-wise maximum of two arrays of the same shape.
fn broadcast_pair<T: Element>(
    a: &NumArray<T>,
    b: &NumArray<T>,
    dim: &Dimension,
    pool: &BufferPool,
) -> NumArray<T> {
    let mut out = pool.acquire::<T>(dim.total_elements());
    let (da, db) = (a.buffer(), b.buffer());
    log::trace!(
        "max_elementwise: {}/{} {}",
        a.storage().kind(),
        b.storage().kind(),
        dim
    );

    match (a.storage(), b.storage()) {
        (Storage::Dense, Storage::Dense) => {
            for ((slot, &x), &y) in out.iter_mut().zip(da).zip(db) {
                *slot = pick(x, y);
            }
        }
        (Storage::Dense, Storage::Viewed(offsets)) => {
            dense_with_view(&mut out, offsets, |i, v| pick(da[i], db[v]));
        }
        (Storage::Viewed(offsets), Storage::Dense) => {
            dense_with_view(&mut out, offsets, |i, v| pick(da[v], db[i]));
        }
        (Storage::Viewed(oa), Storage::Viewed(ob)) => {
            let out_offsets = IndexOffset::dense(dim);
            let order = lead_axis_order(dim);
            if order.len() < 3 {
                viewed_pair_matrix(&mut out, &order, [oa, ob, &out_offsets], da, db);
            } else {
                let axes = order
                    .iter()
                    .map(|&k| {
                        [
                            axis_table(oa, k),
                            axis_table(ob, k),
                            out_offsets.table(k),
                        ]
                    })
                    .collect();
                let mut odometer = Odometer::new(axes);
                loop {
                    let [ia, ib, dst] = odometer.cursors();
                    out[dst] = pick(da[ia], db[ib]);
                    if !odometer.advance() {
                        break;
                    }
                }
            }
        }
    }

    NumArray::dense(dim.clone(), out)
}

/// Walks the output linearly while an odometer in canonical order follows
/// the viewed operand. `f` receives the linear position and the view's
/// buffer position.
fn dense_with_view<T, F>(out: &mut [T], offsets: &IndexOffset, f: F)
where
    T: Element,
    F: Fn(usize, usize) -> T,
{
    let axes = (0..offsets.ndim()).map(|k| [offsets.table(k)]).collect();
    let mut odometer = Odometer::new(axes);
    for (i, slot) in out.iter_mut().enumerate() {
        let [v] = odometer.cursors();
        *slot = f(i, v);
        odometer.advance();
    }
}

/// Two views of rank two or less: outer loop over the short axis, inner
/// loop over the long one, each operand through its own tables.
fn viewed_pair_matrix<T: Element>(
    out: &mut [T],
    order: &[usize],
    [oa, ob, oo]: [&IndexOffset; 3],
    da: &[T],
    db: &[T],
) {
    let lead = order[0];
    let other = order.get(1).copied().unwrap_or(lead + 1);
    let (a_lead, b_lead, o_lead) = (axis_table(oa, lead), axis_table(ob, lead), axis_table(oo, lead));
    let (a_other, b_other, o_other) =
        (axis_table(oa, other), axis_table(ob, other), axis_table(oo, other));

    for ((&a_base, &b_base), &o_base) in a_other.iter().zip(b_other).zip(o_other) {
        for ((&ia, &ib), &io) in a_lead.iter().zip(b_lead).zip(o_lead) {
            out[o_base + io] = pick(da[a_base + ia], db[b_base + ib]);
        }
    }
}

/// Shape of the broadcast result, without computing it.
///
/// # Errors
///
/// Returns [`MaxError::ShapeMismatch`] if neither shape is a scalar and the
/// two differ beyond trailing singleton axes.
pub fn broadcast_shape(a: &Dimension, b: &Dimension) -> Result<Dimension> {
    if a.is_empty() {
        return Ok(a.clone());
    }
    if b.is_empty() || a.is_scalar() {
        return Ok(b.clone());
    }
    if b.is_scalar() || a.is_same_shape(b) {
        return Ok(if a.ndim() >= b.ndim() { a.clone() } else { b.clone() });
    }
    Err(MaxError::shape_mismatch(a.as_slice(), b.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PoolConfig;
    use num_complex::Complex32;

    fn pool() -> BufferPool {
        BufferPool::new(PoolConfig::default())
    }

    #[test]
    fn test_scalar_against_matrix() {
        let s = NumArray::scalar(7);
        let b = numarray![[1, 9], [7, 2]];
        let r = max_elementwise(&s, &b, &pool()).unwrap();
        assert_eq!(r, numarray![[7, 9], [7, 7]]);
        let r = max_elementwise(&b, &s, &pool()).unwrap();
        assert_eq!(r, numarray![[7, 9], [7, 7]]);
    }

    #[test]
    fn test_scalar_against_view() {
        let s = NumArray::scalar(4);
        let b = numarray![[1, 9, 3], [7, 2, 5]].transpose();
        let r = max_elementwise(&s, &b, &pool()).unwrap();
        assert!(r.storage().is_dense());
        assert_eq!(r, numarray![[4, 7], [9, 4], [4, 5]]);
    }

    #[test]
    fn test_scalar_against_view_of_three_axes() {
        let a = NumArray::from_shape_fn([2, 3, 4], |i| (i[0] + 2 * i[1] + 6 * i[2]) as i32);
        let view = a.permute(&[2, 0, 1]).unwrap();
        let r = max_elementwise(&view, &NumArray::scalar(10), &pool()).unwrap();
        assert_eq!(r.shape(), &[4, 2, 3]);
        for (i, value) in r.to_vec().into_iter().enumerate() {
            assert_eq!(value, view.get_linear(i).unwrap().max(10));
        }
    }

    #[test]
    fn test_both_scalars() {
        let pool = pool();
        let r = max_elementwise(&NumArray::scalar(2.0), &NumArray::scalar(3.0), &pool).unwrap();
        assert_eq!(r.to_vec(), vec![3.0]);
        assert_eq!(pool.stats().acquired, 0);
    }

    #[test]
    fn test_dense_pair() {
        let a = numarray![[1, 5, 3], [4, 2, 6]];
        let b = numarray![[2, 2, 2], [9, 0, 6]];
        let r = max_elementwise(&a, &b, &pool()).unwrap();
        assert_eq!(r, numarray![[2, 5, 3], [9, 2, 6]]);
    }

    #[test]
    fn test_dense_and_viewed() {
        let a = numarray![[1, 5], [4, 2], [0, 8]];
        let b = numarray![[3, 3, 3], [3, 3, 9]].transpose();
        let expected = numarray![[3, 5], [4, 3], [3, 9]];
        assert_eq!(max_elementwise(&a, &b, &pool()).unwrap(), expected);
        assert_eq!(max_elementwise(&b, &a, &pool()).unwrap(), expected);
    }

    #[test]
    fn test_viewed_pair_matrix() {
        let a = numarray![[1, 4, 0], [5, 2, 8]].transpose();
        let b = numarray![[3, 3], [3, 3], [3, 9]].as_view();
        let r = max_elementwise(&a, &b, &pool()).unwrap();
        assert_eq!(r, numarray![[3, 5], [4, 3], [3, 9]]);
    }

    #[test]
    fn test_viewed_pair_three_axes() {
        let base = NumArray::from_shape_fn([3, 2, 4], |i| (i[0] * 8 + i[1] * 4 + i[2]) as i64);
        let a = base.permute(&[1, 2, 0]).unwrap();
        let b = NumArray::from_shape_fn([2, 4, 3], |i| (20 - i[0] * 3 - i[2]) as i64).as_view();
        let r = max_elementwise(&a, &b, &pool()).unwrap();
        for i in 0..r.len() {
            let expected = a.get_linear(i).unwrap().max(b.get_linear(i).unwrap());
            assert_eq!(r.get_linear(i), Some(expected));
        }
    }

    #[test]
    fn test_trailing_singletons_match() {
        let a = numarray![1, 6, 3];
        let b = NumArray::from_shape_vec([3, 1], vec![4, 4, 4]).unwrap().as_view();
        let r = max_elementwise(&a, &b, &pool()).unwrap();
        assert_eq!(r.to_vec(), vec![4, 6, 4]);
    }

    #[test]
    fn test_views_of_different_rank_take_the_longer_shape() {
        let a = numarray![1, 5, 2].as_view();
        let b = NumArray::from_shape_vec([3, 1, 1], vec![4, 3, 4]).unwrap().as_view();
        let r = max_elementwise(&a, &b, &pool()).unwrap();
        assert_eq!(r.shape(), &[3, 1, 1]);
        assert_eq!(r.to_vec(), vec![4, 5, 4]);
        assert!(r.storage().is_dense());
    }

    #[test]
    fn test_shape_mismatch() {
        let a = NumArray::from_shape_fn([2, 3], |_| 0);
        let b = NumArray::from_shape_fn([3, 2], |_| 0);
        let err = max_elementwise(&a, &b, &pool()).unwrap_err();
        assert_eq!(err, MaxError::shape_mismatch(vec![2, 3], vec![3, 2]));
    }

    #[test]
    fn test_empty_operand() {
        let a = NumArray::<f32>::empty([0]);
        let b = numarray![1.0f32, 2.0];
        assert!(max_elementwise(&a, &b, &pool()).unwrap().is_empty());
        assert!(max_elementwise(&b, &a, &pool()).unwrap().is_empty());
    }

    #[test]
    fn test_complex_uses_native_ordering() {
        let a = numarray![Complex32::new(1.0, 0.0)];
        let b = numarray![Complex32::new(0.0, 5.0)];
        let r = max_elementwise(&a, &b, &pool()).unwrap();
        assert_eq!(r.to_vec(), vec![Complex32::new(1.0, 0.0)]);
    }

    #[test]
    fn test_broadcast_shape() {
        let a = Dimension::from([2, 3]);
        assert_eq!(broadcast_shape(&a, &Dimension::scalar()).unwrap(), a);
        assert_eq!(broadcast_shape(&Dimension::scalar(), &a).unwrap(), a);
        assert!(broadcast_shape(&a, &Dimension::from([3, 2])).is_err());
    }
}
