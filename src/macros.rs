//! Macros for building arrays with a literal syntax and for deriving
//! [`crate::Element`] on the primitive numeric kinds.

/// Creates a dense [`NumArray`](crate::NumArray) from a literal.
///
/// Nested rows are read in the order they are written (row by row) and
/// stored in the crate's canonical column-major order.
///
/// # Examples
/// ```
/// use ndmax::numarray;
///
/// // Create a vector
/// let v = numarray![1.0, 2.0, 3.0];
/// assert_eq!(v.shape(), &[3]);
///
/// // Create a matrix
/// let m = numarray![[1, 5, 3], [4, 2, 6]];
/// assert_eq!(m.shape(), &[2, 3]);
/// assert_eq!(m.get(&[1, 0]).unwrap(), 4);
/// ```
#[macro_export]
macro_rules! numarray {
    // Handle 2D case
    ($([$($x:expr),* $(,)?]),+ $(,)?) => {
        $crate::NumArray::from_rows(&[$(&[$($x),*][..]),+])
            .expect("rows of a numarray! literal must have equal length")
    };

    // Handle 1D case
    ($($x:expr),+ $(,)?) => {
        $crate::NumArray::from_vec(vec![$($x),+])
    };
}

/// Implements [`Element`](crate::Element) for primitive numeric kinds.
///
/// Integers start reductions at `MIN`, floats at negative infinity.
macro_rules! impl_real_element {
    (@impl $t:ty, $min:expr) => {
        impl $crate::element::Element for $t {
            type Key = $t;

            #[inline]
            fn key(&self) -> $t {
                *self
            }

            #[inline]
            fn min_key() -> $t {
                $min
            }

            #[inline]
            fn greater(&self, other: &Self) -> bool {
                *self > *other
            }

            #[inline]
            fn zero() -> Self {
                <$t as num_traits::Zero>::zero()
            }

            #[inline]
            fn from_index(index: usize) -> Self {
                num_traits::cast::<usize, $t>(index).unwrap_or(<$t>::MAX)
            }
        }
    };
    ($($t:ty),+ => integer) => {
        $(
            impl_real_element!(@impl $t, <$t>::MIN);
        )+
    };
    ($($t:ty),+ => float) => {
        $(
            impl_real_element!(@impl $t, <$t>::NEG_INFINITY);
        )+
    };
}
