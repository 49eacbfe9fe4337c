//! Numeric element kinds understood by the max kernels.
//!
//! Every algorithm in [`crate::ops`] is written once, generic over
//! [`Element`]. The trait carries the few facts that differ between numeric
//! kinds: how a reduction compares two values, where a reduction starts, and
//! what "greater" means for the element-wise maximum.

use std::fmt::Debug;

use num_complex::{Complex32, Complex64};

/// A numeric kind that can be stored in a [`crate::NumArray`].
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// The value a reduction compares. Reals compare themselves, complex
    /// values compare their magnitude.
    type Key: PartialOrd + Copy + Debug;

    /// Returns the reduction key of this value.
    fn key(&self) -> Self::Key;

    /// The smallest key; every reduction run starts here.
    fn min_key() -> Self::Key;

    /// Element-wise ordering used by the broadcasting maximum.
    fn greater(&self, other: &Self) -> bool;

    /// The additive identity, used to initialise pooled buffers.
    fn zero() -> Self;

    /// Converts a zero-based position into this kind, for index arrays.
    ///
    /// Integer kinds too narrow for `index` saturate at their maximum.
    fn from_index(index: usize) -> Self;

    /// Returns the larger of `self` and `other`, preferring `self` on ties.
    #[inline]
    fn max_with(self, other: Self) -> Self {
        if other.greater(&self) {
            other
        } else {
            self
        }
    }
}

impl_real_element!(i8, i16, i32, i64, u8, u16, u32, u64, usize => integer);
impl_real_element!(f32, f64 => float);

impl Element for Complex32 {
    type Key = f32;

    #[inline]
    fn key(&self) -> f32 {
        self.norm()
    }

    #[inline]
    fn min_key() -> f32 {
        0.0
    }

    #[inline]
    fn greater(&self, other: &Self) -> bool {
        self.re > other.re || (self.re == other.re && self.im > other.im)
    }

    fn zero() -> Self {
        Complex32::new(0.0, 0.0)
    }

    fn from_index(index: usize) -> Self {
        Complex32::new(index as f32, 0.0)
    }
}

impl Element for Complex64 {
    type Key = f64;

    #[inline]
    fn key(&self) -> f64 {
        self.norm()
    }

    #[inline]
    fn min_key() -> f64 {
        0.0
    }

    #[inline]
    fn greater(&self, other: &Self) -> bool {
        self.re > other.re || (self.re == other.re && self.im > other.im)
    }

    fn zero() -> Self {
        Complex64::new(0.0, 0.0)
    }

    fn from_index(index: usize) -> Self {
        Complex64::new(index as f64, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_keys() {
        assert_eq!(3i32.key(), 3);
        assert_eq!(i32::min_key(), i32::MIN);
        assert_eq!(u8::min_key(), 0);
        assert_eq!(f64::min_key(), f64::NEG_INFINITY);
        assert!(2.0f32.greater(&1.0));
        assert!(!1.0f32.greater(&1.0));
    }

    #[test]
    fn test_complex_key_is_magnitude() {
        let a = Complex64::new(3.0, 4.0);
        assert_eq!(a.key(), 5.0);
        assert_eq!(Complex64::min_key(), 0.0);
    }

    #[test]
    fn test_complex_greater_is_lexicographic() {
        let big_magnitude = Complex64::new(0.0, 10.0);
        let small_magnitude = Complex64::new(1.0, 0.0);
        assert!(small_magnitude.greater(&big_magnitude));
        assert!(Complex64::new(1.0, 2.0).greater(&Complex64::new(1.0, 1.0)));
    }

    #[test]
    fn test_max_with_prefers_self_on_ties() {
        assert_eq!(4i64.max_with(4), 4);
        assert_eq!(1u16.max_with(9), 9);
        assert_eq!(f64::from_index(3), 3.0);
        assert_eq!(u8::from_index(300), u8::MAX);
        assert_eq!(i8::from_index(128), i8::MAX);
        assert_eq!(i8::from_index(127), 127);
    }
}
