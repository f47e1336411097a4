//! Value equality
//!
//! Two values bound to the same key are compared in one of two ways:
//! - By checksum, when both values can produce one. Large values compare in
//!   O(hash size) instead of O(value size).
//! - Structurally otherwise. This is only as good as the value's `PartialEq`.
//!
//! Comparison is binary: a match, or a [`Mismatch`] explaining why not.

use crate::Mismatch;

/// Content hash capability for cheap equality
pub trait Checksummed {
    /// Digest of the value's content
    fn sum(&self) -> Vec<u8>;
}

/// A value that can be stored in a reconciled state.
///
/// Plain data only needs `impl Comparable for T {}`. Values that carry a
/// content hash override [`Comparable::checksum`].
pub trait Comparable: PartialEq {
    /// Content checksum, if this value has one
    fn checksum(&self) -> Option<Vec<u8>> {
        None
    }

    /// Structural equality fallback
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! impl_comparable {
    ($($t:ty),* $(,)?) => {
        $(impl Comparable for $t {})*
    };
}

impl_comparable!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String, Vec<u8>, &str, ()
);

impl<T: Comparable> Comparable for Option<T> {
    fn checksum(&self) -> Option<Vec<u8>> {
        self.as_ref().and_then(Comparable::checksum)
    }

    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Adapter exposing a [`Checksummed`] value's sum to the comparator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summed<T>(pub T);

impl<T: Checksummed + PartialEq> Comparable for Summed<T> {
    fn checksum(&self) -> Option<Vec<u8>> {
        Some(self.0.sum())
    }
}

/// Equality strategy used by the differ
pub trait Comparator<V: ?Sized> {
    /// Compare the current value against the desired one
    fn compare(&self, current: &V, desired: &V) -> Result<(), Mismatch>;
}

impl<V: ?Sized, C: Comparator<V> + ?Sized> Comparator<V> for &C {
    fn compare(&self, current: &V, desired: &V) -> Result<(), Mismatch> {
        (**self).compare(current, desired)
    }
}

/// Checksums when both sides have one, structural equality otherwise
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultComparator;

impl<V: Comparable + ?Sized> Comparator<V> for DefaultComparator {
    fn compare(&self, current: &V, desired: &V) -> Result<(), Mismatch> {
        match (current.checksum(), desired.checksum()) {
            (Some(a), Some(b)) => {
                if a == b {
                    Ok(())
                } else {
                    Err(Mismatch::checksum(&a, &b))
                }
            }
            _ => {
                if current.same_as(desired) {
                    Ok(())
                } else {
                    Err(Mismatch::Structural)
                }
            }
        }
    }
}

/// Plain `PartialEq`, ignoring any checksum
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralComparator;

impl<V: PartialEq + ?Sized> Comparator<V> for StructuralComparator {
    fn compare(&self, current: &V, desired: &V) -> Result<(), Mismatch> {
        if current == desired {
            Ok(())
        } else {
            Err(Mismatch::Structural)
        }
    }
}

/// Always compares checksums
#[derive(Clone, Copy, Debug, Default)]
pub struct ChecksumComparator;

impl<V: Checksummed + ?Sized> Comparator<V> for ChecksumComparator {
    fn compare(&self, current: &V, desired: &V) -> Result<(), Mismatch> {
        let a = current.sum();
        let b = desired.sum();
        if a == b {
            Ok(())
        } else {
            Err(Mismatch::checksum(&a, &b))
        }
    }
}

/// Caller-supplied equality function
pub struct FnComparator<F>(pub F);

impl<V: ?Sized, F: Fn(&V, &V) -> bool> Comparator<V> for FnComparator<F> {
    fn compare(&self, current: &V, desired: &V) -> Result<(), Mismatch> {
        if (self.0)(current, desired) {
            Ok(())
        } else {
            Err(Mismatch::Structural)
        }
    }
}
