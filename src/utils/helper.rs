use alloc::vec::Vec;
use core::cmp::Ordering;
use num_traits::Float;

/// Returns a sorted copy of the values
///
/// # Arguments
///
/// * `values` - The values to sort, expected to be finite
///
/// # Returns
///
/// * `Vec<T>` - The values in ascending order
#[inline]
pub fn sorted<T: Float>(values: &[T]) -> Vec<T> {
    let mut buf = values.to_vec();
    buf.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    buf
}

/// Returns the median from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice
///
/// # Returns
///
/// * `Option<T>` - The median, or `None` if the slice is empty
#[inline]
pub fn median_from_sorted_slice<T: Float>(ss: &[T]) -> Option<T> {
    let len = ss.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    let _2 = T::one() + T::one();
    if len % 2 == 0 {
        Some((ss[mid - 1] + ss[mid]) / _2)
    } else {
        Some(ss[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted() {
        assert_eq!(sorted(&[3.0, -1.0, 2.0, 0.0]), vec![-1.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn test_median_from_sorted_slice() {
        assert_eq!(median_from_sorted_slice::<f64>(&[]), None);
        assert_eq!(median_from_sorted_slice(&[4.0]), Some(4.0));
        assert_eq!(median_from_sorted_slice(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median_from_sorted_slice(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
    }
}
