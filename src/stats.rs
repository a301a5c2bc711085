//! Statistical primitives over already-unmasked samples.
//!
//! Every function takes the surviving values of a [`MaskedArray`](crate::MaskedArray)
//! (see [`MaskedArray::compressed`](crate::MaskedArray::compressed)) and returns `None`
//! when the statistic is undefined, most commonly for an empty sample. The sums are
//! accumulated with Kahan-Babuska-Neumaier compensation so that large frames of nearly
//! equal pixel values do not lose precision.

use alloc::vec::Vec;
use num_traits::Float;

use crate::{
    Kbn,
    helper::{median_from_sorted_slice, sorted},
};

/// Scale factor turning the median absolute deviation into a consistent
/// estimator of the standard deviation of a normal distribution, `1 / Φ⁻¹(3/4)`.
pub const MAD_TO_STD: f64 = 1.482_602_218_505_602;

/// Default biweight tuning constant for location estimates
pub const BIWEIGHT_LOCATION_C: f64 = 6.0;

/// Default biweight tuning constant for midvariance estimates
pub const BIWEIGHT_MIDVARIANCE_C: f64 = 9.0;

/// Returns the arithmetic mean of the sample
///
/// # Arguments
///
/// * `values` - The sample
///
/// # Returns
///
/// * `Option<T>` - The mean, or `None` if the sample is empty
///
/// # Examples
///
/// ```
/// # use background_statistics::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
/// assert_eq!(mean::<f64>(&[]), None);
/// ```
pub fn mean<T: Float + Default>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let mut sum = Kbn::<T>::default();
    for &v in values {
        sum += v;
    }
    T::from(values.len()).map(|n| sum.total() / n)
}

/// Returns the median of the sample, averaging the two middle values for even sizes
///
/// # Arguments
///
/// * `values` - The sample
///
/// # Returns
///
/// * `Option<T>` - The median, or `None` if the sample is empty
pub fn median<T: Float>(values: &[T]) -> Option<T> {
    median_from_sorted_slice(&sorted(values))
}

/// Returns the population standard deviation (zero delta degrees of freedom)
///
/// # Arguments
///
/// * `values` - The sample
///
/// # Returns
///
/// * `Option<T>` - The standard deviation, or `None` if the sample is empty
///
/// # Examples
///
/// ```
/// # use background_statistics::stats::std_dev;
/// # use assert_approx_eq::assert_approx_eq;
/// let sd = std_dev(&[2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert_approx_eq!(sd, 2.0_f64, 1e-12);
/// ```
pub fn std_dev<T: Float + Default>(values: &[T]) -> Option<T> {
    let mean = mean(values)?;
    let mut sum_sq = Kbn::<T>::default();
    for &v in values {
        let d = v - mean;
        sum_sq += d * d;
    }
    let n = T::from(values.len())?;
    Some((sum_sq.total() / n).sqrt())
}

/// Returns the median absolute deviation from the sample median
///
/// # Arguments
///
/// * `values` - The sample
///
/// # Returns
///
/// * `Option<T>` - The MAD, or `None` if the sample is empty
pub fn median_absolute_deviation<T: Float>(values: &[T]) -> Option<T> {
    median_absolute_deviation_around(values, median(values)?)
}

/// Returns the median absolute deviation from a known center
///
/// Callers that already hold the sample median pass it here to avoid sorting
/// the sample a second time.
///
/// # Arguments
///
/// * `values` - The sample
/// * `center` - The point deviations are measured from
///
/// # Returns
///
/// * `Option<T>` - The MAD, or `None` if the sample is empty
pub fn median_absolute_deviation_around<T: Float>(values: &[T], center: T) -> Option<T> {
    let deviations: Vec<T> = values.iter().map(|&v| (v - center).abs()).collect();
    median(&deviations)
}

/// Returns the standard deviation estimated from the median absolute deviation
///
/// Computed as [`MAD_TO_STD`] times the MAD, which is consistent with the
/// standard deviation for normally distributed data while ignoring outliers.
///
/// # Arguments
///
/// * `values` - The sample
///
/// # Returns
///
/// * `Option<T>` - The robust standard deviation, or `None` if the sample is empty
pub fn mad_std<T: Float>(values: &[T]) -> Option<T> {
    Some(median_absolute_deviation(values)? * T::from(MAD_TO_STD)?)
}

// Median location guess and the MAD around the sample median, shared by both
// biweight estimators.
fn biweight_setup<T: Float>(values: &[T], location: Option<T>) -> Option<(T, T)> {
    let center = median(values)?;
    let mad = median_absolute_deviation_around(values, center)?;
    Some((location.unwrap_or(center), mad))
}

/// Returns the biweight location of the sample
///
/// Values further than `c` median absolute deviations from the initial guess get
/// zero weight; the remaining ones are weighted by `(1 - u²)²`, where `u` is the
/// scaled distance from the guess.
///
/// # Arguments
///
/// * `values` - The sample
/// * `c` - The tuning constant, usually [`BIWEIGHT_LOCATION_C`]
/// * `location` - The initial guess, or `None` to start from the median
///
/// # Returns
///
/// * `Option<T>` - The location, or `None` if the sample is empty or no value lies
///   within the cutoff of the initial guess. A sample with zero MAD yields the
///   initial guess unchanged.
pub fn biweight_location<T: Float + Default>(
    values: &[T],
    c: T,
    location: Option<T>,
) -> Option<T> {
    let (m, mad) = biweight_setup(values, location)?;
    if mad == T::zero() {
        return Some(m);
    }

    let mut num = Kbn::<T>::default();
    let mut den = Kbn::<T>::default();
    for &v in values {
        let d = v - m;
        let u = d / (c * mad);
        if u.abs() < T::one() {
            let w = (T::one() - u * u).powi(2);
            num += d * w;
            den += w;
        }
    }

    let den = den.total();
    if den == T::zero() {
        return None;
    }
    Some(m + num.total() / den)
}

/// Returns the biweight midvariance scale of the sample
///
/// This is the square root form, directly comparable to a standard deviation:
///
/// `sqrt(n · Σ d²(1 - u²)⁴) / |Σ (1 - u²)(1 - 5u²)|`
///
/// where the sums and the count `n` run over the values with `|u| < 1`.
///
/// # Arguments
///
/// * `values` - The sample
/// * `c` - The tuning constant, usually [`BIWEIGHT_MIDVARIANCE_C`]
/// * `location` - The initial guess, or `None` to start from the median
///
/// # Returns
///
/// * `Option<T>` - The scale, `Some(0)` for a sample with zero MAD, or `None`
///   if the sample is empty or the weights cancel out
pub fn biweight_midvariance<T: Float + Default>(
    values: &[T],
    c: T,
    location: Option<T>,
) -> Option<T> {
    let (m, mad) = biweight_setup(values, location)?;
    if mad == T::zero() {
        return Some(T::zero());
    }

    let _5 = T::from(5.0)?;
    let mut n = 0_usize;
    let mut num = Kbn::<T>::default();
    let mut den = Kbn::<T>::default();
    for &v in values {
        let d = v - m;
        let u = d / (c * mad);
        if u.abs() < T::one() {
            let u2 = u * u;
            n += 1;
            num += d * d * (T::one() - u2).powi(4);
            den += (T::one() - u2) * (T::one() - _5 * u2);
        }
    }

    let den = den.total().abs();
    if den == T::zero() {
        return None;
    }
    let n = T::from(n)?;
    Some((n * num.total()).sqrt() / den)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[-2.5_f32]), Some(-2.5));
        assert_eq!(mean::<f64>(&[]), None);
    }

    #[test]
    fn test_mean_is_compensated() {
        let inputs = [1_000_000.1, 1_000_000.2, 1_000_000.3];
        assert_approx_eq!(mean(&inputs).unwrap(), 1_000_000.2, 1e-6);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median::<f64>(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_approx_eq!(std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 2.0_f64.sqrt());
        assert_eq!(std_dev(&[7.0, 7.0, 7.0]), Some(0.0));
        assert_eq!(std_dev::<f64>(&[]), None);
    }

    #[test]
    fn test_median_absolute_deviation() {
        assert_eq!(
            median_absolute_deviation(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]),
            Some(1.5)
        );
        assert_eq!(median_absolute_deviation(&[3.0, 3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn test_mad_std() {
        let rms = mad_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_approx_eq!(rms, MAD_TO_STD);
        assert_eq!(mad_std::<f64>(&[]), None);
    }

    #[test]
    fn test_biweight_location_symmetric() {
        assert_approx_eq!(
            biweight_location(&[1.0, 2.0, 3.0, 4.0, 5.0], 6.0, None).unwrap(),
            3.0
        );
    }

    #[test]
    fn test_biweight_location_ignores_outlier() {
        let loc = biweight_location(&[1.0, 2.0, 3.0, 4.0, 5.0, 1000.0], 6.0, None).unwrap();
        assert_approx_eq!(loc, 3.0498520671327207, 1e-12);
    }

    #[test]
    fn test_biweight_location_initial_guess() {
        let loc = biweight_location(&[1.0, 2.0, 3.0, 4.0, 5.0], 6.0, Some(2.0)).unwrap();
        assert_approx_eq!(loc, 2.7701400254591744, 1e-12);
    }

    #[test]
    fn test_biweight_location_zero_mad() {
        assert_eq!(
            biweight_location(&[2.0, 2.0, 2.0, 9.0], 6.0, None),
            Some(2.0)
        );
        assert_eq!(biweight_location::<f64>(&[], 6.0, None), None);
    }

    #[test]
    fn test_biweight_location_guess_outside_cutoff() {
        assert_eq!(
            biweight_location(&[1.0, 2.0, 3.0, 4.0, 5.0], 6.0, Some(1000.0)),
            None
        );
    }

    #[test]
    fn test_median_absolute_deviation_around() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        assert_eq!(median_absolute_deviation_around(&values, 3.5), Some(1.5));
        assert_eq!(median_absolute_deviation_around(&values, 0.0), Some(3.5));
        assert_eq!(median_absolute_deviation_around::<f64>(&[], 0.0), None);
    }

    #[test]
    fn test_biweight_midvariance() {
        let s = biweight_midvariance(&[1.0, 2.0, 3.0, 4.0, 5.0], 9.0, None).unwrap();
        assert_approx_eq!(s, 1.5156068063180559, 1e-12);
        let s = biweight_midvariance(&[1.0, 2.0, 3.0, 4.0, 5.0, 1000.0], 9.0, None).unwrap();
        assert_approx_eq!(s, 1.5412024557925599, 1e-12);
    }

    #[test]
    fn test_biweight_midvariance_zero_mad() {
        assert_eq!(
            biweight_midvariance(&[4.0, 4.0, 4.0], 9.0, None),
            Some(0.0)
        );
        assert_eq!(biweight_midvariance::<f64>(&[], 9.0, None), None);
    }
}
