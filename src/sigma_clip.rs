use alloc::vec::Vec;
use log::{debug, trace};
use num_traits::Float;

use crate::{
    BackgroundError, MaskedArray,
    stats::{MAD_TO_STD, mean, median, median_absolute_deviation_around, std_dev},
};

/// Iterative sigma clipping configuration.
///
/// Each iteration computes the median and the MAD based standard deviation of the
/// values that are still unmasked, then masks every value outside
/// `[median - sigma_lower * scale, median + sigma_upper * scale]`. When the MAD is zero
/// the plain standard deviation is used as the scale instead, so a sample whose
/// majority shares one value is not collapsed onto it. Clipping stops when an
/// iteration masks nothing new or after `max_iters` iterations. Masked values never
/// come back.
///
/// The configuration is validated when built and immutable afterwards.
///
/// # Examples
///
/// ```
/// # use background_statistics::{MaskedArray, SigmaClip};
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let clipped = SigmaClip::default().clip(&MaskedArray::new(&data));
/// assert_eq!(clipped.compressed(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmaClip<T> {
    /// Symmetric threshold in standard deviations
    sigma: T,
    /// Lower threshold override
    sigma_lower: Option<T>,
    /// Upper threshold override
    sigma_upper: Option<T>,
    /// Iteration cap, `None` clips until convergence
    max_iters: Option<usize>,
}

impl<T: Float> Default for SigmaClip<T> {
    /// Three sigma on both tails, at most five iterations
    fn default() -> Self {
        Self {
            sigma: T::one() + T::one() + T::one(),
            sigma_lower: None,
            sigma_upper: None,
            max_iters: Some(5),
        }
    }
}

fn check_sigma<T: Float>(sigma: T) -> Result<T, BackgroundError> {
    if sigma.is_finite() && sigma > T::zero() {
        Ok(sigma)
    } else {
        Err(BackgroundError::InvalidSigma)
    }
}

impl<T: Float + Default> SigmaClip<T> {
    /// Creates a symmetric clipping configuration with the default iteration cap.
    ///
    /// # Arguments
    ///
    /// * `sigma` - The number of standard deviations for both clipping limits
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The configuration, or
    ///   [`BackgroundError::InvalidSigma`] if `sigma` is not finite and positive
    pub fn new(sigma: T) -> Result<Self, BackgroundError> {
        Ok(Self {
            sigma: check_sigma(sigma)?,
            ..Self::default()
        })
    }

    /// Overrides the lower clipping limit
    ///
    /// # Arguments
    ///
    /// * `sigma_lower` - The number of standard deviations below the center
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The updated configuration
    pub fn with_sigma_lower(mut self, sigma_lower: T) -> Result<Self, BackgroundError> {
        self.sigma_lower = Some(check_sigma(sigma_lower)?);
        Ok(self)
    }

    /// Overrides the upper clipping limit
    ///
    /// # Arguments
    ///
    /// * `sigma_upper` - The number of standard deviations above the center
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The updated configuration
    pub fn with_sigma_upper(mut self, sigma_upper: T) -> Result<Self, BackgroundError> {
        self.sigma_upper = Some(check_sigma(sigma_upper)?);
        Ok(self)
    }

    /// Sets the iteration cap, `None` to iterate until nothing more is clipped
    pub const fn with_max_iters(mut self, max_iters: Option<usize>) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Returns the symmetric threshold
    pub const fn sigma(&self) -> T {
        self.sigma
    }

    /// Returns the effective lower threshold
    pub fn sigma_lower(&self) -> T {
        self.sigma_lower.unwrap_or(self.sigma)
    }

    /// Returns the effective upper threshold
    pub fn sigma_upper(&self) -> T {
        self.sigma_upper.unwrap_or(self.sigma)
    }

    /// Returns the iteration cap
    pub const fn max_iters(&self) -> Option<usize> {
        self.max_iters
    }

    /// Returns the inclusive clipping bounds for a sample
    ///
    /// # Arguments
    ///
    /// * `values` - The currently unmasked values
    ///
    /// # Returns
    ///
    /// * `Option<(T, T)>` - The `(lower, upper)` bounds, or `None` if the sample is empty
    pub fn bounds(&self, values: &[T]) -> Option<(T, T)> {
        let center = median(values)?;
        let mut scale = median_absolute_deviation_around(values, center)? * T::from(MAD_TO_STD)?;
        if scale == T::zero() {
            scale = std_dev(values)?;
        }
        Some((
            center - self.sigma_lower() * scale,
            center + self.sigma_upper() * scale,
        ))
    }

    /// Clips outliers from the data.
    ///
    /// # Arguments
    ///
    /// * `data` - The input, whose existing mask is kept
    ///
    /// # Returns
    ///
    /// * `MaskedArray<'a, T>` - A view over the same values with the clipped
    ///   elements added to the mask
    pub fn clip<'a>(&self, data: &MaskedArray<'a, T>) -> MaskedArray<'a, T> {
        let values = data.data();
        let mut mask = data.mask();
        let mut iteration = 0;

        loop {
            if self.max_iters.is_some_and(|max| iteration >= max) {
                debug!("sigma clipping stopped at the iteration cap of {iteration}");
                break;
            }

            let kept: Vec<T> = values
                .iter()
                .zip(&mask)
                .filter(|&(_, &masked)| !masked)
                .map(|(&v, _)| v)
                .collect();
            let Some((lower, upper)) = self.bounds(&kept) else {
                break;
            };

            let mut rejected = 0;
            for (v, masked) in values.iter().zip(mask.iter_mut()) {
                if !*masked && (*v < lower || *v > upper) {
                    *masked = true;
                    rejected += 1;
                }
            }
            iteration += 1;
            trace!(
                "sigma clipping iteration {iteration}: bounds [{:?}, {:?}], rejected {rejected}",
                lower.to_f64(),
                upper.to_f64()
            );

            if rejected == 0 {
                debug!("sigma clipping converged after {iteration} iterations");
                break;
            }
        }

        MaskedArray::with_owned_mask(values, mask)
    }
}

/// Returns the mean, median and standard deviation of the sigma clipped data
///
/// # Arguments
///
/// * `data` - The input data
/// * `sigma_clip` - The clipping configuration
///
/// # Returns
///
/// * `Option<(T, T, T)>` - `(mean, median, std)`, or `None` if nothing survives
///
/// # Examples
///
/// ```
/// # use background_statistics::{MaskedArray, SigmaClip, sigma_clipped_stats};
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let (mean, median, _) = sigma_clipped_stats(&MaskedArray::new(&data), &SigmaClip::default())
///     .unwrap();
/// assert_eq!((mean, median), (3.0, 3.0));
/// ```
pub fn sigma_clipped_stats<T: Float + Default>(
    data: &MaskedArray<'_, T>,
    sigma_clip: &SigmaClip<T>,
) -> Option<(T, T, T)> {
    let values = sigma_clip.clip(data).compressed();
    Some((mean(&values)?, median(&values)?, std_dev(&values)?))
}
