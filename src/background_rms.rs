use num_traits::Float;

use crate::{
    BackgroundBase, BackgroundError, BackgroundRmsEstimator, MaskedArray, SigmaClip,
    stats::{biweight_midvariance, mad_std, std_dev},
};

/// Background rms as the (sigma clipped) population standard deviation.
///
/// # Examples
///
/// ```
/// # use background_statistics::{BackgroundRmsEstimator, MaskedArray, StdBackgroundRms};
/// # use assert_approx_eq::assert_approx_eq;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let rms = StdBackgroundRms::default()
///     .compute_background_rms(&MaskedArray::new(&data))
///     .unwrap();
/// assert_approx_eq!(rms, 2.0_f64.sqrt());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StdBackgroundRms<T> {
    base: BackgroundBase<T>,
}

impl<T: Float> Default for StdBackgroundRms<T> {
    fn default() -> Self {
        Self {
            base: BackgroundBase::default(),
        }
    }
}

impl<T: Float + Default> StdBackgroundRms<T> {
    /// Creates the estimator with the given shared configuration
    pub const fn new(base: BackgroundBase<T>) -> Self {
        Self { base }
    }
}

impl<T: Float + Default> BackgroundRmsEstimator<T> for StdBackgroundRms<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background_rms(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        std_dev(&self.base.prepare(data))
    }
}

/// Background rms from the median absolute deviation.
///
/// `σ ≈ MAD / Φ⁻¹(3/4) ≈ 1.4826 MAD`, where `Φ⁻¹` is the inverse normal
/// cumulative distribution function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MadStdBackgroundRms<T> {
    base: BackgroundBase<T>,
}

impl<T: Float> Default for MadStdBackgroundRms<T> {
    fn default() -> Self {
        Self {
            base: BackgroundBase::default(),
        }
    }
}

impl<T: Float + Default> MadStdBackgroundRms<T> {
    /// Creates the estimator with the given shared configuration
    pub const fn new(base: BackgroundBase<T>) -> Self {
        Self { base }
    }
}

impl<T: Float + Default> BackgroundRmsEstimator<T> for MadStdBackgroundRms<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background_rms(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        mad_std(&self.base.prepare(data))
    }
}

/// Background rms as the (sigma clipped) biweight midvariance.
///
/// The tuning constant `c` defaults to 9 and the initial location guess defaults
/// to the median of the (clipped) data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiweightMidvarianceBackgroundRms<T> {
    base: BackgroundBase<T>,
    c: T,
    location: Option<T>,
}

impl<T: Float> Default for BiweightMidvarianceBackgroundRms<T> {
    fn default() -> Self {
        let _3 = T::one() + T::one() + T::one();
        Self {
            base: BackgroundBase::default(),
            c: _3 * _3,
            location: None,
        }
    }
}

impl<T: Float + Default> BiweightMidvarianceBackgroundRms<T> {
    /// Creates the estimator with the default tuning constant and no initial guess
    pub fn new(base: BackgroundBase<T>) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Sets the tuning constant
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The estimator, or
    ///   [`BackgroundError::InvalidTuningConstant`] if `c` is not finite and positive
    pub fn with_c(mut self, c: T) -> Result<Self, BackgroundError> {
        if !c.is_finite() || c <= T::zero() {
            return Err(BackgroundError::InvalidTuningConstant);
        }
        self.c = c;
        Ok(self)
    }

    /// Sets the initial location guess
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The estimator, or
    ///   [`BackgroundError::InvalidLocation`] if the guess is not finite
    pub fn with_location(mut self, location: T) -> Result<Self, BackgroundError> {
        if !location.is_finite() {
            return Err(BackgroundError::InvalidLocation);
        }
        self.location = Some(location);
        Ok(self)
    }

    /// Returns the tuning constant
    pub const fn c(&self) -> T {
        self.c
    }

    /// Returns the initial location guess
    pub const fn location(&self) -> Option<T> {
        self.location
    }
}

impl<T: Float + Default> BackgroundRmsEstimator<T> for BiweightMidvarianceBackgroundRms<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background_rms(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        biweight_midvariance(&self.base.prepare(data), self.c, self.location)
    }
}
