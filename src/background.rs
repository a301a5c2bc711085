use alloc::vec::Vec;
use log::trace;
use num_traits::Float;

use crate::{
    BackgroundError, BackgroundEstimator, MaskedArray, SigmaClip,
    stats::{biweight_location, mean, median, std_dev},
};

/// Configuration shared by every estimator: whether and how to sigma clip.
///
/// The default clips with [`SigmaClip::default`], three sigma for at most five
/// iterations. [`BackgroundBase::unclipped`] skips clipping and works on the raw
/// unmasked values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundBase<T> {
    /// Clipping applied before the statistic, `None` to disable
    sigma_clip: Option<SigmaClip<T>>,
}

impl<T: Float> Default for BackgroundBase<T> {
    fn default() -> Self {
        Self {
            sigma_clip: Some(SigmaClip::default()),
        }
    }
}

impl<T: Float + Default> BackgroundBase<T> {
    /// Creates the shared configuration
    ///
    /// # Arguments
    ///
    /// * `sigma_clip` - The clipping applied before the statistic, `None` to disable
    pub const fn new(sigma_clip: Option<SigmaClip<T>>) -> Self {
        Self { sigma_clip }
    }

    /// Creates a configuration that never clips
    pub const fn unclipped() -> Self {
        Self { sigma_clip: None }
    }

    /// Returns the clipping configuration, if clipping is enabled
    pub const fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.sigma_clip.as_ref()
    }

    /// Returns the values a statistic should be computed on
    ///
    /// # Arguments
    ///
    /// * `data` - The input data
    ///
    /// # Returns
    ///
    /// * `Vec<T>` - The unmasked values, after clipping when enabled
    pub fn prepare(&self, data: &MaskedArray<'_, T>) -> Vec<T> {
        match &self.sigma_clip {
            Some(clip) => clip.clip(data).compressed(),
            None => data.compressed(),
        }
    }
}

/// Background as the (sigma clipped) mean.
///
/// # Examples
///
/// ```
/// # use background_statistics::{BackgroundEstimator, MaskedArray, MeanBackground};
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
/// let bkg = MeanBackground::default();
/// assert_eq!(bkg.compute_background(&MaskedArray::new(&data)), Some(3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanBackground<T> {
    base: BackgroundBase<T>,
}

impl<T: Float> Default for MeanBackground<T> {
    fn default() -> Self {
        Self {
            base: BackgroundBase::default(),
        }
    }
}

impl<T: Float + Default> MeanBackground<T> {
    /// Creates the estimator with the given shared configuration
    pub const fn new(base: BackgroundBase<T>) -> Self {
        Self { base }
    }
}

impl<T: Float + Default> BackgroundEstimator<T> for MeanBackground<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        mean(&self.base.prepare(data))
    }
}

/// Background as the (sigma clipped) median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianBackground<T> {
    base: BackgroundBase<T>,
}

impl<T: Float> Default for MedianBackground<T> {
    fn default() -> Self {
        Self {
            base: BackgroundBase::default(),
        }
    }
}

impl<T: Float + Default> MedianBackground<T> {
    /// Creates the estimator with the given shared configuration
    pub const fn new(base: BackgroundBase<T>) -> Self {
        Self { base }
    }
}

impl<T: Float + Default> BackgroundEstimator<T> for MedianBackground<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        median(&self.base.prepare(data))
    }
}

/// Background from a generic mode estimator of the form
/// `median_factor * median - mean_factor * mean`.
///
/// The defaults, 3 and 2, give Pearson's classic mode approximation. The factors
/// are free so that variants such as `2.5 * median - 1.5 * mean` can be expressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeEstimatorBackground<T> {
    base: BackgroundBase<T>,
    median_factor: T,
    mean_factor: T,
}

impl<T: Float> Default for ModeEstimatorBackground<T> {
    fn default() -> Self {
        let _2 = T::one() + T::one();
        Self {
            base: BackgroundBase::default(),
            median_factor: _2 + T::one(),
            mean_factor: _2,
        }
    }
}

impl<T: Float + Default> ModeEstimatorBackground<T> {
    /// Creates the estimator
    ///
    /// # Arguments
    ///
    /// * `median_factor` - The multiplicative factor of the median
    /// * `mean_factor` - The multiplicative factor of the mean
    /// * `base` - The shared configuration
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The estimator, or
    ///   [`BackgroundError::InvalidModeFactor`] if a factor is not finite
    pub fn new(
        median_factor: T,
        mean_factor: T,
        base: BackgroundBase<T>,
    ) -> Result<Self, BackgroundError> {
        if !median_factor.is_finite() || !mean_factor.is_finite() {
            return Err(BackgroundError::InvalidModeFactor);
        }
        Ok(Self {
            base,
            median_factor,
            mean_factor,
        })
    }

    /// Returns the median factor
    pub const fn median_factor(&self) -> T {
        self.median_factor
    }

    /// Returns the mean factor
    pub const fn mean_factor(&self) -> T {
        self.mean_factor
    }
}

impl<T: Float + Default> BackgroundEstimator<T> for ModeEstimatorBackground<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        let values = self.base.prepare(data);
        Some(self.median_factor * median(&values)? - self.mean_factor * mean(&values)?)
    }
}

/// Background from the DAOPHOT MMM algorithm, the mode estimator
/// `3 * median - 2 * mean`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmmBackground<T> {
    base: BackgroundBase<T>,
}

impl<T: Float> Default for MmmBackground<T> {
    fn default() -> Self {
        Self {
            base: BackgroundBase::default(),
        }
    }
}

impl<T: Float + Default> MmmBackground<T> {
    /// Creates the estimator with the given shared configuration
    pub const fn new(base: BackgroundBase<T>) -> Self {
        Self { base }
    }
}

impl<T: Float + Default> BackgroundEstimator<T> for MmmBackground<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        let values = self.base.prepare(data);
        Some(T::from(3.0)? * median(&values)? - T::from(2.0)? * mean(&values)?)
    }
}

/// Background from the SExtractor algorithm.
///
/// The estimate is `2.5 * median - 1.5 * mean`, unless
/// `|mean - median| / std` is 0.3 or more, in which case the median is used. A
/// sample with zero standard deviation returns its mean. Despite what the
/// SExtractor manual says, this switch is what SExtractor always does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SExtractorBackground<T> {
    base: BackgroundBase<T>,
}

impl<T: Float> Default for SExtractorBackground<T> {
    fn default() -> Self {
        Self {
            base: BackgroundBase::default(),
        }
    }
}

impl<T: Float + Default> SExtractorBackground<T> {
    /// Creates the estimator with the given shared configuration
    pub const fn new(base: BackgroundBase<T>) -> Self {
        Self { base }
    }
}

impl<T: Float + Default> BackgroundEstimator<T> for SExtractorBackground<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        let values = self.base.prepare(data);
        let median = median(&values)?;
        let mean = mean(&values)?;
        let std = std_dev(&values)?;

        if std == T::zero() {
            return Some(mean);
        }

        if (mean - median).abs() / std < T::from(0.3)? {
            trace!("sextractor background: using the mode estimator");
            Some(T::from(2.5)? * median - T::from(1.5)? * mean)
        } else {
            trace!("sextractor background: skewed sample, using the median");
            Some(median)
        }
    }
}

/// Background as the biweight location.
///
/// The tuning constant `c` defaults to 6 and the initial location guess defaults
/// to the median of the (clipped) data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiweightLocationBackground<T> {
    base: BackgroundBase<T>,
    c: T,
    location: Option<T>,
}

impl<T: Float> Default for BiweightLocationBackground<T> {
    fn default() -> Self {
        let _3 = T::one() + T::one() + T::one();
        Self {
            base: BackgroundBase::default(),
            c: _3 + _3,
            location: None,
        }
    }
}

impl<T: Float + Default> BiweightLocationBackground<T> {
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

impl<T: Float + Default> BackgroundEstimator<T> for BiweightLocationBackground<T> {
    fn sigma_clip(&self) -> Option<&SigmaClip<T>> {
        self.base.sigma_clip()
    }

    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T> {
        biweight_location(&self.base.prepare(data), self.c, self.location)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    const DATA: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];

    fn unclipped() -> BackgroundBase<f64> {
        BackgroundBase::unclipped()
    }

    #[test]
    fn test_base_default_clips() {
        let base = BackgroundBase::<f64>::default();
        assert_eq!(base.sigma_clip(), Some(&SigmaClip::default()));
        assert_eq!(
            base.prepare(&MaskedArray::new(&DATA)),
            vec![1.0, 2.0, 3.0, 4.0, 5.0]
        );
        assert_eq!(unclipped().prepare(&MaskedArray::new(&DATA)), DATA.to_vec());
    }

    #[test]
    fn test_mean_background() {
        let data = MaskedArray::new(&DATA);
        assert_eq!(MeanBackground::default().compute_background(&data), Some(3.0));
        assert_approx_eq!(
            MeanBackground::new(unclipped())
                .compute_background(&data)
                .unwrap(),
            115.0 / 6.0
        );
    }

    #[test]
    fn test_median_background() {
        let data = MaskedArray::new(&DATA);
        assert_eq!(MedianBackground::default().compute_background(&data), Some(3.0));
        assert_eq!(
            MedianBackground::new(unclipped()).compute_background(&data),
            Some(3.5)
        );
    }

    #[test]
    fn test_mode_estimator_background() {
        let data = [1.0, 2.0, 2.0, 3.0, 10.0];
        let data = MaskedArray::new(&data);
        let bkg = ModeEstimatorBackground::new(2.5, 1.5, unclipped()).unwrap();
        assert_eq!(bkg.median_factor(), 2.5);
        assert_eq!(bkg.mean_factor(), 1.5);
        assert_approx_eq!(bkg.compute_background(&data).unwrap(), 2.5 * 2.0 - 1.5 * 3.6);

        let pearson = ModeEstimatorBackground::<f64>::default();
        assert_eq!(pearson.median_factor(), 3.0);
        assert_eq!(pearson.mean_factor(), 2.0);
    }

    #[test]
    fn test_mode_estimator_invalid_factor() {
        assert_eq!(
            ModeEstimatorBackground::new(f64::NAN, 2.0, unclipped()),
            Err(BackgroundError::InvalidModeFactor)
        );
    }

    #[test]
    fn test_mmm_background() {
        let values = [1.0, 2.0, 2.0, 3.0, 10.0];
        let bkg = MmmBackground::new(unclipped());
        assert_eq!(
            bkg.compute_background(&MaskedArray::new(&values)),
            Some(3.0 * median(&values).unwrap() - 2.0 * mean(&values).unwrap())
        );
    }

    #[test]
    fn test_sextractor_zero_std_returns_mean() {
        let values = [4.0; 8];
        let bkg = SExtractorBackground::new(unclipped());
        assert_eq!(bkg.compute_background(&MaskedArray::new(&values)), Some(4.0));
    }

    #[test]
    fn test_sextractor_symmetric_uses_mode_estimator() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let bkg = SExtractorBackground::new(unclipped());
        let (median, mean) = (5.5, 5.5);
        assert_eq!(
            bkg.compute_background(&MaskedArray::new(&values)),
            Some(2.5 * median - 1.5 * mean)
        );
    }

    #[test]
    fn test_sextractor_skewed_uses_median() {
        let values = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 10.0, 20.0, 30.0];
        let bkg = SExtractorBackground::new(unclipped());
        assert_eq!(bkg.compute_background(&MaskedArray::new(&values)), Some(0.0));
    }

    #[test]
    fn test_biweight_location_background() {
        let bkg = BiweightLocationBackground::new(unclipped());
        assert_eq!(bkg.c(), 6.0);
        assert_eq!(bkg.location(), None);
        let loc = bkg
            .compute_background(&MaskedArray::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 1000.0]))
            .unwrap();
        assert_approx_eq!(loc, 3.0498520671327207, 1e-12);

        let guessed = bkg.with_location(2.0).unwrap();
        assert_approx_eq!(
            guessed
                .compute_background(&MaskedArray::new(&[1.0, 2.0, 3.0, 4.0, 5.0]))
                .unwrap(),
            2.7701400254591744,
            1e-12
        );
    }

    #[test]
    fn test_biweight_location_guess_far_from_data_is_none() {
        let bkg = BiweightLocationBackground::new(unclipped())
            .with_location(1000.0)
            .unwrap();
        assert_eq!(
            bkg.compute_background(&MaskedArray::new(&[1.0, 2.0, 3.0, 4.0, 5.0])),
            None
        );
    }

    #[test]
    fn test_zero_mad_data_is_not_over_clipped() {
        let values = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0];
        let data = MaskedArray::new(&values);
        assert_eq!(
            MeanBackground::default().compute_background(&data),
            MeanBackground::new(unclipped()).compute_background(&data)
        );
        assert_eq!(MeanBackground::default().compute_background(&data), Some(0.5));
    }

    #[test]
    fn test_biweight_location_invalid_config() {
        let bkg = BiweightLocationBackground::<f64>::default();
        assert_eq!(bkg.with_c(0.0), Err(BackgroundError::InvalidTuningConstant));
        assert_eq!(
            bkg.with_location(f64::INFINITY),
            Err(BackgroundError::InvalidLocation)
        );
        assert_eq!(bkg.with_c(4.685).map(|b| b.c()), Ok(4.685));
    }

    #[test]
    fn test_all_masked_is_none() {
        let mask = [true; 6];
        let data = MaskedArray::with_mask(&DATA, &mask).unwrap();
        assert_eq!(MeanBackground::default().compute_background(&data), None);
        assert_eq!(MedianBackground::default().compute_background(&data), None);
        assert_eq!(
            ModeEstimatorBackground::<f64>::default().compute_background(&data),
            None
        );
        assert_eq!(MmmBackground::default().compute_background(&data), None);
        assert_eq!(SExtractorBackground::default().compute_background(&data), None);
        assert_eq!(
            BiweightLocationBackground::default().compute_background(&data),
            None
        );
    }

    #[test]
    fn test_sigclip_flag() {
        assert!(MeanBackground::<f64>::default().sigclip());
        assert!(!MeanBackground::new(unclipped()).sigclip());
    }
}
