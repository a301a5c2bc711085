use crate::{MaskedArray, SigmaClip};

/// Scalar background noise estimator
///
/// The counterpart of [`BackgroundEstimator`](crate::BackgroundEstimator) for
/// dispersion statistics. Results are never negative.
pub trait BackgroundRmsEstimator<T> {
    /// Returns the clipping configuration applied before the statistic, if any
    fn sigma_clip(&self) -> Option<&SigmaClip<T>>;

    /// Returns `true` if the data is sigma clipped before the statistic is computed
    fn sigclip(&self) -> bool {
        self.sigma_clip().is_some()
    }

    /// Computes the background rms of the data
    ///
    /// # Arguments
    ///
    /// * `data` - The input data, masked elements and non-finite values are ignored
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The background rms, or `None` if no value survives masking
    ///   and clipping
    fn compute_background_rms(&self, data: &MaskedArray<'_, T>) -> Option<T>;
}
