use crate::{MaskedArray, SigmaClip};

/// Scalar background level estimator
///
/// Implementors reduce a whole (optionally masked) array to a single central
/// tendency statistic, optionally sigma clipping the data first. Estimators are
/// immutable configuration values: computing never changes them, so one estimator
/// can be shared across threads and reused for any number of frames.
pub trait BackgroundEstimator<T> {
    /// Returns the clipping configuration applied before the statistic, if any
    fn sigma_clip(&self) -> Option<&SigmaClip<T>>;

    /// Returns `true` if the data is sigma clipped before the statistic is computed
    fn sigclip(&self) -> bool {
        self.sigma_clip().is_some()
    }

    /// Computes the background level of the data
    ///
    /// # Arguments
    ///
    /// * `data` - The input data, masked elements and non-finite values are ignored
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The background level, or `None` if no value survives masking
    ///   and clipping
    fn compute_background(&self, data: &MaskedArray<'_, T>) -> Option<T>;
}
