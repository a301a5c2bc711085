use thiserror::Error;

/// Errors raised while configuring an estimator or describing its input.
///
/// Numeric degeneracy (empty input, everything masked, everything clipped) is
/// never an error; estimators return `None` for it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackgroundError {
    /// A clipping threshold was not a finite, strictly positive number.
    #[error("sigma clipping threshold must be finite and positive")]
    InvalidSigma,
    /// A biweight tuning constant was not a finite, strictly positive number.
    #[error("biweight tuning constant must be finite and positive")]
    InvalidTuningConstant,
    /// An initial location guess was not finite.
    #[error("initial location guess must be finite")]
    InvalidLocation,
    /// Mode estimator coefficients were not finite.
    #[error("mode estimator factors must be finite")]
    InvalidModeFactor,
    /// The mask does not have one entry per data element.
    #[error("mask length {mask} does not match data length {data}")]
    MaskShape {
        /// Number of data elements
        data: usize,
        /// Number of mask elements
        mask: usize,
    },
}
