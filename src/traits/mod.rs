mod background_estimator;
pub use background_estimator::BackgroundEstimator;

mod background_rms_estimator;
pub use background_rms_estimator::BackgroundRmsEstimator;
