#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::helper;

mod error;
pub use error::BackgroundError;

mod masked;
pub use masked::MaskedArray;

pub mod stats;

mod sigma_clip;
pub use sigma_clip::{SigmaClip, sigma_clipped_stats};

mod traits;
pub use traits::{BackgroundEstimator, BackgroundRmsEstimator};

mod background;
pub use background::{
    BackgroundBase, BiweightLocationBackground, MeanBackground, MedianBackground, MmmBackground,
    ModeEstimatorBackground, SExtractorBackground,
};

mod background_rms;
pub use background_rms::{BiweightMidvarianceBackgroundRms, MadStdBackgroundRms, StdBackgroundRms};
