use alloc::{borrow::Cow, vec::Vec};
use num_traits::Float;

use crate::BackgroundError;

/// A flattened view over an array of any dimension, paired with an optional
/// exclusion mask.
///
/// Multi-dimensional images are passed in their row-major flattened form; the
/// estimators reduce over every element, so the shape itself never matters.
/// A mask entry of `true` excludes the element at the same position. Non-finite
/// values are always excluded, whether or not the mask says so.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray<'a, T> {
    /// The raw values
    data: &'a [T],
    /// Exclusion mask, `None` when every element is eligible
    mask: Option<Cow<'a, [bool]>>,
}

impl<'a, T: Float> MaskedArray<'a, T> {
    /// Creates an unmasked view over `data`.
    ///
    /// # Arguments
    ///
    /// * `data` - The flattened values
    ///
    /// # Returns
    ///
    /// * `Self` - The masked array
    pub const fn new(data: &'a [T]) -> Self {
        Self { data, mask: None }
    }

    /// Creates a view over `data` with the elements flagged in `mask` excluded.
    ///
    /// # Arguments
    ///
    /// * `data` - The flattened values
    /// * `mask` - One flag per value, `true` excludes the value
    ///
    /// # Returns
    ///
    /// * `Result<Self, BackgroundError>` - The masked array, or
    ///   [`BackgroundError::MaskShape`] when the lengths differ
    pub fn with_mask(data: &'a [T], mask: &'a [bool]) -> Result<Self, BackgroundError> {
        if data.len() != mask.len() {
            return Err(BackgroundError::MaskShape {
                data: data.len(),
                mask: mask.len(),
            });
        }
        Ok(Self {
            data,
            mask: Some(Cow::Borrowed(mask)),
        })
    }

    pub(crate) fn with_owned_mask(data: &'a [T], mask: Vec<bool>) -> Self {
        debug_assert_eq!(data.len(), mask.len());
        Self {
            data,
            mask: Some(Cow::Owned(mask)),
        }
    }

    /// Returns the underlying values, masked or not
    pub const fn data(&self) -> &'a [T] {
        self.data
    }

    /// Returns the number of elements, masked or not
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the array holds no elements at all
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the element at `index` does not take part in statistics.
    ///
    /// Out of range indices are reported as masked.
    pub fn is_masked(&self, index: usize) -> bool {
        match self.data.get(index) {
            Some(value) => {
                !value.is_finite() || self.mask.as_ref().is_some_and(|mask| mask[index])
            }
            None => true,
        }
    }

    /// Returns the effective exclusion mask, non-finite values included
    pub fn mask(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.is_masked(i)).collect()
    }

    /// Returns the number of elements taking part in statistics
    pub fn count(&self) -> usize {
        (0..self.len()).filter(|&i| !self.is_masked(i)).count()
    }

    /// Returns the number of excluded elements
    pub fn masked_count(&self) -> usize {
        self.len() - self.count()
    }

    /// Iterates over the unmasked values in storage order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|&(i, _)| !self.is_masked(i))
            .map(|(_, &v)| v)
    }

    /// Returns the unmasked values in storage order
    pub fn compressed(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<'a, T: Float> From<&'a [T]> for MaskedArray<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}
