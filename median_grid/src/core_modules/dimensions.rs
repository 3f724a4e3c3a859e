// THEORY:
// `Dimensions` is the one value type every other module agrees on: the size of a
// source image, the size of the requested output grid, and the nominal size of a
// block are all a (width, height) pair of positive integers.
//
// The positivity invariant is enforced by the constructor rather than by a
// separate validation pass. There is no way to build a `Dimensions` with a zero
// component, so downstream code (the partition plan, the reducers) can divide by
// either side without re-checking.

use crate::error::ValidationError;
use std::fmt;

/// A validated (width, height) pair, both components at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Builds a new pair, rejecting a zero in either component.
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        let width = Self::component("width", i64::from(width))?;
        let height = Self::component("height", i64::from(height))?;
        Ok(Self { width, height })
    }

    /// Builds a pair from raw, possibly negative user input.
    pub fn from_signed(width: i64, height: i64) -> Result<Self, ValidationError> {
        let width = Self::component("width", width)?;
        let height = Self::component("height", height)?;
        Ok(Self { width, height })
    }

    fn component(field: &'static str, value: i64) -> Result<u32, ValidationError> {
        if value < 1 {
            return Err(ValidationError::NonPositive { field, value });
        }
        u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells covered, widened so large images cannot overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Checks that `self` fits inside `limit` on both axes.
    ///
    /// Used to reject a target grid larger than its source, which would
    /// otherwise floor the nominal block size to zero.
    pub fn ensure_within(&self, limit: &Dimensions) -> Result<(), ValidationError> {
        if self.width > limit.width {
            return Err(ValidationError::ExceedsSource {
                field: "width",
                target: self.width,
                limit: limit.width,
            });
        }
        if self.height > limit.height {
            return Err(ValidationError::ExceedsSource {
                field: "height",
                target: self.height,
                limit: limit.height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
