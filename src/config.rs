//! Caller-supplied engine settings.
//!
//! The engine never loads configuration on its own. The surrounding
//! application owns preference storage and hands an [`EngineConfig`] (or just a
//! precision) to every call.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConversionError;

/// Maximum number of fractional digits emitted by a conversion or calculation.
///
/// Range: 1..=30, default 15.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Precision(u8);

impl Precision {
    pub const MIN: Self = Self(1);

    pub const MAX: Self = Self(30);

    pub const DEFAULT: Self = Self(15);

    /// Extra decimal places carried through arithmetic before truncation.
    pub const GUARD_DIGITS: u32 = 5;

    /// Validates `digits` against the supported range.
    ///
    /// # Errors
    /// Returns `ConversionError::PrecisionOutOfRange` outside 1..=30.
    pub const fn new(digits: u32) -> crate::Result<Self> {
        if digits < Self::MIN.0 as u32 || digits > Self::MAX.0 as u32 {
            return Err(ConversionError::PrecisionOutOfRange(digits));
        }
        Ok(Self(digits as u8))
    }

    /// Like [`Precision::new`], but clamps instead of failing.
    pub const fn saturating(digits: u32) -> Self {
        if digits < Self::MIN.0 as u32 {
            Self::MIN
        } else if digits > Self::MAX.0 as u32 {
            Self::MAX
        } else {
            Self(digits as u8)
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    /// Decimal scale used while applying an arithmetic operation.
    #[inline]
    pub const fn working_scale(self) -> u32 {
        self.get() + Self::GUARD_DIGITS
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Precision {
    type Error = ConversionError;

    fn try_from(digits: u32) -> Result<Self, Self::Error> {
        Self::new(digits)
    }
}

impl From<Precision> for u32 {
    fn from(precision: Precision) -> Self {
        precision.get()
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a radix point with nothing on one side ("10." or ".5") is treated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PointPolicy {
    /// Reject both forms as malformed.
    Strict,
    /// Read "10." as "10" and ".5" as "0.5".
    #[default]
    Lenient,
}

/// Everything the engine needs from its caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub precision: Precision,
    pub point_policy: PointPolicy,
}

impl EngineConfig {
    pub const fn new(precision: Precision, point_policy: PointPolicy) -> Self {
        Self {
            precision,
            point_policy,
        }
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub const fn with_point_policy(mut self, point_policy: PointPolicy) -> Self {
        self.point_policy = point_policy;
        self
    }
}
