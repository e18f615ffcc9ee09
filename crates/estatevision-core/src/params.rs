//! Validated inspection parameters.
//!
//! Hosts feed these from slider-like controls, so both types offer a strict
//! constructor and a saturating one.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many ownership levels above the asset are expanded (1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Depth(u8);

impl Depth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(value: i64) -> Result<Self, CoreError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidDepth(value))
        }
    }

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether entities at `level` (1 = direct owner) are part of the graph.
    pub fn reaches(self, level: u8) -> bool {
        self.0 >= level
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<i64> for Depth {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Depth> for i64 {
    fn from(value: Depth) -> Self {
        value.0 as i64
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target edge length hint for the force layout, in graph units (50..=200).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Spacing(f32);

impl Spacing {
    pub const MIN: f32 = 50.0;
    pub const MAX: f32 = 200.0;
    pub const DEFAULT: f32 = 100.0;

    pub fn new(value: f32) -> Result<Self, CoreError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidSpacing(value))
        }
    }

    pub fn clamped(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::DEFAULT)
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f32> for Spacing {
    type Error = CoreError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Spacing> for f32 {
    fn from(value: Spacing) -> Self {
        value.0
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
