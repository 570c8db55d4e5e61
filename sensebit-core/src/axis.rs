//! Mounting-orientation presets and per-axis sign correction
//!
//! The board can be fixed to expansion hardware in a few known
//! orientations. Each preset selects a fixed ±1 sign per axis so that
//! readings stay in the board's reference frame. The sign patterns
//! differ per sensor, so the mapping lives with each sensor type; this
//! module only defines the closed preset set and the correction vector.

use crate::math::Vec3;

/// Error returned when a preset name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownMounting;

/// Mounting-orientation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mounting {
    /// Board screwed onto the mount plate ("sbmp")
    MountPlate,
    /// Board clipped into the expansion shield ("sbs")
    Shield,
    /// Bare main board ("mb")
    MainBoard,
}

impl core::str::FromStr for Mounting {
    type Err = UnknownMounting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sbmp" => Ok(Mounting::MountPlate),
            "sbs" => Ok(Mounting::Shield),
            "mb" => Ok(Mounting::MainBoard),
            _ => Err(UnknownMounting),
        }
    }
}

/// Per-axis ±1 sign correction applied to raw sensor vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCorrection {
    signs: [i8; 3],
}

impl AxisCorrection {
    /// No correction.
    pub const IDENTITY: Self = Self { signs: [1, 1, 1] };

    /// Build a correction from per-axis signs. Each sign must be -1 or +1.
    pub const fn from_signs(x: i8, y: i8, z: i8) -> Self {
        Self { signs: [x, y, z] }
    }

    /// The sign applied to one axis (0 = x, 1 = y, 2 = z).
    pub fn sign(&self, axis: usize) -> f32 {
        self.signs[axis] as f32
    }

    /// Apply the correction to a raw vector.
    pub fn apply(&self, raw: Vec3) -> Vec3 {
        [
            raw[0] * self.signs[0] as f32,
            raw[1] * self.signs[1] as f32,
            raw[2] * self.signs[2] as f32,
        ]
    }
}

impl Default for AxisCorrection {
    fn default() -> Self {
        Self::IDENTITY
    }
}
