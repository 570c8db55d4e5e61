//! IMU driver trait and configuration presets
//!
//! The board carries a single 9-axis IMU shared by every sensor object.
//! Full-scale and sensitivity-factor settings are global to the device:
//! the last writer wins for every consumer of the same handle.

use super::SensorError;
use crate::math::Vec3;

/// Error returned when a full-scale or unit preset name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownPreset;

/// Accelerometer full-scale range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2 g ("2g")
    G2,
    /// ±4 g ("4g")
    G4,
    /// ±8 g ("8g")
    G8,
    /// ±16 g ("16g")
    G16,
}

/// Accelerometer output unit (sensitivity factor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelUnit {
    /// Meters per second squared ("ms2")
    Ms2,
    /// Standard gravities ("g")
    G,
}

/// Gyro full-scale range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±250 °/s ("250dps")
    Dps250,
    /// ±500 °/s ("500dps")
    Dps500,
    /// ±1000 °/s ("1000dps")
    Dps1000,
    /// ±2000 °/s ("2000dps")
    Dps2000,
}

/// Gyro output unit (sensitivity factor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroUnit {
    /// Degrees per second ("dps")
    Dps,
    /// Radians per second ("rps")
    Rps,
}

impl core::str::FromStr for AccelRange {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2g" => Ok(Self::G2),
            "4g" => Ok(Self::G4),
            "8g" => Ok(Self::G8),
            "16g" => Ok(Self::G16),
            _ => Err(UnknownPreset),
        }
    }
}

impl core::str::FromStr for AccelUnit {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms2" => Ok(Self::Ms2),
            "g" => Ok(Self::G),
            _ => Err(UnknownPreset),
        }
    }
}

impl core::str::FromStr for GyroRange {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "250dps" => Ok(Self::Dps250),
            "500dps" => Ok(Self::Dps500),
            "1000dps" => Ok(Self::Dps1000),
            "2000dps" => Ok(Self::Dps2000),
            _ => Err(UnknownPreset),
        }
    }
}

impl core::str::FromStr for GyroUnit {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dps" => Ok(Self::Dps),
            "rps" => Ok(Self::Rps),
            _ => Err(UnknownPreset),
        }
    }
}

/// Trait for the shared 9-axis IMU driver.
///
/// Readings are in the unit selected by the corresponding sensitivity
/// factor; the magnetic field is in microteslas.
pub trait ImuDriver {
    /// Read the acceleration vector.
    fn acceleration(&mut self) -> Result<Vec3, SensorError>;

    /// Read the angular-rate vector.
    fn gyro(&mut self) -> Result<Vec3, SensorError>;

    /// Read the raw magnetic-field vector.
    fn magnetic(&mut self) -> Result<Vec3, SensorError>;

    /// Set the accelerometer full-scale range.
    fn accel_fs(&mut self, fs: AccelRange) -> Result<(), SensorError>;

    /// Set the accelerometer output unit.
    fn accel_sf(&mut self, sf: AccelUnit) -> Result<(), SensorError>;

    /// Set the gyro full-scale range.
    fn gyro_fs(&mut self, fs: GyroRange) -> Result<(), SensorError>;

    /// Set the gyro output unit.
    fn gyro_sf(&mut self, sf: GyroUnit) -> Result<(), SensorError>;
}
