//! Accelerometer wrapper over the shared IMU

use core::cell::RefCell;

use sensebit_core::axis::{AxisCorrection, Mounting};
use sensebit_core::math::{round_digits, Vec3};
use sensebit_core::traits::{AccelRange, AccelUnit, ImuDriver};

use crate::error::Error;

/// Acceleration readings with per-instance axis correction.
///
/// Range and unit settings go to the shared IMU handle and therefore
/// affect every other consumer of the same handle.
pub struct Accelerometer<'b, I> {
    imu: &'b RefCell<I>,
    axis: AxisCorrection,
}

impl<'b, I: ImuDriver> Accelerometer<'b, I> {
    /// Wrap the shared IMU with the default ±2 g range in m/s².
    pub fn new(imu: &'b RefCell<I>) -> Result<Self, Error> {
        Self::with_settings(imu, AccelRange::G2, AccelUnit::Ms2)
    }

    /// Wrap the shared IMU, configuring range and unit.
    pub fn with_settings(
        imu: &'b RefCell<I>,
        fs: AccelRange,
        sf: AccelUnit,
    ) -> Result<Self, Error> {
        {
            let mut driver = imu.borrow_mut();
            driver.accel_fs(fs)?;
            driver.accel_sf(sf)?;
        }
        Ok(Self {
            imu,
            axis: AxisCorrection::IDENTITY,
        })
    }

    fn read(&mut self) -> Result<Vec3, Error> {
        Ok(self.imu.borrow_mut().acceleration()?)
    }

    /// X-axis acceleration, rounded to `ndigits` decimal digits.
    pub fn get_x(&mut self, ndigits: u8) -> Result<f32, Error> {
        Ok(round_digits(self.read()?[0] * self.axis.sign(0), ndigits))
    }

    /// Y-axis acceleration, rounded to `ndigits` decimal digits.
    pub fn get_y(&mut self, ndigits: u8) -> Result<f32, Error> {
        Ok(round_digits(self.read()?[1] * self.axis.sign(1), ndigits))
    }

    /// Z-axis acceleration, rounded to `ndigits` decimal digits.
    pub fn get_z(&mut self, ndigits: u8) -> Result<f32, Error> {
        Ok(round_digits(self.read()?[2] * self.axis.sign(2), ndigits))
    }

    /// All three axes from one reading, rounded.
    pub fn get_values(&mut self, ndigits: u8) -> Result<Vec3, Error> {
        let raw = self.read()?;
        let v = self.axis.apply(raw);
        Ok([
            round_digits(v[0], ndigits),
            round_digits(v[1], ndigits),
            round_digits(v[2], ndigits),
        ])
    }

    /// Set the full-scale range on the shared handle.
    pub fn set_fs(&mut self, fs: AccelRange) -> Result<(), Error> {
        Ok(self.imu.borrow_mut().accel_fs(fs)?)
    }

    /// Set the output unit on the shared handle.
    pub fn set_sf(&mut self, sf: AccelUnit) -> Result<(), Error> {
        Ok(self.imu.borrow_mut().accel_sf(sf)?)
    }

    /// Select the mounting-orientation preset for this instance.
    pub fn set_axis(&mut self, mode: Mounting) -> Result<(), Error> {
        self.axis = match mode {
            Mounting::MountPlate | Mounting::MainBoard => AxisCorrection::IDENTITY,
            Mounting::Shield => AxisCorrection::from_signs(-1, 1, -1),
        };
        Ok(())
    }

    /// Gesture detection is not supported by this board revision.
    pub fn current_gesture(&mut self) -> Result<&'static str, Error> {
        Err(Error::Unsupported)
    }

    /// Gesture detection is not supported by this board revision.
    pub fn is_gesture(&mut self, _name: &str) -> Result<bool, Error> {
        Err(Error::Unsupported)
    }

    /// Gesture detection is not supported by this board revision.
    pub fn was_gesture(&mut self, _name: &str) -> Result<bool, Error> {
        Err(Error::Unsupported)
    }

    /// Gesture detection is not supported by this board revision.
    pub fn get_gestures(&mut self) -> Result<&'static [&'static str], Error> {
        Err(Error::Unsupported)
    }
}
