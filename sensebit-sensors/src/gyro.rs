//! Gyro wrapper over the shared IMU

use core::cell::RefCell;

use sensebit_core::axis::{AxisCorrection, Mounting};
use sensebit_core::math::{round_digits, Vec3};
use sensebit_core::traits::{GyroRange, GyroUnit, ImuDriver};

use crate::error::Error;

/// Angular-rate readings with per-instance axis correction.
pub struct Gyro<'b, I> {
    imu: &'b RefCell<I>,
    axis: AxisCorrection,
}

impl<'b, I: ImuDriver> Gyro<'b, I> {
    /// Wrap the shared IMU with the default ±250 °/s range in °/s.
    pub fn new(imu: &'b RefCell<I>) -> Result<Self, Error> {
        Self::with_settings(imu, GyroRange::Dps250, GyroUnit::Dps)
    }

    /// Wrap the shared IMU, configuring range and unit.
    pub fn with_settings(imu: &'b RefCell<I>, fs: GyroRange, sf: GyroUnit) -> Result<Self, Error> {
        {
            let mut driver = imu.borrow_mut();
            driver.gyro_fs(fs)?;
            driver.gyro_sf(sf)?;
        }
        Ok(Self {
            imu,
            axis: AxisCorrection::IDENTITY,
        })
    }

    fn read(&mut self) -> Result<Vec3, Error> {
        Ok(self.imu.borrow_mut().gyro()?)
    }

    /// X-axis rate, rounded to `ndigits` decimal digits.
    pub fn get_x(&mut self, ndigits: u8) -> Result<f32, Error> {
        Ok(round_digits(self.read()?[0] * self.axis.sign(0), ndigits))
    }

    /// Y-axis rate, rounded to `ndigits` decimal digits.
    pub fn get_y(&mut self, ndigits: u8) -> Result<f32, Error> {
        Ok(round_digits(self.read()?[1] * self.axis.sign(1), ndigits))
    }

    /// Z-axis rate, rounded to `ndigits` decimal digits.
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
    pub fn set_fs(&mut self, fs: GyroRange) -> Result<(), Error> {
        Ok(self.imu.borrow_mut().gyro_fs(fs)?)
    }

    /// Set the output unit on the shared handle.
    pub fn set_sf(&mut self, sf: GyroUnit) -> Result<(), Error> {
        Ok(self.imu.borrow_mut().gyro_sf(sf)?)
    }

    /// Select the mounting-orientation preset for this instance.
    ///
    /// The gyro only supports the mount-plate and shield presets.
    pub fn set_axis(&mut self, mode: Mounting) -> Result<(), Error> {
        self.axis = match mode {
            Mounting::MountPlate => AxisCorrection::IDENTITY,
            Mounting::Shield => AxisCorrection::from_signs(-1, 1, -1),
            Mounting::MainBoard => return Err(Error::InvalidAxisMode),
        };
        Ok(())
    }
}
