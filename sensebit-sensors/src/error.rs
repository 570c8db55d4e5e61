//! Sensor API error type

use sensebit_core::axis::UnknownMounting;
use sensebit_core::config::StorageError;
use sensebit_core::mag::CalibrationError;
use sensebit_core::traits::SensorError;

/// Errors surfaced by the sensor objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Hardware fault from the IMU or an analog pin
    Sensor(SensorError),
    /// Persisting the configuration document failed
    Storage(StorageError),
    /// Calibration run failed
    Calibration(CalibrationError),
    /// Mounting preset not valid for this sensor
    InvalidAxisMode,
    /// Feature not supported by this board revision
    Unsupported,
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::Storage(e)
    }
}

impl From<CalibrationError> for Error {
    fn from(e: CalibrationError) -> Self {
        Error::Calibration(e)
    }
}

impl From<UnknownMounting> for Error {
    fn from(_: UnknownMounting) -> Self {
        Error::InvalidAxisMode
    }
}
