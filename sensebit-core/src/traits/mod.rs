//! Hardware abstraction traits
//!
//! These traits define the interface between the sensor objects and the
//! board-specific IMU driver, analog pins and LED matrix.

pub mod display;
pub mod imu;
pub mod pin;

pub use display::{Color, PixelDisplay, GRID_SIZE};
pub use imu::{AccelRange, AccelUnit, GyroRange, GyroUnit, ImuDriver, UnknownPreset};
pub use pin::AnalogPin;

/// Errors that can occur when talking to the board's sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus communication with the IMU failed
    Bus,
    /// ADC conversion failed
    Adc,
    /// Reading implies a disconnected sensor (open circuit)
    OpenCircuit,
    /// Reading pinned at full scale (short circuit)
    ShortCircuit,
}
