//! Sensor objects for the SenseBit board
//!
//! User-facing wrappers over the shared hardware handles:
//!
//! - [`Board`]: composition root owning the lazily-attached IMU, analog
//!   pins and configuration store
//! - [`Accelerometer`] / [`Gyro`]: thin reads with axis correction
//! - [`Compass`]: magnetometer with persisted hard/soft-iron calibration
//!   and tilt-compensated heading
//! - [`LightSensor`] / [`Temperature`]: analog-pin sensors
//!
//! A single cooperative execution context is assumed throughout; the
//! shared handles use `RefCell`, not mutexes.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate alloc;

pub mod accelerometer;
pub mod board;
pub mod compass;
pub mod error;
pub mod gyro;
pub mod light;
pub mod temperature;

pub use accelerometer::Accelerometer;
pub use board::Board;
pub use compass::Compass;
pub use error::Error;
pub use gyro::Gyro;
pub use light::LightSensor;
pub use temperature::Temperature;

#[cfg(test)]
pub(crate) mod testutil;
