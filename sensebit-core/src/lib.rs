//! Board-agnostic core logic for the SenseBit sensor board
//!
//! This crate contains everything that does not depend on a concrete
//! bus, pin or display implementation:
//!
//! - Hardware abstraction traits (IMU, analog pin, pixel display)
//! - Magnetometer calibration (grid sampler, hard/soft-iron correction)
//! - Tilt-compensated heading math
//! - Persisted key-value configuration store (JSON document)
//! - Mounting-orientation axis presets

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod axis;
pub mod config;
pub mod mag;
pub mod math;
pub mod traits;
