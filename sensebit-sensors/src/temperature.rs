//! Thermistor temperature sensor
//!
//! A 10 kΩ NTC thermistor in a divider against a 10 kΩ series resistor.
//! Celsius conversion uses the Steinhart-Hart beta approximation.

use core::cell::RefCell;

use sensebit_core::math::round_digits;
use sensebit_core::traits::{AnalogPin, SensorError};

use crate::error::Error;

/// Thermistor resistance at the nominal temperature (ohms).
pub const NOMINAL_RESISTANCE: f32 = 10_000.0;

/// Temperature at the nominal resistance (°C).
pub const NOMINAL_TEMPERATURE: f32 = 25.0;

/// Beta coefficient of the thermistor.
pub const BETA_COEFFICIENT: f32 = 3950.0;

/// Series resistor in the divider (ohms).
pub const SERIES_RESISTOR: f32 = 10_000.0;

/// Full-scale ADC code.
const ADC_MAX: f32 = 4095.0;

const KELVIN_OFFSET: f32 = 273.15;

/// Thermistor temperature from a single analog pin.
pub struct Temperature<'b, P> {
    pin: &'b RefCell<P>,
}

impl<'b, P: AnalogPin> Temperature<'b, P> {
    pub fn new(pin: &'b RefCell<P>) -> Self {
        Self { pin }
    }

    /// Raw ADC reading, truncated to an integer.
    pub fn get_value(&mut self) -> Result<i32, Error> {
        Ok(self.pin.borrow_mut().read_analog(false)? as i32)
    }

    /// Temperature in Celsius, rounded to `ndigits` decimal digits.
    ///
    /// A reading of zero means unbounded divider resistance (sensor
    /// disconnected) and reports `OpenCircuit`; a full-scale reading
    /// means zero resistance and reports `ShortCircuit`.
    pub fn get_celsius(&mut self, ndigits: u8) -> Result<f32, Error> {
        let reading = self.pin.borrow_mut().read_analog(false)?;
        if reading <= 0.0 {
            return Err(Error::Sensor(SensorError::OpenCircuit));
        }
        if reading >= ADC_MAX {
            return Err(Error::Sensor(SensorError::ShortCircuit));
        }

        let resistance = SERIES_RESISTOR * (ADC_MAX / reading - 1.0);

        // beta approximation: 1/T = 1/T0 + ln(R/R0)/B
        let mut steinhart = libm::logf(resistance / NOMINAL_RESISTANCE) / BETA_COEFFICIENT;
        steinhart += 1.0 / (NOMINAL_TEMPERATURE + KELVIN_OFFSET);
        let celsius = 1.0 / steinhart - KELVIN_OFFSET;

        Ok(round_digits(celsius, ndigits))
    }
}
