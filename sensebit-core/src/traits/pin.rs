//! Analog pin read trait

use super::SensorError;

/// Trait for a single analog input pin.
pub trait AnalogPin {
    /// Read the pin.
    ///
    /// With `mv = false` returns the raw ADC code (12-bit, 0..=4095);
    /// with `mv = true` returns millivolts.
    fn read_analog(&mut self, mv: bool) -> Result<f32, SensorError>;
}
