//! Ambient-light sensor

use core::cell::RefCell;

use sensebit_core::traits::AnalogPin;

use crate::error::Error;

/// Ambient-light level from a single analog pin.
pub struct LightSensor<'b, P> {
    pin: &'b RefCell<P>,
}

impl<'b, P: AnalogPin> LightSensor<'b, P> {
    pub fn new(pin: &'b RefCell<P>) -> Self {
        Self { pin }
    }

    /// Raw light level, truncated to an integer.
    pub fn get_value(&mut self) -> Result<i32, Error> {
        Ok(self.pin.borrow_mut().read_analog(false)? as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockPin;

    #[test]
    fn test_reading_is_truncated() {
        let pin = RefCell::new(MockPin::new(512.7));
        let mut light = LightSensor::new(&pin);
        assert_eq!(light.get_value().unwrap(), 512);
    }
}
