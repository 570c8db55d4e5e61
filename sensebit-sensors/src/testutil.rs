//! Mock hardware shared by the sensor tests

use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use sensebit_core::config::{ConfigStorage, StorageError};
use sensebit_core::math::Vec3;
use sensebit_core::traits::display::GRID_SIZE;
use sensebit_core::traits::{
    AccelRange, AccelUnit, AnalogPin, Color, GyroRange, GyroUnit, ImuDriver, PixelDisplay,
    SensorError,
};

/// Scripted IMU: readings step through a sequence and hold the last
/// value once exhausted. Configuration setters record the last write.
pub struct MockImu {
    accel_seq: Vec<Vec3>,
    accel_pos: usize,
    mag_seq: Vec<Vec3>,
    mag_pos: usize,
    gyro_value: Vec3,
    pub accel_range: Option<AccelRange>,
    pub accel_unit: Option<AccelUnit>,
    pub gyro_range: Option<GyroRange>,
    pub gyro_unit: Option<GyroUnit>,
}

impl MockImu {
    pub fn scripted(accel_seq: Vec<Vec3>, mag_seq: Vec<Vec3>) -> Self {
        Self {
            accel_seq,
            accel_pos: 0,
            mag_seq,
            mag_pos: 0,
            gyro_value: [0.0; 3],
            accel_range: None,
            accel_unit: None,
            gyro_range: None,
            gyro_unit: None,
        }
    }

    /// Board lying flat with a field along +x.
    pub fn level() -> Self {
        Self::scripted(vec![[0.0, 0.0, 1.0]], vec![[1.0, 0.0, 0.0]])
    }

    pub fn with_readings(accel: Vec3, gyro: Vec3, mag: Vec3) -> Self {
        let mut imu = Self::scripted(vec![accel], vec![mag]);
        imu.gyro_value = gyro;
        imu
    }

    fn step(seq: &[Vec3], pos: &mut usize) -> Vec3 {
        let value = seq[(*pos).min(seq.len() - 1)];
        *pos += 1;
        value
    }
}

impl ImuDriver for MockImu {
    fn acceleration(&mut self) -> Result<Vec3, SensorError> {
        Ok(Self::step(&self.accel_seq, &mut self.accel_pos))
    }

    fn gyro(&mut self) -> Result<Vec3, SensorError> {
        Ok(self.gyro_value)
    }

    fn magnetic(&mut self) -> Result<Vec3, SensorError> {
        Ok(Self::step(&self.mag_seq, &mut self.mag_pos))
    }

    fn accel_fs(&mut self, fs: AccelRange) -> Result<(), SensorError> {
        self.accel_range = Some(fs);
        Ok(())
    }

    fn accel_sf(&mut self, sf: AccelUnit) -> Result<(), SensorError> {
        self.accel_unit = Some(sf);
        Ok(())
    }

    fn gyro_fs(&mut self, fs: GyroRange) -> Result<(), SensorError> {
        self.gyro_range = Some(fs);
        Ok(())
    }

    fn gyro_sf(&mut self, sf: GyroUnit) -> Result<(), SensorError> {
        self.gyro_unit = Some(sf);
        Ok(())
    }
}

/// Analog pin returning a fixed reading.
pub struct MockPin {
    value: f32,
}

impl MockPin {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl AnalogPin for MockPin {
    fn read_analog(&mut self, _mv: bool) -> Result<f32, SensorError> {
        Ok(self.value)
    }
}

/// In-memory configuration storage; `None` models a missing file.
pub struct MemStorage {
    pub data: Option<Vec<u8>>,
}

impl MemStorage {
    pub fn missing() -> Self {
        Self { data: None }
    }

    pub fn with(content: &str) -> Self {
        Self {
            data: Some(content.as_bytes().to_vec()),
        }
    }
}

impl ConfigStorage for MemStorage {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError> {
        match &self.data {
            None => Err(StorageError::NotFound),
            Some(data) if data.len() > buffer.len() => Err(StorageError::BufferTooSmall),
            Some(data) => {
                buffer[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.data = Some(data.to_vec());
        Ok(())
    }
}

/// Storage whose writes always fail.
pub struct BrokenStorage;

impl ConfigStorage for BrokenStorage {
    fn read(&mut self, _buffer: &mut [u8]) -> Result<usize, StorageError> {
        Err(StorageError::NotFound)
    }

    fn write(&mut self, _data: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Io)
    }
}

/// 5x5 pixel buffer display.
pub struct MockDisplay {
    pixels: [[Color; GRID_SIZE as usize]; GRID_SIZE as usize],
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            pixels: [[Color::OFF; GRID_SIZE as usize]; GRID_SIZE as usize],
        }
    }

    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|&&c| c != Color::OFF)
            .count()
    }
}

impl PixelDisplay for MockDisplay {
    fn clear(&mut self) {
        self.pixels = [[Color::OFF; GRID_SIZE as usize]; GRID_SIZE as usize];
    }

    fn pixel(&self, x: u8, y: u8) -> Color {
        self.pixels[x as usize][y as usize]
    }

    fn set_pixel(&mut self, x: u8, y: u8, color: Color) {
        self.pixels[x as usize][y as usize] = color;
    }
}

/// Delay that returns immediately.
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
