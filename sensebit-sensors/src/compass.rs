//! Compass: calibrated magnetometer and tilt-compensated heading
//!
//! Calibration walks the user through tilting the board until the
//! acceleration vector has visited all 16 border cells of the 5x5
//! display grid, taking one magnetic sample per cell. The resulting
//! hard-iron offset and soft-iron scale are persisted to the board's
//! configuration document and restored by every later instance.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;

use sensebit_core::axis::{AxisCorrection, Mounting};
use sensebit_core::config::{ConfigStorage, ConfigStore};
use sensebit_core::mag::{
    grid_position, is_border, tilt_compensated_heading, CalibrationError, Correction,
    GridSampler, POLL_INTERVAL_MS,
};
use sensebit_core::math::Vec3;
use sensebit_core::traits::{Color, ImuDriver, PixelDisplay};

use crate::error::Error;

/// Config key for the persisted hard-iron offset.
pub const MAGNETIC_OFFSET_KEY: &str = "magnetic_offset";

/// Config key for the persisted soft-iron scale.
pub const MAGNETIC_SCALE_KEY: &str = "magnetic_scale";

/// Border cell being sampled right now.
const CELL_SAMPLING: Color = Color::new(10, 0, 10);
/// Border cell that has contributed a sample.
const CELL_FILLED: Color = Color::new(10, 0, 0);
/// Current tilt position when it is off the border.
const CELL_INTERIOR: Color = Color::new(0, 0, 10);

/// Magnetometer with persisted calibration.
pub struct Compass<'b, I, S> {
    imu: &'b RefCell<I>,
    config: &'b RefCell<ConfigStore<S>>,
    correction: Correction,
    calibrated: bool,
    axis: AxisCorrection,
}

impl<'b, I: ImuDriver, S: ConfigStorage> Compass<'b, I, S> {
    /// Wrap the shared IMU, restoring any persisted calibration.
    ///
    /// The compass is calibrated only when both config keys hold a
    /// 3-element array; any storage fault reads as uncalibrated.
    pub fn new(imu: &'b RefCell<I>, config: &'b RefCell<ConfigStore<S>>) -> Self {
        let (correction, calibrated) = {
            let mut store = config.borrow_mut();
            let offset: Option<Vec3> = store.get_typed(MAGNETIC_OFFSET_KEY);
            let scale: Option<Vec3> = store.get_typed(MAGNETIC_SCALE_KEY);
            match (offset, scale) {
                (Some(offset), Some(scale)) => (Correction { offset, scale }, true),
                _ => (Correction::IDENTITY, false),
            }
        };

        Self {
            imu,
            config,
            correction,
            calibrated,
            axis: AxisCorrection::IDENTITY,
        }
    }

    /// Whether a calibration is active.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// The corrected field vector, before axis correction.
    ///
    /// Returns the raw field while uncalibrated.
    pub fn get_pure_values(&mut self) -> Result<Vec3, Error> {
        let raw = self.imu.borrow_mut().magnetic()?;
        if self.calibrated {
            Ok(self.correction.apply(raw))
        } else {
            Ok(raw)
        }
    }

    /// The corrected field vector in the instance's mounting frame.
    pub fn get_values(&mut self) -> Result<Vec3, Error> {
        let pure = self.get_pure_values()?;
        Ok(self.axis.apply(pure))
    }

    /// X component of [`Self::get_values`].
    pub fn get_x(&mut self) -> Result<f32, Error> {
        Ok(self.get_values()?[0])
    }

    /// Y component of [`Self::get_values`].
    pub fn get_y(&mut self) -> Result<f32, Error> {
        Ok(self.get_values()?[1])
    }

    /// Z component of [`Self::get_values`].
    pub fn get_z(&mut self) -> Result<f32, Error> {
        Ok(self.get_values()?[2])
    }

    /// Select the mounting-orientation preset for this instance.
    pub fn set_axis(&mut self, mode: Mounting) -> Result<(), Error> {
        self.axis = match mode {
            Mounting::MountPlate => AxisCorrection::IDENTITY,
            Mounting::Shield => AxisCorrection::from_signs(1, -1, -1),
            Mounting::MainBoard => AxisCorrection::from_signs(-1, -1, 1),
        };
        Ok(())
    }

    /// Run the calibration procedure, blocking until the user's
    /// rotation has covered all 16 border cells.
    ///
    /// Returns the derived offset and scale, after persisting them.
    pub fn calibrate<D, W>(&mut self, display: &mut D, delay: &mut W) -> Result<(Vec3, Vec3), Error>
    where
        D: PixelDisplay,
        W: DelayNs,
    {
        self.run_calibration(display, delay, None)
    }

    /// Like [`Self::calibrate`], but give up after `max_polls` loop
    /// iterations.
    ///
    /// On expiry the compass is left uncalibrated in memory and the
    /// persisted values are untouched.
    pub fn calibrate_with_deadline<D, W>(
        &mut self,
        display: &mut D,
        delay: &mut W,
        max_polls: u32,
    ) -> Result<(Vec3, Vec3), Error>
    where
        D: PixelDisplay,
        W: DelayNs,
    {
        self.run_calibration(display, delay, Some(max_polls))
    }

    fn run_calibration<D, W>(
        &mut self,
        display: &mut D,
        delay: &mut W,
        max_polls: Option<u32>,
    ) -> Result<(Vec3, Vec3), Error>
    where
        D: PixelDisplay,
        W: DelayNs,
    {
        // a run starts from a clean slate; earlier in-memory state must
        // not leak into the samples
        self.correction = Correction::IDENTITY;
        self.calibrated = false;

        let seed = self.get_pure_values()?;
        let mut sampler = GridSampler::new(seed);

        display.clear();
        let (mut x, mut y) = (0u8, 0u8);
        let mut polls = 0u32;
        loop {
            if display.pixel(x, y) == CELL_INTERIOR {
                display.set_pixel(x, y, Color::OFF);
            }

            let accel = self.imu.borrow_mut().acceleration()?;
            x = grid_position(accel[0]);
            y = grid_position(accel[1]);

            if is_border(x, y) {
                if !sampler.is_filled(x, y) {
                    display.set_pixel(x, y, CELL_SAMPLING);
                    let field = self.get_pure_values()?;
                    sampler.record(x, y, field);
                    display.set_pixel(x, y, CELL_FILLED);
                }
            } else {
                display.set_pixel(x, y, CELL_INTERIOR);
            }

            if sampler.is_complete() {
                break;
            }

            polls += 1;
            if let Some(max) = max_polls {
                if polls >= max {
                    display.clear();
                    #[cfg(feature = "defmt")]
                    defmt::warn!("compass calibration timed out after {} polls", polls);
                    return Err(Error::Calibration(CalibrationError::Timeout));
                }
            }

            delay.delay_ms(POLL_INTERVAL_MS);
        }

        let correction = match sampler.finish() {
            Ok(correction) => correction,
            Err(e) => {
                display.clear();
                return Err(Error::Calibration(e));
            }
        };

        {
            let mut store = self.config.borrow_mut();
            store.set_typed(MAGNETIC_OFFSET_KEY, &correction.offset)?;
            store.set_typed(MAGNETIC_SCALE_KEY, &correction.scale)?;
        }

        self.correction = correction;
        self.calibrated = true;
        display.clear();

        #[cfg(feature = "defmt")]
        defmt::info!("compass calibrated");

        Ok((correction.offset, correction.scale))
    }

    /// Drop the active calibration and erase the persisted values.
    pub fn clear_calibration(&mut self) -> Result<(), Error> {
        self.correction = Correction::IDENTITY;
        self.calibrated = false;

        let mut store = self.config.borrow_mut();
        store.clear(MAGNETIC_OFFSET_KEY)?;
        store.clear(MAGNETIC_SCALE_KEY)?;
        Ok(())
    }

    /// Tilt-compensated heading in degrees, `[0, 360)`.
    ///
    /// Calibrates first (blocking) if no calibration is active, which
    /// is why the display and delay are needed here.
    pub fn heading<D, W>(&mut self, display: &mut D, delay: &mut W) -> Result<f32, Error>
    where
        D: PixelDisplay,
        W: DelayNs,
    {
        if !self.calibrated {
            self.calibrate(display, delay)?;
        }

        let accel = self.imu.borrow_mut().acceleration()?;
        let field = self.get_pure_values()?;
        Ok(tilt_compensated_heading(accel, field))
    }

    /// Field-strength magnitude is not supported by this board revision.
    pub fn get_field_strength(&mut self) -> Result<f32, Error> {
        Err(Error::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{BrokenStorage, MemStorage, MockDisplay, MockImu, NoopDelay};
    use alloc::vec;
    use alloc::vec::Vec;
    use sensebit_core::config::ConfigRead;
    use sensebit_core::traits::display::GRID_SIZE;

    /// Acceleration value that maps to grid coordinate `p`.
    fn tilt_for(p: u8) -> f32 {
        4.0 * p as f32 - 8.0
    }

    /// The 16 border cells in scan order.
    fn border_cells() -> Vec<(u8, u8)> {
        let mut cells = Vec::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if is_border(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// IMU scripted to visit every border cell once; `fields[0]` seeds
    /// the extents, the rest are the 16 per-cell samples.
    fn calibration_imu(fields: Vec<[f32; 3]>) -> MockImu {
        let accel: Vec<[f32; 3]> = border_cells()
            .into_iter()
            .map(|(x, y)| [tilt_for(x), tilt_for(y), 0.0])
            .collect();
        MockImu::scripted(accel, fields)
    }

    fn sample_fields() -> Vec<[f32; 3]> {
        let mut fields = vec![[0.0, 0.0, 0.0]];
        fields.push([-10.0, -20.0, -30.0]);
        fields.push([10.0, 20.0, 30.0]);
        while fields.len() < 17 {
            fields.push([1.0, -1.0, 2.0]);
        }
        fields
    }

    #[test]
    fn test_uncalibrated_returns_raw_field() {
        let imu = RefCell::new(MockImu::with_readings([0.0; 3], [0.0; 3], [3.5, -1.25, 0.5]));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);

        assert!(!compass.is_calibrated());
        assert_eq!(compass.get_pure_values().unwrap(), [3.5, -1.25, 0.5]);
    }

    #[test]
    fn test_axis_presets() {
        let imu = RefCell::new(MockImu::with_readings([0.0; 3], [0.0; 3], [1.0, 2.0, 3.0]));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);

        compass.set_axis(Mounting::Shield).unwrap();
        assert_eq!(compass.get_values().unwrap(), [1.0, -2.0, -3.0]);
        compass.set_axis(Mounting::MainBoard).unwrap();
        assert_eq!(compass.get_values().unwrap(), [-1.0, -2.0, 3.0]);
        assert_eq!(compass.get_x().unwrap(), -1.0);
    }

    #[test]
    fn test_calibration_run_and_correction_law() {
        let imu = RefCell::new(calibration_imu(sample_fields()));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);
        let mut display = MockDisplay::new();

        let (offset, scale) = compass.calibrate(&mut display, &mut NoopDelay).unwrap();
        assert!(compass.is_calibrated());

        // extremes were (-10,-20,-30)/(10,20,30): zero offset, scale
        // avg_delta/delta with avg_delta = 20
        assert_eq!(offset, [0.0, 0.0, 0.0]);
        assert!((scale[0] - 2.0).abs() < 1e-6);
        assert!((scale[1] - 1.0).abs() < 1e-6);
        assert!((scale[2] - 2.0 / 3.0).abs() < 1e-4);

        // the maximum sample maps to +avg_delta on every axis
        let corrected = Correction { offset, scale }.apply([10.0, 20.0, 30.0]);
        for c in corrected {
            assert!((c - 20.0).abs() < 1e-3);
        }

        // display is cleared when the run completes
        assert_eq!(display.lit_count(), 0);
    }

    #[test]
    fn test_calibration_round_trips_through_config() {
        let imu = RefCell::new(calibration_imu(sample_fields()));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut display = MockDisplay::new();

        let (offset, scale) = {
            let mut compass = Compass::new(&imu, &config);
            compass.calibrate(&mut display, &mut NoopDelay).unwrap()
        };

        // a fresh instance restores the persisted correction
        let fresh = Compass::new(&imu, &config);
        assert!(fresh.is_calibrated());
        assert_eq!(fresh.correction.offset, offset);
        assert_eq!(fresh.correction.scale, scale);
    }

    #[test]
    fn test_clear_calibration_erases_persisted_state() {
        let imu = RefCell::new(calibration_imu(sample_fields()));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut display = MockDisplay::new();

        let mut compass = Compass::new(&imu, &config);
        compass.calibrate(&mut display, &mut NoopDelay).unwrap();
        compass.clear_calibration().unwrap();
        assert!(!compass.is_calibrated());

        assert_eq!(
            config.borrow_mut().get(MAGNETIC_OFFSET_KEY),
            ConfigRead::NotFound
        );
        let fresh = Compass::new(&imu, &config);
        assert!(!fresh.is_calibrated());
    }

    #[test]
    fn test_deadline_expires_in_the_interior() {
        // tilt stays at the center cell, so no border cell ever fills
        let imu = RefCell::new(MockImu::scripted(
            vec![[0.0, 0.0, 0.0]],
            vec![[1.0, 1.0, 1.0]],
        ));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);
        let mut display = MockDisplay::new();

        let r = compass.calibrate_with_deadline(&mut display, &mut NoopDelay, 5);
        assert_eq!(r, Err(Error::Calibration(CalibrationError::Timeout)));
        assert!(!compass.is_calibrated());
        assert_eq!(display.lit_count(), 0);
        // nothing was ever persisted
        assert_eq!(
            config.borrow_mut().get(MAGNETIC_OFFSET_KEY),
            ConfigRead::Unreadable
        );
    }

    #[test]
    fn test_degenerate_field_fails_without_persisting() {
        // z never varies across the samples
        let mut fields = vec![[0.0, 0.0, 5.0]];
        fields.push([-10.0, -20.0, 5.0]);
        fields.push([10.0, 20.0, 5.0]);
        while fields.len() < 17 {
            fields.push([1.0, -1.0, 5.0]);
        }
        let imu = RefCell::new(calibration_imu(fields));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);
        let mut display = MockDisplay::new();

        let r = compass.calibrate(&mut display, &mut NoopDelay);
        assert_eq!(
            r,
            Err(Error::Calibration(CalibrationError::DegenerateField))
        );
        assert!(!compass.is_calibrated());
        assert_eq!(
            config.borrow_mut().get(MAGNETIC_SCALE_KEY),
            ConfigRead::Unreadable
        );
    }

    #[test]
    fn test_persist_failure_surfaces() {
        let imu = RefCell::new(calibration_imu(sample_fields()));
        let config = RefCell::new(ConfigStore::new(BrokenStorage));
        let mut compass = Compass::new(&imu, &config);
        let mut display = MockDisplay::new();

        let r = compass.calibrate(&mut display, &mut NoopDelay);
        assert!(matches!(r, Err(Error::Storage(_))));
    }

    #[test]
    fn test_heading_with_restored_calibration() {
        let imu = RefCell::new(MockImu::with_readings(
            [0.0, 0.0, 1.0],
            [0.0; 3],
            [1.0, 0.0, 0.0],
        ));
        let config = RefCell::new(ConfigStore::new(MemStorage::with(
            r#"{"magnetic_offset": [0, 0, 0], "magnetic_scale": [1, 1, 1]}"#,
        )));
        let mut compass = Compass::new(&imu, &config);
        assert!(compass.is_calibrated());

        let mut display = MockDisplay::new();
        let h = compass.heading(&mut display, &mut NoopDelay).unwrap();
        assert!((h - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_heading_calibrates_when_needed() {
        let imu = RefCell::new(calibration_imu(sample_fields()));
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);
        let mut display = MockDisplay::new();

        let h = compass.heading(&mut display, &mut NoopDelay).unwrap();
        assert!(compass.is_calibrated());
        assert!((0.0..360.0).contains(&h));
    }

    #[test]
    fn test_field_strength_is_unsupported() {
        let imu = RefCell::new(MockImu::level());
        let config = RefCell::new(ConfigStore::new(MemStorage::missing()));
        let mut compass = Compass::new(&imu, &config);
        assert_eq!(compass.get_field_strength(), Err(Error::Unsupported));
    }
}
