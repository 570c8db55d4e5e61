//! Magnetometer calibration sampling and correction math
//!
//! Calibration asks the user to tilt the board until the acceleration
//! vector has visited the whole perimeter of the display grid. Each
//! newly visited border cell contributes one magnetic-field sample to a
//! running per-axis min/max, and the extremes yield the hard-iron
//! offset and soft-iron scale.

use crate::math::Vec3;
use crate::traits::display::GRID_SIZE;

/// Number of border cells on the 5x5 grid; one field sample each.
pub const BORDER_CELLS: u8 = 16;

/// Pause between sampling-loop polls, bounding the sampling rate.
pub const POLL_INTERVAL_MS: u32 = 100;

/// Errors from a calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Some axis never varied across the samples; the soft-iron scale
    /// would divide by zero.
    DegenerateField,
    /// The poll budget expired before all border cells were visited.
    Timeout,
}

/// Map one acceleration axis onto a grid coordinate.
///
/// The acceleration is used as a tilt proxy: ±8 m/s² spans the grid,
/// values beyond that clamp to the edge cells.
pub fn grid_position(accel_axis: f32) -> u8 {
    let pos = (accel_axis + 8.0) / 4.0 + 0.5;
    let max = (GRID_SIZE - 1) as f32;
    let pos = if pos < 0.0 {
        0.0
    } else if pos > max {
        max
    } else {
        pos
    };
    pos as u8
}

/// Whether a grid cell lies on the perimeter.
pub fn is_border(x: u8, y: u8) -> bool {
    x == 0 || x == GRID_SIZE - 1 || y == 0 || y == GRID_SIZE - 1
}

/// Hard-iron offset and soft-iron scale for the magnetometer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Correction {
    /// Additive bias removed from each axis
    pub offset: Vec3,
    /// Multiplicative per-axis scale applied after the offset
    pub scale: Vec3,
}

impl Correction {
    /// No correction: zero offset, unit scale.
    pub const IDENTITY: Self = Self {
        offset: [0.0; 3],
        scale: [1.0; 3],
    };

    /// Derive a correction from recorded per-axis field extremes.
    ///
    /// Hard iron: `offset = (max + min) / 2`.
    /// Soft iron: `scale = avg_delta / delta` with `delta = (max - min) / 2`.
    pub fn from_extents(min: Vec3, max: Vec3) -> Result<Self, CalibrationError> {
        let mut offset = [0.0; 3];
        let mut delta = [0.0; 3];
        for i in 0..3 {
            offset[i] = (max[i] + min[i]) / 2.0;
            delta[i] = (max[i] - min[i]) / 2.0;
            if delta[i] == 0.0 {
                return Err(CalibrationError::DegenerateField);
            }
        }

        let avg_delta = (delta[0] + delta[1] + delta[2]) / 3.0;
        let scale = [
            avg_delta / delta[0],
            avg_delta / delta[1],
            avg_delta / delta[2],
        ];

        Ok(Self { offset, scale })
    }

    /// Apply the correction to a raw field vector.
    pub fn apply(&self, raw: Vec3) -> Vec3 {
        [
            (raw[0] - self.offset[0]) * self.scale[0],
            (raw[1] - self.offset[1]) * self.scale[1],
            (raw[2] - self.offset[2]) * self.scale[2],
        ]
    }
}

impl Default for Correction {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sampling state machine for one calibration run.
///
/// Tracks which border cells have contributed a sample and the running
/// per-axis field extremes, seeded with one sample taken before the
/// loop starts.
pub struct GridSampler {
    min: Vec3,
    max: Vec3,
    filled: [[bool; GRID_SIZE as usize]; GRID_SIZE as usize],
    count: u8,
}

impl GridSampler {
    /// Start a run, seeding the extremes from one field sample.
    pub fn new(seed: Vec3) -> Self {
        Self {
            min: seed,
            max: seed,
            filled: [[false; GRID_SIZE as usize]; GRID_SIZE as usize],
            count: 0,
        }
    }

    /// Whether a cell has already contributed a sample this run.
    pub fn is_filled(&self, x: u8, y: u8) -> bool {
        self.filled[x as usize][y as usize]
    }

    /// Offer a field sample for a grid cell.
    ///
    /// Accepted only for border cells not yet filled this run; returns
    /// whether the sample was recorded.
    pub fn record(&mut self, x: u8, y: u8, field: Vec3) -> bool {
        if !is_border(x, y) || self.is_filled(x, y) {
            return false;
        }
        for i in 0..3 {
            if field[i] < self.min[i] {
                self.min[i] = field[i];
            }
            if field[i] > self.max[i] {
                self.max[i] = field[i];
            }
        }
        self.filled[x as usize][y as usize] = true;
        self.count += 1;
        true
    }

    /// Number of border cells filled so far.
    pub fn filled_count(&self) -> u8 {
        self.count
    }

    /// Whether every border cell has contributed a sample.
    pub fn is_complete(&self) -> bool {
        self.count >= BORDER_CELLS
    }

    /// Derive the correction from the recorded extremes.
    pub fn finish(&self) -> Result<Correction, CalibrationError> {
        Correction::from_extents(self.min, self.max)
    }
}
