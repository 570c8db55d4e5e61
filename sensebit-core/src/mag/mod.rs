//! Magnetometer calibration and heading math

pub mod calibration;
pub mod heading;

pub use calibration::{
    grid_position, is_border, CalibrationError, Correction, GridSampler, BORDER_CELLS,
    POLL_INTERVAL_MS,
};
pub use heading::tilt_compensated_heading;
