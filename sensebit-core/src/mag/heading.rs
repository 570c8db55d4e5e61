//! Tilt-compensated heading computation
//!
//! Projects the corrected magnetic field onto the horizontal plane
//! using the acceleration vector as the gravity reference, then turns
//! the projected angle into a compass heading in degrees.

use core::f32::consts::PI;

use libm::{atanf, cosf, sinf};

use crate::math::Vec3;

/// Compute the heading in degrees, in `[0, 360)`.
///
/// `accel` is the raw acceleration vector, `field` the corrected
/// magnetic field. Zero denominators in the roll/pitch/heading terms
/// saturate to ±90° through IEEE division; the fully degenerate 0/0
/// case is defined as angle 0.
pub fn tilt_compensated_heading(accel: Vec3, field: Vec3) -> f32 {
    let [ax, ay, az] = accel;
    let mx = field[0];
    let my = -field[1];
    let mz = -field[2];

    // roll
    let phi = atan_ratio(ay, az);
    let (sin_phi, cos_phi) = (sinf(phi), cosf(phi));
    // pitch
    let psi = atan_ratio(-ax, ay * sin_phi + az * cos_phi);
    let (sin_psi, cos_psi) = (sinf(psi), cosf(psi));
    // field angle in the leveled frame
    let theta = atan_ratio(
        mz * sin_phi - my * cos_phi,
        mx * cos_psi + my * sin_psi * sin_phi + mz * sin_psi * cos_phi,
    );

    let deg = theta * 180.0 / PI;
    let offset = if mx < 0.0 { -90.0 } else { 90.0 };

    let mut heading = (deg + offset) % 360.0;
    if heading < 0.0 {
        heading += 360.0;
    }
    if heading >= 360.0 {
        heading -= 360.0;
    }
    heading
}

/// `atan(num / den)` with the singular cases pinned down: a zero
/// denominator saturates to ±π/2 via IEEE infinity, and 0/0 is 0.
fn atan_ratio(num: f32, den: f32) -> f32 {
    if num == 0.0 && den == 0.0 {
        return 0.0;
    }
    atanf(num / den)
}
