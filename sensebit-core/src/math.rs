//! Shared math helpers

/// A three-axis reading (x, y, z).
pub type Vec3 = [f32; 3];

/// Round `value` to `ndigits` decimal digits.
///
/// Half-way cases round away from zero.
pub fn round_digits(value: f32, ndigits: u8) -> f32 {
    let factor = libm::powf(10.0, ndigits as f32);
    libm::roundf(value * factor) / factor
}
