//! Pixel display trait for the board's 5x5 LED matrix
//!
//! The display is used only as calibration-progress feedback. The exact
//! colors are a cosmetic contract, not a correctness one.

/// Side length of the addressable pixel grid.
pub const GRID_SIZE: u8 = 5;

/// An RGB pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Pixel off.
    pub const OFF: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Trait for the 5x5 pixel-addressable display.
///
/// Coordinates are `0..GRID_SIZE` on both axes. Drawing is infallible.
pub trait PixelDisplay {
    /// Turn every pixel off.
    fn clear(&mut self);

    /// Read back the color of one pixel.
    fn pixel(&self, x: u8, y: u8) -> Color;

    /// Set one pixel.
    fn set_pixel(&mut self, x: u8, y: u8, color: Color);
}
