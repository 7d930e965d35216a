//! Display surface trait
//!
//! Defines the interface the renderer draws through.

use crate::geometry::Geometry;

/// Display surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
}

/// Character-oriented drawing surface
///
/// Coordinates are in pixels, matching the graphics controller: `x` is the
/// left edge of the text and `y` the line position the font is drawn at.
pub trait DisplaySurface {
    /// Clear the entire surface
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw a line of text at the given pixel position
    fn draw_text(&mut self, x: u16, y: u16, text: &str) -> Result<(), DisplayError>;

    /// Fixed text layout of this surface
    fn geometry(&self) -> Geometry;

    /// Text rows the surface can address, each `font_height` pixels tall
    fn rows(&self) -> u16;
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for &mut T {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str) -> Result<(), DisplayError> {
        (**self).draw_text(x, y, text)
    }

    fn geometry(&self) -> Geometry {
        (**self).geometry()
    }

    fn rows(&self) -> u16 {
        (**self).rows()
    }
}
